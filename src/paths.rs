//! Path tables shared by the router, the CLI client and the route guard.

/// Backend mount points.
pub mod api {
    pub const PUBLIC: &str = "/api/public";
    pub const ME: &str = "/api/me";
    pub const ADMIN: &str = "/api/admin";

    pub const HEALTH: &str = "/health";
}

/// Client page paths.
pub mod page {
    pub const ROOT: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const TOPICS: &str = "/topics";
    pub const POSTS: &str = "/posts";
    pub const GROUPS: &str = "/groups";
    pub const QUIZZES: &str = "/quizzes";
    pub const PROFILE: &str = "/profile";
    pub const SETTINGS: &str = "/settings";
    pub const ADMIN: &str = "/admin";
    pub const ADMIN_LOGIN: &str = "/admin/login";
}
