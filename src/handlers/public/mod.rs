// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Mounted under /api/public behind optional_auth_middleware: anonymous callers
// are served, and a valid token only changes what some endpoints reveal
// (e.g. a member can see their own private profile).

pub mod auth;
pub mod groups;
pub mod posts;
pub mod profiles;
pub mod quizzes;
pub mod site;
pub mod topics;

pub use auth::{login, register, LoginRequest, RegisterRequest, SessionResponse};
pub use groups::group_list;
pub use posts::{post_get, post_list};
pub use profiles::profile_get;
pub use quizzes::quiz_get;
pub use site::{avatar_list, config_get};
pub use topics::{topic_get, topic_list, topic_quizzes};
