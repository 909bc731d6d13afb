// handlers/me/mod.rs - Member handlers (JWT authentication required)
//
// Mounted under /api/me behind auth_middleware + require_member. Every handler
// acts on the caller named by the token subject.

pub mod groups;
pub mod posts;
pub mod profile;
pub mod quizzes;

pub use groups::{group_create, group_join, group_leave, my_groups};
pub use posts::{my_posts, post_create, post_delete};
pub use profile::{avatar_put, me_get, me_patch, visibility_put};
pub use quizzes::{attempt_create, attempt_list};
