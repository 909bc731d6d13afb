// handlers/admin/mod.rs - Admin handlers (admin token required)
//
// Mounted under /api/admin. Only `admin_login` is reachable without a token;
// everything else sits behind auth_middleware + require_admin, which also
// checks that the admin named by the token still exists.

pub mod posts;
pub mod quizzes;
pub mod session;
pub mod settings;
pub mod users;

pub use posts::post_remove;
pub use quizzes::quiz_create;
pub use session::{admin_login, admin_session, AdminSession};
pub use settings::{settings_get, settings_put};
pub use users::user_list;
