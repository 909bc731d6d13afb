use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Site-wide settings edited from the admin panel. A single row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SiteSettings {
    pub site_name: String,
    pub registration_open: bool,
    pub notice: Option<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "Roadmap".to_string(),
            registration_open: true,
            notice: None,
        }
    }
}
