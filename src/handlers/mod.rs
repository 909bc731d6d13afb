// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (optional auth) → Me (member JWT) → Admin (admin JWT)
//
// Every handler returns `ApiResult<T>`: the success envelope on Ok, the
// failure envelope (or an empty 401) on Err.

use serde::Serialize;
use uuid::Uuid;

pub mod admin; // Tier 3: admin token, admin row must exist (/api/admin/*)
pub mod me; // Tier 2: member token required (/api/me/*)
pub mod public; // Tier 1: no authentication required (/api/public/*)

/// Body of a successful delete.
#[derive(Debug, Clone, Serialize)]
pub struct Deleted {
    pub id: Uuid,
}
