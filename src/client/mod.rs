//! Client-side logic: page access and route guarding, persisted local
//! state, and a typed client for the HTTP API. Used by the `roadmap` CLI.

pub mod api;
pub mod guard;
pub mod store;

pub use api::{ApiClient, ClientError};
pub use guard::{page_access, resolve, Access, Guard, Location};
pub use store::{
    AuthState, FileStorage, KeyValueStorage, LayoutState, MemoryStorage, Persisted, StorageError,
    Theme, ThemeState,
};
