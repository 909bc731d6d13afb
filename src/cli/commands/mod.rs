pub mod browse;
pub mod prefs;
pub mod seed;
pub mod session;

use crate::client::{page_access, resolve, ApiClient, AuthState, FileStorage, Guard, Location, Persisted};
use crate::paths::page;

/// Stored client state a command starts from.
pub struct LocalSession {
    pub storage: FileStorage,
    pub auth: AuthState,
}

impl LocalSession {
    pub fn load() -> anyhow::Result<Self> {
        let storage = FileStorage::from_env()?;
        let auth = AuthState::load(&storage);
        Ok(Self { storage, auth })
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::from_env().with_token(self.auth.token.clone())
    }

    /// Fails with a "sign in first" error when `command` acts on a protected page without a session.
    pub fn require_access(&self, command: &str, page_path: &str) -> anyhow::Result<()> {
        match sign_in_required(command, page_path, self.auth.is_authenticated()) {
            Some(message) => Err(anyhow::anyhow!(message)),
            None => Ok(()),
        }
    }
}

fn sign_in_required(command: &str, page_path: &str, authenticated: bool) -> Option<String> {
    match resolve(page_access(page_path), authenticated, &Location::new(page_path)) {
        Guard::Redirect { to, .. } if to == page::LOGIN => Some(format!(
            "Sign in first: `roadmap {command}` needs a session (run `roadmap login <username>`)"
        )),
        _ => None,
    }
}
