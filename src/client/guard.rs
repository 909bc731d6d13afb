use crate::paths::page;

/// Who may see a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Signed-in callers only
    Protected,
    /// Signed-out callers only (login, register)
    PublicOnly,
    /// Everyone
    Open,
}

/// A navigation target, with the page that sent the caller there, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub from: Option<String>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            from: None,
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    Render,
    Redirect { to: String, from: Option<String> },
}

/// Access class of a page path. Unknown paths are open.
pub fn page_access(path: &str) -> Access {
    match path {
        page::LOGIN | page::REGISTER | page::ADMIN_LOGIN => Access::PublicOnly,
        page::PROFILE | page::SETTINGS | page::ADMIN => Access::Protected,
        _ if path.starts_with("/admin/") => Access::Protected,
        _ => Access::Open,
    }
}

pub fn resolve(access: Access, authenticated: bool, location: &Location) -> Guard {
    match access {
        Access::Protected if !authenticated => Guard::Redirect {
            to: page::LOGIN.to_string(),
            from: Some(location.path.clone()),
        },
        Access::PublicOnly if authenticated => Guard::Redirect {
            to: location
                .from
                .clone()
                .unwrap_or_else(|| page::ROOT.to_string()),
            from: None,
        },
        _ => Guard::Render,
    }
}
