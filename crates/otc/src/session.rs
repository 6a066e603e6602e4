#![forbid(unsafe_code)]

//! Signed-in user state passed explicitly to the form.

use serde::{Deserialize, Serialize};

use crate::client::AuthData;

/// What the app knows about the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    /// Display name, once known.
    pub name: Option<String>,
    /// Email address, once known.
    pub email: Option<String>,
}

impl UserSession {
    /// Empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session for a known user.
    #[must_use]
    pub fn identified(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
        }
    }

    /// Both name and email are known and non-empty.
    #[must_use]
    pub fn is_identified(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.name) && present(&self.email)
    }

    /// Take name and email from `data` when both are non-empty.
    ///
    /// Returns whether the session changed.
    pub fn absorb(&mut self, data: &AuthData) -> bool {
        if data.name.is_empty() || data.email.is_empty() {
            return false;
        }
        let changed = self.name.as_deref() != Some(data.name.as_str())
            || self.email.as_deref() != Some(data.email.as_str());
        self.name = Some(data.name.clone());
        self.email = Some(data.email.clone());
        changed
    }
}
