use tracing::{info, warn};

use crate::error::{SegakError, SegakResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait Authenticator {
    fn authenticate(&self, credentials: &Credentials) -> bool;
}

#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

pub const DEFAULT_ADMIN_USER: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "password123";

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_USER, DEFAULT_ADMIN_PASSWORD)
    }
}

impl Authenticator for StaticCredentials {
    fn authenticate(&self, credentials: &Credentials) -> bool {
        credentials.username == self.username && credentials.password == self.password
    }
}

/// Only `login` can construct one.
#[derive(Debug)]
pub struct AdminSession {
    username: String,
}

impl AdminSession {
    pub fn username(&self) -> &str {
        &self.username
    }
}

pub fn login(authenticator: &dyn Authenticator, credentials: &Credentials) -> SegakResult<AdminSession> {
    if !authenticator.authenticate(credentials) {
        warn!(username = %credentials.username, "admin login rejected");
        return Err(SegakError::Unauthorized);
    }

    info!(username = %credentials.username, "admin logged in");
    Ok(AdminSession {
        username: credentials.username.clone(),
    })
}

#[cfg(test)]
pub(crate) fn test_session() -> AdminSession {
    AdminSession {
        username: DEFAULT_ADMIN_USER.to_string(),
    }
}
