//! Port for authenticating admin credentials.

use async_trait::async_trait;

use crate::domain::{AdminAccount, AdminIdentity, Error, LoginCredentials};

/// Domain use-case port for validating login credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated identity.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AdminIdentity, Error>;
}

/// Login service backed by the single configured admin account.
#[derive(Debug, Clone)]
pub struct AdminLoginService {
    account: AdminAccount,
}

impl AdminLoginService {
    /// Accept exactly `account`.
    pub fn new(account: AdminAccount) -> Self {
        Self { account }
    }
}

#[async_trait]
impl LoginService for AdminLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AdminIdentity, Error> {
        if self.account.matches(credentials) {
            tracing::info!(email = %self.account.email(), "admin login accepted");
            Ok(AdminIdentity::new(self.account.email()))
        } else {
            tracing::warn!(email = %credentials.email(), "admin login rejected");
            Err(Error::unauthorized("invalid email or password"))
        }
    }
}
