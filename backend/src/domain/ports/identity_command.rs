//! Driving port for accounts and sessions.
//!
//! Sessions themselves live in the HTTP layer; this port validates
//! credentials and mutates account state.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Role, SignupDetails, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityCommand: Send + Sync {
    /// Resolve a session's account. `None` when the account no longer exists.
    async fn current_user(&self, user_id: &UserId) -> Result<Option<User>, Error>;

    /// Authenticate by email and password.
    async fn login(&self, credentials: &LoginCredentials) -> Result<User, Error>;

    /// Register a buyer or seller.
    async fn signup(&self, details: &SignupDetails) -> Result<User, Error>;

    /// Swap between the self-service roles.
    async fn switch_role(&self, user_id: &UserId, role: Role) -> Result<User, Error>;

    /// Lift the free-tier quota.
    async fn upgrade_to_premium(&self, user_id: &UserId) -> Result<User, Error>;
}
