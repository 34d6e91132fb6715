//! Port abstraction for user persistence adapters and their errors.
//!
//! Writes are compare-and-swap on [`User::revision`]: `save` succeeds only
//! when the stored revision equals `expected_revision`.

use async_trait::async_trait;

use crate::domain::{Email, Role, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses this email.
        DuplicateEmail { email: String } => "email already registered: {email}",
        /// The stored revision differs from the caller's.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "user revision mismatch: expected {expected}, found {actual}",
        /// No account exists with this identifier.
        NotFound { user_id: String } => "user {user_id} not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError>;

    /// Insert a new account, failing with `DuplicateEmail` when the email is
    /// taken.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Replace a stored account if its revision still equals
    /// `expected_revision`.
    async fn save(&self, user: &User, expected_revision: u32) -> Result<(), UserRepositoryError>;

    /// Accounts holding `role`, in registration order.
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserRepositoryError>;
}
