//! Port abstraction for custom request persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::CustomProject;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by custom project repository adapters.
    pub enum CustomProjectRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "custom project repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "custom project repository query failed: {message}",
        /// The stored revision differs from the caller's.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "custom project revision mismatch: expected {expected}, found {actual}",
        /// No request exists with this identifier.
        NotFound { custom_project_id: Uuid } => "custom project {custom_project_id} not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomProjectRepository: Send + Sync {
    /// Every request in insertion order.
    async fn list(&self) -> Result<Vec<CustomProject>, CustomProjectRepositoryError>;

    /// Fetch a request by identifier.
    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<CustomProject>, CustomProjectRepositoryError>;

    /// Insert (`expected_revision == None`) or compare-and-swap replace a
    /// request.
    async fn save(
        &self,
        custom_project: &CustomProject,
        expected_revision: Option<u32>,
    ) -> Result<(), CustomProjectRepositoryError>;
}
