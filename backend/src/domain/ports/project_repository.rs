//! Port abstraction for catalog listing persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Project, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by project repository adapters.
    pub enum ProjectRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "project repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "project repository query failed: {message}",
        /// The stored revision differs from the caller's. `expected` is 0
        /// when the caller expected no stored listing.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "project revision mismatch: expected {expected}, found {actual}",
        /// No listing exists with this identifier.
        NotFound { project_id: Uuid } => "project {project_id} not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Every listing in insertion order.
    async fn list(&self) -> Result<Vec<Project>, ProjectRepositoryError>;

    /// Fetch a listing by identifier.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Project>, ProjectRepositoryError>;

    /// Listings owned by `owner_id` in insertion order.
    async fn list_by_owner(&self, owner_id: &UserId)
    -> Result<Vec<Project>, ProjectRepositoryError>;

    /// Insert (`expected_revision == None`) or compare-and-swap replace a
    /// listing.
    async fn save(
        &self,
        project: &Project,
        expected_revision: Option<u32>,
    ) -> Result<(), ProjectRepositoryError>;

    /// Remove a listing if its revision still equals `expected_revision`.
    async fn delete(&self, id: &Uuid, expected_revision: u32)
    -> Result<(), ProjectRepositoryError>;
}
