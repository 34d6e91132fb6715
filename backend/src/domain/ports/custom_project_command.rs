//! Driving port for bespoke work requests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{CustomProject, CustomProjectInput, Error, UserId};

/// Request to hand a pending request to a seller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignCustomProjectRequest {
    pub custom_project_id: Uuid,
    pub admin_id: UserId,
    pub seller_id: UserId,
}

/// Request to deliver work for review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitCustomProjectRequest {
    pub custom_project_id: Uuid,
    pub seller_id: UserId,
    pub files: Vec<String>,
}

/// Request to accept submitted work and publish a download link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproveCustomProjectRequest {
    pub custom_project_id: Uuid,
    pub admin_id: UserId,
    pub download_url: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomProjectCommand: Send + Sync {
    /// File a new request as `Pending`.
    async fn request_custom_project(
        &self,
        buyer_id: &UserId,
        input: CustomProjectInput,
    ) -> Result<CustomProject, Error>;

    /// Requests visible to `user_id`: everything for admins, assigned work
    /// for sellers, own requests for buyers.
    async fn list_custom_projects(&self, user_id: &UserId) -> Result<Vec<CustomProject>, Error>;

    async fn assign_custom_project(
        &self,
        request: AssignCustomProjectRequest,
    ) -> Result<CustomProject, Error>;

    /// The assigned seller starts work.
    async fn start_custom_project(
        &self,
        custom_project_id: Uuid,
        seller_id: &UserId,
    ) -> Result<CustomProject, Error>;

    async fn submit_custom_project(
        &self,
        request: SubmitCustomProjectRequest,
    ) -> Result<CustomProject, Error>;

    async fn approve_custom_project(
        &self,
        request: ApproveCustomProjectRequest,
    ) -> Result<CustomProject, Error>;
}
