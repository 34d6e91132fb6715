//! Driving ports for listing mutations and a user's library.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Error, IdempotencyKey, Project, ProjectDraft, Purchase, PurchaseWithProject, UserId,
};

/// Request to publish a new listing.
#[derive(Debug, Clone)]
pub struct CreateProjectRequest {
    pub owner_id: UserId,
    pub draft: ProjectDraft,
    pub idempotency_key: Option<IdempotencyKey>,
}

/// Result of publishing a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectResponse {
    pub project: Project,
    /// Set when the response was replayed from a stored idempotency record.
    #[serde(default)]
    pub replayed: bool,
}

/// Request to remove a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteProjectRequest {
    pub project_id: Uuid,
    pub user_id: UserId,
}

/// Request to buy a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseProjectRequest {
    pub buyer_id: UserId,
    pub project_id: Uuid,
    pub idempotency_key: Option<IdempotencyKey>,
}

/// Result of buying a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseProjectResponse {
    pub purchase: Purchase,
    #[serde(default)]
    pub replayed: bool,
}

/// Files a buyer may download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDownload {
    pub project_id: Uuid,
    pub files: Vec<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectCommand: Send + Sync {
    /// Publish a listing as `Pending`, consuming one upload slot.
    async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> Result<CreateProjectResponse, Error>;

    /// Remove an owned listing, consuming one deletion slot.
    async fn delete_project(&self, request: DeleteProjectRequest) -> Result<(), Error>;

    /// Buy an approved listing, marking it `Sold`.
    async fn purchase_project(
        &self,
        request: PurchaseProjectRequest,
    ) -> Result<PurchaseProjectResponse, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryQuery: Send + Sync {
    /// Listings uploaded by `user_id`, any status.
    async fn user_projects(&self, user_id: &UserId) -> Result<Vec<Project>, Error>;

    /// Purchases made by `user_id` with their listings.
    async fn user_purchases(&self, user_id: &UserId) -> Result<Vec<PurchaseWithProject>, Error>;

    /// Files of a listing the user bought or owns.
    async fn download_project(
        &self,
        user_id: &UserId,
        project_id: Uuid,
    ) -> Result<ProjectDownload, Error>;
}
