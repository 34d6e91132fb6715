//! Driving port for the admin moderation queue.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Project, UserId, UserProfile};

/// Request to approve a pending listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproveProjectRequest {
    pub project_id: Uuid,
    pub admin_id: UserId,
}

/// Request to reject a pending listing with feedback for the seller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectProjectRequest {
    pub project_id: Uuid,
    pub admin_id: UserId,
    pub feedback: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationCommand: Send + Sync {
    /// Move a `Pending` listing to `Approved`, recording the approver.
    async fn approve_project(&self, request: ApproveProjectRequest) -> Result<Project, Error>;

    /// Move a `Pending` listing to `Rejected`, recording feedback.
    async fn reject_project(&self, request: RejectProjectRequest) -> Result<Project, Error>;

    /// Pending listings inside the admin's moderation scope.
    async fn pending_projects(&self, admin_id: &UserId) -> Result<Vec<Project>, Error>;

    /// Public profiles of every seller.
    async fn list_sellers(&self, admin_id: &UserId) -> Result<Vec<UserProfile>, Error>;
}
