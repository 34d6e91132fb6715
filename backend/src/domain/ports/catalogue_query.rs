//! Driving port for browsing the catalog.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::catalogue::ProjectFilter;
use crate::domain::{Error, Project, ProjectDetail};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Listings matching every predicate of `filter`, in insertion order.
    async fn list_projects(&self, filter: ProjectFilter) -> Result<Vec<Project>, Error>;

    /// A single listing with its owner's public profile.
    async fn get_project(&self, project_id: Uuid) -> Result<ProjectDetail, Error>;

    /// Distinct tags across the catalog in first-seen order.
    async fn available_tags(&self) -> Result<Vec<String>, Error>;
}
