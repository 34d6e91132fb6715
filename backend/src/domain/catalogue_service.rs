//! Read-side catalog service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::catalogue::{available_tags, filter_projects};
use super::ports::{CatalogueQuery, ProjectRepository, UserRepository};
use super::repository_errors::{map_project_error, map_user_error, project_not_found};
use super::{Error, Project, ProjectDetail, ProjectFilter};

/// Implements [`CatalogueQuery`] over the project and user repositories.
#[derive(Clone)]
pub struct CatalogueService<P, U> {
    projects: Arc<P>,
    users: Arc<U>,
}

impl<P, U> CatalogueService<P, U> {
    pub fn new(projects: Arc<P>, users: Arc<U>) -> Self {
        Self { projects, users }
    }
}

#[async_trait]
impl<P, U> CatalogueQuery for CatalogueService<P, U>
where
    P: ProjectRepository,
    U: UserRepository,
{
    async fn list_projects(&self, filter: ProjectFilter) -> Result<Vec<Project>, Error> {
        let projects = self.projects.list().await.map_err(map_project_error)?;
        let total = projects.len();
        let matched = filter_projects(projects, &filter);
        debug!(total, matched = matched.len(), "catalog filtered");
        Ok(matched)
    }

    async fn get_project(&self, project_id: Uuid) -> Result<ProjectDetail, Error> {
        let project = self
            .projects
            .find_by_id(&project_id)
            .await
            .map_err(map_project_error)?
            .ok_or_else(|| project_not_found(project_id))?;
        let owner = self
            .users
            .find_by_id(&project.owner_id)
            .await
            .map_err(map_user_error)?
            .map(|user| user.profile());
        Ok(ProjectDetail { project, owner })
    }

    async fn available_tags(&self) -> Result<Vec<String>, Error> {
        let projects = self.projects.list().await.map_err(map_project_error)?;
        Ok(available_tags(&projects))
    }
}

#[cfg(test)]
#[path = "catalogue_service_tests.rs"]
mod tests;
