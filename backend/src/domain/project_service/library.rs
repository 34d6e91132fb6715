//! A user's uploads, purchases and downloads.

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use super::ProjectService;
use crate::domain::ports::{
    IdempotencyRepository, LibraryQuery, ProjectDownload, ProjectRepository, PurchaseRepository,
    UserRepository,
};
use crate::domain::repository_errors::{map_project_error, map_purchase_error};
use crate::domain::{Error, Project, PurchaseWithProject, UserId};

#[async_trait]
impl<P, U, B, I> LibraryQuery for ProjectService<P, U, B, I>
where
    P: ProjectRepository,
    U: UserRepository,
    B: PurchaseRepository,
    I: IdempotencyRepository,
{
    async fn user_projects(&self, user_id: &UserId) -> Result<Vec<Project>, Error> {
        self.projects
            .list_by_owner(user_id)
            .await
            .map_err(map_project_error)
    }

    async fn user_purchases(&self, user_id: &UserId) -> Result<Vec<PurchaseWithProject>, Error> {
        let purchases = self
            .purchases
            .list_by_buyer(user_id)
            .await
            .map_err(map_purchase_error)?;
        let mut library = Vec::with_capacity(purchases.len());
        for purchase in purchases {
            let project = self
                .projects
                .find_by_id(&purchase.project_id)
                .await
                .map_err(map_project_error)?;
            library.push(PurchaseWithProject { purchase, project });
        }
        Ok(library)
    }

    async fn download_project(
        &self,
        user_id: &UserId,
        project_id: Uuid,
    ) -> Result<ProjectDownload, Error> {
        let project = self.load_project(project_id).await?;
        let entitled = project.is_owned_by(user_id)
            || self
                .purchases
                .find(user_id, &project_id)
                .await
                .map_err(map_purchase_error)?
                .is_some();
        if !entitled {
            return Err(Error::forbidden("purchase required to download").with_details(json!({
                "projectId": project_id,
                "code": "not_purchased",
            })));
        }
        if project.files.is_empty() {
            return Err(Error::not_found("No files available for download").with_details(
                json!({
                    "projectId": project_id,
                    "code": "no_files",
                }),
            ));
        }
        Ok(ProjectDownload {
            project_id,
            files: project.files,
        })
    }
}
