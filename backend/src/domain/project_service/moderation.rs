//! Admin moderation of pending listings.

use async_trait::async_trait;
use tracing::info;

use super::ProjectService;
use crate::domain::access::{load_session_user, require_moderator, require_scope};
use crate::domain::ports::{
    ApproveProjectRequest, IdempotencyRepository, ModerationCommand, ProjectRepository,
    PurchaseRepository, RejectProjectRequest, UserRepository,
};
use crate::domain::repository_errors::{map_project_error, map_user_error};
use crate::domain::{Error, Project, ProjectStatus, Role, UserId, UserProfile};

#[async_trait]
impl<P, U, B, I> ModerationCommand for ProjectService<P, U, B, I>
where
    P: ProjectRepository,
    U: UserRepository,
    B: PurchaseRepository,
    I: IdempotencyRepository,
{
    async fn approve_project(&self, request: ApproveProjectRequest) -> Result<Project, Error> {
        let admin = load_session_user(self.users.as_ref(), &request.admin_id).await?;
        let scope = require_moderator(&admin)?;
        let mut project = self.load_project(request.project_id).await?;
        require_scope(scope, project.domain)?;

        let expected = project.revision;
        project.approve(admin.id.clone(), self.clock.utc())?;
        let project = self.save_transition(project, expected).await?;

        info!(project_id = %project.id, admin_id = %admin.id, "project approved");
        Ok(project)
    }

    async fn reject_project(&self, request: RejectProjectRequest) -> Result<Project, Error> {
        let feedback = request.feedback.trim();
        if feedback.is_empty() {
            return Err(Error::invalid_request("feedback must not be empty"));
        }
        let admin = load_session_user(self.users.as_ref(), &request.admin_id).await?;
        let scope = require_moderator(&admin)?;
        let mut project = self.load_project(request.project_id).await?;
        require_scope(scope, project.domain)?;

        let expected = project.revision;
        project.reject(feedback.to_owned())?;
        let project = self.save_transition(project, expected).await?;

        info!(project_id = %project.id, admin_id = %admin.id, "project rejected");
        Ok(project)
    }

    async fn pending_projects(&self, admin_id: &UserId) -> Result<Vec<Project>, Error> {
        let admin = load_session_user(self.users.as_ref(), admin_id).await?;
        let scope = require_moderator(&admin)?;
        let projects = self.projects.list().await.map_err(map_project_error)?;
        Ok(projects
            .into_iter()
            .filter(|project| project.status == ProjectStatus::Pending)
            .filter(|project| scope.covers(project.domain))
            .collect())
    }

    async fn list_sellers(&self, admin_id: &UserId) -> Result<Vec<UserProfile>, Error> {
        let admin = load_session_user(self.users.as_ref(), admin_id).await?;
        require_moderator(&admin)?;
        let sellers = self
            .users
            .list_by_role(Role::Seller)
            .await
            .map_err(map_user_error)?;
        Ok(sellers.iter().map(|seller| seller.profile()).collect())
    }
}
