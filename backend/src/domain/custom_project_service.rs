//! Bespoke work requests from request through delivery.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::access::{load_session_user, require_capability, require_moderator, require_scope};
use super::ports::{
    ApproveCustomProjectRequest, AssignCustomProjectRequest, CustomProjectCommand,
    CustomProjectRepository, SubmitCustomProjectRequest, UserRepository,
};
use super::repository_errors::{
    custom_project_not_found, map_custom_project_error, map_user_error, user_not_found,
};
use super::{
    Capability, CustomProject, CustomProjectInput, CustomProjectValidationError, Error, User,
    UserId,
};

/// Implements [`CustomProjectCommand`].
#[derive(Clone)]
pub struct CustomProjectService<C, U> {
    custom_projects: Arc<C>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<C, U> CustomProjectService<C, U> {
    pub fn new(custom_projects: Arc<C>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            custom_projects,
            users,
            clock,
        }
    }
}

fn invalid_input(error: CustomProjectValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": "invalid_custom_project",
    }))
}

fn require_assignee(custom_project: &CustomProject, seller_id: &UserId) -> Result<(), Error> {
    if custom_project
        .seller_id
        .as_ref()
        .is_some_and(|assigned| assigned != seller_id)
    {
        return Err(
            Error::forbidden("only the assigned seller can work on this request").with_details(
                json!({
                    "customProjectId": custom_project.id,
                    "code": "not_assignee",
                }),
            ),
        );
    }
    Ok(())
}

fn require_non_blank(value: &str, message: &str) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_request(message));
    }
    Ok(trimmed.to_owned())
}

impl<C, U> CustomProjectService<C, U>
where
    C: CustomProjectRepository,
    U: UserRepository,
{
    async fn load(&self, custom_project_id: Uuid) -> Result<CustomProject, Error> {
        self.custom_projects
            .find_by_id(&custom_project_id)
            .await
            .map_err(map_custom_project_error)?
            .ok_or_else(|| custom_project_not_found(custom_project_id))
    }

    async fn save_transition(
        &self,
        mut custom_project: CustomProject,
        expected: u32,
    ) -> Result<CustomProject, Error> {
        custom_project.revision = expected + 1;
        self.custom_projects
            .save(&custom_project, Some(expected))
            .await
            .map_err(map_custom_project_error)?;
        Ok(custom_project)
    }

    /// Load an admin allowed to manage requests in `custom_project`'s domain.
    async fn load_manager(
        &self,
        admin_id: &UserId,
        custom_project: &CustomProject,
    ) -> Result<User, Error> {
        let admin = load_session_user(self.users.as_ref(), admin_id).await?;
        require_capability(&admin, Capability::ManageCustomProjects)?;
        require_scope(require_moderator(&admin)?, custom_project.domain)?;
        Ok(admin)
    }
}

#[async_trait]
impl<C, U> CustomProjectCommand for CustomProjectService<C, U>
where
    C: CustomProjectRepository,
    U: UserRepository,
{
    async fn request_custom_project(
        &self,
        buyer_id: &UserId,
        input: CustomProjectInput,
    ) -> Result<CustomProject, Error> {
        let buyer = load_session_user(self.users.as_ref(), buyer_id).await?;
        require_capability(&buyer, Capability::RequestCustomProject)?;
        let custom_project =
            CustomProject::request(Uuid::new_v4(), buyer.id.clone(), input, self.clock.utc())
                .map_err(invalid_input)?;
        self.custom_projects
            .save(&custom_project, None)
            .await
            .map_err(map_custom_project_error)?;

        info!(
            custom_project_id = %custom_project.id,
            buyer_id = %buyer.id,
            "custom project requested"
        );
        Ok(custom_project)
    }

    async fn list_custom_projects(&self, user_id: &UserId) -> Result<Vec<CustomProject>, Error> {
        let user = load_session_user(self.users.as_ref(), user_id).await?;
        let all = self
            .custom_projects
            .list()
            .await
            .map_err(map_custom_project_error)?;

        let visible = match user.role.moderation_scope() {
            Some(scope) => all
                .into_iter()
                .filter(|custom_project| scope.covers(custom_project.domain))
                .collect(),
            None if user.can(Capability::FulfilCustomProject) => all
                .into_iter()
                .filter(|custom_project| custom_project.is_assigned_to(&user.id))
                .collect(),
            None => all
                .into_iter()
                .filter(|custom_project| custom_project.buyer_id == user.id)
                .collect(),
        };
        Ok(visible)
    }

    async fn assign_custom_project(
        &self,
        request: AssignCustomProjectRequest,
    ) -> Result<CustomProject, Error> {
        let mut custom_project = self.load(request.custom_project_id).await?;
        let admin = self.load_manager(&request.admin_id, &custom_project).await?;
        let seller = self
            .users
            .find_by_id(&request.seller_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| user_not_found(request.seller_id.as_ref()))?;
        if !seller.can(Capability::FulfilCustomProject) {
            return Err(Error::invalid_request("assignee must be a seller").with_details(json!({
                "sellerId": seller.id,
                "code": "not_a_seller",
            })));
        }

        let expected = custom_project.revision;
        custom_project.assign(seller.id.clone())?;
        let custom_project = self.save_transition(custom_project, expected).await?;

        info!(
            custom_project_id = %custom_project.id,
            admin_id = %admin.id,
            seller_id = %seller.id,
            "custom project assigned"
        );
        Ok(custom_project)
    }

    async fn start_custom_project(
        &self,
        custom_project_id: Uuid,
        seller_id: &UserId,
    ) -> Result<CustomProject, Error> {
        let mut custom_project = self.load(custom_project_id).await?;
        require_assignee(&custom_project, seller_id)?;

        let expected = custom_project.revision;
        custom_project.start_work()?;
        let custom_project = self.save_transition(custom_project, expected).await?;

        info!(custom_project_id = %custom_project.id, %seller_id, "custom project started");
        Ok(custom_project)
    }

    async fn submit_custom_project(
        &self,
        request: SubmitCustomProjectRequest,
    ) -> Result<CustomProject, Error> {
        let files: Vec<String> = request
            .files
            .iter()
            .map(|file| file.trim().to_owned())
            .filter(|file| !file.is_empty())
            .collect();
        if files.is_empty() {
            return Err(Error::invalid_request("at least one file is required"));
        }
        let mut custom_project = self.load(request.custom_project_id).await?;
        require_assignee(&custom_project, &request.seller_id)?;

        let expected = custom_project.revision;
        custom_project.submit(files, self.clock.utc())?;
        let custom_project = self.save_transition(custom_project, expected).await?;

        info!(
            custom_project_id = %custom_project.id,
            seller_id = %request.seller_id,
            files = custom_project.submission_files.len(),
            "custom project submitted"
        );
        Ok(custom_project)
    }

    async fn approve_custom_project(
        &self,
        request: ApproveCustomProjectRequest,
    ) -> Result<CustomProject, Error> {
        let download_url =
            require_non_blank(&request.download_url, "download URL must not be empty")?;
        let mut custom_project = self.load(request.custom_project_id).await?;
        let admin = self.load_manager(&request.admin_id, &custom_project).await?;

        let expected = custom_project.revision;
        custom_project.approve_delivery(download_url, self.clock.utc())?;
        let custom_project = self.save_transition(custom_project, expected).await?;

        info!(
            custom_project_id = %custom_project.id,
            admin_id = %admin.id,
            "custom project delivered"
        );
        Ok(custom_project)
    }
}

#[cfg(test)]
#[path = "custom_project_service_tests.rs"]
mod tests;
