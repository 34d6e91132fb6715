//! Listing mutations, moderation and the buyer library.
//!
//! Upload and delete quotas are reserved on the user record with
//! compare-and-swap before the listing is touched; a failed follow-up
//! releases the reservation. Lifecycle changes are compare-and-swap on the
//! listing revision, so a second approval or purchase observes either a
//! revision conflict or an invalid transition.

mod idempotency;
mod library;
mod moderation;
mod quota;

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use super::access::{load_session_user, require_capability};
use super::ports::{
    CreateProjectRequest, CreateProjectResponse, DeleteProjectRequest, IdempotencyRepository,
    ProjectCommand, ProjectRepository, PurchaseProjectRequest, PurchaseProjectResponse,
    PurchaseRepository, UserRepository,
};
use super::repository_errors::{map_project_error, map_purchase_error, project_not_found};
use super::{
    Capability, Error, MutationType, Project, Purchase, QuotaAction, canonicalize_and_hash,
};
use self::idempotency::IdempotencyContext;

/// Implements [`ProjectCommand`], [`ModerationCommand`](super::ports::ModerationCommand)
/// and [`LibraryQuery`](super::ports::LibraryQuery).
#[derive(Clone)]
pub struct ProjectService<P, U, B, I> {
    projects: Arc<P>,
    users: Arc<U>,
    purchases: Arc<B>,
    idempotency: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<P, U, B, I> ProjectService<P, U, B, I> {
    pub fn new(
        projects: Arc<P>,
        users: Arc<U>,
        purchases: Arc<B>,
        idempotency: Arc<I>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            projects,
            users,
            purchases,
            idempotency,
            clock,
        }
    }
}

impl<P, U, B, I> ProjectService<P, U, B, I>
where
    P: ProjectRepository,
    U: UserRepository,
    B: PurchaseRepository,
    I: IdempotencyRepository,
{
    async fn load_project(&self, project_id: Uuid) -> Result<Project, Error> {
        self.projects
            .find_by_id(&project_id)
            .await
            .map_err(map_project_error)?
            .ok_or_else(|| project_not_found(project_id))
    }

    /// Persist `project` over the stored revision `expected`, bumping it.
    async fn save_transition(&self, mut project: Project, expected: u32) -> Result<Project, Error> {
        project.revision = expected + 1;
        self.projects
            .save(&project, Some(expected))
            .await
            .map_err(map_project_error)?;
        Ok(project)
    }

    async fn perform_create(&self, request: &CreateProjectRequest) -> Result<Project, Error> {
        let owner = load_session_user(self.users.as_ref(), &request.owner_id).await?;
        require_capability(&owner, Capability::UploadProject)?;
        let owner = self.reserve_quota(owner, QuotaAction::Upload).await?;

        let project = Project::from_draft(
            Uuid::new_v4(),
            owner.id.clone(),
            request.draft.clone(),
            self.clock.utc(),
        );
        if let Err(err) = self.projects.save(&project, None).await {
            self.release_quota(&owner.id, QuotaAction::Upload).await;
            return Err(map_project_error(err));
        }

        info!(
            project_id = %project.id,
            owner_id = %owner.id,
            uploads = owner.project_uploads,
            "project created"
        );
        Ok(project)
    }

    async fn perform_delete(&self, request: &DeleteProjectRequest) -> Result<(), Error> {
        let project = self.load_project(request.project_id).await?;
        let user = load_session_user(self.users.as_ref(), &request.user_id).await?;
        if !project.is_owned_by(&user.id) {
            return Err(Error::forbidden("only the owner can delete a project").with_details(
                json!({
                    "projectId": project.id,
                    "code": "not_owner",
                }),
            ));
        }
        let user = self.reserve_quota(user, QuotaAction::Delete).await?;

        if let Err(err) = self.projects.delete(&project.id, project.revision).await {
            self.release_quota(&user.id, QuotaAction::Delete).await;
            return Err(map_project_error(err));
        }

        info!(
            project_id = %project.id,
            owner_id = %user.id,
            deletions = user.project_deletions,
            "project deleted"
        );
        Ok(())
    }

    async fn perform_purchase(&self, request: &PurchaseProjectRequest) -> Result<Purchase, Error> {
        let buyer = load_session_user(self.users.as_ref(), &request.buyer_id).await?;
        require_capability(&buyer, Capability::PurchaseProject)?;
        let mut project = self.load_project(request.project_id).await?;
        if project.is_owned_by(&buyer.id) {
            return Err(Error::forbidden("cannot purchase your own project").with_details(
                json!({
                    "projectId": project.id,
                    "code": "own_project",
                }),
            ));
        }

        let expected = project.revision;
        project.mark_sold()?;
        let project = self.save_transition(project, expected).await?;

        let purchase = Purchase::new(
            Uuid::new_v4(),
            buyer.id.clone(),
            project.id,
            self.clock.utc(),
        );
        if let Err(err) = self.purchases.insert(&purchase).await {
            error!(
                project_id = %project.id,
                buyer_id = %buyer.id,
                error = %err,
                "listing marked sold but purchase record failed"
            );
            return Err(map_purchase_error(err));
        }

        info!(
            project_id = %project.id,
            buyer_id = %buyer.id,
            purchase_id = %purchase.id,
            "project purchased"
        );
        Ok(purchase)
    }
}

#[async_trait]
impl<P, U, B, I> ProjectCommand for ProjectService<P, U, B, I>
where
    P: ProjectRepository,
    U: UserRepository,
    B: PurchaseRepository,
    I: IdempotencyRepository,
{
    async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> Result<CreateProjectResponse, Error> {
        let Some(idempotency_key) = request.idempotency_key.clone() else {
            let project = self.perform_create(&request).await?;
            return Ok(CreateProjectResponse {
                project,
                replayed: false,
            });
        };

        let context = IdempotencyContext::new(
            idempotency_key,
            request.owner_id.clone(),
            MutationType::CreateProject,
            canonicalize_and_hash(&json!({ "draft": request.draft })),
        );
        self.handle_idempotent(context, || async {
            let project = self.perform_create(&request).await?;
            Ok(CreateProjectResponse {
                project,
                replayed: false,
            })
        })
        .await
    }

    async fn delete_project(&self, request: DeleteProjectRequest) -> Result<(), Error> {
        self.perform_delete(&request).await
    }

    async fn purchase_project(
        &self,
        request: PurchaseProjectRequest,
    ) -> Result<PurchaseProjectResponse, Error> {
        let Some(idempotency_key) = request.idempotency_key.clone() else {
            let purchase = self.perform_purchase(&request).await?;
            return Ok(PurchaseProjectResponse {
                purchase,
                replayed: false,
            });
        };

        let context = IdempotencyContext::new(
            idempotency_key,
            request.buyer_id.clone(),
            MutationType::PurchaseProject,
            canonicalize_and_hash(&json!({ "projectId": request.project_id })),
        );
        self.handle_idempotent(context, || async {
            let purchase = self.perform_purchase(&request).await?;
            Ok(PurchaseProjectResponse {
                purchase,
                replayed: false,
            })
        })
        .await
    }
}
