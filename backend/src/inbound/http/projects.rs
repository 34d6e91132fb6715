//! Catalog, listing and moderation handlers.
//!
//! ```text
//! GET    /api/v1/projects?tag=&minPrice=&maxPrice=&domain=&status=&q=
//! GET    /api/v1/projects/tags
//! GET    /api/v1/projects/{id}
//! POST   /api/v1/projects                  (Idempotency-Key supported)
//! DELETE /api/v1/projects/{id}
//! POST   /api/v1/projects/{id}/approve
//! POST   /api/v1/projects/{id}/reject
//! POST   /api/v1/projects/{id}/purchase    (Idempotency-Key supported)
//! GET    /api/v1/projects/{id}/download
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::{
    ApproveProjectRequest, CreateProjectRequest, DeleteProjectRequest, ProjectDownload,
    PurchaseProjectRequest, RejectProjectRequest,
};
use crate::domain::{
    ContentDomain, Error, Project, ProjectDetail, ProjectDraft, ProjectDraftInput, ProjectFilter,
    ProjectStatus, Purchase,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::idempotency::idempotency_key;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    ValidationCode, field_error, parse_price_bound, parse_uuid, project_validation_error, require,
};

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectPath {
    id: String,
}

fn project_id(path: web::Path<ProjectPath>) -> Result<Uuid, Error> {
    parse_uuid(&path.into_inner().id, "id")
}

/// Catalog query parameters. Every supplied parameter must match.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Exact tag.
    pub tag: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    /// `project`, `portfolio` or `phd`.
    pub domain: Option<String>,
    /// `Pending`, `Approved` (or legacy `Available`), `Rejected` or `Sold`.
    pub status: Option<String>,
    /// Case-insensitive text search.
    pub q: Option<String>,
}

/// Case-insensitive status name. `Available` is the legacy spelling of
/// `Approved`.
fn parse_status(raw: &str) -> Result<ProjectStatus, Error> {
    if raw.eq_ignore_ascii_case("available") {
        return Ok(ProjectStatus::Approved);
    }
    [
        ProjectStatus::Pending,
        ProjectStatus::Approved,
        ProjectStatus::Rejected,
        ProjectStatus::Sold,
    ]
    .into_iter()
    .find(|status| status.as_str().eq_ignore_ascii_case(raw))
    .ok_or_else(|| {
        field_error(
            "status",
            ValidationCode::InvalidValue,
            format!("unknown status '{raw}'"),
        )
    })
}

impl TryFrom<CatalogQuery> for ProjectFilter {
    type Error = Error;

    fn try_from(query: CatalogQuery) -> Result<Self, Self::Error> {
        let domain = query
            .domain
            .map(|raw| {
                raw.parse::<ContentDomain>().map_err(|err| {
                    field_error("domain", ValidationCode::InvalidValue, err.to_string())
                })
            })
            .transpose()?;
        Ok(Self {
            tag: query.tag.filter(|tag| !tag.is_empty()),
            min_price: parse_price_bound(query.min_price, "minPrice")?,
            max_price: parse_price_bound(query.max_price, "maxPrice")?,
            domain,
            status: query.status.as_deref().map(parse_status).transpose()?,
            search: query.q,
        })
    }
}

/// New listing body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectBody {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub domain: Option<ContentDomain>,
    #[serde(default)]
    pub files: Vec<String>,
}

impl TryFrom<CreateProjectBody> for ProjectDraft {
    type Error = Error;

    fn try_from(body: CreateProjectBody) -> Result<Self, Self::Error> {
        let input = ProjectDraftInput {
            title: require(body.title, "title")?,
            description: require(body.description, "description")?,
            tags: body.tags,
            link: body.link,
            image: require(body.image, "image")?,
            price: require(body.price, "price")?,
            domain: body.domain,
            files: body.files,
        };
        ProjectDraft::try_from_input(input).map_err(project_validation_error)
    }
}

/// Moderator feedback for a rejection.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectBody {
    pub feedback: Option<String>,
}

/// Files the caller may download.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub project_id: Uuid,
    pub files: Vec<String>,
}

impl From<ProjectDownload> for DownloadResponse {
    fn from(value: ProjectDownload) -> Self {
        Self {
            project_id: value.project_id,
            files: value.files,
        }
    }
}

/// 201 for a fresh write, 200 when an idempotent retry is replayed.
fn created<T: Serialize>(body: &T, replayed: bool) -> HttpResponse {
    if replayed {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::Created().json(body)
    }
}

/// List catalog projects matching the query.
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Matching projects in insertion order", body = [Project]),
        (status = 400, description = "Invalid filter", body = Error)
    ),
    tags = ["projects"],
    operation_id = "listProjects",
    security([])
)]
#[get("/projects")]
pub async fn list_projects(
    state: web::Data<HttpState>,
    query: web::Query<CatalogQuery>,
) -> ApiResult<web::Json<Vec<Project>>> {
    let filter = ProjectFilter::try_from(query.into_inner())?;
    Ok(web::Json(state.catalogue.list_projects(filter).await?))
}

/// Distinct tags across the catalog.
#[utoipa::path(
    get,
    path = "/api/v1/projects/tags",
    responses((status = 200, description = "Tags in first-seen order", body = [String])),
    tags = ["projects"],
    operation_id = "listProjectTags",
    security([])
)]
#[get("/projects/tags")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<String>>> {
    Ok(web::Json(state.catalogue.available_tags().await?))
}

/// Fetch one project with its owner's public profile.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}",
    params(("id" = String, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Project detail", body = ProjectDetail),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["projects"],
    operation_id = "getProject",
    security([])
)]
#[get("/projects/{id}")]
pub async fn get_project(
    state: web::Data<HttpState>,
    path: web::Path<ProjectPath>,
) -> ApiResult<web::Json<ProjectDetail>> {
    let id = project_id(path)?;
    Ok(web::Json(state.catalogue.get_project(id).await?))
}

/// Create a pending listing owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    request_body = CreateProjectBody,
    params(("Idempotency-Key" = Option<String>, Header, description = "UUID for safe retries")),
    responses(
        (status = 201, description = "Created", body = Project),
        (status = 200, description = "Replayed earlier response", body = Project),
        (status = 400, description = "Invalid listing", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a seller or upload quota exceeded", body = Error),
        (status = 409, description = "Idempotency key reused or concurrent update", body = Error)
    ),
    tags = ["projects"],
    operation_id = "createProject"
)]
#[post("/projects")]
pub async fn create_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    payload: web::Json<CreateProjectBody>,
) -> ApiResult<HttpResponse> {
    let owner_id = session.require_user_id()?;
    let idempotency_key = idempotency_key(request.headers())?;
    let draft = ProjectDraft::try_from(payload.into_inner())?;
    let response = state
        .projects
        .create_project(CreateProjectRequest {
            owner_id,
            draft,
            idempotency_key,
        })
        .await?;
    Ok(created(&response.project, response.replayed))
}

/// Delete one of the caller's listings.
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{id}",
    params(("id" = String, Path, description = "Project identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the owner or delete quota exceeded", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["projects"],
    operation_id = "deleteProject"
)]
#[delete("/projects/{id}")]
pub async fn delete_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ProjectPath>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let project_id = project_id(path)?;
    state
        .projects
        .delete_project(DeleteProjectRequest {
            project_id,
            user_id,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Approve a pending listing.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/approve",
    params(("id" = String, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Approved", body = Project),
        (status = 403, description = "Not a moderator for this domain", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Project is not pending", body = Error)
    ),
    tags = ["moderation"],
    operation_id = "approveProject"
)]
#[post("/projects/{id}/approve")]
pub async fn approve_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ProjectPath>,
) -> ApiResult<web::Json<Project>> {
    let admin_id = session.require_user_id()?;
    let project_id = project_id(path)?;
    let project = state
        .moderation
        .approve_project(ApproveProjectRequest {
            project_id,
            admin_id,
        })
        .await?;
    Ok(web::Json(project))
}

/// Reject a pending listing with feedback for the seller.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/reject",
    request_body = RejectBody,
    params(("id" = String, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Rejected", body = Project),
        (status = 400, description = "Feedback missing", body = Error),
        (status = 403, description = "Not a moderator for this domain", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Project is not pending", body = Error)
    ),
    tags = ["moderation"],
    operation_id = "rejectProject"
)]
#[post("/projects/{id}/reject")]
pub async fn reject_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ProjectPath>,
    payload: web::Json<RejectBody>,
) -> ApiResult<web::Json<Project>> {
    let admin_id = session.require_user_id()?;
    let project_id = project_id(path)?;
    let feedback = require(payload.into_inner().feedback, "feedback")?;
    let project = state
        .moderation
        .reject_project(RejectProjectRequest {
            project_id,
            admin_id,
            feedback,
        })
        .await?;
    Ok(web::Json(project))
}

/// Buy an approved listing.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/purchase",
    params(
        ("id" = String, Path, description = "Project identifier"),
        ("Idempotency-Key" = Option<String>, Header, description = "UUID for safe retries")
    ),
    responses(
        (status = 201, description = "Purchased", body = Purchase),
        (status = 200, description = "Replayed earlier response", body = Purchase),
        (status = 403, description = "Cannot buy own project", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Project is not for sale", body = Error)
    ),
    tags = ["projects"],
    operation_id = "purchaseProject"
)]
#[post("/projects/{id}/purchase")]
pub async fn purchase_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    path: web::Path<ProjectPath>,
) -> ApiResult<HttpResponse> {
    let buyer_id = session.require_user_id()?;
    let project_id = project_id(path)?;
    let idempotency_key = idempotency_key(request.headers())?;
    let response = state
        .projects
        .purchase_project(PurchaseProjectRequest {
            buyer_id,
            project_id,
            idempotency_key,
        })
        .await?;
    Ok(created(&response.purchase, response.replayed))
}

/// File list for a project the caller owns or bought.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/download",
    params(("id" = String, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Downloadable files", body = DownloadResponse),
        (status = 403, description = "Not purchased", body = Error),
        (status = 404, description = "Not found or no files", body = Error)
    ),
    tags = ["projects"],
    operation_id = "downloadProject"
)]
#[get("/projects/{id}/download")]
pub async fn download_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ProjectPath>,
) -> ApiResult<web::Json<DownloadResponse>> {
    let user_id = session.require_user_id()?;
    let project_id = project_id(path)?;
    let download = state.library.download_project(&user_id, project_id).await?;
    Ok(web::Json(download.into()))
}

#[cfg(test)]
#[path = "projects_tests.rs"]
mod tests;
