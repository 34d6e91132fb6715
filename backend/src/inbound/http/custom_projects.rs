//! Custom project handlers.
//!
//! ```text
//! POST /api/v1/custom-projects
//! GET  /api/v1/custom-projects
//! POST /api/v1/custom-projects/{id}/assign   {"sellerId": "..."}
//! POST /api/v1/custom-projects/{id}/start
//! POST /api/v1/custom-projects/{id}/submit   {"files": ["a.zip"]}
//! POST /api/v1/custom-projects/{id}/approve  {"downloadUrl": "https://..."}
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{
    ApproveCustomProjectRequest, AssignCustomProjectRequest, SubmitCustomProjectRequest,
};
use crate::domain::{ContentDomain, CustomProject, CustomProjectInput, Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    ValidationCode, field_error, parse_uuid, require,
};

#[derive(Debug, Deserialize)]
pub(crate) struct CustomProjectPath {
    id: String,
}

fn custom_project_id(path: web::Path<CustomProjectPath>) -> Result<Uuid, Error> {
    parse_uuid(&path.into_inner().id, "id")
}

/// A buyer's request for bespoke work.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomProjectBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub domain: Option<ContentDomain>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

impl TryFrom<CustomProjectBody> for CustomProjectInput {
    type Error = Error;

    fn try_from(body: CustomProjectBody) -> Result<Self, Self::Error> {
        Ok(Self {
            title: require(body.title, "title")?,
            description: require(body.description, "description")?,
            budget: require(body.budget, "budget")?,
            due_date: body.due_date,
            domain: body.domain,
            attachments: body.attachments,
        })
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignBody {
    pub seller_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliverBody {
    pub download_url: Option<String>,
}

fn parse_seller_id(raw: Option<String>) -> Result<UserId, Error> {
    let raw = require(raw, "sellerId")?;
    UserId::new(&raw).map_err(|err| {
        field_error("sellerId", ValidationCode::InvalidUuid, err.to_string())
    })
}

/// Open a request as the signed-in buyer.
#[utoipa::path(
    post,
    path = "/api/v1/custom-projects",
    request_body = CustomProjectBody,
    responses(
        (status = 201, description = "Request opened", body = CustomProject),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Only buyers may request work", body = Error)
    ),
    tags = ["custom-projects"],
    operation_id = "requestCustomProject"
)]
#[post("/custom-projects")]
pub async fn request_custom_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CustomProjectBody>,
) -> ApiResult<HttpResponse> {
    let buyer_id = session.require_user_id()?;
    let input = CustomProjectInput::try_from(payload.into_inner())?;
    let custom_project = state
        .custom_projects
        .request_custom_project(&buyer_id, input)
        .await?;
    Ok(HttpResponse::Created().json(custom_project))
}

/// Requests visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/custom-projects",
    responses(
        (status = 200, description = "Visible requests", body = [CustomProject]),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["custom-projects"],
    operation_id = "listCustomProjects"
)]
#[get("/custom-projects")]
pub async fn list_custom_projects(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CustomProject>>> {
    let user_id = session.require_user_id()?;
    Ok(web::Json(
        state.custom_projects.list_custom_projects(&user_id).await?,
    ))
}

/// Assign a pending request to a seller.
#[utoipa::path(
    post,
    path = "/api/v1/custom-projects/{id}/assign",
    request_body = AssignBody,
    params(("id" = String, Path, description = "Custom project identifier")),
    responses(
        (status = 200, description = "Assigned", body = CustomProject),
        (status = 400, description = "Seller missing or not a seller", body = Error),
        (status = 403, description = "Not a moderator for this domain", body = Error),
        (status = 409, description = "Request is not pending", body = Error)
    ),
    tags = ["custom-projects"],
    operation_id = "assignCustomProject"
)]
#[post("/custom-projects/{id}/assign")]
pub async fn assign_custom_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CustomProjectPath>,
    payload: web::Json<AssignBody>,
) -> ApiResult<web::Json<CustomProject>> {
    let admin_id = session.require_user_id()?;
    let custom_project_id = custom_project_id(path)?;
    let seller_id = parse_seller_id(payload.into_inner().seller_id)?;
    let custom_project = state
        .custom_projects
        .assign_custom_project(AssignCustomProjectRequest {
            custom_project_id,
            admin_id,
            seller_id,
        })
        .await?;
    Ok(web::Json(custom_project))
}

/// Start work on an assigned request.
#[utoipa::path(
    post,
    path = "/api/v1/custom-projects/{id}/start",
    params(("id" = String, Path, description = "Custom project identifier")),
    responses(
        (status = 200, description = "In progress", body = CustomProject),
        (status = 403, description = "Not the assigned seller", body = Error),
        (status = 409, description = "Request is not assigned", body = Error)
    ),
    tags = ["custom-projects"],
    operation_id = "startCustomProject"
)]
#[post("/custom-projects/{id}/start")]
pub async fn start_custom_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CustomProjectPath>,
) -> ApiResult<web::Json<CustomProject>> {
    let seller_id = session.require_user_id()?;
    let custom_project_id = custom_project_id(path)?;
    let custom_project = state
        .custom_projects
        .start_custom_project(custom_project_id, &seller_id)
        .await?;
    Ok(web::Json(custom_project))
}

/// Submit delivery files for review.
#[utoipa::path(
    post,
    path = "/api/v1/custom-projects/{id}/submit",
    request_body = SubmitBody,
    params(("id" = String, Path, description = "Custom project identifier")),
    responses(
        (status = 200, description = "Submitted", body = CustomProject),
        (status = 400, description = "No files", body = Error),
        (status = 403, description = "Not the assigned seller", body = Error),
        (status = 409, description = "Request cannot be submitted now", body = Error)
    ),
    tags = ["custom-projects"],
    operation_id = "submitCustomProject"
)]
#[post("/custom-projects/{id}/submit")]
pub async fn submit_custom_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CustomProjectPath>,
    payload: web::Json<SubmitBody>,
) -> ApiResult<web::Json<CustomProject>> {
    let seller_id = session.require_user_id()?;
    let custom_project_id = custom_project_id(path)?;
    let custom_project = state
        .custom_projects
        .submit_custom_project(SubmitCustomProjectRequest {
            custom_project_id,
            seller_id,
            files: payload.into_inner().files,
        })
        .await?;
    Ok(web::Json(custom_project))
}

/// Accept a submission and publish the download location.
#[utoipa::path(
    post,
    path = "/api/v1/custom-projects/{id}/approve",
    request_body = DeliverBody,
    params(("id" = String, Path, description = "Custom project identifier")),
    responses(
        (status = 200, description = "Delivered", body = CustomProject),
        (status = 400, description = "Download URL missing", body = Error),
        (status = 403, description = "Not a moderator for this domain", body = Error),
        (status = 409, description = "Request is not submitted", body = Error)
    ),
    tags = ["custom-projects"],
    operation_id = "approveCustomProject"
)]
#[post("/custom-projects/{id}/approve")]
pub async fn approve_custom_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CustomProjectPath>,
    payload: web::Json<DeliverBody>,
) -> ApiResult<web::Json<CustomProject>> {
    let admin_id = session.require_user_id()?;
    let custom_project_id = custom_project_id(path)?;
    let download_url = require(payload.into_inner().download_url, "downloadUrl")?;
    let custom_project = state
        .custom_projects
        .approve_custom_project(ApproveCustomProjectRequest {
            custom_project_id,
            admin_id,
            download_url,
        })
        .await?;
    Ok(web::Json(custom_project))
}
