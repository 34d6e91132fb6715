//! Moderator views.
//!
//! ```text
//! GET /api/v1/admin/projects/pending
//! GET /api/v1/admin/sellers
//! ```

use actix_web::{get, web};

use crate::domain::{Error, Project, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Pending listings within the caller's moderation scope.
#[utoipa::path(
    get,
    path = "/api/v1/admin/projects/pending",
    responses(
        (status = 200, description = "Moderation queue", body = [Project]),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a moderator", body = Error)
    ),
    tags = ["moderation"],
    operation_id = "listPendingProjects"
)]
#[get("/admin/projects/pending")]
pub async fn pending_projects(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Project>>> {
    let admin_id = session.require_user_id()?;
    Ok(web::Json(state.moderation.pending_projects(&admin_id).await?))
}

/// Sellers available for custom project assignment.
#[utoipa::path(
    get,
    path = "/api/v1/admin/sellers",
    responses(
        (status = 200, description = "Seller profiles", body = [UserProfile]),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a moderator", body = Error)
    ),
    tags = ["moderation"],
    operation_id = "listSellers"
)]
#[get("/admin/sellers")]
pub async fn list_sellers(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserProfile>>> {
    let admin_id = session.require_user_id()?;
    Ok(web::Json(state.moderation.list_sellers(&admin_id).await?))
}
