//! Account and session handlers.
//!
//! ```text
//! POST /api/v1/login              {"email": "...", "password": "..."}
//! POST /api/v1/signup             {"name": "...", "email": "...", "password": "...", "role": "Buyer"}
//! POST /api/v1/logout
//! GET  /api/v1/users/me
//! POST /api/v1/users/me/role      {"role": "Seller"}
//! POST /api/v1/users/me/premium
//! GET  /api/v1/users/me/purchases
//! GET  /api/v1/users/me/projects
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    Error, LoginCredentials, Project, PurchaseWithProject, Role, SignupDetails, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{credentials_error, require};

/// Login body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Signup body. Only `Buyer` and `Seller` may be chosen.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// Role switch body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwitchRoleBody {
    pub role: Option<Role>,
}

impl TryFrom<LoginBody> for LoginCredentials {
    type Error = Error;

    fn try_from(body: LoginBody) -> Result<Self, Self::Error> {
        let email = require(body.email, "email")?;
        let password = require(body.password, "password")?;
        LoginCredentials::try_from_parts(&email, &password).map_err(credentials_error)
    }
}

impl TryFrom<SignupBody> for SignupDetails {
    type Error = Error;

    fn try_from(body: SignupBody) -> Result<Self, Self::Error> {
        let name = require(body.name, "name")?;
        let email = require(body.email, "email")?;
        let password = require(body.password, "password")?;
        let role = body.role.unwrap_or(Role::Buyer);
        SignupDetails::try_from_parts(&name, &email, &password, role).map_err(credentials_error)
    }
}

/// Sign in and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Signed in", body = User,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Authentication failed", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginBody>,
) -> ApiResult<web::Json<User>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let user = state.identity.login(&credentials).await?;
    session.persist_user(&user.id)?;
    Ok(web::Json(user))
}

/// Create an account and sign in.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignupBody,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupBody>,
) -> ApiResult<HttpResponse> {
    let details = SignupDetails::try_from(payload.into_inner())?;
    let user = state.identity.signup(&details).await?;
    session.persist_user(&user.id)?;
    Ok(HttpResponse::Created().json(user))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// The signed-in account.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<User>> {
    let user_id = session.require_user_id()?;
    match state.identity.current_user(&user_id).await? {
        Some(user) => Ok(web::Json(user)),
        None => {
            info!(user_id = %user_id, "session refers to a missing account; clearing");
            session.clear();
            Err(Error::unauthorized("login required"))
        }
    }
}

/// Switch between Buyer and Seller.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/role",
    request_body = SwitchRoleBody,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Role missing", body = Error),
        (status = 403, description = "Role cannot be self-assigned", body = Error)
    ),
    tags = ["users"],
    operation_id = "switchRole"
)]
#[post("/users/me/role")]
pub async fn switch_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SwitchRoleBody>,
) -> ApiResult<web::Json<User>> {
    let user_id = session.require_user_id()?;
    let role = require(payload.into_inner().role, "role")?;
    Ok(web::Json(state.identity.switch_role(&user_id, role).await?))
}

/// Lift the free-tier quotas.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/premium",
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["users"],
    operation_id = "upgradeToPremium"
)]
#[post("/users/me/premium")]
pub async fn upgrade_to_premium(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<User>> {
    let user_id = session.require_user_id()?;
    Ok(web::Json(state.identity.upgrade_to_premium(&user_id).await?))
}

/// Purchases made by the caller with the bought project attached.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/purchases",
    responses(
        (status = 200, description = "Purchases, oldest first", body = [PurchaseWithProject]),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["users"],
    operation_id = "listMyPurchases"
)]
#[get("/users/me/purchases")]
pub async fn my_purchases(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<PurchaseWithProject>>> {
    let user_id = session.require_user_id()?;
    Ok(web::Json(state.library.user_purchases(&user_id).await?))
}

/// Listings uploaded by the caller.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/projects",
    responses(
        (status = 200, description = "Uploads", body = [Project]),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["users"],
    operation_id = "listMyProjects"
)]
#[get("/users/me/projects")]
pub async fn my_projects(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Project>>> {
    let user_id = session.require_user_id()?;
    Ok(web::Json(state.library.user_projects(&user_id).await?))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
