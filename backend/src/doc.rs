//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `inbound::http`, the domain
//! schemas they exchange, and the session cookie security scheme. Swagger UI
//! serves it in debug builds and `openapi-dump` exports it for tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Budget, ContentDomain, CustomProject, CustomProjectStatus, DeveloperProfile, Error, ErrorCode,
    Price, Project, ProjectDetail, ProjectStatus, Purchase, PurchaseWithProject, Role, User,
    UserProfile,
};
use crate::inbound::http::custom_projects::{AssignBody, CustomProjectBody, DeliverBody, SubmitBody};
use crate::inbound::http::projects::{CreateProjectBody, DownloadResponse, RejectBody};
use crate::inbound::http::users::{LoginBody, SignupBody, SwitchRoleBody};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /api/v1/signup.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Marketplace backend API",
        description = "Catalog, listing moderation, purchases and custom project commissions."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::signup,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::switch_role,
        crate::inbound::http::users::upgrade_to_premium,
        crate::inbound::http::users::my_purchases,
        crate::inbound::http::users::my_projects,
        crate::inbound::http::projects::list_projects,
        crate::inbound::http::projects::list_tags,
        crate::inbound::http::projects::get_project,
        crate::inbound::http::projects::create_project,
        crate::inbound::http::projects::delete_project,
        crate::inbound::http::projects::approve_project,
        crate::inbound::http::projects::reject_project,
        crate::inbound::http::projects::purchase_project,
        crate::inbound::http::projects::download_project,
        crate::inbound::http::custom_projects::request_custom_project,
        crate::inbound::http::custom_projects::list_custom_projects,
        crate::inbound::http::custom_projects::assign_custom_project,
        crate::inbound::http::custom_projects::start_custom_project,
        crate::inbound::http::custom_projects::submit_custom_project,
        crate::inbound::http::custom_projects::approve_custom_project,
        crate::inbound::http::admin::pending_projects,
        crate::inbound::http::admin::list_sellers,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        UserProfile,
        Role,
        DeveloperProfile,
        Project,
        ProjectDetail,
        ProjectStatus,
        ContentDomain,
        Price,
        Purchase,
        PurchaseWithProject,
        CustomProject,
        CustomProjectStatus,
        Budget,
        CreateProjectBody,
        RejectBody,
        DownloadResponse,
        CustomProjectBody,
        AssignBody,
        SubmitBody,
        DeliverBody,
        LoginBody,
        SignupBody,
        SwitchRoleBody,
    )),
    tags(
        (name = "users", description = "Accounts, sessions and a user's library"),
        (name = "projects", description = "Catalog, listings and purchases"),
        (name = "moderation", description = "Admin review of pending listings"),
        (name = "custom-projects", description = "Commissioned work between buyers and sellers"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
