//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed marketplace entities, the lifecycle and
//! quota rules that govern them, and the services that implement the driving
//! ports. Adapters live outside this module and talk to it only through
//! [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, Project, CustomProject, Purchase: the marketplace aggregates.
//! - CatalogueService, ProjectService, CustomProjectService,
//!   IdentityService: driving port implementations.

mod access;
pub mod auth;
pub mod catalogue;
mod catalogue_service;
pub mod custom_project;
mod custom_project_service;
pub mod error;
pub mod idempotency;
mod identity_service;
pub mod lifecycle;
pub mod ports;
pub mod project;
mod project_service;
pub mod purchase;
pub mod quota;
mod repository_errors;
pub mod trace_id;
pub mod user;

pub use self::auth::{CredentialsValidationError, LoginCredentials, SignupDetails};
pub use self::catalogue::ProjectFilter;
pub use self::catalogue_service::CatalogueService;
pub use self::custom_project::{
    Budget, CustomProject, CustomProjectInput, CustomProjectStatus, CustomProjectValidationError,
};
pub use self::custom_project_service::CustomProjectService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::idempotency::{
    IdempotencyConfig, IdempotencyKey, IdempotencyKeyValidationError, IdempotencyLookupQuery,
    IdempotencyLookupResult, IdempotencyRecord, MutationType, PayloadHash, canonicalize_and_hash,
};
pub use self::identity_service::IdentityService;
pub use self::lifecycle::{
    CustomProjectAction, InvalidTransition, LifecycleEntity, ProjectAction,
};
pub use self::project::{
    AmountValidationError, ContentDomain, DEFAULT_PROJECT_FILE, ParseContentDomainError, Price,
    Project, ProjectDetail, ProjectDraft, ProjectDraftInput, ProjectStatus,
    ProjectValidationError,
};
pub use self::project_service::ProjectService;
pub use self::purchase::{Purchase, PurchaseWithProject};
pub use self::quota::{FREE_TIER_LIMIT, QuotaAction, QuotaExceeded, UPGRADE_HINT};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Capability, DeveloperProfile, DisplayName, Email, ModerationScope, ParseRoleError, Role,
    User, UserId, UserProfile, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use marketplace::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
