//! Translation of driven-port failures into API errors.
//!
//! Connection failures surface as `service_unavailable`, query failures as
//! `internal`, and revision mismatches as `conflict` with the revisions in
//! `details`.

use serde_json::json;
use uuid::Uuid;

use super::Error;
use super::ports::{
    CustomProjectRepositoryError, IdempotencyRepositoryError, ProjectRepositoryError,
    PurchaseRepositoryError, UserRepositoryError,
};

pub(crate) fn revision_conflict(expected: Option<u32>, actual: u32) -> Error {
    Error::conflict("revision mismatch").with_details(json!({
        "expectedRevision": expected,
        "actualRevision": actual,
        "code": "revision_mismatch",
    }))
}

pub(crate) fn project_not_found(project_id: Uuid) -> Error {
    Error::not_found("project not found").with_details(json!({
        "projectId": project_id,
        "code": "project_not_found",
    }))
}

pub(crate) fn custom_project_not_found(custom_project_id: Uuid) -> Error {
    Error::not_found("custom project not found").with_details(json!({
        "customProjectId": custom_project_id,
        "code": "custom_project_not_found",
    }))
}

pub(crate) fn user_not_found(user_id: &str) -> Error {
    Error::not_found("user not found").with_details(json!({
        "userId": user_id,
        "code": "user_not_found",
    }))
}

pub(crate) fn duplicate_email(email: &str) -> Error {
    Error::conflict("email already registered").with_details(json!({
        "email": email,
        "code": "duplicate_email",
    }))
}

pub(crate) fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail { email } => duplicate_email(&email),
        UserRepositoryError::RevisionMismatch { expected, actual } => {
            revision_conflict(Some(expected), actual)
        }
        UserRepositoryError::NotFound { user_id } => user_not_found(&user_id),
    }
}

pub(crate) fn map_project_error(error: ProjectRepositoryError) -> Error {
    match error {
        ProjectRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("project repository unavailable: {message}"))
        }
        ProjectRepositoryError::Query { message } => {
            Error::internal(format!("project repository error: {message}"))
        }
        ProjectRepositoryError::RevisionMismatch { expected, actual } => {
            revision_conflict((expected > 0).then_some(expected), actual)
        }
        ProjectRepositoryError::NotFound { project_id } => project_not_found(project_id),
    }
}

pub(crate) fn map_custom_project_error(error: CustomProjectRepositoryError) -> Error {
    match error {
        CustomProjectRepositoryError::Connection { message } => Error::service_unavailable(
            format!("custom project repository unavailable: {message}"),
        ),
        CustomProjectRepositoryError::Query { message } => {
            Error::internal(format!("custom project repository error: {message}"))
        }
        CustomProjectRepositoryError::RevisionMismatch { expected, actual } => {
            revision_conflict((expected > 0).then_some(expected), actual)
        }
        CustomProjectRepositoryError::NotFound { custom_project_id } => {
            custom_project_not_found(custom_project_id)
        }
    }
}

pub(crate) fn map_purchase_error(error: PurchaseRepositoryError) -> Error {
    match error {
        PurchaseRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("purchase repository unavailable: {message}"))
        }
        PurchaseRepositoryError::Query { message } => {
            Error::internal(format!("purchase repository error: {message}"))
        }
        PurchaseRepositoryError::AlreadyPurchased { project_id } => {
            Error::conflict("project already purchased").with_details(json!({
                "projectId": project_id,
                "code": "already_purchased",
            }))
        }
    }
}

pub(crate) fn map_idempotency_error(error: IdempotencyRepositoryError) -> Error {
    match error {
        IdempotencyRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("idempotency repository unavailable: {message}"))
        }
        IdempotencyRepositoryError::Query { message } => {
            Error::internal(format!("idempotency repository error: {message}"))
        }
        IdempotencyRepositoryError::Serialization { message } => Error::internal(format!(
            "idempotency repository serialization failed: {message}"
        )),
        IdempotencyRepositoryError::DuplicateKey { message } => {
            Error::internal(format!("unexpected idempotency key conflict: {message}"))
        }
    }
}
