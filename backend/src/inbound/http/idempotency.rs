//! `Idempotency-Key` header parsing.

use actix_web::http::header::HeaderMap;
use serde_json::json;

use crate::domain::{Error, IdempotencyKey, IdempotencyKeyValidationError};

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// The key sent with the request, if any. Malformed keys are a 400.
pub fn idempotency_key(headers: &HeaderMap) -> Result<Option<IdempotencyKey>, Error> {
    let Some(value) = headers.get(IDEMPOTENCY_KEY_HEADER) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| invalid_key(IdempotencyKeyValidationError::InvalidKey))?;
    IdempotencyKey::new(raw).map(Some).map_err(invalid_key)
}

fn invalid_key(err: IdempotencyKeyValidationError) -> Error {
    Error::invalid_request(format!("{IDEMPOTENCY_KEY_HEADER} header: {err}"))
        .with_details(json!({ "field": IDEMPOTENCY_KEY_HEADER, "code": "invalid_idempotency_key" }))
}
