//! Safe retries for listing creation and purchases.
//!
//! Clients send an `Idempotency-Key` header (a UUID). The service hashes the
//! canonical request payload and stores it with the response. A retry with
//! the same key and payload replays the stored response; the same key with a
//! different payload is a conflict. Keys are scoped per user and per
//! [`MutationType`].

mod config;
mod payload;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

pub use config::IdempotencyConfig;
pub use payload::{PayloadHash, canonicalize_and_hash};

/// Validation errors for [`IdempotencyKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdempotencyKeyValidationError {
    EmptyKey,
    InvalidKey,
}

impl fmt::Display for IdempotencyKeyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "idempotency key must not be empty"),
            Self::InvalidKey => write!(f, "idempotency key must be a valid UUID"),
        }
    }
}

impl std::error::Error for IdempotencyKeyValidationError {}

/// Client-provided idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdempotencyKey(Uuid);

impl IdempotencyKey {
    /// Parse a key from header text. Surrounding whitespace is rejected.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::IdempotencyKey;
    ///
    /// let key = IdempotencyKey::new("550e8400-e29b-41d4-a716-446655440000").expect("valid");
    /// assert_eq!(key.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    /// assert!(IdempotencyKey::new("retry-1").is_err());
    /// ```
    pub fn new(key: impl AsRef<str>) -> Result<Self, IdempotencyKeyValidationError> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(IdempotencyKeyValidationError::EmptyKey);
        }
        if key.trim() != key {
            return Err(IdempotencyKeyValidationError::InvalidKey);
        }
        Uuid::parse_str(key)
            .map(Self)
            .map_err(|_| IdempotencyKeyValidationError::InvalidKey)
    }

    /// Generate a random key.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<IdempotencyKey> for String {
    fn from(value: IdempotencyKey) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for IdempotencyKey {
    type Error = IdempotencyKeyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Operation a key protects. Keys never collide across operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationType {
    /// `POST /api/v1/projects`.
    CreateProject,
    /// `POST /api/v1/projects/{id}/purchase`.
    PurchaseProject,
}

impl MutationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateProject => "create_project",
            Self::PurchaseProject => "purchase_project",
        }
    }
}

impl fmt::Display for MutationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored response for a key.
#[derive(Debug, Clone, PartialEq)]
pub struct IdempotencyRecord {
    pub key: IdempotencyKey,
    pub mutation_type: MutationType,
    pub payload_hash: PayloadHash,
    pub response_snapshot: serde_json::Value,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Parameters for a key lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdempotencyLookupQuery {
    pub key: IdempotencyKey,
    pub user_id: UserId,
    pub mutation_type: MutationType,
    pub payload_hash: PayloadHash,
}

impl IdempotencyLookupQuery {
    pub fn new(
        key: IdempotencyKey,
        user_id: UserId,
        mutation_type: MutationType,
        payload_hash: PayloadHash,
    ) -> Self {
        Self {
            key,
            user_id,
            mutation_type,
            payload_hash,
        }
    }
}

/// Outcome of a key lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum IdempotencyLookupResult {
    /// No record exists for this key.
    NotFound,
    /// A record exists and the payload matches; replay it.
    MatchingPayload(IdempotencyRecord),
    /// A record exists for a different payload.
    ConflictingPayload(IdempotencyRecord),
}
