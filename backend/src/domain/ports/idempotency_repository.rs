//! Port abstraction for idempotency record persistence.
//!
//! Lookups are scoped by user and [`MutationType`] so a key reused by another
//! account or for another operation never replays someone else's response.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{IdempotencyLookupQuery, IdempotencyLookupResult, IdempotencyRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by idempotency repository adapters.
    pub enum IdempotencyRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "idempotency repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "idempotency repository query failed: {message}",
        /// Response serialization or deserialization failed.
        Serialization { message: String } => "idempotency repository serialization failed: {message}",
        /// A record with this key already exists (concurrent insert race).
        DuplicateKey { message: String } => "idempotency key already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdempotencyRepository: Send + Sync {
    /// Look up a key for the query's user and mutation type.
    ///
    /// Returns [`IdempotencyLookupResult::MatchingPayload`] when the stored
    /// hash equals the query hash and
    /// [`IdempotencyLookupResult::ConflictingPayload`] otherwise.
    async fn lookup(
        &self,
        query: &IdempotencyLookupQuery,
    ) -> Result<IdempotencyLookupResult, IdempotencyRepositoryError>;

    /// Claim a key by storing `record` with its in-progress snapshot. Fails
    /// with `DuplicateKey` when the key is already stored for the same user
    /// and mutation type, whatever its payload or state.
    async fn store_in_progress(
        &self,
        record: &IdempotencyRecord,
    ) -> Result<(), IdempotencyRepositoryError>;

    /// Replace the snapshot of a claimed key with the finished response.
    async fn update_response_snapshot(
        &self,
        query: &IdempotencyLookupQuery,
        response_snapshot: &serde_json::Value,
    ) -> Result<(), IdempotencyRepositoryError>;

    /// Drop a claim so the key can be used again. Missing keys are ignored.
    async fn release(&self, query: &IdempotencyLookupQuery)
    -> Result<(), IdempotencyRepositoryError>;

    /// Remove records older than `ttl`, returning how many were removed.
    async fn cleanup_expired(&self, ttl: Duration) -> Result<u64, IdempotencyRepositoryError>;
}

/// Always reports `NotFound` and discards stored records.
///
/// Use in tests where replay behaviour is not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdempotencyRepository;

#[async_trait]
impl IdempotencyRepository for FixtureIdempotencyRepository {
    async fn lookup(
        &self,
        _query: &IdempotencyLookupQuery,
    ) -> Result<IdempotencyLookupResult, IdempotencyRepositoryError> {
        Ok(IdempotencyLookupResult::NotFound)
    }

    async fn store_in_progress(
        &self,
        _record: &IdempotencyRecord,
    ) -> Result<(), IdempotencyRepositoryError> {
        Ok(())
    }

    async fn update_response_snapshot(
        &self,
        _query: &IdempotencyLookupQuery,
        _response_snapshot: &serde_json::Value,
    ) -> Result<(), IdempotencyRepositoryError> {
        Ok(())
    }

    async fn release(
        &self,
        _query: &IdempotencyLookupQuery,
    ) -> Result<(), IdempotencyRepositoryError> {
        Ok(())
    }

    async fn cleanup_expired(&self, _ttl: Duration) -> Result<u64, IdempotencyRepositoryError> {
        Ok(0)
    }
}
