//! In-memory `IdempotencyRepository`.
//!
//! A key is claimed with an in-progress snapshot under the table lock, so
//! only one caller per key can run the mutation. Lookups do not filter by
//! age; `cleanup_expired` removes stale records and is run periodically by
//! the server.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::Clock;
use tokio::sync::Mutex;

use crate::domain::ports::{IdempotencyRepository, IdempotencyRepositoryError};
use crate::domain::{
    IdempotencyKey, IdempotencyLookupQuery, IdempotencyLookupResult, IdempotencyRecord,
    MutationType, UserId,
};

type RecordKey = (IdempotencyKey, UserId, MutationType);

fn record_key(query: &IdempotencyLookupQuery) -> RecordKey {
    (query.key.clone(), query.user_id.clone(), query.mutation_type)
}

pub struct MemoryIdempotencyRepository {
    records: Mutex<HashMap<RecordKey, IdempotencyRecord>>,
    clock: Arc<dyn Clock>,
}

impl MemoryIdempotencyRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl IdempotencyRepository for MemoryIdempotencyRepository {
    async fn lookup(
        &self,
        query: &IdempotencyLookupQuery,
    ) -> Result<IdempotencyLookupResult, IdempotencyRepositoryError> {
        let records = self.records.lock().await;
        Ok(match records.get(&record_key(query)) {
            None => IdempotencyLookupResult::NotFound,
            Some(record) if record.payload_hash == query.payload_hash => {
                IdempotencyLookupResult::MatchingPayload(record.clone())
            }
            Some(record) => IdempotencyLookupResult::ConflictingPayload(record.clone()),
        })
    }

    async fn store_in_progress(
        &self,
        record: &IdempotencyRecord,
    ) -> Result<(), IdempotencyRepositoryError> {
        let key = (
            record.key.clone(),
            record.user_id.clone(),
            record.mutation_type,
        );
        let mut records = self.records.lock().await;
        if records.contains_key(&key) {
            return Err(IdempotencyRepositoryError::duplicate_key(format!(
                "{} for {}",
                record.key, record.mutation_type
            )));
        }
        records.insert(key, record.clone());
        Ok(())
    }

    async fn update_response_snapshot(
        &self,
        query: &IdempotencyLookupQuery,
        response_snapshot: &serde_json::Value,
    ) -> Result<(), IdempotencyRepositoryError> {
        let mut records = self.records.lock().await;
        let record = records
            .get_mut(&record_key(query))
            .filter(|record| record.payload_hash == query.payload_hash)
            .ok_or_else(|| {
                IdempotencyRepositoryError::query(format!(
                    "no claim for {} on {}",
                    query.key, query.mutation_type
                ))
            })?;
        record.response_snapshot = response_snapshot.clone();
        Ok(())
    }

    async fn release(
        &self,
        query: &IdempotencyLookupQuery,
    ) -> Result<(), IdempotencyRepositoryError> {
        let mut records = self.records.lock().await;
        let key = record_key(query);
        if records
            .get(&key)
            .is_some_and(|record| record.payload_hash == query.payload_hash)
        {
            records.remove(&key);
        }
        Ok(())
    }

    async fn cleanup_expired(&self, ttl: Duration) -> Result<u64, IdempotencyRepositoryError> {
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|err| IdempotencyRepositoryError::query(format!("invalid ttl: {err}")))?;
        let cutoff = self.clock.utc() - ttl;
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| record.created_at >= cutoff);
        Ok(u64::try_from(before - records.len()).unwrap_or(u64::MAX))
    }
}
