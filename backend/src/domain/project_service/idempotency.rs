//! Replay of stored responses for retried listing creations and purchases.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::{debug, error, warn};

use super::ProjectService;
use crate::domain::ports::{
    CreateProjectResponse, IdempotencyRepository, IdempotencyRepositoryError,
    PurchaseProjectResponse,
};
use crate::domain::repository_errors::map_idempotency_error;
use crate::domain::{
    Error, IdempotencyKey, IdempotencyLookupQuery, IdempotencyLookupResult, IdempotencyRecord,
    MutationType, PayloadHash, UserId,
};

#[derive(Debug, Clone)]
pub(super) struct IdempotencyContext {
    key: IdempotencyKey,
    user_id: UserId,
    mutation_type: MutationType,
    payload_hash: PayloadHash,
}

impl IdempotencyContext {
    pub(super) fn new(
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

    fn lookup_query(&self) -> IdempotencyLookupQuery {
        IdempotencyLookupQuery::new(
            self.key.clone(),
            self.user_id.clone(),
            self.mutation_type,
            self.payload_hash.clone(),
        )
    }

    fn record(
        &self,
        response_snapshot: serde_json::Value,
        created_at: DateTime<Utc>,
    ) -> IdempotencyRecord {
        IdempotencyRecord {
            key: self.key.clone(),
            mutation_type: self.mutation_type,
            payload_hash: self.payload_hash.clone(),
            response_snapshot,
            user_id: self.user_id.clone(),
            created_at,
        }
    }
}

pub(super) trait HasReplayFlag {
    fn mark_replayed(&mut self);
}

impl HasReplayFlag for CreateProjectResponse {
    fn mark_replayed(&mut self) {
        self.replayed = true;
    }
}

impl HasReplayFlag for PurchaseProjectResponse {
    fn mark_replayed(&mut self) {
        self.replayed = true;
    }
}

const IDEMPOTENCY_STATE_KEY: &str = "__idempotency_state";
const IDEMPOTENCY_STATE_IN_PROGRESS: &str = "in_progress";
const CLAIM_MAX_ATTEMPTS: usize = 20;
const CLAIM_RETRY_DELAY: Duration = Duration::from_millis(25);

fn in_progress_snapshot() -> serde_json::Value {
    json!({ IDEMPOTENCY_STATE_KEY: IDEMPOTENCY_STATE_IN_PROGRESS })
}

fn is_in_progress(response_snapshot: &serde_json::Value) -> bool {
    response_snapshot
        .get(IDEMPOTENCY_STATE_KEY)
        .and_then(serde_json::Value::as_str)
        == Some(IDEMPOTENCY_STATE_IN_PROGRESS)
}

fn key_reused() -> Error {
    Error::conflict("idempotency key already used with different payload")
}

fn replay<T>(snapshot: serde_json::Value) -> Result<T, Error>
where
    T: DeserializeOwned + HasReplayFlag,
{
    let mut response: T = serde_json::from_value(snapshot)
        .map_err(|err| Error::internal(format!("failed to deserialize response: {err}")))?;
    response.mark_replayed();
    Ok(response)
}

impl<P, U, B, I> ProjectService<P, U, B, I>
where
    I: IdempotencyRepository,
{
    /// Run `operation` at most once per key.
    ///
    /// The key is claimed with an in-progress record before `operation`
    /// runs. Callers that lose the claim wait for the holder to finish and
    /// replay its response; a failed operation releases the claim so the key
    /// can be retried.
    pub(super) async fn handle_idempotent<T, F, Fut>(
        &self,
        context: IdempotencyContext,
        operation: F,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned + Serialize + HasReplayFlag,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let query = context.lookup_query();
        let claim = context.record(in_progress_snapshot(), self.clock.utc());

        for attempt in 1..=CLAIM_MAX_ATTEMPTS {
            match self.idempotency.store_in_progress(&claim).await {
                Ok(()) => return self.run_claimed(&query, operation).await,
                Err(IdempotencyRepositoryError::DuplicateKey { .. }) => {}
                Err(err) => return Err(map_idempotency_error(err)),
            }

            let lookup = self
                .idempotency
                .lookup(&query)
                .await
                .map_err(map_idempotency_error)?;
            match lookup {
                IdempotencyLookupResult::MatchingPayload(record)
                    if !is_in_progress(&record.response_snapshot) =>
                {
                    debug!(
                        key = %context.key,
                        mutation = %context.mutation_type,
                        "replaying stored response"
                    );
                    return replay(record.response_snapshot);
                }
                IdempotencyLookupResult::ConflictingPayload(_) => return Err(key_reused()),
                IdempotencyLookupResult::MatchingPayload(_) => {
                    debug!(
                        key = %context.key,
                        mutation = %context.mutation_type,
                        attempt,
                        "waiting for in-flight request"
                    );
                }
                // Released between the claim and the lookup; claim again.
                IdempotencyLookupResult::NotFound => {}
            }

            if attempt < CLAIM_MAX_ATTEMPTS {
                tokio::time::sleep(CLAIM_RETRY_DELAY).await;
            }
        }

        warn!(
            key = %context.key,
            mutation = %context.mutation_type,
            "idempotent request still in progress after retries"
        );
        Err(Error::service_unavailable(
            "idempotent request is still in progress; retry shortly",
        ))
    }

    async fn run_claimed<T, F, Fut>(
        &self,
        query: &IdempotencyLookupQuery,
        operation: F,
    ) -> Result<T, Error>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let outcome = match operation().await {
            Ok(response) => serde_json::to_value(&response)
                .map(|snapshot| (response, snapshot))
                .map_err(|err| Error::internal(format!("failed to serialize response: {err}"))),
            Err(err) => Err(err),
        };
        let (response, snapshot) = match outcome {
            Ok(done) => done,
            Err(err) => {
                if let Err(release_err) = self.idempotency.release(query).await {
                    warn!(
                        key = %query.key,
                        error = %release_err,
                        "failed to release idempotency claim"
                    );
                }
                return Err(err);
            }
        };

        self.idempotency
            .update_response_snapshot(query, &snapshot)
            .await
            .map_err(|err| {
                error!(
                    key = %query.key,
                    error = %err,
                    "mutation applied but response snapshot not stored"
                );
                map_idempotency_error(err)
            })?;
        Ok(response)
    }
}
