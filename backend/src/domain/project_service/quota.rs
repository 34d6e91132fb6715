//! Compare-and-swap quota reservation on the user record.

use serde_json::json;
use tracing::{debug, warn};

use super::ProjectService;
use crate::domain::access::load_session_user;
use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::quota::{release, reserve};
use crate::domain::repository_errors::map_user_error;
use crate::domain::{Error, QuotaAction, User, UserId};

/// Attempts before a contended reservation gives up.
pub(super) const MAX_QUOTA_ATTEMPTS: u32 = 5;

impl<P, U, B, I> ProjectService<P, U, B, I>
where
    U: UserRepository,
{
    /// Check and consume one slot of `action`'s allowance.
    ///
    /// `user` is the caller's latest snapshot; it is reloaded whenever a
    /// concurrent writer bumps the revision first.
    pub(super) async fn reserve_quota(
        &self,
        mut user: User,
        action: QuotaAction,
    ) -> Result<User, Error> {
        for attempt in 1..=MAX_QUOTA_ATTEMPTS {
            let expected = user.revision;
            let mut updated = user.clone();
            if let Err(exceeded) = reserve(&mut updated, action) {
                warn!(
                    user_id = %user.id,
                    %action,
                    used = exceeded.used,
                    limit = exceeded.limit,
                    "quota exceeded"
                );
                return Err(exceeded.into());
            }
            updated.revision = expected + 1;

            match self.users.save(&updated, expected).await {
                Ok(()) => return Ok(updated),
                Err(UserRepositoryError::RevisionMismatch { actual, .. }) => {
                    debug!(user_id = %user.id, attempt, expected, actual, "quota reservation raced");
                    user = load_session_user(self.users.as_ref(), &user.id).await?;
                }
                Err(err) => return Err(map_user_error(err)),
            }
        }

        warn!(user_id = %user.id, %action, "quota reservation abandoned after retries");
        Err(Error::conflict("account is being updated concurrently; retry")
            .with_details(json!({ "code": "quota_contention" })))
    }

    /// Give back a slot taken by [`Self::reserve_quota`]. Failures are logged.
    pub(super) async fn release_quota(&self, user_id: &UserId, action: QuotaAction) {
        for _ in 0..MAX_QUOTA_ATTEMPTS {
            let mut user = match self.users.find_by_id(user_id).await {
                Ok(Some(user)) => user,
                Ok(None) => return,
                Err(err) => {
                    warn!(%user_id, %action, error = %err, "quota release failed");
                    return;
                }
            };
            let expected = user.revision;
            release(&mut user, action);
            user.revision = expected + 1;
            match self.users.save(&user, expected).await {
                Ok(()) => return,
                Err(UserRepositoryError::RevisionMismatch { .. }) => {}
                Err(err) => {
                    warn!(%user_id, %action, error = %err, "quota release failed");
                    return;
                }
            }
        }
        warn!(%user_id, %action, "quota release abandoned after retries");
    }
}
