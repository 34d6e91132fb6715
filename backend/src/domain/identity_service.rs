//! Account registration, login and self-service account changes.
//!
//! Passwords are validated for presence and then dropped; they are held in
//! zeroising buffers and never stored.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use super::access::load_session_user;
use super::ports::{IdentityCommand, UserRepository, UserRepositoryError};
use super::repository_errors::map_user_error;
use super::{Error, LoginCredentials, Role, SignupDetails, User, UserId};

/// Attempts before a contended account update gives up.
const MAX_UPDATE_ATTEMPTS: u32 = 3;

/// Implements [`IdentityCommand`] over a [`UserRepository`].
#[derive(Clone)]
pub struct IdentityService<U> {
    users: Arc<U>,
}

impl<U> IdentityService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

fn authentication_failed() -> Error {
    Error::unauthorized("authentication failed")
        .with_details(json!({ "code": "authentication_failed" }))
}

impl<U> IdentityService<U>
where
    U: UserRepository,
{
    /// Apply `change` with compare-and-swap, reloading on revision races.
    /// `change` returns `false` when the account already has the target state.
    async fn update_user<F>(&self, user_id: &UserId, change: F) -> Result<User, Error>
    where
        F: Fn(&mut User) -> bool + Send + Sync,
    {
        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let mut user = load_session_user(self.users.as_ref(), user_id).await?;
            let expected = user.revision;
            if !change(&mut user) {
                return Ok(user);
            }
            user.revision = expected + 1;
            match self.users.save(&user, expected).await {
                Ok(()) => return Ok(user),
                Err(UserRepositoryError::RevisionMismatch { actual, .. }) => {
                    debug!(%user_id, attempt, expected, actual, "account update raced");
                }
                Err(err) => return Err(map_user_error(err)),
            }
        }
        Err(Error::conflict("account is being updated concurrently; retry")
            .with_details(json!({ "code": "revision_mismatch" })))
    }
}

#[async_trait]
impl<U> IdentityCommand for IdentityService<U>
where
    U: UserRepository,
{
    async fn current_user(&self, user_id: &UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(user_id).await.map_err(map_user_error)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?;
        match user {
            Some(user) => {
                info!(user_id = %user.id, role = %user.role, "user logged in");
                Ok(user)
            }
            None => {
                warn!("login rejected");
                Err(authentication_failed())
            }
        }
    }

    async fn signup(&self, details: &SignupDetails) -> Result<User, Error> {
        let user = User::new(
            UserId::random(),
            details.display_name().clone(),
            details.email().clone(),
            details.role(),
        );
        self.users.insert(&user).await.map_err(|err| {
            if matches!(err, UserRepositoryError::DuplicateEmail { .. }) {
                warn!("signup rejected: email already registered");
            }
            map_user_error(err)
        })?;
        info!(user_id = %user.id, role = %user.role, "user signed up");
        Ok(user)
    }

    async fn switch_role(&self, user_id: &UserId, role: Role) -> Result<User, Error> {
        if !role.is_self_assignable() {
            return Err(Error::forbidden(format!("role {role} cannot be self-assigned"))
                .with_details(json!({
                    "role": role,
                    "code": "role_not_self_assignable",
                })));
        }
        let current = load_session_user(self.users.as_ref(), user_id).await?;
        if !current.role.is_self_assignable() {
            return Err(Error::forbidden("admin accounts cannot switch role").with_details(
                json!({
                    "role": current.role,
                    "code": "role_not_self_assignable",
                }),
            ));
        }

        let user = self
            .update_user(user_id, |user| {
                if user.role == role {
                    return false;
                }
                user.role = role;
                true
            })
            .await?;
        info!(%user_id, role = %user.role, "user switched role");
        Ok(user)
    }

    async fn upgrade_to_premium(&self, user_id: &UserId) -> Result<User, Error> {
        let user = self
            .update_user(user_id, |user| !std::mem::replace(&mut user.is_premium, true))
            .await?;
        info!(%user_id, "user upgraded to premium");
        Ok(user)
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
