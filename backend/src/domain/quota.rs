//! Upload and deletion allowances for non-premium accounts.
//!
//! The check and the counter increment happen together in [`reserve`]. The
//! service persists the result with a revision compare-and-swap, so two
//! concurrent requests from one user cannot both pass on the same count.

use std::fmt;

use serde_json::json;

use super::{Error, User};

/// Actions a free account may perform a limited number of times.
pub const FREE_TIER_LIMIT: u32 = 3;

/// Remediation shown when a limit is reached.
pub const UPGRADE_HINT: &str = "upgrade to premium";

/// Counted account actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaAction {
    Upload,
    Delete,
}

impl fmt::Display for QuotaAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload => f.write_str("upload"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// The account has used its free allowance for `action`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{action} limit of {limit} reached; {hint}", hint = UPGRADE_HINT)]
pub struct QuotaExceeded {
    pub action: QuotaAction,
    pub used: u32,
    pub limit: u32,
}

impl QuotaExceeded {
    pub fn hint(&self) -> &'static str {
        UPGRADE_HINT
    }
}

impl From<QuotaExceeded> for Error {
    fn from(value: QuotaExceeded) -> Self {
        Error::forbidden(value.to_string()).with_details(json!({
            "code": "quota_exceeded",
            "action": value.action.to_string(),
            "used": value.used,
            "limit": value.limit,
            "hint": value.hint(),
        }))
    }
}

fn counter(user: &User, action: QuotaAction) -> u32 {
    match action {
        QuotaAction::Upload => user.project_uploads,
        QuotaAction::Delete => user.project_deletions,
    }
}

fn allows(user: &User, action: QuotaAction) -> bool {
    user.is_premium || counter(user, action) < FREE_TIER_LIMIT
}

/// `true` when the user is premium or has uploaded fewer than three times.
///
/// # Examples
/// ```
/// use marketplace::domain::{quota, DisplayName, Email, Role, User, UserId};
///
/// let mut user = User::new(
///     UserId::random(),
///     DisplayName::new("Sam").expect("valid"),
///     Email::new("sam@example.com").expect("valid"),
///     Role::Seller,
/// );
/// user.project_uploads = 3;
/// assert!(!quota::can_upload(&user));
/// user.is_premium = true;
/// assert!(quota::can_upload(&user));
/// ```
pub fn can_upload(user: &User) -> bool {
    allows(user, QuotaAction::Upload)
}

/// `true` when the user is premium or has deleted fewer than three times.
pub fn can_delete(user: &User) -> bool {
    allows(user, QuotaAction::Delete)
}

/// Check the allowance and bump the matching counter in one step.
///
/// Premium users are counted too; they are just never refused.
pub fn reserve(user: &mut User, action: QuotaAction) -> Result<(), QuotaExceeded> {
    if !allows(user, action) {
        return Err(QuotaExceeded {
            action,
            used: counter(user, action),
            limit: FREE_TIER_LIMIT,
        });
    }
    let slot = match action {
        QuotaAction::Upload => &mut user.project_uploads,
        QuotaAction::Delete => &mut user.project_deletions,
    };
    *slot = slot.saturating_add(1);
    Ok(())
}

/// Undo a [`reserve`] whose follow-up operation failed.
pub fn release(user: &mut User, action: QuotaAction) {
    let slot = match action {
        QuotaAction::Upload => &mut user.project_uploads,
        QuotaAction::Delete => &mut user.project_deletions,
    };
    *slot = slot.saturating_sub(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, Email, ErrorCode, Role, UserId};
    use rstest::{fixture, rstest};

    #[fixture]
    fn free_user() -> User {
        User::new(
            UserId::random(),
            DisplayName::new("Free Seller").expect("valid name"),
            Email::new("free@example.com").expect("valid email"),
            Role::Seller,
        )
    }

    #[rstest]
    #[case(0, true)]
    #[case(2, true)]
    #[case(3, false)]
    #[case(7, false)]
    fn upload_limit_for_free_users(mut free_user: User, #[case] uploads: u32, #[case] allowed: bool) {
        free_user.project_uploads = uploads;
        assert_eq!(can_upload(&free_user), allowed);
    }

    #[rstest]
    #[case(0, true)]
    #[case(3, false)]
    fn delete_limit_for_free_users(mut free_user: User, #[case] deletions: u32, #[case] allowed: bool) {
        free_user.project_deletions = deletions;
        assert_eq!(can_delete(&free_user), allowed);
    }

    #[rstest]
    fn premium_users_are_never_limited(mut free_user: User) {
        free_user.is_premium = true;
        free_user.project_uploads = 50;
        free_user.project_deletions = 50;
        assert!(can_upload(&free_user));
        assert!(can_delete(&free_user));
        assert!(reserve(&mut free_user, QuotaAction::Upload).is_ok());
        assert_eq!(free_user.project_uploads, 51);
    }

    #[rstest]
    fn fourth_reservation_fails(mut free_user: User) {
        for _ in 0..3 {
            reserve(&mut free_user, QuotaAction::Upload).expect("within allowance");
        }
        let err = reserve(&mut free_user, QuotaAction::Upload).expect_err("fourth upload");
        assert_eq!(
            err,
            QuotaExceeded {
                action: QuotaAction::Upload,
                used: 3,
                limit: FREE_TIER_LIMIT,
            }
        );
        assert_eq!(free_user.project_uploads, 3);
    }

    #[rstest]
    fn counters_are_independent(mut free_user: User) {
        free_user.project_uploads = 3;
        reserve(&mut free_user, QuotaAction::Delete).expect("deletes are counted separately");
        assert_eq!(free_user.project_deletions, 1);
    }

    #[rstest]
    fn release_undoes_reservation(mut free_user: User) {
        reserve(&mut free_user, QuotaAction::Delete).expect("reserve");
        release(&mut free_user, QuotaAction::Delete);
        assert_eq!(free_user.project_deletions, 0);
        release(&mut free_user, QuotaAction::Delete);
        assert_eq!(free_user.project_deletions, 0);
    }

    #[rstest]
    fn quota_error_carries_upgrade_hint() {
        let error: Error = QuotaExceeded {
            action: QuotaAction::Delete,
            used: 3,
            limit: 3,
        }
        .into();
        assert_eq!(error.code(), ErrorCode::Forbidden);
        assert_eq!(error.message(), "delete limit of 3 reached; upgrade to premium");
        let details = error.details().expect("details attached");
        assert_eq!(details["code"], "quota_exceeded");
        assert_eq!(details["hint"], "upgrade to premium");
    }
}
