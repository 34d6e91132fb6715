//! Session user resolution and capability checks shared by the services.

use serde_json::json;

use super::ports::UserRepository;
use super::repository_errors::map_user_error;
use super::{Capability, ContentDomain, Error, ModerationScope, User, UserId};

/// Load the account behind a session, failing with `unauthorized` when it no
/// longer exists.
pub(crate) async fn load_session_user<U>(users: &U, user_id: &UserId) -> Result<User, Error>
where
    U: UserRepository + ?Sized,
{
    users
        .find_by_id(user_id)
        .await
        .map_err(map_user_error)?
        .ok_or_else(|| Error::unauthorized("session user no longer exists"))
}

pub(crate) fn require_capability(user: &User, capability: Capability) -> Result<(), Error> {
    if user.can(capability) {
        return Ok(());
    }
    Err(Error::forbidden(format!("role {} is not permitted to do this", user.role))
        .with_details(json!({
            "role": user.role,
            "capability": capability,
            "code": "capability_denied",
        })))
}

/// The admin's moderation scope, or `forbidden` for non-admin roles.
pub(crate) fn require_moderator(user: &User) -> Result<ModerationScope, Error> {
    user.role.moderation_scope().ok_or_else(|| {
        Error::forbidden("admin role required").with_details(json!({
            "role": user.role,
            "code": "admin_required",
        }))
    })
}

pub(crate) fn require_scope(scope: ModerationScope, domain: ContentDomain) -> Result<(), Error> {
    if scope.covers(domain) {
        return Ok(());
    }
    Err(
        Error::forbidden(format!("{} content is outside your moderation scope", domain.as_str()))
            .with_details(json!({
                "domain": domain,
                "code": "outside_moderation_scope",
            })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, Role};
    use crate::test_support::user_with_role;
    use rstest::rstest;

    #[rstest]
    fn buyer_cannot_upload() {
        let error = require_capability(&user_with_role(Role::Buyer), Capability::UploadProject)
            .expect_err("buyers do not upload");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case(Role::Buyer)]
    #[case(Role::Seller)]
    fn non_admins_have_no_scope(#[case] role: Role) {
        assert!(require_moderator(&user_with_role(role)).is_err());
    }

    #[rstest]
    fn domain_admin_is_confined_to_domain() {
        let scope = require_moderator(&user_with_role(Role::PortfolioAdmin)).expect("admin");
        assert!(require_scope(scope, ContentDomain::Portfolio).is_ok());
        let error = require_scope(scope, ContentDomain::Phd).expect_err("outside scope");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }
}
