//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn seller() -> User {
    User::new(
        UserId::new(VALID_ID).expect("fixture id is valid"),
        DisplayName::new("John Seller").expect("fixture name is valid"),
        Email::new("john@example.com").expect("fixture email is valid"),
        Role::Seller,
    )
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_invalid_input(#[case] input: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(input), Err(expected));
}

#[rstest]
#[case("   ", UserValidationError::EmptyDisplayName)]
#[case("bad\u{7}name", UserValidationError::DisplayNameInvalidCharacters)]
fn display_name_rejects_invalid_input(
    #[case] input: &str,
    #[case] expected: UserValidationError,
) {
    assert_eq!(DisplayName::new(input), Err(expected));
}

#[rstest]
fn display_name_rejects_overlong_input() {
    let result = DisplayName::new("a".repeat(DISPLAY_NAME_MAX + 1));
    assert_eq!(
        result,
        Err(UserValidationError::DisplayNameTooLong {
            max: DISPLAY_NAME_MAX
        })
    );
}

#[rstest]
fn display_name_trims_whitespace() {
    let name = DisplayName::new("  Jane Buyer ").expect("valid name");
    assert_eq!(name.as_ref(), "Jane Buyer");
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("jane.example.com", UserValidationError::InvalidEmail)]
#[case("@example.com", UserValidationError::InvalidEmail)]
#[case("jane@", UserValidationError::InvalidEmail)]
#[case("ja ne@example.com", UserValidationError::InvalidEmail)]
#[case("a@b@c", UserValidationError::InvalidEmail)]
fn email_rejects_invalid_input(#[case] input: &str, #[case] expected: UserValidationError) {
    assert_eq!(Email::new(input), Err(expected));
}

#[rstest]
fn email_is_lower_cased() {
    let email = Email::new("Jane@Example.COM").expect("valid email");
    assert_eq!(email.as_ref(), "jane@example.com");
}

#[rstest]
#[case(Role::Buyer, Capability::PurchaseProject, true)]
#[case(Role::Buyer, Capability::UploadProject, false)]
#[case(Role::Buyer, Capability::RequestCustomProject, true)]
#[case(Role::Seller, Capability::UploadProject, true)]
#[case(Role::Seller, Capability::FulfilCustomProject, true)]
#[case(Role::Seller, Capability::ModerateContent, false)]
#[case(Role::Admin, Capability::ModerateContent, true)]
#[case(Role::PhdAdmin, Capability::ManageCustomProjects, true)]
#[case(Role::PortfolioAdmin, Capability::UploadProject, false)]
fn capability_table(#[case] role: Role, #[case] capability: Capability, #[case] expected: bool) {
    assert_eq!(role.can(capability), expected);
}

#[rstest]
#[case(Role::Admin, ContentDomain::Phd, true)]
#[case(Role::ProjectAdmin, ContentDomain::Project, true)]
#[case(Role::ProjectAdmin, ContentDomain::Portfolio, false)]
#[case(Role::PortfolioAdmin, ContentDomain::Portfolio, true)]
#[case(Role::PhdAdmin, ContentDomain::Project, false)]
fn moderation_scope_is_domain_bound(
    #[case] role: Role,
    #[case] domain: ContentDomain,
    #[case] expected: bool,
) {
    let scope = role.moderation_scope().expect("admin roles have a scope");
    assert_eq!(scope.covers(domain), expected);
}

#[rstest]
#[case(Role::Buyer)]
#[case(Role::Seller)]
fn non_admin_roles_have_no_moderation_scope(#[case] role: Role) {
    assert!(role.moderation_scope().is_none());
}

#[rstest]
fn only_buyer_and_seller_are_self_assignable() {
    let assignable: Vec<Role> = Role::ALL
        .into_iter()
        .filter(|role| role.is_self_assignable())
        .collect();
    assert_eq!(assignable, vec![Role::Buyer, Role::Seller]);
}

#[rstest]
fn role_wire_names_round_trip() {
    for role in Role::ALL {
        let value = serde_json::to_value(role).expect("role serialises");
        assert_eq!(value, json!(role.as_str()));
        assert_eq!(role.as_str().parse::<Role>(), Ok(role));
    }
}

#[rstest]
fn role_parse_rejects_unknown_names() {
    let err = "Superuser".parse::<Role>().expect_err("unknown role");
    assert_eq!(err.input, "Superuser");
}

#[rstest]
fn new_user_starts_with_zeroed_counters(seller: User) {
    assert_eq!(seller.project_uploads, 0);
    assert_eq!(seller.project_deletions, 0);
    assert!(!seller.is_premium);
    assert_eq!(seller.revision, 1);
}

#[rstest]
fn user_serialises_camel_case(seller: User) {
    let value = serde_json::to_value(&seller).expect("user serialises");
    assert_eq!(value["displayName"], json!("John Seller"));
    assert_eq!(value["projectUploads"], json!(0));
    assert_eq!(value["isPremium"], json!(false));
    assert!(value.get("developer").is_none());
}

#[rstest]
fn profile_omits_private_fields(seller: User) {
    let value = serde_json::to_value(seller.profile()).expect("profile serialises");
    assert!(value.get("email").is_none());
    assert!(value.get("projectUploads").is_none());
    assert_eq!(value["role"], json!("Seller"));
}
