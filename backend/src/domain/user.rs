//! User identity, roles and account counters.
//!
//! Roles form a closed set. Behaviour that differs per role is expressed
//! through [`Role::can`] and [`Role::moderation_scope`] rather than by
//! comparing role names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ContentDomain;

/// Validation errors returned by user-facing constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyDisplayName,
    DisplayNameTooLong { max: usize },
    DisplayNameInvalidCharacters,
    EmptyEmail,
    InvalidEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::DisplayNameInvalidCharacters => {
                write!(f, "display name must not contain control characters")
            }
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like local@domain"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
///
/// The original string is kept so serialisation round-trips exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::UserId;
    ///
    /// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid");
    /// assert_eq!(id.as_ref(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Wrap an already parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a random identifier.
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.1
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Maximum display name length in characters.
pub const DISPLAY_NAME_MAX: usize = 64;

/// Human readable name shown next to listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a display name. Surrounding whitespace is
    /// trimmed.
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(display_name.into())
    }

    fn from_owned(display_name: String) -> Result<Self, UserValidationError> {
        let trimmed = display_name.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        if trimmed.chars().any(char::is_control) {
            return Err(UserValidationError::DisplayNameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Email address used as the unique account key.
///
/// Stored lower-cased so uniqueness checks are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::Email;
    ///
    /// let email = Email::new("  Jane@Example.com ").expect("valid");
    /// assert_eq!(email.as_ref(), "jane@example.com");
    /// ```
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let Some((local, domain)) = normalised.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        let well_formed = !local.is_empty()
            && !domain.is_empty()
            && !domain.contains('@')
            && !normalised.chars().any(char::is_whitespace);
        if !well_formed {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// List a new project in the catalog.
    UploadProject,
    /// Buy a listed project.
    PurchaseProject,
    /// Ask for bespoke development work.
    RequestCustomProject,
    /// Work on and submit an assigned custom project.
    FulfilCustomProject,
    /// Approve or reject pending catalog entries.
    ModerateContent,
    /// Assign custom projects and approve their delivery.
    ManageCustomProjects,
}

/// Which content domains an administrator may moderate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationScope {
    /// Every domain.
    All,
    /// A single domain.
    Domain(ContentDomain),
}

impl ModerationScope {
    /// Whether `domain` falls inside this scope.
    pub fn covers(self, domain: ContentDomain) -> bool {
        match self {
            Self::All => true,
            Self::Domain(scoped) => scoped == domain,
        }
    }
}

/// Closed set of account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Buyer,
    Seller,
    Admin,
    ProjectAdmin,
    PortfolioAdmin,
    #[serde(rename = "PhDAdmin")]
    PhdAdmin,
}

const CAPABILITIES: &[(Role, &[Capability])] = &[
    (
        Role::Buyer,
        &[Capability::PurchaseProject, Capability::RequestCustomProject],
    ),
    (
        Role::Seller,
        &[
            Capability::UploadProject,
            Capability::PurchaseProject,
            Capability::FulfilCustomProject,
        ],
    ),
    (
        Role::Admin,
        &[Capability::ModerateContent, Capability::ManageCustomProjects],
    ),
    (
        Role::ProjectAdmin,
        &[Capability::ModerateContent, Capability::ManageCustomProjects],
    ),
    (
        Role::PortfolioAdmin,
        &[Capability::ModerateContent, Capability::ManageCustomProjects],
    ),
    (
        Role::PhdAdmin,
        &[Capability::ModerateContent, Capability::ManageCustomProjects],
    ),
];

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Buyer,
        Self::Seller,
        Self::Admin,
        Self::ProjectAdmin,
        Self::PortfolioAdmin,
        Self::PhdAdmin,
    ];

    /// Look the role up in the capability table.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::{Capability, Role};
    ///
    /// assert!(Role::Seller.can(Capability::UploadProject));
    /// assert!(!Role::Buyer.can(Capability::UploadProject));
    /// ```
    pub fn can(self, capability: Capability) -> bool {
        CAPABILITIES
            .iter()
            .find(|(role, _)| *role == self)
            .is_some_and(|(_, granted)| granted.contains(&capability))
    }

    /// Domains this role moderates, or `None` for non-admin roles.
    pub fn moderation_scope(self) -> Option<ModerationScope> {
        match self {
            Self::Admin => Some(ModerationScope::All),
            Self::ProjectAdmin => Some(ModerationScope::Domain(ContentDomain::Project)),
            Self::PortfolioAdmin => Some(ModerationScope::Domain(ContentDomain::Portfolio)),
            Self::PhdAdmin => Some(ModerationScope::Domain(ContentDomain::Phd)),
            Self::Buyer | Self::Seller => None,
        }
    }

    /// Whether a user may switch themselves into this role.
    pub fn is_self_assignable(self) -> bool {
        matches!(self, Self::Buyer | Self::Seller)
    }

    /// Stable wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "Buyer",
            Self::Seller => "Seller",
            Self::Admin => "Admin",
            Self::ProjectAdmin => "ProjectAdmin",
            Self::PortfolioAdmin => "PortfolioAdmin",
            Self::PhdAdmin => "PhDAdmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role name is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{input}'")]
pub struct ParseRoleError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseRoleError {
                input: s.to_owned(),
            })
    }
}

/// Optional developer details for sellers who take custom work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperProfile {
    /// Technologies the developer works with.
    pub expertise: Vec<String>,
    /// Average rating, when reviews exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

/// A marketplace account.
///
/// `revision` starts at 1 and increases on every persisted change. Writers
/// pass the revision they read so concurrent updates are detected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    #[schema(value_type = String, example = "Jane Buyer")]
    pub display_name: DisplayName,
    #[schema(value_type = String, example = "jane@example.com")]
    pub email: Email,
    pub role: Role,
    pub project_uploads: u32,
    pub project_deletions: u32,
    pub is_premium: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer: Option<DeveloperProfile>,
    pub revision: u32,
}

impl User {
    /// Create a fresh account with zeroed counters.
    pub fn new(id: UserId, display_name: DisplayName, email: Email, role: Role) -> Self {
        Self {
            id,
            display_name,
            email,
            role,
            project_uploads: 0,
            project_deletions: 0,
            is_premium: false,
            developer: None,
            revision: 1,
        }
    }

    /// Shorthand for `self.role.can(capability)`.
    pub fn can(&self, capability: Capability) -> bool {
        self.role.can(capability)
    }

    /// Public view of the account shown alongside listings.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
            developer: self.developer.clone(),
        }
    }
}

/// Public user details without email or counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[schema(value_type = String)]
    pub id: UserId,
    #[schema(value_type = String)]
    pub display_name: DisplayName,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer: Option<DeveloperProfile>,
}

#[cfg(test)]
mod tests;
