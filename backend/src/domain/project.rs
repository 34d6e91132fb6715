//! Catalog listings.
//!
//! A [`Project`] is created in [`ProjectStatus::Pending`] from a validated
//! [`ProjectDraft`]. Status changes go through the transition table in
//! [`crate::domain::lifecycle`]; fields here are plain data.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{UserId, UserProfile};

/// File name used when a seller uploads without listing files.
pub const DEFAULT_PROJECT_FILE: &str = "project-files.zip";

/// Content area a listing or request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentDomain {
    Project,
    Portfolio,
    Phd,
}

impl ContentDomain {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Portfolio => "portfolio",
            Self::Phd => "phd",
        }
    }
}

impl fmt::Display for ContentDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for unknown domain names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown content domain '{input}'; expected project, portfolio or phd")]
pub struct ParseContentDomainError {
    pub input: String,
}

impl FromStr for ContentDomain {
    type Err = ParseContentDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(Self::Project),
            "portfolio" => Ok(Self::Portfolio),
            "phd" => Ok(Self::Phd),
            other => Err(ParseContentDomainError {
                input: other.to_owned(),
            }),
        }
    }
}

/// Listing status. `Available` is accepted as a legacy spelling of
/// `Approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ProjectStatus {
    Pending,
    #[serde(alias = "Available")]
    Approved,
    Rejected,
    Sold,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Sold => "Sold",
        }
    }

    /// Whether no further transitions exist.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Sold)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for monetary amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AmountValidationError {
    #[error("amount must be a finite number")]
    NotFinite,
    #[error("amount must not be negative")]
    Negative,
    #[error("amount must be greater than zero")]
    NotPositive,
}

/// Listing price. Zero means free.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "f64", into = "f64")]
#[schema(value_type = f64, example = 49.0)]
pub struct Price(f64);

impl Price {
    /// A price of zero.
    pub const FREE: Self = Self(0.0);

    /// Validate a price.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::Price;
    ///
    /// assert!(Price::new(19.0).is_ok());
    /// assert!(Price::new(-1.0).is_err());
    /// ```
    pub fn new(amount: f64) -> Result<Self, AmountValidationError> {
        if !amount.is_finite() {
            return Err(AmountValidationError::NotFinite);
        }
        if amount < 0.0 {
            return Err(AmountValidationError::Negative);
        }
        Ok(Self(amount))
    }

    pub fn amount(self) -> f64 {
        self.0
    }

    pub fn is_free(self) -> bool {
        self.0 == 0.0
    }
}

impl TryFrom<f64> for Price {
    type Error = AmountValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for f64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

/// Validation errors for a new listing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("at least one tag is required")]
    NoTags,
    #[error("an image reference is required")]
    EmptyImage,
    #[error("price is invalid: {0}")]
    Price(#[from] AmountValidationError),
}

impl ProjectValidationError {
    /// Request field the error relates to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "title",
            Self::EmptyDescription => "description",
            Self::NoTags => "tags",
            Self::EmptyImage => "image",
            Self::Price(_) => "price",
        }
    }
}

/// Validated seller input for a new listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    title: String,
    description: String,
    tags: Vec<String>,
    link: Option<String>,
    image: String,
    price: Price,
    domain: ContentDomain,
    files: Vec<String>,
}

/// Raw listing fields as received from a client.
#[derive(Debug, Clone, Default)]
pub struct ProjectDraftInput {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub link: Option<String>,
    pub image: String,
    pub price: f64,
    pub domain: Option<ContentDomain>,
    pub files: Vec<String>,
}

fn non_blank(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .collect()
}

impl ProjectDraft {
    /// Validate raw listing input.
    ///
    /// Blank tags and file names are dropped. When no files remain the list
    /// defaults to [`DEFAULT_PROJECT_FILE`]. A missing domain defaults to
    /// [`ContentDomain::Project`].
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::{ProjectDraft, ProjectDraftInput};
    ///
    /// let draft = ProjectDraft::try_from_input(ProjectDraftInput {
    ///     title: "Kanban board".into(),
    ///     description: "Drag and drop tasks".into(),
    ///     tags: vec!["Vue.js".into(), " ".into()],
    ///     image: "https://img.example/kanban.png".into(),
    ///     ..ProjectDraftInput::default()
    /// })
    /// .expect("valid draft");
    /// assert_eq!(draft.tags(), ["Vue.js"]);
    /// assert_eq!(draft.files(), ["project-files.zip"]);
    /// ```
    pub fn try_from_input(input: ProjectDraftInput) -> Result<Self, ProjectValidationError> {
        let ProjectDraftInput {
            title,
            description,
            tags,
            link,
            image,
            price,
            domain,
            files,
        } = input;

        let title = title.trim().to_owned();
        if title.is_empty() {
            return Err(ProjectValidationError::EmptyTitle);
        }
        let description = description.trim().to_owned();
        if description.is_empty() {
            return Err(ProjectValidationError::EmptyDescription);
        }
        let tags = non_blank(tags);
        if tags.is_empty() {
            return Err(ProjectValidationError::NoTags);
        }
        let image = image.trim().to_owned();
        if image.is_empty() {
            return Err(ProjectValidationError::EmptyImage);
        }
        let price = Price::new(price)?;
        let mut files = non_blank(files);
        if files.is_empty() {
            files.push(DEFAULT_PROJECT_FILE.to_owned());
        }
        let link = link
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        Ok(Self {
            title,
            description,
            tags,
            link,
            image,
            price,
            domain: domain.unwrap_or(ContentDomain::Project),
            files,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn domain(&self) -> ContentDomain {
        self.domain
    }
}

/// A catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub image: String,
    pub price: Price,
    pub status: ProjectStatus,
    #[schema(value_type = String)]
    pub owner_id: UserId,
    pub domain: ContentDomain,
    pub files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub approved_by: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub revision: u32,
}

impl Project {
    /// Materialise a draft as a pending listing owned by `owner_id`.
    pub fn from_draft(id: Uuid, owner_id: UserId, draft: ProjectDraft, now: DateTime<Utc>) -> Self {
        let ProjectDraft {
            title,
            description,
            tags,
            link,
            image,
            price,
            domain,
            files,
        } = draft;
        Self {
            id,
            title,
            description,
            tags,
            link,
            image,
            price,
            status: ProjectStatus::Pending,
            owner_id,
            domain,
            files,
            feedback: None,
            approved_by: None,
            approved_at: None,
            created_at: now,
            revision: 1,
        }
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }
}

/// A listing together with its owner's public profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserProfile>,
}
