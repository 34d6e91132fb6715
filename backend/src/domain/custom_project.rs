//! Bespoke development requests raised by buyers.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{AmountValidationError, ContentDomain, UserId};

/// Request progress from intake to delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CustomProjectStatus {
    Pending,
    Assigned,
    InProgress,
    Submitted,
    Delivered,
}

impl CustomProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Assigned => "Assigned",
            Self::InProgress => "InProgress",
            Self::Submitted => "Submitted",
            Self::Delivered => "Delivered",
        }
    }

    /// Statuses in which a seller must be attached.
    pub fn requires_seller(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for CustomProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amount the buyer is willing to pay. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "f64", into = "f64")]
#[schema(value_type = f64, example = 500.0)]
pub struct Budget(f64);

impl Budget {
    pub fn new(amount: f64) -> Result<Self, AmountValidationError> {
        if !amount.is_finite() {
            return Err(AmountValidationError::NotFinite);
        }
        if amount <= 0.0 {
            return Err(AmountValidationError::NotPositive);
        }
        Ok(Self(amount))
    }

    pub fn amount(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Budget {
    type Error = AmountValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Budget> for f64 {
    fn from(value: Budget) -> Self {
        value.0
    }
}

/// Validation errors for a new request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomProjectValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("budget is invalid: {0}")]
    Budget(#[from] AmountValidationError),
}

impl CustomProjectValidationError {
    /// Request field the error relates to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "title",
            Self::EmptyDescription => "description",
            Self::Budget(_) => "budget",
        }
    }
}

/// Raw request fields as received from a client.
#[derive(Debug, Clone, Default)]
pub struct CustomProjectInput {
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub due_date: Option<NaiveDate>,
    pub domain: Option<ContentDomain>,
    pub attachments: Vec<String>,
}

/// A buyer's bespoke work request.
///
/// `seller_id` is `Some` exactly when `status` is not `Pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomProject {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[schema(value_type = String)]
    pub buyer_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub seller_id: Option<UserId>,
    pub status: CustomProjectStatus,
    pub budget: Budget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub domain: ContentDomain,
    pub attachments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub submission_files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub revision: u32,
}

impl CustomProject {
    /// Validate input and open a pending request for `buyer_id`.
    pub fn request(
        id: Uuid,
        buyer_id: UserId,
        input: CustomProjectInput,
        now: DateTime<Utc>,
    ) -> Result<Self, CustomProjectValidationError> {
        let CustomProjectInput {
            title,
            description,
            budget,
            due_date,
            domain,
            attachments,
        } = input;

        let title = title.trim().to_owned();
        if title.is_empty() {
            return Err(CustomProjectValidationError::EmptyTitle);
        }
        let description = description.trim().to_owned();
        if description.is_empty() {
            return Err(CustomProjectValidationError::EmptyDescription);
        }
        let budget = Budget::new(budget)?;

        Ok(Self {
            id,
            title,
            description,
            buyer_id,
            seller_id: None,
            status: CustomProjectStatus::Pending,
            budget,
            due_date,
            domain: domain.unwrap_or(ContentDomain::Project),
            attachments,
            notes: None,
            submission_files: Vec::new(),
            submitted_at: None,
            download_url: None,
            delivered_at: None,
            created_at: now,
            revision: 1,
        })
    }

    /// Whether the seller reference agrees with the status.
    pub fn seller_matches_status(&self) -> bool {
        self.seller_id.is_some() == self.status.requires_seller()
    }

    pub fn is_assigned_to(&self, seller_id: &UserId) -> bool {
        self.seller_id.as_ref() == Some(seller_id)
    }
}
