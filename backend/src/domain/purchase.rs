//! Completed sales.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Project, UserId};

/// Immutable record of a buyer acquiring a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub buyer_id: UserId,
    pub project_id: Uuid,
    pub purchased_at: DateTime<Utc>,
}

impl Purchase {
    pub fn new(id: Uuid, buyer_id: UserId, project_id: Uuid, purchased_at: DateTime<Utc>) -> Self {
        Self {
            id,
            buyer_id,
            project_id,
            purchased_at,
        }
    }
}

/// A purchase with the bought listing attached, when it still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseWithProject {
    #[serde(flatten)]
    pub purchase: Purchase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,
}
