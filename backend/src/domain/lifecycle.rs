//! Status transition tables for listings and custom requests.
//!
//! Each table lists every permitted `(from, action, to)` triple. Anything not
//! in a table is rejected with [`InvalidTransition`]; nothing is applied
//! silently. Mutators only change status-related fields. Callers own the
//! revision bump and persistence.
//!
//! ```text
//! Project:        Pending --approve--> Approved --purchase--> Sold
//!                 Pending --reject---> Rejected
//! CustomProject:  Pending --assign--> Assigned --start_work--> InProgress
//!                 Assigned | InProgress --submit--> Submitted
//!                 Submitted --approve_delivery--> Delivered
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::json;

use super::{CustomProject, CustomProjectStatus, Error, Project, ProjectStatus, UserId};

/// Which kind of entity a transition applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEntity {
    Project,
    CustomProject,
}

impl fmt::Display for LifecycleEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project => f.write_str("project"),
            Self::CustomProject => f.write_str("custom project"),
        }
    }
}

/// A requested status change that the table does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} a {entity} in status {from}")]
pub struct InvalidTransition {
    pub entity: LifecycleEntity,
    pub from: &'static str,
    pub action: &'static str,
}

impl From<InvalidTransition> for Error {
    fn from(value: InvalidTransition) -> Self {
        Error::conflict(value.to_string()).with_details(json!({
            "code": "invalid_transition",
            "entity": value.entity.to_string(),
            "from": value.from,
            "action": value.action,
        }))
    }
}

/// Actions that move a listing between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAction {
    Approve,
    Reject,
    Purchase,
}

impl ProjectAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Purchase => "purchase",
        }
    }
}

const PROJECT_TRANSITIONS: &[(ProjectStatus, ProjectAction, ProjectStatus)] = &[
    (ProjectStatus::Pending, ProjectAction::Approve, ProjectStatus::Approved),
    (ProjectStatus::Pending, ProjectAction::Reject, ProjectStatus::Rejected),
    (ProjectStatus::Approved, ProjectAction::Purchase, ProjectStatus::Sold),
];

/// Resolve the status reached by applying `action` in `from`.
///
/// # Examples
/// ```
/// use marketplace::domain::lifecycle::{next_project_status, ProjectAction};
/// use marketplace::domain::ProjectStatus;
///
/// assert_eq!(
///     next_project_status(ProjectStatus::Pending, ProjectAction::Approve),
///     Ok(ProjectStatus::Approved)
/// );
/// assert!(next_project_status(ProjectStatus::Sold, ProjectAction::Purchase).is_err());
/// ```
pub fn next_project_status(
    from: ProjectStatus,
    action: ProjectAction,
) -> Result<ProjectStatus, InvalidTransition> {
    PROJECT_TRANSITIONS
        .iter()
        .find(|(state, candidate, _)| *state == from && *candidate == action)
        .map(|(_, _, to)| *to)
        .ok_or(InvalidTransition {
            entity: LifecycleEntity::Project,
            from: from.as_str(),
            action: action.as_str(),
        })
}

/// Actions that move a custom request between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomProjectAction {
    Assign,
    StartWork,
    Submit,
    ApproveDelivery,
}

impl CustomProjectAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "assign",
            Self::StartWork => "start work on",
            Self::Submit => "submit",
            Self::ApproveDelivery => "approve delivery of",
        }
    }
}

const CUSTOM_PROJECT_TRANSITIONS: &[(
    CustomProjectStatus,
    CustomProjectAction,
    CustomProjectStatus,
)] = &[
    (
        CustomProjectStatus::Pending,
        CustomProjectAction::Assign,
        CustomProjectStatus::Assigned,
    ),
    (
        CustomProjectStatus::Assigned,
        CustomProjectAction::StartWork,
        CustomProjectStatus::InProgress,
    ),
    (
        CustomProjectStatus::Assigned,
        CustomProjectAction::Submit,
        CustomProjectStatus::Submitted,
    ),
    (
        CustomProjectStatus::InProgress,
        CustomProjectAction::Submit,
        CustomProjectStatus::Submitted,
    ),
    (
        CustomProjectStatus::Submitted,
        CustomProjectAction::ApproveDelivery,
        CustomProjectStatus::Delivered,
    ),
];

/// Resolve the status reached by applying `action` to a custom request.
pub fn next_custom_project_status(
    from: CustomProjectStatus,
    action: CustomProjectAction,
) -> Result<CustomProjectStatus, InvalidTransition> {
    CUSTOM_PROJECT_TRANSITIONS
        .iter()
        .find(|(state, candidate, _)| *state == from && *candidate == action)
        .map(|(_, _, to)| *to)
        .ok_or(InvalidTransition {
            entity: LifecycleEntity::CustomProject,
            from: from.as_str(),
            action: action.as_str(),
        })
}

impl Project {
    fn transition(&mut self, action: ProjectAction) -> Result<(), InvalidTransition> {
        self.status = next_project_status(self.status, action)?;
        Ok(())
    }

    /// Pending → Approved, recording who approved it and when.
    pub fn approve(&mut self, admin_id: UserId, at: DateTime<Utc>) -> Result<(), InvalidTransition> {
        self.transition(ProjectAction::Approve)?;
        self.approved_by = Some(admin_id);
        self.approved_at = Some(at);
        Ok(())
    }

    /// Pending → Rejected, recording moderator feedback.
    pub fn reject(&mut self, feedback: String) -> Result<(), InvalidTransition> {
        self.transition(ProjectAction::Reject)?;
        self.feedback = Some(feedback);
        Ok(())
    }

    /// Approved → Sold.
    pub fn mark_sold(&mut self) -> Result<(), InvalidTransition> {
        self.transition(ProjectAction::Purchase)
    }
}

impl CustomProject {
    fn transition(&mut self, action: CustomProjectAction) -> Result<(), InvalidTransition> {
        self.status = next_custom_project_status(self.status, action)?;
        Ok(())
    }

    /// Pending → Assigned, attaching the seller.
    pub fn assign(&mut self, seller_id: UserId) -> Result<(), InvalidTransition> {
        self.transition(CustomProjectAction::Assign)?;
        self.seller_id = Some(seller_id);
        Ok(())
    }

    /// Assigned → InProgress.
    pub fn start_work(&mut self) -> Result<(), InvalidTransition> {
        self.transition(CustomProjectAction::StartWork)
    }

    /// Assigned | InProgress → Submitted, recording the delivered files.
    pub fn submit(&mut self, files: Vec<String>, at: DateTime<Utc>) -> Result<(), InvalidTransition> {
        self.transition(CustomProjectAction::Submit)?;
        self.submission_files = files;
        self.submitted_at = Some(at);
        Ok(())
    }

    /// Submitted → Delivered, publishing the download location.
    pub fn approve_delivery(
        &mut self,
        download_url: String,
        at: DateTime<Utc>,
    ) -> Result<(), InvalidTransition> {
        self.transition(CustomProjectAction::ApproveDelivery)?;
        self.download_url = Some(download_url);
        self.delivered_at = Some(at);
        Ok(())
    }
}
