//! In-memory `ProjectRepository`.

use async_trait::async_trait;
use uuid::Uuid;

use super::table::{Revisioned, Table, WriteConflict};
use crate::domain::ports::{ProjectRepository, ProjectRepositoryError};
use crate::domain::{Project, UserId};

impl Revisioned for Project {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn revision(&self) -> u32 {
        self.revision
    }
}

/// Listings in insertion order.
#[derive(Debug, Default)]
pub struct MemoryProjectRepository {
    table: Table<Project>,
}

impl MemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn map_conflict(project_id: Uuid, conflict: WriteConflict) -> ProjectRepositoryError {
    match conflict {
        WriteConflict::Stale { expected, actual } => {
            ProjectRepositoryError::revision_mismatch(expected, actual)
        }
        WriteConflict::Missing => ProjectRepositoryError::not_found(project_id),
    }
}

#[async_trait]
impl ProjectRepository for MemoryProjectRepository {
    async fn list(&self) -> Result<Vec<Project>, ProjectRepositoryError> {
        Ok(self.table.all().await)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Project>, ProjectRepositoryError> {
        Ok(self.table.find(id).await)
    }

    async fn list_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<Project>, ProjectRepositoryError> {
        Ok(self.table.filter(|project| project.is_owned_by(owner_id)).await)
    }

    async fn save(
        &self,
        project: &Project,
        expected_revision: Option<u32>,
    ) -> Result<(), ProjectRepositoryError> {
        self.table
            .upsert(project, expected_revision)
            .await
            .map_err(|conflict| map_conflict(project.id, conflict))
    }

    async fn delete(
        &self,
        id: &Uuid,
        expected_revision: u32,
    ) -> Result<(), ProjectRepositoryError> {
        self.table
            .remove(id, expected_revision)
            .await
            .map_err(|conflict| map_conflict(*id, conflict))
    }
}
