//! In-memory `CustomProjectRepository`.

use async_trait::async_trait;
use uuid::Uuid;

use super::table::{Revisioned, Table, WriteConflict};
use crate::domain::CustomProject;
use crate::domain::ports::{CustomProjectRepository, CustomProjectRepositoryError};

impl Revisioned for CustomProject {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn revision(&self) -> u32 {
        self.revision
    }
}

#[derive(Debug, Default)]
pub struct MemoryCustomProjectRepository {
    table: Table<CustomProject>,
}

impl MemoryCustomProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomProjectRepository for MemoryCustomProjectRepository {
    async fn list(&self) -> Result<Vec<CustomProject>, CustomProjectRepositoryError> {
        Ok(self.table.all().await)
    }

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<CustomProject>, CustomProjectRepositoryError> {
        Ok(self.table.find(id).await)
    }

    async fn save(
        &self,
        custom_project: &CustomProject,
        expected_revision: Option<u32>,
    ) -> Result<(), CustomProjectRepositoryError> {
        self.table
            .upsert(custom_project, expected_revision)
            .await
            .map_err(|conflict| match conflict {
                WriteConflict::Stale { expected, actual } => {
                    CustomProjectRepositoryError::revision_mismatch(expected, actual)
                }
                WriteConflict::Missing => {
                    CustomProjectRepositoryError::not_found(custom_project.id)
                }
            })
    }
}
