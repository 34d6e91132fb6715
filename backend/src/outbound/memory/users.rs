//! In-memory `UserRepository`.

use async_trait::async_trait;

use super::table::{Revisioned, Table, WriteConflict};
use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Email, Role, User, UserId};

impl Revisioned for User {
    type Id = UserId;

    fn id(&self) -> &UserId {
        &self.id
    }

    fn revision(&self) -> u32 {
        self.revision
    }
}

/// Accounts in registration order. Emails are unique.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    table: Table<User>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn map_conflict(user: &User, conflict: WriteConflict) -> UserRepositoryError {
    match conflict {
        WriteConflict::Stale { expected, actual } => {
            UserRepositoryError::revision_mismatch(expected, actual)
        }
        WriteConflict::Missing => UserRepositoryError::not_found(user.id.to_string()),
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.table.find(id).await)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .table
            .filter(|user| &user.email == email)
            .await
            .into_iter()
            .next())
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut rows = self.table.write().await;
        if rows.iter().any(|stored| stored.email == user.email) {
            return Err(UserRepositoryError::duplicate_email(user.email.to_string()));
        }
        if let Some(stored) = rows.iter().find(|stored| stored.id == user.id) {
            return Err(UserRepositoryError::revision_mismatch(0_u32, stored.revision));
        }
        rows.push(user.clone());
        Ok(())
    }

    async fn save(&self, user: &User, expected_revision: u32) -> Result<(), UserRepositoryError> {
        self.table
            .upsert(user, Some(expected_revision))
            .await
            .map_err(|conflict| map_conflict(user, conflict))
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserRepositoryError> {
        Ok(self.table.filter(|user| user.role == role).await)
    }
}
