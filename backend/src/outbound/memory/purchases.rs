//! In-memory `PurchaseRepository`.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{PurchaseRepository, PurchaseRepositoryError};
use crate::domain::{Purchase, UserId};

/// Purchases in the order they were made. A listing is sold at most once.
#[derive(Debug, Default)]
pub struct MemoryPurchaseRepository {
    rows: RwLock<Vec<Purchase>>,
}

impl MemoryPurchaseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PurchaseRepository for MemoryPurchaseRepository {
    async fn insert(&self, purchase: &Purchase) -> Result<(), PurchaseRepositoryError> {
        let mut rows = self.rows.write().await;
        if rows
            .iter()
            .any(|stored| stored.project_id == purchase.project_id)
        {
            return Err(PurchaseRepositoryError::already_purchased(
                purchase.project_id,
            ));
        }
        rows.push(purchase.clone());
        Ok(())
    }

    async fn list_by_buyer(
        &self,
        buyer_id: &UserId,
    ) -> Result<Vec<Purchase>, PurchaseRepositoryError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|purchase| &purchase.buyer_id == buyer_id)
            .cloned()
            .collect())
    }

    async fn find(
        &self,
        buyer_id: &UserId,
        project_id: &Uuid,
    ) -> Result<Option<Purchase>, PurchaseRepositoryError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|purchase| &purchase.buyer_id == buyer_id && &purchase.project_id == project_id)
            .cloned())
    }
}
