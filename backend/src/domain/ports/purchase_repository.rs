//! Port abstraction for purchase records.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Purchase, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by purchase repository adapters.
    pub enum PurchaseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "purchase repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "purchase repository query failed: {message}",
        /// The listing already has a purchase record.
        AlreadyPurchased { project_id: Uuid } => "project {project_id} already purchased",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    /// Record a sale. A listing can be sold once.
    async fn insert(&self, purchase: &Purchase) -> Result<(), PurchaseRepositoryError>;

    /// Purchases made by `buyer_id`, oldest first.
    async fn list_by_buyer(&self, buyer_id: &UserId)
    -> Result<Vec<Purchase>, PurchaseRepositoryError>;

    /// The purchase of `project_id` by `buyer_id`, if any.
    async fn find(
        &self,
        buyer_id: &UserId,
        project_id: &Uuid,
    ) -> Result<Option<Purchase>, PurchaseRepositoryError>;
}
