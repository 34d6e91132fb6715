//! Process-local repositories.
//!
//! Each collection sits behind its own async lock, so a compare-and-swap on
//! one entity is linearizable and never blocks writers of other collections.
//! State is lost on restart.

mod custom_projects;
mod idempotency;
mod projects;
mod purchases;
mod seed;
mod table;
mod users;

use std::sync::Arc;

use mockable::Clock;

pub use custom_projects::MemoryCustomProjectRepository;
pub use idempotency::MemoryIdempotencyRepository;
pub use projects::MemoryProjectRepository;
pub use purchases::MemoryPurchaseRepository;
pub use seed::{DEMO_BUYER_ID, DEMO_SELLER_ID};
pub use users::MemoryUserRepository;

/// Every in-memory repository, shared by the services.
#[derive(Clone)]
pub struct MemoryStore {
    pub users: Arc<MemoryUserRepository>,
    pub projects: Arc<MemoryProjectRepository>,
    pub custom_projects: Arc<MemoryCustomProjectRepository>,
    pub purchases: Arc<MemoryPurchaseRepository>,
    pub idempotency: Arc<MemoryIdempotencyRepository>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::new()),
            projects: Arc::new(MemoryProjectRepository::new()),
            custom_projects: Arc::new(MemoryCustomProjectRepository::new()),
            purchases: Arc::new(MemoryPurchaseRepository::new()),
            idempotency: Arc::new(MemoryIdempotencyRepository::new(clock.clone())),
            clock,
        }
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }
}

#[cfg(test)]
mod tests;
