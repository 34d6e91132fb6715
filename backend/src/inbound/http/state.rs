//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and depend only on domain ports, so
//! they can be exercised with mocks and no storage.

use std::sync::Arc;

use crate::domain::ports::{
    CatalogueQuery, CustomProjectCommand, IdentityCommand, LibraryQuery, ModerationCommand,
    ProjectCommand,
};

/// Port implementations used by the handlers.
#[derive(Clone)]
pub struct HttpState {
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub projects: Arc<dyn ProjectCommand>,
    pub library: Arc<dyn LibraryQuery>,
    pub moderation: Arc<dyn ModerationCommand>,
    pub custom_projects: Arc<dyn CustomProjectCommand>,
    pub identity: Arc<dyn IdentityCommand>,
}
