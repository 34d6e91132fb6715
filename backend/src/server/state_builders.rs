//! Wires the in-memory repositories into the domain services.

use std::sync::Arc;

use actix_web::web;
use marketplace::domain::{
    CatalogueService, CustomProjectService, IdentityService, ProjectService,
};
use marketplace::inbound::http::state::HttpState;
use marketplace::outbound::memory::MemoryStore;

/// Build the handler state backed by `store`.
///
/// One [`ProjectService`] serves listing mutations, the user library and
/// moderation so all three share the same repositories.
pub fn build_http_state(store: &MemoryStore) -> web::Data<HttpState> {
    let catalogue = Arc::new(CatalogueService::new(
        store.projects.clone(),
        store.users.clone(),
    ));
    let projects = Arc::new(ProjectService::new(
        store.projects.clone(),
        store.users.clone(),
        store.purchases.clone(),
        store.idempotency.clone(),
        store.clock(),
    ));
    let custom_projects = Arc::new(CustomProjectService::new(
        store.custom_projects.clone(),
        store.users.clone(),
        store.clock(),
    ));
    let identity = Arc::new(IdentityService::new(store.users.clone()));

    web::Data::new(HttpState {
        catalogue,
        projects: projects.clone(),
        library: projects.clone(),
        moderation: projects,
        custom_projects,
        identity,
    })
}
