//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod custom_projects;
pub mod error;
pub mod health;
pub mod idempotency;
pub mod projects;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

use crate::domain::Error;

pub use error::ApiResult;

/// Malformed JSON bodies and query strings answer with the JSON error shape.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid JSON body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid query string: {err}")).into()
    }));
}

/// Register every `/api/v1` handler. Mount inside the versioned scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    extractor_configs(cfg);
    cfg.service(users::login)
        .service(users::signup)
        .service(users::logout)
        .service(users::current_user)
        .service(users::switch_role)
        .service(users::upgrade_to_premium)
        .service(users::my_purchases)
        .service(users::my_projects)
        // Literal segments must precede `/projects/{id}`.
        .service(projects::list_tags)
        .service(projects::list_projects)
        .service(projects::create_project)
        .service(projects::get_project)
        .service(projects::delete_project)
        .service(projects::approve_project)
        .service(projects::reject_project)
        .service(projects::purchase_project)
        .service(projects::download_project)
        .service(custom_projects::request_custom_project)
        .service(custom_projects::list_custom_projects)
        .service(custom_projects::assign_custom_project)
        .service(custom_projects::start_custom_project)
        .service(custom_projects::submit_custom_project)
        .service(custom_projects::approve_custom_project)
        .service(admin::pending_projects)
        .service(admin::list_sellers);
}
