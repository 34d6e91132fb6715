//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (repositories) carry typed errors declared with
//! `define_port_error!`. Driving ports return the API-facing
//! [`Error`](crate::domain::Error).

mod macros;

mod catalogue_query;
mod custom_project_command;
mod custom_project_repository;
mod idempotency_repository;
mod identity_command;
mod moderation_command;
mod project_command;
mod project_repository;
mod purchase_repository;
mod user_repository;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
pub use catalogue_query::CatalogueQuery;
#[cfg(test)]
pub use custom_project_command::MockCustomProjectCommand;
pub use custom_project_command::{
    ApproveCustomProjectRequest, AssignCustomProjectRequest, CustomProjectCommand,
    SubmitCustomProjectRequest,
};
#[cfg(test)]
pub use custom_project_repository::MockCustomProjectRepository;
pub use custom_project_repository::{CustomProjectRepository, CustomProjectRepositoryError};
#[cfg(test)]
pub use idempotency_repository::MockIdempotencyRepository;
pub use idempotency_repository::{
    FixtureIdempotencyRepository, IdempotencyRepository, IdempotencyRepositoryError,
};
#[cfg(test)]
pub use identity_command::MockIdentityCommand;
pub use identity_command::IdentityCommand;
#[cfg(test)]
pub use moderation_command::MockModerationCommand;
pub use moderation_command::{ApproveProjectRequest, ModerationCommand, RejectProjectRequest};
#[cfg(test)]
pub use project_command::{MockLibraryQuery, MockProjectCommand};
pub use project_command::{
    CreateProjectRequest, CreateProjectResponse, DeleteProjectRequest, LibraryQuery,
    ProjectCommand, ProjectDownload, PurchaseProjectRequest, PurchaseProjectResponse,
};
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::{ProjectRepository, ProjectRepositoryError};
#[cfg(test)]
pub use purchase_repository::MockPurchaseRepository;
pub use purchase_repository::{PurchaseRepository, PurchaseRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
