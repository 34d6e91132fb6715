//! Digital project marketplace backend.
//!
//! Sellers list projects, moderators approve them, buyers purchase and
//! download them, and buyers commission custom work from sellers.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(test)]
pub(crate) mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
