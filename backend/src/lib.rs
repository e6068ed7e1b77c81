//! Lunchlog backend: a shared restaurant list and visit log.
//!
//! The crate follows a hexagonal layout: [`domain`] holds the model, the
//! listing logic and the ports; [`inbound`] adapts HTTP requests onto the
//! driving ports; [`outbound`] implements the driven ports over PostgreSQL,
//! memory and the Naver local search API.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
