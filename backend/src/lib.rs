//! Groundwork backend library modules.
//!
//! A starter for server-rendered web applications: session-guarded
//! routes, a query-cache-backed loader contract, Structured Result
//! handlers, and Diesel persistence behind hexagonal ports.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request trace identifier, re-exported for handler and middleware use.
pub use domain::TraceId;
/// Tracing middleware attaching per-request identifiers.
pub use middleware::Trace;
