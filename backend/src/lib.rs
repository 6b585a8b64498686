//! Namecheck backend library.
//!
//! Checks whether usernames are free on the upstream game platform, singly or
//! in paced bulk batches, and keeps a history of every verdict.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
