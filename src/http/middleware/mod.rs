//! Request middleware, outermost first: CORS → client override → path rewrite.

pub mod client_override;
pub mod cors;
pub mod rewrite;

pub use client_override::{capture_client_override, query_override};
pub use cors::cors_middleware;
pub use rewrite::{rewrite_middleware, strip_route_base};
