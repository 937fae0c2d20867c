//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → middleware/ (CORS, client override capture, path rewrite)
//!     → routing::RouteTable (pick the route)
//!     → handlers.rs (stylesheet, favicon, config, proxy, static, index)
//!     → response.rs (redirects, JSON, cache headers)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
