//! Development server and template precompiler for the single-page application.

pub mod client;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod mote;
pub mod observability;
pub mod proxy;
pub mod routing;
pub mod stylesheet;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
