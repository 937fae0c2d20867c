//! Lifecycle management.
//!
//! The server runs until Ctrl-C or until a [`Shutdown`] it subscribed to is
//! triggered. In-flight requests are not drained.

pub mod shutdown;

pub use shutdown::{shutdown_signal, Shutdown};
