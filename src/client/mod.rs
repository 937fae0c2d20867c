//! Client identity resolution.
//!
//! # Data Flow
//! ```text
//! Request (Host header, ?client= override)
//!     → pinned.rs (capture + memoize the first override)
//!     → resolver.rs (memo → override → opal → host mapping → default)
//!     → ClientIdentity
//! ```
//!
//! # Design Decisions
//! - Override memo lives for the whole server lifetime, no reset
//! - The "opal" → "toshiba" substitution is applied by each consumer,
//!   not by the resolver

pub mod pinned;
pub mod resolver;

pub use pinned::ClientOverride;
pub use resolver::{
    concrete, is_client_label, ClientIdentity, ClientResolver, HostMapping, DEFAULT_CLIENT,
    OPAL_CLIENT,
};
