//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Rewritten request path
//!     → router.rs (ordered route lookup)
//!     → matcher.rs (evaluate match conditions, resolve static mappings)
//!     → Return: RouteMatch (always; unmatched paths become Index)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - Static specificity is ranked explicitly, never by registration order

pub mod matcher;
pub mod router;

pub use router::{RouteMatch, RouteTable, Upstream};
