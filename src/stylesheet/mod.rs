//! On-the-fly stylesheet compilation.
//!
//! # Data Flow
//! ```text
//! GET /.../assets/css/<suffix>.styl
//!     → service.rs (locate <dir>/<suffix>, async read)
//!     → compiler.rs (StylesheetCompiler on a blocking thread)
//!     → 200 text/css, or the error as a plain-text page
//! ```

pub mod compiler;
pub mod service;

pub use compiler::{ImportInliner, StylesheetCompiler, StylesheetError};
pub use service::StylesheetService;
