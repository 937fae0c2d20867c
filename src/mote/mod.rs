//! Template precompiler.
//!
//! Reads template sources and emits one JavaScript file that registers every
//! template on a namespace object:
//!
//! ```text
//! this['JST'] = this['JST'] || {};
//!
//! mote.compilePartial('header', "<h1>{{title}}</h1>");
//!
//! this['JST']['app/templates/page.mote'] = mote.compile("{{> header}}\n...");
//! ```
//!
//! Files whose basename matches the partial pattern (default `^_`) become
//! partials and are emitted before regular templates.

pub mod compiler;
pub mod task;

pub use compiler::{escape_template, partial_name};
pub use task::{MoteError, MoteTask};
