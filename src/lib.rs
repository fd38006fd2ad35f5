//! snipvault - personal code snippet repository
//!
//! Stores titled code fragments with a language, tags and an optional
//! description. The pieces fit together like this:
//!
//! - [`models`] holds the [`Snippet`] record, the [`SnippetComponent`] tree
//!   (one snippet or a named collection, behind one interface), persistence
//!   and the text/record exporter
//! - [`store`] owns the root collection, hands out ids and keeps the backing
//!   file in sync
//! - [`analyzer`] computes read-only statistics over any component
//! - [`cli`] is the command-line front end used by the `snipvault` binary

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod search;
pub mod store;

pub use config::Config;
pub use error::{ErrorKind, Result, SnippetError};
pub use models::{Snippet, SnippetCollection, SnippetComponent, SnippetId};
pub use store::{SharedStore, SnippetStore};
