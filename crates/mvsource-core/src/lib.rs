//! mvsource core - abstractions shared by the catalog readers
//!
//! This crate provides the fundamental traits and types the backend-specific
//! crates depend on. It defines:
//!
//! - `Connection` - Trait for a live catalog connection
//! - `IndexIntrospection` - Trait for the index metadata subsystem
//! - `DbSettings` - Per-connection metadata retrieval settings
//! - Common types like `Value`, `Row`, `QueryResult`, `ObjectIdentifier`

mod connection;
mod error;
mod schema;
pub mod settings;
mod sql_util;
mod types;

pub use connection::*;
pub use error::*;
pub use schema::*;
pub use settings::{DbSettings, PartialFailurePolicy};
pub use sql_util::*;
pub use types::*;
