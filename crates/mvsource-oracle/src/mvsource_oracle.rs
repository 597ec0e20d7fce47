//! Oracle catalog readers for mvsource
//!
//! This crate reconstructs the source of Oracle materialized views:
//! - `mview` - option, body and native-definition queries plus the
//!   `MViewSourceReader` that combines them
//! - `identifier` - non-quoted identifier rules and table expressions
//! - `ddl_cleaner` - quoted identifier cleanup and statement termination
//! - `indexes` - index metadata from `ALL_INDEXES`

pub mod ddl_cleaner;
pub mod identifier;
pub mod indexes;
pub mod mview;

pub use mview::{MViewError, MViewSource, MViewSourceReader, SourceOrigin};
