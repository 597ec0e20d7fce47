//! Materialized view source reconstruction
//!
//! The source of a materialized view is taken from `DBMS_METADATA` when the
//! connection settings ask for it. Otherwise, or when that fails, it is
//! composed from the stored query and the refresh options in `ALL_MVIEWS`.
//! Index DDL is appended without the index Oracle creates for a
//! `WITH PRIMARY KEY` materialized view.

mod body;
mod error;
mod index_filter;
mod native;
mod options;
mod reader;


pub use body::fetch_body;
pub use error::*;
pub use index_filter::filter_synthetic_index;
pub use native::fetch_native_definition;
pub use options::{ObjectOptions, fetch_options};
pub use reader::{MViewSource, MViewSourceReader, SourceOrigin};

use mvsource_core::{Connection, QueryResult, Value, replace_parameters};

/// Run a metadata query, logging the statement when the connection asks for it
pub(crate) async fn query_catalog(
    connection: &dyn Connection,
    context: &'static str,
    sql: &str,
    params: &[Value],
) -> mvsource_core::Result<QueryResult> {
    if connection.db_settings().debug_metadata_sql {
        tracing::debug!(
            driver = connection.driver_name(),
            context,
            sql = %replace_parameters(sql, params),
            "retrieving catalog metadata"
        );
    }
    let result = connection.query(sql, params).await?;
    tracing::trace!(context, rows = result.row_count(), "catalog query returned");
    Ok(result)
}
