//! Connection and index metadata traits

use crate::{DbSettings, IndexInfo, ObjectIdentifier, QueryResult, Result, Value, render_index_source};
use async_trait::async_trait;

/// A live catalog connection.
///
/// Connections are acquired and owned by the embedding application. A single
/// connection must not be used by two callers at the same time; distinct
/// connections are independent.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "oracle")
    fn driver_name(&self) -> &str;

    /// Execute a query that returns rows, binding `params` to the `?`
    /// placeholders in order
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult>;

    /// Metadata retrieval settings for this connection
    fn db_settings(&self) -> &DbSettings;

    /// Get the index metadata interface if supported
    fn as_index_introspection(&self) -> Option<&dyn IndexIntrospection> {
        None
    }
}

/// Index metadata subsystem
#[async_trait]
pub trait IndexIntrospection: Send + Sync {
    /// Get the indexes defined on a table-like object, in catalog order
    async fn get_indexes(&self, table: &ObjectIdentifier) -> Result<Vec<IndexInfo>>;

    /// Render the DDL for `indexes` of `table`.
    ///
    /// Returns `None` if there is nothing to render.
    fn index_source(&self, table: &ObjectIdentifier, indexes: &[IndexInfo]) -> Option<String> {
        render_index_source(table, indexes)
    }
}
