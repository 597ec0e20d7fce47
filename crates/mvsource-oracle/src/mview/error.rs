//! Error types for materialized view source retrieval

use mvsource_core::DbError;
use thiserror::Error;

/// The catalog query that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogQuery {
    Options,
    Body,
    NativeDefinition,
    Indexes,
}

impl std::fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self {
            CatalogQuery::Options => "materialized view options",
            CatalogQuery::Body => "materialized view query",
            CatalogQuery::NativeDefinition => "DBMS_METADATA definition",
            CatalogQuery::Indexes => "index metadata",
        };
        f.write_str(what)
    }
}

/// A catalog query against the backend failed
#[derive(Debug, Error)]
#[error("Error retrieving {query} for {object}: {source}")]
pub struct CatalogQueryError {
    pub query: CatalogQuery,
    pub object: String,
    #[source]
    pub source: DbError,
}

impl CatalogQueryError {
    pub fn new(query: CatalogQuery, object: impl std::fmt::Display, source: DbError) -> Self {
        Self {
            query,
            object: object.to_string(),
            source,
        }
    }
}

/// Why the native definition could not be used
#[derive(Debug, Error)]
pub enum NativeDefinitionError {
    /// The function returned no row or a NULL value
    #[error("DBMS_METADATA returned no definition for {object}")]
    Empty { object: String },

    /// The package is missing or not accessible to the current user
    #[error("DBMS_METADATA is not available for {object}: {source}")]
    Unavailable {
        object: String,
        #[source]
        source: DbError,
    },

    #[error(transparent)]
    Query(#[from] CatalogQueryError),
}

/// Error returned by [`MViewSourceReader`](super::MViewSourceReader)
#[derive(Debug, Error)]
pub enum MViewError {
    #[error(transparent)]
    Catalog(#[from] CatalogQueryError),

    #[error(
        "Index metadata for {object} was not supplied and the connection cannot introspect indexes"
    )]
    IndexesUnavailable { object: String },
}
