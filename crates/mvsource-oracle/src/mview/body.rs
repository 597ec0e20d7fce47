use mvsource_core::{Connection, ObjectIdentifier, Value};

use super::{CatalogQuery, CatalogQueryError, query_catalog};
use crate::ddl_cleaner::{cleanup_quoted_identifiers, ensure_terminator};

pub(crate) const BODY_SQL: &str = "SELECT query FROM all_mviews WHERE owner = ? AND mview_name = ?";

/// Retrieve the query stored for a materialized view.
///
/// The text is cleaned of unnecessary identifier quotes and ends with a
/// single `;`. A missing row or a NULL query yields an empty string.
#[tracing::instrument(skip(connection), fields(object = %object))]
pub async fn fetch_body(
    connection: &dyn Connection,
    object: &ObjectIdentifier,
) -> Result<String, CatalogQueryError> {
    let params = [Value::from(object.schema()), Value::from(object.name())];
    let result = query_catalog(connection, "mview query", BODY_SQL, &params)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "error accessing all_mviews");
            CatalogQueryError::new(CatalogQuery::Body, object, e)
        })?;

    let Some(query) = result.first_row().and_then(|row| row.get_string(0)) else {
        tracing::debug!("no stored query found");
        return Ok(String::new());
    };

    Ok(ensure_terminator(&cleanup_quoted_identifiers(&query)))
}
