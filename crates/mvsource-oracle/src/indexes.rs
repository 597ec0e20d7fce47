//! Index metadata from the Oracle data dictionary
//!
//! Oracle connection implementations use these helpers to back
//! [`IndexIntrospection`](mvsource_core::IndexIntrospection).

use mvsource_core::{
    Connection, IndexInfo, ObjectIdentifier, Result, Value, render_index_source_with,
};

use crate::identifier::{quote_identifier, table_expression};
use crate::mview::query_catalog;

pub(crate) const INDEXES_SQL: &str = "SELECT i.index_name, i.index_type, i.uniqueness, c.column_name \n\
FROM all_indexes i \n\
  JOIN all_ind_columns c ON c.index_owner = i.owner AND c.index_name = i.index_name \n\
WHERE i.table_owner = ? \n\
  AND i.table_name = ? \n\
ORDER BY i.index_name, c.column_position";

/// List the indexes of a table or materialized view container table,
/// ordered by index name
#[tracing::instrument(skip(connection), fields(table = %table))]
pub async fn fetch_table_indexes(
    connection: &dyn Connection,
    table: &ObjectIdentifier,
) -> Result<Vec<IndexInfo>> {
    let params = [Value::from(table.schema()), Value::from(table.name())];
    let result = query_catalog(connection, "table indexes", INDEXES_SQL, &params).await?;

    let mut indexes: Vec<IndexInfo> = Vec::new();
    for row in &result.rows {
        let Some(name) = row.get_string(0) else {
            continue;
        };
        let column = row.get_string(3).unwrap_or_default();

        match indexes.last_mut() {
            Some(last) if last.name == name => last.columns.push(column),
            _ => {
                let mut index = IndexInfo::new(name, vec![column]);
                index.index_type = row.get_string(1).unwrap_or_else(|| "NORMAL".to_string());
                index.is_unique = row.get_string(2).as_deref() == Some("UNIQUE");
                indexes.push(index);
            }
        }
    }

    tracing::debug!(count = indexes.len(), "loaded indexes");
    Ok(indexes)
}

/// `CREATE INDEX` statements with Oracle identifier quoting
pub fn index_source(table: &ObjectIdentifier, indexes: &[IndexInfo]) -> Option<String> {
    render_index_source_with(&table_expression(table), indexes, quote_identifier)
}
