use mvsource_core::{Connection, ObjectIdentifier, Row, Value};

use super::{CatalogQuery, CatalogQueryError, query_catalog};

pub(crate) const OPTIONS_SQL: &str = "SELECT mv.rewrite_enabled, \n\
       mv.refresh_mode, \n\
       mv.refresh_method, \n\
       mv.build_mode, \n\
       mv.fast_refreshable, \n\
       cons.constraint_name, \n\
       cons.index_name, \n\
       rc.interval \n\
FROM all_mviews mv \n\
  LEFT JOIN all_constraints cons ON cons.owner = mv.owner AND cons.table_name = mv.mview_name AND cons.constraint_type = 'P' \n\
  LEFT JOIN all_refresh_children rc ON rc.owner = mv.owner AND rc.name = mv.mview_name \n\
WHERE mv.owner = ? \n\
  AND mv.mview_name = ?";

/// Refresh and build options of a materialized view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectOptions {
    pub build_mode: String,
    pub refresh_method: String,
    pub refresh_mode: String,
    /// Name of the primary key constraint, if the view has one
    pub primary_key_constraint: Option<String>,
    /// Index Oracle created to enforce the primary key constraint
    pub synthetic_index_name: Option<String>,
    /// `NEXT` expression of the refresh group
    pub refresh_interval: Option<String>,
    pub rewrite_enabled: bool,
    pub fast_refreshable: Option<String>,
}

impl ObjectOptions {
    /// Map a row of [`OPTIONS_SQL`]
    pub(crate) fn from_row(row: &Row) -> Self {
        Self {
            rewrite_enabled: row.get_string(0).as_deref() == Some("Y"),
            refresh_mode: row.get_string(1).unwrap_or_default(),
            refresh_method: row.get_string(2).unwrap_or_default(),
            build_mode: row.get_string(3).unwrap_or_default(),
            fast_refreshable: row.get_string(4),
            primary_key_constraint: row.get_string(5),
            synthetic_index_name: row.get_string(6),
            refresh_interval: row.get_string(7),
        }
    }

    pub fn has_primary_key_constraint(&self) -> bool {
        self.primary_key_constraint.is_some()
    }

    /// The options following `CREATE MATERIALIZED VIEW <name>`, each on its
    /// own indented line
    pub fn options_clause(&self) -> String {
        let mut clause = String::with_capacity(80);
        clause.push_str("\n  BUILD ");
        clause.push_str(&self.build_mode);
        clause.push_str("\n  REFRESH ");
        clause.push_str(&self.refresh_method);
        clause.push_str(" ON ");
        clause.push_str(&self.refresh_mode);

        if self.has_primary_key_constraint() {
            clause.push_str(" WITH PRIMARY KEY");
        } else {
            clause.push_str(" WITH ROWID");
        }

        if let Some(next) = self
            .refresh_interval
            .as_deref()
            .map(str::trim)
            .filter(|next| !next.is_empty())
        {
            clause.push_str("\n  NEXT ");
            clause.push_str(next);
        }

        if self.rewrite_enabled {
            clause.push_str("\n  ENABLE QUERY REWRITE");
        } else {
            clause.push_str("\n  DISABLE QUERY REWRITE");
        }
        clause
    }
}

/// Retrieve the options of a materialized view.
///
/// Returns `Ok(None)` when `ALL_MVIEWS` has no row for the object.
#[tracing::instrument(skip(connection), fields(object = %object))]
pub async fn fetch_options(
    connection: &dyn Connection,
    object: &ObjectIdentifier,
) -> Result<Option<ObjectOptions>, CatalogQueryError> {
    let params = [Value::from(object.schema()), Value::from(object.name())];
    let result = query_catalog(connection, "mview options", OPTIONS_SQL, &params)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "error accessing all_mviews");
            CatalogQueryError::new(CatalogQuery::Options, object, e)
        })?;

    let options = result.first_row().map(ObjectOptions::from_row);
    if options.is_none() {
        tracing::debug!("no options found in all_mviews");
    }
    Ok(options)
}
