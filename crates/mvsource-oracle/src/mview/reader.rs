use std::fmt;

use mvsource_core::{
    Connection, IndexInfo, ObjectIdentifier, ObjectType, PartialFailurePolicy,
    render_index_source,
};

use super::{
    CatalogQuery, CatalogQueryError, MViewError, NativeDefinitionError, fetch_body,
    fetch_native_definition, fetch_options, filter_synthetic_index,
};
use crate::identifier::table_expression;

/// Where the CREATE statement of an [`MViewSource`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    /// Taken verbatim from `DBMS_METADATA`
    Native,
    /// Composed from `ALL_MVIEWS` query text and options
    Composed,
}

/// Reconstructed source of a materialized view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MViewSource {
    pub drop: Option<String>,
    pub create: String,
    pub index_ddl: Option<String>,
    pub origin: SourceOrigin,
}

impl MViewSource {
    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MViewSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(drop) = &self.drop {
            f.write_str(drop)?;
        }
        f.write_str(&self.create)?;
        f.write_str("\n\n")?;
        if let Some(index_ddl) = &self.index_ddl {
            f.write_str(index_ddl)?;
        }
        Ok(())
    }
}

/// CREATE statement composed from catalog queries, together with the name of
/// the primary key index the options query discovered
struct ComposedCreate {
    create: String,
    synthetic_index: Option<String>,
}

/// Reads the source of Oracle materialized views.
///
/// The reader keeps no state between calls and can be shared freely; each
/// call only needs exclusive use of the connection it is given.
///
/// # Examples
///
/// ```no_run
/// # async fn run(connection: &dyn mvsource_core::Connection) -> Result<(), mvsource_oracle::MViewError> {
/// use mvsource_core::ObjectIdentifier;
/// use mvsource_oracle::MViewSourceReader;
///
/// let object = ObjectIdentifier::new("SCHEMA1", "MV_SALES");
/// let source = MViewSourceReader::new()
///     .reconstruct(connection, &object, None, true)
///     .await?;
/// assert!(source.to_sql().starts_with("DROP MATERIALIZED VIEW SCHEMA1.MV_SALES;"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct MViewSourceReader;

impl MViewSourceReader {
    pub fn new() -> Self {
        Self
    }

    /// Reconstruct the complete source of a materialized view.
    ///
    /// * `index_definition` - indexes of the view; fetched through the
    ///   connection's index introspection when `None`
    /// * `include_drop` - prefix a `DROP MATERIALIZED VIEW` statement and use
    ///   a plain `CREATE` instead of `CREATE OR REPLACE`
    #[tracing::instrument(skip(self, connection, index_definition), fields(object = %object))]
    pub async fn reconstruct(
        &self,
        connection: &dyn Connection,
        object: &ObjectIdentifier,
        index_definition: Option<Vec<IndexInfo>>,
        include_drop: bool,
    ) -> Result<MViewSource, MViewError> {
        let settings = connection.db_settings();
        let policy = settings.partial_failure;
        let table_expression = table_expression(object);

        let keyword = ObjectType::MaterializedView.ddl_keyword();
        let drop = include_drop.then(|| format!("DROP {} {};\n\n", keyword, table_expression));

        let native = if settings.use_native_ddl(ObjectType::MaterializedView) {
            Self::native_source(connection, object).await
        } else {
            None
        };

        let (create, synthetic_index, origin) = match native {
            Some(create) => (create, None, SourceOrigin::Native),
            None => {
                let composed =
                    Self::compose_create(connection, object, &table_expression, include_drop, policy)
                        .await?;
                (composed.create, composed.synthetic_index, SourceOrigin::Composed)
            }
        };

        let index_ddl = Self::index_source(
            connection,
            object,
            index_definition,
            synthetic_index.as_deref(),
            policy,
        )
        .await?;

        tracing::debug!(?origin, has_indexes = index_ddl.is_some(), "reconstructed mview source");

        Ok(MViewSource {
            drop,
            create,
            index_ddl,
            origin,
        })
    }

    async fn native_source(connection: &dyn Connection, object: &ObjectIdentifier) -> Option<String> {
        match fetch_native_definition(connection, object).await {
            Ok(source) => Some(source),
            Err(NativeDefinitionError::Query(e)) => {
                tracing::warn!(error = %e, "falling back to catalog queries");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "falling back to catalog queries");
                None
            }
        }
    }

    async fn compose_create(
        connection: &dyn Connection,
        object: &ObjectIdentifier,
        table_expression: &str,
        include_drop: bool,
        policy: PartialFailurePolicy,
    ) -> Result<ComposedCreate, MViewError> {
        let body = match fetch_body(connection, object).await {
            Ok(body) => body,
            Err(e) => degrade(policy, e)?,
        };

        let (options_clause, synthetic_index) = match fetch_options(connection, object).await {
            Ok(Some(options)) => (options.options_clause(), options.synthetic_index_name),
            Ok(None) => (String::new(), None),
            Err(e) => (degrade(policy, e)?, None),
        };

        let create = if include_drop { "CREATE" } else { "CREATE OR REPLACE" };

        Ok(ComposedCreate {
            create: format!(
                "{} {} {}{}\nAS\n{}",
                create,
                ObjectType::MaterializedView.ddl_keyword(),
                table_expression,
                options_clause,
                body
            ),
            synthetic_index,
        })
    }

    async fn index_source(
        connection: &dyn Connection,
        object: &ObjectIdentifier,
        index_definition: Option<Vec<IndexInfo>>,
        synthetic_index: Option<&str>,
        policy: PartialFailurePolicy,
    ) -> Result<Option<String>, MViewError> {
        let introspection = connection.as_index_introspection();

        let mut indexes = match (index_definition, introspection) {
            (Some(indexes), _) => indexes,
            (None, Some(introspection)) => match introspection.get_indexes(object).await {
                Ok(indexes) => indexes,
                Err(source) => {
                    let e = CatalogQueryError::new(CatalogQuery::Indexes, object, source);
                    degrade(policy, e)?;
                    return Ok(None);
                }
            },
            (None, None) => {
                return Err(MViewError::IndexesUnavailable {
                    object: object.to_string(),
                });
            }
        };

        filter_synthetic_index(&mut indexes, synthetic_index);

        let source = match introspection {
            Some(introspection) => introspection.index_source(object, &indexes),
            None => render_index_source(object, &indexes),
        };
        Ok(source.filter(|sql| !sql.trim().is_empty()))
    }
}

/// Apply the partial failure policy: abort with the error, or return its
/// text to stand in for the fragment that could not be retrieved
fn degrade(policy: PartialFailurePolicy, error: CatalogQueryError) -> Result<String, MViewError> {
    match policy {
        PartialFailurePolicy::Abort => Err(error.into()),
        PartialFailurePolicy::EmbedDiagnostic => {
            tracing::warn!(query = %error.query, error = %error, "embedding error text in generated source");
            Ok(error.to_string())
        }
    }
}
