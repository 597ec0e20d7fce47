use mvsource_core::{Connection, DbError, ObjectIdentifier, Value};

use super::{CatalogQuery, CatalogQueryError, NativeDefinitionError, query_catalog};
use crate::ddl_cleaner::{cleanup_quoted_identifiers, ensure_terminator};

// GET_DDL takes the object name before the owner.
pub(crate) const NATIVE_SQL: &str =
    "SELECT dbms_metadata.get_ddl('MATERIALIZED_VIEW', ?, ?) FROM dual";

/// Error codes meaning DBMS_METADATA cannot be used by this session at all
const UNAVAILABLE_CODES: &[&str] = &[
    "ORA-00904", // invalid identifier: package not installed
    "ORA-00942", // table or view does not exist
    "ORA-01031", // insufficient privileges
    "ORA-06550", // PL/SQL compilation error
    "ORA-31603", // object not visible to the current user
];

fn is_unavailable(error: &DbError) -> bool {
    error
        .vendor_code()
        .is_some_and(|code| UNAVAILABLE_CODES.contains(&code))
}

/// Retrieve the complete source of a materialized view from
/// `DBMS_METADATA.GET_DDL`.
///
/// Every failure is reported as a [`NativeDefinitionError`] so the caller can
/// fall back to composing the source from catalog queries.
#[tracing::instrument(skip(connection), fields(object = %object))]
pub async fn fetch_native_definition(
    connection: &dyn Connection,
    object: &ObjectIdentifier,
) -> Result<String, NativeDefinitionError> {
    let params = [Value::from(object.name()), Value::from(object.schema())];
    let result = match query_catalog(connection, "mview dbms_metadata", NATIVE_SQL, &params).await
    {
        Ok(result) => result,
        Err(source) if is_unavailable(&source) => {
            return Err(NativeDefinitionError::Unavailable {
                object: object.to_string(),
                source,
            });
        }
        Err(source) => {
            return Err(CatalogQueryError::new(CatalogQuery::NativeDefinition, object, source).into());
        }
    };

    let source = result
        .first_row()
        .and_then(|row| row.get_string(0))
        .map(|ddl| ensure_terminator(&cleanup_quoted_identifiers(ddl.trim())))
        .filter(|ddl| !ddl.is_empty());

    source.ok_or_else(|| NativeDefinitionError::Empty {
        object: object.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_codes() {
        for code in ["ORA-00904", "ORA-00942", "ORA-01031", "ORA-06550", "ORA-31603"] {
            assert!(is_unavailable(&DbError::query_with_code(code, "x")), "{}", code);
        }
        assert!(!is_unavailable(&DbError::query_with_code("ORA-39212", "x")));
        assert!(!is_unavailable(&DbError::query("no code")));
    }
}
