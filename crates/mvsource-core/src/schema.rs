//! Catalog object identifiers and index metadata

use serde::{Deserialize, Serialize};

/// Identifies a catalog object by schema (owner) and name.
///
/// Names are stored exactly as the catalog reports them; no case folding
/// happens here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectIdentifier {
    schema: String,
    name: String,
}

impl ObjectIdentifier {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `schema.name` without any quoting
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

impl std::fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// Object type, used to select per-type retrieval settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Table,
    View,
    MaterializedView,
    Index,
    Sequence,
    Procedure,
    Function,
    Package,
    Trigger,
    Type,
}

impl ObjectType {
    /// Keyword used in DDL statements for this type
    pub fn ddl_keyword(&self) -> &'static str {
        match self {
            ObjectType::Table => "TABLE",
            ObjectType::View => "VIEW",
            ObjectType::MaterializedView => "MATERIALIZED VIEW",
            ObjectType::Index => "INDEX",
            ObjectType::Sequence => "SEQUENCE",
            ObjectType::Procedure => "PROCEDURE",
            ObjectType::Function => "FUNCTION",
            ObjectType::Package => "PACKAGE",
            ObjectType::Trigger => "TRIGGER",
            ObjectType::Type => "TYPE",
        }
    }
}

/// Index information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInfo {
    pub name: String,
    pub columns: Vec<String>,
    pub is_unique: bool,
    pub is_primary: bool,
    /// Backend index type, e.g. `NORMAL` or `BITMAP`
    pub index_type: String,
    pub comment: Option<String>,
}

impl IndexInfo {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            is_unique: false,
            is_primary: false,
            index_type: "NORMAL".to_string(),
            comment: None,
        }
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn with_index_type(mut self, index_type: impl Into<String>) -> Self {
        self.index_type = index_type.into();
        self
    }
}

/// Render `CREATE INDEX` statements for the given indexes of `table`.
///
/// Returns `None` when there is nothing to render.
pub fn render_index_source(table: &ObjectIdentifier, indexes: &[IndexInfo]) -> Option<String> {
    render_index_source_with(&table.qualified_name(), indexes, |name| name.to_string())
}

/// Render `CREATE INDEX` statements using a backend specific identifier
/// quoting function for index and column names.
pub fn render_index_source_with(
    table_expression: &str,
    indexes: &[IndexInfo],
    quote: impl Fn(&str) -> String,
) -> Option<String> {
    if indexes.is_empty() {
        return None;
    }

    let statements: Vec<String> = indexes
        .iter()
        .map(|index| {
            let kind = if index.is_unique {
                "UNIQUE "
            } else if index.index_type.eq_ignore_ascii_case("BITMAP") {
                "BITMAP "
            } else {
                ""
            };
            let columns: Vec<String> = index.columns.iter().map(|c| quote(c.as_str())).collect();
            format!(
                "CREATE {}INDEX {}\n   ON {} ({});\n",
                kind,
                quote(index.name.as_str()),
                table_expression,
                columns.join(", ")
            )
        })
        .collect();

    Some(statements.join("\n"))
}
