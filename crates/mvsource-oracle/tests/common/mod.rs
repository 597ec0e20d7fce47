//! Common test utilities and mocks

#![allow(dead_code)]

use async_trait::async_trait;
use mvsource_core::{
    Connection, DbError, DbSettings, IndexInfo, IndexIntrospection, ObjectIdentifier,
    QueryResult, Result, Value,
};
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

/// Canned response for queries matching a SQL pattern
#[derive(Clone)]
pub enum MockResponse {
    Rows(QueryResult),
    Fail { code: Option<String>, message: String },
}

/// Mock Oracle connection for testing source reconstruction without a
/// database.
///
/// Queries are answered by the first registered response whose pattern is
/// contained in the SQL text; unmatched queries return an empty result.
pub struct MockConnection {
    pub settings: DbSettings,
    pub responses: Vec<(String, MockResponse)>,
    /// Indexes served through `IndexIntrospection`; `None` disables it
    pub indexes: Option<Vec<IndexInfo>>,
    pub fail_indexes: bool,
    /// Log of all SQL executed together with the bound parameters
    pub query_log: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            settings: DbSettings::default(),
            responses: Vec::new(),
            indexes: None,
            fail_indexes: false,
            query_log: Mutex::new(Vec::new()),
        }
    }

    pub fn with_settings(mut self, settings: DbSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Register rows for queries containing the given SQL pattern.
    pub fn with_query_response(mut self, sql_contains: &str, result: QueryResult) -> Self {
        self.responses
            .push((sql_contains.to_string(), MockResponse::Rows(result)));
        self
    }

    /// Make queries containing the given SQL pattern fail.
    pub fn with_query_failure(mut self, sql_contains: &str, code: Option<&str>, message: &str) -> Self {
        self.responses.push((
            sql_contains.to_string(),
            MockResponse::Fail {
                code: code.map(str::to_string),
                message: message.to_string(),
            },
        ));
        self
    }

    pub fn with_indexes(mut self, indexes: Vec<IndexInfo>) -> Self {
        self.indexes = Some(indexes);
        self
    }

    pub fn with_index_failure(mut self) -> Self {
        self.indexes = Some(Vec::new());
        self.fail_indexes = true;
        self
    }

    pub fn query_log(&self) -> Vec<(String, Vec<Value>)> {
        self.query_log.lock().clone()
    }

    /// Number of executed queries containing `pattern`
    pub fn count_queries(&self, pattern: &str) -> usize {
        self.query_log
            .lock()
            .iter()
            .filter(|(sql, _)| sql.contains(pattern))
            .count()
    }
}

#[async_trait]
impl Connection for MockConnection {
    fn driver_name(&self) -> &str {
        "oracle"
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        self.query_log.lock().push((sql.to_string(), params.to_vec()));

        for (pattern, response) in &self.responses {
            if sql.contains(pattern.as_str()) {
                return match response {
                    MockResponse::Rows(result) => Ok(result.clone()),
                    MockResponse::Fail { code: Some(code), message } => {
                        Err(DbError::query_with_code(code.clone(), message.clone()))
                    }
                    MockResponse::Fail { code: None, message } => Err(DbError::query(message.clone())),
                };
            }
        }

        Ok(QueryResult::empty())
    }

    fn db_settings(&self) -> &DbSettings {
        &self.settings
    }

    fn as_index_introspection(&self) -> Option<&dyn IndexIntrospection> {
        if self.indexes.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

#[async_trait]
impl IndexIntrospection for MockConnection {
    async fn get_indexes(&self, _table: &ObjectIdentifier) -> Result<Vec<IndexInfo>> {
        if self.fail_indexes {
            return Err(DbError::query_with_code("ORA-01031", "insufficient privileges"));
        }
        Ok(self.indexes.clone().unwrap_or_default())
    }
}

/// Pattern matching the `DBMS_METADATA.GET_DDL` query
pub const NATIVE_QUERY: &str = "dbms_metadata.get_ddl";
/// Pattern matching the stored query lookup
pub const BODY_QUERY: &str = "SELECT query FROM all_mviews";
/// Pattern matching the options query
pub const OPTIONS_QUERY: &str = "all_refresh_children";
/// Pattern matching the index dictionary query
pub const INDEX_QUERY: &str = "all_ind_columns";

/// A result with a single column and a single row
pub fn single_value_result(column: &str, value: Value) -> QueryResult {
    QueryResult::from_rows(vec![column.to_string()], vec![vec![value]])
}

/// Row of the options query
pub struct OptionsRow<'a> {
    pub rewrite: &'a str,
    pub refresh_mode: &'a str,
    pub refresh_method: &'a str,
    pub build_mode: &'a str,
    pub constraint_name: Option<&'a str>,
    pub index_name: Option<&'a str>,
    pub interval: Option<&'a str>,
}

impl Default for OptionsRow<'_> {
    fn default() -> Self {
        Self {
            rewrite: "Y",
            refresh_mode: "DEMAND",
            refresh_method: "FORCE",
            build_mode: "IMMEDIATE",
            constraint_name: None,
            index_name: None,
            interval: None,
        }
    }
}

pub fn options_result(row: OptionsRow<'_>) -> QueryResult {
    let opt = |v: Option<&str>| v.map(Value::from).unwrap_or(Value::Null);
    QueryResult::from_rows(
        [
            "REWRITE_ENABLED",
            "REFRESH_MODE",
            "REFRESH_METHOD",
            "BUILD_MODE",
            "FAST_REFRESHABLE",
            "CONSTRAINT_NAME",
            "INDEX_NAME",
            "INTERVAL",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
        vec![vec![
            Value::from(row.rewrite),
            Value::from(row.refresh_mode),
            Value::from(row.refresh_method),
            Value::from(row.build_mode),
            Value::from("DIRLOAD_DML"),
            opt(row.constraint_name),
            opt(row.index_name),
            opt(row.interval),
        ]],
    )
}

/// Connection answering the body and options queries for a plain
/// `SELECT * FROM sales` materialized view
pub fn sales_connection() -> MockConnection {
    MockConnection::new()
        .with_query_response(
            BODY_QUERY,
            single_value_result("QUERY", Value::from("SELECT * FROM sales")),
        )
        .with_query_response(OPTIONS_QUERY, options_result(OptionsRow::default()))
}

pub fn sales_object() -> ObjectIdentifier {
    ObjectIdentifier::new("SCHEMA1", "MV_SALES")
}

/// Log output captured from a `tracing` subscriber installed for the current
/// thread
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Install a debug-level subscriber writing into this buffer until the
    /// guard is dropped.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
