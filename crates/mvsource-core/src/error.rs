//! Error types for catalog access

use thiserror::Error;

/// Core error type for connection and catalog operations
#[derive(Error, Debug)]
pub enum DbError {
    /// A statement failed on the backend. `code` carries the vendor error
    /// code (e.g. `ORA-00942`) when the driver reports one.
    #[error("{}", display_query(.code, .message))]
    Query {
        code: Option<String>,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DbError {
    /// Query error without a vendor code
    pub fn query(message: impl Into<String>) -> Self {
        DbError::Query {
            code: None,
            message: message.into(),
        }
    }

    /// Query error carrying the vendor error code
    pub fn query_with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        DbError::Query {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Vendor error code, if the backend reported one
    pub fn vendor_code(&self) -> Option<&str> {
        match self {
            DbError::Query { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

fn display_query(code: &Option<String>, message: &str) -> String {
    match code {
        Some(code) => format!("{}: {}", code, message),
        None => format!("Query error: {}", message),
    }
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_query_error_display() {
        let coded = DbError::query_with_code("ORA-00942", "table or view does not exist");
        assert_eq!(coded.to_string(), "ORA-00942: table or view does not exist");
        assert_eq!(coded.vendor_code(), Some("ORA-00942"));

        let plain = DbError::query("connection reset");
        assert_eq!(plain.to_string(), "Query error: connection reset");
        assert_eq!(plain.vendor_code(), None);
    }

    #[test]
    fn test_non_query_errors_have_no_code() {
        assert_eq!(DbError::Configuration("bad".into()).vendor_code(), None);
    }
}
