//! SQL text helpers

use crate::Value;

/// Inline positional `?` parameters into `sql` for logging.
///
/// Placeholders inside string literals, quoted identifiers and comments are
/// left alone. Surplus placeholders are kept as `?`.
pub fn replace_parameters(sql: &str, params: &[Value]) -> String {
    let mut result = String::with_capacity(sql.len() + params.len() * 8);
    let mut params = params.iter();
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                result.push(c);
                for inner in chars.by_ref() {
                    result.push(inner);
                    if inner == c {
                        break;
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                result.push(c);
                for inner in chars.by_ref() {
                    result.push(inner);
                    if inner == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                result.push(c);
                result.extend(chars.next());
                let mut prev = '\0';
                for inner in chars.by_ref() {
                    result.push(inner);
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
            }
            '?' => match params.next() {
                Some(value) => result.push_str(&value.to_sql_literal()),
                None => result.push('?'),
            },
            _ => result.push(c),
        }
    }

    result
}
