//! Cleanup of DDL text returned by the catalog
//!
//! Oracle stores view queries and emits generated DDL with every identifier
//! double quoted (`"SCOTT"."EMP"`). Quotes that are not needed to preserve the
//! spelling of an identifier are removed so the generated source reads like
//! hand written SQL.

use crate::identifier::needs_quoting;

pub const STATEMENT_TERMINATOR: char = ';';

/// Lexical pieces of SQL text that matter to the cleanup
#[derive(Debug, PartialEq)]
enum Token {
    Char(char),
    /// String literal, block comment or unterminated quoted identifier
    Verbatim(String),
    /// `--` comment up to, not including, the line break
    LineComment(String),
    /// Closed `"..."` identifier with `""` escapes resolved
    QuotedIdentifier(String),
}

impl Token {
    fn first_char(&self) -> Option<char> {
        match self {
            Token::Char(c) => Some(*c),
            Token::Verbatim(text) | Token::LineComment(text) => text.chars().next(),
            Token::QuotedIdentifier(_) => Some('"'),
        }
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '#')
}

/// Closing delimiter of a `q'<open> ... <close>'` literal
fn closing_delimiter(open: char) -> char {
    match open {
        '[' => ']',
        '{' => '}',
        '(' => ')',
        '<' => '>',
        other => other,
    }
}

/// Whether a `q` at `i` starts an alternative quoting literal, alone or as
/// part of the national `nq'...'` prefix
fn starts_q_literal(chars: &[char], i: usize) -> bool {
    if chars.get(i + 1) != Some(&'\'') || i + 2 >= chars.len() {
        return false;
    }
    match i.checked_sub(1).map(|p| chars[p]) {
        None => true,
        Some('n' | 'N') => i < 2 || !is_identifier_char(chars[i - 2]),
        Some(prev) => !is_identifier_char(prev),
    }
}

fn tokenize(sql: &str) -> Vec<Token> {
    let chars: Vec<char> = sql.chars().collect();
    let len = chars.len();
    let collect = |from: usize, to: usize| chars[from..to].iter().collect::<String>();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < len {
        let start = i;
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match c {
            'q' | 'Q' if starts_q_literal(&chars, i) => {
                let close = closing_delimiter(chars[i + 2]);
                i += 3;
                while i < len && !(chars[i] == close && chars.get(i + 1) == Some(&'\'')) {
                    i += 1;
                }
                i = (i + 2).min(len);
                tokens.push(Token::Verbatim(collect(start, i)));
            }
            '\'' => {
                i += 1;
                while i < len && chars[i] != '\'' {
                    i += 1;
                }
                i = (i + 1).min(len);
                tokens.push(Token::Verbatim(collect(start, i)));
            }
            '-' if next == Some('-') => {
                while i < len && chars[i] != '\n' {
                    i += 1;
                }
                tokens.push(Token::LineComment(collect(start, i)));
            }
            '/' if next == Some('*') => {
                i += 2;
                while i < len && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i = (i + 2).min(len);
                tokens.push(Token::Verbatim(collect(start, i)));
            }
            '"' => {
                i += 1;
                let mut name = String::new();
                let mut closed = false;
                while i < len {
                    if chars[i] == '"' {
                        if chars.get(i + 1) == Some(&'"') {
                            name.push('"');
                            i += 2;
                            continue;
                        }
                        closed = true;
                        i += 1;
                        break;
                    }
                    name.push(chars[i]);
                    i += 1;
                }
                if closed {
                    tokens.push(Token::QuotedIdentifier(name));
                } else {
                    tokens.push(Token::Verbatim(collect(start, i)));
                }
            }
            _ => {
                i += 1;
                tokens.push(Token::Char(c));
            }
        }
    }

    tokens
}

/// Remove double quotes around identifiers that do not need them.
///
/// String literals (including `q'[...]'` literals) and comments are copied
/// unchanged, as are quoted identifiers that contain lower case letters,
/// spaces, reserved words or any other character that requires quoting.
/// Quotes also stay when the identifier touches another identifier character,
/// as in `COUNT(*)"CNT"FROM`, since removing them would merge the tokens.
pub fn cleanup_quoted_identifiers(sql: &str) -> String {
    let tokens = tokenize(sql);
    let mut result = String::with_capacity(sql.len());

    for (idx, token) in tokens.iter().enumerate() {
        match token {
            Token::Char(c) => result.push(*c),
            Token::Verbatim(text) | Token::LineComment(text) => result.push_str(text),
            Token::QuotedIdentifier(name) => {
                let touches_before = result.chars().next_back().is_some_and(is_identifier_char);
                let touches_after = tokens
                    .get(idx + 1)
                    .and_then(Token::first_char)
                    .is_some_and(is_identifier_char);

                if touches_before || touches_after || needs_quoting(name) {
                    result.push('"');
                    result.push_str(&name.replace('"', "\"\""));
                    result.push('"');
                } else {
                    result.push_str(name);
                }
            }
        }
    }

    result
}

/// Make sure non-empty `sql` ends with exactly one statement terminator.
///
/// Trailing whitespace is removed first; empty text stays empty. When the
/// text ends in a `--` comment the terminator goes on a line of its own.
pub fn ensure_terminator(sql: &str) -> String {
    let trimmed = sql.trim_end();
    if trimmed.is_empty() {
        return String::new();
    }
    if matches!(tokenize(trimmed).last(), Some(Token::LineComment(_))) {
        return format!("{}\n{}", trimmed, STATEMENT_TERMINATOR);
    }
    if trimmed.ends_with(STATEMENT_TERMINATOR) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, STATEMENT_TERMINATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_removes_unneeded_quotes() {
        assert_eq!(
            cleanup_quoted_identifiers(r#"SELECT "ID", "AMOUNT" FROM "SCOTT"."SALES""#),
            "SELECT ID, AMOUNT FROM SCOTT.SALES"
        );
    }

    #[test]
    fn test_keeps_required_quotes() {
        let sql = r#"SELECT "Mixed", "WITH SPACE", "SELECT", "a""b" FROM "SCOTT"."t""#;
        assert_eq!(
            cleanup_quoted_identifiers(sql),
            r#"SELECT "Mixed", "WITH SPACE", "SELECT", "a""b" FROM SCOTT."t""#
        );
    }

    #[test]
    fn test_leaves_literals_and_comments() {
        let sql = "SELECT '\"ID\"' -- \"X\"\nFROM \"T\" /* \"Y\" */";
        assert_eq!(
            cleanup_quoted_identifiers(sql),
            "SELECT '\"ID\"' -- \"X\"\nFROM T /* \"Y\" */"
        );
    }

    #[test]
    fn test_adjacent_identifier_keeps_quotes() {
        assert_eq!(
            cleanup_quoted_identifiers(r#"SELECT COUNT(*)"CNT"FROM "T""#),
            r#"SELECT COUNT(*)"CNT"FROM T"#
        );
        assert_eq!(
            cleanup_quoted_identifiers(r#"SELECT A"B", "C"D FROM "T""#),
            r#"SELECT A"B", "C"D FROM T"#
        );
    }

    #[test]
    fn test_alternative_quoting_literal_is_copied() {
        assert_eq!(
            cleanup_quoted_identifiers(r#"SELECT q'[it's "X"]' FROM "T""#),
            r#"SELECT q'[it's "X"]' FROM T"#
        );
        assert_eq!(
            cleanup_quoted_identifiers(r#"SELECT NQ'{a'b}', Q'!x"Y"!' FROM "T""#),
            r#"SELECT NQ'{a'b}', Q'!x"Y"!' FROM T"#
        );
    }

    #[test]
    fn test_q_inside_identifier_is_not_a_literal() {
        assert_eq!(
            cleanup_quoted_identifiers(r#"SELECT SEQ, 'x' FROM "T""#),
            "SELECT SEQ, 'x' FROM T"
        );
    }

    #[test]
    fn test_unterminated_quote_is_kept() {
        assert_eq!(cleanup_quoted_identifiers("SELECT \"ABC"), "SELECT \"ABC");
    }

    #[test]
    fn test_ensure_terminator_appends_once() {
        assert_eq!(ensure_terminator("SELECT * FROM sales"), "SELECT * FROM sales;");
        assert_eq!(ensure_terminator("SELECT * FROM sales;"), "SELECT * FROM sales;");
        assert_eq!(ensure_terminator("SELECT * FROM sales;\n  "), "SELECT * FROM sales;");
    }

    #[test]
    fn test_ensure_terminator_after_line_comment() {
        assert_eq!(
            ensure_terminator("SELECT * FROM t -- note"),
            "SELECT * FROM t -- note\n;"
        );
        assert_eq!(
            ensure_terminator("SELECT * FROM t -- note;"),
            "SELECT * FROM t -- note;\n;"
        );
        assert_eq!(ensure_terminator("SELECT * FROM t -- note\n;"), "SELECT * FROM t -- note\n;");
        assert_eq!(ensure_terminator("SELECT '--' FROM t"), "SELECT '--' FROM t;");
    }

    #[test]
    fn test_ensure_terminator_empty() {
        assert_eq!(ensure_terminator(""), "");
        assert_eq!(ensure_terminator(" \n"), "");
    }
}
