use std::borrow::Cow;
use std::fmt::Write;

mod parsers;
mod scanner;

use parsers::{closes_quote, is_block_comment_end, is_block_comment_start, is_line_comment_start};
use scanner::{State, scan_digits};

/// Native placeholder marker of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// Bare `?` markers bound by position (`MySQL`).
    Positional,
    /// Numbered `?1`, `?2`, ... markers (`SQLite`).
    Numbered,
}

/// SQL rewritten for a backend together with the number of placeholders found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translated<'a> {
    pub sql: Cow<'a, str>,
    pub markers: usize,
}

/// Rewrite `?` markers into the target backend's native marker.
///
/// Markers inside string literals, quoted identifiers and comments are left alone and not
/// counted. Backslash escapes inside literals are honoured only for the positional (`MySQL`)
/// style; `SQLite` treats a backslash as an ordinary character.
///
/// A `?` already followed by digits is treated as a literal numbered marker and passed through
/// untouched (and uncounted); callers are expected to write bare `?`.
///
/// ```rust
/// use lazy_orm::translation::{PlaceholderStyle, translate_placeholders};
///
/// let sql = "select * from t where a = ? and b = '?'";
/// let t = translate_placeholders(sql, PlaceholderStyle::Numbered);
/// assert_eq!(t.sql, "select * from t where a = ?1 and b = '?'");
/// assert_eq!(t.markers, 1);
/// ```
#[must_use]
pub fn translate_placeholders(sql: &str, target: PlaceholderStyle) -> Translated<'_> {
    let bytes = sql.as_bytes();
    let mut out: Option<String> = None;
    let mut copied_to = 0;
    let mut markers = 0;
    let mut state = State::Normal;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'`' => state = State::BacktickQuoted,
                _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'?' => {
                    if let Some(end) = scan_digits(bytes, idx + 1) {
                        idx = end;
                        continue;
                    }
                    markers += 1;
                    if target == PlaceholderStyle::Numbered {
                        let buf = out.get_or_insert_with(|| String::with_capacity(sql.len() + 8));
                        buf.push_str(&sql[copied_to..idx]);
                        let _ = write!(buf, "?{markers}");
                        copied_to = idx + 1;
                    }
                }
                _ => {}
            },
            State::SingleQuoted | State::DoubleQuoted | State::BacktickQuoted => {
                let quote = match state {
                    State::SingleQuoted => b'\'',
                    State::DoubleQuoted => b'"',
                    _ => b'`',
                };
                if b == b'\\' && quote != b'`' && target == PlaceholderStyle::Positional {
                    idx += 1; // MySQL backslash escape
                } else if b == quote {
                    if closes_quote(bytes, idx, quote) {
                        state = State::Normal;
                    } else {
                        idx += 1; // skip doubled quote
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if is_block_comment_end(bytes, idx) {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
        }
        idx += 1;
    }

    let sql = match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied_to..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    };
    Translated { sql, markers }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_markers_for_sqlite() {
        let t = translate_placeholders(
            "insert into t(a, b, c) values(?, ?, ?)",
            PlaceholderStyle::Numbered,
        );
        assert_eq!(t.sql, "insert into t(a, b, c) values(?1, ?2, ?3)");
        assert_eq!(t.markers, 3);
    }

    #[test]
    fn positional_style_counts_without_rewriting() {
        let sql = "update t set a = ? where id = ?";
        let t = translate_placeholders(sql, PlaceholderStyle::Positional);
        assert!(matches!(t.sql, Cow::Borrowed(_)));
        assert_eq!(t.sql, sql);
        assert_eq!(t.markers, 2);
    }

    #[test]
    fn skips_inside_literals_identifiers_and_comments() {
        let sql = "select '?', `a?`, \"?\" -- ?\n/* ? /* ? */ */ # ?\nfrom t where a = ?";
        let t = translate_placeholders(sql, PlaceholderStyle::Numbered);
        assert_eq!(
            t.sql,
            "select '?', `a?`, \"?\" -- ?\n/* ? /* ? */ */ # ?\nfrom t where a = ?1"
        );
        assert_eq!(t.markers, 1);
    }

    #[test]
    fn handles_doubled_quotes() {
        let sql = "select 'it''s ?' from t where b = ?";
        let t = translate_placeholders(sql, PlaceholderStyle::Numbered);
        assert_eq!(t.sql, "select 'it''s ?' from t where b = ?1");
        assert_eq!(t.markers, 1);
    }

    #[test]
    fn backslash_escapes_quote_for_mysql() {
        let sql = "select 'a\\'?' from t where b = ?";
        let t = translate_placeholders(sql, PlaceholderStyle::Positional);
        assert_eq!(t.markers, 1);
    }

    #[test]
    fn backslash_is_literal_for_sqlite() {
        let sql = "select * from t where name = 'C:\\' and score = ?";
        let t = translate_placeholders(sql, PlaceholderStyle::Numbered);
        assert_eq!(t.sql, "select * from t where name = 'C:\\' and score = ?1");
        assert_eq!(t.markers, 1);
    }

    #[test]
    fn preserves_multibyte_text() {
        let t = translate_placeholders("select '语文', ? from t", PlaceholderStyle::Numbered);
        assert_eq!(t.sql, "select '语文', ?1 from t");
    }

    #[test]
    fn numbered_markers_pass_through() {
        let t = translate_placeholders("select ?1, ?", PlaceholderStyle::Numbered);
        assert_eq!(t.sql, "select ?1, ?1");
        assert_eq!(t.markers, 1);
    }
}
