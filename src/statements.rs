//! SQL text builders.
//!
//! Identifiers (table and column names) are the only things ever interpolated into
//! statement text, and only after [`quote_identifier`] has validated them. Values are
//! always emitted as `?` markers and bound separately.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::OrmError;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// True when `name` may be interpolated into SQL text as an identifier.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Validate and back-quote a table or column name.
///
/// # Errors
/// Returns `OrmError::InvalidIdentifier` if `name` is not a plain identifier.
pub fn quote_identifier(name: &str) -> Result<String, OrmError> {
    if is_identifier(name) {
        Ok(format!("`{name}`"))
    } else {
        Err(OrmError::InvalidIdentifier(name.to_string()))
    }
}

fn quote_all<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Vec<String>, OrmError> {
    names.into_iter().map(quote_identifier).collect()
}

/// `INSERT INTO `table`(`a`, `b`) VALUES(?, ?)` with columns in the given order.
///
/// # Errors
/// Returns `OrmError::ParameterError` for an empty column list, or
/// `OrmError::InvalidIdentifier` for a bad name.
pub fn insert_sql<'a>(
    table: &str,
    columns: impl IntoIterator<Item = &'a str>,
) -> Result<String, OrmError> {
    let columns = quote_all(columns)?;
    if columns.is_empty() {
        return Err(OrmError::ParameterError(format!(
            "insert into {table:?} needs at least one field"
        )));
    }
    let markers = vec!["?"; columns.len()].join(", ");
    Ok(format!(
        "INSERT INTO {}({}) VALUES({markers})",
        quote_identifier(table)?,
        columns.join(", ")
    ))
}

/// `SELECT * FROM `table` WHERE `a`=? AND `b`=?`.
///
/// # Errors
/// Returns `OrmError::ParameterError` when no criteria are given, or
/// `OrmError::InvalidIdentifier` for a bad name.
pub fn select_where_sql<'a>(
    table: &str,
    columns: impl IntoIterator<Item = &'a str>,
) -> Result<String, OrmError> {
    let predicates = equality_list(columns)?;
    if predicates.is_empty() {
        return Err(OrmError::ParameterError(format!(
            "lookup on {table:?} needs at least one criterion"
        )));
    }
    Ok(format!(
        "SELECT * FROM {} WHERE {}",
        quote_identifier(table)?,
        predicates.join(" AND ")
    ))
}

/// `UPDATE `table` SET `a`=?, `b`=? WHERE `id`=?`; the id is the last bound parameter.
///
/// # Errors
/// Returns `OrmError::ParameterError` when there is nothing to set, or
/// `OrmError::InvalidIdentifier` for a bad name.
pub fn update_by_id_sql<'a>(
    table: &str,
    columns: impl IntoIterator<Item = &'a str>,
) -> Result<String, OrmError> {
    let assignments = equality_list(columns)?;
    if assignments.is_empty() {
        return Err(OrmError::ParameterError(format!(
            "update of {table:?} needs at least one updatable field"
        )));
    }
    Ok(format!(
        "UPDATE {} SET {} WHERE `id`=?",
        quote_identifier(table)?,
        assignments.join(", ")
    ))
}

/// `DELETE FROM `table` WHERE `id`=?`; the table name is interpolated, the id is bound.
///
/// # Errors
/// Returns `OrmError::InvalidIdentifier` for a bad table name.
pub fn delete_by_id_sql(table: &str) -> Result<String, OrmError> {
    Ok(format!("DELETE FROM {} WHERE `id`=?", quote_identifier(table)?))
}

fn equality_list<'a>(columns: impl IntoIterator<Item = &'a str>) -> Result<Vec<String>, OrmError> {
    Ok(quote_all(columns)?
        .into_iter()
        .map(|col| format!("{col}=?"))
        .collect())
}

/// True when the statement's first keyword is `INSERT` (or `REPLACE`), ignoring leading
/// whitespace and comments.
pub(crate) fn is_insert(sql: &str) -> bool {
    let mut rest = sql.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.split_once('\n').map_or("", |(_, tail)| tail).trim_start();
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.split_once("*/").map_or("", |(_, tail)| tail).trim_start();
        } else {
            break;
        }
    }
    let keyword: String = rest
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .collect();
    keyword.eq_ignore_ascii_case("insert") || keyword.eq_ignore_ascii_case("replace")
}
