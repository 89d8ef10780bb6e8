//! CREATE TABLE generation from field descriptors.
//!
//! Output always starts with an auto-increment integer `id` key, then one column per field
//! in declaration order. `MySQL` output ends with the primary-key clause and a charset
//! directive; `SQLite` declares the key inline and has no charset.

use super::field::Field;
use crate::error::OrmError;
use crate::statements::{is_identifier, quote_identifier};
use crate::types::DatabaseType;

/// Render the DDL for `table`.
///
/// ```rust
/// use lazy_orm::model::{Field, create_table_sql};
/// use lazy_orm::DatabaseType;
///
/// let title = Field::char();
/// let sql = create_table_sql("blogs", [("title", &title)], DatabaseType::Mysql, "utf8")?;
/// assert_eq!(
///     sql,
///     "CREATE TABLE `blogs` (\n  `id` INT AUTO_INCREMENT NOT NULL,\n  \
///      `title` VARCHAR(255) NOT NULL,\n  PRIMARY KEY (`id`)\n) DEFAULT CHARSET utf8;"
/// );
/// # Ok::<(), lazy_orm::OrmError>(())
/// ```
///
/// # Errors
/// Returns `OrmError::InvalidIdentifier` for a bad table or field name, or
/// `OrmError::ConfigError` for a charset that is not a plain name.
pub fn create_table_sql<'a>(
    table: &str,
    fields: impl IntoIterator<Item = (&'a str, &'a Field)>,
    dialect: DatabaseType,
    charset: &str,
) -> Result<String, OrmError> {
    let mut fields: Vec<(&str, &Field)> = fields.into_iter().collect();
    fields.sort_by_key(|(_, field)| field.order());

    let mut lines = Vec::with_capacity(fields.len() + 2);
    lines.push(match dialect {
        DatabaseType::Mysql => "  `id` INT AUTO_INCREMENT NOT NULL".to_string(),
        DatabaseType::Sqlite => "  `id` INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL".to_string(),
    });
    for (name, field) in fields {
        let null = if field.is_nullable() { "" } else { " NOT NULL" };
        lines.push(format!("  {} {}{null}", quote_identifier(name)?, field.ddl_type()));
    }

    let table = quote_identifier(table)?;
    match dialect {
        DatabaseType::Mysql => {
            if !is_identifier(charset) {
                return Err(OrmError::ConfigError(format!(
                    "charset {charset:?} is not a valid character set name"
                )));
            }
            lines.push("  PRIMARY KEY (`id`)".to_string());
            Ok(format!(
                "CREATE TABLE {table} (\n{}\n) DEFAULT CHARSET {charset};",
                lines.join(",\n")
            ))
        }
        DatabaseType::Sqlite => Ok(format!("CREATE TABLE {table} (\n{}\n);", lines.join(",\n"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_follow_declaration_order() {
        let subject = Field::char();
        let name = Field::text();
        let score = Field::integer().nullable(true);
        // Supplied out of order on purpose.
        let sql = create_table_sql(
            "student",
            [("score", &score), ("name", &name), ("subject", &subject)],
            DatabaseType::Mysql,
            "utf8",
        )
        .unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE `student` (\n\
             \x20 `id` INT AUTO_INCREMENT NOT NULL,\n\
             \x20 `subject` VARCHAR(255) NOT NULL,\n\
             \x20 `name` text NOT NULL,\n\
             \x20 `score` int,\n\
             \x20 PRIMARY KEY (`id`)\n\
             ) DEFAULT CHARSET utf8;"
        );
    }

    #[test]
    fn output_is_deterministic() {
        let a = Field::char();
        let b = Field::time();
        let render = || create_table_sql("t", [("b", &b), ("a", &a)], DatabaseType::Sqlite, "utf8");
        assert_eq!(render().unwrap(), render().unwrap());
    }

    #[test]
    fn sqlite_declares_key_inline() {
        let title = Field::char();
        let sql =
            create_table_sql("blogs", [("title", &title)], DatabaseType::Sqlite, "utf8").unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE `blogs` (\n  `id` INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,\n  \
             `title` VARCHAR(255) NOT NULL\n);"
        );
    }

    #[test]
    fn table_without_fields_has_only_the_key() {
        let sql = create_table_sql("empty", std::iter::empty(), DatabaseType::Mysql, "utf8mb4")
            .unwrap();
        assert!(sql.contains("`id` INT AUTO_INCREMENT NOT NULL,\n  PRIMARY KEY (`id`)"));
        assert!(sql.ends_with("DEFAULT CHARSET utf8mb4;"));
    }

    #[test]
    fn bad_names_are_rejected() {
        let f = Field::char();
        assert!(matches!(
            create_table_sql("t", [("bad name", &f)], DatabaseType::Mysql, "utf8"),
            Err(OrmError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            create_table_sql("t", [("ok", &f)], DatabaseType::Mysql, "utf8; --"),
            Err(OrmError::ConfigError(_))
        ));
    }
}
