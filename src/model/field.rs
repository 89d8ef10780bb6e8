use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::types::RowValues;

static DECLARATION_ORDER: AtomicU64 = AtomicU64::new(0);

/// Column type family of a [`Field`]; selects the default DDL and default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `VARCHAR(255)`, default `""`
    Char,
    /// `int`, default `0`
    Integer,
    /// `double`, default `0.0`
    Float,
    /// `double` seconds since the Unix epoch, defaulting to the time of the read
    Time,
    /// `text`, default `""`
    Text,
}

impl FieldKind {
    #[must_use]
    pub fn default_ddl(self) -> &'static str {
        match self {
            FieldKind::Char => "VARCHAR(255)",
            FieldKind::Integer => "int",
            FieldKind::Float | FieldKind::Time => "double",
            FieldKind::Text => "text",
        }
    }

    fn default_value(self) -> FieldDefault {
        match self {
            FieldKind::Char | FieldKind::Text => {
                FieldDefault::Value(RowValues::Text(String::new()))
            }
            FieldKind::Integer => FieldDefault::Value(RowValues::Int(0)),
            FieldKind::Float => FieldDefault::Value(RowValues::Float(0.0)),
            FieldKind::Time => FieldDefault::Producer(Arc::new(unix_now)),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn unix_now() -> RowValues {
    RowValues::Float(Utc::now().timestamp_micros() as f64 / 1_000_000.0)
}

/// Default of a field: a fixed value, or a producer called on every read.
#[derive(Clone)]
pub enum FieldDefault {
    Value(RowValues),
    Producer(Arc<dyn Fn() -> RowValues + Send + Sync>),
}

impl FieldDefault {
    #[must_use]
    pub fn resolve(&self) -> RowValues {
        match self {
            FieldDefault::Value(value) => value.clone(),
            FieldDefault::Producer(produce) => produce(),
        }
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::Value(value) => f.debug_tuple("Value").field(value).finish(),
            FieldDefault::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// Declarative description of one mapped column.
///
/// Each descriptor takes the next value of a process-wide counter when it is built;
/// generated DDL lists columns in that order, which is the order they were declared.
///
/// ```rust
/// use lazy_orm::model::Field;
///
/// let title = Field::char();
/// let body = Field::text().nullable(true);
/// assert!(title.order() < body.order());
/// assert_eq!(body.ddl_type(), "text");
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    kind: FieldKind,
    default: FieldDefault,
    ddl: String,
    nullable: bool,
    updatable: bool,
    insertable: bool,
    order: u64,
}

impl Field {
    #[must_use]
    pub fn new(kind: FieldKind) -> Self {
        Field {
            kind,
            default: kind.default_value(),
            ddl: kind.default_ddl().to_string(),
            nullable: false,
            updatable: true,
            insertable: true,
            order: DECLARATION_ORDER.fetch_add(1, Ordering::Relaxed),
        }
    }

    #[must_use]
    pub fn char() -> Self {
        Self::new(FieldKind::Char)
    }

    #[must_use]
    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    #[must_use]
    pub fn float() -> Self {
        Self::new(FieldKind::Float)
    }

    #[must_use]
    pub fn time() -> Self {
        Self::new(FieldKind::Time)
    }

    #[must_use]
    pub fn text() -> Self {
        Self::new(FieldKind::Text)
    }

    #[must_use]
    pub fn default(mut self, value: impl Into<RowValues>) -> Self {
        self.default = FieldDefault::Value(value.into());
        self
    }

    /// Use `produce` for the default; it is called again on every read.
    #[must_use]
    pub fn default_with<F>(mut self, produce: F) -> Self
    where
        F: Fn() -> RowValues + Send + Sync + 'static,
    {
        self.default = FieldDefault::Producer(Arc::new(produce));
        self
    }

    /// Override the column type fragment used in DDL.
    #[must_use]
    pub fn ddl(mut self, ddl: impl Into<String>) -> Self {
        self.ddl = ddl.into();
        self
    }

    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    #[must_use]
    pub fn updatable(mut self, updatable: bool) -> Self {
        self.updatable = updatable;
        self
    }

    #[must_use]
    pub fn insertable(mut self, insertable: bool) -> Self {
        self.insertable = insertable;
        self
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    #[must_use]
    pub fn ddl_type(&self) -> &str {
        &self.ddl
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub fn is_updatable(&self) -> bool {
        self.updatable
    }

    #[must_use]
    pub fn is_insertable(&self) -> bool {
        self.insertable
    }

    #[must_use]
    pub fn order(&self) -> u64 {
        self.order
    }

    /// The default value, evaluated now.
    #[must_use]
    pub fn default_value(&self) -> RowValues {
        self.default.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicI64;

    #[test]
    fn kinds_supply_their_defaults() {
        let name = Field::char();
        assert_eq!(name.ddl_type(), "VARCHAR(255)");
        assert_eq!(name.default_value(), RowValues::Text(String::new()));
        assert!(!name.is_nullable());
        assert!(name.is_updatable() && name.is_insertable());

        assert_eq!(Field::integer().default_value(), RowValues::Int(0));
        assert_eq!(Field::text().ddl_type(), "text");
        assert_eq!(Field::time().ddl_type(), "double");
    }

    #[test]
    fn options_override_defaults() {
        let field = Field::integer()
            .default(7_i64)
            .ddl("bigint")
            .nullable(true)
            .updatable(false);
        assert_eq!(field.default_value(), RowValues::Int(7));
        assert_eq!(field.ddl_type(), "bigint");
        assert!(field.is_nullable());
        assert!(!field.is_updatable());
        assert!(field.is_insertable());
    }

    #[test]
    fn producers_run_on_every_read() {
        let calls = Arc::new(AtomicI64::new(0));
        let counter = Arc::clone(&calls);
        let field = Field::integer()
            .default_with(move || RowValues::Int(counter.fetch_add(1, Ordering::SeqCst)));
        assert_eq!(field.default_value(), RowValues::Int(0));
        assert_eq!(field.default_value(), RowValues::Int(1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn time_default_reflects_read_time() {
        let field = Field::time();
        let first = field.default_value().as_float().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = field.default_value().as_float().unwrap();
        assert!(second > first);
    }

    #[test]
    fn declaration_order_increases() {
        let a = Field::char();
        let b = Field::integer();
        let c = Field::text();
        assert!(a.order() < b.order() && b.order() < c.order());
    }
}
