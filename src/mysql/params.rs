use chrono::{Datelike, Timelike};
use mysql_async::{Params, Value};

use crate::types::RowValues;

/// Convert a single `RowValues` to a `mysql_async` value.
#[must_use]
pub fn row_value_to_mysql_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Int(*i),
        RowValues::Float(f) => Value::Double(*f),
        RowValues::Text(s) => Value::Bytes(s.clone().into_bytes()),
        RowValues::Bool(b) => Value::Int(i64::from(*b)),
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        RowValues::Timestamp(dt) => Value::Date(
            dt.year() as u16,
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
            dt.nanosecond() / 1_000,
        ),
        RowValues::Null => Value::NULL,
        RowValues::JSON(jval) => Value::Bytes(jval.to_string().into_bytes()),
        RowValues::Blob(bytes) => Value::Bytes(bytes.clone()),
    }
}

/// Convert bound parameters; an empty list binds nothing.
#[must_use]
pub fn convert_params(params: &[RowValues]) -> Params {
    if params.is_empty() {
        Params::Empty
    } else {
        Params::Positional(params.iter().map(row_value_to_mysql_value).collect())
    }
}
