use std::sync::Arc;

use chrono::NaiveDate;
use mysql_async::{Row, Value};

use crate::results::ResultSet;
use crate::types::RowValues;

/// Convert a `mysql_async` value into `RowValues`.
///
/// Text comes back as bytes under the binary protocol; valid UTF-8 becomes `Text`, anything
/// else stays a `Blob`.
#[must_use]
pub fn mysql_value_to_row_value(value: &Value) -> RowValues {
    match value {
        Value::NULL => RowValues::Null,
        Value::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => RowValues::Text(text.to_string()),
            Err(_) => RowValues::Blob(bytes.clone()),
        },
        Value::Int(i) => RowValues::Int(*i),
        Value::UInt(u) => {
            i64::try_from(*u).map_or_else(|_| RowValues::Text(u.to_string()), RowValues::Int)
        }
        Value::Float(f) => RowValues::Float(f64::from(*f)),
        Value::Double(d) => RowValues::Float(*d),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            NaiveDate::from_ymd_opt(i32::from(*year), u32::from(*month), u32::from(*day))
                .and_then(|date| {
                    date.and_hms_micro_opt(
                        u32::from(*hour),
                        u32::from(*minute),
                        u32::from(*second),
                        *micros,
                    )
                })
                .map_or_else(|| RowValues::Text(value.as_sql(true)), RowValues::Timestamp)
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if *negative { "-" } else { "" };
            let hours = u32::from(*hours) + days * 24;
            RowValues::Text(format!("{sign}{hours:02}:{minutes:02}:{seconds:02}.{micros:06}"))
        }
    }
}

/// Build a result set from fetched rows and the driver-reported column names.
#[must_use]
pub fn build_result_set(column_names: Vec<String>, rows: &[Row]) -> ResultSet {
    let col_count = column_names.len();
    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_column_names(Arc::new(column_names));
    for row in rows {
        let values = (0..col_count)
            .map(|i| row.as_ref(i).map_or(RowValues::Null, mysql_value_to_row_value))
            .collect();
        result_set.add_row_values(values);
    }
    result_set
}
