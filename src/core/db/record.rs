//! MySQL row to JSON record conversion.

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use super::Record;

/// Layout used for DATETIME columns.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Convert a row into a record keyed by column name.
pub fn row_to_record(row: &MySqlRow) -> Record {
    let mut record = Record::new();
    for (i, column) in row.columns().iter().enumerate() {
        record.insert(
            column.name().to_string(),
            column_value(row, i, column.type_info().name()),
        );
    }
    record
}

/// How a column is decoded, keyed off the MySQL type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Bool,
    Signed,
    Unsigned,
    Float,
    Date,
    DateTime,
    Timestamp,
    Time,
    Json,
    Binary,
    Text,
}

fn column_kind(type_name: &str) -> ColumnKind {
    match type_name {
        "BOOLEAN" => ColumnKind::Bool,
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => ColumnKind::Signed,
        t if t.ends_with("UNSIGNED") => ColumnKind::Unsigned,
        "FLOAT" | "DOUBLE" => ColumnKind::Float,
        "DATE" => ColumnKind::Date,
        "DATETIME" => ColumnKind::DateTime,
        "TIMESTAMP" => ColumnKind::Timestamp,
        "TIME" => ColumnKind::Time,
        "JSON" => ColumnKind::Json,
        "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            ColumnKind::Binary
        }
        // Text, ENUM, DECIMAL and anything unrecognised.
        _ => ColumnKind::Text,
    }
}

fn column_value(row: &MySqlRow, i: usize, type_name: &str) -> Value {
    let is_null = row.try_get_raw(i).map(|v| v.is_null()).unwrap_or(true);
    resolve(
        is_null,
        || typed_value(row, i, column_kind(type_name)),
        || row.try_get_unchecked::<String, _>(i).ok(),
    )
}

/// NULL wins; otherwise the typed decode, falling back to the raw text.
fn resolve(
    is_null: bool,
    typed: impl FnOnce() -> Option<Value>,
    text: impl FnOnce() -> Option<String>,
) -> Value {
    if is_null {
        return Value::Null;
    }
    typed().unwrap_or_else(|| text().map(Value::String).unwrap_or(Value::Null))
}

fn typed_value(row: &MySqlRow, i: usize, kind: ColumnKind) -> Option<Value> {
    match kind {
        ColumnKind::Bool => row.try_get::<bool, _>(i).ok().map(Value::Bool),
        ColumnKind::Signed => row.try_get::<i64, _>(i).ok().map(Value::from),
        ColumnKind::Unsigned => row.try_get::<u64, _>(i).ok().map(Value::from),
        ColumnKind::Float => row.try_get::<f64, _>(i).ok().map(Value::from),
        ColumnKind::Date => row.try_get::<NaiveDate, _>(i).ok().map(date_value),
        ColumnKind::DateTime => row.try_get::<NaiveDateTime, _>(i).ok().map(datetime_value),
        ColumnKind::Timestamp => row.try_get::<DateTime<Utc>, _>(i).ok().map(timestamp_value),
        ColumnKind::Time => row
            .try_get::<NaiveTime, _>(i)
            .ok()
            .map(|t| Value::String(t.format("%H:%M:%S").to_string())),
        ColumnKind::Json => row.try_get::<Value, _>(i).ok(),
        ColumnKind::Binary => row.try_get::<Vec<u8>, _>(i).ok().map(|b| binary_value(&b)),
        ColumnKind::Text => None,
    }
}

fn date_value(d: NaiveDate) -> Value {
    Value::String(d.format("%Y-%m-%d").to_string())
}

fn datetime_value(dt: NaiveDateTime) -> Value {
    Value::String(dt.format(DATETIME_FORMAT).to_string())
}

fn timestamp_value(dt: DateTime<Utc>) -> Value {
    Value::String(dt.to_rfc3339())
}

fn binary_value(bytes: &[u8]) -> Value {
    Value::String(STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_column_kinds() {
        assert_eq!(column_kind("INT"), ColumnKind::Signed);
        assert_eq!(column_kind("BIGINT UNSIGNED"), ColumnKind::Unsigned);
        assert_eq!(column_kind("DATE"), ColumnKind::Date);
        assert_eq!(column_kind("DATETIME"), ColumnKind::DateTime);
        assert_eq!(column_kind("TIMESTAMP"), ColumnKind::Timestamp);
        assert_eq!(column_kind("MEDIUMBLOB"), ColumnKind::Binary);
        for text in ["VARCHAR", "TEXT", "ENUM", "DECIMAL", "GEOMETRY"] {
            assert_eq!(column_kind(text), ColumnKind::Text, "{text}");
        }
    }

    #[test]
    fn test_null_short_circuits_decoding() {
        let value = resolve(
            true,
            || panic!("typed decode on NULL"),
            || panic!("text decode on NULL"),
        );
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn test_text_fallback() {
        assert_eq!(resolve(false, || None, || Some("12.50".into())), json!("12.50"));
        assert_eq!(resolve(false, || None, || None), Value::Null);
        assert_eq!(resolve(false, || Some(json!(7)), || Some("7".into())), json!(7));
    }

    #[test]
    fn test_temporal_and_binary_formats() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 27).unwrap();
        assert_eq!(date_value(date), json!("2025-08-27"));

        let dt = date.and_hms_opt(13, 30, 5).unwrap();
        assert_eq!(datetime_value(dt), json!("2025-08-27T13:30:05"));

        let ts = Utc.with_ymd_and_hms(2025, 8, 27, 4, 30, 0).unwrap();
        assert_eq!(timestamp_value(ts), json!("2025-08-27T04:30:00+00:00"));

        assert_eq!(binary_value(b"smu"), json!("c211"));
    }
}
