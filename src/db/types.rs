//! PostgreSQL type mappings.
//!
//! Rows are converted to JSON maps in column order. Conversion uses a
//! two-phase approach:
//! 1. `TypeCategory` classifies the column type name into a logical category
//! 2. A per-category decoder extracts the value
//!
//! Statements run through the extended protocol, so values arrive in binary
//! format. NUMERIC values are rendered as exact decimal strings by
//! [`Numeric`], which understands both wire formats.

use serde::Serialize;
use serde_json::Value as JsonValue;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgRow, PgTypeInfo, PgTypeKind, PgValueFormat, PgValueRef};
use sqlx::{Column, Decode, Postgres, Row, Type, TypeInfo};

/// A result row keyed by column name, in column order.
pub type JsonRow = serde_json::Map<String, JsonValue>;

// =============================================================================
// Type Classification
// =============================================================================

/// Logical category for column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    Text,
    Binary,
    Json,
    Uuid,
    Timestamp,
    TimestampTz,
    Date,
    Time,
    TextArray,
    Unknown,
}

/// Classify a PostgreSQL type name into a logical category.
pub fn categorize_type(type_name: &str) -> TypeCategory {
    let lower = type_name.to_lowercase();

    if lower.ends_with("[]") || lower.starts_with('_') {
        let element = lower.trim_end_matches("[]").trim_start_matches('_');
        return match element {
            "text" | "varchar" | "bpchar" | "name" => TypeCategory::TextArray,
            _ => TypeCategory::Unknown,
        };
    }

    match lower.as_str() {
        "int2" | "int4" | "int8" | "smallint" | "integer" | "bigint" | "smallserial"
        | "serial" | "bigserial" => TypeCategory::Integer,
        "float4" | "float8" | "real" | "double precision" => TypeCategory::Float,
        "numeric" | "decimal" => TypeCategory::Decimal,
        "bool" | "boolean" => TypeCategory::Boolean,
        "text" | "varchar" | "character varying" | "bpchar" | "char" | "character" | "name"
        | "citext" => TypeCategory::Text,
        "bytea" => TypeCategory::Binary,
        "json" | "jsonb" => TypeCategory::Json,
        "uuid" => TypeCategory::Uuid,
        "timestamp" => TypeCategory::Timestamp,
        "timestamptz" => TypeCategory::TimestampTz,
        "date" => TypeCategory::Date,
        "time" => TypeCategory::Time,
        // enums, domains over unknown bases, and anything else
        _ => TypeCategory::Unknown,
    }
}

// =============================================================================
// Decimal Type Support
// =============================================================================

/// Exact NUMERIC value rendered as its decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, schemars::JsonSchema)]
#[serde(transparent)]
pub struct Numeric(pub String);

impl Numeric {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Numeric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Type<Postgres> for Numeric {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("numeric")
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        let name = ty.name().to_lowercase();
        name == "numeric" || name == "decimal"
    }
}

impl<'r> Decode<'r, Postgres> for Numeric {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        match value.format() {
            PgValueFormat::Text => Ok(Numeric(value.as_str()?.to_string())),
            PgValueFormat::Binary => Ok(Numeric(decode_numeric_binary(value.as_bytes()?)?)),
        }
    }
}

const NUMERIC_POS: u16 = 0x0000;
const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;

/// Decode the binary NUMERIC wire format into a decimal string.
///
/// Layout: `ndigits: i16, weight: i16, sign: u16, dscale: u16`, followed by
/// `ndigits` base-10000 digits. `weight` is the power of 10000 of the first
/// digit.
pub fn decode_numeric_binary(bytes: &[u8]) -> Result<String, BoxDynError> {
    if bytes.len() < 8 {
        return Err(format!("NUMERIC value too short: {} bytes", bytes.len()).into());
    }

    let read_i16 = |at: usize| i16::from_be_bytes([bytes[at], bytes[at + 1]]);
    let ndigits = read_i16(0);
    let weight = read_i16(2) as i32;
    let sign = u16::from_be_bytes([bytes[4], bytes[5]]);
    let dscale = u16::from_be_bytes([bytes[6], bytes[7]]) as usize;

    match sign {
        NUMERIC_NAN => return Ok("NaN".to_string()),
        NUMERIC_PINF => return Ok("Infinity".to_string()),
        NUMERIC_NINF => return Ok("-Infinity".to_string()),
        NUMERIC_POS | NUMERIC_NEG => {}
        other => return Err(format!("invalid NUMERIC sign: {other:#06x}").into()),
    }

    if ndigits < 0 || bytes.len() != 8 + ndigits as usize * 2 {
        return Err(format!("NUMERIC digit count mismatch: {ndigits}").into());
    }

    let digits: Vec<i16> = (0..ndigits as usize).map(|i| read_i16(8 + i * 2)).collect();
    let digit_at = |idx: i32| -> i16 {
        if idx < 0 {
            0
        } else {
            digits.get(idx as usize).copied().unwrap_or(0)
        }
    };

    let mut out = String::new();
    if sign == NUMERIC_NEG {
        out.push('-');
    }

    if weight < 0 {
        out.push('0');
    } else {
        for idx in 0..=weight {
            if idx == 0 {
                out.push_str(&digit_at(idx).to_string());
            } else {
                out.push_str(&format!("{:04}", digit_at(idx)));
            }
        }
    }

    if dscale > 0 {
        let groups = dscale.div_ceil(4) as i32;
        let mut fraction = String::with_capacity(groups as usize * 4);
        for k in 0..groups {
            fraction.push_str(&format!("{:04}", digit_at(weight + 1 + k)));
        }
        fraction.truncate(dscale);
        out.push('.');
        out.push_str(&fraction);
    }

    Ok(out)
}

// =============================================================================
// Binary Encoding
// =============================================================================

/// Decode binary data to JSON value.
///
/// Valid UTF-8 is returned as text; anything else is base64 encoded.
pub fn decode_binary_value(bytes: &[u8]) -> JsonValue {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    match std::str::from_utf8(bytes) {
        Ok(s) => JsonValue::String(s.to_string()),
        Err(_) => JsonValue::String(STANDARD.encode(bytes)),
    }
}

// =============================================================================
// Row to JSON Trait
// =============================================================================

/// Trait for converting database rows to JSON maps.
pub trait RowToJson {
    fn to_json_map(&self) -> JsonRow;
    fn column_names(&self) -> Vec<String>;
}

impl RowToJson for PgRow {
    fn to_json_map(&self) -> JsonRow {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let category = categorize_type(col.type_info().name());
                (col.name().to_string(), decode_column(self, idx, category))
            })
            .collect()
    }

    fn column_names(&self) -> Vec<String> {
        self.columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect()
    }
}

fn decode_column(row: &PgRow, idx: usize, category: TypeCategory) -> JsonValue {
    match category {
        TypeCategory::Integer => decode_integer(row, idx),
        TypeCategory::Float => decode_float(row, idx),
        TypeCategory::Decimal => decode_decimal(row, idx),
        TypeCategory::Boolean => decode_boolean(row, idx),
        TypeCategory::Binary => decode_binary_col(row, idx),
        TypeCategory::Json => decode_json(row, idx),
        TypeCategory::Uuid => decode_uuid(row, idx),
        TypeCategory::Timestamp => decode_serialized::<chrono::NaiveDateTime>(row, idx),
        TypeCategory::TimestampTz => {
            decode_serialized::<chrono::DateTime<chrono::Utc>>(row, idx)
        }
        TypeCategory::Date => decode_serialized::<chrono::NaiveDate>(row, idx),
        TypeCategory::Time => decode_serialized::<chrono::NaiveTime>(row, idx),
        TypeCategory::TextArray => decode_serialized::<Vec<String>>(row, idx),
        TypeCategory::Text => decode_text(row, idx),
        TypeCategory::Unknown => decode_unknown(row, idx),
    }
}

fn decode_decimal(row: &PgRow, idx: usize) -> JsonValue {
    match row.try_get::<Option<Numeric>, _>(idx) {
        Ok(Some(v)) => JsonValue::String(v.0),
        Ok(None) => JsonValue::Null,
        Err(e) => {
            tracing::error!("Failed to decode NUMERIC: {:?}", e);
            JsonValue::Null
        }
    }
}

fn decode_integer(row: &PgRow, idx: usize) -> JsonValue {
    if let Ok(Some(v)) = row.try_get::<Option<i16>, _>(idx) {
        return JsonValue::Number(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<i32>, _>(idx) {
        return JsonValue::Number(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(idx) {
        return JsonValue::Number(v.into());
    }
    JsonValue::Null
}

fn decode_boolean(row: &PgRow, idx: usize) -> JsonValue {
    row.try_get::<Option<bool>, _>(idx)
        .ok()
        .flatten()
        .map(JsonValue::Bool)
        .unwrap_or(JsonValue::Null)
}

fn decode_float(row: &PgRow, idx: usize) -> JsonValue {
    if let Ok(Some(v)) = row.try_get::<Option<f64>, _>(idx) {
        return serde_json::Number::from_f64(v)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(v.to_string()));
    }
    if let Ok(Some(v)) = row.try_get::<Option<f32>, _>(idx) {
        return serde_json::Number::from_f64(v as f64)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(v.to_string()));
    }
    JsonValue::Null
}

fn decode_binary_col(row: &PgRow, idx: usize) -> JsonValue {
    row.try_get::<Option<Vec<u8>>, _>(idx)
        .ok()
        .flatten()
        .map(|v| decode_binary_value(&v))
        .unwrap_or(JsonValue::Null)
}

fn decode_json(row: &PgRow, idx: usize) -> JsonValue {
    row.try_get::<Option<JsonValue>, _>(idx)
        .ok()
        .flatten()
        .unwrap_or(JsonValue::Null)
}

fn decode_uuid(row: &PgRow, idx: usize) -> JsonValue {
    row.try_get::<Option<uuid::Uuid>, _>(idx)
        .ok()
        .flatten()
        .map(|v| JsonValue::String(v.to_string()))
        .unwrap_or(JsonValue::Null)
}

fn decode_serialized<T>(row: &PgRow, idx: usize) -> JsonValue
where
    T: for<'r> Decode<'r, Postgres> + Type<Postgres> + Serialize,
{
    match row.try_get::<Option<T>, _>(idx) {
        Ok(Some(v)) => serde_json::to_value(v).unwrap_or(JsonValue::Null),
        Ok(None) => JsonValue::Null,
        Err(e) => {
            tracing::warn!(column = idx, error = %e, "Failed to decode column");
            JsonValue::Null
        }
    }
}

fn decode_text(row: &PgRow, idx: usize) -> JsonValue {
    row.try_get::<Option<String>, _>(idx)
        .ok()
        .flatten()
        .map(JsonValue::String)
        .unwrap_or(JsonValue::Null)
}

/// Enum labels travel as their text in both formats.
fn is_enum(ty: &PgTypeInfo) -> bool {
    matches!(ty.kind(), PgTypeKind::Enum(_))
}

/// Text-compatible columns decode as strings and enum labels (e.g.
/// `mpaa_rating`) through a type-unchecked text decode. Anything else
/// (tsvector, interval, arrays, ...) is null rather than raw wire bytes.
fn decode_unknown(row: &PgRow, idx: usize) -> JsonValue {
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map(JsonValue::String).unwrap_or(JsonValue::Null);
    }

    let ty = row.column(idx).type_info();
    if !is_enum(ty) {
        tracing::debug!(column = idx, type_name = ty.name(), "Unsupported column type");
        return JsonValue::Null;
    }

    row.try_get_unchecked::<Option<String>, _>(idx)
        .ok()
        .flatten()
        .map(JsonValue::String)
        .unwrap_or(JsonValue::Null)
}
