//! Type definitions for Razorgator API responses.

use crate::error::RazorgatorError;
use crate::xml::XmlElement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How structured responses are handed back to the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    /// Lists of orders become a [`ResultSet`](crate::ResultSet), anything else stays XML
    #[default]
    ResultSet,
    /// Always return the parsed XML document untouched
    Xml,
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultType::ResultSet => write!(f, "resultset"),
            ResultType::Xml => write!(f, "xml"),
        }
    }
}

impl std::str::FromStr for ResultType {
    type Err = RazorgatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resultset" => Ok(ResultType::ResultSet),
            "xml" => Ok(ResultType::Xml),
            other => Err(RazorgatorError::config(format!(
                "Unknown result type '{}', expected 'resultset' or 'xml'",
                other
            ))),
        }
    }
}

/// Semantic type of a record attribute, decided by its name alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Float,
    Boolean,
    String,
}

impl FieldKind {
    /// Look up the type of an attribute. Unknown names are strings.
    pub fn for_field(name: &str) -> Self {
        match name {
            "orderId" | "brokerTicketId" | "quantity" | "purchaseOrderId" => FieldKind::Integer,
            "cost" => FieldKind::Float,
            "electronicDelivery" => FieldKind::Boolean,
            _ => FieldKind::String,
        }
    }

    /// Convert a raw attribute value. Numbers use their leading numeric
    /// prefix (exponents included) and fall back to zero; integers that do
    /// not fit saturate at `i64::MIN`/`i64::MAX`.
    pub fn coerce(self, raw: &str) -> FieldValue {
        match self {
            FieldKind::Integer => FieldValue::Integer(leading_integer(raw)),
            FieldKind::Float => FieldValue::Float(leading_float(raw)),
            FieldKind::Boolean => FieldValue::Boolean(matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "y"
            )),
            FieldKind::String => FieldValue::String(raw.to_string()),
        }
    }
}

fn leading_integer(raw: &str) -> i64 {
    let prefix = numeric_prefix(raw);
    match prefix.parse::<i64>() {
        Ok(value) => value,
        // `as` saturates on overflow and maps NaN to zero
        Err(_) => prefix.parse::<f64>().map_or(0, |value| value as i64),
    }
}

fn leading_float(raw: &str) -> f64 {
    numeric_prefix(raw).parse().unwrap_or(0.0)
}

/// Longest prefix of the form `[+-]digits[.digits][(e|E)[+-]digits]`
fn numeric_prefix(raw: &str) -> &str {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    let digits_from = |mut at: usize| {
        while at < bytes.len() && bytes[at].is_ascii_digit() {
            at += 1;
        }
        at
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let integer_end = digits_from(end);
    let mut mantissa_digits = integer_end - end;
    end = integer_end;
    if bytes.get(end) == Some(&b'.') {
        let fraction_end = digits_from(end + 1);
        mantissa_digits += fraction_end - (end + 1);
        end = fraction_end;
    }
    if mantissa_digits > 0 && matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_end = digits_from(exponent);
        if exponent_end > exponent {
            end = exponent_end;
        }
    }
    &raw[..end]
}

/// A single typed value inside a [`Record`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    Nested(Record),
}

impl FieldValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric view of integers and floats
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(value) => Some(*value as f64),
            FieldValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            FieldValue::Nested(record) => Some(record),
            _ => None,
        }
    }

    /// Equality used when matching identifiers: numbers compare by value
    /// across integer, float and numeric string representations.
    pub fn matches(&self, other: &FieldValue) -> bool {
        use FieldValue::*;
        match (self, other) {
            (Integer(a), Integer(b)) => a == b,
            (Integer(a), Float(b)) | (Float(b), Integer(a)) => *a as f64 == *b,
            (Float(a), Float(b)) => a == b,
            (Boolean(a), Boolean(b)) => a == b,
            (String(a), String(b)) => a == b,
            (String(s), number) | (number, String(s)) if number.as_f64().is_some() => {
                s.trim().parse::<f64>().ok() == number.as_f64()
            }
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(value) => write!(f, "{}", value),
            FieldValue::Float(value) => write!(f, "{}", value),
            FieldValue::Boolean(value) => write!(f, "{}", value),
            FieldValue::String(value) => write!(f, "{}", value),
            FieldValue::Nested(record) => write!(f, "{{{} fields}}", record.len()),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

/// One order (or ticket) parsed from the attributes of a payload element.
///
/// Child elements of the payload are kept as nested records under their
/// element name, so `<office id="3"><brokerage id="9"/></office>` is reachable
/// as `office.brokerage.id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from an element, coercing every attribute by name.
    /// Namespace declarations are skipped and child records are keyed by
    /// local name.
    pub fn from_element(element: &XmlElement) -> Self {
        let mut record = Record::new();
        for (name, raw) in element.plain_attributes() {
            record.insert(name, FieldKind::for_field(name).coerce(raw));
        }
        for child in &element.children {
            record
                .fields
                .entry(child.local_name.clone())
                .or_insert_with(|| FieldValue::Nested(Record::from_element(child)));
        }
        record
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Follow a chain of nested records, e.g. `["office", "brokerage", "id"]`
    pub fn get_path(&self, path: &[&str]) -> Option<&FieldValue> {
        let (last, parents) = path.split_last()?;
        let mut record = self;
        for segment in parents {
            record = record.get(segment)?.as_record()?;
        }
        record.get(last)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FieldValue::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_bool)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    pub fn get_record(&self, name: &str) -> Option<&Record> {
        self.get(name).and_then(FieldValue::as_record)
    }

    pub fn order_id(&self) -> Option<i64> {
        self.get_i64("orderId")
    }

    pub fn purchase_order_id(&self) -> Option<i64> {
        self.get_i64("purchaseOrderId")
    }

    pub fn broker_ticket_id(&self) -> Option<i64> {
        self.get_i64("brokerTicketId")
    }

    pub fn quantity(&self) -> Option<i64> {
        self.get_i64("quantity")
    }

    pub fn cost(&self) -> Option<f64> {
        self.get_f64("cost")
    }

    pub fn electronic_delivery(&self) -> Option<bool> {
        self.get_bool("electronicDelivery")
    }

    /// Iterate over fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
