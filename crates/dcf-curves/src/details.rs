//! Key-ordered detail records for reporting.
//!
//! A [`Details`] record is an insertion-ordered map from string labels to
//! typed values.  Payoffs and option models fill one per cashflow; the
//! cashflow-list table is the union of its rows' keys.

use std::fmt;

use dcf_core::Real;
use dcf_time::Date;

/// A single detail value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A floating-point number.
    Float(Real),
    /// An integer (used for identity tags).
    Int(i64),
    /// A date.
    Date(Date),
    /// A label.
    Text(String),
    /// A flag.
    Bool(bool),
}

impl Value {
    /// The value as a float, if it is one.
    pub fn as_float(&self) -> Option<Real> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// The value as a date, if it is one.
    pub fn as_date(&self) -> Option<Date> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(x) => write!(f, "{x:.6}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Text(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<Real> for Value {
    fn from(x: Real) -> Self {
        Value::Float(x)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Value::Date(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// An insertion-ordered `label → value` record.
///
/// Every record produced by a payoff contains at least the `cashflow`
/// key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Details {
    entries: Vec<(String, Value)>,
}

impl Details {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, keeping the original insertion position if
    /// the key already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// The value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// The mandatory `cashflow` amount (0 when the record has none).
    pub fn cashflow(&self) -> Real {
        self.get("cashflow")
            .and_then(Value::as_float)
            .unwrap_or(0.0)
    }

    /// Merge every entry of `other` into this record.
    pub fn merge(&mut self, other: Details) {
        for (k, v) in other.entries {
            self.set(k, v);
        }
    }

    /// The keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Details {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.keys().map(str::len).max().unwrap_or(0);
        for (k, v) in self.iter() {
            writeln!(f, "{k:width$}  {v}")?;
        }
        Ok(())
    }
}
