//! JSON request bodies and typed field extraction.

use serde_json::{Map, Value};

use crate::errors::ServiceError;

/// A request body that parsed as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Parse raw body bytes; anything other than a JSON object is "Not a JSON".
    pub fn parse(body: &[u8]) -> Result<Self, ServiceError> {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            _ => Err(ServiceError::NotAJson),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// First absent field in `fields` order, as `Missing <field>`.
    pub fn require(&self, fields: &[&'static str]) -> Result<(), ServiceError> {
        match fields.iter().find(|f| !self.contains(f)) {
            Some(missing) => Err(ServiceError::MissingField(*missing)),
            None => Ok(()),
        }
    }

    /// Text of a required field, coerced with [`text`]; `null` becomes empty.
    pub fn text(&self, key: &'static str) -> Result<String, ServiceError> {
        let value = self.get(key).ok_or(ServiceError::MissingField(key))?;
        Ok(text(value).unwrap_or_default())
    }

    /// Entries whose key is not listed in `skip`, in body order.
    pub fn entries_except<'a>(&'a self, skip: &'a [&'a str]) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| !skip.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v))
    }
}

// Coercions from arbitrary JSON onto column types. `None` means the column
// cannot hold the value and the attribute is left as it was.

/// Strings as-is, other scalars and containers as their JSON text, `null` as `None`.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Integers, integral-or-not floats (truncated), numeric strings and booleans.
pub fn int(value: &Value) -> Option<i32> {
    let n = match value {
        Value::Number(n) => n.as_i64().map(|i| i as f64).or_else(|| n.as_f64())?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => return None,
    };
    let n = n.trunc();
    (n.is_finite() && n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX)).then(|| n as i32)
}

/// Numbers and numeric strings; `Some(None)` for `null`.
pub fn opt_float(value: &Value) -> Option<Option<f64>> {
    match value {
        Value::Null => Some(None),
        Value::Number(n) => n.as_f64().map(Some),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()).map(Some),
        _ => None,
    }
}
