use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
};

use serde::Serialize;

/// A dynamically typed value produced while rendering a view.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Converts any serializable model into a [`Value`].
    pub fn from_serialize<T: Serialize>(model: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(model).map(Value::from)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Integer(_) | Value::Float(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::Float(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric coercion of primitives: `undefined` is NaN, `null` and
    /// `false` are 0, strings are parsed after trimming. Arrays and objects
    /// have no numeric form.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Undefined => Some(f64::NAN),
            Value::Null => Some(0.0),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            Value::String(s) => Some(parse_number(s.trim())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Reads a member; anything missing, including members of nullish
    /// values, is [`Value::Undefined`].
    pub fn member(&self, name: &str) -> Value {
        match (self, name) {
            (Value::Object(fields), _) => fields.get(name).cloned().unwrap_or_default(),
            (Value::Array(items), "length") => Value::Integer(items.len() as i64),
            (Value::String(s), "length") => Value::Integer(s.chars().count() as i64),
            _ => Value::Undefined,
        }
    }

    pub fn index(&self, index: &Value) -> Value {
        match self {
            Value::Array(items) => position(index)
                .and_then(|i| items.get(i))
                .cloned()
                .unwrap_or_default(),
            Value::String(s) => position(index)
                .and_then(|i| s.chars().nth(i))
                .map(|c| Value::String(c.to_string()))
                .unwrap_or_default(),
            Value::Object(_) => self.member(&index.to_string()),
            _ => Value::Undefined,
        }
    }

    /// Equality where numbers compare by value and `null` equals `undefined`.
    pub fn loose_eq(&self, other: &Value) -> bool {
        if self.is_nullish() && other.is_nullish() {
            return true;
        }
        self.strict_eq(other)
    }

    /// Equality where numbers compare by value regardless of representation.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(l), Some(r)) => l == r,
            _ => self == other,
        }
    }

    /// Strings order lexically, everything else numerically. `None` when
    /// either side is NaN, an array or an object.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
            _ => self.to_number()?.partial_cmp(&other.to_number()?),
        }
    }
}

fn parse_number(s: &str) -> f64 {
    match s {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // rejects Rust's own spellings such as `inf` and `NaN`
        _ if s.contains(|c: char| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => f64::NAN,
        _ => s.parse().unwrap_or(f64::NAN),
    }
}

/// An integral index, accepting integral floats and numeric strings.
fn position(index: &Value) -> Option<usize> {
    match index {
        Value::Integer(n) => usize::try_from(*n).ok(),
        Value::Float(n) if n.fract() == 0.0 && *n >= 0.0 => Some(*n as usize),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn write_number(f: &mut Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        write!(f, "{}Infinity", if n < 0.0 { "-" } else { "" })
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined | Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(n) => write_number(f, *n),
            Value::String(s) => write!(f, "{s}"),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Object(_) => write!(f, "{}", serde_json::Value::from(self)),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(n) => serde_json::Value::from(*n),
            Value::Float(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stringify() {
        assert_eq!(Value::Undefined.to_string(), "");
        assert_eq!(Value::Float(2.0).to_string(), "2");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Float(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Float(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(
            Value::from(vec![Value::Integer(1), Value::Null, Value::from("x")]).to_string(),
            "1,,x"
        );
        assert_eq!(
            Value::from(json!({"b": 1, "a": [true]})).to_string(),
            r#"{"a":[true],"b":1}"#
        );
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Float(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Integer(0).is_truthy());
        assert!(Value::Array(vec![]).is_truthy());
        assert!(Value::from("0").is_truthy());
    }

    #[test]
    fn member_and_index() {
        let model = Value::from(json!({"d": ["alpha", "bravo"], "name": "bilbo"}));
        let d = model.member("d");
        assert_eq!(d.member("length"), Value::Integer(2));
        assert_eq!(d.index(&Value::Integer(1)), Value::from("bravo"));
        assert_eq!(d.index(&Value::Integer(5)), Value::Undefined);
        assert_eq!(d.index(&Value::Integer(-1)), Value::Undefined);
        assert_eq!(model.member("name").index(&Value::Float(0.0)), Value::from("b"));
        assert_eq!(model.index(&Value::from("name")), Value::from("bilbo"));
        assert_eq!(model.member("missing").member("deeper"), Value::Undefined);
    }

    #[test]
    fn equality() {
        assert!(Value::Integer(1).strict_eq(&Value::Float(1.0)));
        assert!(!Value::Null.strict_eq(&Value::Undefined));
        assert!(Value::Null.loose_eq(&Value::Undefined));
        assert!(!Value::from("1").loose_eq(&Value::Integer(1)));
    }

    #[test]
    fn numeric_coercion() {
        assert!(Value::Undefined.to_number().is_some_and(f64::is_nan));
        assert_eq!(Value::Null.to_number(), Some(0.0));
        assert_eq!(Value::Bool(true).to_number(), Some(1.0));
        assert_eq!(Value::from(" 12.5 ").to_number(), Some(12.5));
        assert_eq!(Value::from("").to_number(), Some(0.0));
        assert_eq!(Value::from("-Infinity").to_number(), Some(f64::NEG_INFINITY));
        assert!(Value::from("inf").to_number().is_some_and(f64::is_nan));
        assert!(Value::from("12px").to_number().is_some_and(f64::is_nan));
        assert_eq!(Value::Array(vec![]).to_number(), None);
    }

    #[test]
    fn ordering() {
        assert_eq!(Value::from("2").compare(&Value::Integer(10)), Some(Ordering::Less));
        assert_eq!(Value::Null.compare(&Value::Integer(0)), Some(Ordering::Equal));
        assert_eq!(Value::Integer(0).compare(&Value::Undefined), None);
        assert_eq!(Value::Array(vec![]).compare(&Value::Integer(0)), None);
    }

    #[test]
    fn from_serialize() {
        #[derive(Serialize)]
        struct Model {
            bilbo: &'static str,
            rings: u8,
        }

        let value = Value::from_serialize(&Model {
            bilbo: "baggins",
            rings: 1,
        })
        .unwrap();
        assert_eq!(value.member("bilbo"), Value::from("baggins"));
        assert_eq!(value.member("rings"), Value::Integer(1));
    }
}
