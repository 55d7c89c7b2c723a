//! Builtin methods callable on values from a template.

use crate::{RuntimeError, Value};

/// Largest digit count `toFixed` accepts.
const MAX_FIXED_DIGITS: i64 = 100;

pub fn call_method(target: &Value, method: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    if target.is_nullish() {
        return Err(RuntimeError::CallOnNullish {
            method: method.to_string(),
            target: target.type_name(),
        });
    }

    match (target, method) {
        (_, "toString") => Ok(Value::String(target.to_string())),
        (Value::String(s), _) => string_method(s, method, args),
        (Value::Array(items), _) => array_method(items, method, args),
        (Value::Integer(_) | Value::Float(_), "toFixed") => to_fixed(target, args),
        _ => Err(unknown(target, method)),
    }
}

fn unknown(target: &Value, method: &str) -> RuntimeError {
    RuntimeError::UnknownMethod {
        method: method.to_string(),
        target: target.type_name(),
    }
}

fn string_arg<'a>(method: &str, args: &'a [Value], at: usize) -> Result<&'a str, RuntimeError> {
    match args.get(at) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(RuntimeError::argument(
            method,
            format!("expected a string, found {}", other.type_name()),
        )),
        None => Err(RuntimeError::argument(
            method,
            format!("missing argument {}", at + 1),
        )),
    }
}

/// An integer argument, truncated towards zero; NaN counts as 0.
fn optional_integer(
    method: &str,
    args: &[Value],
    at: usize,
) -> Result<Option<i64>, RuntimeError> {
    match args.get(at) {
        None | Some(Value::Undefined) => Ok(None),
        Some(Value::Integer(n)) => Ok(Some(*n)),
        Some(value) => match value.to_number() {
            Some(n) if n.is_nan() => Ok(Some(0)),
            Some(n) => Ok(Some(n.trunc() as i64)),
            None => Err(RuntimeError::argument(
                method,
                format!("expected a number, found {}", value.type_name()),
            )),
        },
    }
}

/// Resolves a possibly negative position against `len`, counting negative
/// positions from the end.
fn from_end(at: i64, len: usize) -> usize {
    let len = len as i64;
    if at < 0 {
        len.saturating_add(at).max(0) as usize
    } else {
        at.min(len) as usize
    }
}

fn to_fixed(target: &Value, args: &[Value]) -> Result<Value, RuntimeError> {
    let digits = optional_integer("toFixed", args, 0)?.unwrap_or(0);
    if !(0..=MAX_FIXED_DIGITS).contains(&digits) {
        return Err(RuntimeError::argument(
            "toFixed",
            format!("digits must be between 0 and {MAX_FIXED_DIGITS}, found {digits}"),
        ));
    }
    let n = target.to_number().unwrap_or(f64::NAN);
    if !n.is_finite() {
        return Ok(Value::String(Value::Float(n).to_string()));
    }
    let digits = digits as usize;
    Ok(Value::String(format!("{n:.digits$}")))
}

fn string_method(s: &str, method: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    let value = match method {
        "toUpperCase" => Value::String(s.to_uppercase()),
        "toLowerCase" => Value::String(s.to_lowercase()),
        "trim" => Value::String(s.trim().to_string()),
        "includes" => Value::Bool(s.contains(string_arg(method, args, 0)?)),
        "startsWith" => Value::Bool(s.starts_with(string_arg(method, args, 0)?)),
        "endsWith" => Value::Bool(s.ends_with(string_arg(method, args, 0)?)),
        "indexOf" => {
            let needle = string_arg(method, args, 0)?;
            match s.find(needle) {
                Some(byte) => Value::Integer(s[..byte].chars().count() as i64),
                None => Value::Integer(-1),
            }
        }
        "charAt" => {
            let at = optional_integer(method, args, 0)?.unwrap_or(0);
            let c = usize::try_from(at).ok().and_then(|at| s.chars().nth(at));
            Value::String(c.map(String::from).unwrap_or_default())
        }
        "substring" => {
            let len = s.chars().count();
            // negative positions clamp to the start
            let clamp = |at: i64| at.clamp(0, len as i64) as usize;
            let start = clamp(optional_integer(method, args, 0)?.unwrap_or(0));
            let end = optional_integer(method, args, 1)?.map_or(len, clamp);
            let (start, end) = (start.min(end), start.max(end));
            Value::String(s.chars().skip(start).take(end - start).collect())
        }
        "split" => {
            let separator = string_arg(method, args, 0)?;
            let parts: Vec<Value> = if separator.is_empty() {
                s.chars().map(|c| Value::String(c.to_string())).collect()
            } else {
                s.split(separator).map(Value::from).collect()
            };
            Value::Array(parts)
        }
        "replace" => {
            let pattern = string_arg(method, args, 0)?;
            let replacement = string_arg(method, args, 1)?;
            Value::String(s.replacen(pattern, replacement, 1))
        }
        _ => return Err(unknown(&Value::String(s.to_string()), method)),
    };
    Ok(value)
}

fn array_method(items: &[Value], method: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    let value = match method {
        "join" => {
            let separator = match args.first() {
                None | Some(Value::Undefined) => ",",
                Some(_) => string_arg(method, args, 0)?,
            };
            let parts: Vec<String> = items.iter().map(Value::to_string).collect();
            Value::String(parts.join(separator))
        }
        "includes" => {
            let needle = args.first().cloned().unwrap_or_default();
            Value::Bool(items.iter().any(|item| item.strict_eq(&needle)))
        }
        "indexOf" => {
            let needle = args.first().cloned().unwrap_or_default();
            items
                .iter()
                .position(|item| item.strict_eq(&needle))
                .map_or(Value::Integer(-1), |i| Value::Integer(i as i64))
        }
        "slice" => {
            let len = items.len();
            let start = from_end(optional_integer(method, args, 0)?.unwrap_or(0), len);
            let end = optional_integer(method, args, 1)?
                .map_or(len, |end| from_end(end, len))
                .max(start);
            Value::Array(items[start..end].to_vec())
        }
        "reverse" => Value::Array(items.iter().rev().cloned().collect()),
        "concat" => {
            let mut joined = items.to_vec();
            for arg in args {
                match arg {
                    Value::Array(more) => joined.extend(more.iter().cloned()),
                    other => joined.push(other.clone()),
                }
            }
            Value::Array(joined)
        }
        _ => return Err(unknown(&Value::Array(vec![]), method)),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(target: impl Into<Value>, method: &str, args: Vec<Value>) -> Value {
        call_method(&target.into(), method, &args).unwrap()
    }

    #[test]
    fn strings() {
        assert_eq!(call("Bilbo", "toUpperCase", vec![]), Value::from("BILBO"));
        assert_eq!(call("  x ", "trim", vec![]), Value::from("x"));
        assert_eq!(
            call("baggins", "substring", vec![Value::Integer(3), Value::Integer(0)]),
            Value::from("bag")
        );
        assert_eq!(
            call("baggins", "substring", vec![Value::Integer(-2), Value::Integer(3)]),
            Value::from("bag")
        );
        assert_eq!(
            call("baggins", "substring", vec![Value::Integer(4)]),
            Value::from("ins")
        );
        assert_eq!(call("abc", "charAt", vec![Value::Integer(-1)]), Value::from(""));
        assert_eq!(
            call("héllo", "indexOf", vec![Value::from("l")]),
            Value::Integer(2)
        );
        assert_eq!(
            call("a,b", "split", vec![Value::from(",")]),
            Value::from(vec!["a", "b"])
        );
        assert_eq!(
            call("aXbX", "replace", vec![Value::from("X"), Value::from("-")]),
            Value::from("a-bX")
        );
    }

    #[test]
    fn arrays() {
        let items = Value::from(vec!["alpha", "bravo", "charlie"]);
        assert_eq!(
            call(items.clone(), "join", vec![Value::from(" | ")]),
            Value::from("alpha | bravo | charlie")
        );
        assert_eq!(call(items.clone(), "join", vec![]), Value::from("alpha,bravo,charlie"));
        assert_eq!(
            call(items.clone(), "slice", vec![Value::Integer(1)]),
            Value::from(vec!["bravo", "charlie"])
        );
        assert_eq!(
            call(items.clone(), "slice", vec![Value::Integer(-2)]),
            Value::from(vec!["bravo", "charlie"])
        );
        assert_eq!(
            call(items.clone(), "slice", vec![Value::Integer(0), Value::Integer(-1)]),
            Value::from(vec!["alpha", "bravo"])
        );
        assert_eq!(
            call(items.clone(), "slice", vec![Value::Integer(2), Value::Integer(1)]),
            Value::Array(vec![])
        );
        assert_eq!(
            call(items.clone(), "indexOf", vec![Value::from("charlie")]),
            Value::Integer(2)
        );
        assert_eq!(
            call(items, "concat", vec![Value::from("delta")]).member("length"),
            Value::Integer(4)
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            call(Value::Float(12.3456), "toFixed", vec![Value::Integer(2)]),
            Value::from("12.35")
        );
        assert_eq!(call(Value::Integer(42), "toString", vec![]), Value::from("42"));
        assert_eq!(call(Value::Integer(1), "toFixed", vec![]), Value::from("1"));
        assert_eq!(
            call(Value::Float(f64::NAN), "toFixed", vec![Value::Integer(2)]),
            Value::from("NaN")
        );
    }

    #[test]
    fn to_fixed_digits_are_bounded() {
        assert_eq!(
            call(Value::Integer(1), "toFixed", vec![Value::Integer(100)])
                .to_string()
                .len(),
            102
        );
        for digits in [101, 5_000_000, -1] {
            assert!(matches!(
                call_method(&Value::Integer(1), "toFixed", &[Value::Integer(digits)]),
                Err(RuntimeError::InvalidArgument { .. })
            ));
        }
    }

    #[test]
    fn failures() {
        assert_eq!(
            call_method(&Value::Undefined, "trim", &[]),
            Err(RuntimeError::CallOnNullish {
                method: "trim".to_string(),
                target: "undefined",
            })
        );
        assert_eq!(
            call_method(&Value::Bool(true), "explode", &[]),
            Err(RuntimeError::UnknownMethod {
                method: "explode".to_string(),
                target: "a boolean",
            })
        );
        assert!(matches!(
            call_method(&Value::from("x"), "includes", &[Value::Integer(1)]),
            Err(RuntimeError::InvalidArgument { .. })
        ));
    }
}
