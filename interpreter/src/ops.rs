use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
};

use crate::{RuntimeError, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Negate,
    Plus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOperator {
    Increment,
    Decrement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
    Coalesce,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Not => "!",
            UnaryOperator::Negate => "-",
            UnaryOperator::Plus => "+",
        }
    }

    pub fn apply(self, operand: Value) -> Result<Value, RuntimeError> {
        match (self, operand) {
            (UnaryOperator::Not, v) => Ok(Value::Bool(!v.is_truthy())),
            (UnaryOperator::Negate, Value::Integer(n)) => Ok(n
                .checked_neg()
                .map_or(Value::Float(-(n as f64)), Value::Integer)),
            (UnaryOperator::Plus, v @ (Value::Integer(_) | Value::Float(_))) => Ok(v),
            (op, v) => match v.to_number() {
                Some(n) if op == UnaryOperator::Negate => Ok(Value::Float(-n)),
                Some(n) => Ok(Value::Float(n)),
                None => Err(RuntimeError::InvalidOperands {
                    operator: op.symbol(),
                    left: v.type_name(),
                    right: "nothing",
                }),
            },
        }
    }
}

impl UpdateOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UpdateOperator::Increment => "++",
            UpdateOperator::Decrement => "--",
        }
    }

    /// The updated value, or `None` when `value` has no numeric form.
    pub fn apply(self, value: &Value) -> Option<Value> {
        let delta = match self {
            UpdateOperator::Increment => 1,
            UpdateOperator::Decrement => -1,
        };
        match value {
            Value::Integer(n) => Some(
                n.checked_add(delta)
                    .map_or(Value::Float(*n as f64 + delta as f64), Value::Integer),
            ),
            other => other.to_number().map(|n| Value::Float(n + delta as f64)),
        }
    }
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Remainder => "%",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::StrictEqual => "===",
            BinaryOperator::StrictNotEqual => "!==",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::Coalesce => "??",
        }
    }

    /// `&&`, `||` and `??` only evaluate their right operand on demand.
    pub fn is_short_circuit(self) -> bool {
        matches!(
            self,
            BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Coalesce
        )
    }

    /// Whether the right operand of a short-circuit operator is needed.
    pub fn needs_right(self, left: &Value) -> bool {
        match self {
            BinaryOperator::And => left.is_truthy(),
            BinaryOperator::Or => !left.is_truthy(),
            BinaryOperator::Coalesce => left.is_nullish(),
            _ => true,
        }
    }

    pub fn apply(self, left: Value, right: Value) -> Result<Value, RuntimeError> {
        let invalid = |left: &Value, right: &Value| RuntimeError::InvalidOperands {
            operator: self.symbol(),
            left: left.type_name(),
            right: right.type_name(),
        };

        match self {
            BinaryOperator::Add => match (&left, &right) {
                (Value::String(_) | Value::Array(_) | Value::Object(_), _)
                | (_, Value::String(_) | Value::Array(_) | Value::Object(_)) => {
                    Ok(Value::String(format!("{left}{right}")))
                }
                _ => arithmetic(&left, &right, i64::checked_add, |l, r| l + r)
                    .ok_or_else(|| invalid(&left, &right)),
            },
            BinaryOperator::Subtract => {
                arithmetic(&left, &right, i64::checked_sub, |l, r| l - r)
                    .ok_or_else(|| invalid(&left, &right))
            }
            BinaryOperator::Multiply => {
                arithmetic(&left, &right, i64::checked_mul, |l, r| l * r)
                    .ok_or_else(|| invalid(&left, &right))
            }
            BinaryOperator::Divide => arithmetic(
                &left,
                &right,
                |l, r| match l.checked_rem(r) {
                    Some(0) => l.checked_div(r),
                    _ => None,
                },
                |l, r| l / r,
            )
            .ok_or_else(|| invalid(&left, &right)),
            BinaryOperator::Remainder => {
                arithmetic(&left, &right, i64::checked_rem, |l, r| l % r)
                    .ok_or_else(|| invalid(&left, &right))
            }
            BinaryOperator::Equal => Ok(Value::Bool(left.loose_eq(&right))),
            BinaryOperator::NotEqual => Ok(Value::Bool(!left.loose_eq(&right))),
            BinaryOperator::StrictEqual => Ok(Value::Bool(left.strict_eq(&right))),
            BinaryOperator::StrictNotEqual => Ok(Value::Bool(!left.strict_eq(&right))),
            BinaryOperator::LessThan
            | BinaryOperator::LessThanOrEqual
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterThanOrEqual => {
                // NaN, arrays and objects compare false against everything
                let ordering = left.compare(&right);
                Ok(Value::Bool(match self {
                    BinaryOperator::LessThan => ordering == Some(Ordering::Less),
                    BinaryOperator::LessThanOrEqual => {
                        matches!(ordering, Some(Ordering::Less | Ordering::Equal))
                    }
                    BinaryOperator::GreaterThan => ordering == Some(Ordering::Greater),
                    _ => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
                }))
            }
            BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Coalesce => {
                if self.needs_right(&left) {
                    Ok(right)
                } else {
                    Ok(left)
                }
            }
        }
    }
}

/// Integer arithmetic while it stays exact, float arithmetic on the coerced
/// operands otherwise. `None` when an operand is an array or an object.
fn arithmetic(
    left: &Value,
    right: &Value,
    integer: impl Fn(i64, i64) -> Option<i64>,
    float: impl Fn(f64, f64) -> f64,
) -> Option<Value> {
    if let (Value::Integer(l), Value::Integer(r)) = (left, right) {
        if let Some(n) = integer(*l, *r) {
            return Some(Value::Integer(n));
        }
    }
    Some(Value::Float(float(left.to_number()?, right.to_number()?)))
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Display for UpdateOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(op: BinaryOperator, left: impl Into<Value>, right: impl Into<Value>) -> Value {
        op.apply(left.into(), right.into()).unwrap()
    }

    #[test]
    fn arithmetic_stays_integral_when_exact() {
        assert_eq!(apply(BinaryOperator::Add, 2i64, 3i64), Value::Integer(5));
        assert_eq!(apply(BinaryOperator::Divide, 6i64, 3i64), Value::Integer(2));
        assert_eq!(apply(BinaryOperator::Divide, 7i64, 2i64), Value::Float(3.5));
        assert_eq!(
            apply(BinaryOperator::Add, i64::MAX, 1i64),
            Value::Float(i64::MAX as f64 + 1.0)
        );
        assert_eq!(apply(BinaryOperator::Multiply, 1.5, 2i64), Value::Float(3.0));
        assert!(matches!(
            apply(BinaryOperator::Remainder, 1i64, 0i64),
            Value::Float(n) if n.is_nan()
        ));
        assert_eq!(
            apply(BinaryOperator::Divide, 1i64, 0i64),
            Value::Float(f64::INFINITY)
        );
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(apply(BinaryOperator::Add, "a", 1i64), Value::from("a1"));
        assert_eq!(apply(BinaryOperator::Add, 1.5, "b"), Value::from("1.5b"));
    }

    #[test]
    fn comparisons() {
        assert_eq!(apply(BinaryOperator::LessThan, 0i64, 2i64), Value::Bool(true));
        assert_eq!(apply(BinaryOperator::GreaterThanOrEqual, 2i64, 2.0), Value::Bool(true));
        assert_eq!(apply(BinaryOperator::LessThan, "a", "b"), Value::Bool(true));
        assert_eq!(
            apply(BinaryOperator::LessThan, f64::NAN, 1i64),
            Value::Bool(false)
        );
        assert_eq!(apply(BinaryOperator::LessThan, "a", 1i64), Value::Bool(false));
        assert_eq!(apply(BinaryOperator::LessThan, "2", 10i64), Value::Bool(true));
    }

    #[test]
    fn comparisons_with_missing_values_are_false() {
        let undefined = || Value::Undefined;
        assert_eq!(apply(BinaryOperator::LessThan, 0i64, undefined()), Value::Bool(false));
        assert_eq!(apply(BinaryOperator::GreaterThan, undefined(), 0i64), Value::Bool(false));
        assert_eq!(
            apply(BinaryOperator::GreaterThanOrEqual, Value::Null, 0i64),
            Value::Bool(true)
        );
        assert_eq!(
            apply(BinaryOperator::LessThan, Value::Array(vec![]), 1i64),
            Value::Bool(false)
        );
        assert_eq!(apply(BinaryOperator::GreaterThan, true, 0i64), Value::Bool(true));
    }

    #[test]
    fn arithmetic_coerces_primitives() {
        assert!(matches!(
            apply(BinaryOperator::Add, Value::Undefined, 1i64),
            Value::Float(n) if n.is_nan()
        ));
        assert_eq!(apply(BinaryOperator::Add, Value::Null, 1i64), Value::Float(1.0));
        assert_eq!(apply(BinaryOperator::Subtract, "5", 2i64), Value::Float(3.0));
        assert_eq!(apply(BinaryOperator::Multiply, true, 4i64), Value::Float(4.0));
        assert_eq!(
            apply(BinaryOperator::Add, Value::from(vec![1i64, 2]), 3i64),
            Value::from("1,23")
        );
        assert_eq!(
            BinaryOperator::Subtract.apply(Value::Array(vec![]), Value::Integer(1)),
            Err(RuntimeError::InvalidOperands {
                operator: "-",
                left: "an array",
                right: "a number",
            })
        );
    }

    #[test]
    fn logical_operators_yield_operands() {
        assert_eq!(apply(BinaryOperator::Or, "", "fallback"), Value::from("fallback"));
        assert_eq!(apply(BinaryOperator::And, 0i64, "never"), Value::Integer(0));
        assert_eq!(apply(BinaryOperator::Coalesce, "", "unused"), Value::from(""));
        assert!(!BinaryOperator::Coalesce.needs_right(&Value::from("")));
        assert!(BinaryOperator::Coalesce.needs_right(&Value::Null));
    }

    #[test]
    fn unary() {
        assert_eq!(
            UnaryOperator::Not.apply(Value::Undefined),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            UnaryOperator::Negate.apply(Value::Integer(3)),
            Ok(Value::Integer(-3))
        );
        assert!(matches!(
            UnaryOperator::Negate.apply(Value::from("x")),
            Ok(Value::Float(n)) if n.is_nan()
        ));
        assert_eq!(UnaryOperator::Plus.apply(Value::from("7")), Ok(Value::Float(7.0)));
        assert!(UnaryOperator::Negate.apply(Value::Array(vec![])).is_err());
        assert_eq!(
            UpdateOperator::Increment.apply(&Value::Integer(1)),
            Some(Value::Integer(2))
        );
        assert_eq!(
            UpdateOperator::Decrement.apply(&Value::Null),
            Some(Value::Float(-1.0))
        );
        assert_eq!(UpdateOperator::Increment.apply(&Value::Array(vec![])), None);
    }
}
