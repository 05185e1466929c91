use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lexer::{Operator, Token};

/// Runtime value representation
///
/// Values are plain data: every binding and every expression step copies them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 64-bit integer value
    Int(i64),
    /// 64-bit floating-point value
    Double(f64),
    /// Boolean value
    Bool(bool),
    /// String value
    String(String),
}

impl Value {
    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Integer",
            Value::Double(_) => "Double",
            Value::Bool(_) => "Boolean",
            Value::String(_) => "String",
        }
    }

    /// Converts value to a boolean; only booleans convert
    pub fn as_bool(&self, token: &Token) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(Error::conversion(
                token,
                format!("expected a Boolean, got {}", other.type_name()),
            )),
        }
    }

    /// Text form used by `print` and string interpolation
    pub fn to_string_value(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Double(d) => d.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::String(s) => s.clone(),
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Double(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Double(d) => write!(f, "{}", d),
            Value::Bool(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Both operands of a numeric operation after promotion
enum Numeric {
    Int(i64, i64),
    Double(f64, f64),
}

fn promote(left: &Value, right: &Value) -> Option<Numeric> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => Some(Numeric::Int(*l, *r)),
        (Value::Int(l), Value::Double(r)) => Some(Numeric::Double(*l as f64, *r)),
        (Value::Double(l), Value::Int(r)) => Some(Numeric::Double(*l, *r as f64)),
        (Value::Double(l), Value::Double(r)) => Some(Numeric::Double(*l, *r)),
        _ => None,
    }
}

fn invalid(token: &Token, op: Operator, left: &Value, right: &Value) -> Error {
    Error::conversion(
        token,
        format!(
            "cannot apply `{}` to {} and {}",
            op,
            left.type_name(),
            right.type_name()
        ),
    )
}

/// Applies an arithmetic operator (`+ - * / ** %`)
pub fn apply_arithmetic(op: Operator, token: &Token, left: Value, right: Value) -> Result<Value> {
    match op {
        Operator::Add => add(token, left, right),
        Operator::Subtract => subtract(token, left, right),
        Operator::Multiply => multiply(token, left, right),
        Operator::Divide => divide(token, left, right),
        Operator::Exponent => power(token, left, right),
        Operator::Modulus => modulus(token, left, right),
        _ => Err(Error::syntax(
            token,
            format!("`{}` is not an arithmetic operator", op),
        )),
    }
}

/// Applies a relational operator; the result is always a `Value::Bool`
pub fn apply_relational(op: Operator, token: &Token, left: Value, right: Value) -> Result<Value> {
    let result = match op {
        Operator::Equal => equal(token, &left, &right)?,
        Operator::NotEqual => !equal(token, &left, &right)?,
        Operator::LessThan => less_than(token, op, &left, &right)?,
        Operator::GreaterThan => less_than(token, op, &right, &left)?,
        Operator::LessThanOrEqual => less_or_equal(token, op, &left, &right)?,
        Operator::GreaterThanOrEqual => less_or_equal(token, op, &right, &left)?,
        _ => {
            return Err(Error::syntax(
                token,
                format!("`{}` is not a relational operator", op),
            ))
        }
    };
    Ok(Value::Bool(result))
}

pub fn add(token: &Token, left: Value, right: Value) -> Result<Value> {
    match (left, right) {
        (Value::String(l), Value::String(r)) => Ok(Value::String(l + &r)),
        (Value::String(l), r) if r.is_numeric() => Ok(Value::String(l + &r.to_string_value())),
        (l, Value::String(r)) if l.is_numeric() => Ok(Value::String(l.to_string_value() + &r)),
        (l, r) => match promote(&l, &r) {
            Some(Numeric::Int(a, b)) => Ok(Value::Int(a.wrapping_add(b))),
            Some(Numeric::Double(a, b)) => Ok(Value::Double(a + b)),
            None => Err(invalid(token, Operator::Add, &l, &r)),
        },
    }
}

pub fn subtract(token: &Token, left: Value, right: Value) -> Result<Value> {
    match promote(&left, &right) {
        Some(Numeric::Int(a, b)) => Ok(Value::Int(a.wrapping_sub(b))),
        Some(Numeric::Double(a, b)) => Ok(Value::Double(a - b)),
        None => Err(invalid(token, Operator::Subtract, &left, &right)),
    }
}

pub fn multiply(token: &Token, left: Value, right: Value) -> Result<Value> {
    match promote(&left, &right) {
        Some(Numeric::Int(a, b)) => Ok(Value::Int(a.wrapping_mul(b))),
        Some(Numeric::Double(a, b)) => Ok(Value::Double(a * b)),
        None => Err(invalid(token, Operator::Multiply, &left, &right)),
    }
}

/// Integer division truncates; a zero integer divisor is an error, doubles
/// follow IEEE semantics.
pub fn divide(token: &Token, left: Value, right: Value) -> Result<Value> {
    match promote(&left, &right) {
        Some(Numeric::Int(_, 0)) => Err(Error::division_by_zero(token)),
        Some(Numeric::Int(a, b)) => Ok(Value::Int(a.wrapping_div(b))),
        Some(Numeric::Double(a, b)) => Ok(Value::Double(a / b)),
        None => Err(invalid(token, Operator::Divide, &left, &right)),
    }
}

pub fn modulus(token: &Token, left: Value, right: Value) -> Result<Value> {
    match promote(&left, &right) {
        Some(Numeric::Int(_, 0)) => Err(Error::division_by_zero(token)),
        Some(Numeric::Int(a, b)) => Ok(Value::Int(a.wrapping_rem(b))),
        Some(Numeric::Double(a, b)) => Ok(Value::Double(a % b)),
        None => Err(invalid(token, Operator::Modulus, &left, &right)),
    }
}

/// Integer powers stay integral for exponents that fit in `u32`; anything
/// else is computed in double precision.
pub fn power(token: &Token, left: Value, right: Value) -> Result<Value> {
    match promote(&left, &right) {
        Some(Numeric::Int(a, b)) => match u32::try_from(b) {
            Ok(exp) => Ok(Value::Int(a.wrapping_pow(exp))),
            Err(_) => Ok(Value::Double((a as f64).powf(b as f64))),
        },
        Some(Numeric::Double(a, b)) => Ok(Value::Double(a.powf(b))),
        None => Err(invalid(token, Operator::Exponent, &left, &right)),
    }
}

pub fn equal(token: &Token, left: &Value, right: &Value) -> Result<bool> {
    match (left, right) {
        (Value::Bool(l), Value::Bool(r)) => Ok(l == r),
        (Value::String(l), Value::String(r)) => Ok(l == r),
        (l, r) => match promote(l, r) {
            Some(Numeric::Int(a, b)) => Ok(a == b),
            Some(Numeric::Double(a, b)) => Ok(a == b),
            None => Err(invalid(token, Operator::Equal, l, r)),
        },
    }
}

fn less_than(token: &Token, op: Operator, left: &Value, right: &Value) -> Result<bool> {
    match (left, right) {
        (Value::String(l), Value::String(r)) => Ok(l < r),
        (l, r) => match promote(l, r) {
            Some(Numeric::Int(a, b)) => Ok(a < b),
            Some(Numeric::Double(a, b)) => Ok(a < b),
            None => Err(invalid(token, op, left, right)),
        },
    }
}

fn less_or_equal(token: &Token, op: Operator, left: &Value, right: &Value) -> Result<bool> {
    match (left, right) {
        (Value::String(l), Value::String(r)) => Ok(l <= r),
        (l, r) => match promote(l, r) {
            Some(Numeric::Int(a, b)) => Ok(a <= b),
            Some(Numeric::Double(a, b)) => Ok(a <= b),
            None => Err(invalid(token, op, left, right)),
        },
    }
}
