use std::rc::Rc;

use crate::{
    ast::expressions::{BinaryOp, UnaryOp},
    errors::errors::ErrorImpl,
};

use super::value::Value;

/// Parses a string as a number the way `Number(string)` does. Surrounding
/// whitespace is ignored, an empty string is `0` and anything unparsable is
/// `NaN`.
pub fn string_to_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match text.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&text[2..], radix).map_or(f64::NAN, |n| n as f64);
    }

    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return f64::NAN;
    }

    text.parse::<f64>().unwrap_or(f64::NAN)
}

/// Converts a primitive to a number; composites have no numeric form.
fn primitive_to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::String(s) => Some(string_to_number(s)),
        Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::Undefined => Some(f64::NAN),
        Value::Object(_) | Value::Array(_) | Value::Function(_) => None,
    }
}

pub fn to_number(value: &Value, operator: &str) -> Result<f64, ErrorImpl> {
    primitive_to_number(value).ok_or_else(|| ErrorImpl::InvalidOperand {
        operator: operator.to_string(),
        operand: value.type_name().to_string(),
    })
}

fn numeric_operands(op: BinaryOp, left: &Value, right: &Value) -> Result<(f64, f64), ErrorImpl> {
    match (primitive_to_number(left), primitive_to_number(right)) {
        (Some(left), Some(right)) => Ok((left, right)),
        _ => Err(invalid_operands(op, left, right)),
    }
}

fn invalid_operands(op: BinaryOp, left: &Value, right: &Value) -> ErrorImpl {
    ErrorImpl::InvalidOperands {
        operator: op.to_string(),
        left: left.type_name().to_string(),
        right: right.type_name().to_string(),
    }
}

/// `+`: numeric addition, or concatenation when either side is a string.
pub fn add(left: &Value, right: &Value) -> Result<Value, ErrorImpl> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::String(_), _) | (_, Value::String(_)) => {
            let mut joined = left.to_js_string().to_string();
            joined.push_str(&right.to_js_string());
            Ok(Value::String(Rc::from(joined)))
        }
        _ => Err(invalid_operands(BinaryOp::Add, left, right)),
    }
}

pub fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null | Value::Undefined, Value::Null | Value::Undefined) => true,
        (Value::Null | Value::Undefined, _) | (_, Value::Null | Value::Undefined) => false,
        (Value::Number(a), Value::String(b)) => *a == string_to_number(b),
        (Value::String(a), Value::Number(b)) => string_to_number(a) == *b,
        (Value::Boolean(b), other) => {
            loose_equals(&Value::Number(if *b { 1.0 } else { 0.0 }), other)
        }
        (other, Value::Boolean(b)) => {
            loose_equals(other, &Value::Number(if *b { 1.0 } else { 0.0 }))
        }
        _ => strict_equals(left, right),
    }
}

pub fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        (Value::Null, Value::Null) | (Value::Undefined, Value::Undefined) => true,
        (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
        (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<bool, ErrorImpl> {
    if let (Value::String(a), Value::String(b)) = (left, right) {
        return Ok(match op {
            BinaryOp::Less => a < b,
            BinaryOp::LessEqual => a <= b,
            BinaryOp::Greater => a > b,
            _ => a >= b,
        });
    }

    // Any comparison against NaN is false, which f64 already gives us.
    let (a, b) = numeric_operands(op, left, right)?;
    Ok(match op {
        BinaryOp::Less => a < b,
        BinaryOp::LessEqual => a <= b,
        BinaryOp::Greater => a > b,
        _ => a >= b,
    })
}

/// Applies a binary operator to two evaluated operands.
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, ErrorImpl> {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => {
            let (a, b) = numeric_operands(op, left, right)?;
            Ok(Value::Number(match op {
                BinaryOp::Subtract => a - b,
                BinaryOp::Multiply => a * b,
                BinaryOp::Divide => a / b,
                _ => a % b,
            }))
        }
        BinaryOp::Equal => Ok(Value::Boolean(loose_equals(left, right))),
        BinaryOp::NotEqual => Ok(Value::Boolean(!loose_equals(left, right))),
        BinaryOp::StrictEqual => Ok(Value::Boolean(strict_equals(left, right))),
        BinaryOp::StrictNotEqual => Ok(Value::Boolean(!strict_equals(left, right))),
        BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
            compare(op, left, right).map(Value::Boolean)
        }
    }
}

/// Applies `!`, `-`, `+` or `typeof`. Updates need a reference and are
/// handled by the expression evaluator.
pub fn unary(op: UnaryOp, operand: &Value) -> Result<Value, ErrorImpl> {
    match op {
        UnaryOp::Not => Ok(Value::Boolean(!operand.is_truthy())),
        UnaryOp::Negate => Ok(Value::Number(-to_number(operand, op.as_str())?)),
        UnaryOp::Plus => Ok(Value::Number(to_number(operand, op.as_str())?)),
        UnaryOp::Typeof => Ok(Value::string(operand.type_of())),
        UnaryOp::Increment | UnaryOp::Decrement => Ok(Value::Number(
            to_number(operand, op.as_str())? + if op == UnaryOp::Increment { 1.0 } else { -1.0 },
        )),
    }
}
