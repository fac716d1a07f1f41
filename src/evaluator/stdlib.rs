//! Built-in globals: `console`, `Object`, `isFinite`, `Infinity`, `NaN`,
//! `globalThis`, and the array methods handed out by array member access.

use std::rc::Rc;

use crate::{config::MAX_ARRAY_LENGTH, errors::errors::ErrorImpl};

use super::{
    environment::Env,
    evaluator::Interpreter,
    operators::to_number,
    value::{Callable, JsObject, NativeFn, Value},
};

pub fn native(name: &'static str, arity: usize, func: NativeFn) -> Value {
    Value::Function(Rc::new(Callable::Native {
        name,
        arity,
        func,
        receiver: Value::Undefined,
    }))
}

/// Binds the built-in globals in `globals`.
///
/// `globalThis` is an ordinary object holding the same built-ins. It is a
/// snapshot: later global declarations do not appear on it.
pub fn install_globals(globals: &Env) {
    let console = Value::new_object(JsObject::with_properties([
        ("log", native("log", 0, console_log)),
        ("error", native("error", 0, console_error)),
    ]));
    let object = Value::new_object(JsObject::with_properties([
        ("create", native("create", 1, object_create)),
        ("keys", native("keys", 1, object_keys)),
    ]));
    let is_finite = native("isFinite", 1, is_finite);

    let global_this = JsObject::with_properties([
        ("Infinity", Value::Number(f64::INFINITY)),
        ("NaN", Value::Number(f64::NAN)),
        ("undefined", Value::Undefined),
        ("isFinite", is_finite.clone()),
        ("console", console.clone()),
        ("Object", object.clone()),
    ]);

    globals.define("console", console);
    globals.define("Object", object);
    globals.define("isFinite", is_finite);
    globals.define_immutable("Infinity", Value::Number(f64::INFINITY));
    globals.define_immutable("NaN", Value::Number(f64::NAN));
    globals.define("globalThis", Value::new_object(global_this));
}

fn join_display(arguments: &[Value]) -> String {
    arguments
        .iter()
        .map(Value::to_display)
        .collect::<Vec<_>>()
        .join(" ")
}

fn console_log(
    interpreter: &mut Interpreter,
    _receiver: &Value,
    arguments: Vec<Value>,
) -> Result<Value, ErrorImpl> {
    interpreter.print_handler().println(&join_display(&arguments));
    Ok(Value::Undefined)
}

fn console_error(
    interpreter: &mut Interpreter,
    _receiver: &Value,
    arguments: Vec<Value>,
) -> Result<Value, ErrorImpl> {
    interpreter.print_handler().eprintln(&join_display(&arguments));
    Ok(Value::Undefined)
}

/// `isFinite(value)`: converts to a number first. Values with no numeric
/// form count as `NaN`.
fn is_finite(
    _interpreter: &mut Interpreter,
    _receiver: &Value,
    arguments: Vec<Value>,
) -> Result<Value, ErrorImpl> {
    let number = match arguments.first() {
        Some(value) => to_number(value, "isFinite").unwrap_or(f64::NAN),
        None => f64::NAN,
    };
    Ok(Value::Boolean(number.is_finite()))
}

fn object_create(
    _interpreter: &mut Interpreter,
    _receiver: &Value,
    arguments: Vec<Value>,
) -> Result<Value, ErrorImpl> {
    let prototype = match arguments.into_iter().next() {
        Some(Value::Object(prototype)) => Some(prototype),
        Some(Value::Null) => None,
        other => {
            return Err(ErrorImpl::InvalidPrototype {
                found: other.unwrap_or(Value::Undefined).type_name().to_string(),
            })
        }
    };

    Ok(Value::new_object(JsObject::new(prototype)))
}

fn object_keys(
    _interpreter: &mut Interpreter,
    _receiver: &Value,
    arguments: Vec<Value>,
) -> Result<Value, ErrorImpl> {
    let target = arguments.into_iter().next().unwrap_or(Value::Undefined);
    let keys = match &target {
        Value::Object(object) => object
            .borrow()
            .properties
            .keys()
            .map(|key| Value::String(Rc::clone(key)))
            .collect(),
        Value::Array(array) => (0..array.borrow().len())
            .map(|index| Value::string(index.to_string()))
            .collect(),
        Value::String(string) => (0..string.chars().count())
            .map(|index| Value::string(index.to_string()))
            .collect(),
        Value::Null | Value::Undefined => {
            return Err(ErrorImpl::InvalidOperand {
                operator: String::from("Object.keys"),
                operand: target.type_name().to_string(),
            })
        }
        _ => Vec::new(),
    };

    Ok(Value::new_array(keys))
}

/// `array.push(...items)`, returning the new length.
pub fn array_push(
    _interpreter: &mut Interpreter,
    receiver: &Value,
    arguments: Vec<Value>,
) -> Result<Value, ErrorImpl> {
    let Value::Array(array) = receiver else {
        return Err(not_an_array("push", receiver));
    };
    let mut elements = array.borrow_mut();
    let length = elements.len() + arguments.len();
    if length > MAX_ARRAY_LENGTH {
        return Err(ErrorImpl::InvalidArrayLength {
            length: length.to_string(),
        });
    }
    elements.extend(arguments);
    Ok(Value::Number(elements.len() as f64))
}

/// `array.pop()`, returning the removed element or `undefined`.
pub fn array_pop(
    _interpreter: &mut Interpreter,
    receiver: &Value,
    _arguments: Vec<Value>,
) -> Result<Value, ErrorImpl> {
    let Value::Array(array) = receiver else {
        return Err(not_an_array("pop", receiver));
    };
    let popped = array.borrow_mut().pop();
    Ok(popped.unwrap_or(Value::Undefined))
}

fn not_an_array(method: &str, receiver: &Value) -> ErrorImpl {
    ErrorImpl::InvalidOperand {
        operator: format!("Array.prototype.{}", method),
        operand: receiver.type_name().to_string(),
    }
}
