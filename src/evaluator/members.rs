use std::{fmt, rc::Rc};

use crate::{config::MAX_ARRAY_LENGTH, errors::errors::ErrorImpl};

use super::{
    stdlib::{array_pop, array_push},
    value::{lookup_property, ArrayRef, Callable, FunctionRef, NativeFn, ObjectRef, Value},
};

/// A property key after coercion. Canonical non-negative integers are kept
/// as indices so arrays and strings can use them directly.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Index(usize),
    Name(Rc<str>),
}

impl PropertyKey {
    pub fn from_value(value: &Value) -> PropertyKey {
        match value {
            Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n < u32::MAX as f64 => {
                PropertyKey::Index(*n as usize)
            }
            other => PropertyKey::from_name(other.to_js_string()),
        }
    }

    pub fn from_name(name: Rc<str>) -> PropertyKey {
        match name.parse::<usize>() {
            Ok(index) if index.to_string() == *name => PropertyKey::Index(index),
            _ => PropertyKey::Name(name),
        }
    }

    /// The key as an object property name.
    pub fn as_name(&self) -> Rc<str> {
        match self {
            PropertyKey::Index(index) => Rc::from(index.to_string()),
            PropertyKey::Name(name) => Rc::clone(name),
        }
    }

    fn is(&self, name: &str) -> bool {
        matches!(self, PropertyKey::Name(key) if &**key == name)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Index(index) => write!(f, "{}", index),
            PropertyKey::Name(name) => f.write_str(name),
        }
    }
}

/// Property reads and writes for one kind of value.
pub trait MemberAccess {
    fn get_member(&self, key: &PropertyKey) -> Value;
    fn set_member(&self, key: &PropertyKey, value: Value) -> Result<(), ErrorImpl>;
}

fn read_only(key: &PropertyKey, target: &str) -> ErrorImpl {
    ErrorImpl::PropertyAssignment {
        property: key.to_string(),
        target: target.to_string(),
    }
}

impl MemberAccess for ObjectRef {
    fn get_member(&self, key: &PropertyKey) -> Value {
        lookup_property(self, &key.as_name()).unwrap_or(Value::Undefined)
    }

    fn set_member(&self, key: &PropertyKey, value: Value) -> Result<(), ErrorImpl> {
        self.borrow_mut().properties.insert(key.as_name(), value);
        Ok(())
    }
}

fn bound_native(
    name: &'static str,
    arity: usize,
    func: NativeFn,
    receiver: Value,
) -> Value {
    Value::Function(Rc::new(Callable::Native {
        name,
        arity,
        func,
        receiver,
    }))
}

/// Grows or truncates `elements` to `length`, filling new slots with
/// `undefined`.
pub fn resize_array(elements: &mut Vec<Value>, length: usize) -> Result<(), ErrorImpl> {
    if length > elements.len() {
        let additional = length - elements.len();
        if length > MAX_ARRAY_LENGTH || elements.try_reserve_exact(additional).is_err() {
            return Err(ErrorImpl::InvalidArrayLength {
                length: length.to_string(),
            });
        }
    }

    elements.resize(length, Value::Undefined);
    Ok(())
}

impl MemberAccess for ArrayRef {
    fn get_member(&self, key: &PropertyKey) -> Value {
        match key {
            PropertyKey::Index(index) => self
                .borrow()
                .get(*index)
                .cloned()
                .unwrap_or(Value::Undefined),
            key if key.is("length") => Value::Number(self.borrow().len() as f64),
            key if key.is("push") => {
                bound_native("push", 1, array_push, Value::Array(Rc::clone(self)))
            }
            key if key.is("pop") => bound_native("pop", 0, array_pop, Value::Array(Rc::clone(self))),
            _ => Value::Undefined,
        }
    }

    fn set_member(&self, key: &PropertyKey, value: Value) -> Result<(), ErrorImpl> {
        match key {
            PropertyKey::Index(index) => {
                let mut elements = self.borrow_mut();
                if *index >= elements.len() {
                    resize_array(&mut elements, *index + 1)?;
                }
                elements[*index] = value;
                Ok(())
            }
            key if key.is("length") => match value {
                Value::Number(n) if n >= 0.0 && n.fract() == 0.0 && n < u32::MAX as f64 => {
                    resize_array(&mut self.borrow_mut(), n as usize)
                }
                other => Err(ErrorImpl::InvalidArrayLength {
                    length: other.to_display(),
                }),
            },
            key => Err(read_only(key, "array")),
        }
    }
}

impl MemberAccess for FunctionRef {
    fn get_member(&self, key: &PropertyKey) -> Value {
        match key {
            key if key.is("name") => Value::string(self.name().unwrap_or("")),
            key if key.is("length") => Value::Number(self.arity() as f64),
            _ => Value::Undefined,
        }
    }

    fn set_member(&self, key: &PropertyKey, _value: Value) -> Result<(), ErrorImpl> {
        Err(read_only(key, "function"))
    }
}

impl MemberAccess for Rc<str> {
    fn get_member(&self, key: &PropertyKey) -> Value {
        match key {
            PropertyKey::Index(index) => self
                .chars()
                .nth(*index)
                .map_or(Value::Undefined, |c| Value::string(c.to_string())),
            key if key.is("length") => Value::Number(self.chars().count() as f64),
            _ => Value::Undefined,
        }
    }

    fn set_member(&self, key: &PropertyKey, _value: Value) -> Result<(), ErrorImpl> {
        Err(read_only(key, "string"))
    }
}

/// Reads `value[key]`, dispatching on the value's variant.
pub fn get_member(value: &Value, key: &PropertyKey) -> Result<Value, ErrorImpl> {
    match value {
        Value::Object(object) => Ok(object.get_member(key)),
        Value::Array(array) => Ok(array.get_member(key)),
        Value::Function(function) => Ok(function.get_member(key)),
        Value::String(string) => Ok(string.get_member(key)),
        Value::Number(_) | Value::Boolean(_) => Ok(Value::Undefined),
        Value::Null | Value::Undefined => Err(ErrorImpl::PropertyOfNullish {
            property: key.to_string(),
            value: value.type_name().to_string(),
        }),
    }
}

/// Writes `value[key] = new_value`.
pub fn set_member(value: &Value, key: &PropertyKey, new_value: Value) -> Result<(), ErrorImpl> {
    match value {
        Value::Object(object) => object.set_member(key, new_value),
        Value::Array(array) => array.set_member(key, new_value),
        Value::Function(function) => function.set_member(key, new_value),
        Value::String(string) => string.set_member(key, new_value),
        Value::Number(_) | Value::Boolean(_) => Err(read_only(key, value.type_name())),
        Value::Null | Value::Undefined => Err(ErrorImpl::PropertyOfNullish {
            property: key.to_string(),
            value: value.type_name().to_string(),
        }),
    }
}
