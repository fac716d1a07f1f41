use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::{ast::expressions::FunctionDef, errors::errors::ErrorImpl};

use super::{environment::Env, evaluator::Interpreter};

pub type ObjectRef = Rc<RefCell<JsObject>>;
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;
pub type FunctionRef = Rc<Callable>;

/// A built-in implemented in Rust. Receives the bound receiver (or
/// `Undefined`) and the evaluated arguments.
pub type NativeFn = fn(&mut Interpreter, &Value, Vec<Value>) -> Result<Value, ErrorImpl>;

/// Nesting below this depth is abbreviated in the display form.
const MAX_DISPLAY_DEPTH: usize = 2;

/// A runtime value. Composites are shared references, so copying a `Value`
/// aliases the underlying object, array or function.
#[derive(Clone)]
pub enum Value {
    Number(f64),
    String(Rc<str>),
    Boolean(bool),
    Null,
    Undefined,
    Object(ObjectRef),
    Array(ArrayRef),
    Function(FunctionRef),
}

impl Value {
    pub fn string(value: impl Into<Rc<str>>) -> Value {
        Value::String(value.into())
    }

    pub fn new_object(object: JsObject) -> Value {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    pub fn new_array(elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    /// Falsy values are `false`, `0`, `NaN`, `""`, `null` and `undefined`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Boolean(b) => *b,
            Value::Null | Value::Undefined => false,
            Value::Object(_) | Value::Array(_) | Value::Function(_) => true,
        }
    }

    /// The result of `typeof`.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Undefined => "undefined",
            Value::Null | Value::Object(_) | Value::Array(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// A short name for error messages, distinguishing null and arrays.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Array(_) => "array",
            other => other.type_of(),
        }
    }

    /// The string conversion used by `+` and property keys.
    pub fn to_js_string(&self) -> Rc<str> {
        match self {
            Value::String(s) => Rc::clone(s),
            other => Rc::from(string_form(other, &mut Vec::new())),
        }
    }

    /// The form `console.log` prints.
    pub fn to_display(&self) -> String {
        display_form(self, 0, &mut Vec::new(), true)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            other => f.write_str(&other.to_display()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display())
    }
}

/// Formats a number the way JavaScript's `String(n)` does.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return String::from("NaN");
    }
    if n == 0.0 {
        return String::from("0");
    }
    if n.is_infinite() {
        return String::from(if n > 0.0 { "Infinity" } else { "-Infinity" });
    }

    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if exponent.starts_with('-') => {
                format!("{}e{}", mantissa, exponent)
            }
            Some((mantissa, exponent)) => format!("{}e+{}", mantissa, exponent),
            None => formatted,
        };
    }

    format!("{}", n)
}

fn identity(value: &Value) -> Option<*const ()> {
    match value {
        Value::Object(object) => Some(Rc::as_ptr(object) as *const ()),
        Value::Array(array) => Some(Rc::as_ptr(array) as *const ()),
        _ => None,
    }
}

fn string_form(value: &Value, seen: &mut Vec<*const ()>) -> String {
    match value {
        Value::Number(n) => number_to_string(*n),
        Value::String(s) => s.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Null => String::from("null"),
        Value::Undefined => String::from("undefined"),
        Value::Object(_) => String::from("[object Object]"),
        Value::Function(function) => format!(
            "function {}() {{ [native code] }}",
            function.name().unwrap_or("")
        ),
        Value::Array(array) => {
            let Some(ptr) = identity(value) else {
                return String::new();
            };
            if seen.contains(&ptr) {
                return String::new();
            }

            seen.push(ptr);
            let joined = array
                .borrow()
                .iter()
                .map(|element| match element {
                    Value::Null | Value::Undefined => String::new(),
                    other => string_form(other, seen),
                })
                .collect::<Vec<_>>()
                .join(",");
            seen.pop();
            joined
        }
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn quote(text: &str) -> String {
    if text.contains('\'') && !text.contains('"') {
        format!("\"{}\"", text)
    } else {
        format!("'{}'", text.replace('\'', "\\'"))
    }
}

fn display_form(value: &Value, depth: usize, seen: &mut Vec<*const ()>, top: bool) -> String {
    match value {
        Value::String(s) if top => s.to_string(),
        Value::String(s) => quote(s),
        Value::Function(function) => match function.name() {
            Some(name) if !name.is_empty() => format!("[Function: {}]", name),
            _ => String::from("[Function (anonymous)]"),
        },
        Value::Array(array) => {
            let ptr = Rc::as_ptr(array) as *const ();
            if seen.contains(&ptr) {
                return String::from("[Circular]");
            }
            let elements = array.borrow();
            if elements.is_empty() {
                return String::from("[]");
            }
            if depth > MAX_DISPLAY_DEPTH {
                return String::from("[Array]");
            }

            seen.push(ptr);
            let items = elements
                .iter()
                .map(|element| display_form(element, depth + 1, seen, false))
                .collect::<Vec<_>>();
            seen.pop();
            format!("[ {} ]", items.join(", "))
        }
        Value::Object(object) => {
            let ptr = Rc::as_ptr(object) as *const ();
            if seen.contains(&ptr) {
                return String::from("[Circular]");
            }
            let object = object.borrow();
            if object.properties.is_empty() {
                return String::from("{}");
            }
            if depth > MAX_DISPLAY_DEPTH {
                return String::from("[Object]");
            }

            seen.push(ptr);
            let entries = object
                .properties
                .iter()
                .map(|(key, value)| {
                    let key = if is_identifier(key) {
                        key.to_string()
                    } else {
                        quote(key)
                    };
                    format!("{}: {}", key, display_form(value, depth + 1, seen, false))
                })
                .collect::<Vec<_>>();
            seen.pop();
            format!("{{ {} }}", entries.join(", "))
        }
        other => string_form(other, seen),
    }
}

/// String-keyed properties in insertion order.
#[derive(Default, Clone)]
pub struct PropertyMap {
    keys: Vec<Rc<str>>,
    values: HashMap<Rc<str>, Value>,
}

impl PropertyMap {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Overwrites in place when the key exists, keeping its position.
    pub fn insert(&mut self, key: Rc<str>, value: Value) {
        if self.values.insert(Rc::clone(&key), value).is_none() {
            self.keys.push(key);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &Rc<str>> {
        self.keys.iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Rc<str>, &Value)> {
        self.keys
            .iter()
            .filter_map(|key| self.values.get(key).map(|value| (key, value)))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// An object: own properties plus an optional prototype consulted when a
/// lookup misses.
#[derive(Default)]
pub struct JsObject {
    pub properties: PropertyMap,
    pub prototype: Option<ObjectRef>,
}

impl JsObject {
    pub fn new(prototype: Option<ObjectRef>) -> Self {
        JsObject {
            properties: PropertyMap::default(),
            prototype,
        }
    }

    pub fn with_properties<'a>(properties: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        let mut object = JsObject::default();
        for (key, value) in properties {
            object.properties.insert(Rc::from(key), value);
        }
        object
    }
}

/// Looks a key up on `object` and then along its prototype chain.
pub fn lookup_property(object: &ObjectRef, key: &str) -> Option<Value> {
    let mut current = Some(Rc::clone(object));
    while let Some(object) = current {
        let borrowed = object.borrow();
        if let Some(value) = borrowed.properties.get(key) {
            return Some(value.clone());
        }
        current = borrowed.prototype.clone();
    }
    None
}

pub enum Callable {
    /// A function defined in source, with the environment it closes over.
    Closure {
        definition: Rc<FunctionDef>,
        env: Env,
        name: Option<Rc<str>>,
    },
    Native {
        name: &'static str,
        arity: usize,
        func: NativeFn,
        receiver: Value,
    },
}

impl Callable {
    pub fn name(&self) -> Option<&str> {
        match self {
            Callable::Closure { name, .. } => name.as_deref(),
            Callable::Native { name, .. } => Some(name),
        }
    }

    /// The declared parameter count.
    pub fn arity(&self) -> usize {
        match self {
            Callable::Closure { definition, .. } => definition.params.len(),
            Callable::Native { arity, .. } => *arity,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "[Function: {}]", name),
            None => f.write_str("[Function (anonymous)]"),
        }
    }
}
