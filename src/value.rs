//! Tagged value model.
//!
//! Everything the validator inspects is a [`Value`]: a closed set of variants
//! that map one-to-one onto the eight elementary [`Kind`]s. Composites are
//! reference-counted, so cloning a value keeps its identity; [`Value::same`]
//! compares composites, symbols and functions by reference and primitives by
//! value.
//!
//! - Objects keep their own properties in insertion order (see [`Object`]).
//! - Class identity is an explicit tag ([`Class`]) rather than reflection.
//! - `null` is an object-kind value; `not_null` is what rejects it.
pub mod kind;
pub mod json;

use std::sync::Arc;
use indexmap::IndexMap;

pub use kind::Kind;

// ------------------------------- Values ---------------------------------- //

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    Symbol(Symbol),
    Function(Function),
    Array(Arc<Vec<Value>>),
    Object(Arc<Object>),
}

/// A record of own properties, optionally tagged with the class it was built from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object {
    class: Option<Class>,
    fields: IndexMap<String, Value>,
}

/// Named identity token. Two classes are the same only if one is a clone of the other.
#[derive(Clone, Debug)]
pub struct Class(Arc<str>);

/// Unique symbolic identifier with an optional description.
#[derive(Clone, Debug)]
pub struct Symbol(Arc<Option<String>>);

/// Opaque callable, identified by reference and carrying a display name.
#[derive(Clone, Debug)]
pub struct Function(Arc<str>);

impl Class {
    pub fn new(name: &str) -> Self { Self(Arc::from(name)) }
    pub fn name(&self) -> &str { &self.0 }
    pub fn is(&self, other: &Class) -> bool { Arc::ptr_eq(&self.0, &other.0) }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool { self.is(other) }
}

impl Symbol {
    pub fn new(description: &str) -> Self { Self(Arc::new(Some(description.to_owned()))) }
    pub fn anonymous() -> Self { Self(Arc::new(None)) }
    pub fn description(&self) -> Option<&str> { self.0.as_deref() }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.0, &other.0) }
}

impl Function {
    pub fn new(name: &str) -> Self { Self(Arc::from(name)) }
    pub fn name(&self) -> &str { &self.0 }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.0, &other.0) }
}

impl Object {
    pub fn new() -> Self { Self::default() }

    pub fn with_class(class: &Class) -> Self {
        Self { class: Some(class.clone()), fields: IndexMap::new() }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> { self.fields.get(name) }
    pub fn keys(&self) -> impl Iterator<Item = &str> { self.fields.keys().map(String::as_str) }
    pub fn len(&self) -> usize { self.fields.len() }
    pub fn is_empty(&self) -> bool { self.fields.is_empty() }
    pub fn class(&self) -> Option<&Class> { self.class.as_ref() }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let fields = iter.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self { class: None, fields }
    }
}

// ------------------------------ Construction ------------------------------ //

impl Value {
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::Array(Arc::new(items.into_iter().collect()))
    }

    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(Arc::new(fields.into_iter().collect()))
    }

    /// Object tagged with `class`, as if built by that class's constructor.
    pub fn with_class<K, I>(class: &Class, fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut object = Object::with_class(class);
        for (k, v) in fields {
            object.insert(k, v);
        }
        Value::Object(Arc::new(object))
    }
}

impl From<bool> for Value { fn from(b: bool) -> Self { Value::Bool(b) } }
impl From<f64> for Value { fn from(n: f64) -> Self { Value::Number(n) } }
impl From<i32> for Value { fn from(n: i32) -> Self { Value::Number(n as f64) } }
impl From<u32> for Value { fn from(n: u32) -> Self { Value::Number(n as f64) } }
impl From<i64> for Value { fn from(n: i64) -> Self { Value::Number(n as f64) } }
impl From<i128> for Value { fn from(n: i128) -> Self { Value::BigInt(n) } }
impl From<&str> for Value { fn from(s: &str) -> Self { Value::String(s.to_owned()) } }
impl From<String> for Value { fn from(s: String) -> Self { Value::String(s) } }
impl From<Vec<Value>> for Value { fn from(xs: Vec<Value>) -> Self { Value::Array(Arc::new(xs)) } }
impl From<Object> for Value { fn from(o: Object) -> Self { Value::Object(Arc::new(o)) } }
impl From<Symbol> for Value { fn from(s: Symbol) -> Self { Value::Symbol(s) } }
impl From<Function> for Value { fn from(f: Function) -> Self { Value::Function(f) } }

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

// ------------------------------- Queries --------------------------------- //

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Undefined => Kind::Undefined,
            Value::Null | Value::Array(_) | Value::Object(_) => Kind::Object,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::BigInt(_) => Kind::BigInt,
            Value::String(_) => Kind::String,
            Value::Symbol(_) => Kind::Symbol,
            Value::Function(_) => Kind::Function,
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }
    pub fn is_array(&self) -> bool { matches!(self, Value::Array(_)) }

    pub fn class(&self) -> Option<&Class> {
        match self {
            Value::Object(o) => o.class(),
            _ => None,
        }
    }

    pub fn is_instance_of(&self, class: &Class) -> bool {
        self.class().is_some_and(|c| c.is(class))
    }

    /// Own property lookup. Arrays answer their decimal index names only; `length`
    /// is not a property here, [`elements`](Self::elements) gives the length.
    pub fn property(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object(o) => o.get(name),
            Value::Array(xs) => name.parse::<usize>().ok()
                .filter(|i| i.to_string() == name)
                .and_then(|i| xs.get(i)),
            _ => None,
        }
    }

    /// Own property names in insertion order. Arrays list their index names and
    /// leave out `length`.
    pub fn own_keys(&self) -> Vec<String> {
        match self {
            Value::Object(o) => o.keys().map(str::to_owned).collect(),
            Value::Array(xs) => (0..xs.len()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    pub fn elements(&self) -> Option<&[Value]> {
        match self {
            Value::Array(xs) => Some(xs.as_slice()),
            _ => None,
        }
    }

    /// Numeric reading of numbers, bigints and numeric text. Anything else is not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::BigInt(n) => Some(*n as f64),
            Value::String(s) => numeric_text(s),
            _ => None,
        }
    }

    /// Identity comparison: primitives by value (NaN is never the same as anything),
    /// symbols, functions and composites by reference.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Decimal text, with `Infinity` as the only spelling of an infinite value.
fn numeric_text(s: &str) -> Option<f64> {
    let text = s.trim();
    let n = text.parse::<f64>().ok()?;
    if n.is_finite() {
        return Some(n);
    }
    matches!(text, "Infinity" | "+Infinity" | "-Infinity").then_some(n)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_value_variant() {
        assert_eq!(Value::Undefined.kind(), Kind::Undefined);
        assert_eq!(Value::Null.kind(), Kind::Object);
        assert_eq!(Value::array([]).kind(), Kind::Object);
        assert_eq!(Value::from(true).kind(), Kind::Boolean);
        assert_eq!(Value::from(f64::NAN).kind(), Kind::Number);
        assert_eq!(Value::from(73_i128).kind(), Kind::BigInt);
        assert_eq!(Value::from("text").kind(), Kind::String);
        assert_eq!(Value::from(Symbol::anonymous()).kind(), Kind::Symbol);
        assert_eq!(Value::from(Function::new("tick")).kind(), Kind::Function);
    }

    #[test]
    fn identity_is_by_reference_for_composites() {
        let a = Value::object([("x", Value::from(1))]);
        let b = Value::object([("x", Value::from(1))]);
        assert_eq!(a, b, "structurally equal");
        assert!(!a.same(&b), "but not the same object");
        assert!(a.same(&a.clone()));
    }

    #[test]
    fn identity_is_by_value_for_primitives() {
        assert!(Value::from(5).same(&Value::from(5.0)));
        assert!(Value::from("a").same(&Value::from("a")));
        assert!(!Value::from(f64::NAN).same(&Value::from(f64::NAN)));
        assert!(!Value::Null.same(&Value::Undefined));

        let s = Symbol::new("k");
        assert!(!Value::from(s.clone()).same(&Value::from(Symbol::new("k"))));
        assert!(Value::from(s.clone()).same(&Value::from(s)));
    }

    #[test]
    fn class_identity_is_a_token() {
        let date = Class::new("Date");
        let other = Class::new("Date");
        let v = Value::with_class(&date, Vec::<(&str, Value)>::new());
        assert!(v.is_instance_of(&date));
        assert!(!v.is_instance_of(&other));
        assert_eq!(v.class().map(Class::name), Some("Date"));
    }

    #[test]
    fn own_keys_keep_insertion_order() {
        let v = Value::object([("z", Value::from(1)), ("a", Value::from(2)), ("m", Value::Null)]);
        assert_eq!(v.own_keys(), vec!["z", "a", "m"]);
        let xs = Value::array([Value::from(1), Value::from(2)]);
        assert_eq!(xs.own_keys(), vec!["0", "1"]);
        assert_eq!(xs.property("1"), Some(&Value::from(2)));
        assert_eq!(xs.property("01"), None);
        assert_eq!(xs.property("length"), None);
    }

    #[test]
    fn numeric_reading() {
        assert_eq!(Value::from(2.5).as_number(), Some(2.5));
        assert_eq!(Value::from(" 12 ").as_number(), Some(12.0));
        assert_eq!(Value::from(1_i128 << 60).as_number(), Some((1_i128 << 60) as f64));
        assert_eq!(Value::from("twelve").as_number(), None);
        assert_eq!(Value::from(true).as_number(), None);
        assert_eq!(Value::Null.as_number(), None);
    }

    #[test]
    fn infinity_is_only_read_from_its_full_name() {
        assert_eq!(Value::from("Infinity").as_number(), Some(f64::INFINITY));
        assert_eq!(Value::from(" -Infinity").as_number(), Some(f64::NEG_INFINITY));
        assert_eq!(Value::from("+Infinity").as_number(), Some(f64::INFINITY));
        for text in ["inf", "INF", "infinity", "-inf", "nan", "NaN"] {
            assert_eq!(Value::from(text).as_number(), None, "{text}");
        }
    }
}
