//! Validation nodes: the chained, stateful constraint-checking context.
//!
//! A [`Node`] wraps a buffer of borrowed values. In scalar mode the buffer holds
//! exactly one value; after [`Node::array`] (or inside a `match_array` array
//! case) it holds the flattened elements and every constraint applies to each
//! of them.
//!
//! Policy:
//! - First failure wins per node: once a constraint fails the node is *fatal*
//!   and later constraints in the chain do nothing.
//! - Descending (`property_with`, `each`, `match_kind_with`, `match_array`)
//!   spawns a child node, runs the visitor on it and folds its records back
//!   with the path rewritten.
//! - `type_of`/`type_any` record one mismatch per offending element; every
//!   other check stops at the first offending element.
//! - Pending match cases are only resolved when the result is read.
mod property;
mod array;
mod matching;
mod bounds;

use std::collections::HashSet;
use indexmap::IndexSet;
use tracing::trace;

use crate::error::{ContractViolation, Error, ErrorRecord, ValidationFailure};
use crate::value::{Class, Kind, Value};

pub use matching::MatchCase;
use matching::MatchState;

// ------------------------------- Policy ---------------------------------- //

/// Label of a root node whose value has no class name; also the default path root.
pub const DEFAULT_LABEL: &str = "value";

// ------------------------------- State ----------------------------------- //

/// How `property`/`property_type` treat a property that is not there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// A missing property is an error.
    #[default]
    Required,
    /// A missing property is skipped.
    Optional,
}

#[derive(Debug)]
pub struct Node<'a> {
    buffer: Vec<&'a Value>,
    array_mode: bool,
    label: String,
    mode: Mode,
    fatal: bool,
    type_checked: bool,
    null_checked: bool,
    matches: MatchState,
    consumed: HashSet<String>,
    errors: Vec<ErrorRecord>,
}

impl<'a> Node<'a> {
    /// Root node: scalar, required, labelled after the value's class when it has one.
    pub fn new(value: &'a Value) -> Self {
        let label = value.class()
            .map(Class::name)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_LABEL);
        Self::scalar(value, label)
    }

    fn scalar(value: &'a Value, label: impl Into<String>) -> Self {
        Self::with_buffer(vec![value], false, label.into())
    }

    fn flattened(items: &'a [Value], label: impl Into<String>) -> Self {
        Self::with_buffer(items.iter().collect(), true, label.into())
    }

    fn with_buffer(buffer: Vec<&'a Value>, array_mode: bool, label: String) -> Self {
        Self {
            buffer,
            array_mode,
            label,
            mode: Mode::Required,
            fatal: false,
            type_checked: false,
            null_checked: false,
            matches: MatchState::Idle,
            consumed: HashSet::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_fatal(&self) -> bool { self.fatal }
    pub fn is_array_mode(&self) -> bool { self.array_mode }
    pub fn current_mode(&self) -> Mode { self.mode }
    pub fn current_label(&self) -> &str { &self.label }

    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn required(&mut self) -> &mut Self { self.mode(Mode::Required) }
    pub fn optional(&mut self) -> &mut Self { self.mode(Mode::Optional) }

    /// Replaces the display label. Records already taken keep their paths.
    pub fn label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = label.into();
        self
    }

    /// Path of the buffer element at `index`: `label[index]` in array mode, `label` otherwise.
    fn iterator_label(&self, index: usize) -> String {
        if self.array_mode {
            format!("{}[{index}]", self.label)
        } else {
            self.label.clone()
        }
    }

    fn fail(&mut self, record: ErrorRecord) {
        trace!(path = record.target(), category = ?record.category(), "constraint failed");
        self.fatal = true;
        self.errors.push(record);
    }

    /// Folds a finished child into this node, prefixing each record's path with
    /// `prefix`. Returns whether the child ended fatal.
    fn fold(&mut self, prefix: &str, mut child: Node<'a>) -> bool {
        for record in child.errors() {
            self.errors.push(record.prefixed(prefix));
        }
        if child.fatal {
            trace!(label = %self.label, child = %child.label, "fatal child folded");
            self.fatal = true;
        }
        child.fatal
    }

    // ---------------------------- Kind checks ------------------------------ //

    pub fn type_of(&mut self, expected: Kind) -> &mut Self {
        self.type_any(&[expected])
    }

    /// Requires every buffered value to have one of `expected`. Each offending
    /// element gets its own record.
    ///
    /// # Panics
    ///
    /// If `expected` is empty.
    pub fn type_any(&mut self, expected: &[Kind]) -> &mut Self {
        if self.fatal || self.type_checked { return self; }
        if self.array_mode && self.buffer.is_empty() { return self; }
        if expected.is_empty() {
            panic!("{}", ContractViolation::EmptyKindList);
        }

        self.check_kinds(expected);
        if !self.fatal {
            self.type_checked = true;
        }
        self
    }

    /// The uncached part of `type_any`, shared with match resolution.
    fn check_kinds(&mut self, expected: &[Kind]) {
        let allowed: Vec<Kind> = expected.iter().copied().collect::<IndexSet<_>>().into_iter().collect();
        let offending: Vec<usize> = self.buffer.iter()
            .enumerate()
            .filter(|(_, v)| !allowed.contains(&v.kind()))
            .map(|(i, _)| i)
            .collect();
        for i in offending {
            let target = self.iterator_label(i);
            self.fail(ErrorRecord::TypeMismatch { target, expected: allowed.clone() });
        }
    }

    /// Requires every buffered value to be a non-null object tagged with `class`.
    pub fn instance(&mut self, class: &Class) -> &mut Self {
        self.instance_where(class.name(), |v| v.is_instance_of(class))
    }

    /// Like [`instance`](Self::instance), with the identity decided by `predicate`.
    /// `name` is what failure messages call the expected class.
    pub fn instance_where<P>(&mut self, name: &str, predicate: P) -> &mut Self
    where
        P: Fn(&Value) -> bool,
    {
        self.type_of(Kind::Object).not_null();
        if self.fatal { return self; }

        if let Some(i) = self.buffer.iter().position(|&v| !predicate(v)) {
            let target = self.iterator_label(i);
            self.fail(ErrorRecord::TypeNotInstance { target, class: name.to_owned() });
        }
        self
    }

    pub fn not_null(&mut self) -> &mut Self {
        if self.fatal || self.null_checked { return self; }

        match self.buffer.iter().position(|v| v.is_null()) {
            Some(i) => {
                let target = self.iterator_label(i);
                self.fail(ErrorRecord::Null { target });
            }
            None => self.null_checked = true,
        }
        self
    }

    // ------------------------------ Results -------------------------------- //

    /// Resolves pending match cases (unless already fatal) and returns a copy of
    /// everything recorded so far.
    pub fn errors(&mut self) -> Vec<ErrorRecord> {
        self.resolve_matches();
        self.errors.clone()
    }

    /// `None` while the node is not fatal.
    pub fn to_error(&mut self) -> Option<Error> {
        self.resolve_matches();
        if !self.fatal {
            return None;
        }
        Some(match ValidationFailure::from_records(&self.errors) {
            Some(failure) => Error::Invalid(failure),
            None => Error::InvalidState,
        })
    }

    /// Terminal check: `Err` with the accumulated failure if the node is fatal.
    pub fn finish(&mut self) -> Result<(), Error> {
        match self.to_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::*;
    use crate::value::{Function, Symbol};

    fn samples() -> Vec<(Kind, Vec<Value>)> {
        vec![
            (Kind::Undefined, vec![Value::Undefined]),
            (Kind::Object, vec![Value::object([("a", Value::from(1))]), Value::Null, Value::array([])]),
            (Kind::Boolean, vec![Value::from(true), Value::from(false)]),
            (Kind::Number, vec![Value::from(5), Value::from(f64::NAN)]),
            (Kind::BigInt, vec![Value::from(73_i128)]),
            (Kind::String, vec![Value::from("text")]),
            (Kind::Symbol, vec![Value::from(Symbol::new("tag")), Value::from(Symbol::anonymous())]),
            (Kind::Function, vec![Value::from(Function::new("tick"))]),
        ]
    }

    #[test]
    fn type_of_accepts_exactly_the_native_kind() {
        let samples = samples();
        for (kind, _) in &samples {
            for (native, values) in &samples {
                for value in values {
                    let mut node = Node::new(value);
                    let passed = node.type_of(*kind).finish().is_ok();
                    assert_eq!(passed, kind == native, "{kind} against {value}");
                }
            }
        }
    }

    #[test]
    fn type_any_dedups_the_expected_list() {
        let value = Value::from(true);
        let mut node = Node::new(&value);
        node.type_any(&[Kind::Number, Kind::String, Kind::Number]);
        assert_eq!(node.errors(), vec![ErrorRecord::TypeMismatch {
            target: "value".into(),
            expected: vec![Kind::Number, Kind::String],
        }]);
    }

    #[test]
    #[should_panic(expected = "at least one data type must be given")]
    fn type_any_rejects_an_empty_list() {
        let value = Value::Null;
        Node::new(&value).type_any(&[]);
    }

    #[test]
    fn fatal_nodes_ignore_later_constraints() {
        let value = Value::Null;
        let mut node = Node::new(&value);
        node.type_of(Kind::Number).not_null().type_of(Kind::String).label("renamed").not_null();
        assert!(node.is_fatal());
        assert_eq!(node.errors().len(), 1);
        assert_eq!(node.errors()[0].target(), "value", "relabelling keeps recorded paths");
    }

    #[test]
    fn passed_checks_are_cached() {
        let value = Value::from(5);
        let mut node = Node::new(&value);
        // the strict-type cache makes the second, contradicting call inert
        node.type_of(Kind::Number).type_of(Kind::String);
        assert!(node.finish().is_ok());
    }

    #[test]
    fn not_null_rejects_null() {
        let value = Value::Null;
        let mut node = Node::new(&value);
        node.not_null();
        assert_eq!(node.errors(), vec![ErrorRecord::Null { target: "value".into() }]);
    }

    #[test]
    fn instance_checks_class_identity() {
        let date = Class::new("Date");
        let value = Value::with_class(&date, Vec::<(&str, Value)>::new());

        let mut node = Node::new(&value);
        assert_eq!(node.current_label(), "Date", "root label comes from the class name");
        assert!(node.instance(&date).finish().is_ok());

        let mut node = Node::new(&value);
        node.instance(&Class::new("Date"));
        assert_eq!(node.errors(), vec![ErrorRecord::TypeNotInstance {
            target: "Date".into(),
            class: "Date".into(),
        }]);
    }

    #[test]
    fn instance_implies_object_and_not_null() {
        let regexp = Class::new("RegExp");
        let value = Value::Null;
        let mut node = Node::new(&value);
        node.instance(&regexp);
        assert_eq!(node.errors(), vec![ErrorRecord::Null { target: "value".into() }]);

        let value = Value::from("text");
        let mut node = Node::new(&value);
        node.instance(&regexp);
        assert_eq!(node.errors()[0].target(), "value");
        assert!(matches!(node.errors()[0], ErrorRecord::TypeMismatch { .. }));
    }

    #[test]
    fn instance_where_uses_the_predicate() {
        let value = Value::from(json!({"kind": "point"}));
        let mut node = Node::new(&value);
        node.instance_where("Point", |v| v.property("kind").is_some_and(|k| k.same(&Value::from("point"))));
        assert!(node.finish().is_ok());
    }

    #[test]
    fn to_error_is_none_for_a_clean_node() {
        let value = Value::from(json!({"x": 1}));
        let mut node = Node::new(&value);
        node.type_of(Kind::Object).not_null();
        assert!(node.to_error().is_none());
        assert!(node.errors().is_empty());
    }

    #[test]
    fn fatal_without_records_is_an_invalid_state() {
        let value = Value::Null;
        let mut node = Node::new(&value);
        node.fatal = true;
        assert!(matches!(node.to_error(), Some(Error::InvalidState)));
    }

    #[test]
    fn instance_stops_at_the_first_offending_element() {
        let date = Class::new("Date");
        let value = Value::array([
            Value::object([("a", Value::from(1))]),
            Value::object([("b", Value::from(2))]),
        ]);
        let checked = std::cell::Cell::new(0);
        let mut node = Node::new(&value);
        node.array().instance_where("Date", |v| {
            checked.set(checked.get() + 1);
            v.is_instance_of(&date)
        });
        assert_eq!(checked.get(), 1);
        assert_eq!(node.errors(), vec![ErrorRecord::TypeNotInstance {
            target: "value[0]".into(),
            class: "Date".into(),
        }]);

        let mut node = Node::new(&value);
        node.array().instance(&date);
        assert_eq!(node.errors().len(), 1);
    }
}
