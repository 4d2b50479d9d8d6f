//! Chainable runtime validation of dynamically typed values.
//!
//! Wrap a [`Value`] with [`inspect`], chain constraints on the returned
//! [`Node`], then read the outcome:
//!
//! ```
//! use serde_json::json;
//! use veritas::{inspect, Kind, Value};
//!
//! let value = Value::from(json!({"x": 5, "y": "ten"}));
//! let mut node = inspect(&value);
//! node.property_type("x", Kind::Number)
//!     .property_type("y", Kind::Number)
//!     .no_extra();
//!
//! let err = node.finish().unwrap_err();
//! assert_eq!(err.to_string(), "value.y does not match type: number");
//! ```
//!
//! Every failure is an [`ErrorRecord`] whose `target` is the dotted and
//! indexed path of the offending value (`value.items[3].id`). Misusing the
//! API itself (an impossible range, flattening twice, matching a kind twice)
//! panics with a [`ContractViolation`] message.
pub mod error;
pub mod node;
pub mod range;
pub mod render;
pub mod value;

pub use error::{Category, ContractViolation, Error, ErrorRecord, ValidationFailure};
pub use node::{MatchCase, Mode, Node, DEFAULT_LABEL};
pub use range::{Bound, NumberRange, Shape};
pub use render::format_error;
pub use value::{Class, Function, Kind, Object, Symbol, Value};

/// The elementary kinds, in canonical order.
pub const DATA_TYPES: [Kind; 8] = Kind::ALL;

pub fn data_types() -> &'static [Kind] { &DATA_TYPES }

/// Entry point: a fresh root node over `value`, required and scalar.
pub fn inspect(value: &Value) -> Node<'_> {
    Node::new(value)
}
