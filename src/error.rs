//! Error records, reportable failures and programmer-contract violations.
//!
//! Validation outcomes are data: a node accumulates [`ErrorRecord`]s and only
//! turns them into a [`ValidationFailure`] at the end of a chain. Misuse of the
//! API (unknown kinds, impossible ranges, nested flattening, matching the same
//! case twice) is a [`ContractViolation`] and never lands in the record list.
use serde::Serialize;
use thiserror::Error;

use crate::node::MatchCase;
use crate::value::{Kind, Value};

/// One validation outcome, addressed by the path of the offending value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ErrorRecord {
    TypeMismatch { target: String, expected: Vec<Kind> },
    TypeNotArray { target: String },
    TypeNotInstance { target: String, class: String },
    PropertyMissing { target: String, property: String },
    PropertyExtra { target: String, properties: Vec<String> },
    Null { target: String },
    ArrayBound { target: String, bound: String },
    ValueMismatch { target: String, got: Value, allowed: Vec<Value> },
    ValueBound { target: String, got: Value, bound: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Type,
    Property,
    Null,
    ArrayBound,
    Value,
}

impl ErrorRecord {
    pub fn target(&self) -> &str {
        match self {
            ErrorRecord::TypeMismatch { target, .. }
            | ErrorRecord::TypeNotArray { target }
            | ErrorRecord::TypeNotInstance { target, .. }
            | ErrorRecord::PropertyMissing { target, .. }
            | ErrorRecord::PropertyExtra { target, .. }
            | ErrorRecord::Null { target }
            | ErrorRecord::ArrayBound { target, .. }
            | ErrorRecord::ValueMismatch { target, .. }
            | ErrorRecord::ValueBound { target, .. } => target,
        }
    }

    fn target_mut(&mut self) -> &mut String {
        match self {
            ErrorRecord::TypeMismatch { target, .. }
            | ErrorRecord::TypeNotArray { target }
            | ErrorRecord::TypeNotInstance { target, .. }
            | ErrorRecord::PropertyMissing { target, .. }
            | ErrorRecord::PropertyExtra { target, .. }
            | ErrorRecord::Null { target }
            | ErrorRecord::ArrayBound { target, .. }
            | ErrorRecord::ValueMismatch { target, .. }
            | ErrorRecord::ValueBound { target, .. } => target,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            ErrorRecord::TypeMismatch { .. }
            | ErrorRecord::TypeNotArray { .. }
            | ErrorRecord::TypeNotInstance { .. } => Category::Type,
            ErrorRecord::PropertyMissing { .. } | ErrorRecord::PropertyExtra { .. } => Category::Property,
            ErrorRecord::Null { .. } => Category::Null,
            ErrorRecord::ArrayBound { .. } => Category::ArrayBound,
            ErrorRecord::ValueMismatch { .. } | ErrorRecord::ValueBound { .. } => Category::Value,
        }
    }

    /// Rewrites the target as `prefix.target`; an empty prefix leaves it untouched.
    pub fn prefixed(mut self, prefix: &str) -> Self {
        if !prefix.is_empty() {
            let target = self.target_mut();
            *target = format!("{prefix}.{target}");
        }
        self
    }
}

// ------------------------------- Failures --------------------------------- //

/// A fatal validation outcome. Displays its own record; [`std::error::Error::source`]
/// walks the remaining records in the order they were recorded.
#[derive(Clone, Debug, Error)]
#[error("{record}")]
pub struct ValidationFailure {
    record: ErrorRecord,
    #[source]
    cause: Option<Box<ValidationFailure>>,
}

impl ValidationFailure {
    /// Chains `records` first-to-last. `None` when there is nothing to report.
    pub fn from_records(records: &[ErrorRecord]) -> Option<Self> {
        records.iter().rev().fold(None, |cause, record| {
            Some(Self { record: record.clone(), cause: cause.map(Box::new) })
        })
    }

    pub fn record(&self) -> &ErrorRecord { &self.record }
    pub fn cause(&self) -> Option<&ValidationFailure> { self.cause.as_deref() }

    pub fn records(&self) -> impl Iterator<Item = &ErrorRecord> {
        std::iter::successors(Some(self), |f| f.cause()).map(ValidationFailure::record)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Invalid(#[from] ValidationFailure),

    /// The node turned fatal without recording why. Indicates a bug in the engine.
    #[error("invalid validator state: node is fatal but holds no errors")]
    InvalidState,
}

/// Misuse of the validation API, as opposed to invalid data.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ContractViolation {
    #[error("invalid data type: {0}")]
    UnknownKind(String),

    #[error("at least one data type must be given")]
    EmptyKindList,

    #[error("range {lower} - {upper} is impossible to satisfy")]
    ImpossibleRange { lower: f64, upper: f64 },

    #[error("range bound \"{0}\" is not a number")]
    BoundNotANumber(String),

    #[error("cannot perform validation on nested arrays")]
    NestedArray,

    #[error("{0} matched multiple times")]
    DuplicateMatch(MatchCase),
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::*;

    fn missing(target: &str, property: &str) -> ErrorRecord {
        ErrorRecord::PropertyMissing { target: target.into(), property: property.into() }
    }

    #[test]
    fn prefixing_composes_paths() {
        let record = missing("x", "y").prefixed("value").prefixed("");
        assert_eq!(record.target(), "value.x");
        assert_eq!(record.category(), Category::Property);
    }

    #[test]
    fn failure_chain_keeps_recording_order() {
        let records = vec![
            missing("value", "a"),
            ErrorRecord::Null { target: "value.b".into() },
            ErrorRecord::TypeNotArray { target: "value.c".into() },
        ];
        let failure = ValidationFailure::from_records(&records).unwrap();
        assert_eq!(failure.to_string(), "value is missing property: a");
        assert_eq!(failure.records().cloned().collect::<Vec<_>>(), records);

        let source = std::error::Error::source(&failure).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("value.b is null"));
        assert!(ValidationFailure::from_records(&[]).is_none());
    }

    #[test]
    fn transparent_error_forwards_the_chain() {
        let records = [missing("value", "a"), ErrorRecord::Null { target: "value.b".into() }];
        let err = Error::from(ValidationFailure::from_records(&records).unwrap());
        assert_eq!(err.to_string(), "value is missing property: a");
        assert_eq!(std::error::Error::source(&err).map(ToString::to_string).as_deref(), Some("value.b is null"));
    }

    #[test]
    fn records_serialize_with_a_code_tag() {
        let record = ErrorRecord::TypeMismatch { target: "value[0]".into(), expected: vec![Kind::String] };
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({
            "code": "type_mismatch",
            "target": "value[0]",
            "expected": ["string"],
        }));
        let record = ErrorRecord::ValueBound { target: "value".into(), got: Value::from(11), bound: "0 - 10".into() };
        assert_eq!(serde_json::to_value(&record).unwrap()["got"], json!(11.0));
    }

    #[test]
    fn contract_violation_messages() {
        assert_eq!(
            ContractViolation::ImpossibleRange { lower: 10.0, upper: 0.0 }.to_string(),
            "range 10 - 0 is impossible to satisfy"
        );
        assert_eq!(
            ContractViolation::DuplicateMatch(MatchCase::Kind(Kind::Number)).to_string(),
            "data type \"number\" matched multiple times"
        );
        assert_eq!(ContractViolation::DuplicateMatch(MatchCase::Array).to_string(), "array matched multiple times");
    }
}
