//! One-line, human-readable messages for error records and values.
use std::fmt;

use crate::error::ErrorRecord;
use crate::node::MatchCase;
use crate::value::{Kind, Value};

// ------------------------------- Policy ---------------------------------- //

/// Allowed values listed in a value-mismatch message before the rest is elided.
pub const ALLOWED_REPORT_LIMIT: usize = 10;

// ------------------------------- Messages --------------------------------- //

pub fn format_error(error: &ErrorRecord) -> String {
    match error {
        ErrorRecord::TypeMismatch { target, expected } => {
            let names = expected.iter().map(|k| k.as_str()).collect::<Vec<_>>();
            format!("{target} does not match type: {}", names.join(" | "))
        }
        ErrorRecord::TypeNotArray { target } => format!("{target} is not an array"),
        ErrorRecord::TypeNotInstance { target, class } => {
            format!("{target} is not an instance of {class}")
        }
        ErrorRecord::PropertyMissing { target, property } => {
            format!("{target} is missing property: {property}")
        }
        ErrorRecord::PropertyExtra { target, properties } if properties.len() == 1 => {
            format!("{target} has extra property: {}", properties[0])
        }
        ErrorRecord::PropertyExtra { target, properties } => {
            format!("{target} has extra properties: {}", properties.join(", "))
        }
        ErrorRecord::Null { target } => format!("{target} is null"),
        ErrorRecord::ArrayBound { target, bound } => {
            format!("{target} length does not fall in bounds {bound}")
        }
        ErrorRecord::ValueMismatch { target, got, allowed } => {
            format!("{target} has value {got} which is not one of: {}", allowed_list(allowed))
        }
        ErrorRecord::ValueBound { target, got, bound } => {
            format!("{target} has value {got} which does not fall in bounds {bound}")
        }
    }
}

fn allowed_list(allowed: &[Value]) -> String {
    let mut out = allowed.iter()
        .take(ALLOWED_REPORT_LIMIT)
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if allowed.len() > ALLOWED_REPORT_LIMIT {
        out.push_str(&format!(", ... ({} more)", allowed.len() - ALLOWED_REPORT_LIMIT));
    }
    out
}

/// Numbers the way a person writes them: no trailing `.0`, spelled-out infinities.
pub fn number(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n == f64::INFINITY {
        "Infinity".into()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".into()
    } else {
        format!("{n}")
    }
}

// ------------------------------- Display ---------------------------------- //

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_error(self))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for MatchCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchCase::Kind(kind) => write!(f, "data type \"{kind}\""),
            MatchCase::Array => f.write_str("array"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&number(*n)),
            Value::BigInt(n) => write!(f, "{n}n"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Symbol(s) => write!(f, "Symbol({})", s.description().unwrap_or_default()),
            Value::Function(func) => write!(f, "[Function {}]", func.name()),
            Value::Array(xs) => write!(f, "Array({})", xs.len()),
            Value::Object(o) => match o.class() {
                Some(class) => f.write_str(class.name()),
                None => f.write_str("Object"),
            },
        }
    }
}
