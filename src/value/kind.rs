use std::str::FromStr;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::ContractViolation;

/// The eight mutually exclusive elementary kinds a [`super::Value`] can have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Undefined,
    Object,
    Boolean,
    Number,
    BigInt,
    String,
    Symbol,
    Function,
}

/// name → kind, built once from [`Kind::ALL`]
static REGISTRY: Lazy<IndexMap<&'static str, Kind>> = Lazy::new(|| {
    Kind::ALL.iter().map(|k| (k.as_str(), *k)).collect()
});

impl Kind {
    /// Canonical order, as exposed by the library surface.
    pub const ALL: [Kind; 8] = [
        Kind::Undefined,
        Kind::Object,
        Kind::Boolean,
        Kind::Number,
        Kind::BigInt,
        Kind::String,
        Kind::Symbol,
        Kind::Function,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Undefined => "undefined",
            Kind::Object => "object",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::BigInt => "bigint",
            Kind::String => "string",
            Kind::Symbol => "symbol",
            Kind::Function => "function",
        }
    }
}

impl FromStr for Kind {
    type Err = ContractViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        REGISTRY.get(s).copied().ok_or_else(|| ContractViolation::UnknownKind(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_the_registry() {
        for kind in Kind::ALL {
            assert_eq!(kind.as_str().parse::<Kind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_names_are_contract_violations() {
        let err = "array".parse::<Kind>().unwrap_err();
        assert_eq!(err, ContractViolation::UnknownKind("array".into()));
        assert_eq!(err.to_string(), "invalid data type: array");
    }

    #[test]
    fn serializes_as_lowercase_name() {
        let json = serde_json::to_value(Kind::ALL).unwrap();
        assert_eq!(json, serde_json::json!([
            "undefined", "object", "boolean", "number", "bigint", "string", "symbol", "function"
        ]));
    }
}
