//! serde_json interop: JSON documents in, serializable values out.
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::Value;

/// Largest integer magnitude an `f64` holds exactly; beyond it integers become bigints.
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        use serde_json::Value as J;
        match v {
            J::Null => Value::Null,
            J::Bool(b) => Value::Bool(*b),
            J::Number(n) => from_json_number(n),
            J::String(s) => Value::String(s.clone()),
            J::Array(xs) => Value::array(xs.iter().map(Value::from)),
            J::Object(m) => Value::object(m.iter().map(|(k, v)| (k.clone(), Value::from(v)))),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self { Value::from(&v) }
}

fn from_json_number(n: &serde_json::Number) -> Value {
    if let Some(i) = n.as_i64() {
        if i.unsigned_abs() > MAX_SAFE_INTEGER {
            return Value::BigInt(i as i128);
        }
        Value::Number(i as f64)
    } else if let Some(u) = n.as_u64() {
        if u > MAX_SAFE_INTEGER {
            return Value::BigInt(u as i128);
        }
        Value::Number(u as f64)
    } else {
        Value::Number(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::BigInt(n) => serializer.serialize_i128(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Symbol(_) | Value::Function(_) => serializer.collect_str(self),
            Value::Array(xs) => {
                let mut seq = serializer.serialize_seq(Some(xs.len()))?;
                for x in xs.iter() {
                    seq.serialize_element(x)?;
                }
                seq.end()
            }
            Value::Object(o) => {
                let mut map = serializer.serialize_map(Some(o.len()))?;
                for (k, v) in o.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}
