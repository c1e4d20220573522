//! Semantic structural equality.
//!
//! Configuration and job definitions are loaded from hand-written YAML, where
//! an omitted list or map and an empty one mean the same thing. Every
//! comparison in the diff layer goes through [`SemanticEq`].
//!
//! Rules:
//! - an absent key, `null`, `[]` and `{}` are equivalent;
//! - a present scalar is a value: `false`, `""` and `0` differ from an absent
//!   key, and a map entry holding one is a real entry;
//! - numbers compare by numeric value (`1` == `1.0`);
//! - array order is significant.

use serde_json::{Map, Value};

/// Equality that ignores the difference between absent and empty fields.
pub trait SemanticEq {
    fn semantic_eq(&self, other: &Self) -> bool;
}

/// Whether a value is indistinguishable from an omitted field.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => false,
    }
}

fn numbers_eq(a: &serde_json::Number, b: &serde_json::Number) -> bool {
    if a == b {
        return true;
    }
    matches!((a.as_f64(), b.as_f64()), (Some(x), Some(y)) if x == y)
}

impl SemanticEq for Value {
    fn semantic_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a.semantic_eq(b),
            (Value::Array(a), Value::Array(b)) => a.semantic_eq(b),
            (Value::Number(a), Value::Number(b)) => numbers_eq(a, b),
            (a, b) if is_empty_value(a) && is_empty_value(b) => true,
            (a, b) => a == b,
        }
    }
}

impl SemanticEq for Map<String, Value> {
    fn semantic_eq(&self, other: &Self) -> bool {
        let null = Value::Null;
        self.iter()
            .all(|(key, value)| value.semantic_eq(other.get(key).unwrap_or(&null)))
            && other
                .iter()
                .filter(|(key, _)| !self.contains_key(*key))
                .all(|(_, value)| is_empty_value(value))
    }
}

impl<T: SemanticEq> SemanticEq for Vec<T> {
    fn semantic_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.semantic_eq(b))
    }
}

impl<T: SemanticEq> SemanticEq for Option<T> {
    fn semantic_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (None, None) => true,
            (Some(a), Some(b)) => a.semantic_eq(b),
            _ => false,
        }
    }
}

impl SemanticEq for String {
    fn semantic_eq(&self, other: &Self) -> bool {
        self == other
    }
}
