//! Cache keys

use std::fmt;

use serde_json::{Map, Value};

/// Identity of a cached query: endpoint name plus canonical arguments
///
/// Object keys are sorted recursively, so `{"page":1,"limit":10}` and
/// `{"limit":10,"page":1}` address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    endpoint: &'static str,
    args: String,
}

impl CacheKey {
    pub fn new(endpoint: &'static str, args: &Value) -> Self {
        Self {
            endpoint,
            args: canonical(args).to_string(),
        }
    }

    pub const fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    /// Canonical JSON text of the arguments
    pub fn args(&self) -> &str {
        &self.args
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.endpoint, self.args)
    }
}

fn canonical(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonical(&map[key]));
            }
            Value::Object(sorted)
        },
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        other => other.clone(),
    }
}
