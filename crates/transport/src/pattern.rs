use serde_json::{Map, Value};

/// Routing key of a pattern. Strings are used verbatim; anything else is
/// serialized as compact JSON with object keys sorted at every level, so
/// `{cmd: "create_user"}` becomes `{"cmd":"create_user"}`.
pub fn normalize_pattern(pattern: &Value) -> String {
    match pattern {
        Value::String(s) => s.clone(),
        other => sorted(other).to_string(),
    }
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::new();
            for k in keys {
                out.insert(k.clone(), sorted(&map[k]));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}
