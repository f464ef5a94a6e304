use serde::{Deserialize, Serialize};
use serde_json::{to_string, to_value, Map, Value};

pub fn dejsonify<'a, T>(json_str: &'a str) -> serde_json::Result<T>
where
    T: Deserialize<'a>,
{
    serde_json::from_str::<T>(json_str)
}

/// Serializes `obj` as a single line of JSON with object keys sorted, so the
/// same report always renders byte for byte the same.
pub fn jsonify<T>(obj: &T) -> anyhow::Result<String>
where
    T: Serialize,
{
    Ok(to_string(&sort_keys(to_value(obj)?))?)
}

fn sort_keys(json_value: Value) -> Value {
    match json_value {
        Value::Object(obj) => {
            let mut entries: Vec<(String, Value)> = obj.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted_map = Map::new();
            for (key, value) in entries {
                sorted_map.insert(key, sort_keys(value));
            }
            Value::Object(sorted_map)
        }
        Value::Array(values) => Value::Array(values.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
