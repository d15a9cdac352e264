//! Field classifier: partitions an object's entries by value shape.

use serde_json::{Map, Value};

/// Entries of one object split into scalars, nested objects and arrays,
/// each group in the object's own key order.
#[derive(Debug, Default)]
pub struct Classified<'a> {
    /// Strings, numbers, booleans and `null`.
    pub scalars: Vec<(&'a str, &'a Value)>,
    pub objects: Vec<(&'a str, &'a Map<String, Value>)>,
    pub arrays: Vec<(&'a str, &'a [Value])>,
}

impl Classified<'_> {
    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty() && self.objects.is_empty() && self.arrays.is_empty()
    }
}

pub fn classify(map: &Map<String, Value>) -> Classified<'_> {
    let mut out = Classified::default();
    for (key, value) in map {
        match value {
            Value::Object(obj) => out.objects.push((key.as_str(), obj)),
            Value::Array(items) => out.arrays.push((key.as_str(), items.as_slice())),
            scalar => out.scalars.push((key.as_str(), scalar)),
        }
    }
    out
}

/// An array renders as a table when its first element is a record.
pub fn is_record_array(items: &[Value]) -> bool {
    matches!(items.first(), Some(Value::Object(_)))
}

/// Entries of `map` whose keys are not in `handled`, preserving order.
pub fn residual(map: &Map<String, Value>, handled: &[&str]) -> Map<String, Value> {
    map.iter()
        .filter(|(k, _)| !handled.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
