//! Fallback normalizer for sources without a dedicated rule, and the
//! structural primitives the dedicated normalizers reuse.
//!
//! Top-level rules:
//! - scalar entries collect into one untitled field block
//! - each nested object becomes a titled group, flattened one level
//! - arrays whose first element is a record become tables (columns are the
//!   union of keys across rows, in first-seen order); other arrays become
//!   indexed field blocks

use serde_json::{Map, Value};

use crate::classify::{classify, is_record_array};
use crate::dispatch::Normalizer;
use crate::tree::{Field, PresentationTree, Section, TableBlock};
use crate::value::{cell_value, display_value};

/// Structure-only normalizer used for unknown sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericNormalizer;

impl Normalizer for GenericNormalizer {
    fn normalize(&self, payload: &Value) -> PresentationTree {
        normalize_value(payload)
    }
}

/// Normalize any payload, including non-object ones.
pub fn normalize_value(payload: &Value) -> PresentationTree {
    let sections = match payload {
        Value::Object(map) => object_sections(map),
        Value::Null => Vec::new(),
        Value::Array(items) => vec![array_section("Entries", items)],
        scalar => vec![Section::fields(None, vec![Field::from_value("value", scalar)])],
    };
    PresentationTree::new(sections).or_placeholder()
}

/// Sections for every entry of `map`.
pub fn object_sections(map: &Map<String, Value>) -> Vec<Section> {
    let classified = classify(map);
    let mut sections = Vec::new();

    if !classified.scalars.is_empty() {
        let fields = classified
            .scalars
            .iter()
            .map(|(k, v)| Field::from_value(*k, v))
            .collect();
        sections.push(Section::fields(None, fields));
    }
    for (key, obj) in &classified.objects {
        sections.push(nested_section(key, obj));
    }
    for (key, items) in &classified.arrays {
        sections.push(array_section(key, items));
    }
    sections
}

/// A titled group for one nested object, flattened one level: its scalars
/// form a field block, child objects become titled field blocks, and child
/// arrays render as tables or indexed blocks.
pub fn nested_section(title: &str, obj: &Map<String, Value>) -> Section {
    let classified = classify(obj);
    let mut children = Vec::new();

    if !classified.scalars.is_empty() {
        let fields = classified
            .scalars
            .iter()
            .map(|(k, v)| Field::from_value(*k, v))
            .collect();
        children.push(Section::fields(None, fields));
    }
    for (key, child) in &classified.objects {
        let fields = child.iter().map(|(k, v)| Field::from_value(k.as_str(), v)).collect();
        children.push(Section::fields(Some(*key), fields));
    }
    for (key, items) in &classified.arrays {
        children.push(array_section(key, items));
    }

    Section::group(title, children)
}

/// A table for record arrays, an indexed field block otherwise.
pub fn array_section(title: &str, items: &[Value]) -> Section {
    if is_record_array(items) {
        Section::Table(records_table(Some(title), items))
    } else {
        Section::fields(Some(title), indexed_fields(items))
    }
}

/// Index → value fields for a plain array.
pub fn indexed_fields(items: &[Value]) -> Vec<Field> {
    items
        .iter()
        .enumerate()
        .map(|(i, v)| Field::new(i.to_string(), display_value(v)))
        .collect()
}

/// Table whose columns are the union of keys across all record rows, in
/// first-seen order. Missing cells (and non-record rows) are empty.
pub fn records_table(title: Option<&str>, items: &[Value]) -> TableBlock {
    let mut headers: Vec<String> = Vec::new();
    for item in items {
        if let Value::Object(row) = item {
            for key in row.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }
    }

    let rows = items
        .iter()
        .map(|item| {
            headers
                .iter()
                .map(|h| cell_value(item.as_object().and_then(|row| row.get(h))))
                .collect()
        })
        .collect();

    TableBlock {
        title: title.map(str::to_string),
        headers,
        rows,
    }
}

/// A titled section for a value of unknown shape.
pub fn titled_section(title: &str, value: &Value) -> Section {
    match value {
        Value::Object(obj) => nested_section(title, obj),
        Value::Array(items) => array_section(title, items),
        scalar => Section::fields(Some(title), vec![Field::from_value(title, scalar)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::FieldBlock;
    use serde_json::json;

    #[test]
    fn flat_payload_is_one_field_block() {
        let tree = normalize_value(&json!({"rank": "VIP", "level": 50, "online": false}));
        assert_eq!(
            tree.sections,
            vec![Section::fields(
                None,
                vec![
                    Field::new("rank", "VIP"),
                    Field::new("level", "50"),
                    Field::new("online", "false"),
                ]
            )]
        );
    }

    #[test]
    fn record_array_columns_are_union_in_first_seen_order() {
        let tree = normalize_value(&json!({
            "matches": [
                {"map": "Lobby", "result": "win"},
                {"map": "Castle", "kills": 4},
                {"result": "loss", "map": "Docks"}
            ]
        }));
        let Some(Section::Table(table)) = tree.find("matches") else {
            panic!("expected matches table");
        };
        assert_eq!(table.headers, vec!["map", "result", "kills"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["Lobby", "win", ""],
                vec!["Castle", "", "4"],
                vec!["Docks", "loss", ""],
            ]
        );
    }

    #[test]
    fn plain_arrays_are_indexed() {
        let tree = normalize_value(&json!({"titles": ["Champion", "Veteran"], "empty": []}));
        assert_eq!(
            tree.sections,
            vec![
                Section::fields(
                    Some("titles"),
                    vec![Field::new("0", "Champion"), Field::new("1", "Veteran")]
                ),
                Section::fields(Some("empty"), vec![]),
            ]
        );
    }

    #[test]
    fn nested_objects_flatten_one_level() {
        let tree = normalize_value(&json!({
            "guild": {
                "name": "Knights",
                "members": 12,
                "owner": {"name": "Alex", "since": 2019},
                "ranks": [{"name": "Officer"}],
                "tags": ["pvp", "build"]
            }
        }));
        let Some(Section::Group(group)) = tree.find("guild") else {
            panic!("expected guild group");
        };
        assert_eq!(group.children.len(), 4);
        assert_eq!(
            group.children[0],
            Section::fields(None, vec![Field::new("name", "Knights"), Field::new("members", "12")])
        );
        assert_eq!(
            group.children[1],
            Section::Fields(FieldBlock {
                title: Some("owner".into()),
                fields: vec![Field::new("name", "Alex"), Field::new("since", "2019")],
            })
        );
        assert!(matches!(&group.children[2], Section::Table(t) if t.headers == vec!["name"]));
        assert!(matches!(&group.children[3], Section::Fields(b) if b.fields.len() == 2));
    }

    #[test]
    fn empty_or_null_payload_is_placeholder() {
        assert!(normalize_value(&json!({})).is_placeholder());
        assert!(normalize_value(&Value::Null).is_placeholder());
    }

    #[test]
    fn non_object_payloads_degrade() {
        let tree = normalize_value(&json!("banned"));
        assert_eq!(tree.field("value"), Some("banned"));

        let tree = normalize_value(&json!([{"a": 1}]));
        assert!(matches!(tree.find("Entries"), Some(Section::Table(_))));
    }
}
