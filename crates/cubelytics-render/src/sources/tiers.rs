//! Tier-list sources: player fields plus a per-mode ranking map, a badge
//! list and a list of test results.

use serde_json::{Map, Value};

use crate::classify::residual;
use crate::dispatch::Normalizer;
use crate::generic::{array_section, object_sections};
use crate::tree::{Field, PresentationTree, Section};
use crate::value::{display_value, format_date_secs, is_scalar, is_truthy};

const RANKINGS: &str = "rankings";
const BADGES: &str = "badges";
const TESTS: &str = "tests";

#[derive(Debug, Clone, Copy, Default)]
pub struct TiersNormalizer;

impl Normalizer for TiersNormalizer {
    fn normalize(&self, payload: &Value) -> PresentationTree {
        let Some(map) = payload.as_object() else {
            return crate::generic::normalize_value(payload);
        };

        let mut sections = Vec::new();
        let mut handled = vec![RANKINGS, BADGES, TESTS];

        let player: Vec<Field> = map
            .iter()
            .filter(|(k, v)| !handled.contains(&k.as_str()) && is_scalar(v) && !v.is_null())
            .map(|(k, v)| Field::from_value(k.as_str(), v))
            .collect();
        let player_keys: Vec<&str> = map
            .iter()
            .filter(|(k, v)| !handled.contains(&k.as_str()) && is_scalar(v))
            .map(|(k, _)| k.as_str())
            .collect();
        if !player.is_empty() {
            sections.push(Section::fields(Some("Player"), player));
        }

        let mut unhandled_known = Vec::new();
        match map.get(RANKINGS) {
            Some(Value::Object(rankings)) => sections.push(rankings_section(rankings)),
            Some(other) if !other.is_null() => unhandled_known.push(RANKINGS),
            _ => {}
        }
        for (key, title) in [(BADGES, "Badges"), (TESTS, "Tests")] {
            match map.get(key) {
                Some(Value::Array(items)) if !items.is_empty() => {
                    sections.push(array_section(title, items));
                }
                Some(Value::Array(_)) | Some(Value::Null) | None => {}
                Some(_) => unhandled_known.push(key),
            }
        }

        // Keys that were not consumed above fall through to the generic rules.
        handled.retain(|k| !unhandled_known.contains(k));
        handled.extend(player_keys);
        sections.extend(object_sections(&residual(map, &handled)));

        PresentationTree::new(sections).or_placeholder()
    }
}

fn rankings_section(rankings: &Map<String, Value>) -> Section {
    let mut children: Vec<Section> = rankings
        .iter()
        .map(|(mode, info)| ranking_entry(mode, info))
        .collect();
    if children.is_empty() {
        children.push(Section::placeholder());
    }
    Section::group("Rankings", children)
}

/// One game mode: `T<tier>`, `#<pos>`, peak tier and position, retired
/// status and the attained date when present.
pub fn ranking_entry(mode: &str, info: &Value) -> Section {
    let tier_label = |key: &str| match info.get(key) {
        Some(v) if !v.is_null() => format!("T{}", display_value(v)),
        _ => "?".to_string(),
    };
    let position = |key: &str| match info.get(key) {
        Some(v) if !v.is_null() => format!("#{}", display_value(v)),
        _ => "#?".to_string(),
    };

    let mut fields = vec![
        Field::new("tier", tier_label("tier")),
        Field::new("position", position("pos")),
        Field::new("peak", format!("{} {}", tier_label("peak_tier"), position("peak_pos"))),
        Field::new(
            "status",
            if is_truthy(info.get("retired")) { "retired" } else { "active" },
        ),
    ];

    let attained = info
        .get("attained")
        .filter(|v| is_truthy(Some(*v)))
        .and_then(Value::as_f64)
        .and_then(format_date_secs);
    if let Some(date) = attained {
        fields.push(Field::new("attained", date));
    }

    Section::group(mode, vec![Section::fields(None, fields)])
}
