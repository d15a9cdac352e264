//! Faction-server source: flat player metadata plus a `player_stats` map of
//! stat name to `{7d, 30d, total}`.

use serde_json::Value;

use crate::classify::residual;
use crate::dispatch::Normalizer;
use crate::generic::object_sections;
use crate::tree::{Field, PresentationTree, Section, TableBlock};
use crate::value::{display_value, is_scalar, is_truthy};

const PLAYER_STATS: &str = "player_stats";

pub const STATS_HEADERS: [&str; 4] = ["Stat", "7 days", "30 days", "Total"];
const PERIODS: [&str; 3] = ["7d", "30d", "total"];

#[derive(Debug, Clone, Copy, Default)]
pub struct FactionNormalizer;

impl Normalizer for FactionNormalizer {
    fn normalize(&self, payload: &Value) -> PresentationTree {
        let Some(map) = payload.as_object() else {
            return crate::generic::normalize_value(payload);
        };

        let mut sections = Vec::new();
        let mut handled: Vec<&str> = Vec::new();

        let player: Vec<Field> = map
            .iter()
            .filter(|(k, v)| k.as_str() != PLAYER_STATS && is_scalar(v))
            .inspect(|(k, _)| handled.push(k.as_str()))
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| Field::from_value(k.as_str(), v))
            .collect();
        if !player.is_empty() {
            sections.push(Section::fields(Some("Player"), player));
        }

        match map.get(PLAYER_STATS) {
            Some(Value::Object(stats)) => {
                handled.push(PLAYER_STATS);
                let rows = stats
                    .iter()
                    .map(|(name, periods)| {
                        let mut row = vec![name.clone()];
                        row.extend(PERIODS.iter().map(|p| period_cell(periods.get(*p))));
                        row
                    })
                    .collect();
                sections.push(Section::Table(TableBlock {
                    title: Some("Stats".to_string()),
                    headers: STATS_HEADERS.iter().map(|h| h.to_string()).collect(),
                    rows,
                }));
            }
            Some(Value::Null) => handled.push(PLAYER_STATS),
            _ => {}
        }

        sections.extend(object_sections(&residual(map, &handled)));
        PresentationTree::new(sections).or_placeholder()
    }
}

/// Absent or falsy period values show as zero.
fn period_cell(value: Option<&Value>) -> String {
    match value {
        Some(v) if is_truthy(Some(v)) => display_value(v),
        _ => "0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stats_render_as_fixed_four_column_table() {
        let tree = FactionNormalizer.normalize(&json!({
            "player_stats": {
                "Kills": {"7d": 5, "30d": 20, "total": 100},
                "Deaths": {"total": "12"}
            }
        }));
        let Some(Section::Table(stats)) = tree.find("Stats") else {
            panic!("expected stats table");
        };
        assert_eq!(stats.headers, vec!["Stat", "7 days", "30 days", "Total"]);
        assert_eq!(
            stats.rows,
            vec![vec!["Kills", "5", "20", "100"], vec!["Deaths", "0", "0", "12"]]
        );
    }

    #[test]
    fn metadata_comes_first() {
        let tree = FactionNormalizer.normalize(&json!({
            "player_stats": {"Kills": {"7d": 1}},
            "first_join": "2023-01-04",
            "playtime": "41h",
            "clan": null
        }));
        assert_eq!(
            tree.sections[0],
            Section::fields(
                Some("Player"),
                vec![Field::new("first_join", "2023-01-04"), Field::new("playtime", "41h")]
            )
        );
        assert_eq!(tree.sections.len(), 2);
    }

    #[test]
    fn unexpected_keys_fall_through() {
        let tree = FactionNormalizer.normalize(&json!({
            "player_stats": [1, 2],
            "home": {"x": 10}
        }));
        assert!(matches!(tree.find("player_stats"), Some(Section::Fields(_))));
        assert_eq!(tree.field("x"), Some("10"));
    }

    #[test]
    fn empty_payload_is_placeholder() {
        assert!(FactionNormalizer.normalize(&json!({"player_stats": null})).is_placeholder());
    }
}
