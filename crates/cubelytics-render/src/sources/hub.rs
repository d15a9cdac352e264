//! Minigame-hub source: a `main` profile block plus one sub-block per game.

use serde_json::{Map, Value};

use crate::classify::residual;
use crate::dispatch::Normalizer;
use crate::generic::object_sections;
use crate::tree::{Field, PresentationTree, Section};
use crate::value::{display_value, epoch_millis_date, is_scalar};

const MAIN: &str = "main";

/// Cosmetic, unlock and social-count keys left out of the profile block.
const PROFILE_DENYLIST: &[&str] = &[
    "hub_title_unlocked",
    "avatar_unlocked",
    "costume_unlocked",
    "hat_unlocked",
    "cosmetics.backbling",
    "paid_ranks",
    "pets",
    "mounts",
    "friends",
    "avatar_count",
    "costume_count",
    "hat_count",
    "backbling_count",
    "friend_count",
    "quest_count",
    "equipped_avatar",
    "equipped_hub_title",
];

/// Game sub-blocks the hub reports.
pub const GAME_KEYS: &[&str] = &[
    "hide",
    "dr",
    "wars",
    "murder",
    "sg",
    "sky",
    "ctf",
    "drop",
    "ground",
    "build",
    "party",
    "bridge",
    "grav",
    "bed",
    "parkour",
    "sky-classic",
    "sky-kits",
];

/// Identifier and equipment-selection keys left out of game stats.
const GAME_SKIP: &[&str] = &["UUID", "parkours", "selected_kit"];

#[derive(Debug, Clone, Copy, Default)]
pub struct HubNormalizer;

impl Normalizer for HubNormalizer {
    fn normalize(&self, payload: &Value) -> PresentationTree {
        let Some(map) = payload.as_object() else {
            return crate::generic::normalize_value(payload);
        };

        let mut sections = Vec::new();
        let mut handled: Vec<&str> = Vec::new();

        match map.get(MAIN) {
            Some(Value::Object(main)) => {
                sections.extend(profile_sections(main));
                handled.push(MAIN);
            }
            Some(Value::Null) => handled.push(MAIN),
            _ => {}
        }

        // Game keys holding anything but an object are left to the generic rules.
        let mut games = Vec::new();
        for (key, value) in map.iter().filter(|(k, _)| GAME_KEYS.contains(&k.as_str())) {
            match value {
                Value::Object(game) => games.extend(game_block(key, game)),
                Value::Null => {}
                _ => continue,
            }
            handled.push(key.as_str());
        }
        if !games.is_empty() {
            sections.push(Section::group("Games", games));
        }

        sections.extend(object_sections(&residual(map, &handled)));
        PresentationTree::new(sections).or_placeholder()
    }
}

fn profile_sections(main: &Map<String, Value>) -> Vec<Section> {
    let keep = |k: &str| !PROFILE_DENYLIST.contains(&k) && !GAME_KEYS.contains(&k);

    let profile: Vec<Field> = main
        .iter()
        .filter(|(k, v)| keep(k.as_str()) && is_scalar(v) && !v.is_null())
        .map(|(k, v)| Field::from_value(k.as_str(), v))
        .collect();

    let mut sections = Vec::new();
    if !profile.is_empty() {
        sections.push(Section::fields(Some("Profile"), profile));
    }

    let nested: Map<String, Value> = main
        .iter()
        .filter(|(k, v)| keep(k.as_str()) && !is_scalar(v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    sections.extend(object_sections(&nested));
    sections
}

/// Expandable block for one game; `None` when it has nothing to show.
fn game_block(name: &str, game: &Map<String, Value>) -> Option<Section> {
    let stats: Vec<Field> = game
        .iter()
        .filter(|(k, v)| !GAME_SKIP.contains(&k.as_str()) && is_scalar(v) && !v.is_null())
        .map(|(k, v)| {
            let text = epoch_millis_date(v).unwrap_or_else(|| display_value(v));
            Field::new(k.as_str(), text)
        })
        .collect();

    let mut children = Vec::new();
    if !stats.is_empty() {
        children.push(Section::fields(None, stats));
    }

    let nested: Map<String, Value> = game
        .iter()
        .filter(|(k, v)| !GAME_SKIP.contains(&k.as_str()) && !is_scalar(v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    children.extend(object_sections(&nested));

    if children.is_empty() {
        None
    } else {
        Some(Section::collapsible(name, children))
    }
}
