//! Presentation assembler: one card and one navigation entry per finalized
//! source result, in the aggregator's order.

use serde::Serialize;

use cubelytics_protocol::{SourceOutcome, SourceResult};

use crate::dispatch::dispatch;
use crate::tree::PresentationTree;

const DEFAULT_ICON: &str = "📊";

const SOURCE_ICONS: &[(&str, &str)] = &[
    ("mctiers.com", "⚔️"),
    ("pvptiers.com", "🗡️"),
    ("centraltierlist.com", "🏆"),
    ("hypixel (plancke)", "🎮"),
    ("minecraftearth.org", "🌍"),
    ("jartexnetwork.com", "🔮"),
    ("playhive.com", "🐝"),
    ("6b6t.org", "💀"),
    ("pika-network.net", "⚡"),
    ("reafystats.com", "📊"),
    ("mcsrranked.com", "🏁"),
    ("mccisland", "🏝️"),
    ("manacube.com", "🧊"),
];

pub fn icon_for(label: &str) -> &'static str {
    SOURCE_ICONS
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

/// Stable identifier linking a card to its navigation entry.
pub fn card_id(index: usize) -> String {
    format!("source-{index}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Ok,
    Failed,
}

impl CardStatus {
    pub fn badge(self) -> &'static str {
        match self {
            CardStatus::Ok => "OK",
            CardStatus::Failed => "Error",
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            CardStatus::Ok => "✔",
            CardStatus::Failed => "✘",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum CardBody {
    /// Single warning line carrying the source's error message.
    Warning(String),
    Tree(PresentationTree),
}

impl CardBody {
    pub fn warning_line(&self) -> Option<String> {
        match self {
            CardBody::Warning(message) => Some(format!("⚠ {message}")),
            CardBody::Tree(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: String,
    pub label: String,
    pub icon: &'static str,
    pub status: CardStatus,
    pub expanded: bool,
    pub body: CardBody,
}

impl Card {
    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavEntry {
    /// Id of the card this entry scrolls to.
    pub target: String,
    pub label: String,
    pub icon: &'static str,
    pub status: CardStatus,
}

/// Everything the UI shows for one finished search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Surface {
    pub cards: Vec<Card>,
    pub nav: Vec<NavEntry>,
}

impl Surface {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }
}

/// Build the result surface from finalized results. Pure: the same input
/// always yields an equal surface.
pub fn assemble(results: &[SourceResult]) -> Surface {
    let mut surface = Surface::default();
    for (index, result) in results.iter().enumerate() {
        let id = card_id(index);
        let icon = icon_for(&result.label);
        let (status, body) = match &result.outcome {
            SourceOutcome::Failure(message) => (CardStatus::Failed, CardBody::Warning(message.clone())),
            SourceOutcome::Success(payload) => (CardStatus::Ok, CardBody::Tree(dispatch(&result.label, payload))),
        };

        surface.nav.push(NavEntry {
            target: id.clone(),
            label: result.label.clone(),
            icon,
            status,
        });
        surface.cards.push(Card {
            id,
            label: result.label.clone(),
            icon,
            status,
            expanded: true,
            body,
        });
    }
    tracing::debug!(cards = surface.cards.len(), "Assembled result surface");
    surface
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn one_card_and_entry_per_result() {
        let results = vec![
            SourceResult::success("mctiers.com", json!({"name": "Steve"})),
            SourceResult::failure("jartexnetwork.com", "timeout"),
        ];
        let surface = assemble(&results);

        assert_eq!(surface.cards.len(), 2);
        assert_eq!(surface.nav.len(), 2);
        for (card, entry) in surface.cards.iter().zip(&surface.nav) {
            assert_eq!(card.id, entry.target);
            assert_eq!(card.status, entry.status);
            assert!(card.expanded);
        }
        assert_eq!(surface.cards[0].icon, "⚔️");
        assert_eq!(surface.cards[1].id, "source-1");
        assert_eq!(surface.cards[1].body.warning_line().as_deref(), Some("⚠ timeout"));
        assert_eq!(surface.nav[1].status.marker(), "✘");
    }

    #[test]
    fn unknown_label_gets_default_icon() {
        assert_eq!(icon_for("example.org"), "📊");
        assert_eq!(icon_for("playhive.com"), "🐝");
    }

    #[test]
    fn toggle_collapses_card() {
        let mut surface = assemble(&[SourceResult::success("x", json!(null))]);
        surface.cards[0].toggle();
        assert!(!surface.cards[0].expanded);
    }
}
