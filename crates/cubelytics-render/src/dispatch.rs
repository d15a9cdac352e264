//! Render dispatcher: picks the normalizer for a source label.
//!
//! Labels match exactly against [`KNOWN_SOURCES`]; anything else (including
//! case or spacing variants) goes to the generic normalizer. The payload is
//! treated as opaque until the chosen normalizer inspects it.

use serde_json::Value;

use crate::generic::GenericNormalizer;
use crate::sources::{FactionNormalizer, HubNormalizer, NetworkNormalizer, TiersNormalizer};
use crate::tree::PresentationTree;

/// Converts one source payload into a presentation tree.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, payload: &Value) -> PresentationTree;
}

/// Which normalizer family handles a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Tiers,
    Hub,
    Network,
    Faction,
    Generic,
}

/// Label → normalizer registry.
pub const KNOWN_SOURCES: &[(&str, SourceKind)] = &[
    ("mctiers.com", SourceKind::Tiers),
    ("pvptiers.com", SourceKind::Tiers),
    ("subtiers.net", SourceKind::Tiers),
    ("playhive.com", SourceKind::Hub),
    ("hypixel (plancke)", SourceKind::Network),
    ("6b6t.org", SourceKind::Faction),
];

static TIERS: TiersNormalizer = TiersNormalizer;
static HUB: HubNormalizer = HubNormalizer;
static NETWORK: NetworkNormalizer = NetworkNormalizer;
static FACTION: FactionNormalizer = FactionNormalizer;
static GENERIC: GenericNormalizer = GenericNormalizer;

impl SourceKind {
    pub fn for_label(label: &str) -> Self {
        KNOWN_SOURCES
            .iter()
            .find(|(known, _)| *known == label)
            .map(|(_, kind)| *kind)
            .unwrap_or(SourceKind::Generic)
    }

    pub fn normalizer(self) -> &'static dyn Normalizer {
        match self {
            SourceKind::Tiers => &TIERS,
            SourceKind::Hub => &HUB,
            SourceKind::Network => &NETWORK,
            SourceKind::Faction => &FACTION,
            SourceKind::Generic => &GENERIC,
        }
    }
}

/// Render one successful source payload.
pub fn dispatch(label: &str, payload: &Value) -> PresentationTree {
    let kind = SourceKind::for_label(label);
    tracing::debug!(source = %label, kind = ?kind, "Normalizing source payload");
    kind.normalizer().normalize(payload)
}
