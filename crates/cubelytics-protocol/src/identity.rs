use serde::Serialize;

use crate::constants::DEFAULT_AVATAR_URL;
use crate::events::PlayerEvent;

/// Game edition the resolved player belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Java,
    Bedrock,
}

impl Platform {
    /// Only `"bedrock"` selects Bedrock; any other tag (or none) is Java.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("bedrock") => Self::Bedrock,
            _ => Self::Java,
        }
    }

    pub fn badge_label(&self) -> &'static str {
        match self {
            Self::Java => "Java",
            Self::Bedrock => "Bedrock",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Java => "java",
            Self::Bedrock => "bedrock",
        };
        write!(f, "{s}")
    }
}

/// Identifier the resolver attached to the player, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PlayerId {
    Uuid(String),
    Xuid(String),
    None,
}

impl PlayerId {
    /// Line shown under the player name.
    pub fn display_line(&self) -> String {
        match self {
            Self::Uuid(uuid) => uuid.clone(),
            Self::Xuid(xuid) => format!("XUID: {xuid}"),
            Self::None => "Bedrock Edition".to_string(),
        }
    }
}

/// Avatar locator with a fixed fallback for unreachable images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarRef {
    pub url: String,
    pub fallback: String,
}

impl AvatarRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fallback: DEFAULT_AVATAR_URL.to_string(),
        }
    }

    /// The locator to present, given whether `url` could be loaded.
    pub fn resolve(&self, reachable: bool) -> &str {
        if reachable && !self.url.trim().is_empty() {
            &self.url
        } else {
            &self.fallback
        }
    }

    /// Locator for text surfaces. They print the URL without fetching it,
    /// so only a blank URL falls back.
    pub fn display_url(&self) -> &str {
        self.resolve(true)
    }
}

/// The resolved subject of one search. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerIdentity {
    pub display_name: String,
    pub id: PlayerId,
    pub platform: Platform,
    pub avatar: AvatarRef,
}

impl From<PlayerEvent> for PlayerIdentity {
    fn from(event: PlayerEvent) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let id = match (non_empty(event.uuid), non_empty(event.xuid)) {
            (Some(uuid), _) => PlayerId::Uuid(uuid),
            (None, Some(xuid)) => PlayerId::Xuid(xuid),
            (None, None) => PlayerId::None,
        };
        Self {
            display_name: event.username,
            id,
            platform: event.platform,
            avatar: AvatarRef::new(event.skin_url),
        }
    }
}
