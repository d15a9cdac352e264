//! Typed events delivered by the search stream.
//!
//! One JSON object per event, discriminated by its `type` field:
//!
//! | type     | meaning                                              |
//! |----------|------------------------------------------------------|
//! | `error`  | terminal: resolution or fetch-phase failure          |
//! | `player` | identity resolved; fetch phase begins                |
//! | `source` | one source attempt completed, with progress snapshot |
//! | `done`   | terminal: every source attempted                     |

use serde::{Deserialize, Deserializer, Serialize};

use crate::identity::Platform;
use crate::ProtocolError;

/// A single message on the search stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Error { message: String },
    Player(PlayerEvent),
    Source(SourceEvent),
    Done,
    /// Any tag this client does not know about.
    #[serde(other)]
    Unknown,
}

impl StreamEvent {
    /// Decode one event from the JSON text of a frame.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Error { .. } | Self::Done)
    }

    /// Stable name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Error { .. } => "error",
            Self::Player(_) => "player",
            Self::Source(_) => "source",
            Self::Done => "done",
            Self::Unknown => "unknown",
        }
    }
}

/// Payload of a `player` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEvent {
    pub username: String,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub xuid: Option<String>,
    #[serde(default)]
    pub skin_url: String,
    #[serde(default, deserialize_with = "deserialize_platform")]
    pub platform: Platform,
}

/// Payload of a `source` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEvent {
    pub label: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub fetched: u64,
    #[serde(default)]
    pub total: u64,
}

fn deserialize_platform<'de, D>(deserializer: D) -> Result<Platform, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(Platform::from_tag(raw.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_every_tag() {
        let err = StreamEvent::decode(r#"{"type":"error","message":"Player 'x' not found"}"#).unwrap();
        assert_eq!(err, StreamEvent::Error { message: "Player 'x' not found".into() });
        assert!(err.is_terminal());

        let done = StreamEvent::decode(r#"{"type":"done"}"#).unwrap();
        assert_eq!(done, StreamEvent::Done);
        assert!(done.is_terminal());

        let source = StreamEvent::decode(
            r#"{"type":"source","label":"mctiers.com","data":{"a":1},"error":null,"fetched":1,"total":3}"#,
        )
        .unwrap();
        match source {
            StreamEvent::Source(ev) => {
                assert_eq!(ev.label, "mctiers.com");
                assert_eq!(ev.data, Some(json!({"a": 1})));
                assert_eq!(ev.error, None);
                assert_eq!((ev.fetched, ev.total), (1, 3));
            }
            other => panic!("expected source, got {other:?}"),
        }
    }

    #[test]
    fn unknown_tags_decode_to_unknown() {
        let ev = StreamEvent::decode(r#"{"type":"heartbeat","at":5}"#).unwrap();
        assert_eq!(ev, StreamEvent::Unknown);
        assert!(!ev.is_terminal());
    }

    #[test]
    fn platform_defaults_to_java() {
        let ev = StreamEvent::decode(
            r#"{"type":"player","username":"Steve","uuid":"abc","skin_url":"u","platform":"pc"}"#,
        )
        .unwrap();
        let StreamEvent::Player(player) = ev else { panic!("expected player") };
        assert_eq!(player.platform, Platform::Java);

        let ev = StreamEvent::decode(r#"{"type":"player","username":"Steve","platform":null}"#).unwrap();
        let StreamEvent::Player(player) = ev else { panic!("expected player") };
        assert_eq!(player.platform, Platform::Java);
        assert_eq!(player.skin_url, "");

        let ev = StreamEvent::decode(r#"{"type":"player","username":"Alex","xuid":"253","platform":"bedrock"}"#).unwrap();
        let StreamEvent::Player(player) = ev else { panic!("expected player") };
        assert_eq!(player.platform, Platform::Bedrock);
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        assert!(matches!(StreamEvent::decode("{not json"), Err(ProtocolError::Decode(_))));
        assert!(StreamEvent::decode(r#"{"message":"no tag"}"#).is_err());
    }

    #[test]
    fn done_encodes_as_bare_tag() {
        let json = serde_json::to_string(&StreamEvent::Done).unwrap();
        assert_eq!(json, "{\"type\":\"done\"}");
        assert_eq!(StreamEvent::decode(&json).unwrap(), StreamEvent::Done);
    }
}
