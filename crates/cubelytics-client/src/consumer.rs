//! Lifecycle of one search as an explicit state machine.
//!
//! ```text
//! idle → resolving → fetching → done
//!            └──────────┴──────→ failed
//! ```
//!
//! Events are applied strictly in arrival order. Once `done` or `failed` is
//! reached every further input is ignored. A consumer is built fresh for each
//! search; discarding it is the reset.

use cubelytics_protocol::{PlayerIdentity, SourceResult, StreamEvent, CONNECTION_LOST_MESSAGE};
use cubelytics_render::{assemble, Surface};

use crate::aggregator::Aggregator;
use crate::error::TransportError;
use crate::progress::StreamProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Idle,
    Resolving,
    Fetching,
    Done,
    Failed,
}

impl ConsumerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// What one input changed, for the caller to surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Ignored,
    Resolved(PlayerIdentity),
    Progress(StreamProgress),
    Completed(Surface),
    Failed(String),
}

#[derive(Debug)]
pub struct StreamConsumer {
    state: ConsumerState,
    player: Option<PlayerIdentity>,
    progress: StreamProgress,
    aggregator: Aggregator,
}

impl Default for StreamConsumer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamConsumer {
    pub fn new() -> Self {
        Self {
            state: ConsumerState::Idle,
            player: None,
            progress: StreamProgress::new(),
            aggregator: Aggregator::new(),
        }
    }

    /// `idle → resolving`. Returns false if this consumer already ran.
    pub fn begin(&mut self) -> bool {
        if self.state != ConsumerState::Idle {
            return false;
        }
        self.state = ConsumerState::Resolving;
        true
    }

    pub fn state(&self) -> ConsumerState {
        self.state
    }

    pub fn player(&self) -> Option<&PlayerIdentity> {
        self.player.as_ref()
    }

    pub fn progress(&self) -> StreamProgress {
        self.progress
    }

    /// Number of buffered source results.
    pub fn buffered(&self) -> usize {
        self.aggregator.len()
    }

    pub fn handle_event(&mut self, event: StreamEvent) -> Step {
        if !matches!(self.state, ConsumerState::Resolving | ConsumerState::Fetching) {
            tracing::debug!(kind = event.kind(), state = ?self.state, "Ignoring event outside an active search");
            return Step::Ignored;
        }

        match event {
            StreamEvent::Error { message } => self.fail(message),
            StreamEvent::Player(player) => {
                if self.state != ConsumerState::Resolving {
                    tracing::warn!(username = %player.username, "Ignoring repeated player event");
                    return Step::Ignored;
                }
                let identity = PlayerIdentity::from(player);
                tracing::info!(player = %identity.display_name, "Player resolved");
                self.player = Some(identity.clone());
                self.progress.begin_fetching();
                self.state = ConsumerState::Fetching;
                Step::Resolved(identity)
            }
            StreamEvent::Source(source) => {
                if self.state == ConsumerState::Resolving {
                    tracing::warn!(source = %source.label, "Source event before player event");
                    self.progress.begin_fetching();
                    self.state = ConsumerState::Fetching;
                }
                self.progress.record(source.fetched, source.total);
                self.aggregator.set_expected(source.total);
                tracing::debug!(
                    source = %source.label,
                    fetched = source.fetched,
                    total = source.total,
                    "Source received"
                );
                self.aggregator.add(SourceResult::from(source));
                Step::Progress(self.progress)
            }
            StreamEvent::Done => {
                self.state = ConsumerState::Done;
                self.progress.complete();
                let results = std::mem::take(&mut self.aggregator).finalize();
                tracing::info!(sources = results.len(), "Search complete");
                Step::Completed(assemble(&results))
            }
            StreamEvent::Unknown => Step::Ignored,
        }
    }

    /// A channel-level failure; reported with the generic connectivity
    /// message.
    pub fn handle_transport_error(&mut self, error: &TransportError) -> Step {
        if self.state.is_terminal() || self.state == ConsumerState::Idle {
            return Step::Ignored;
        }
        tracing::warn!(error = %error, "Search stream transport failed");
        self.fail(CONNECTION_LOST_MESSAGE.to_string())
    }

    fn fail(&mut self, message: String) -> Step {
        tracing::info!(message = %message, discarded = self.aggregator.len(), "Search failed");
        self.state = ConsumerState::Failed;
        self.aggregator = Aggregator::new();
        Step::Failed(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubelytics_protocol::{PlayerEvent, Platform, SourceEvent};
    use cubelytics_render::CardStatus;
    use serde_json::json;

    fn player() -> StreamEvent {
        StreamEvent::Player(PlayerEvent {
            username: "Steve".into(),
            uuid: Some("8667ba71b85a4004af54457a9734eed7".into()),
            xuid: None,
            skin_url: "https://example.org/skin.png".into(),
            platform: Platform::Java,
        })
    }

    fn source(label: &str, error: Option<&str>, fetched: u64, total: u64) -> StreamEvent {
        StreamEvent::Source(SourceEvent {
            label: label.into(),
            data: error.is_none().then(|| json!({"wins": fetched})),
            error: error.map(str::to_string),
            fetched,
            total,
        })
    }

    fn started() -> StreamConsumer {
        let mut consumer = StreamConsumer::new();
        assert!(consumer.begin());
        consumer
    }

    #[test]
    fn full_lifecycle_assembles_once() {
        let mut consumer = started();
        assert!(matches!(consumer.handle_event(player()), Step::Resolved(p) if p.display_name == "Steve"));
        assert_eq!(consumer.progress().count_text(), "0 / ?");

        consumer.handle_event(source("a", Some("timeout"), 1, 2));
        let Step::Progress(progress) = consumer.handle_event(source("b", None, 2, 2)) else {
            panic!("expected progress");
        };
        assert_eq!(progress.ratio(), 1.0);

        let Step::Completed(surface) = consumer.handle_event(StreamEvent::Done) else {
            panic!("expected completion");
        };
        assert_eq!(surface.cards[0].label, "b");
        assert_eq!(surface.cards[1].status, CardStatus::Failed);
        assert_eq!(consumer.state(), ConsumerState::Done);

        assert_eq!(consumer.handle_event(StreamEvent::Done), Step::Ignored);
        assert_eq!(consumer.handle_event(source("late", None, 3, 3)), Step::Ignored);
    }

    #[test]
    fn error_event_discards_buffer() {
        let mut consumer = started();
        consumer.handle_event(player());
        consumer.handle_event(source("a", None, 1, 3));
        let step = consumer.handle_event(StreamEvent::Error { message: "Rate limited".into() });
        assert_eq!(step, Step::Failed("Rate limited".into()));
        assert_eq!(consumer.buffered(), 0);
        assert_eq!(consumer.handle_event(StreamEvent::Done), Step::Ignored);
    }

    #[test]
    fn transport_error_is_connection_lost() {
        let mut consumer = started();
        let step = consumer.handle_transport_error(&TransportError::Closed);
        assert_eq!(step, Step::Failed("Connection lost".into()));
        assert_eq!(consumer.state(), ConsumerState::Failed);
        assert_eq!(consumer.handle_transport_error(&TransportError::Closed), Step::Ignored);
    }

    #[test]
    fn idle_consumer_ignores_everything() {
        let mut consumer = StreamConsumer::new();
        assert_eq!(consumer.handle_event(player()), Step::Ignored);
        assert_eq!(consumer.state(), ConsumerState::Idle);
        consumer.begin();
        assert!(!consumer.begin());
    }

    #[test]
    fn resolution_error_leaves_no_cards() {
        let mut consumer = started();
        let step = consumer.handle_event(StreamEvent::Error { message: "Player 'x' not found".into() });
        assert_eq!(step, Step::Failed("Player 'x' not found".into()));
        assert_eq!(consumer.buffered(), 0);
        assert!(consumer.player().is_none());
    }

    #[test]
    fn unknown_events_are_ignored() {
        let mut consumer = started();
        assert_eq!(consumer.handle_event(StreamEvent::Unknown), Step::Ignored);
        assert_eq!(consumer.state(), ConsumerState::Resolving);
    }
}
