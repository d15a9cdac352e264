//! Cubelytics Client - consumes one search stream at a time.
//!
//! A [`Transport`] opens the server-push channel for a query, the
//! [`sse::SseDecoder`] turns the byte stream into typed events, the
//! [`StreamConsumer`] state machine folds those events into progress and an
//! [`Aggregator`], and the [`SearchController`] runs searches in the
//! background and reports generation-tagged updates to the UI.

pub mod aggregator;
pub mod consumer;
pub mod controller;
pub mod error;
pub mod progress;
pub mod sse;
pub mod transport;

pub use aggregator::Aggregator;
pub use consumer::{ConsumerState, Step, StreamConsumer};
pub use controller::{SearchController, SearchUpdate, Update};
pub use error::{SearchError, TransportError};
pub use progress::{Phase, StreamProgress};
pub use transport::{EventChannel, HttpTransport, ReplayTransport, Transport};
