//! Push channels that carry one search's events.
//!
//! [`Transport`] is the seam between the state machine and the wire: the
//! HTTP implementation streams server-sent events from the search endpoint,
//! the replay implementation feeds a recorded transcript.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::Url;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use cubelytics_protocol::{StreamEvent, SEARCH_PATH, SEARCH_QUERY_PARAM};

use crate::error::TransportError;
use crate::sse::{decode_all, decode_payload, SseDecoder};

const CHANNEL_CAPACITY: usize = 64;

type Item = Result<StreamEvent, TransportError>;

/// Opens the event channel for one search.
pub trait Transport: Send + Sync {
    fn open<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<EventChannel, TransportError>> + Send + 'a>>;
}

/// Receiving side of an open channel plus the task reading the wire.
/// Closing (or dropping) it stops the reader so no further events arrive.
pub struct EventChannel {
    rx: mpsc::Receiver<Item>,
    reader: JoinHandle<()>,
}

impl EventChannel {
    pub fn new(rx: mpsc::Receiver<Item>, reader: JoinHandle<()>) -> Self {
        Self { rx, reader }
    }

    /// Next event in arrival order; `None` once the channel has ended.
    pub async fn next(&mut self) -> Option<Item> {
        self.rx.recv().await
    }

    pub fn close(mut self) {
        self.rx.close();
        self.reader.abort();
    }
}

impl Drop for EventChannel {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Streams `GET <base_url><search_path>?q=<query>` as server-sent events.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    search_path: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("cubelytics/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            search_path: SEARCH_PATH.to_string(),
        })
    }

    pub fn with_search_path(mut self, path: impl Into<String>) -> Self {
        self.search_path = path.into();
        self
    }

    /// Endpoint URL with the query percent-encoded.
    pub fn search_url(&self, query: &str) -> Result<Url, TransportError> {
        let raw = format!("{}{}", self.base_url.trim_end_matches('/'), self.search_path);
        let mut url = Url::parse(&raw).map_err(|e| TransportError::InvalidUrl(format!("{raw}: {e}")))?;
        url.query_pairs_mut().append_pair(SEARCH_QUERY_PARAM, query);
        Ok(url)
    }
}

impl Transport for HttpTransport {
    fn open<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<EventChannel, TransportError>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.search_url(query)?;
            tracing::debug!(url = %url, "Opening search stream");

            let response = self
                .client
                .get(url)
                .header(ACCEPT, "text/event-stream")
                .header(CACHE_CONTROL, "no-cache")
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status(status.as_u16()));
            }

            let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
            let reader = tokio::spawn(async move {
                let mut body = response.bytes_stream();
                let mut decoder = SseDecoder::new();
                while let Some(chunk) = body.next().await {
                    match chunk {
                        Ok(bytes) => {
                            for payload in decoder.push(&bytes) {
                                let Some(event) = decode_payload(&payload) else {
                                    continue;
                                };
                                if tx.send(Ok(event)).await.is_err() {
                                    return;
                                }
                            }
                        }
                        Err(e) => {
                            let _ = tx.send(Err(TransportError::Http(e))).await;
                            return;
                        }
                    }
                }
                if decoder.has_pending() {
                    tracing::debug!("Search stream ended mid-frame");
                }
            });

            Ok(EventChannel::new(rx, reader))
        })
    }
}

/// Replays a recorded search, either as SSE text or one JSON event per line.
#[derive(Debug, Clone, Default)]
pub struct ReplayTransport {
    events: Vec<StreamEvent>,
    delay: Duration,
}

impl ReplayTransport {
    pub fn new(events: Vec<StreamEvent>) -> Self {
        Self {
            events,
            delay: Duration::ZERO,
        }
    }

    /// Parse a transcript. Text containing a `data:` line is read as SSE;
    /// otherwise each non-blank line is one JSON event.
    pub fn from_transcript(text: &str) -> Self {
        let is_sse = text.lines().any(|l| l.trim_start().starts_with("data:"));
        let events = if is_sse {
            decode_all(text)
        } else {
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .filter_map(decode_payload)
                .collect()
        };
        Self::new(events)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let text = tokio::fs::read_to_string(path.as_ref()).await?;
        let transport = Self::from_transcript(&text);
        tracing::debug!(
            path = %path.as_ref().display(),
            events = transport.events.len(),
            "Loaded replay transcript"
        );
        Ok(transport)
    }

    /// Pause between events, to watch progress advance.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn events(&self) -> &[StreamEvent] {
        &self.events
    }
}

impl Transport for ReplayTransport {
    fn open<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<EventChannel, TransportError>> + Send + 'a>> {
        Box::pin(async move {
            tracing::debug!(query = %query, events = self.events.len(), "Replaying search");
            let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
            let events = self.events.clone();
            let delay = self.delay;
            let reader = tokio::spawn(async move {
                for event in events {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    if tx.send(Ok(event)).await.is_err() {
                        return;
                    }
                }
            });
            Ok(EventChannel::new(rx, reader))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_percent_encoded() {
        let transport = HttpTransport::new("http://127.0.0.1:5000/", Duration::from_secs(1)).unwrap();
        let url = transport.search_url("Steve & Alex/é").unwrap();
        assert_eq!(url.path(), "/api/search");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("q".to_string(), "Steve & Alex/é".to_string())]);
        assert!(!url.as_str().contains(' '));
        assert!(!url.as_str().contains('é'));
    }

    #[test]
    fn bad_base_url_is_reported() {
        let transport = HttpTransport::new("not a url", Duration::from_secs(1)).unwrap();
        assert!(matches!(transport.search_url("x"), Err(TransportError::InvalidUrl(_))));
    }

    #[test]
    fn transcript_formats() {
        let sse = ReplayTransport::from_transcript("data: {\"type\":\"done\"}\n\n");
        assert_eq!(sse.events(), &[StreamEvent::Done]);

        let lines = ReplayTransport::from_transcript(
            "{\"type\":\"error\",\"message\":\"nope\"}\n\ngarbage\n{\"type\":\"done\"}\n",
        );
        assert_eq!(
            lines.events(),
            &[StreamEvent::Error { message: "nope".into() }, StreamEvent::Done]
        );
    }

    #[tokio::test]
    async fn replay_delivers_in_order_then_ends() {
        let transport = ReplayTransport::new(vec![StreamEvent::Unknown, StreamEvent::Done]);
        let mut channel = transport.open("steve").await.unwrap();
        assert_eq!(channel.next().await.unwrap().unwrap(), StreamEvent::Unknown);
        assert_eq!(channel.next().await.unwrap().unwrap(), StreamEvent::Done);
        assert!(channel.next().await.is_none());
    }
}
