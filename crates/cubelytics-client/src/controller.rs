//! Runs searches in the background and reports their progress.
//!
//! At most one search is live. Each submission gets a new generation number
//! and every update is tagged with it; starting a new search aborts the old
//! task and closes its channel, and any update still tagged with an older
//! generation is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use cubelytics_protocol::PlayerIdentity;
use cubelytics_render::Surface;

use crate::consumer::{ConsumerState, Step, StreamConsumer};
use crate::error::{SearchError, TransportError};
use crate::progress::StreamProgress;
use crate::transport::Transport;

/// What a running search reports to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchUpdate {
    /// Prior results should be cleared; progress shows "Resolving player…".
    Started { query: String },
    PlayerResolved(PlayerIdentity),
    Progress(StreamProgress),
    Rendered(Surface),
    Failed(String),
    /// The linger delay after completion has elapsed.
    ProgressCollapsed,
}

impl SearchUpdate {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rendered(_) | Self::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub generation: u64,
    pub update: SearchUpdate,
}

/// Generations start at 1.
const IDLE: u64 = 0;

pub struct SearchController {
    transport: Arc<dyn Transport>,
    linger: Duration,
    updates: mpsc::UnboundedSender<Update>,
    generation: Arc<AtomicU64>,
    /// Generation of the search still awaiting its terminal update, or `IDLE`.
    running: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl SearchController {
    pub fn new(transport: Arc<dyn Transport>, linger: Duration) -> (Self, mpsc::UnboundedReceiver<Update>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let controller = Self {
            transport,
            linger,
            updates,
            generation: Arc::new(AtomicU64::new(0)),
            running: Arc::new(AtomicU64::new(IDLE)),
            task: None,
        };
        (controller, rx)
    }

    /// Whether a search has not yet reached a terminal state.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst) != IDLE
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Whether an update belongs to the current search.
    pub fn accepts(&self, update: &Update) -> bool {
        update.generation == self.generation()
    }

    /// Start a search. Blank queries are rejected without contacting the
    /// transport, and so is a submission while another search is running.
    pub fn submit(&mut self, query: &str) -> Result<u64, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        if self.is_running() {
            return Err(SearchError::Busy);
        }
        Ok(self.spawn(query.to_string()))
    }

    /// Replace any running search with a new one.
    pub fn restart(&mut self, query: &str) -> Result<u64, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        self.cancel();
        self.submit(query)
    }

    /// Abort the current search; its pending updates become stale.
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.running.store(IDLE, Ordering::SeqCst);
    }

    fn spawn(&mut self, query: String) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(old) = self.task.take() {
            old.abort();
        }
        self.running.store(generation, Ordering::SeqCst);

        let emitter = Emitter {
            generation,
            current: self.generation.clone(),
            running: self.running.clone(),
            tx: self.updates.clone(),
        };
        let transport = self.transport.clone();
        let linger = self.linger;

        tracing::info!(query = %query, generation, "Starting search");
        self.task = Some(tokio::spawn(async move {
            run_search(transport, query, emitter, linger).await;
        }));
        generation
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct Emitter {
    generation: u64,
    current: Arc<AtomicU64>,
    running: Arc<AtomicU64>,
    tx: mpsc::UnboundedSender<Update>,
}

impl Emitter {
    fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    fn send(&self, update: SearchUpdate) {
        if !self.is_current() {
            return;
        }
        let _ = self.tx.send(Update {
            generation: self.generation,
            update,
        });
    }

    /// Re-enable submission, unless a newer search already took over.
    fn release(&self) {
        let _ = self
            .running
            .compare_exchange(self.generation, IDLE, Ordering::SeqCst, Ordering::SeqCst);
    }

    fn step(&self, step: Step, consumer: &StreamConsumer) {
        match step {
            Step::Ignored => {}
            Step::Resolved(identity) => {
                self.send(SearchUpdate::PlayerResolved(identity));
                self.send(SearchUpdate::Progress(consumer.progress()));
            }
            Step::Progress(progress) => self.send(SearchUpdate::Progress(progress)),
            Step::Completed(surface) => {
                self.release();
                self.send(SearchUpdate::Rendered(surface));
            }
            Step::Failed(message) => {
                self.release();
                self.send(SearchUpdate::Failed(message));
            }
        }
    }
}

async fn run_search(
    transport: Arc<dyn Transport>,
    query: String,
    emitter: Emitter,
    linger: Duration,
) {
    let mut consumer = StreamConsumer::new();
    consumer.begin();
    emitter.send(SearchUpdate::Started { query: query.clone() });
    emitter.send(SearchUpdate::Progress(consumer.progress()));

    match transport.open(&query).await {
        Ok(mut channel) => {
            while !consumer.state().is_terminal() {
                let step = match channel.next().await {
                    Some(Ok(event)) => consumer.handle_event(event),
                    Some(Err(e)) => consumer.handle_transport_error(&e),
                    None => consumer.handle_transport_error(&TransportError::Closed),
                };
                emitter.step(step, &consumer);
            }
            channel.close();
        }
        Err(e) => {
            let step = consumer.handle_transport_error(&e);
            emitter.step(step, &consumer);
        }
    }

    emitter.release();

    if consumer.state() == ConsumerState::Done {
        tokio::time::sleep(linger).await;
        emitter.send(SearchUpdate::ProgressCollapsed);
    }
}
