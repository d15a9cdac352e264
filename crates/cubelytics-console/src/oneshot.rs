//! Non-interactive search: run one query to its terminal state.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};

use cubelytics_client::{SearchController, SearchUpdate, Transport};
use cubelytics_protocol::PlayerIdentity;
use cubelytics_render::Surface;

/// How one search ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Completed {
        player: Option<PlayerIdentity>,
        surface: Surface,
    },
    Failed {
        player: Option<PlayerIdentity>,
        message: String,
    },
}

impl SearchOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

pub async fn run_search(transport: Arc<dyn Transport>, query: &str) -> Result<SearchOutcome> {
    let (mut controller, mut updates) = SearchController::new(transport, Duration::ZERO);
    controller.submit(query)?;

    let mut player = None;
    while let Some(update) = updates.recv().await {
        if !controller.accepts(&update) {
            continue;
        }
        match update.update {
            SearchUpdate::PlayerResolved(identity) => player = Some(identity),
            SearchUpdate::Progress(progress) => {
                tracing::debug!(count = %progress.count_text(), "{}", progress.label());
            }
            SearchUpdate::Rendered(surface) => return Ok(SearchOutcome::Completed { player, surface }),
            SearchUpdate::Failed(message) => return Ok(SearchOutcome::Failed { player, message }),
            SearchUpdate::Started { .. } | SearchUpdate::ProgressCollapsed => {}
        }
    }
    Err(anyhow!("search ended without a result"))
}
