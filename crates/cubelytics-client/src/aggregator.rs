//! Per-search buffer of source outcomes.

use cubelytics_protocol::SourceResult;

/// Append-only list of source results in arrival order.
#[derive(Debug, Default)]
pub struct Aggregator {
    results: Vec<SourceResult>,
    expected: Option<u64>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: SourceResult) {
        self.results.push(result);
    }

    /// Total the stream announced for this search.
    pub fn set_expected(&mut self, total: u64) {
        self.expected = Some(total);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Successes first, then failures, each in arrival order.
    pub fn finalize(self) -> Vec<SourceResult> {
        if let Some(expected) = self.expected {
            if expected != self.results.len() as u64 {
                tracing::warn!(
                    expected,
                    received = self.results.len(),
                    "Stream source count does not match announced total"
                );
            }
        }
        let (mut ordered, failed): (Vec<_>, Vec<_>) =
            self.results.into_iter().partition(SourceResult::is_success);
        ordered.extend(failed);
        ordered
    }
}
