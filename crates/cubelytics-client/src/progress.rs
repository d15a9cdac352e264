//! Progress counters for one search.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Resolving,
    Fetching,
    Done,
}

/// Fetched/total counters plus the current phase. `total` stays unknown until
/// the first source event arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamProgress {
    pub phase: Phase,
    pub fetched: u64,
    pub total: Option<u64>,
}

impl StreamProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity resolved: counters reset to "0 / unknown".
    pub fn begin_fetching(&mut self) {
        *self = Self {
            phase: Phase::Fetching,
            fetched: 0,
            total: None,
        };
    }

    /// Apply the snapshot carried by one source event.
    pub fn record(&mut self, fetched: u64, total: u64) {
        self.fetched = fetched;
        self.total = Some(total);
        self.phase = if fetched < total { Phase::Fetching } else { Phase::Done };
    }

    pub fn complete(&mut self) {
        self.phase = Phase::Done;
    }

    /// Fraction complete in `0.0..=1.0`. A known total of zero counts as
    /// complete.
    pub fn ratio(&self) -> f64 {
        match self.total {
            None => 0.0,
            Some(0) => 1.0,
            Some(total) => (self.fetched as f64 / total as f64).min(1.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match self.phase {
            Phase::Resolving => "Resolving player…",
            Phase::Fetching => "Fetching sources…",
            Phase::Done => "Done!",
        }
    }

    pub fn count_text(&self) -> String {
        match self.total {
            Some(total) => format!("{} / {}", self.fetched, total),
            None => "0 / ?".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_resolving_with_unknown_total() {
        let progress = StreamProgress::new();
        assert_eq!(progress.label(), "Resolving player…");
        assert_eq!(progress.count_text(), "0 / ?");
        assert_eq!(progress.ratio(), 0.0);
    }

    #[test]
    fn ratio_is_exact_fraction() {
        let mut progress = StreamProgress::new();
        progress.begin_fetching();
        for n in 1..=4 {
            progress.record(n, 4);
            assert_eq!(progress.ratio(), n as f64 / 4.0);
        }
        assert_eq!(progress.label(), "Done!");
        assert_eq!(progress.count_text(), "4 / 4");
    }

    #[test]
    fn zero_total_is_well_defined() {
        let mut progress = StreamProgress::new();
        progress.record(0, 0);
        assert_eq!(progress.ratio(), 1.0);
        assert_eq!(progress.phase, Phase::Done);
    }

    #[test]
    fn overshoot_is_clamped() {
        let mut progress = StreamProgress::new();
        progress.record(5, 3);
        assert_eq!(progress.ratio(), 1.0);
    }

    #[test]
    fn partial_progress_keeps_fetching_label() {
        let mut progress = StreamProgress::new();
        progress.record(1, 3);
        assert_eq!(progress.label(), "Fetching sources…");
        assert_eq!(progress.count_text(), "1 / 3");
    }
}
