use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Wall time spent in one pipeline stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Per-stage timings of one road, in execution order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn with_total(total_ms: f64) -> Self {
        Self {
            total_ms,
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    /// Records the time elapsed since `since` under `label`.
    pub fn push_since(&mut self, label: impl Into<String>, since: Instant) {
        self.push(label, elapsed_ms(since));
    }

    pub fn stage(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }
}

pub fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_keep_insertion_order() {
        let mut t = TimingBreakdown::with_total(3.0);
        t.push("classify", 1.0);
        t.push("scan", 2.0);
        let labels: Vec<_> = t.stages.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["classify", "scan"]);
        assert_eq!(t.stage("scan"), Some(2.0));
        assert_eq!(t.stage("overlap"), None);
    }
}
