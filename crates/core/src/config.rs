use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and probability knobs of a reading session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Pause between the last manual draw and the reveal step.
    pub manual_advance_ms: u64,
    /// Pause between an auto-draw and the reveal step.
    pub auto_advance_ms: u64,
    /// Gap between cards when revealing all of them.
    pub reveal_interval_ms: u64,
    /// A draw is reversed when the orientation roll exceeds this.
    pub reversed_threshold: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            manual_advance_ms: 800,
            auto_advance_ms: 500,
            reveal_interval_ms: 300,
            reversed_threshold: 0.8,
        }
    }
}

impl SessionConfig {
    pub fn manual_advance_delay(&self) -> Duration {
        Duration::from_millis(self.manual_advance_ms)
    }

    pub fn auto_advance_delay(&self) -> Duration {
        Duration::from_millis(self.auto_advance_ms)
    }

    pub fn reveal_interval(&self) -> Duration {
        Duration::from_millis(self.reveal_interval_ms)
    }
}
