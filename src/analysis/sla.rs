use crate::models::ticket::Priority;
use serde::{Deserialize, Serialize};

/// Maximum allowed resolution time per priority, in hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlaPolicy {
    pub critical_hrs: u32,
    pub high_hrs: u32,
    pub medium_hrs: u32,
    pub low_hrs: u32,
    /// Used when the priority is missing or not one of the four known labels
    pub fallback_hrs: u32,
}

impl Default for SlaPolicy {
    fn default() -> Self {
        Self {
            critical_hrs: 4,
            high_hrs: 24,
            medium_hrs: 48,
            low_hrs: 72,
            fallback_hrs: 72,
        }
    }
}

impl SlaPolicy {
    pub fn threshold_for(&self, priority: Option<&str>) -> u32 {
        match priority.and_then(Priority::parse) {
            Some(Priority::Critical) => self.critical_hrs,
            Some(Priority::High) => self.high_hrs,
            Some(Priority::Medium) => self.medium_hrs,
            Some(Priority::Low) => self.low_hrs,
            None => self.fallback_hrs,
        }
    }
}

/// Breach only when strictly over the threshold
pub fn is_breach(resolution_hrs: i64, threshold_hrs: u32) -> bool {
    resolution_hrs > i64::from(threshold_hrs)
}
