//! Crowd alert preference.
//!
//! Purely a member preference: nothing is sent anywhere. The threshold is
//! the occupancy percentage below which the member wants to hear about it.

use serde::{Deserialize, Serialize};

pub const MIN_THRESHOLD: u8 = 10;
pub const MAX_THRESHOLD: u8 = 90;
pub const DEFAULT_THRESHOLD: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSetting {
    pub enabled: bool,
    /// Always within `MIN_THRESHOLD..=MAX_THRESHOLD`.
    pub threshold: u8,
}

impl Default for NotificationSetting {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl NotificationSetting {
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Set the threshold, saturating at the slider bounds.
    pub fn set_threshold(&mut self, threshold: u8) {
        self.threshold = threshold.clamp(MIN_THRESHOLD, MAX_THRESHOLD);
    }

    /// Whether an occupancy percentage is quiet enough to alert on.
    pub fn should_alert(&self, occupancy_percent: u32) -> bool {
        self.enabled && occupancy_percent < u32::from(self.threshold)
    }
}
