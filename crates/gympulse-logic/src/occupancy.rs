//! Occupancy percentages, crowd level tiers, and the prediction selector.

use serde::{Deserialize, Serialize};

use crate::constants::NOW_LABEL;
use crate::forecast::{find_point, CrowdDataPoint};

/// Crowd level shown on the occupancy widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrowdLevel {
    /// Below 50% of capacity.
    Low,
    /// 50% up to 75%.
    Moderate,
    /// 75% up to 90%.
    High,
    /// 90% and above.
    Crowded,
}

impl CrowdLevel {
    pub fn from_percentage(percent: u32) -> Self {
        if percent >= 90 {
            Self::Crowded
        } else if percent >= 75 {
            Self::High
        } else if percent >= 50 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Crowded => "Crowded",
        }
    }
}

/// Members as a rounded percentage of capacity. Zero capacity yields 0.
pub fn occupancy_percent(members: u32, capacity: u32) -> u32 {
    if capacity == 0 {
        return 0;
    }
    (f64::from(members) / f64::from(capacity) * 100.0).round() as u32
}

/// Load factor in percent driving the equipment simulation.
///
/// Unlike [`occupancy_percent`] this is not rounded.
pub fn load_percent(members: u32, capacity: u32) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    f64::from(members) / f64::from(capacity) * 100.0
}

/// Whether a time selection puts the view into predicted mode.
pub fn is_predicted_selection(selection: &str) -> bool {
    selection != NOW_LABEL
}

/// Resolve the member count to display for a selected time.
///
/// - `"Now"` passes the live count through untouched.
/// - A known hour label converts that point's percentage back to members.
/// - An unknown label (stale selection) falls back to the live count.
pub fn resolve_displayed_members(
    selection: &str,
    live_members: u32,
    forecast: &[CrowdDataPoint],
    capacity: u32,
) -> u32 {
    if !is_predicted_selection(selection) {
        return live_members;
    }
    match find_point(forecast, selection) {
        Some(point) => {
            (point.occupancy_percentage / 100.0 * f64::from(capacity))
                .round()
                .max(0.0) as u32
        }
        None => live_members,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(time: &str, pct: f64, predicted: bool) -> CrowdDataPoint {
        CrowdDataPoint {
            time: time.to_string(),
            occupancy_percentage: pct,
            is_predicted: predicted,
        }
    }

    #[test]
    fn test_now_passes_live_through() {
        let forecast = vec![point("Now", 3.0, false), point("9:00", 50.0, true)];
        assert_eq!(resolve_displayed_members("Now", 150, &forecast, 200), 150);
        assert_eq!(resolve_displayed_members("Now", 150, &[], 200), 150);
    }

    #[test]
    fn test_predicted_point_converts_to_members() {
        let forecast = vec![point("Now", 60.0, false), point("9:00", 50.0, true)];
        assert_eq!(resolve_displayed_members("9:00", 12, &forecast, 200), 100);
    }

    #[test]
    fn test_fractional_percentage_rounds() {
        let forecast = vec![point("18:00", 87.3, true)];
        // 0.873 * 200 = 174.6
        assert_eq!(resolve_displayed_members("18:00", 0, &forecast, 200), 175);
    }

    #[test]
    fn test_missing_label_falls_back_to_live() {
        let forecast = vec![point("9:00", 50.0, true)];
        assert_eq!(resolve_displayed_members("13:00", 77, &forecast, 200), 77);
    }

    #[test]
    fn test_occupancy_percent() {
        assert_eq!(occupancy_percent(124, 200), 62);
        assert_eq!(occupancy_percent(200, 200), 100);
        assert_eq!(occupancy_percent(1, 200), 1); // 0.5 rounds up
        assert_eq!(occupancy_percent(10, 0), 0);
    }

    #[test]
    fn test_load_percent() {
        assert_eq!(load_percent(50, 200), 25.0);
        assert_eq!(load_percent(5, 0), 0.0);
    }

    #[test]
    fn test_crowd_level_tiers() {
        assert_eq!(CrowdLevel::from_percentage(0), CrowdLevel::Low);
        assert_eq!(CrowdLevel::from_percentage(49), CrowdLevel::Low);
        assert_eq!(CrowdLevel::from_percentage(50), CrowdLevel::Moderate);
        assert_eq!(CrowdLevel::from_percentage(74), CrowdLevel::Moderate);
        assert_eq!(CrowdLevel::from_percentage(75), CrowdLevel::High);
        assert_eq!(CrowdLevel::from_percentage(89), CrowdLevel::High);
        assert_eq!(CrowdLevel::from_percentage(90), CrowdLevel::Crowded);
        assert_eq!(CrowdLevel::from_percentage(100), CrowdLevel::Crowded);
    }

    #[test]
    fn test_predicted_selection() {
        assert!(!is_predicted_selection("Now"));
        assert!(is_predicted_selection("14:00"));
    }
}
