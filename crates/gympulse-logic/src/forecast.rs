//! Hourly occupancy forecast.
//!
//! A forecast is 13 points: two historical hours, the live "Now" anchor,
//! and ten predicted hours. Predicted values follow a fixed daily curve
//! (morning rush, lunch rush, evening peak) with a little uniform noise.
//!
//! Randomness is injected so a seeded generator reproduces the same series:
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use gympulse_logic::forecast::generate_forecast;
//!
//! let a = generate_forecast(14, &mut StdRng::seed_from_u64(7));
//! let b = generate_forecast(14, &mut StdRng::seed_from_u64(7));
//! assert_eq!(a, b);
//! assert_eq!(a.len(), 13);
//! ```

use chrono::Timelike;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::NOW_LABEL;
use crate::occupancy::occupancy_percent;

/// Hours of history shown before the live anchor.
pub const HISTORICAL_HOURS: u32 = 2;

/// Hours predicted after the live anchor.
pub const PREDICTED_HOURS: u32 = 10;

/// Value the "Now" point starts with until live state overwrites it.
const NOW_PLACEHOLDER: f64 = 65.0;

/// Historical values are drawn from `HISTORY_BASE + [0, HISTORY_SPREAD)`.
const HISTORY_BASE: f64 = 45.0;
const HISTORY_SPREAD: f64 = 20.0;

/// Predicted values get uniform noise within +/- this many points.
const PREDICTION_NOISE: f64 = 5.0;

/// One hourly occupancy sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrowdDataPoint {
    /// Hour label such as `"9:00"`, or `"Now"` for the live anchor.
    pub time: String,
    /// Occupancy as a percentage of capacity, 0–100.
    pub occupancy_percentage: f64,
    /// `false` for historical and live points, `true` for forecast points.
    pub is_predicted: bool,
}

impl CrowdDataPoint {
    pub fn is_now(&self) -> bool {
        self.time == NOW_LABEL
    }
}

/// Label for an hour of the day, e.g. `hour_label(9) == "9:00"`.
pub fn hour_label(hour: u32) -> String {
    format!("{}:00", hour % 24)
}

/// Base occupancy percentage for an hour of the day, before noise.
pub fn hourly_baseline(hour: u32) -> f64 {
    match hour {
        6..=8 => 70.0,   // morning rush
        9..=11 => 50.0,  // late morning
        12..=13 => 65.0, // lunch rush
        17..=20 => 90.0, // evening peak
        h if h > 20 => 45.0,
        _ => 40.0,
    }
}

/// Generate a forecast anchored at `anchor_hour` (0–23, wraps otherwise).
///
/// Points are in chronological order. The call keeps no state: every call
/// yields the same structure, and the same values for the same `rng` state.
pub fn generate_forecast(anchor_hour: u32, rng: &mut impl Rng) -> Vec<CrowdDataPoint> {
    let anchor = anchor_hour % 24;
    let mut data = Vec::with_capacity((HISTORICAL_HOURS + 1 + PREDICTED_HOURS) as usize);

    for offset in (1..=HISTORICAL_HOURS).rev() {
        let hour = (anchor + 24 - offset) % 24;
        data.push(CrowdDataPoint {
            time: hour_label(hour),
            occupancy_percentage: HISTORY_BASE + rng.gen_range(0.0..HISTORY_SPREAD),
            is_predicted: false,
        });
    }

    data.push(CrowdDataPoint {
        time: NOW_LABEL.to_string(),
        occupancy_percentage: NOW_PLACEHOLDER,
        is_predicted: false,
    });

    for offset in 1..=PREDICTED_HOURS {
        let hour = (anchor + offset) % 24;
        let noise = rng.gen_range(-PREDICTION_NOISE..=PREDICTION_NOISE);
        data.push(CrowdDataPoint {
            time: hour_label(hour),
            occupancy_percentage: (hourly_baseline(hour) + noise).clamp(0.0, 100.0),
            is_predicted: true,
        });
    }

    data
}

/// Generate a forecast anchored at the current local wall-clock hour.
pub fn generate_forecast_now(rng: &mut impl Rng) -> Vec<CrowdDataPoint> {
    generate_forecast(chrono::Local::now().hour(), rng)
}

/// Rewrite the "Now" point to match the live member count.
///
/// Returns `false` if the forecast has no "Now" point. Only the first
/// "Now" point is touched; every other point is left as is.
pub fn update_now_point(forecast: &mut [CrowdDataPoint], live_members: u32, capacity: u32) -> bool {
    match forecast.iter_mut().find(|p| p.is_now()) {
        Some(point) => {
            point.occupancy_percentage = f64::from(occupancy_percent(live_members, capacity));
            true
        }
        None => false,
    }
}

/// Look up a point by its time label.
pub fn find_point<'a>(forecast: &'a [CrowdDataPoint], label: &str) -> Option<&'a CrowdDataPoint> {
    forecast.iter().find(|p| p.time == label)
}

/// Points a member can pick in the time selector: "Now" plus every
/// predicted hour, in order. Historical hours are not selectable.
pub fn time_selector_options(forecast: &[CrowdDataPoint]) -> Vec<&CrowdDataPoint> {
    forecast
        .iter()
        .filter(|p| p.is_now() || p.is_predicted)
        .collect()
}
