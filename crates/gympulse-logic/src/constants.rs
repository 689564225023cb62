//! Dashboard constants — capacity, sentinel labels, seed ids, durations.
//!
//! Plain constants with no runtime dependency. The runtime crate, the
//! harness, and the tests all read from here.

/// Maximum number of members the gym admits at once.
pub const MAX_CAPACITY: u32 = 200;

/// Live member count at startup before any drift.
pub const INITIAL_MEMBERS: u32 = 124;

/// Sentinel time label for the live anchor point.
pub const NOW_LABEL: &str = "Now";

/// Default drift tick period in milliseconds.
pub const DEFAULT_TICK_MS: u64 = 5_000;

/// Step used by the admin +/- occupancy buttons.
pub const ADMIN_OCCUPANCY_STEP: i32 = 5;

pub mod equipment_ids {
    pub const TREADMILLS: &str = "treadmills";
    pub const BENCHES: &str = "benches";
    pub const SQUAT_RACKS: &str = "squat_racks";
    pub const FREE_WEIGHTS: &str = "free_weights";
    pub const CABLE_MACHINES: &str = "cable_machines";
}

pub mod focus_ids {
    /// Overview focus: every equipment category is relevant, no insight.
    pub const ALL: &str = "all";
    pub const CARDIO: &str = "cardio";
    pub const LEGS: &str = "legs";
    pub const PUSH: &str = "push";
    pub const PULL: &str = "pull";
}

/// Selectable session lengths as (label, minutes).
pub const DURATION_OPTIONS: [(&str, u32); 5] = [
    ("1 Hour", 60),
    ("1.5 Hours", 90),
    ("2 Hours", 120),
    ("2.5 Hours", 150),
    ("3 Hours", 180),
];

/// Default session length in minutes.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Label for a duration in minutes, if it is one of the offered options.
pub fn duration_label(minutes: u32) -> Option<&'static str> {
    DURATION_OPTIONS
        .iter()
        .find(|(_, m)| *m == minutes)
        .map(|(label, _)| *label)
}

/// A static "best time to visit" hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recommendation {
    pub time: &'static str,
    pub reason: &'static str,
}

pub const RECOMMENDATIONS: [Recommendation; 2] = [
    Recommendation {
        time: "14:00 - 15:30",
        reason: "Lowest predicted crowd before evening rush",
    },
    Recommendation {
        time: "20:30 - 22:00",
        reason: "Late evening quiet period",
    },
];
