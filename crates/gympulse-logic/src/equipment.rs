//! Equipment categories and load simulation.
//!
//! Given an occupancy load, each category gets a number of busy units
//! scaled by a per-category popularity factor, and a usage tier derived
//! from the busy share. A manually set [`EquipmentStatus::Maintenance`]
//! is sticky: simulation never clears it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::equipment_ids;

/// Usage tier of an equipment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentStatus {
    #[serde(rename = "Low Usage")]
    LowUsage,
    #[serde(rename = "Moderate Usage")]
    ModerateUsage,
    #[serde(rename = "High Usage")]
    HighUsage,
    /// Every unit taken, expect a wait.
    #[serde(rename = "Crowded")]
    Crowded,
    /// Manual override set by an admin.
    #[serde(rename = "Maintenance")]
    Maintenance,
}

impl EquipmentStatus {
    pub const ALL: [EquipmentStatus; 5] = [
        Self::LowUsage,
        Self::ModerateUsage,
        Self::HighUsage,
        Self::Crowded,
        Self::Maintenance,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::LowUsage => "Low Usage",
            Self::ModerateUsage => "Moderate Usage",
            Self::HighUsage => "High Usage",
            Self::Crowded => "Crowded",
            Self::Maintenance => "Maintenance",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Usage tier for a busy share in percent. Highest threshold wins.
    pub fn from_usage(usage_percent: f64) -> Self {
        if usage_percent >= 90.0 {
            Self::Crowded
        } else if usage_percent >= 70.0 {
            Self::HighUsage
        } else if usage_percent >= 40.0 {
            Self::ModerateUsage
        } else {
            Self::LowUsage
        }
    }
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One kind of equipment and how many units are free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentCategory {
    pub id: String,
    pub name: String,
    pub total_units: u32,
    /// Always `<= total_units`.
    pub available_units: u32,
    pub status: EquipmentStatus,
}

impl EquipmentCategory {
    pub fn new(
        id: &str,
        name: &str,
        total_units: u32,
        available_units: u32,
        status: EquipmentStatus,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            total_units,
            available_units: available_units.min(total_units),
            status,
        }
    }
}

/// Busy/available split for one category at a given load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitLoad {
    pub busy_units: u32,
    pub available_units: u32,
    pub usage_percent: f64,
}

/// How much busier than average a category runs.
pub fn popularity(id: &str) -> f64 {
    match id {
        equipment_ids::SQUAT_RACKS | equipment_ids::BENCHES => 1.3,
        equipment_ids::TREADMILLS => 0.9,
        _ => 1.0,
    }
}

/// Busy units for `total_units` at `load_percent` with a popularity factor.
pub fn compute_unit_load(total_units: u32, load_percent: f64, popularity: f64) -> UnitLoad {
    let wanted = (f64::from(total_units) * (load_percent / 100.0) * popularity)
        .round()
        .max(0.0);
    let busy_units = (wanted as u32).min(total_units);
    let available_units = total_units.saturating_sub(busy_units);
    let usage_percent = if total_units == 0 {
        0.0
    } else {
        f64::from(busy_units) / f64::from(total_units) * 100.0
    };
    UnitLoad {
        busy_units,
        available_units,
        usage_percent,
    }
}

/// Derive equipment availability for a load percentage.
///
/// Pure: the same inputs always produce the same output. Categories keep
/// their order, id, name, and totals; `available_units` and `status` are
/// recomputed, except that a `Maintenance` status is carried over.
pub fn simulate_equipment(base: &[EquipmentCategory], load_percent: f64) -> Vec<EquipmentCategory> {
    base.iter()
        .map(|item| {
            let load = compute_unit_load(item.total_units, load_percent, popularity(&item.id));
            let status = if item.status == EquipmentStatus::Maintenance {
                EquipmentStatus::Maintenance
            } else {
                EquipmentStatus::from_usage(load.usage_percent)
            };
            EquipmentCategory {
                available_units: load.available_units,
                status,
                ..item.clone()
            }
        })
        .collect()
}

/// Set the status of the category with `id`. Returns `false` if unknown.
pub fn set_status(equipment: &mut [EquipmentCategory], id: &str, status: EquipmentStatus) -> bool {
    match equipment.iter_mut().find(|e| e.id == id) {
        Some(item) => {
            item.status = status;
            true
        }
        None => false,
    }
}

/// Equipment floor at opening.
pub fn initial_equipment() -> Vec<EquipmentCategory> {
    use EquipmentStatus::*;
    vec![
        EquipmentCategory::new(equipment_ids::TREADMILLS, "Treadmills", 20, 15, LowUsage),
        EquipmentCategory::new(equipment_ids::BENCHES, "Benches", 10, 2, HighUsage),
        EquipmentCategory::new(equipment_ids::SQUAT_RACKS, "Squat Racks", 6, 0, Crowded),
        EquipmentCategory::new(equipment_ids::FREE_WEIGHTS, "Free Weights", 50, 30, ModerateUsage),
        EquipmentCategory::new(equipment_ids::CABLE_MACHINES, "Cable Machines", 8, 4, ModerateUsage),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(list: &'a [EquipmentCategory], id: &str) -> &'a EquipmentCategory {
        list.iter().find(|e| e.id == id).unwrap()
    }

    #[test]
    fn test_squat_racks_at_ninety_percent() {
        let base = vec![EquipmentCategory::new(
            "squat_racks",
            "Squat Racks",
            6,
            0,
            EquipmentStatus::Crowded,
        )];
        let load = compute_unit_load(6, 90.0, popularity("squat_racks"));
        assert_eq!(load.busy_units, 6); // round(7.02) capped at total
        let out = simulate_equipment(&base, 90.0);
        assert_eq!(out[0].available_units, 0);
        assert_eq!(out[0].status, EquipmentStatus::Crowded);
    }

    #[test]
    fn test_maintenance_is_sticky() {
        let mut base = initial_equipment();
        assert!(set_status(&mut base, "benches", EquipmentStatus::Maintenance));
        for p in [0.0, 25.0, 50.0, 90.0, 100.0] {
            let out = simulate_equipment(&base, p);
            assert_eq!(find(&out, "benches").status, EquipmentStatus::Maintenance);
        }
    }

    #[test]
    fn test_simulation_is_deterministic() {
        let base = initial_equipment();
        let a = simulate_equipment(&base, 63.5);
        let b = simulate_equipment(&base, 63.5);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_zero_load_is_all_free() {
        let out = simulate_equipment(&initial_equipment(), 0.0);
        for item in &out {
            assert_eq!(item.available_units, item.total_units);
            assert_eq!(item.status, EquipmentStatus::LowUsage);
        }
    }

    #[test]
    fn test_popularity_shapes_usage() {
        let out = simulate_equipment(&initial_equipment(), 50.0);
        // treadmills: round(20 * 0.5 * 0.9) = 9 busy -> 45% -> moderate
        let t = find(&out, "treadmills");
        assert_eq!(t.available_units, 11);
        assert_eq!(t.status, EquipmentStatus::ModerateUsage);
        // benches: round(10 * 0.5 * 1.3) = round(6.5) = 7 busy -> 70% -> high
        let b = find(&out, "benches");
        assert_eq!(b.available_units, 3);
        assert_eq!(b.status, EquipmentStatus::HighUsage);
        // free weights: 25 busy -> 50%
        let f = find(&out, "free_weights");
        assert_eq!(f.available_units, 25);
        assert_eq!(f.status, EquipmentStatus::ModerateUsage);
    }

    #[test]
    fn test_zero_total_units() {
        let base = vec![EquipmentCategory::new("rowers", "Rowers", 0, 0, EquipmentStatus::LowUsage)];
        let load = compute_unit_load(0, 100.0, 1.0);
        assert_eq!(load.usage_percent, 0.0);
        let out = simulate_equipment(&base, 100.0);
        assert_eq!(out[0].available_units, 0);
        assert_eq!(out[0].status, EquipmentStatus::LowUsage);
    }

    #[test]
    fn test_available_never_exceeds_total() {
        for p in 0..=100 {
            for item in simulate_equipment(&initial_equipment(), f64::from(p)) {
                assert!(item.available_units <= item.total_units);
            }
        }
    }

    #[test]
    fn test_usage_tiers() {
        assert_eq!(EquipmentStatus::from_usage(0.0), EquipmentStatus::LowUsage);
        assert_eq!(EquipmentStatus::from_usage(39.9), EquipmentStatus::LowUsage);
        assert_eq!(EquipmentStatus::from_usage(40.0), EquipmentStatus::ModerateUsage);
        assert_eq!(EquipmentStatus::from_usage(70.0), EquipmentStatus::HighUsage);
        assert_eq!(EquipmentStatus::from_usage(90.0), EquipmentStatus::Crowded);
    }

    #[test]
    fn test_status_labels_round_trip_through_serde() {
        let json = serde_json::to_string(&EquipmentStatus::HighUsage).unwrap();
        assert_eq!(json, "\"High Usage\"");
        assert_eq!(EquipmentStatus::from_label("Maintenance"), Some(EquipmentStatus::Maintenance));
        assert_eq!(EquipmentStatus::from_label("Closed"), None);
    }

    #[test]
    fn test_set_status_unknown_id() {
        let mut base = initial_equipment();
        assert!(!set_status(&mut base, "rowers", EquipmentStatus::Maintenance));
        assert_eq!(base, initial_equipment());
    }

    #[test]
    fn test_new_clamps_available() {
        let e = EquipmentCategory::new("x", "X", 3, 10, EquipmentStatus::LowUsage);
        assert_eq!(e.available_units, 3);
    }
}
