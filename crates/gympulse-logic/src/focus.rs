//! Workout focus options and the availability insight shown for them.
//!
//! A focus narrows the equipment list to the categories a workout needs.
//! The insight then summarises how free those categories are and calls
//! out the first bottleneck, i.e. the first category whose status is
//! [`EquipmentStatus::Crowded`].

use serde::{Deserialize, Serialize};

use crate::constants::{equipment_ids, focus_ids};
use crate::equipment::{EquipmentCategory, EquipmentStatus};

/// Below this availability rate (percent) a focus gets a warning.
pub const LOW_AVAILABILITY_RATE: f64 = 20.0;

/// Fallback label for an unknown focus id.
const UNKNOWN_FOCUS_LABEL: &str = "Workout";

/// A named workout category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutFocus {
    pub id: String,
    pub label: String,
    /// Relevant equipment ids. Empty means every category.
    pub equipment_ids: Vec<String>,
}

impl WorkoutFocus {
    pub fn new(id: &str, label: &str, equipment_ids: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            equipment_ids: equipment_ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn covers_everything(&self) -> bool {
        self.equipment_ids.is_empty()
    }

    pub fn is_relevant(&self, equipment_id: &str) -> bool {
        self.covers_everything() || self.equipment_ids.iter().any(|id| id == equipment_id)
    }
}

/// The focus options offered to members, overview first.
pub fn workout_focus_options() -> Vec<WorkoutFocus> {
    use equipment_ids::*;
    vec![
        WorkoutFocus::new(focus_ids::ALL, "Overview", &[]),
        WorkoutFocus::new(focus_ids::CARDIO, "Cardio", &[TREADMILLS, CABLE_MACHINES]),
        WorkoutFocus::new(
            focus_ids::LEGS,
            "Leg Day",
            &[SQUAT_RACKS, FREE_WEIGHTS, CABLE_MACHINES],
        ),
        WorkoutFocus::new(
            focus_ids::PUSH,
            "Push (Chest/Tri)",
            &[BENCHES, FREE_WEIGHTS, CABLE_MACHINES],
        ),
        WorkoutFocus::new(
            focus_ids::PULL,
            "Pull (Back/Bi)",
            &[FREE_WEIGHTS, CABLE_MACHINES, TREADMILLS],
        ),
    ]
}

pub fn find_focus<'a>(options: &'a [WorkoutFocus], id: &str) -> Option<&'a WorkoutFocus> {
    options.iter().find(|f| f.id == id)
}

/// Display label for a focus id, `"Workout"` when unknown.
pub fn focus_label<'a>(options: &'a [WorkoutFocus], id: &str) -> &'a str {
    find_focus(options, id).map_or(UNKNOWN_FOCUS_LABEL, |f| f.label.as_str())
}

/// First focus that actually filters equipment; the planner default when
/// the member is on the overview.
pub fn default_workout_focus(options: &[WorkoutFocus]) -> Option<&WorkoutFocus> {
    options.iter().find(|f| !f.covers_everything())
}

/// Equipment relevant to `focus`, in equipment order.
///
/// An unknown focus (`None`) or one with no equipment ids keeps everything.
pub fn filter_for_focus(
    equipment: &[EquipmentCategory],
    focus: Option<&WorkoutFocus>,
) -> Vec<EquipmentCategory> {
    match focus {
        Some(f) if !f.covers_everything() => equipment
            .iter()
            .filter(|e| f.is_relevant(&e.id))
            .cloned()
            .collect(),
        _ => equipment.to_vec(),
    }
}

/// Share of units free across `equipment`, in percent. 0 when empty.
pub fn availability_rate(equipment: &[EquipmentCategory]) -> f64 {
    let total: u64 = equipment.iter().map(|e| u64::from(e.total_units)).sum();
    if total == 0 {
        return 0.0;
    }
    let available: u64 = equipment.iter().map(|e| u64::from(e.available_units)).sum();
    available as f64 / total as f64 * 100.0
}

/// Categories whose status is `Crowded`, in order.
pub fn bottlenecks(equipment: &[EquipmentCategory]) -> Vec<&EquipmentCategory> {
    equipment
        .iter()
        .filter(|e| e.status == EquipmentStatus::Crowded)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightKind {
    Warning,
    Good,
}

/// Message shown under the focus picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusInsight {
    pub kind: InsightKind,
    pub message: String,
    pub subtext: String,
    /// Availability rate the insight was computed from, in percent.
    pub availability_rate: f64,
}

/// Evaluate the insight for equipment already filtered to `focus_id`.
///
/// The overview focus gets no insight. A bottleneck or an availability
/// rate under 20% gives a warning; the bottleneck wording wins when both
/// hold. Otherwise the insight reports the rounded availability rate.
pub fn evaluate_focus_insight(
    filtered: &[EquipmentCategory],
    focus_id: &str,
    is_predicted: bool,
) -> Option<FocusInsight> {
    if focus_id == focus_ids::ALL {
        return None;
    }

    let rate = availability_rate(filtered);
    let crowded = bottlenecks(filtered);

    if rate < LOW_AVAILABILITY_RATE || !crowded.is_empty() {
        let message = match crowded.first() {
            Some(item) if is_predicted => format!("{} are predicted to be crowded.", item.name),
            Some(item) => format!("{} are currently crowded.", item.name),
            None => "High usage on required machines.".to_string(),
        };
        return Some(FocusInsight {
            kind: InsightKind::Warning,
            message,
            subtext: "Consider an alternative workout or prepare to wait.".to_string(),
            availability_rate: rate,
        });
    }

    let (message, subtext) = if is_predicted {
        (
            "Good availability predicted for this workout.".to_string(),
            format!(
                "{}% of relevant equipment is expected to be free.",
                rate.round()
            ),
        )
    } else {
        (
            "Good availability for this workout.".to_string(),
            format!("{}% of relevant equipment is free.", rate.round()),
        )
    };
    Some(FocusInsight {
        kind: InsightKind::Good,
        message,
        subtext,
        availability_rate: rate,
    })
}
