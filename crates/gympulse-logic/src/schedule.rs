//! Weekly workout plan.
//!
//! Each calendar day is in one of three states: empty, a planned workout,
//! or a rest day. The store holds at most one session per day; writing a
//! day that already has one replaces it outright.
//!
//! ```
//! use chrono::NaiveDate;
//! use gympulse_logic::schedule::{apply_schedule, DayState, ScheduleAction, ScheduleStore, WorkoutPlan};
//!
//! let day = NaiveDate::from_ymd_opt(2025, 10, 27).unwrap();
//! let store = apply_schedule(ScheduleStore::new(), day, ScheduleAction::Plan(WorkoutPlan::new("legs", 90, "18:00")));
//! let store = apply_schedule(store, day, ScheduleAction::Rest);
//! assert_eq!(store.day_state(day), DayState::RestDay);
//! assert_eq!(store.len(), 1);
//! ```

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::{focus_ids, DEFAULT_DURATION_MINUTES, NOW_LABEL};
use crate::focus::{default_workout_focus, WorkoutFocus};

/// Days shown in the week strip, starting today.
pub const WEEK_LENGTH: u64 = 7;

/// Days from today checked for the "upcoming" summary.
pub const UPCOMING_WINDOW: usize = 3;

/// First bookable hour and number of hourly slots after it.
pub const FIRST_SLOT_HOUR: u32 = 6;
pub const SLOT_COUNT: u32 = 16;

/// Start time offered for days other than today.
pub const DEFAULT_FUTURE_START: &str = "9:00";

/// What a day holds when it is not empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPlan {
    Workout {
        focus_id: String,
        duration_minutes: u32,
        time_label: String,
    },
    RestDay,
}

/// A stored plan for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSession {
    pub id: u64,
    pub date: NaiveDate,
    pub plan: DayPlan,
}

impl ScheduledSession {
    pub fn is_rest_day(&self) -> bool {
        matches!(self.plan, DayPlan::RestDay)
    }

    pub fn focus_id(&self) -> Option<&str> {
        match &self.plan {
            DayPlan::Workout { focus_id, .. } => Some(focus_id),
            DayPlan::RestDay => None,
        }
    }

    /// Key string for the day, e.g. `"Mon Oct 27 2025"`.
    pub fn day_key(&self) -> String {
        day_key(self.date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayState {
    Empty,
    PlannedWorkout,
    RestDay,
}

/// Workout details supplied by the planner form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub focus_id: String,
    pub duration_minutes: u32,
    /// `"Now"` or an hour label such as `"14:00"`.
    pub time_label: String,
}

impl WorkoutPlan {
    pub fn new(focus_id: &str, duration_minutes: u32, time_label: &str) -> Self {
        Self {
            focus_id: focus_id.to_string(),
            duration_minutes,
            time_label: time_label.to_string(),
        }
    }

    pub fn starts_now(&self) -> bool {
        self.time_label == NOW_LABEL
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleAction {
    Plan(WorkoutPlan),
    Rest,
    Delete,
}

/// In-memory day -> session map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleStore {
    sessions: BTreeMap<NaiveDate, ScheduledSession>,
    next_id: u64,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&ScheduledSession> {
        self.sessions.get(&date)
    }

    pub fn day_state(&self, date: NaiveDate) -> DayState {
        match self.sessions.get(&date) {
            None => DayState::Empty,
            Some(s) if s.is_rest_day() => DayState::RestDay,
            Some(_) => DayState::PlannedWorkout,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Sessions in date order.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledSession> {
        self.sessions.values()
    }

    fn write(&mut self, date: NaiveDate, plan: DayPlan) -> &ScheduledSession {
        self.next_id += 1;
        let session = ScheduledSession {
            id: self.next_id,
            date,
            plan,
        };
        self.sessions.insert(date, session);
        &self.sessions[&date]
    }

    /// Plan a workout, replacing whatever the day held.
    pub fn plan_workout(&mut self, date: NaiveDate, plan: WorkoutPlan) -> &ScheduledSession {
        self.write(
            date,
            DayPlan::Workout {
                focus_id: plan.focus_id,
                duration_minutes: plan.duration_minutes,
                time_label: plan.time_label,
            },
        )
    }

    /// Mark a day as rest, discarding any planned workout.
    pub fn mark_rest_day(&mut self, date: NaiveDate) -> &ScheduledSession {
        self.write(date, DayPlan::RestDay)
    }

    /// Clear a day. Clearing an empty day does nothing.
    pub fn delete(&mut self, date: NaiveDate) -> Option<ScheduledSession> {
        self.sessions.remove(&date)
    }

    pub fn apply(&mut self, date: NaiveDate, action: ScheduleAction) {
        match action {
            ScheduleAction::Plan(plan) => {
                self.plan_workout(date, plan);
            }
            ScheduleAction::Rest => {
                self.mark_rest_day(date);
            }
            ScheduleAction::Delete => {
                self.delete(date);
            }
        }
    }
}

/// Apply one action and hand the store back.
pub fn apply_schedule(mut store: ScheduleStore, date: NaiveDate, action: ScheduleAction) -> ScheduleStore {
    store.apply(date, action);
    store
}

/// Calendar-day key, e.g. `"Mon Oct 27 2025"`.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Today and the following six days.
pub fn week_days(today: NaiveDate) -> Vec<NaiveDate> {
    (0..WEEK_LENGTH)
        .filter_map(|i| today.checked_add_days(Days::new(i)))
        .collect()
}

/// Start times offered for `date`: "Now" first on today, then 6:00–21:00.
pub fn time_slots(date: NaiveDate, today: NaiveDate) -> Vec<String> {
    let mut slots = Vec::with_capacity(SLOT_COUNT as usize + 1);
    if date == today {
        slots.push(NOW_LABEL.to_string());
    }
    slots.extend((0..SLOT_COUNT).map(|i| format!("{}:00", FIRST_SLOT_HOUR + i)));
    slots
}

/// Replace a "Now" start time with the future-day default when `date` is
/// not today. Other labels pass through.
pub fn normalize_start_time(time_label: &str, date: NaiveDate, today: NaiveDate) -> String {
    if time_label == NOW_LABEL && date != today {
        DEFAULT_FUTURE_START.to_string()
    } else {
        time_label.to_string()
    }
}

/// Pre-filled planner form for `date`.
///
/// An existing workout is edited in place. An empty or rest day starts from
/// the first focus that filters equipment, whatever the dashboard has
/// selected.
pub fn plan_defaults(
    store: &ScheduleStore,
    date: NaiveDate,
    today: NaiveDate,
    options: &[WorkoutFocus],
) -> WorkoutPlan {
    if let Some(ScheduledSession {
        plan:
            DayPlan::Workout {
                focus_id,
                duration_minutes,
                time_label,
            },
        ..
    }) = store.get(date)
    {
        return WorkoutPlan::new(focus_id, *duration_minutes, time_label);
    }

    let focus_id = default_workout_focus(options).map_or(focus_ids::CARDIO, |f| f.id.as_str());
    let time_label = if date == today {
        NOW_LABEL
    } else {
        DEFAULT_FUTURE_START
    };
    WorkoutPlan::new(focus_id, DEFAULT_DURATION_MINUTES, time_label)
}

/// Planned workouts in the first few days of the week, rest days skipped.
pub fn upcoming(store: &ScheduleStore, today: NaiveDate) -> Vec<&ScheduledSession> {
    week_days(today)
        .into_iter()
        .take(UPCOMING_WINDOW)
        .filter_map(|d| store.get(d))
        .filter(|s| !s.is_rest_day())
        .collect()
}
