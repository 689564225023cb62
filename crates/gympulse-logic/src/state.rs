//! Explicit dashboard state.
//!
//! [`DashboardState`] owns every mutable input of the dashboard: the live
//! member count, the base equipment list, the forecast, the member's
//! selections, the check-in session, and the weekly plan. Derived values
//! (displayed members, simulated equipment, focus insight) are recomputed
//! from scratch on every read, so they can never go stale.
//!
//! There is no global instance; the owner (runtime engine, harness, test)
//! holds one and passes it around.

use chrono::{NaiveDate, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{focus_ids, INITIAL_MEMBERS, MAX_CAPACITY, NOW_LABEL};
use crate::drift::{advance_live_count, apply_delta};
use crate::equipment::{initial_equipment, set_status, simulate_equipment, EquipmentCategory, EquipmentStatus};
use crate::focus::{
    evaluate_focus_insight, filter_for_focus, find_focus, workout_focus_options, FocusInsight,
    WorkoutFocus,
};
use crate::forecast::{generate_forecast_now, time_selector_options, update_now_point, CrowdDataPoint};
use crate::notification::NotificationSetting;
use crate::occupancy::{
    is_predicted_selection, load_percent, occupancy_percent, resolve_displayed_members, CrowdLevel,
};
use crate::schedule::{normalize_start_time, ScheduleStore, WorkoutPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Member,
    Admin,
}

/// The member's active gym visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInSession {
    pub focus_id: String,
    pub duration_minutes: u32,
    pub started_at: NaiveDateTime,
    /// Whether check-in raised the live count. False when the gym was
    /// already at capacity, so check-out has nothing to give back.
    pub counted: bool,
}

/// Result of submitting the planner form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    /// "Now" on today: the member was checked in, nothing was stored.
    CheckedIn,
    /// A session was written for the day; carries its id.
    Scheduled(u64),
    /// Unknown focus id; nothing changed.
    Rejected,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub view: View,
    pub capacity: u32,
    pub live_members: u32,
    pub displayed_members: u32,
    pub occupancy_percent: u32,
    pub crowd_level: CrowdLevel,
    pub is_predicted: bool,
    pub selected_time: String,
    pub selected_focus: String,
    pub is_checked_in: bool,
    pub displayed_equipment: Vec<EquipmentCategory>,
    pub relevant_equipment: Vec<EquipmentCategory>,
    pub insight: Option<FocusInsight>,
    pub forecast: Vec<CrowdDataPoint>,
    pub notification: NotificationSetting,
    pub drift_ticks: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardState {
    view: View,
    capacity: u32,
    live_members: u32,
    equipment: Vec<EquipmentCategory>,
    focus_options: Vec<WorkoutFocus>,
    forecast: Vec<CrowdDataPoint>,
    selected_focus: String,
    selected_time: String,
    session: Option<CheckInSession>,
    notification: NotificationSetting,
    schedule: ScheduleStore,
    drift_ticks: u64,
}

impl DashboardState {
    /// Build a state from explicit inputs. The live count is clamped to
    /// capacity and the "Now" point is synced to it immediately.
    pub fn new(
        capacity: u32,
        initial_members: u32,
        equipment: Vec<EquipmentCategory>,
        focus_options: Vec<WorkoutFocus>,
        forecast: Vec<CrowdDataPoint>,
    ) -> Self {
        let mut state = Self {
            view: View::Member,
            capacity,
            live_members: initial_members.min(capacity),
            equipment,
            focus_options,
            forecast,
            selected_focus: focus_ids::ALL.to_string(),
            selected_time: NOW_LABEL.to_string(),
            session: None,
            notification: NotificationSetting::default(),
            schedule: ScheduleStore::new(),
            drift_ticks: 0,
        };
        state.sync_now_point();
        state
    }

    /// Opening-day state: seed equipment and focus tables, a fresh forecast
    /// anchored at the current local hour.
    pub fn seeded(rng: &mut impl Rng) -> Self {
        Self::new(
            MAX_CAPACITY,
            INITIAL_MEMBERS,
            initial_equipment(),
            workout_focus_options(),
            generate_forecast_now(rng),
        )
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn view(&self) -> View {
        self.view
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn live_members(&self) -> u32 {
        self.live_members
    }

    pub fn equipment(&self) -> &[EquipmentCategory] {
        &self.equipment
    }

    pub fn focus_options(&self) -> &[WorkoutFocus] {
        &self.focus_options
    }

    pub fn forecast(&self) -> &[CrowdDataPoint] {
        &self.forecast
    }

    pub fn selected_focus(&self) -> &str {
        &self.selected_focus
    }

    pub fn selected_time(&self) -> &str {
        &self.selected_time
    }

    pub fn session(&self) -> Option<&CheckInSession> {
        self.session.as_ref()
    }

    pub fn is_checked_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn notification(&self) -> NotificationSetting {
        self.notification
    }

    pub fn schedule(&self) -> &ScheduleStore {
        &self.schedule
    }

    pub fn drift_ticks(&self) -> u64 {
        self.drift_ticks
    }

    // ── Live count ─────────────────────────────────────────────────────

    fn sync_now_point(&mut self) {
        update_now_point(&mut self.forecast, self.live_members, self.capacity);
    }

    /// Every member-count write goes through here so the "Now" point is
    /// updated in the same step.
    fn set_live_members(&mut self, members: u32) {
        self.live_members = members.min(self.capacity);
        self.sync_now_point();
    }

    /// One drift step. Returns the new live count.
    pub fn tick_drift(&mut self, rng: &mut impl Rng) -> u32 {
        let next = advance_live_count(self.live_members, self.capacity, rng);
        self.set_live_members(next);
        self.drift_ticks += 1;
        self.live_members
    }

    // ── Derived views ──────────────────────────────────────────────────

    pub fn is_predicted(&self) -> bool {
        is_predicted_selection(&self.selected_time)
    }

    pub fn displayed_members(&self) -> u32 {
        resolve_displayed_members(
            &self.selected_time,
            self.live_members,
            &self.forecast,
            self.capacity,
        )
    }

    /// Base list when live; simulated from the base list when predicted.
    pub fn displayed_equipment(&self) -> Vec<EquipmentCategory> {
        if !self.is_predicted() {
            return self.equipment.clone();
        }
        let load = load_percent(self.displayed_members(), self.capacity);
        simulate_equipment(&self.equipment, load)
    }

    pub fn relevant_equipment(&self) -> Vec<EquipmentCategory> {
        let focus = find_focus(&self.focus_options, &self.selected_focus);
        filter_for_focus(&self.displayed_equipment(), focus)
    }

    pub fn focus_insight(&self) -> Option<FocusInsight> {
        evaluate_focus_insight(
            &self.relevant_equipment(),
            &self.selected_focus,
            self.is_predicted(),
        )
    }

    /// Labels the time selector offers right now.
    pub fn selectable_times(&self) -> Vec<String> {
        time_selector_options(&self.forecast)
            .into_iter()
            .map(|p| p.time.clone())
            .collect()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let displayed_members = self.displayed_members();
        let occupancy = occupancy_percent(displayed_members, self.capacity);
        let displayed_equipment = self.displayed_equipment();
        let focus = find_focus(&self.focus_options, &self.selected_focus);
        let relevant_equipment = filter_for_focus(&displayed_equipment, focus);
        let insight =
            evaluate_focus_insight(&relevant_equipment, &self.selected_focus, self.is_predicted());
        DashboardSnapshot {
            view: self.view,
            capacity: self.capacity,
            live_members: self.live_members,
            displayed_members,
            occupancy_percent: occupancy,
            crowd_level: CrowdLevel::from_percentage(occupancy),
            is_predicted: self.is_predicted(),
            selected_time: self.selected_time.clone(),
            selected_focus: self.selected_focus.clone(),
            is_checked_in: self.is_checked_in(),
            displayed_equipment,
            relevant_equipment,
            insight,
            forecast: self.forecast.clone(),
            notification: self.notification,
            drift_ticks: self.drift_ticks,
        }
    }

    // ── Member selections ──────────────────────────────────────────────

    /// Select "Now" or one of the offered forecast hours.
    ///
    /// Historical hours and unknown labels are rejected and leave the
    /// current selection in place.
    pub fn select_time(&mut self, label: &str) -> bool {
        let offered = time_selector_options(&self.forecast)
            .iter()
            .any(|p| p.time == label);
        if label != NOW_LABEL && !offered {
            return false;
        }
        self.selected_time = label.to_string();
        true
    }

    /// Select a known workout focus.
    pub fn select_focus(&mut self, focus_id: &str) -> bool {
        if find_focus(&self.focus_options, focus_id).is_none() {
            return false;
        }
        self.selected_focus = focus_id.to_string();
        true
    }

    /// Switch views. Entering admin always drops back to live data, so the
    /// member view also comes back live.
    pub fn set_view(&mut self, view: View) {
        if view == View::Admin && self.view == View::Member {
            self.selected_time = NOW_LABEL.to_string();
        }
        self.view = view;
    }

    pub fn toggle_view(&mut self) -> View {
        let next = match self.view {
            View::Member => View::Admin,
            View::Admin => View::Member,
        };
        self.set_view(next);
        next
    }

    // ── Check-in ───────────────────────────────────────────────────────

    /// Check the member in: count goes up by one (saturating), focus is set,
    /// and the view returns to live.
    ///
    /// Checking in again while checked in only replaces the session; the
    /// member is not counted twice. An unknown focus is rejected and leaves
    /// everything untouched.
    pub fn check_in(&mut self, focus_id: &str, duration_minutes: u32, now: NaiveDateTime) -> bool {
        if find_focus(&self.focus_options, focus_id).is_none() {
            return false;
        }
        let counted = match &self.session {
            Some(existing) => existing.counted,
            None => {
                let before = self.live_members;
                self.set_live_members(apply_delta(before, 1, self.capacity));
                self.live_members > before
            }
        };
        self.session = Some(CheckInSession {
            focus_id: focus_id.to_string(),
            duration_minutes,
            started_at: now,
            counted,
        });
        self.selected_focus = focus_id.to_string();
        self.selected_time = NOW_LABEL.to_string();
        true
    }

    /// Check the member out. Does nothing when not checked in.
    pub fn check_out(&mut self) -> bool {
        let session = match self.session.take() {
            Some(session) => session,
            None => return false,
        };
        if session.counted {
            self.set_live_members(apply_delta(self.live_members, -1, self.capacity));
        }
        self.selected_focus = focus_ids::ALL.to_string();
        true
    }

    // ── Weekly plan ────────────────────────────────────────────────────

    /// Submit the planner form for `date`.
    ///
    /// "Now" on today checks the member in instead of storing anything.
    /// "Now" on another day is stored with the future-day default start.
    /// An unknown focus is rejected before anything changes.
    pub fn plan_day(
        &mut self,
        date: NaiveDate,
        now: NaiveDateTime,
        plan: WorkoutPlan,
    ) -> PlanOutcome {
        if find_focus(&self.focus_options, &plan.focus_id).is_none() {
            return PlanOutcome::Rejected;
        }
        let today = now.date();
        if plan.starts_now() && date == today {
            self.check_in(&plan.focus_id, plan.duration_minutes, now);
            return PlanOutcome::CheckedIn;
        }
        let plan = WorkoutPlan {
            time_label: normalize_start_time(&plan.time_label, date, today),
            ..plan
        };
        PlanOutcome::Scheduled(self.schedule.plan_workout(date, plan).id)
    }

    pub fn mark_rest_day(&mut self, date: NaiveDate) {
        self.schedule.mark_rest_day(date);
    }

    pub fn delete_day(&mut self, date: NaiveDate) -> bool {
        self.schedule.delete(date).is_some()
    }

    // ── Admin overrides ────────────────────────────────────────────────

    /// Set the live count directly, clamped to capacity.
    pub fn admin_set_occupancy(&mut self, members: u32) -> u32 {
        self.set_live_members(members);
        self.live_members
    }

    /// Nudge the live count by `delta`, saturating at both ends.
    pub fn admin_step_occupancy(&mut self, delta: i32) -> u32 {
        self.set_live_members(apply_delta(self.live_members, delta, self.capacity));
        self.live_members
    }

    /// Write a status straight onto the base equipment list. The live view
    /// shows it as is; predicted views recompute from it, keeping only
    /// `Maintenance`.
    pub fn admin_set_equipment_status(&mut self, id: &str, status: EquipmentStatus) -> bool {
        set_status(&mut self.equipment, id, status)
    }

    // ── Notification preference ────────────────────────────────────────

    pub fn toggle_notification(&mut self) -> bool {
        self.notification.toggle();
        self.notification.enabled
    }

    pub fn set_notification_threshold(&mut self, threshold: u8) -> u8 {
        self.notification.set_threshold(threshold);
        self.notification.threshold
    }
}
