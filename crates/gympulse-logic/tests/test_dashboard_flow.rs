//! Integration tests for the dashboard pipeline.
//!
//! Exercises: forecast → drift → prediction selector → equipment
//! simulation → focus insight, plus the check-in and weekly plan paths.
//!
//! All tests are pure logic — no runtime, no timers.

use chrono::{NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;

use gympulse_logic::constants::{INITIAL_MEMBERS, MAX_CAPACITY};
use gympulse_logic::drift::advance_live_count;
use gympulse_logic::equipment::{
    initial_equipment, simulate_equipment, EquipmentCategory, EquipmentStatus,
};
use gympulse_logic::focus::{
    evaluate_focus_insight, filter_for_focus, find_focus, workout_focus_options, InsightKind,
};
use gympulse_logic::forecast::{generate_forecast, update_now_point, CrowdDataPoint};
use gympulse_logic::occupancy::{load_percent, resolve_displayed_members};
use gympulse_logic::schedule::{apply_schedule, DayState, ScheduleAction, ScheduleStore, WorkoutPlan};
use gympulse_logic::state::{DashboardState, PlanOutcome, View};

// ── Helpers ────────────────────────────────────────────────────────────

fn seeded_state(seed: u64, anchor_hour: u32) -> DashboardState {
    let mut rng = StdRng::seed_from_u64(seed);
    DashboardState::new(
        MAX_CAPACITY,
        INITIAL_MEMBERS,
        initial_equipment(),
        workout_focus_options(),
        generate_forecast(anchor_hour, &mut rng),
    )
}

fn morning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 10, 27)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

// ── Selector and simulation ────────────────────────────────────────────

#[test]
fn now_selection_ignores_forecast_content() {
    for seed in 0..10 {
        let forecast = generate_forecast(seed as u32, &mut StdRng::seed_from_u64(seed));
        assert_eq!(resolve_displayed_members("Now", 150, &forecast, 200), 150);
    }
}

#[test]
fn forecast_point_drives_members() {
    let forecast = vec![CrowdDataPoint {
        time: "9:00".to_string(),
        occupancy_percentage: 50.0,
        is_predicted: true,
    }];
    assert_eq!(resolve_displayed_members("9:00", 33, &forecast, 200), 100);
}

#[test]
fn drift_then_now_point_matches_count() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut forecast = generate_forecast(16, &mut rng);
    let mut members = 100;
    for _ in 0..500 {
        let next = advance_live_count(members, 200, &mut rng);
        assert!(next <= 200);
        assert!((i64::from(next) - i64::from(members)).abs() <= 1);
        members = next;
        update_now_point(&mut forecast, members, 200);
        let now: Vec<&CrowdDataPoint> = forecast.iter().filter(|p| p.is_now()).collect();
        assert_eq!(now.len(), 1);
        assert_eq!(
            now[0].occupancy_percentage,
            (f64::from(members) / 200.0 * 100.0).round()
        );
    }
}

#[test]
fn simulation_repeats_exactly() {
    let base = initial_equipment();
    let runs: Vec<Vec<EquipmentCategory>> = (0..5).map(|_| simulate_equipment(&base, 77.5)).collect();
    assert!(runs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn predicted_evening_peak_flags_bottleneck() {
    let options = workout_focus_options();
    let peak = simulate_equipment(&initial_equipment(), 90.0);
    let legs = filter_for_focus(&peak, find_focus(&options, "legs"));
    let insight = evaluate_focus_insight(&legs, "legs", true).unwrap();
    assert_eq!(insight.kind, InsightKind::Warning);
    assert_eq!(insight.message, "Squat Racks are predicted to be crowded.");
}

#[test]
fn quiet_cardio_is_good() {
    let options = workout_focus_options();
    let quiet = simulate_equipment(&initial_equipment(), 20.0);
    let cardio = filter_for_focus(&quiet, find_focus(&options, "cardio"));
    let insight = evaluate_focus_insight(&cardio, "cardio", true).unwrap();
    assert_eq!(insight.kind, InsightKind::Good);
    assert!(insight.subtext.ends_with("% of relevant equipment is expected to be free."));
}

// ── Full state flow ────────────────────────────────────────────────────

#[test]
fn predicted_view_simulates_from_forecast_point() {
    let mut state = seeded_state(21, 12);
    assert!(state.select_time("18:00"));
    let point = state
        .forecast()
        .iter()
        .find(|p| p.time == "18:00")
        .unwrap()
        .occupancy_percentage;
    let members = (point / 100.0 * 200.0).round() as u32;
    assert_eq!(state.displayed_members(), members);
    assert_eq!(
        state.displayed_equipment(),
        simulate_equipment(state.equipment(), load_percent(members, 200))
    );
}

#[test]
fn maintenance_override_survives_every_forecast_hour() {
    let mut state = seeded_state(4, 7);
    state.admin_set_equipment_status("benches", EquipmentStatus::Maintenance);
    state.set_view(View::Member);
    for label in state.selectable_times() {
        assert!(state.select_time(&label));
        let benches = state
            .displayed_equipment()
            .into_iter()
            .find(|e| e.id == "benches")
            .unwrap();
        assert_eq!(benches.status, EquipmentStatus::Maintenance);
    }
}

#[test]
fn check_in_and_out_round_trip() {
    let mut state = seeded_state(2, 9);
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..10 {
        state.tick_drift(&mut rng);
    }
    let before = state.live_members();
    state.select_time("15:00");

    let outcome = state.plan_day(morning().date(), morning(), WorkoutPlan::new("push", 90, "Now"));
    assert_eq!(outcome, PlanOutcome::CheckedIn);
    assert_eq!(state.selected_time(), "Now");
    assert_eq!(state.selected_focus(), "push");
    assert_eq!(state.live_members(), before + 1);

    state.check_out();
    assert_eq!(state.live_members(), before);
    assert!(!state.is_checked_in());
    assert_eq!(state.selected_focus(), "all");
}

#[test]
fn one_entry_per_day() {
    let day = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
    let store = ScheduleStore::new();
    let store = apply_schedule(store, day, ScheduleAction::Plan(WorkoutPlan::new("legs", 60, "7:00")));
    let store = apply_schedule(store, day, ScheduleAction::Plan(WorkoutPlan::new("pull", 120, "19:00")));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(day).unwrap().focus_id(), Some("pull"));

    let store = apply_schedule(store, day, ScheduleAction::Delete);
    let store = apply_schedule(store, day, ScheduleAction::Delete);
    assert_eq!(store.day_state(day), DayState::Empty);
}

#[test]
fn snapshot_serializes() {
    let mut state = seeded_state(5, 18);
    state.select_focus("cardio");
    let json = serde_json::to_value(state.snapshot()).unwrap();
    assert_eq!(json["selected_focus"], "cardio");
    assert_eq!(json["forecast"].as_array().unwrap().len(), 13);
    assert!(json["insight"].is_object());
}
