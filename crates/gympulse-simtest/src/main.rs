//! GymPulse Headless Harness
//!
//! Validates the pure dashboard logic, then drives a short live session
//! through the shared engine and drift ticker. No rendering.
//!
//! Usage:
//!   cargo run -p gympulse-simtest
//!   cargo run -p gympulse-simtest -- --verbose
//!   cargo run -p gympulse-simtest -- --config gym.json --ticks 20

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Days, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;

use gympulse_core::{logging, DashboardConfig, DashboardEngine, DriftTicker};
use gympulse_logic::constants::{equipment_ids, focus_ids, MAX_CAPACITY, NOW_LABEL};
use gympulse_logic::drift::advance_live_count;
use gympulse_logic::equipment::{initial_equipment, set_status, simulate_equipment, EquipmentStatus};
use gympulse_logic::focus::{
    evaluate_focus_insight, filter_for_focus, workout_focus_options, InsightKind,
};
use gympulse_logic::forecast::{generate_forecast, hour_label, time_selector_options};
use gympulse_logic::occupancy::{occupancy_percent, resolve_displayed_members, CrowdLevel};
use gympulse_logic::schedule::{
    upcoming, week_days, DayPlan, DayState, ScheduleStore, WorkoutPlan,
};
use gympulse_logic::state::{DashboardState, PlanOutcome};

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Args {
    verbose: bool,
    config: Option<PathBuf>,
    ticks: u64,
}

const DEFAULT_SESSION_TICKS: u64 = 10;
const SESSION_TICK: Duration = Duration::from_millis(20);
const HARNESS_SEED: u64 = 2024;

fn parse_args() -> Args {
    let mut args = Args {
        verbose: false,
        config: None,
        ticks: DEFAULT_SESSION_TICKS,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--verbose" => args.verbose = true,
            "--config" => args.config = it.next().map(PathBuf::from),
            "--ticks" => {
                if let Some(n) = it.next().and_then(|v| v.parse().ok()) {
                    args.ticks = n;
                }
            }
            other => log::warn!("Ignoring unknown argument {:?}", other),
        }
    }
    args
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init();
    let args = parse_args();
    println!("=== GymPulse Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Forecast shape for every anchor hour
    results.extend(validate_forecast(args.verbose));

    // 2. Live drift bounds
    results.extend(validate_drift(args.verbose));

    // 3. Time selector resolution
    results.extend(validate_time_selector(args.verbose));

    // 4. Equipment simulation sweep
    results.extend(validate_equipment(args.verbose));

    // 5. Focus insights
    results.extend(validate_focus_insights(args.verbose));

    // 6. Weekly planner
    results.extend(validate_schedule(args.verbose));

    // 7. Dashboard state flow
    results.extend(validate_state_flow(args.verbose));

    // 8. Live session through the engine
    results.extend(run_live_session(&args).await);

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Forecast ─────────────────────────────────────────────────────────

fn validate_forecast(verbose: bool) -> Vec<TestResult> {
    println!("--- Forecast ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(HARNESS_SEED);

    let mut bad_shape = Vec::new();
    let mut out_of_range = 0;
    let mut bad_labels = Vec::new();
    for anchor in 0..24 {
        let forecast = generate_forecast(anchor, &mut rng);
        let now_count = forecast.iter().filter(|p| p.is_now()).count();
        let predicted = forecast.iter().filter(|p| p.is_predicted).count();
        let now_index = forecast.iter().position(|p| p.is_now());
        if forecast.len() != 13 || now_count != 1 || predicted != 10 || now_index != Some(2) {
            bad_shape.push(anchor);
        }
        out_of_range += forecast
            .iter()
            .filter(|p| !(0.0..=100.0).contains(&p.occupancy_percentage))
            .count();
        if forecast[3].time != hour_label(anchor + 1) || forecast[1].time != hour_label(anchor + 23) {
            bad_labels.push(anchor);
        }
        if verbose && anchor == 9 {
            let labels: Vec<_> = forecast.iter().map(|p| p.time.as_str()).collect();
            println!("  Anchor 9:00 -> {}", labels.join(" "));
        }
    }

    results.push(TestResult {
        name: "forecast_shape".into(),
        passed: bad_shape.is_empty(),
        detail: if bad_shape.is_empty() {
            "13 points, one Now at index 2, 10 predicted, for all 24 anchors".into()
        } else {
            format!("bad shape at anchors {:?}", bad_shape)
        },
    });
    results.push(TestResult {
        name: "forecast_range".into(),
        passed: out_of_range == 0,
        detail: format!("{} points outside 0-100%", out_of_range),
    });
    results.push(TestResult {
        name: "forecast_labels_wrap".into(),
        passed: bad_labels.is_empty(),
        detail: if bad_labels.is_empty() {
            "hour labels wrap around midnight".into()
        } else {
            format!("bad labels at anchors {:?}", bad_labels)
        },
    });

    results
}

// ── 2. Drift ────────────────────────────────────────────────────────────

fn validate_drift(_verbose: bool) -> Vec<TestResult> {
    println!("--- Live Drift ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(HARNESS_SEED);

    for &start in &[0, 124, MAX_CAPACITY] {
        let mut count = start;
        let mut max_step = 0;
        let mut escaped = false;
        for _ in 0..10_000 {
            let next = advance_live_count(count, MAX_CAPACITY, &mut rng);
            max_step = max_step.max(next.abs_diff(count));
            escaped |= next > MAX_CAPACITY;
            count = next;
        }
        results.push(TestResult {
            name: format!("drift_bounded_from_{}", start),
            passed: !escaped && max_step <= 1,
            detail: format!("10000 steps, largest step {}, ended at {}", max_step, count),
        });
    }

    results
}

// ── 3. Time Selector ────────────────────────────────────────────────────

fn validate_time_selector(verbose: bool) -> Vec<TestResult> {
    println!("--- Time Selector ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(HARNESS_SEED);
    let forecast = generate_forecast(10, &mut rng);
    let live = 124;

    let options = time_selector_options(&forecast);
    results.push(TestResult {
        name: "selector_options".into(),
        passed: options.len() == 11
            && options[0].is_now()
            && options.iter().skip(1).all(|p| p.is_predicted),
        detail: format!("{} selectable hours", options.len()),
    });

    let resolved: Vec<u32> = options
        .iter()
        .map(|p| resolve_displayed_members(&p.time, live, &forecast, MAX_CAPACITY))
        .collect();
    results.push(TestResult {
        name: "selector_now_is_live".into(),
        passed: resolved[0] == live,
        detail: format!("Now resolves to {} members", resolved[0]),
    });
    results.push(TestResult {
        name: "selector_within_capacity".into(),
        passed: resolved.iter().all(|&m| m <= MAX_CAPACITY),
        detail: format!("resolved counts {:?}", resolved),
    });
    results.push(TestResult {
        name: "selector_stale_label_falls_back".into(),
        passed: resolve_displayed_members("3:00", live, &forecast, MAX_CAPACITY) == live,
        detail: "unknown hour shows the live count".into(),
    });

    if verbose {
        for (p, m) in options.iter().zip(&resolved) {
            let pct = occupancy_percent(*m, MAX_CAPACITY);
            println!(
                "  {:>5}: {:3} members ({:3}%, {})",
                p.time,
                m,
                pct,
                CrowdLevel::from_percentage(pct).label()
            );
        }
    }

    results
}

// ── 4. Equipment ────────────────────────────────────────────────────────

fn validate_equipment(verbose: bool) -> Vec<TestResult> {
    println!("--- Equipment Simulation ---");
    let mut results = Vec::new();
    let mut base = initial_equipment();
    set_status(&mut base, equipment_ids::CABLE_MACHINES, EquipmentStatus::Maintenance);

    let mut overbooked = 0;
    let mut lost_maintenance = 0;
    let mut changed_totals = 0;
    for step in 0..=20 {
        let load = f64::from(step) * 5.0;
        let simulated = simulate_equipment(&base, load);
        for (before, after) in base.iter().zip(&simulated) {
            if after.available_units > after.total_units {
                overbooked += 1;
            }
            if after.total_units != before.total_units || after.id != before.id {
                changed_totals += 1;
            }
            if before.status == EquipmentStatus::Maintenance
                && after.status != EquipmentStatus::Maintenance
            {
                lost_maintenance += 1;
            }
        }
        if verbose && step % 5 == 0 {
            let row: Vec<_> = simulated
                .iter()
                .map(|e| format!("{} {}/{}", e.id, e.available_units, e.total_units))
                .collect();
            println!("  load {:3}%: {}", load, row.join(", "));
        }
    }

    results.push(TestResult {
        name: "equipment_available_le_total".into(),
        passed: overbooked == 0,
        detail: format!("{} categories with more free than total", overbooked),
    });
    results.push(TestResult {
        name: "equipment_identity_kept".into(),
        passed: changed_totals == 0,
        detail: "ids and unit totals survive simulation".into(),
    });
    results.push(TestResult {
        name: "equipment_maintenance_kept".into(),
        passed: lost_maintenance == 0,
        detail: format!("{} maintenance flags lost", lost_maintenance),
    });

    let full = simulate_equipment(&initial_equipment(), 100.0);
    let crowded = full
        .iter()
        .filter(|e| e.status == EquipmentStatus::Crowded)
        .count();
    results.push(TestResult {
        name: "equipment_full_load_crowds".into(),
        passed: crowded > 0,
        detail: format!("{} categories crowded at 100% load", crowded),
    });

    results
}

// ── 5. Focus Insights ───────────────────────────────────────────────────

fn validate_focus_insights(verbose: bool) -> Vec<TestResult> {
    println!("--- Focus Insights ---");
    let mut results = Vec::new();
    let options = workout_focus_options();
    let quiet = simulate_equipment(&initial_equipment(), 0.0);
    let packed = simulate_equipment(&initial_equipment(), 100.0);

    let overview = options.iter().find(|f| f.id == focus_ids::ALL);
    let overview_silent = evaluate_focus_insight(
        &filter_for_focus(&quiet, overview),
        focus_ids::ALL,
        true,
    )
    .is_none();
    results.push(TestResult {
        name: "insight_overview_silent".into(),
        passed: overview_silent,
        detail: "overview focus never shows an insight".into(),
    });

    for focus in options.iter().filter(|f| !f.covers_everything()) {
        let calm = evaluate_focus_insight(&filter_for_focus(&quiet, Some(focus)), &focus.id, true);
        let busy = evaluate_focus_insight(&filter_for_focus(&packed, Some(focus)), &focus.id, true);
        let calm_ok = calm.as_ref().is_some_and(|i| i.kind == InsightKind::Good);
        let busy_ok = busy.as_ref().is_some_and(|i| i.kind == InsightKind::Warning);
        if verbose {
            if let Some(i) = &busy {
                println!("  {:>6} at peak: {} {}", focus.id, i.message, i.subtext);
            }
        }
        results.push(TestResult {
            name: format!("insight_{}", focus.id),
            passed: calm_ok && busy_ok,
            detail: format!(
                "empty gym -> {:?}, full gym -> {:?}",
                calm.map(|i| i.kind),
                busy.map(|i| i.kind)
            ),
        });
    }

    results
}

// ── 6. Weekly Planner ───────────────────────────────────────────────────

fn validate_schedule(verbose: bool) -> Vec<TestResult> {
    println!("--- Weekly Planner ---");
    let mut results = Vec::new();
    let today = Local::now().date_naive();
    let days = week_days(today);

    let consecutive = days
        .windows(2)
        .all(|w| w[0].checked_add_days(Days::new(1)) == Some(w[1]));
    results.push(TestResult {
        name: "week_seven_days".into(),
        passed: days.len() == 7 && days[0] == today && consecutive,
        detail: format!("{} consecutive days from today", days.len()),
    });

    let mut store = ScheduleStore::new();
    let tomorrow = days[1];
    store.plan_workout(tomorrow, WorkoutPlan::new(focus_ids::LEGS, 60, "18:00"));
    let planned = store.day_state(tomorrow) == DayState::PlannedWorkout;
    store.mark_rest_day(tomorrow);
    let rested = store.day_state(tomorrow) == DayState::RestDay;
    store.delete(tomorrow);
    let cleared = store.day_state(tomorrow) == DayState::Empty;
    results.push(TestResult {
        name: "schedule_day_transitions".into(),
        passed: planned && rested && cleared,
        detail: format!("planned={} rest={} cleared={}", planned, rested, cleared),
    });

    for (i, day) in days.iter().enumerate() {
        if i % 2 == 0 {
            store.plan_workout(*day, WorkoutPlan::new(focus_ids::PUSH, 45, "7:00"));
        } else {
            store.mark_rest_day(*day);
        }
    }
    let next = upcoming(&store, today);
    results.push(TestResult {
        name: "schedule_upcoming_window".into(),
        passed: next.len() == 2 && next.iter().all(|s| !s.is_rest_day()),
        detail: format!("{} upcoming workouts in the next 3 days", next.len()),
    });

    if verbose {
        for session in store.iter() {
            println!("  {}: {:?}", session.day_key(), session.plan);
        }
    }

    results
}

// ── 7. State Flow ───────────────────────────────────────────────────────

fn validate_state_flow(_verbose: bool) -> Vec<TestResult> {
    println!("--- Dashboard State ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(HARNESS_SEED);
    let mut state = DashboardState::seeded(&mut rng);
    let now = Local::now().naive_local();
    let before = state.live_members();

    let predicted = state.selectable_times().into_iter().nth(3);
    let selected = predicted.as_deref().is_some_and(|t| state.select_time(t));
    let predicted_mode = state.is_predicted();

    let checked_in = state.check_in(focus_ids::LEGS, 60, now)
        && state.check_in(focus_ids::LEGS, 60, now)
        && state.live_members() == before + 1
        && state.selected_time() == NOW_LABEL;
    let checked_out = state.check_out() && state.live_members() == before && !state.check_out();
    results.push(TestResult {
        name: "state_check_in_round_trip".into(),
        passed: selected && predicted_mode && checked_in && checked_out,
        detail: format!(
            "predicted={} in={} out={} ({} members)",
            predicted_mode,
            checked_in,
            checked_out,
            state.live_members()
        ),
    });

    let today = now.date();
    let next_week: NaiveDate = today.checked_add_days(Days::new(3)).unwrap_or(today);
    let planned_now = state.plan_day(today, now, WorkoutPlan::new(focus_ids::CARDIO, 30, NOW_LABEL));
    let planned_later = state.plan_day(next_week, now, WorkoutPlan::new(focus_ids::CARDIO, 30, NOW_LABEL));
    let stored_start = state
        .schedule()
        .get(next_week)
        .and_then(|s| match &s.plan {
            DayPlan::Workout { time_label, .. } => Some(time_label.clone()),
            DayPlan::RestDay => None,
        });
    results.push(TestResult {
        name: "state_plan_now".into(),
        passed: planned_now == PlanOutcome::CheckedIn
            && matches!(planned_later, PlanOutcome::Scheduled(_))
            && stored_start.as_deref() == Some("9:00"),
        detail: format!("today -> {:?}, later -> {:?} at {:?}", planned_now, planned_later, stored_start),
    });

    let capped = state.admin_set_occupancy(MAX_CAPACITY + 50);
    let floored = state.admin_step_occupancy(-(MAX_CAPACITY as i32) - 5);
    results.push(TestResult {
        name: "state_admin_clamps".into(),
        passed: capped == MAX_CAPACITY && floored == 0,
        detail: format!("set -> {}, step down -> {}", capped, floored),
    });

    state.check_out();
    state.admin_set_occupancy(MAX_CAPACITY);
    let full_in = state.check_in(focus_ids::PUSH, 60, now);
    let full_out = state.check_out();
    let unknown_rejected = !state.check_in("yoga", 60, now)
        && state.plan_day(today, now, WorkoutPlan::new("yoga", 60, NOW_LABEL)) == PlanOutcome::Rejected
        && !state.is_checked_in();
    results.push(TestResult {
        name: "state_check_in_at_capacity".into(),
        passed: full_in && full_out && state.live_members() == MAX_CAPACITY && unknown_rejected,
        detail: format!(
            "full gym in/out leaves {} members, unknown focus rejected={}",
            state.live_members(),
            unknown_rejected
        ),
    });

    let threshold = state.set_notification_threshold(5);
    results.push(TestResult {
        name: "state_notification_threshold".into(),
        passed: threshold == 10,
        detail: format!("threshold 5 saturates to {}", threshold),
    });

    results
}

// ── 8. Live Session ─────────────────────────────────────────────────────

/// How long the live session may take to reach `ticks`, with slack for a
/// slow scheduler. Saturates instead of overflowing on huge `--ticks`.
fn session_deadline(ticks: u64) -> Duration {
    SESSION_TICK * u32::try_from(ticks).unwrap_or(u32::MAX).saturating_add(50)
}

async fn run_live_session(args: &Args) -> Vec<TestResult> {
    println!("--- Live Session ---");
    let mut results = Vec::new();

    let mut config = match DashboardConfig::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "session_config".into(),
                passed: false,
                detail: format!("config error: {}", e),
            });
            return results;
        }
    };
    if config.seed.is_none() {
        config.seed = Some(HARNESS_SEED);
    }

    let engine = match DashboardEngine::from_config(&config) {
        Ok(e) => e,
        Err(e) => {
            results.push(TestResult {
                name: "session_engine".into(),
                passed: false,
                detail: format!("engine error: {}", e),
            });
            return results;
        }
    };

    let mut ticker = DriftTicker::with_period(engine.clone(), SESSION_TICK);
    let started = ticker.start();
    let restarted = ticker.start();

    let deadline = session_deadline(args.ticks);
    let reached = tokio::time::timeout(deadline, async {
        while engine.drift_ticks().await < args.ticks {
            tokio::time::sleep(SESSION_TICK).await;
        }
    })
    .await
    .is_ok();
    ticker.stop();

    let ticks = engine.drift_ticks().await;
    results.push(TestResult {
        name: "session_ticks".into(),
        passed: started && !restarted && reached,
        detail: format!("{} drift ticks (wanted {})", ticks, args.ticks),
    });

    tokio::time::sleep(SESSION_TICK * 5).await;
    results.push(TestResult {
        name: "session_stop_halts".into(),
        passed: engine.drift_ticks().await == ticks && !ticker.is_running(),
        detail: "no ticks after stop".into(),
    });

    let snapshot = engine.snapshot().await;
    let now_pct = snapshot
        .forecast
        .iter()
        .find(|p| p.is_now())
        .map(|p| p.occupancy_percentage);
    results.push(TestResult {
        name: "session_now_point_synced".into(),
        passed: now_pct == Some(f64::from(snapshot.occupancy_percent))
            && snapshot.live_members <= snapshot.capacity,
        detail: format!(
            "{}/{} members, Now at {:?}%",
            snapshot.live_members, snapshot.capacity, now_pct
        ),
    });

    if args.verbose {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => log::warn!("Could not serialize snapshot: {}", e),
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_deadline_has_slack() {
        assert_eq!(session_deadline(10), SESSION_TICK * 60);
    }

    #[test]
    fn test_session_deadline_saturates() {
        let cap = SESSION_TICK * u32::MAX;
        assert_eq!(session_deadline(u64::from(u32::MAX) - 10), cap);
        assert_eq!(session_deadline(u64::MAX), cap);
    }
}
