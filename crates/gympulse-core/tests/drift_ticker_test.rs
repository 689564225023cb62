//! Drift ticker lifecycle tests.
//!
//! Time is paused, so the runtime jumps straight to the next timer and
//! tick counts are exact.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::sleep;

use gympulse_core::{DashboardEngine, DriftTicker};
use gympulse_logic::constants::{INITIAL_MEMBERS, MAX_CAPACITY};
use gympulse_logic::equipment::initial_equipment;
use gympulse_logic::focus::workout_focus_options;
use gympulse_logic::forecast::generate_forecast;
use gympulse_logic::state::DashboardState;

const PERIOD: Duration = Duration::from_secs(5);

fn engine() -> DashboardEngine {
    gympulse_core::logging::init_test();
    let mut rng = StdRng::seed_from_u64(99);
    let state = DashboardState::new(
        MAX_CAPACITY,
        INITIAL_MEMBERS,
        initial_equipment(),
        workout_focus_options(),
        generate_forecast(8, &mut rng),
    );
    DashboardEngine::new(state, rng, PERIOD)
}

#[tokio::test(start_paused = true)]
async fn ticks_once_per_period() {
    let engine = engine();
    let mut ticker = DriftTicker::new(engine.clone());
    assert!(ticker.start());
    assert!(ticker.is_running());

    sleep(Duration::from_millis(4_900)).await;
    assert_eq!(engine.drift_ticks().await, 0);

    sleep(Duration::from_millis(10_600)).await; // t = 15.5s
    assert_eq!(engine.drift_ticks().await, 3);
    ticker.stop();
}

#[tokio::test(start_paused = true)]
async fn stop_halts_ticks_and_is_idempotent() {
    let engine = engine();
    let mut ticker = DriftTicker::new(engine.clone());
    ticker.start();
    sleep(Duration::from_millis(10_500)).await;
    assert_eq!(engine.drift_ticks().await, 2);

    assert!(ticker.stop());
    assert!(!ticker.stop());
    assert!(!ticker.is_running());

    sleep(Duration::from_secs(60)).await;
    assert_eq!(engine.drift_ticks().await, 2);
}

#[tokio::test(start_paused = true)]
async fn double_start_keeps_one_timer() {
    let engine = engine();
    let mut ticker = DriftTicker::new(engine.clone());
    assert!(ticker.start());
    assert!(!ticker.start());
    sleep(Duration::from_millis(20_500)).await;
    assert_eq!(engine.drift_ticks().await, 4);
}

#[tokio::test(start_paused = true)]
async fn restart_after_stop() {
    let engine = engine();
    let mut ticker = DriftTicker::new(engine.clone());
    ticker.start();
    sleep(Duration::from_millis(5_500)).await;
    ticker.stop();
    assert!(ticker.start());
    sleep(Duration::from_millis(5_500)).await;
    assert_eq!(engine.drift_ticks().await, 2);
}

#[tokio::test(start_paused = true)]
async fn drop_stops_ticker() {
    let engine = engine();
    {
        let mut ticker = DriftTicker::with_period(engine.clone(), Duration::from_secs(1));
        ticker.start();
        sleep(Duration::from_millis(2_500)).await;
    }
    let after_drop = engine.drift_ticks().await;
    assert_eq!(after_drop, 2);
    sleep(Duration::from_secs(30)).await;
    assert_eq!(engine.drift_ticks().await, after_drop);
}

#[tokio::test(start_paused = true)]
async fn live_count_stays_in_bounds_under_ticker() {
    let engine = engine();
    engine.admin_set_occupancy(MAX_CAPACITY).await;
    let mut ticker = DriftTicker::with_period(engine.clone(), Duration::from_millis(100));
    ticker.start();
    for _ in 0..50 {
        sleep(Duration::from_millis(100)).await;
        let snap = engine.snapshot().await;
        assert!(snap.live_members <= MAX_CAPACITY);
        let now = snap.forecast.iter().find(|p| p.is_now()).unwrap();
        assert_eq!(
            now.occupancy_percentage,
            (f64::from(snap.live_members) / f64::from(MAX_CAPACITY) * 100.0).round()
        );
    }
    ticker.stop();
}
