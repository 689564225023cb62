//! Dashboard engine: the single shared dashboard state.
//!
//! The engine owns one [`DashboardState`] and the random source that drives
//! drift, behind one async mutex. Cloning the engine clones the handle, not
//! the state, so the drift ticker and the presentation layer see the same
//! dashboard. Every operation takes the lock once and finishes its state
//! change before releasing it; nothing awaits while holding the lock.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;

use gympulse_logic::equipment::EquipmentStatus;
use gympulse_logic::forecast::generate_forecast_now;
use gympulse_logic::schedule::WorkoutPlan;
use gympulse_logic::state::{DashboardSnapshot, DashboardState, PlanOutcome, View};

use crate::config::DashboardConfig;
use crate::error::ConfigError;

struct EngineInner {
    state: DashboardState,
    rng: StdRng,
}

#[derive(Clone)]
pub struct DashboardEngine {
    inner: Arc<Mutex<EngineInner>>,
    tick_period: Duration,
}

impl DashboardEngine {
    pub fn new(state: DashboardState, rng: StdRng, tick_period: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(EngineInner { state, rng })),
            tick_period,
        }
    }

    /// Build the opening-day dashboard described by `config`.
    pub fn from_config(config: &DashboardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let forecast = generate_forecast_now(&mut rng);
        let state = DashboardState::new(
            config.max_capacity,
            config.initial_members,
            config.equipment.clone(),
            config.focus_options.clone(),
            forecast,
        );
        log::info!(
            "Dashboard ready: {}/{} members, {} equipment categories, {} focus options",
            state.live_members(),
            state.capacity(),
            state.equipment().len(),
            state.focus_options().len()
        );
        Ok(Self::new(state, rng, config.tick_period()))
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Read from the state under the lock.
    pub async fn read<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&guard.state)
    }

    /// Mutate the state under the lock.
    pub async fn update<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard.state)
    }

    /// One drift step. Member count and "Now" point change together.
    pub async fn tick(&self) -> u32 {
        let mut guard = self.inner.lock().await;
        let EngineInner { state, rng } = &mut *guard;
        state.tick_drift(rng)
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.read(DashboardState::snapshot).await
    }

    pub async fn live_members(&self) -> u32 {
        self.read(DashboardState::live_members).await
    }

    pub async fn drift_ticks(&self) -> u64 {
        self.read(DashboardState::drift_ticks).await
    }

    pub async fn select_time(&self, label: &str) -> bool {
        let accepted = self.update(|s| s.select_time(label)).await;
        if !accepted {
            log::debug!("Ignoring time selection {:?}: not an offered hour", label);
        }
        accepted
    }

    pub async fn select_focus(&self, focus_id: &str) -> bool {
        let accepted = self.update(|s| s.select_focus(focus_id)).await;
        if !accepted {
            log::debug!("Ignoring unknown focus {:?}", focus_id);
        }
        accepted
    }

    pub async fn toggle_view(&self) -> View {
        let view = self.update(DashboardState::toggle_view).await;
        log::info!("Switched to {:?} view", view);
        view
    }

    /// Check in at the local wall-clock time. Returns `false` for an
    /// unknown focus.
    pub async fn check_in(&self, focus_id: &str, duration_minutes: u32) -> bool {
        let now = Local::now().naive_local();
        let (accepted, members) = self
            .update(|s| (s.check_in(focus_id, duration_minutes, now), s.live_members()))
            .await;
        if accepted {
            log::info!(
                "Checked in for {} ({} min), {} members present",
                focus_id,
                duration_minutes,
                members
            );
        } else {
            log::warn!("Check-in rejected: unknown focus {:?}", focus_id);
        }
        accepted
    }

    pub async fn check_out(&self) -> bool {
        let checked_out = self.update(DashboardState::check_out).await;
        if checked_out {
            log::info!("Checked out");
        }
        checked_out
    }

    /// Submit the planner form for `date`, relative to the local clock.
    pub async fn plan_day(&self, date: NaiveDate, plan: WorkoutPlan) -> PlanOutcome {
        let now = Local::now().naive_local();
        let outcome = self.update(|s| s.plan_day(date, now, plan)).await;
        if outcome == PlanOutcome::Rejected {
            log::warn!("Plan for {} rejected: unknown focus", date);
        } else {
            log::debug!("Planned {}: {:?}", date, outcome);
        }
        outcome
    }

    pub async fn mark_rest_day(&self, date: NaiveDate) {
        self.update(|s| s.mark_rest_day(date)).await;
    }

    pub async fn delete_day(&self, date: NaiveDate) -> bool {
        self.update(|s| s.delete_day(date)).await
    }

    pub async fn admin_set_occupancy(&self, members: u32) -> u32 {
        let set = self.update(|s| s.admin_set_occupancy(members)).await;
        log::info!("Admin set occupancy to {} (requested {})", set, members);
        set
    }

    pub async fn admin_step_occupancy(&self, delta: i32) -> u32 {
        self.update(|s| s.admin_step_occupancy(delta)).await
    }

    pub async fn admin_set_equipment_status(&self, id: &str, status: EquipmentStatus) -> bool {
        let found = self
            .update(|s| s.admin_set_equipment_status(id, status))
            .await;
        if found {
            log::info!("Admin set {} to {}", id, status);
        } else {
            log::warn!("Admin status update for unknown equipment {:?}", id);
        }
        found
    }

    pub async fn toggle_notification(&self) -> bool {
        self.update(DashboardState::toggle_notification).await
    }

    pub async fn set_notification_threshold(&self, threshold: u8) -> u8 {
        self.update(|s| s.set_notification_threshold(threshold))
            .await
    }
}
