//! Live drift ticker.
//!
//! A scheduled task that calls [`DashboardEngine::tick`] once per period
//! for as long as the live view exists. At most one task runs per ticker:
//! `start` while running does nothing, `stop` aborts the task exactly once
//! and is a no-op afterwards, and dropping the ticker stops it.
//!
//! Must be started from inside a tokio runtime.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::engine::DashboardEngine;

pub struct DriftTicker {
    engine: DashboardEngine,
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl DriftTicker {
    /// Ticker using the engine's configured period.
    pub fn new(engine: DashboardEngine) -> Self {
        let period = engine.tick_period();
        Self::with_period(engine, period)
    }

    pub fn with_period(engine: DashboardEngine, period: Duration) -> Self {
        Self {
            engine,
            period,
            handle: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Spawn the drift task. Returns `false` if one is already running.
    ///
    /// The first tick fires one full period after start.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        let engine = self.engine.clone();
        let period = self.period;
        log::info!("Live drift started (every {:?})", period);

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let members = engine.tick().await;
                log::debug!("Drift tick: {} members", members);
            }
        }));
        true
    }

    /// Abort the drift task. Returns `false` if nothing was running.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                log::info!("Live drift stopped");
                true
            }
            None => false,
        }
    }
}

impl Drop for DriftTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
