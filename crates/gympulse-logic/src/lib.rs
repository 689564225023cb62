//! Pure dashboard logic for GymPulse.
//!
//! This crate contains all crowd, equipment, and scheduling logic that is
//! independent of any runtime, timer, or renderer. Functions take plain data
//! (plus an injected random source where noise is involved) and return
//! results, making them unit-testable and reusable from the async runtime
//! crate, the headless harness, or any future front end.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`constants`] | Capacity, sentinel labels, equipment/focus ids, durations |
//! | [`drift`] | Random walk of the live member count |
//! | [`equipment`] | Equipment categories, usage tiers, load simulation |
//! | [`focus`] | Workout focus options, filtering, availability insight |
//! | [`forecast`] | Hourly occupancy forecast generation and the "Now" anchor |
//! | [`notification`] | Crowd alert preference (threshold clamping) |
//! | [`occupancy`] | Displayed-member resolution and crowd level tiers |
//! | [`schedule`] | Weekly plan store, rest days, planner helpers |
//! | [`state`] | Explicit dashboard state and the operations that mutate it |

pub mod constants;
pub mod drift;
pub mod equipment;
pub mod focus;
pub mod forecast;
pub mod notification;
pub mod occupancy;
pub mod schedule;
pub mod state;
