//! Live member-count drift.
//!
//! Every tick the live count moves by -1, 0, or +1 with equal probability
//! and saturates at `[0, capacity]`.

use rand::Rng;

/// Pick a drift step uniformly from {-1, 0, +1}.
pub fn drift_delta(rng: &mut impl Rng) -> i32 {
    rng.gen_range(-1..=1)
}

/// Apply a signed change to a member count, saturating at `[0, capacity]`.
pub fn apply_delta(prev: u32, delta: i32, capacity: u32) -> u32 {
    let next = i64::from(prev) + i64::from(delta);
    // Clamped into u32 range by construction.
    next.clamp(0, i64::from(capacity)) as u32
}

/// Advance the live count by one random drift step.
pub fn advance_live_count(prev: u32, capacity: u32, rng: &mut impl Rng) -> u32 {
    apply_delta(prev, drift_delta(rng), capacity)
}
