//! The coverage falloff curve.
//!
//! ```text
//!  eff
//!  1.0 ┤━━━━━━━━━━━━━━━━━━━━━╮
//!      │                      ╲
//!  0.0 ┤                       ╰
//!      └──────────────────────┬─┬── steps
//!                          0.9m  m
//! ```
//!
//! Full strength up to 90 % of the step budget, then `1 − t²` with `t`
//! running from 0 to 1 over the last 10 %.

/// Step budget for a radius in world units.
#[inline]
pub fn max_steps(radius: f32, cell_size: f32) -> u32 {
    (radius / cell_size.max(0.01)).floor().max(0.0) as u32
}

/// Service strength at `steps` road steps from an emitter with a budget of
/// `max_steps`.  Non-increasing in `steps`; exactly 0 at `steps == max_steps`.
pub fn efficiency(steps: u32, max_steps: u32) -> f32 {
    if max_steps == 0 {
        return 1.0;
    }
    // Integer comparison keeps the 90 % knee exact: 10·d ≤ 9·m.
    let d = u64::from(steps);
    let m = u64::from(max_steps);
    if 10 * d <= 9 * m {
        return 1.0;
    }
    let t = (10 * d - 9 * m) as f32 / m as f32;
    (1.0 - t * t).clamp(0.0, 1.0)
}
