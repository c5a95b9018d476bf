//! Capacity arithmetic for buffer growth.

use outbuf_core::config::GrowthPolicy;

use crate::error::{Error, Result};

/// Capacity a buffer should have so that `additional` bytes fit after the
/// first `size` bytes.
///
/// Returns `capacity` unchanged when it already suffices. Otherwise the
/// result is at least `size + additional`, grown geometrically and rounded
/// up to `policy.align` when that does not overflow.
pub fn next_capacity(
    policy: &GrowthPolicy,
    capacity: usize,
    size: usize,
    additional: usize,
) -> Result<usize> {
    let needed = size
        .checked_add(additional)
        .ok_or(Error::CapacityOverflow { size, additional })?;
    if needed <= capacity {
        return Ok(capacity);
    }

    let geometric = capacity.saturating_mul(policy.factor_percent) / 100;
    let target = needed.max(geometric);
    Ok(round_up(target, policy.align).unwrap_or(needed))
}

fn round_up(value: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    let mask = align.max(1) - 1;
    value.checked_add(mask).map(|v| v & !mask)
}
