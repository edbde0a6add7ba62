//! Geometric capacity growth

use crate::{FvecError, GROWTH_DENOMINATOR, GROWTH_NUMERATOR};

/// Capacity to grow to so that at least `required` slots are available
///
/// Returns `max(capacity * 1.5, required)`. Never smaller than `capacity`.
/// The scaled term saturates; whether the result fits in memory is decided
/// when it is converted to a byte length.
pub const fn grow_to(capacity: usize, required: usize) -> usize {
    let whole = capacity / GROWTH_DENOMINATOR;
    let rest = capacity % GROWTH_DENOMINATOR;
    let scaled = whole
        .saturating_mul(GROWTH_NUMERATOR)
        .saturating_add(rest * GROWTH_NUMERATOR / GROWTH_DENOMINATOR);

    if scaled < required {
        required
    } else {
        scaled
    }
}

/// New capacity needed to hold `extra` more elements, if any
///
/// `None` means the current capacity already suffices (including `extra == 0`).
pub const fn required_capacity(
    len: usize,
    capacity: usize,
    extra: usize,
) -> Result<Option<usize>, FvecError> {
    let required = match len.checked_add(extra) {
        Some(required) => required,
        None => return Err(FvecError::CapacityOverflow),
    };

    if required <= capacity {
        return Ok(None);
    }

    Ok(Some(grow_to(capacity, required)))
}
