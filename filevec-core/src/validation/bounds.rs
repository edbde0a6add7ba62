//! Index, position and range validation

use crate::FvecError;
use core::ops::{Bound, RangeBounds};

/// Validate an element index against `[0, len)`
pub const fn check_index(index: usize, len: usize) -> Result<usize, FvecError> {
    if index < len {
        Ok(index)
    } else {
        Err(FvecError::OutOfRange { index, len })
    }
}

/// Validate an insertion point against `[0, len]`
///
/// `len` itself is valid and means "append at the end".
pub const fn check_position(position: usize, len: usize) -> Result<usize, FvecError> {
    if position <= len {
        Ok(position)
    } else {
        Err(FvecError::InvalidPosition { position, len })
    }
}

/// Resolve any range expression to `start..end` within `[0, len]`
///
/// Bounds past `usize::MAX` saturate, so they fail as `InvalidRange`.
pub fn check_range<R: RangeBounds<usize>>(
    range: R,
    len: usize,
) -> Result<core::ops::Range<usize>, FvecError> {
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.saturating_add(1),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };

    if start > end || end > len {
        return Err(FvecError::InvalidRange { start, end, len });
    }

    Ok(start..end)
}
