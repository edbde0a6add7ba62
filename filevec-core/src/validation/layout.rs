//! Element layout validation
//!
//! Backing files store elements back to back, so a file's byte length maps
//! directly onto an element count.

use crate::{FvecError, MAPPING_ALIGNMENT};

/// Validate that `T` can live in a page-aligned mapping
///
/// Rejects zero-sized types (their count cannot be recovered from a byte
/// length) and types aligned more strictly than the mapping start.
pub const fn validate_element_type<T>() -> Result<(), FvecError> {
    if core::mem::size_of::<T>() == 0 {
        return Err(FvecError::ZeroSizedElement);
    }

    let align = core::mem::align_of::<T>();
    if align > MAPPING_ALIGNMENT {
        return Err(FvecError::UnsupportedAlignment { align });
    }

    Ok(())
}

/// Number of whole elements in `byte_len` bytes, plus the leftover byte count
///
/// A length that is not a multiple of the element size is floored.
pub const fn element_count_for<T>(byte_len: u64) -> Result<(usize, usize), FvecError> {
    let element_size = core::mem::size_of::<T>() as u64;
    if element_size == 0 {
        return Err(FvecError::ZeroSizedElement);
    }

    let count = byte_len / element_size;
    let trailing = (byte_len % element_size) as usize;

    if count > (isize::MAX as u64) / element_size {
        return Err(FvecError::CapacityOverflow);
    }

    Ok((count as usize, trailing))
}

/// Byte length of `count` elements with overflow protection
pub const fn byte_len_for<T>(count: usize) -> Result<usize, FvecError> {
    match count.checked_mul(core::mem::size_of::<T>()) {
        Some(bytes) if bytes <= isize::MAX as usize => Ok(bytes),
        _ => Err(FvecError::CapacityOverflow),
    }
}

/// Validate alignment for a pointer to typed data
///
/// Checks that a raw pointer has the correct alignment for type T.
/// This is a pure check with no memory access.
pub fn validate_alignment<T>(ptr: *const u8) -> Result<(), FvecError> {
    let align = core::mem::align_of::<T>();

    if (ptr as usize) % align != 0 {
        return Err(FvecError::UnsupportedAlignment { align });
    }

    Ok(())
}
