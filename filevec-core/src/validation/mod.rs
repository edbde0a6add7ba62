//! Size and bounds validation for file-backed vectors
//!
//! This module contains pure validation functions with no I/O dependencies.

pub mod bounds;
pub mod layout;

pub use bounds::{check_index, check_position, check_range};
pub use layout::{byte_len_for, element_count_for, validate_alignment, validate_element_type};
