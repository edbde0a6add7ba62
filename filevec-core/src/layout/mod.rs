//! Storage layout policy for file-backed vectors
//!
//! Backing files carry no header: they are the contiguous raw image of the
//! live elements. This module holds the constants and the capacity growth
//! policy that decide how many slots a mapping covers.

pub mod constants;
pub mod growth;

pub use constants::{GROWTH_DENOMINATOR, GROWTH_NUMERATOR, MAPPING_ALIGNMENT, MIN_CAPACITY};
pub use growth::{grow_to, required_capacity};
