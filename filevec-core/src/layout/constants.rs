//! Layout constants for file-backed vectors

/// Growth factor numerator (growth factor is 3/2)
pub const GROWTH_NUMERATOR: usize = 3;

/// Growth factor denominator
pub const GROWTH_DENOMINATOR: usize = 2;

/// Slots established when the backing file is empty
///
/// Mapping zero bytes is rejected on some platforms, so an empty file is
/// always extended to at least this many slots while open.
pub const MIN_CAPACITY: usize = 1;

/// Alignment guaranteed for the start of every mapping (smallest common page size)
pub const MAPPING_ALIGNMENT: usize = 4096;
