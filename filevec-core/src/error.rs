//! Error types for file-backed vector operations

/// Broad classes of failure a file-backed vector can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The backing file could not be opened, created or inspected
    Open,
    /// The mapping could not be established, grown or shrunk
    Mapping,
    /// An index, position or range fell outside the live elements
    Bounds,
    /// Releasing the mapping or truncating the file failed
    Close,
    /// The container or element type cannot be used as requested
    Usage,
}

/// Errors that can occur independently of any I/O
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FvecError {
    /// Checked access beyond `[0, len)`
    OutOfRange { index: usize, len: usize },
    /// Insertion or removal position beyond `[0, len]`
    InvalidPosition { position: usize, len: usize },
    /// Range with `start > end` or `end > len`
    InvalidRange { start: usize, end: usize, len: usize },
    /// Zero-sized element types cannot recover their length from a file size
    ZeroSizedElement,
    /// Element alignment exceeds what a page-aligned mapping guarantees
    UnsupportedAlignment { align: usize },
    /// Slot count or byte size does not fit the address space
    CapacityOverflow,
    /// The container has been closed
    Closed,
}

impl FvecError {
    /// Taxonomy class of this error
    pub const fn category(&self) -> ErrorCategory {
        match self {
            FvecError::OutOfRange { .. }
            | FvecError::InvalidPosition { .. }
            | FvecError::InvalidRange { .. } => ErrorCategory::Bounds,
            FvecError::CapacityOverflow => ErrorCategory::Mapping,
            FvecError::ZeroSizedElement
            | FvecError::UnsupportedAlignment { .. }
            | FvecError::Closed => ErrorCategory::Usage,
        }
    }
}

impl core::fmt::Display for FvecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FvecError::OutOfRange { index, len } => {
                write!(f, "Index {index} out of range for length {len}")
            }
            FvecError::InvalidPosition { position, len } => {
                write!(f, "Position {position} invalid for length {len}")
            }
            FvecError::InvalidRange { start, end, len } => {
                write!(f, "Range {start}..{end} invalid for length {len}")
            }
            FvecError::ZeroSizedElement => write!(f, "Zero-sized element types are not supported"),
            FvecError::UnsupportedAlignment { align } => {
                write!(f, "Element alignment {align} exceeds mapping alignment")
            }
            FvecError::CapacityOverflow => write!(f, "Capacity calculation would overflow"),
            FvecError::Closed => write!(f, "File vector is closed"),
        }
    }
}

impl core::error::Error for FvecError {}

/// Result type for core operations
pub type Result<T> = core::result::Result<T, FvecError>;
