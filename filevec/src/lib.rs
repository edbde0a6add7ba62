//! FileVec - Growable Vector Backed by a Memory-Mapped File
//!
//! This library provides a random-access sequence container whose elements
//! live directly in a memory-mapped file. Closing the vector leaves the file
//! holding exactly the raw bytes of its elements, and reopening the same path
//! loads them back.
//!
//! ## Architecture
//!
//! FileVec separates policy from I/O:
//!
//! - **filevec-core**: element lifecycle policies, growth policy and validation (no I/O)
//! - **filevec**: the mapping backend, the container and its cursors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use filevec::{FileVec, VecConfig};
//!
//! fn example() -> filevec::Result<()> {
//!     let config = VecConfig::default().with_min_capacity(64);
//!     let mut vec: FileVec<u64> = FileVec::open_with_config("numbers.fvec", config)?;
//!
//!     vec.push(7)?;
//!     vec.insert_n(0, 3, &1)?;
//!     vec.erase(1..2)?;
//!     assert_eq!(vec, [1, 1, 7]);
//!
//!     // Truncates the file to the live elements
//!     vec.close()?;
//!
//!     let reopened: FileVec<u64> = FileVec::open("numbers.fvec")?;
//!     assert_eq!(reopened.len(), 3);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Persistence**: the file is the storage, no serialization step
//! - **Element policies**: plain-data types are copied bytewise, other
//!   `Clone` types are constructed and dropped in place
//! - **Amortized growth**: capacity grows by half on demand, remapping the file
//! - **Safe cursors**: cursors borrow the vector, so remaps cannot dangle them

pub use filevec_core::{
    // Element categories
    FileElement, Lifecycle, NonTrivial, Trivial, trivial_elements,
    // Growth policy
    GROWTH_DENOMINATOR, GROWTH_NUMERATOR, MIN_CAPACITY,
    // Error handling
    ErrorCategory, FvecError,
};

pub mod config;
pub mod cursor;
pub mod error;
pub mod file_vec;
mod mmap_backend;

pub use config::VecConfig;
pub use cursor::{Cursor, CursorMut, Direction};
pub use error::{Error, Result};
pub use file_vec::FileVec;
