#![no_std]

//! FileVec Core - Element Lifecycle and Storage Policy Definitions
//!
//! This crate provides the pure, I/O-free parts of a file-backed vector:
//! element categories and their construction/destruction policies, the
//! capacity growth policy, and size/bounds validation.

pub mod error;
pub mod layout;
pub mod traits;
pub mod validation;

pub use error::*;
pub use layout::*;
pub use traits::*;
pub use validation::*;
