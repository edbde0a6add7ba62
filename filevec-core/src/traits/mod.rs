//! Abstract interfaces for file-backed element storage
//!
//! This module defines the element categories and the lifecycle policies
//! that bridge raw mapped bytes and live Rust values.

pub mod element;

pub use element::{FileElement, Lifecycle, NonTrivial, Trivial};
