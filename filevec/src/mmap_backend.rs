//! Memory-mapped storage backend for file vectors
//!
//! This module owns the backing file and its active mapping: opening and
//! sizing the file, establishing and replacing the mapping as capacity
//! changes, and truncating the file to its live contents on close. All raw
//! address arithmetic over the mapping is confined to [`mapping`].

pub(crate) mod file_io;
pub(crate) mod mapping;

pub(crate) use mapping::MappedRegion;
