//! Backing-file operations
//!
//! Thin wrappers over the file system calls a mapping needs, each attaching
//! the path and byte size to any failure.

use crate::{Error, Result};
use memmap2::{MmapMut, MmapOptions};
use std::{
    fs::{File, OpenOptions},
    path::Path,
};

/// Open or create a backing file for reading and writing, returning its byte length
pub(crate) fn open_backing_file(path: &Path) -> Result<(File, u64)> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let byte_len = file
        .metadata()
        .map_err(|source| Error::Metadata {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    Ok((file, byte_len))
}

/// Extend or truncate the backing file to exactly `bytes`
pub(crate) fn resize_file(file: &File, path: &Path, bytes: u64) -> Result<()> {
    file.set_len(bytes).map_err(|source| Error::Resize {
        path: path.to_path_buf(),
        bytes,
        source,
    })
}

/// Map the first `bytes` bytes of the file as shared and writable
pub(crate) fn map_file(file: &File, path: &Path, bytes: usize, populate: bool) -> Result<MmapMut> {
    let mut options = MmapOptions::new();
    options.len(bytes);
    if populate {
        options.populate();
    }

    // SAFETY: MmapOptions::map_mut is unsafe because the file may be modified
    // or truncated by another process while mapped. This is sound because:
    // 1. The file was sized to at least `bytes` before mapping
    // 2. Each backing file is owned by exactly one open vector at a time
    // 3. The mapping is owned by MappedRegion, which never hands out references
    //    that outlive a remap (every remap requires &mut self)
    unsafe {
        options.map_mut(file).map_err(|source| Error::Map {
            path: path.to_path_buf(),
            bytes,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fresh.vec");

        let (_file, byte_len) = open_backing_file(&path).unwrap();

        assert_eq!(byte_len, 0);
        assert!(path.exists());
    }

    #[test]
    fn test_open_reports_path_on_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no/such/dir/data.vec");

        let err = open_backing_file(&path).unwrap_err();

        assert!(matches!(err, Error::Open { .. }));
        assert!(err.to_string().contains("data.vec"));
    }

    #[test]
    fn test_resize_and_map() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sized.vec");
        let (file, _) = open_backing_file(&path).unwrap();

        resize_file(&file, &path, 64).unwrap();
        assert_eq!(file.metadata().unwrap().len(), 64);

        let mut mmap = map_file(&file, &path, 64, false).unwrap();
        mmap[63] = 0xAB;
        assert_eq!(mmap.len(), 64);
        drop(mmap);

        let mmap = map_file(&file, &path, 64, true).unwrap();
        assert_eq!(mmap[63], 0xAB);
    }
}
