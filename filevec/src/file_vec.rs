//! The file-backed vector container
//!
//! `FileVec<T>` is a growable, random-access sequence whose slots live in a
//! memory-mapped file. The file holds exactly the raw bytes of the live
//! elements once closed, so reopening the same path loads them back.

mod modifiers;

use crate::mmap_backend::MappedRegion;
use crate::{Result, VecConfig};
use filevec_core::{check_index, FileElement, FvecError};
use std::{
    fmt,
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
};
use tracing::warn;

/// Growable vector stored in a memory-mapped file
///
/// Equality and assignment are by value: two vectors backed by different
/// files are equal when they hold equal elements, and assigning into a
/// vector replaces its contents without changing its backing file.
///
/// The persisted format is the raw element image with no header, so it is
/// only readable by the same element layout (size, alignment, padding and
/// byte order) that wrote it.
pub struct FileVec<T: FileElement> {
    path: PathBuf,
    config: VecConfig,
    region: Option<MappedRegion<T>>,
    len: usize,
}

impl<T: FileElement> FileVec<T> {
    /// Open or create the file at `path`, loading any elements it already holds
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, VecConfig::default())
    }

    /// Open or create the file at `path` with explicit configuration
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: VecConfig) -> Result<Self> {
        let path = path.as_ref();
        let (region, len) = MappedRegion::open(path, &config)?;

        Ok(Self {
            path: path.to_path_buf(),
            config,
            region: Some(region),
            len,
        })
    }

    /// Open `path` and replace its contents with `len` default values
    pub fn with_len_default<P: AsRef<Path>>(path: P, len: usize) -> Result<Self>
    where
        T: Default,
    {
        let mut vec = Self::open(path)?;
        vec.assign_default(len)?;
        Ok(vec)
    }

    /// Open `path` and replace its contents with `len` copies of `value`
    pub fn with_len<P: AsRef<Path>>(path: P, len: usize, value: &T) -> Result<Self> {
        let mut vec = Self::open(path)?;
        vec.assign_fill(len, value)?;
        Ok(vec)
    }

    /// Open `path` and replace its contents with copies of `values`
    pub fn from_slice<P: AsRef<Path>>(path: P, values: &[T]) -> Result<Self> {
        let mut vec = Self::open(path)?;
        vec.assign(values)?;
        Ok(vec)
    }

    /// Open `path` and replace its contents with the values of `other`
    ///
    /// The new vector is backed by its own file; only values are copied.
    pub fn from_other<P: AsRef<Path>>(path: P, other: &FileVec<T>) -> Result<Self> {
        Self::from_slice(path, other.as_slice())
    }

    /// Number of live elements
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots backed by the current mapping (0 once closed)
    pub fn capacity(&self) -> usize {
        self.region.as_ref().map_or(0, |region| region.capacity())
    }

    /// Number of remaps performed since opening
    ///
    /// Any borrow of the contents (slices, iterators, cursors) ends before a
    /// remap can happen, so a change here never strands a live reference.
    pub fn generation(&self) -> u64 {
        self.region.as_ref().map_or(0, |region| region.generation())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &VecConfig {
        &self.config
    }

    /// Whether the backing file is still open and mapped
    pub fn is_open(&self) -> bool {
        self.region.is_some()
    }

    pub fn as_slice(&self) -> &[T] {
        match &self.region {
            // SAFETY: slots 0..len always hold live values while open
            Some(region) => unsafe { region.live(self.len) },
            None => &[],
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.region {
            // SAFETY: slots 0..len always hold live values while open
            Some(region) => unsafe { region.live_mut(self.len) },
            None => &mut [],
        }
    }

    /// Raw pointer to slot 0, valid until the next capacity change
    pub fn as_ptr(&self) -> *const T {
        self.as_slice().as_ptr()
    }

    /// Bounds-checked access
    pub fn at(&self, index: usize) -> Result<&T> {
        let index = check_index(index, self.len)?;
        Ok(&self.as_slice()[index])
    }

    /// Bounds-checked mutable access
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let index = check_index(index, self.len)?;
        Ok(&mut self.as_mut_slice()[index])
    }

    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Copy the contents into heap memory
    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }

    /// Raw byte image of the live elements, exactly as persisted on close
    pub fn as_bytes(&self) -> &[u8]
    where
        T: bytemuck::Pod,
    {
        bytemuck::cast_slice(self.as_slice())
    }

    /// Ensure room for at least `extra` more elements without further remapping
    ///
    /// Grows by a factor of 1.5 or to exactly `len + extra`, whichever is larger.
    pub fn reserve(&mut self, extra: usize) -> Result<()> {
        let region = self.region.as_mut().ok_or(FvecError::Closed)?;
        if let Some(new_capacity) =
            filevec_core::required_capacity(self.len, region.capacity(), extra)?
        {
            region.remap(new_capacity)?;
        }
        Ok(())
    }

    /// Remap down to exactly the live elements (never below `min_capacity` slots)
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        let target = self.len.max(self.config.min_capacity());
        let region = self.region.as_mut().ok_or(FvecError::Closed)?;
        region.remap(target)
    }

    /// Unmap, truncate the file to the live elements and close it
    ///
    /// Live elements are not destroyed: they persist in the file and are
    /// loaded again by the next `open`. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        let Some(region) = self.region.take() else {
            return Ok(());
        };
        let len = std::mem::take(&mut self.len);
        region.close(len, self.config.flush_on_close)
    }
}

impl<T: FileElement> Deref for FileVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: FileElement> DerefMut for FileVec<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: FileElement> AsRef<[T]> for FileVec<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<'a, T: FileElement> IntoIterator for &'a FileVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T: FileElement> IntoIterator for &'a mut FileVec<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T: FileElement + PartialEq> PartialEq for FileVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: FileElement + Eq> Eq for FileVec<T> {}

impl<T: FileElement + PartialEq> PartialEq<[T]> for FileVec<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: FileElement + PartialEq> PartialEq<&[T]> for FileVec<T> {
    fn eq(&self, other: &&[T]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: FileElement + PartialEq> PartialEq<Vec<T>> for FileVec<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: FileElement + PartialEq, const N: usize> PartialEq<[T; N]> for FileVec<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: FileElement + PartialEq> PartialEq<FileVec<T>> for Vec<T> {
    fn eq(&self, other: &FileVec<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: FileElement> fmt::Debug for FileVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileVec")
            .field("path", &self.path)
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("open", &self.is_open())
            .finish()
    }
}

impl<T: FileElement> Drop for FileVec<T> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(
                path = %self.path.display(),
                error = %err,
                "suppressed failure while closing file vector on drop"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filevec_core::ErrorCategory;
    use tempfile::tempdir;

    #[test]
    fn test_open_empty() {
        let dir = tempdir().unwrap();
        let vec = FileVec::<u32>::open(dir.path().join("empty")).unwrap();

        assert!(vec.is_empty());
        assert_eq!(vec.capacity(), 1);
        assert_eq!(vec.generation(), 0);
        assert!(vec.is_open());
    }

    #[test]
    fn test_open_failure_is_open_category() {
        let dir = tempdir().unwrap();
        let err = FileVec::<u32>::open(dir.path().join("missing/dir/vec")).unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Open);
    }

    #[test]
    fn test_zero_sized_elements_rejected() {
        #[derive(Clone)]
        struct Nothing;
        unsafe impl FileElement for Nothing {
            type Policy = filevec_core::NonTrivial;
        }

        let dir = tempdir().unwrap();
        let err = FileVec::<Nothing>::open(dir.path().join("zst")).unwrap_err();

        assert!(matches!(
            err,
            crate::Error::Element(FvecError::ZeroSizedElement)
        ));
    }

    #[test]
    fn test_checked_access() {
        let dir = tempdir().unwrap();
        let mut vec = FileVec::from_slice(dir.path().join("at"), &[10u32, 20, 30]).unwrap();

        assert_eq!(*vec.at(0).unwrap(), 10);
        assert_eq!(*vec.at(2).unwrap(), 30);
        assert!(vec.at(3).unwrap_err().is_out_of_range());
        assert!(vec.at(usize::MAX).unwrap_err().is_out_of_range());

        *vec.at_mut(1).unwrap() = 21;
        assert_eq!(vec[1], 21);
        assert!(vec.at_mut(3).is_err());
    }

    #[test]
    fn test_reserve_and_shrink() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reserve");
        let mut vec = FileVec::<u64>::open(&path).unwrap();

        vec.reserve(0).unwrap();
        assert_eq!(vec.generation(), 0);

        vec.reserve(100).unwrap();
        assert_eq!(vec.capacity(), 100);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 800);

        vec.extend_from_slice(&[1, 2, 3]).unwrap();
        vec.shrink_to_fit().unwrap();
        assert_eq!(vec.capacity(), 3);
        assert_eq!(vec, [1, 2, 3]);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 24);
    }

    #[test]
    fn test_close_is_idempotent_and_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("close");
        let mut vec = FileVec::<u32>::open(&path).unwrap();
        vec.reserve(64).unwrap();
        vec.push(7).unwrap();

        vec.close().unwrap();
        vec.close().unwrap();

        assert!(!vec.is_open());
        assert_eq!(vec.len(), 0);
        assert_eq!(vec.capacity(), 0);
        assert!(vec.as_slice().is_empty());
        assert_eq!(std::fs::read(&path).unwrap(), 7u32.to_ne_bytes());

        let err = vec.push(8).unwrap_err();
        assert!(matches!(err, crate::Error::Element(FvecError::Closed)));
    }

    #[test]
    fn test_drop_truncates_like_close() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("drop");
        {
            let mut vec = FileVec::<u16>::open(&path).unwrap();
            vec.reserve(1000).unwrap();
            vec.extend_from_slice(&[1, 2]).unwrap();
        }

        assert_eq!(std::fs::metadata(&path).unwrap().len(), 4);
        assert_eq!(FileVec::<u16>::open(&path).unwrap(), [1, 2]);
    }

    #[test]
    fn test_value_equality_ignores_identity() {
        let dir = tempdir().unwrap();
        let a = FileVec::from_slice(dir.path().join("a"), &[1i64, 2, 3]).unwrap();
        let b = FileVec::from_other(dir.path().join("b"), &a).unwrap();

        assert_eq!(a, b);
        assert_ne!(a.path(), b.path());
        assert_eq!(a, vec![1, 2, 3]);
        assert_eq!(vec![1, 2, 3], a);
        assert_eq!(a, &[1, 2, 3][..]);
        assert_ne!(a, [1, 2]);
    }

    #[test]
    fn test_as_bytes_matches_file_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bytes");
        let mut vec = FileVec::from_slice(&path, &[0x0102u16, 0x0304]).unwrap();
        let image = vec.as_bytes().to_vec();

        vec.close().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), image);
    }

    #[test]
    fn test_iteration() {
        let dir = tempdir().unwrap();
        let mut vec = FileVec::from_slice(dir.path().join("iter"), &[1u8, 2, 3]).unwrap();

        for value in &mut vec {
            *value *= 2;
        }

        let forward: Vec<u8> = vec.iter().copied().collect();
        let backward: Vec<u8> = vec.iter().rev().copied().collect();
        assert_eq!(forward, [2, 4, 6]);
        assert_eq!(backward, [6, 4, 2]);
        assert_eq!((&vec).into_iter().count(), 3);
    }
}
