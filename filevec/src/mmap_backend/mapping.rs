//! Owning handle over a backing file and its active mapping
//!
//! `MappedRegion<T>` treats the mapping as `capacity` slots of `T`. It knows
//! nothing about which slots hold live values; the vector tracks that and
//! drives construction, destruction and relocation through the raw slot
//! accessors below.

use super::file_io::{map_file, open_backing_file, resize_file};
use crate::{Error, Result, VecConfig};
use filevec_core::{byte_len_for, element_count_for, validate_alignment, validate_element_type};
use memmap2::MmapMut;
use std::{
    fs::File,
    marker::PhantomData,
    path::{Path, PathBuf},
    ptr,
};
use tracing::{debug, warn};

pub(crate) struct MappedRegion<T> {
    path: PathBuf,
    file: File,
    mmap: MmapMut,
    capacity: usize,
    populate: bool,
    generation: u64,
    _phantom: PhantomData<T>,
}

impl<T> MappedRegion<T> {
    /// Open or create `path` and map it, returning the region and the number
    /// of elements already persisted in the file
    pub(crate) fn open(path: &Path, config: &VecConfig) -> Result<(Self, usize)> {
        validate_element_type::<T>()?;

        let (file, byte_len) = open_backing_file(path)?;
        let (len, trailing) = element_count_for::<T>(byte_len)?;
        if trailing != 0 {
            warn!(
                path = %path.display(),
                byte_len,
                trailing,
                "discarding partial trailing element"
            );
        }

        // Mapping zero bytes is not portable: an empty file gets min_capacity slots.
        let capacity = len.max(config.min_capacity());
        let bytes = byte_len_for::<T>(capacity)?;
        if bytes as u64 != byte_len {
            resize_file(&file, path, bytes as u64)?;
        }

        let mmap = match map_file(&file, path, bytes, config.populate) {
            Ok(mmap) => mmap,
            Err(primary) => return Err(restore_len(&file, primary, byte_len)),
        };
        if let Err(misaligned) = validate_alignment::<T>(mmap.as_ptr()) {
            drop(mmap);
            return Err(restore_len(&file, misaligned.into(), byte_len));
        }

        debug!(path = %path.display(), len, capacity, "opened file vector");

        let region = Self {
            path: path.to_path_buf(),
            file,
            mmap,
            capacity,
            populate: config.populate,
            generation: 0,
            _phantom: PhantomData,
        };
        Ok((region, len))
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Resize the file to `new_capacity` slots and replace the mapping
    ///
    /// The file is resized first, then the new mapping is established, and
    /// only then is the old mapping released, so there is never a moment
    /// without a valid mapping. Both mappings share the file's pages, so
    /// bytes written through the old one are visible through the new one.
    /// On failure the file is restored to its previous length and the old
    /// mapping stays in place.
    pub(crate) fn remap(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity == self.capacity {
            return Ok(());
        }

        let old_bytes = byte_len_for::<T>(self.capacity)? as u64;
        let new_bytes = byte_len_for::<T>(new_capacity)?;

        resize_file(&self.file, &self.path, new_bytes as u64)?;

        let mmap = match map_file(&self.file, &self.path, new_bytes, self.populate) {
            Ok(mmap) => mmap,
            Err(primary) => return Err(restore_len(&self.file, primary, old_bytes)),
        };
        if let Err(misaligned) = validate_alignment::<T>(mmap.as_ptr()) {
            drop(mmap);
            return Err(restore_len(&self.file, misaligned.into(), old_bytes));
        }

        let old_capacity = self.capacity;
        drop(std::mem::replace(&mut self.mmap, mmap));
        self.capacity = new_capacity;
        self.generation += 1;

        debug!(
            path = %self.path.display(),
            old_capacity,
            new_capacity,
            generation = self.generation,
            "remapped file vector"
        );
        Ok(())
    }

    /// Release the mapping and truncate the file to `len` elements
    ///
    /// Every step runs even if an earlier one fails; the first failure is
    /// returned. The file handle is closed when `self` is dropped.
    pub(crate) fn close(self, len: usize, flush: bool) -> Result<()> {
        let MappedRegion {
            path, file, mmap, ..
        } = self;
        let mut first_failure = None;

        if flush {
            if let Err(source) = mmap.flush() {
                first_failure.get_or_insert(Error::Close {
                    path: path.clone(),
                    source,
                });
            }
        }
        drop(mmap);

        match byte_len_for::<T>(len) {
            Ok(bytes) => {
                if let Err(source) = file.set_len(bytes as u64) {
                    first_failure.get_or_insert(Error::Close {
                        path: path.clone(),
                        source,
                    });
                }
            }
            Err(err) => {
                first_failure.get_or_insert(err.into());
            }
        }
        drop(file);

        debug!(path = %path.display(), len, "closed file vector");
        first_failure.map_or(Ok(()), Err)
    }

    fn base(&self) -> *const T {
        self.mmap.as_ptr() as *const T
    }

    fn base_mut(&mut self) -> *mut T {
        self.mmap.as_mut_ptr() as *mut T
    }

    /// Pointer to slot `index`, valid until the next remap
    ///
    /// # Safety
    /// `index <= capacity`.
    pub(crate) unsafe fn slot_mut(&mut self, index: usize) -> *mut T {
        debug_assert!(index <= self.capacity);
        self.base_mut().add(index)
    }

    /// The first `len` slots as live values
    ///
    /// # Safety
    /// `len <= capacity` and every slot in `0..len` holds a live value.
    pub(crate) unsafe fn live(&self, len: usize) -> &[T] {
        debug_assert!(len <= self.capacity);
        std::slice::from_raw_parts(self.base(), len)
    }

    /// The first `len` slots as mutable live values
    ///
    /// # Safety
    /// `len <= capacity` and every slot in `0..len` holds a live value.
    pub(crate) unsafe fn live_mut(&mut self, len: usize) -> &mut [T] {
        debug_assert!(len <= self.capacity);
        std::slice::from_raw_parts_mut(self.base_mut(), len)
    }

    /// Relocate `count` values from `src` down to `dst`, front to back
    ///
    /// Overlap-safe when `dst <= src`. Source slots are left vacated.
    ///
    /// # Safety
    /// `src..src+count` must hold live values, `dst..dst+count` must be
    /// vacated or overlap the source range from below, and both ranges must
    /// lie within capacity.
    pub(crate) unsafe fn move_into_uninitialized_forward(
        &mut self,
        src: usize,
        dst: usize,
        count: usize,
    ) {
        debug_assert!(dst <= src);
        debug_assert!(src + count <= self.capacity);
        let base = self.base_mut();
        for i in 0..count {
            ptr::write(base.add(dst + i), ptr::read(base.add(src + i)));
        }
    }

    /// Relocate `count` values from `src` up to `dst`, back to front
    ///
    /// Overlap-safe when `dst >= src`. Source slots are left vacated.
    ///
    /// # Safety
    /// `src..src+count` must hold live values, `dst..dst+count` must be
    /// vacated or overlap the source range from above, and both ranges must
    /// lie within capacity.
    pub(crate) unsafe fn move_into_uninitialized_backward(
        &mut self,
        src: usize,
        dst: usize,
        count: usize,
    ) {
        debug_assert!(dst >= src);
        debug_assert!(dst + count <= self.capacity);
        let base = self.base_mut();
        for i in (0..count).rev() {
            ptr::write(base.add(dst + i), ptr::read(base.add(src + i)));
        }
    }
}

/// Put the file back to `bytes` after a failed mapping step
///
/// A failure here is reported alongside the primary failure, never instead of it.
fn restore_len(file: &File, primary: Error, bytes: u64) -> Error {
    match file.set_len(bytes) {
        Ok(()) => primary,
        Err(secondary) => Error::Rollback {
            primary: Box::new(primary),
            restore_bytes: bytes,
            secondary,
        },
    }
}
