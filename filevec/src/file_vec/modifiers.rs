//! Modifying operations: append, resize, assign, insert, erase and swap
//!
//! Slots below `len` hold live values; slots from `len` up to capacity are
//! raw mapped bytes. Relocating a value between slots is a bitwise move that
//! vacates its source, so every write into a vacated or raw slot is a
//! construction and only slots that still hold a value are assigned to.
//!
//! While an operation has slots in flux, `len` is lowered to the stable
//! prefix. A panicking `clone` or `drop` then leaks the values beyond it
//! rather than leaving vacated slots inside the live range.

use super::FileVec;
use crate::Result;
use filevec_core::{check_index, check_position, check_range, FileElement, FvecError, Lifecycle};
use std::{ops::RangeBounds, ptr};

/// Values written into a gap opened by an insertion
enum Source<'a, T> {
    One(T),
    Fill(&'a T),
    Slice(&'a [T]),
}

impl<T: FileElement> Source<'_, T> {
    /// # Safety
    /// `dst..dst+count` must be vacated or raw slots, and `count` must match
    /// the number of values this source yields.
    unsafe fn construct(self, dst: *mut T, count: usize) {
        match self {
            Source::One(value) => {
                debug_assert_eq!(count, 1);
                T::Policy::construct_one(dst, value);
            }
            Source::Fill(value) => T::Policy::construct_fill(dst, count, value),
            Source::Slice(values) => {
                debug_assert_eq!(values.len(), count);
                T::Policy::construct_from(dst, values);
            }
        }
    }
}

impl<T: FileElement> FileVec<T> {
    /// Append `value` at the end, growing the mapping if needed
    pub fn push(&mut self, value: T) -> Result<()> {
        self.reserve(1)?;
        let len = self.len;
        let region = self.region.as_mut().ok_or(FvecError::Closed)?;

        // SAFETY: reserve guaranteed slot `len` exists and it holds no value
        unsafe { T::Policy::construct_one(region.slot_mut(len), value) };
        self.len = len + 1;
        Ok(())
    }

    /// Append copies of `values` at the end
    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<()> {
        self.insert_slice(self.len, values).map(|_| ())
    }

    /// Remove the last element and hand it to the caller
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let region = self.region.as_mut()?;
        self.len -= 1;

        // SAFETY: slot `len` held the last live value and is now outside the live range
        Some(unsafe { ptr::read(region.slot_mut(self.len)) })
    }

    /// Destroy every element past `len`
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let old_len = self.len;
        let Some(region) = self.region.as_mut() else {
            return;
        };
        self.len = len;

        // SAFETY: slots len..old_len held live values and are now outside the live range
        unsafe { T::Policy::destroy(region.slot_mut(len), old_len - len) };
    }

    /// Destroy every element
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Shrink by destroying the tail, or grow by constructing copies of `value`
    pub fn resize(&mut self, new_len: usize, value: &T) -> Result<()> {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }

        self.reserve(new_len - self.len)?;
        let len = self.len;
        let region = self.region.as_mut().ok_or(FvecError::Closed)?;

        // SAFETY: slots len..new_len are within capacity and hold no value
        unsafe { T::Policy::construct_fill(region.slot_mut(len), new_len - len, value) };
        self.len = new_len;
        Ok(())
    }

    /// Shrink by destroying the tail, or grow by default-constructing new elements
    ///
    /// For trivial element types default construction is a no-op: new
    /// elements keep whatever bytes the file holds in those slots (zero for
    /// regions the file has just grown into).
    pub fn resize_default(&mut self, new_len: usize) -> Result<()>
    where
        T: Default,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }

        self.reserve(new_len - self.len)?;
        let len = self.len;
        let region = self.region.as_mut().ok_or(FvecError::Closed)?;

        // SAFETY: slots len..new_len are within capacity and hold no value
        unsafe { T::Policy::construct_default(region.slot_mut(len), new_len - len) };
        self.len = new_len;
        Ok(())
    }

    /// Replace the contents with copies of `values`
    ///
    /// Existing elements are reused by assignment where the ranges overlap,
    /// any surplus is destroyed and any shortfall is constructed.
    pub fn assign(&mut self, values: &[T]) -> Result<()> {
        let size = values.len();
        if size <= self.len {
            self.truncate(size);
            T::Policy::assign_from(self.as_mut_slice(), values);
            return Ok(());
        }

        self.reserve(size - self.len)?;
        let len = self.len;
        T::Policy::assign_from(self.as_mut_slice(), &values[..len]);
        let region = self.region.as_mut().ok_or(FvecError::Closed)?;

        // SAFETY: slots len..size are within capacity and hold no value
        unsafe { T::Policy::construct_from(region.slot_mut(len), &values[len..]) };
        self.len = size;
        Ok(())
    }

    /// Replace the contents with `size` copies of `value`
    pub fn assign_fill(&mut self, size: usize, value: &T) -> Result<()> {
        if size <= self.len {
            self.truncate(size);
            T::Policy::assign_fill(self.as_mut_slice(), value);
            return Ok(());
        }

        self.reserve(size - self.len)?;
        let len = self.len;
        T::Policy::assign_fill(self.as_mut_slice(), value);
        let region = self.region.as_mut().ok_or(FvecError::Closed)?;

        // SAFETY: slots len..size are within capacity and hold no value
        unsafe { T::Policy::construct_fill(region.slot_mut(len), size - len, value) };
        self.len = size;
        Ok(())
    }

    /// Replace the contents with `size` default values
    pub fn assign_default(&mut self, size: usize) -> Result<()>
    where
        T: Default,
    {
        self.assign_fill(size, &T::default())
    }

    /// Move `value` in at `position`, shifting later elements up
    ///
    /// Returns the index of the inserted element.
    pub fn insert(&mut self, position: usize, value: T) -> Result<usize> {
        self.insert_from(position, 1, Source::One(value))
    }

    /// Insert `count` copies of `value` at `position`
    ///
    /// Returns the index of the first inserted element. Inserting zero
    /// copies changes nothing and still returns `position`.
    pub fn insert_n(&mut self, position: usize, count: usize, value: &T) -> Result<usize> {
        self.insert_from(position, count, Source::Fill(value))
    }

    /// Insert copies of `values` at `position`
    ///
    /// Returns the index of the first inserted element.
    pub fn insert_slice(&mut self, position: usize, values: &[T]) -> Result<usize> {
        self.insert_from(position, values.len(), Source::Slice(values))
    }

    fn insert_from(
        &mut self,
        position: usize,
        count: usize,
        source: Source<'_, T>,
    ) -> Result<usize> {
        let offset = check_position(position, self.len)?;
        if count == 0 {
            return Ok(offset);
        }

        // Positions are indices, so they stay valid across the remap.
        self.reserve(count)?;
        let len = self.len;
        let tail = len - offset;
        let region = self.region.as_mut().ok_or(FvecError::Closed)?;
        self.len = offset;

        // SAFETY: reserve guaranteed len + count slots. Every move goes from
        // the far end inward, so no value is overwritten before it is read.
        unsafe {
            if count > tail {
                // The whole tail lands at or past the old end, in raw slots.
                region.move_into_uninitialized_backward(offset, offset + count, tail);
            } else {
                // The last `count` values move into raw slots past the old end,
                region.move_into_uninitialized_backward(len - count, len, count);
                // then the rest shifts up into the slots those just vacated.
                region.move_into_uninitialized_backward(offset, offset + count, tail - count);
            }

            // offset..offset + count is now vacated or raw.
            source.construct(region.slot_mut(offset), count);
        }

        self.len = len + count;
        Ok(offset)
    }

    /// Remove and return the element at `index`, shifting later elements down
    pub fn remove(&mut self, index: usize) -> Result<T> {
        let index = check_index(index, self.len)?;
        let len = self.len;
        let region = self.region.as_mut().ok_or(FvecError::Closed)?;

        // SAFETY: `index` holds a live value; after reading it the slot is
        // vacated and the tail moves down over it front to back.
        let value = unsafe {
            let value = ptr::read(region.slot_mut(index));
            region.move_into_uninitialized_forward(index + 1, index, len - index - 1);
            value
        };
        self.len = len - 1;
        Ok(value)
    }

    /// Destroy the elements in `range`, shifting later elements down over the gap
    ///
    /// Returns the index of the first element after the erased run. An
    /// empty range changes nothing and still returns its start.
    pub fn erase<R: RangeBounds<usize>>(&mut self, range: R) -> Result<usize> {
        let range = check_range(range, self.len)?;
        let (start, end) = (range.start, range.end);
        if start == end {
            return Ok(start);
        }

        let len = self.len;
        let region = self.region.as_mut().ok_or(FvecError::Closed)?;
        self.len = start;

        // SAFETY: start..end hold live values; once destroyed those slots are
        // vacated and the tail moves down over them front to back.
        unsafe {
            T::Policy::destroy(region.slot_mut(start), end - start);
            region.move_into_uninitialized_forward(end, start, len - end);
        }

        self.len = len - (end - start);
        Ok(start)
    }

    /// Exchange contents with `other`, leaving each backed by its own file
    ///
    /// Both vectors are grown first, so a mapping failure leaves both unchanged.
    pub fn swap_contents(&mut self, other: &mut FileVec<T>) -> Result<()> {
        self.reserve(other.len.saturating_sub(self.len))?;
        other.reserve(self.len.saturating_sub(other.len))?;

        let mine = self.to_vec();
        self.assign(other.as_slice())?;
        other.assign(&mine)
    }
}
