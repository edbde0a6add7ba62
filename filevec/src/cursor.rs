//! Random-access cursors over a file vector's live elements
//!
//! A cursor is a position in either forward or reverse order. It borrows the
//! vector, so no operation that may remap can run while a cursor exists;
//! a stale cursor is a compile error rather than a dangling address.
//!
//! Positions run from `0` (the first element in the cursor's direction) to
//! `len` (one past the last). Positions outside `[0, len)` are allowed as
//! arithmetic intermediates but dereference to `None`.

use crate::FileVec;
use filevec_core::FileElement;
use std::{
    cmp::Ordering,
    ops::{Add, AddAssign, Sub, SubAssign},
};

/// Traversal order of a cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Map a directional position to a slot index
fn slot_of(direction: Direction, len: usize, position: isize) -> Option<usize> {
    if position < 0 || position as usize >= len {
        return None;
    }
    match direction {
        Direction::Forward => Some(position as usize),
        Direction::Reverse => Some(len - 1 - position as usize),
    }
}

/// Shared random-access cursor
#[derive(Debug)]
pub struct Cursor<'a, T> {
    slots: &'a [T],
    position: isize,
    direction: Direction,
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(slots: &'a [T], position: isize, direction: Direction) -> Self {
        Self {
            slots,
            position,
            direction,
        }
    }

    /// Element under the cursor
    pub fn get(&self) -> Option<&'a T> {
        self.peek(0)
    }

    /// Element `offset` steps away from the cursor, in its direction
    pub fn peek(&self, offset: isize) -> Option<&'a T> {
        let slot = slot_of(self.direction, self.slots.len(), self.position + offset)?;
        self.slots.get(slot)
    }

    /// Step forward in the cursor's direction
    pub fn move_next(&mut self) -> &mut Self {
        self.position += 1;
        self
    }

    /// Step backward in the cursor's direction
    pub fn move_prev(&mut self) -> &mut Self {
        self.position -= 1;
        self
    }

    pub fn position(&self) -> isize {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Slot index in the vector, if the cursor is on an element
    pub fn index(&self) -> Option<usize> {
        slot_of(self.direction, self.slots.len(), self.position)
    }

    /// Yield the current element, then step forward
    pub fn step(&mut self) -> Option<&'a T> {
        let current = self.get()?;
        self.position += 1;
        Some(current)
    }

    /// Traverse the remaining elements without moving this cursor
    pub fn iter(&self) -> Iter<'a, T> {
        Iter { cursor: *self }
    }

    /// Whether the cursor sits one past the last element
    pub fn is_end(&self) -> bool {
        self.position == self.slots.len() as isize
    }

    fn same_sequence(&self, other: &Self) -> bool {
        std::ptr::eq(self.slots, other.slots) && self.direction == other.direction
    }
}

/// Iterator over the elements from a cursor's position to the end, in its direction
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    cursor: Cursor<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.cursor.step()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match usize::try_from(self.cursor.position) {
            Ok(position) => self.cursor.slots.len().saturating_sub(position),
            Err(_) => 0,
        };
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for Cursor<'a, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        Iter { cursor: self }
    }
}

impl<T> Add<isize> for Cursor<'_, T> {
    type Output = Self;

    fn add(mut self, offset: isize) -> Self {
        self.position += offset;
        self
    }
}

impl<T> Sub<isize> for Cursor<'_, T> {
    type Output = Self;

    fn sub(mut self, offset: isize) -> Self {
        self.position -= offset;
        self
    }
}

impl<T> AddAssign<isize> for Cursor<'_, T> {
    fn add_assign(&mut self, offset: isize) {
        self.position += offset;
    }
}

impl<T> SubAssign<isize> for Cursor<'_, T> {
    fn sub_assign(&mut self, offset: isize) {
        self.position -= offset;
    }
}

/// Distance between two cursors over the same sequence
impl<'a, T> Sub for Cursor<'a, T> {
    type Output = isize;

    fn sub(self, other: Self) -> isize {
        debug_assert!(self.same_sequence(&other));
        self.position - other.position
    }
}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_sequence(other) && self.position == other.position
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> PartialOrd for Cursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.same_sequence(other)
            .then(|| self.position.cmp(&other.position))
    }
}

/// Mutable random-access cursor
#[derive(Debug)]
pub struct CursorMut<'a, T> {
    slots: &'a mut [T],
    position: isize,
    direction: Direction,
}

impl<'a, T> CursorMut<'a, T> {
    pub(crate) fn new(slots: &'a mut [T], position: isize, direction: Direction) -> Self {
        Self {
            slots,
            position,
            direction,
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.peek(0)
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.peek_mut(0)
    }

    /// Element `offset` steps away from the cursor, in its direction
    pub fn peek(&self, offset: isize) -> Option<&T> {
        let slot = slot_of(self.direction, self.slots.len(), self.position + offset)?;
        self.slots.get(slot)
    }

    pub fn peek_mut(&mut self, offset: isize) -> Option<&mut T> {
        let slot = slot_of(self.direction, self.slots.len(), self.position + offset)?;
        self.slots.get_mut(slot)
    }

    pub fn move_next(&mut self) -> &mut Self {
        self.position += 1;
        self
    }

    pub fn move_prev(&mut self) -> &mut Self {
        self.position -= 1;
        self
    }

    pub fn position(&self) -> isize {
        self.position
    }

    pub fn index(&self) -> Option<usize> {
        slot_of(self.direction, self.slots.len(), self.position)
    }

    pub fn is_end(&self) -> bool {
        self.position == self.slots.len() as isize
    }

    /// Shared view at the same position
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::new(self.slots, self.position, self.direction)
    }
}

impl<T> AddAssign<isize> for CursorMut<'_, T> {
    fn add_assign(&mut self, offset: isize) {
        self.position += offset;
    }
}

impl<T> SubAssign<isize> for CursorMut<'_, T> {
    fn sub_assign(&mut self, offset: isize) {
        self.position -= offset;
    }
}

impl<T: FileElement> FileVec<T> {
    /// Cursor on the first element
    pub fn cursor(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), 0, Direction::Forward)
    }

    /// Cursor one past the last element
    pub fn cursor_end(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), self.len() as isize, Direction::Forward)
    }

    /// Cursor on slot `index`
    pub fn cursor_at(&self, index: usize) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), index as isize, Direction::Forward)
    }

    /// Reverse cursor on the last element
    pub fn rcursor(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), 0, Direction::Reverse)
    }

    /// Reverse cursor one before the first element
    pub fn rcursor_end(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), self.len() as isize, Direction::Reverse)
    }

    pub fn cursor_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self.as_mut_slice(), 0, Direction::Forward)
    }

    pub fn rcursor_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self.as_mut_slice(), 0, Direction::Reverse)
    }
}
