//! Element categories and lifecycle policies
//!
//! Mapped memory is raw bytes: nothing runs a constructor when a file is
//! mapped, and nothing runs a destructor when it is unmapped. Every element
//! type therefore selects, at compile time, a [`Lifecycle`] policy that knows
//! how to construct values into uninitialized slots and destroy live ones.
//!
//! - [`Trivial`]: plain-old-data ([`bytemuck::Pod`]). Construction is a byte
//!   copy, default construction and destruction are no-ops.
//! - [`NonTrivial`]: any [`Clone`] type. Construction clones into the slot,
//!   destruction runs the destructor in place.

use bytemuck::Pod;
use core::ptr;

/// Construction and destruction of elements in raw slots
///
/// All raw-pointer operations require `dst`/`first` to be valid, aligned,
/// and point at `count` slots inside one allocation or mapping. Construct
/// operations write into slots that hold no live value; `destroy` requires
/// every slot in range to hold a live value and leaves them uninitialized.
pub trait Lifecycle<T> {
    /// Whether construction and destruction are pure byte operations
    const TRIVIAL: bool;

    /// Construct `count` default values at `dst`
    ///
    /// # Safety
    /// `dst..dst+count` must be writable slots holding no live value.
    unsafe fn construct_default(dst: *mut T, count: usize)
    where
        T: Default;

    /// Construct `count` copies of `value` at `dst`
    ///
    /// # Safety
    /// `dst..dst+count` must be writable slots holding no live value.
    unsafe fn construct_fill(dst: *mut T, count: usize, value: &T);

    /// Construct a copy of every element of `src`, in order, at `dst`
    ///
    /// # Safety
    /// `dst..dst+src.len()` must be writable slots holding no live value and
    /// must not overlap `src`.
    unsafe fn construct_from(dst: *mut T, src: &[T]);

    /// Destroy `count` live values at `first`
    ///
    /// # Safety
    /// Every slot in `first..first+count` must hold a live value; none may
    /// be read again before being reconstructed.
    unsafe fn destroy(first: *mut T, count: usize);

    /// Overwrite live values with copies of `src`
    fn assign_from(dst: &mut [T], src: &[T]);

    /// Overwrite live values with copies of `value`
    fn assign_fill(dst: &mut [T], value: &T);

    /// Move `value` into an empty slot
    ///
    /// # Safety
    /// `dst` must be a writable slot holding no live value.
    unsafe fn construct_one(dst: *mut T, value: T) {
        ptr::write(dst, value);
    }

    /// Destroy one live value
    ///
    /// # Safety
    /// `target` must hold a live value.
    unsafe fn destroy_one(target: *mut T) {
        Self::destroy(target, 1);
    }
}

/// Lifecycle policy for plain-old-data elements
#[derive(Debug, Clone, Copy, Default)]
pub struct Trivial;

/// Lifecycle policy for elements with construction or destruction side effects
#[derive(Debug, Clone, Copy, Default)]
pub struct NonTrivial;

impl<T: Pod> Lifecycle<T> for Trivial {
    const TRIVIAL: bool = true;

    // Any bit pattern is a valid `T`, so the slot bytes already are a value.
    unsafe fn construct_default(_dst: *mut T, _count: usize)
    where
        T: Default,
    {
    }

    unsafe fn construct_fill(dst: *mut T, count: usize, value: &T) {
        for i in 0..count {
            dst.add(i).write(*value);
        }
    }

    unsafe fn construct_from(dst: *mut T, src: &[T]) {
        ptr::copy_nonoverlapping(src.as_ptr(), dst, src.len());
    }

    unsafe fn destroy(_first: *mut T, _count: usize) {}

    fn assign_from(dst: &mut [T], src: &[T]) {
        dst.copy_from_slice(src);
    }

    fn assign_fill(dst: &mut [T], value: &T) {
        dst.fill(*value);
    }
}

impl<T: Clone> Lifecycle<T> for NonTrivial {
    const TRIVIAL: bool = false;

    unsafe fn construct_default(dst: *mut T, count: usize)
    where
        T: Default,
    {
        for i in 0..count {
            dst.add(i).write(T::default());
        }
    }

    unsafe fn construct_fill(dst: *mut T, count: usize, value: &T) {
        for i in 0..count {
            dst.add(i).write(value.clone());
        }
    }

    unsafe fn construct_from(dst: *mut T, src: &[T]) {
        for (i, value) in src.iter().enumerate() {
            dst.add(i).write(value.clone());
        }
    }

    unsafe fn destroy(first: *mut T, count: usize) {
        ptr::drop_in_place(ptr::slice_from_raw_parts_mut(first, count));
    }

    fn assign_from(dst: &mut [T], src: &[T]) {
        dst.clone_from_slice(src);
    }

    fn assign_fill(dst: &mut [T], value: &T) {
        for slot in dst {
            slot.clone_from(value);
        }
    }
}

/// Types that can be stored in a file-backed vector
///
/// The associated [`Policy`](FileElement::Policy) selects how values are
/// constructed in and destroyed from raw mapped slots.
///
/// # Safety
///
/// Implementors guarantee that a value's bytes are self-contained and
/// position independent: the type holds no pointers, references or handles
/// to memory outside its own bytes. Values live at a mapped address that
/// changes on every remap and persist across process restarts, and a byte
/// image written by one process is read back as a live value by the next.
///
/// ```rust
/// use filevec_core::{FileElement, Trivial};
///
/// #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
/// #[repr(C)]
/// struct Point {
///     x: f32,
///     y: f32,
/// }
///
/// unsafe impl FileElement for Point {
///     type Policy = Trivial;
/// }
/// ```
pub unsafe trait FileElement: Clone + Sized {
    /// Lifecycle policy for this element category
    type Policy: Lifecycle<Self>;

    /// Get the size in bytes of this element type
    fn size_bytes() -> usize {
        core::mem::size_of::<Self>()
    }

    /// Whether this type uses the trivial lifecycle policy
    fn is_trivial() -> bool {
        <Self::Policy as Lifecycle<Self>>::TRIVIAL
    }
}

/// Implement [`FileElement`] with the [`Trivial`] policy for `Pod` types
#[macro_export]
macro_rules! trivial_elements {
    ($($type:ty),* $(,)?) => {
        $(
            unsafe impl $crate::FileElement for $type {
                type Policy = $crate::Trivial;
            }
        )*
    };
}

trivial_elements!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);
