use crate::{AllocError, UniqueArray, UniquePtr};
use alloc::alloc::Layout;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::ptr::NonNull;

/// Allocate `value` on the heap and wrap it in an owning [`UniquePtr`].
///
/// If the allocation fails, this aborts through the global allocation error handler, the same
/// way [`Box::new`] does. Use [`try_make_unique`] to get the failure back as an error instead.
pub fn make_unique<T>(value: T) -> UniquePtr<T> {
    UniquePtr::new(value)
}

/// Allocate an array of `len` default-initialized elements and wrap it in an owning
/// [`UniqueArray`].
///
/// A `len` of zero still produces an owning handle, to an array with no elements.
///
/// ```
/// let a = solo::make_unique_array::<u8>(3);
/// assert_eq!(a.as_slice(), &[0, 0, 0]);
/// ```
pub fn make_unique_array<T: Default>(len: usize) -> UniqueArray<T> {
    let elems: Box<[T]> = core::iter::repeat_with(T::default).take(len).collect();
    UniqueArray::from(elems)
}

/// Like [`make_unique`], but reports allocation failure to the caller.
///
/// On failure `value` is dropped and no handle is produced.
pub fn try_make_unique<T>(value: T) -> Result<UniquePtr<T>, AllocError> {
    let layout = Layout::new::<T>();
    let ptr = if layout.size() == 0 {
        NonNull::<T>::dangling()
    } else {
        // Safety: the layout has a non-zero size.
        let raw = unsafe { alloc::alloc::alloc(layout) }.cast::<T>();
        match NonNull::new(raw) {
            Some(ptr) => ptr,
            None => return Err(out_of_memory(layout)),
        }
    };
    // Safety: `ptr` is either fresh storage with `T`'s layout or dangling for a zero-sized `T`,
    // and both are valid for writing one `T`.
    unsafe { ptr.as_ptr().write(value) };
    // Safety: memory from the global allocator with `Layout::new::<T>()` (or a dangling pointer
    // for a zero-sized `T`) is exactly what `Box::from_raw`, and so `ObjectDeleter`, accepts.
    Ok(unsafe { UniquePtr::from_raw(ptr.as_ptr()) })
}

/// Like [`make_unique_array`], but reports allocation failure to the caller.
///
/// Storage is reserved before any element is built. If `T::default` panics part way through,
/// the elements built so far are dropped and the storage is freed before the panic continues.
pub fn try_make_unique_array<T: Default>(len: usize) -> Result<UniqueArray<T>, AllocError> {
    let layout = Layout::array::<T>(len).map_err(|_| {
        log::debug!("array of {} elements does not fit a layout", len);
        AllocError::CapacityOverflow { len }
    })?;

    let mut elems = Vec::new();
    elems
        .try_reserve_exact(len)
        .map_err(|_| out_of_memory(layout))?;
    elems.extend(core::iter::repeat_with(T::default).take(len));
    Ok(UniqueArray::from(elems.into_boxed_slice()))
}

fn out_of_memory(layout: Layout) -> AllocError {
    log::debug!(
        "allocation of {} bytes (align {}) failed",
        layout.size(),
        layout.align()
    );
    AllocError::OutOfMemory {
        size: layout.size(),
        align: layout.align(),
    }
}
