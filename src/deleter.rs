use alloc::boxed::Box;
use core::marker::PhantomData;
use core::ptr::NonNull;

/// A strategy for releasing a resource that a handle owns.
///
/// The handle treats its deleter as an opaque capability: it stores one by value next to the
/// pointer, and calls [`Deleter::delete`] exactly once when it gives the resource up. Anything
/// that knows how to tear down a `T` can be a deleter, e.g. returning a slot to a pool or closing
/// a file descriptor instead of freeing memory.
pub trait Deleter<T: ?Sized> {
    /// Release the resource behind `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must have been allocated by the allocation method this deleter pairs with.
    /// delete must be called at most once for each `ptr`.
    unsafe fn delete(&mut self, ptr: NonNull<T>);
}

/// A deleter that remembers how many elements the array it releases was allocated with.
///
/// The owning handle never stores a length of its own; safe positional access on
/// [`UniqueArray`](crate::UniqueArray) is only offered when the deleter can answer this.
pub trait Extent {
    /// Number of elements in the allocation this deleter releases.
    fn extent(&self) -> usize;
}

impl<T: ?Sized> Deleter<T> for unsafe fn(*mut T) {
    unsafe fn delete(&mut self, ptr: NonNull<T>) {
        unsafe { (*self)(ptr.as_ptr()) }
    }
}

impl<T: ?Sized, D: Deleter<T> + ?Sized> Deleter<T> for &mut D {
    unsafe fn delete(&mut self, ptr: NonNull<T>) {
        unsafe { (**self).delete(ptr) }
    }
}

impl<D: Extent + ?Sized> Extent for &mut D {
    fn extent(&self) -> usize {
        (**self).extent()
    }
}

/// The default deleter for single objects.
///
/// Releases a pointer that came from a [`Box`], running the pointee's destructor and freeing its
/// storage. It carries no state, so a single value serves every pointee type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ObjectDeleter;

impl<T: ?Sized> Deleter<T> for ObjectDeleter {
    unsafe fn delete(&mut self, ptr: NonNull<T>) {
        // Safety: by the contract on `delete`, `ptr` was produced by `Box::into_raw` (or an
        // allocation with the identical layout) and has not been released yet.
        drop(unsafe { Box::from_raw(ptr.as_ptr()) });
    }
}

/// The default deleter for arrays.
///
/// Releases a pointer to the first element of a boxed slice of exactly `len` elements, dropping
/// each element before the storage is freed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ArrayDeleter {
    len: usize,
}

impl ArrayDeleter {
    /// Create a deleter for an array of `len` elements.
    pub const fn new(len: usize) -> Self {
        Self { len }
    }

    /// Number of elements in the array this deleter releases.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for a zero-length array.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Deleter<T> for ArrayDeleter {
    unsafe fn delete(&mut self, ptr: NonNull<T>) {
        let slice = core::ptr::slice_from_raw_parts_mut(ptr.as_ptr(), self.len);
        // Safety: by the contract on `delete`, `ptr` is the start of a `Box<[T]>` with `len`
        // elements that has not been released yet.
        drop(unsafe { Box::from_raw(slice) });
    }
}

impl Extent for ArrayDeleter {
    fn extent(&self) -> usize {
        self.len
    }
}

/// Adapts a closure into a [`Deleter`].
///
/// ```
/// use solo::{FnDeleter, UniquePtr};
/// use core::ptr::NonNull;
///
/// let mut released = 0;
/// let raw = Box::into_raw(Box::new(7));
/// let p = unsafe {
///     UniquePtr::from_raw_with_deleter(
///         raw,
///         FnDeleter::new(|p: NonNull<i32>| {
///             released += 1;
///             drop(unsafe { Box::from_raw(p.as_ptr()) });
///         }),
///     )
/// };
/// drop(p);
/// assert_eq!(released, 1);
/// ```
pub struct FnDeleter<F, T: ?Sized> {
    f: F,
    _pointee: PhantomData<fn(NonNull<T>)>,
}

impl<F, T: ?Sized> FnDeleter<F, T>
where
    F: FnMut(NonNull<T>),
{
    /// Wrap `f`, which is called once with each pointer the handle gives up.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _pointee: PhantomData,
        }
    }

    /// Unwrap the closure, e.g. to release a pointer taken out with `into_parts` by hand.
    pub fn into_inner(self) -> F {
        self.f
    }
}

impl<F, T: ?Sized> Deleter<T> for FnDeleter<F, T>
where
    F: FnMut(NonNull<T>),
{
    unsafe fn delete(&mut self, ptr: NonNull<T>) {
        (self.f)(ptr)
    }
}

impl<F, T: ?Sized> core::fmt::Debug for FnDeleter<F, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnDeleter").finish_non_exhaustive()
    }
}

pub mod deleters {
    use alloc::boxed::Box;

    /// Runs the pointee's destructor without freeing its storage.
    ///
    /// Useful when the storage is owned elsewhere (an arena, a stack buffer that outlives the
    /// handle), but leaks the allocation if the pointer came from a `Box`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes and point to an initialized `T`.
    pub unsafe fn drop_in_place<T: ?Sized>(ptr: *mut T) {
        // Safety: guaranteed by the caller.
        unsafe { core::ptr::drop_in_place(ptr) };
    }

    /// # Safety
    ///
    /// Can only be used on values that were originally derived from a Box.
    pub unsafe fn drop_box<T: ?Sized>(ptr: *mut T) {
        // Safety: only used for pointers produced by Box::into_raw.
        let _ = unsafe { Box::from_raw(ptr) };
    }
}
