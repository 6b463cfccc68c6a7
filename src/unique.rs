use crate::raw::RawUnique;
use crate::{Deleter, ObjectDeleter};
use alloc::boxed::Box;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Deref, DerefMut};
use core::ptr::NonNull;

/// A pointer that is the single owner of one heap object.
///
/// A `UniquePtr` is either _empty_ or _owning_. While owning, it is the only thing allowed to
/// release the pointee, and it does so exactly once: when it is dropped, when it is
/// [cleared](UniquePtr::clear) or [reset](UniquePtr::reset), or when it is overwritten by
/// assignment. Ownership moves with the value; there is no way to duplicate it, so `UniquePtr`
/// is deliberately not `Clone`.
///
/// How the pointee is released is decided by the deleter `D`, which the handle stores by value.
/// The default, [`ObjectDeleter`], pairs with [`Box`] allocation.
///
/// ```
/// use solo::{make_unique, UniquePtr};
///
/// let mut a = make_unique(42);
/// assert_eq!(*a, 42);
///
/// // Moving out through `take` leaves the source empty.
/// let b = a.take();
/// assert!(!a.is_owning());
/// assert!(b.is_owning());
/// assert_eq!(*b, 42);
/// ```
///
/// Comparisons and hashing look only at the identity of the owned allocation, never at the
/// pointee's value or at the deleter. An empty handle orders before every owning one. Pointees
/// of zero size all live at the same dangling address, so handles to them compare equal.
pub struct UniquePtr<T: ?Sized, D: Deleter<T> = ObjectDeleter> {
    raw: RawUnique<T, D>,
}

impl<T> UniquePtr<T> {
    /// Move `value` to the heap and own it.
    pub fn new(value: T) -> Self {
        Self::from(Box::new(value))
    }
}

impl<T: ?Sized> UniquePtr<T> {
    /// Give the pointee back as a `Box`, or `None` if the handle is empty.
    pub fn into_box(self) -> Option<Box<T>> {
        let (ptr, _) = self.raw.into_parts();
        // Safety: with `ObjectDeleter` every owned pointer came from `Box::into_raw`, and
        // `into_parts` relinquished it without releasing it.
        ptr.map(|p| unsafe { Box::from_raw(p.as_ptr()) })
    }
}

impl<T: ?Sized, D: Deleter<T> + Default> UniquePtr<T, D> {
    /// Create an empty handle.
    pub fn null() -> Self {
        Self::null_with_deleter(D::default())
    }

    /// Take ownership of `ptr`, releasing it with a default `D` later on.
    ///
    /// A null `ptr` produces an empty handle.
    ///
    /// # Safety
    ///
    /// `ptr` must be null, or it must be valid for `D` to release exactly once. After this call
    /// the caller must not use or release `ptr` through any other path.
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        unsafe { Self::from_raw_with_deleter(ptr, D::default()) }
    }

    /// Move ownership out of `self` into the returned handle, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        core::mem::replace(self, Self::null())
    }
}

impl<T: ?Sized, D: Deleter<T>> UniquePtr<T, D> {
    /// Create an empty handle that will use `deleter` for whatever it owns later.
    pub const fn null_with_deleter(deleter: D) -> Self {
        Self {
            raw: RawUnique::empty(deleter),
        }
    }

    /// Take ownership of `ptr`, releasing it with `deleter` later on.
    ///
    /// # Safety
    ///
    /// Same as [`UniquePtr::from_raw`], with `deleter` in place of a default `D`.
    pub unsafe fn from_raw_with_deleter(ptr: *mut T, deleter: D) -> Self {
        Self {
            raw: unsafe { RawUnique::from_parts(NonNull::new(ptr), deleter) },
        }
    }

    /// Returns `true` if the handle currently owns a resource.
    pub fn is_owning(&self) -> bool {
        self.raw.is_owning()
    }

    /// Returns `true` if the handle is empty.
    pub fn is_null(&self) -> bool {
        !self.raw.is_owning()
    }

    /// The owned pointer, without affecting ownership.
    pub fn get(&self) -> Option<NonNull<T>> {
        self.raw.get()
    }

    /// Shared access to the pointee, or `None` when empty.
    pub fn as_ref(&self) -> Option<&T> {
        // Safety: an owned pointer refers to a live `T` for as long as we own it, and `&self`
        // keeps it owned.
        self.raw.get().map(|p| unsafe { p.as_ref() })
    }

    /// Exclusive access to the pointee, or `None` when empty.
    pub fn as_mut(&mut self) -> Option<&mut T> {
        // Safety: as in `as_ref`, and `&mut self` makes the access exclusive.
        self.raw.get().map(|mut p| unsafe { p.as_mut() })
    }

    /// The deleter that will release the owned resource.
    pub fn deleter(&self) -> &D {
        self.raw.deleter()
    }

    /// Mutable access to the stored deleter.
    pub fn deleter_mut(&mut self) -> &mut D {
        self.raw.deleter_mut()
    }

    /// Exchange the owned resources and deleters of two handles. Nothing is released.
    pub fn swap(&mut self, other: &mut Self) {
        self.raw.swap(&mut other.raw);
    }

    /// Give up ownership without releasing anything.
    ///
    /// The returned pointer (if any) becomes the caller's responsibility; the handle is left
    /// empty and will not touch it again.
    #[must_use = "the released pointer leaks unless it is freed"]
    pub fn release(&mut self) -> Option<NonNull<T>> {
        self.raw.release()
    }

    /// Release the current resource, if any, and take ownership of `ptr` (which may be null).
    ///
    /// Resetting to the pointer the handle already owns does nothing: the resource is neither
    /// released nor given up. Zero-sized pointees have no allocation to share, so for them the
    /// old value is always released.
    ///
    /// # Safety
    ///
    /// Same as [`UniquePtr::from_raw_with_deleter`] for `ptr`, using the handle's current
    /// deleter.
    pub unsafe fn reset(&mut self, ptr: *mut T) {
        let ptr = NonNull::new(ptr);
        // Safety: an owned pointer refers to a live `T`.
        let aliased = self
            .raw
            .owns_allocation(ptr, |cur| core::mem::size_of_val(unsafe { cur.as_ref() }) != 0);
        unsafe { self.raw.reset(ptr, aliased) }
    }

    /// Release the current resource, if any, and become empty.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Split the handle into its pointer and deleter without releasing anything.
    pub fn into_parts(self) -> (Option<NonNull<T>>, D) {
        self.raw.into_parts()
    }
}

impl<T, D: Deleter<T>> UniquePtr<T, D> {
    /// The owned pointer as a raw pointer; null when empty.
    pub fn as_ptr(&self) -> *mut T {
        self.raw
            .get()
            .map_or(core::ptr::null_mut(), NonNull::as_ptr)
    }
}

impl<T: ?Sized, D: Deleter<T> + Default> Default for UniquePtr<T, D> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized> From<Box<T>> for UniquePtr<T> {
    fn from(b: Box<T>) -> Self {
        // Safety: the pointer comes straight from a Box, which is what ObjectDeleter releases.
        unsafe { Self::from_raw(Box::into_raw(b)) }
    }
}

#[cold]
#[track_caller]
fn deref_empty() -> ! {
    panic!("dereferenced an empty UniquePtr")
}

/// Panics if the handle is empty.
impl<T: ?Sized, D: Deleter<T>> Deref for UniquePtr<T, D> {
    type Target = T;

    #[track_caller]
    fn deref(&self) -> &T {
        match self.as_ref() {
            Some(v) => v,
            None => deref_empty(),
        }
    }
}

/// Panics if the handle is empty.
impl<T: ?Sized, D: Deleter<T>> DerefMut for UniquePtr<T, D> {
    #[track_caller]
    fn deref_mut(&mut self) -> &mut T {
        match self.as_mut() {
            Some(v) => v,
            None => deref_empty(),
        }
    }
}

impl<T1, D1, T2, D2> PartialEq<UniquePtr<T2, D2>> for UniquePtr<T1, D1>
where
    T1: ?Sized,
    T2: ?Sized,
    D1: Deleter<T1>,
    D2: Deleter<T2>,
{
    fn eq(&self, other: &UniquePtr<T2, D2>) -> bool {
        self.raw.addr() == other.raw.addr()
    }
}

impl<T: ?Sized, D: Deleter<T>> Eq for UniquePtr<T, D> {}

impl<T1, D1, T2, D2> PartialOrd<UniquePtr<T2, D2>> for UniquePtr<T1, D1>
where
    T1: ?Sized,
    T2: ?Sized,
    D1: Deleter<T1>,
    D2: Deleter<T2>,
{
    fn partial_cmp(&self, other: &UniquePtr<T2, D2>) -> Option<Ordering> {
        Some(self.raw.addr().cmp(&other.raw.addr()))
    }
}

impl<T: ?Sized, D: Deleter<T>> Ord for UniquePtr<T, D> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.addr().cmp(&other.raw.addr())
    }
}

impl<T: ?Sized, D: Deleter<T>> Hash for UniquePtr<T, D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.addr().hash(state);
    }
}

impl<T: ?Sized + fmt::Debug, D: Deleter<T>> fmt::Debug for UniquePtr<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_ref() {
            Some(v) => f.debug_tuple("UniquePtr").field(&v).finish(),
            None => f.write_str("UniquePtr(null)"),
        }
    }
}

/// Writes the pointee; an empty handle writes nothing.
impl<T: ?Sized + fmt::Display, D: Deleter<T>> fmt::Display for UniquePtr<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_ref() {
            Some(v) => fmt::Display::fmt(v, f),
            None => Ok(()),
        }
    }
}

impl<T: ?Sized, D: Deleter<T>> fmt::Pointer for UniquePtr<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let addr = self
            .raw
            .addr()
            .map_or(core::ptr::null(), |p| p.as_ptr() as *const u8);
        fmt::Pointer::fmt(&addr, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;

    #[test]
    fn display_matches_pointee() {
        let p = UniquePtr::new(42);
        assert_eq!(format!("{}", p), "42");
        assert_eq!(format!("{:?}", p), "UniquePtr(42)");

        let empty = UniquePtr::<i32>::null();
        assert_eq!(format!("{}", empty), "");
        assert_eq!(format!("{:?}", empty), "UniquePtr(null)");
    }

    #[test]
    fn pointer_format_is_address() {
        let p = UniquePtr::new(1u16);
        assert_eq!(format!("{:p}", p), format!("{:p}", p.as_ptr()));
        let empty = UniquePtr::<u16>::null();
        assert_eq!(format!("{:p}", empty), format!("{:p}", core::ptr::null::<u8>()));
    }

    #[test]
    fn unsized_pointee() {
        let b: Box<dyn fmt::Display> = Box::new(String::from("hi"));
        let p: UniquePtr<dyn fmt::Display> = UniquePtr::from(b);
        assert_eq!(format!("{}", p), "hi");
        assert!(p.into_box().is_some());

        let s: UniquePtr<str> = UniquePtr::from(Box::<str>::from("abc"));
        assert_eq!(s.len(), 3);
    }

    #[test]
    #[should_panic(expected = "dereferenced an empty UniquePtr")]
    fn deref_empty_panics() {
        let p = UniquePtr::<i32>::null();
        let _v: i32 = *p;
    }

    #[test]
    fn into_box_round_trip() {
        let p = UniquePtr::new(9);
        let b = p.into_box().expect("owning handle");
        assert_eq!(*b, 9);
        assert!(UniquePtr::<i32>::null().into_box().is_none());
    }
}
