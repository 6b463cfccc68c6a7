use crate::raw::RawUnique;
use crate::{ArrayDeleter, Deleter, Extent};
use alloc::boxed::Box;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Index, IndexMut};
use core::ptr::NonNull;

/// A pointer that is the single owner of a heap array.
///
/// `UniqueArray` has the same ownership rules as [`UniquePtr`](crate::UniquePtr), but it points
/// at the first element of a contiguous run of `T`s and offers positional access instead of
/// dereferencing to a single `T`.
///
/// The handle itself stores no length. [`get_unchecked`](UniqueArray::get_unchecked) trusts the
/// caller's index. The safe [`Index`] impls and the slice views are only available when the
/// deleter knows the length of the allocation it will release (see [`Extent`]), which the
/// default [`ArrayDeleter`] does.
///
/// ```
/// use solo::make_unique_array;
///
/// let mut a = make_unique_array::<i32>(5);
/// for i in 0..5 {
///     a[i] = i as i32 * 10;
/// }
/// assert_eq!(a.as_slice(), &[0, 10, 20, 30, 40]);
/// ```
pub struct UniqueArray<T, D: Deleter<T> = ArrayDeleter> {
    raw: RawUnique<T, D>,
}

impl<T> UniqueArray<T> {
    /// Give the elements back as a boxed slice, or `None` if the handle is empty.
    pub fn into_boxed_slice(self) -> Option<Box<[T]>> {
        let (ptr, deleter) = self.raw.into_parts();
        let len = deleter.len();
        // Safety: with `ArrayDeleter` every owned pointer is the start of a `Box<[T]>` of
        // `deleter.len()` elements, and `into_parts` relinquished it without releasing it.
        ptr.map(|p| unsafe {
            Box::from_raw(core::ptr::slice_from_raw_parts_mut(p.as_ptr(), len))
        })
    }
}

impl<T, D: Deleter<T> + Default> UniqueArray<T, D> {
    /// Create an empty handle.
    pub fn null() -> Self {
        Self::null_with_deleter(D::default())
    }

    /// Move ownership out of `self` into the returned handle, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        core::mem::replace(self, Self::null())
    }
}

impl<T, D: Deleter<T>> UniqueArray<T, D> {
    /// An empty handle that will use `deleter` for whatever it owns later.
    pub const fn null_with_deleter(deleter: D) -> Self {
        Self {
            raw: RawUnique::empty(deleter),
        }
    }

    /// Take ownership of the array starting at `ptr`, releasing it with `deleter` later on.
    ///
    /// A null `ptr` produces an empty handle.
    ///
    /// # Safety
    ///
    /// `ptr` must be null, or it must point to the first element of an array that is valid for
    /// `deleter` to release exactly once. If `D` implements [`Extent`], every element in
    /// `0..deleter.extent()` must be initialized. After this call the caller must not use or
    /// release `ptr` through any other path.
    pub unsafe fn from_raw_with_deleter(ptr: *mut T, deleter: D) -> Self {
        Self {
            raw: unsafe { RawUnique::from_parts(NonNull::new(ptr), deleter) },
        }
    }

    /// Returns `true` if the handle currently owns an array.
    pub fn is_owning(&self) -> bool {
        self.raw.is_owning()
    }

    /// Returns `true` if the handle is empty.
    pub fn is_null(&self) -> bool {
        !self.raw.is_owning()
    }

    /// Pointer to the first element, without affecting ownership.
    pub fn get(&self) -> Option<NonNull<T>> {
        self.raw.get()
    }

    /// Pointer to the first element; null when empty.
    pub fn as_ptr(&self) -> *mut T {
        self.raw
            .get()
            .map_or(core::ptr::null_mut(), NonNull::as_ptr)
    }

    /// Reference to the element at `index`, with no bounds check.
    ///
    /// # Safety
    ///
    /// The handle must be owning, and `index` must be within the extent the array was
    /// allocated with.
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(self.is_owning(), "indexed an empty UniqueArray");
        unsafe { &*self.as_ptr().add(index) }
    }

    /// Mutable reference to the element at `index`, with no bounds check.
    ///
    /// # Safety
    ///
    /// Same as [`UniqueArray::get_unchecked`].
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(self.is_owning(), "indexed an empty UniqueArray");
        unsafe { &mut *self.as_ptr().add(index) }
    }

    /// The deleter that will release the owned array.
    pub fn deleter(&self) -> &D {
        self.raw.deleter()
    }

    /// Mutable access to the stored deleter.
    pub fn deleter_mut(&mut self) -> &mut D {
        self.raw.deleter_mut()
    }

    /// Exchange the owned arrays and deleters of two handles. Nothing is released.
    pub fn swap(&mut self, other: &mut Self) {
        self.raw.swap(&mut other.raw);
    }

    /// Give up ownership without releasing anything.
    ///
    /// The deleter stays with the handle; use [`UniqueArray::into_parts`] if it is needed to
    /// free the array later.
    #[must_use = "the released pointer leaks unless it is freed"]
    pub fn release(&mut self) -> Option<NonNull<T>> {
        self.raw.release()
    }

    /// Release the current array, if any, and take ownership of the one at `ptr`.
    ///
    /// Resetting to the pointer the handle already owns does nothing, unless `T` is zero-sized:
    /// such arrays all start at the same dangling address, so the old one is always released.
    ///
    /// # Safety
    ///
    /// Same as [`UniqueArray::from_raw_with_deleter`] for `ptr`, using the handle's current
    /// deleter. With [`ArrayDeleter`] that means the new array must have the same length as the
    /// old one; use [`UniqueArray::reset_with_deleter`] otherwise.
    pub unsafe fn reset(&mut self, ptr: *mut T) {
        let ptr = NonNull::new(ptr);
        let aliased = self.owns_allocation(ptr);
        unsafe { self.raw.reset(ptr, aliased) }
    }

    /// Release the current array with the current deleter, then own the array at `ptr` and
    /// release it with `deleter` later on.
    ///
    /// This is how an array of a different length is installed when the deleter records the
    /// extent. Passing the array the handle already owns only replaces the deleter.
    ///
    /// # Safety
    ///
    /// Same as [`UniqueArray::from_raw_with_deleter`].
    pub unsafe fn reset_with_deleter(&mut self, ptr: *mut T, deleter: D) {
        let ptr = NonNull::new(ptr);
        let aliased = self.owns_allocation(ptr);
        unsafe { self.raw.reset_with_deleter(ptr, deleter, aliased) }
    }

    fn owns_allocation(&self, ptr: Option<NonNull<T>>) -> bool {
        self.raw
            .owns_allocation(ptr, |_| core::mem::size_of::<T>() != 0)
    }

    /// Release the current array, if any, and become empty.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Split the handle into its pointer and deleter without releasing anything.
    pub fn into_parts(self) -> (Option<NonNull<T>>, D) {
        self.raw.into_parts()
    }
}

impl<T, D: Deleter<T> + Extent> UniqueArray<T, D> {
    /// Number of elements, as recorded by the deleter. An empty handle has length 0.
    pub fn len(&self) -> usize {
        if self.is_owning() {
            self.deleter().extent()
        } else {
            0
        }
    }

    /// Returns `true` if the handle is empty or owns a zero-length array.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[T] {
        match self.raw.get() {
            // Safety: the deleter's extent covers exactly the initialized elements we own.
            Some(p) => unsafe { core::slice::from_raw_parts(p.as_ptr(), self.len()) },
            None => &[],
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len();
        match self.raw.get() {
            // Safety: as in `as_slice`, and `&mut self` makes the access exclusive.
            Some(p) => unsafe { core::slice::from_raw_parts_mut(p.as_ptr(), len) },
            None => &mut [],
        }
    }
}

impl<T, D: Deleter<T> + Default> Default for UniqueArray<T, D> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> From<Box<[T]>> for UniqueArray<T> {
    fn from(b: Box<[T]>) -> Self {
        let deleter = ArrayDeleter::new(b.len());
        let ptr = Box::into_raw(b) as *mut T;
        // Safety: the pointer is the start of a boxed slice of `deleter.len()` elements.
        unsafe { Self::from_raw_with_deleter(ptr, deleter) }
    }
}

#[cold]
#[track_caller]
fn index_failed(index: usize, len: usize) -> ! {
    panic!(
        "index out of bounds: the len is {} but the index is {}",
        len, index
    )
}

/// Panics if `index` is outside the array, or if the handle is empty.
impl<T, D: Deleter<T> + Extent> Index<usize> for UniqueArray<T, D> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        match self.as_slice().get(index) {
            Some(v) => v,
            None => index_failed(index, self.len()),
        }
    }
}

/// Panics if `index` is outside the array, or if the handle is empty.
impl<T, D: Deleter<T> + Extent> IndexMut<usize> for UniqueArray<T, D> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.as_mut_slice().get_mut(index) {
            Some(v) => v,
            None => index_failed(index, len),
        }
    }
}

impl<T1, D1, T2, D2> PartialEq<UniqueArray<T2, D2>> for UniqueArray<T1, D1>
where
    D1: Deleter<T1>,
    D2: Deleter<T2>,
{
    fn eq(&self, other: &UniqueArray<T2, D2>) -> bool {
        self.raw.addr() == other.raw.addr()
    }
}

impl<T, D: Deleter<T>> Eq for UniqueArray<T, D> {}

impl<T1, D1, T2, D2> PartialOrd<UniqueArray<T2, D2>> for UniqueArray<T1, D1>
where
    D1: Deleter<T1>,
    D2: Deleter<T2>,
{
    fn partial_cmp(&self, other: &UniqueArray<T2, D2>) -> Option<Ordering> {
        Some(self.raw.addr().cmp(&other.raw.addr()))
    }
}

impl<T, D: Deleter<T>> Ord for UniqueArray<T, D> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.addr().cmp(&other.raw.addr())
    }
}

impl<T, D: Deleter<T>> Hash for UniqueArray<T, D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.addr().hash(state);
    }
}

impl<T: fmt::Debug, D: Deleter<T> + Extent> fmt::Debug for UniqueArray<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_owning() {
            f.debug_tuple("UniqueArray").field(&self.as_slice()).finish()
        } else {
            f.write_str("UniqueArray(null)")
        }
    }
}

impl<T, D: Deleter<T>> fmt::Pointer for UniqueArray<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&(self.as_ptr() as *const T), f)
    }
}
