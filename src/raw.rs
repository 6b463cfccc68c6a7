use crate::Deleter;
use core::marker::PhantomData;
use core::ptr::NonNull;

/// The ownership core shared by [`UniquePtr`](crate::UniquePtr) and
/// [`UniqueArray`](crate::UniqueArray).
///
/// A `RawUnique` is either empty (`ptr` is `None`) or owning. Every path that gives up an owned
/// pointer first moves `self` to the empty state and only then calls the deleter, so a panicking
/// or re-entrant deleter can never cause a second release of the same allocation.
pub(crate) struct RawUnique<T: ?Sized, D: Deleter<T>> {
    ptr: Option<NonNull<T>>,
    deleter: D,
    // We logically own a `T`, which matters to drop check.
    _owns: PhantomData<T>,
}

impl<T: ?Sized, D: Deleter<T>> RawUnique<T, D> {
    pub(crate) const fn empty(deleter: D) -> Self {
        Self {
            ptr: None,
            deleter,
            _owns: PhantomData,
        }
    }

    /// # Safety
    ///
    /// If `ptr` is `Some`, it must be valid for `deleter` to release exactly once, and nothing
    /// else may release it.
    pub(crate) const unsafe fn from_parts(ptr: Option<NonNull<T>>, deleter: D) -> Self {
        Self {
            ptr,
            deleter,
            _owns: PhantomData,
        }
    }

    pub(crate) fn is_owning(&self) -> bool {
        self.ptr.is_some()
    }

    pub(crate) fn get(&self) -> Option<NonNull<T>> {
        self.ptr
    }

    pub(crate) fn deleter(&self) -> &D {
        &self.deleter
    }

    pub(crate) fn deleter_mut(&mut self) -> &mut D {
        &mut self.deleter
    }

    pub(crate) fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.ptr, &mut other.ptr);
        core::mem::swap(&mut self.deleter, &mut other.deleter);
    }

    pub(crate) fn release(&mut self) -> Option<NonNull<T>> {
        self.ptr.take()
    }

    /// Whether `ptr` is the allocation this handle currently owns.
    ///
    /// `occupies` reports whether the owned pointee takes up any bytes. Pointees without storage
    /// all sit at the same dangling address, so for them an equal address says nothing about
    /// identity and this returns `false`.
    pub(crate) fn owns_allocation(
        &self,
        ptr: Option<NonNull<T>>,
        occupies: impl FnOnce(NonNull<T>) -> bool,
    ) -> bool {
        match (self.ptr, ptr) {
            (Some(cur), Some(new)) => same_address(Some(cur), Some(new)) && occupies(cur),
            _ => false,
        }
    }

    /// Release whatever is currently owned and take ownership of `ptr` instead.
    ///
    /// When `aliased` is set, `ptr` is the allocation already owned and the handle is left
    /// untouched.
    ///
    /// # Safety
    ///
    /// Same as [`RawUnique::from_parts`] for `ptr`.
    pub(crate) unsafe fn reset(&mut self, ptr: Option<NonNull<T>>, aliased: bool) {
        if aliased {
            log::debug!("ignoring reset to the pointer this handle already owns");
            return;
        }
        let old = core::mem::replace(&mut self.ptr, ptr);
        if let Some(old) = old {
            // Safety: `old` was owned by us and has just been unlinked, so this is its only
            // release.
            unsafe { self.delete(old) };
        }
    }

    /// Like [`RawUnique::reset`], but `deleter` replaces the stored deleter once the old
    /// resource has been released with it. An `aliased` reset only swaps the deleter.
    ///
    /// # Safety
    ///
    /// Same as [`RawUnique::from_parts`].
    pub(crate) unsafe fn reset_with_deleter(
        &mut self,
        ptr: Option<NonNull<T>>,
        deleter: D,
        aliased: bool,
    ) {
        if !aliased {
            self.clear();
        }
        self.deleter = deleter;
        self.ptr = ptr;
    }

    pub(crate) fn clear(&mut self) {
        if let Some(old) = self.ptr.take() {
            // Safety: as in `reset`.
            unsafe { self.delete(old) };
        }
    }

    /// Thin address of the owned allocation, used for identity comparisons.
    pub(crate) fn addr(&self) -> Option<NonNull<u8>> {
        self.ptr.map(NonNull::cast)
    }

    /// Take the pointer and the deleter apart without running the deleter.
    pub(crate) fn into_parts(self) -> (Option<NonNull<T>>, D) {
        let this = core::mem::ManuallyDrop::new(self);
        // Safety: `this` is never used or dropped again, so each field is moved out exactly once.
        let deleter = unsafe { core::ptr::read(&this.deleter) };
        (this.ptr, deleter)
    }

    /// # Safety
    ///
    /// `ptr` must have been owned by `self` and must no longer be reachable through `self.ptr`.
    unsafe fn delete(&mut self, ptr: NonNull<T>) {
        log::trace!("releasing owned resource at {:p}", ptr.cast::<u8>());
        unsafe { self.deleter.delete(ptr) };
    }
}

impl<T: ?Sized, D: Deleter<T>> Drop for RawUnique<T, D> {
    fn drop(&mut self) {
        self.clear();
    }
}

pub(crate) fn same_address<T: ?Sized, U: ?Sized>(
    a: Option<NonNull<T>>,
    b: Option<NonNull<U>>,
) -> bool {
    a.map(NonNull::cast::<u8>) == b.map(NonNull::cast::<u8>)
}

// Safety: a `RawUnique` is the only path to its pointee, exactly like a `Box`, so it can cross
// threads whenever the pointee and the deleter can.
unsafe impl<T: ?Sized + Send, D: Deleter<T> + Send> Send for RawUnique<T, D> {}
// Safety: shared access to the handle only hands out shared access to the pointee and deleter.
unsafe impl<T: ?Sized + Sync, D: Deleter<T> + Sync> Sync for RawUnique<T, D> {}
