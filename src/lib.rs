//! Single-ownership pointers with pluggable deleters.
//!
//! This crate provides [`UniquePtr`], a handle that is the one and only owner of a heap object,
//! and [`UniqueArray`], its counterpart for a contiguous array. Each handle pairs a pointer with a
//! [`Deleter`] that knows how to release it, and guarantees that the deleter runs exactly once
//! for every resource the handle owned: when the handle is dropped, cleared, reset, or
//! overwritten. Ownership can be moved, swapped, or given up with
//! [`release`](UniquePtr::release), but never duplicated.
//!
//! The factories [`make_unique`] and [`make_unique_array`] allocate and wrap in one step, and
//! their `try_` variants hand allocation failure back as an [`AllocError`] instead of aborting.
//!
//! ```
//! use solo::{make_unique, make_unique_array};
//!
//! let p = make_unique(42);
//! assert_eq!(*p, 42);
//!
//! let mut a = make_unique_array::<i32>(5);
//! for i in 0..5 {
//!     a[i] = i as i32 * 10;
//! }
//! assert_eq!(a.as_slice(), &[0, 10, 20, 30, 40]);
//! ```
//!
//! A custom deleter decides what "release" means. Handles built with [`UniquePtr::from_raw`]
//! and friends take on whatever allocation discipline their deleter expects:
//!
//! ```
//! use solo::{deleters, UniquePtr};
//!
//! let raw = Box::into_raw(Box::new(String::from("owned")));
//! let d: unsafe fn(*mut String) = deleters::drop_box::<String>;
//! // Safety: `raw` came from a Box and is handed over to the handle.
//! let p = unsafe { UniquePtr::from_raw_with_deleter(raw, d) };
//! assert_eq!(p.len(), 5);
//! ```
//!
//! The handles are not synchronized in any way. They are `Send` and `Sync` under the same
//! conditions as `Box`, because exclusive ownership needs nothing more.

#![deny(unsafe_op_in_unsafe_fn)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod array;
mod deleter;
mod error;
mod make;
mod raw;
mod unique;

pub use array::UniqueArray;
pub use deleter::{deleters, ArrayDeleter, Deleter, Extent, FnDeleter, ObjectDeleter};
pub use error::AllocError;
pub use make::{make_unique, make_unique_array, try_make_unique, try_make_unique_array};
pub use unique::UniquePtr;
