//! Errors reported by the fallible factories.

use core::fmt;

/// Why a [`try_make_unique`](crate::try_make_unique) or
/// [`try_make_unique_array`](crate::try_make_unique_array) call produced no handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The requested array is too large to describe as a memory layout.
    CapacityOverflow {
        /// Number of elements requested.
        len: usize,
    },
    /// The allocator could not satisfy the request.
    OutOfMemory {
        /// Size of the failed request in bytes.
        size: usize,
        /// Alignment of the failed request in bytes.
        align: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { len } => {
                write!(f, "capacity overflow: cannot lay out an array of {len} elements")
            }
            Self::OutOfMemory { size, align } => {
                write!(
                    f,
                    "out of memory: allocating {size} bytes aligned to {align} failed"
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AllocError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages() {
        assert_eq!(
            AllocError::CapacityOverflow { len: 3 }.to_string(),
            "capacity overflow: cannot lay out an array of 3 elements"
        );
        assert_eq!(
            AllocError::OutOfMemory { size: 64, align: 8 }.to_string(),
            "out of memory: allocating 64 bytes aligned to 8 failed"
        );
    }
}
