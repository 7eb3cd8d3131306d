//! Host Buffer Implementation.
//!
//! This module provides the owned memory block returned by the `allocate` slot. It
//! provides:
//! 1. **Ownership:** A buffer is moved to the caller on allocation and moved back on
//!    release, so a block can be released at most once.
//! 2. **Provenance:** Each buffer remembers how it must be reclaimed (host heap or the
//!    `free` slot of a raw C table), so releasing through any table never hands memory to
//!    the wrong allocator.
//! 3. **Access:** Zero-initialised byte slice access through `Deref`/`DerefMut`.

use std::ffi::c_void;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::slice;

/// How a buffer's memory goes back to its allocator.
#[derive(Clone, Copy)]
enum Reclaim {
    /// Allocated with `libc::calloc`.
    Heap,
    /// Allocated by a foreign table; returned through its `free` slot.
    Foreign(unsafe extern "C" fn(*mut c_void)),
}

/// An owned, zero-initialised block of host memory.
///
/// Dropping a `HostBuffer` returns its memory to the allocator it came from; the
/// `release` slot is the sanctioned way to do that so platforms can keep accounting.
pub struct HostBuffer {
    ptr: NonNull<u8>,
    len: usize,
    reclaim: Reclaim,
}

// SAFETY: a HostBuffer is the unique owner of its block; nothing else aliases it.
unsafe impl Send for HostBuffer {}

impl HostBuffer {
    /// Allocates a zeroed block of `len` bytes on the host heap.
    ///
    /// A zero-length request still reserves one byte so the pointer is unique.
    ///
    /// # Returns
    ///
    /// `None` when the host heap is exhausted.
    pub fn zeroed(len: usize) -> Option<Self> {
        // SAFETY: calloc with a non-zero size either returns null or a fresh block.
        let raw = unsafe { libc::calloc(len.max(1), 1) };
        NonNull::new(raw.cast::<u8>()).map(|ptr| Self {
            ptr,
            len,
            reclaim: Reclaim::Heap,
        })
    }

    /// Adopts a block allocated by a foreign table.
    ///
    /// The block is zeroed on adoption so its contents are always initialised.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes of `len` bytes, uniquely owned by the caller, and
    /// releasable exactly once by calling `free(ptr)`.
    pub unsafe fn from_foreign(
        ptr: NonNull<u8>,
        len: usize,
        free: unsafe extern "C" fn(*mut c_void),
    ) -> Self {
        // SAFETY: the caller guarantees `len` writable bytes at `ptr`.
        unsafe { ptr.as_ptr().write_bytes(0, len) };
        Self {
            ptr,
            len,
            reclaim: Reclaim::Foreign(free),
        }
    }

    /// Returns the size of the buffer in bytes.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for a zero-length buffer.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a raw pointer to the buffer.
    pub const fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Returns a mutable raw pointer to the buffer.
    pub const fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Returns `true` if the block came from a foreign table.
    pub const fn is_foreign(&self) -> bool {
        matches!(self.reclaim, Reclaim::Foreign(_))
    }
}

impl Deref for HostBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        // SAFETY: `ptr` is valid and initialised for `len` bytes for the buffer's lifetime.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl DerefMut for HostBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        // SAFETY: as in `deref`, and `&mut self` guarantees exclusive access.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for HostBuffer {
    /// Returns the block to the allocator it came from.
    fn drop(&mut self) {
        let raw = self.ptr.as_ptr().cast::<c_void>();
        match self.reclaim {
            // SAFETY: the block was obtained from calloc and is freed exactly once.
            Reclaim::Heap => unsafe { libc::free(raw) },
            // SAFETY: `from_foreign` callers guarantee `free` accepts this block once.
            Reclaim::Foreign(free) => unsafe { free(raw) },
        }
    }
}

impl fmt::Debug for HostBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostBuffer")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("foreign", &self.is_foreign())
            .finish()
    }
}
