//! Host heap allocator.
//!
//! Backs the `allocate`/`release` pair with `calloc`/`free` and keeps live accounting.
//! An optional byte budget lets tests and constrained hosts exercise the exhaustion path.

use crate::hal::HostBuffer;

/// Allocation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Buffers allocated and not yet released.
    pub live_buffers: usize,
    /// Bytes held by live buffers.
    pub live_bytes: usize,
    /// High-water mark of `live_bytes`.
    pub peak_bytes: usize,
    /// Successful allocations.
    pub allocations: u64,
    /// Requests answered with `None`.
    pub failures: u64,
}

/// `calloc`-backed allocator with optional budget.
#[derive(Debug, Clone, Default)]
pub struct HeapAllocator {
    budget: Option<usize>,
    stats: MemoryStats,
}

impl HeapAllocator {
    /// Creates an allocator.
    ///
    /// # Arguments
    ///
    /// * `budget` - Maximum live bytes, or `None` for no limit beyond the host heap.
    pub const fn new(budget: Option<usize>) -> Self {
        Self {
            budget,
            stats: MemoryStats {
                live_buffers: 0,
                live_bytes: 0,
                peak_bytes: 0,
                allocations: 0,
                failures: 0,
            },
        }
    }

    /// Allocates a zeroed buffer of `size` bytes.
    ///
    /// # Returns
    ///
    /// `None` when the budget would be exceeded or the host heap is exhausted. No retry
    /// is attempted.
    pub fn allocate(&mut self, size: u32) -> Option<HostBuffer> {
        let size = size as usize;
        let within_budget = self
            .budget
            .is_none_or(|budget| self.stats.live_bytes.saturating_add(size) <= budget);
        let buffer = if within_budget {
            HostBuffer::zeroed(size)
        } else {
            None
        };
        match buffer {
            Some(buffer) => {
                self.stats.live_buffers += 1;
                self.stats.live_bytes += size;
                self.stats.peak_bytes = self.stats.peak_bytes.max(self.stats.live_bytes);
                self.stats.allocations += 1;
                Some(buffer)
            }
            None => {
                self.stats.failures += 1;
                None
            }
        }
    }

    /// Releases a buffer and updates the accounting.
    ///
    /// Buffers from another allocator are accepted; the counters saturate at zero.
    pub fn release(&mut self, buffer: HostBuffer) {
        self.stats.live_buffers = self.stats.live_buffers.saturating_sub(1);
        self.stats.live_bytes = self.stats.live_bytes.saturating_sub(buffer.len());
        drop(buffer);
    }

    /// Current counters.
    pub const fn stats(&self) -> MemoryStats {
        self.stats
    }

    /// Configured budget.
    pub const fn budget(&self) -> Option<usize> {
        self.budget
    }
}
