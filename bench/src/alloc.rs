//! Allocation tracking for memory figures in the report.
//!
//! [`TrackingAllocator`] forwards to the system allocator and keeps running
//! totals per thread. It only reports anything once a binary installs it:
//!
//! ```ignore
//! #[global_allocator]
//! static ALLOCATOR: orderjoin_bench::alloc::TrackingAllocator =
//!     orderjoin_bench::alloc::TrackingAllocator;
//! ```
//!
//! Without that, every snapshot reads zero.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Copy)]
struct Counters {
    allocated_bytes: u64,
    allocation_count: u64,
    live_bytes: u64,
    peak_live_bytes: u64,
}

const ZERO: Counters = Counters {
    allocated_bytes: 0,
    allocation_count: 0,
    live_bytes: 0,
    peak_live_bytes: 0,
};

// Per thread, so a measurement only sees its own thread's allocations even
// when other threads (e.g. parallel tests) are busy.
thread_local! {
    static COUNTERS: Cell<Counters> = const { Cell::new(ZERO) };
}

static INSTALLED: AtomicBool = AtomicBool::new(false);

impl Counters {
    fn on_alloc(&mut self, size: u64) {
        self.allocated_bytes += size;
        self.allocation_count += 1;
        self.live_bytes += size;
        self.peak_live_bytes = self.peak_live_bytes.max(self.live_bytes);
    }

    fn on_dealloc(&mut self, size: u64) {
        // Memory freed on another thread than it was allocated on can push
        // this thread's live count below zero.
        self.live_bytes = self.live_bytes.saturating_sub(size);
    }

    /// The old block is released before the new one counts, so a resize
    /// never raises the peak above the new size.
    fn on_realloc(&mut self, old_size: u64, new_size: u64) {
        self.on_dealloc(old_size);
        self.on_alloc(new_size);
    }
}

fn update(f: impl FnOnce(&mut Counters)) {
    // Fails only while the thread's locals are being torn down.
    let _ = COUNTERS.try_with(|cell| {
        let mut c = cell.get();
        f(&mut c);
        cell.set(c);
    });
}

fn read() -> Counters {
    COUNTERS.try_with(Cell::get).unwrap_or(ZERO)
}

pub struct TrackingAllocator;

impl TrackingAllocator {
    fn record_alloc(size: u64) {
        INSTALLED.store(true, Ordering::Relaxed);
        update(|c| c.on_alloc(size));
    }

    fn record_dealloc(size: u64) {
        update(|c| c.on_dealloc(size));
    }

    fn record_realloc(old_size: u64, new_size: u64) {
        INSTALLED.store(true, Ordering::Relaxed);
        update(|c| c.on_realloc(old_size, new_size));
    }
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            Self::record_alloc(layout.size() as u64);
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            Self::record_alloc(layout.size() as u64);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        Self::record_dealloc(layout.size() as u64);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            Self::record_realloc(layout.size() as u64, new_size as u64);
        }
        new_ptr
    }
}

/// Whether the tracking allocator has seen any allocation, i.e. is installed.
pub fn is_tracking() -> bool {
    INSTALLED.load(Ordering::Relaxed)
}

/// Point-in-time copy of the allocation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocSnapshot {
    pub allocated_bytes: u64,
    pub allocation_count: u64,
    pub live_bytes: u64,
    pub peak_live_bytes: u64,
}

impl AllocSnapshot {
    /// Counters of the calling thread.
    pub fn take() -> Self {
        let c = read();
        Self {
            allocated_bytes: c.allocated_bytes,
            allocation_count: c.allocation_count,
            live_bytes: c.live_bytes,
            peak_live_bytes: c.peak_live_bytes,
        }
    }

    /// Reset the peak to the current live size and snapshot. Call right
    /// before the measured region so [`AllocDelta::peak_bytes`] covers only it.
    pub fn start() -> Self {
        update(|c| c.peak_live_bytes = c.live_bytes);
        Self::take()
    }

    pub fn delta_since(&self, start: &AllocSnapshot) -> AllocDelta {
        AllocDelta {
            bytes: self.allocated_bytes.saturating_sub(start.allocated_bytes),
            count: self.allocation_count.saturating_sub(start.allocation_count),
            peak_bytes: self.peak_live_bytes.saturating_sub(start.live_bytes),
        }
    }
}

/// Allocation activity between two snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocDelta {
    /// Total bytes requested.
    pub bytes: u64,
    pub count: u64,
    /// Highest live size above the starting live size.
    pub peak_bytes: u64,
}
