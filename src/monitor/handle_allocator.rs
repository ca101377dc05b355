use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

/// Registry-wide source of client handles.
///
/// Handles are never reused, even after the item they were issued for is
/// removed or its add request is rejected. Wraparound after 2^32
/// allocations is not guarded against.
#[derive(Debug)]
pub struct HandleAllocator {
    last: AtomicU32,
}

impl HandleAllocator {
    /// `seed` is the last reserved handle; the first allocation returns `seed + 1`.
    pub fn new(seed: u32) -> Self {
        Self {
            last: AtomicU32::new(seed),
        }
    }

    pub fn next_handle(&self) -> u32 {
        self.last.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// Most recently issued handle (the seed if none was issued yet)
    pub fn last_handle(&self) -> u32 {
        self.last.load(Ordering::Relaxed)
    }
}
