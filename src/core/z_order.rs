// Z-Order Counter
// Monotonic stacking counter shared by panels

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide top of the stacking order; never reset
static TOP_Z: AtomicU64 = AtomicU64::new(0);

/// Source of ever-increasing stacking positions
pub trait ZOrder {
    /// Claim the next position above everything handed out so far
    fn raise(&self) -> u64;

    /// Highest position handed out so far
    fn top(&self) -> u64;
}

/// Counter shared by every panel in the process
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalZOrder;

impl ZOrder for GlobalZOrder {
    fn raise(&self) -> u64 {
        TOP_Z.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn top(&self) -> u64 {
        TOP_Z.load(Ordering::Relaxed)
    }
}

/// Counter owned by one desktop (or one test)
#[derive(Debug, Default)]
pub struct LocalZOrder {
    top: Cell<u64>,
}

impl LocalZOrder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ZOrder for LocalZOrder {
    fn raise(&self) -> u64 {
        let next = self.top.get() + 1;
        self.top.set(next);
        next
    }

    fn top(&self) -> u64 {
        self.top.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_counter_is_monotonic() {
        let counter = LocalZOrder::new();
        assert_eq!(counter.top(), 0);
        assert_eq!(counter.raise(), 1);
        assert_eq!(counter.raise(), 2);
        assert_eq!(counter.top(), 2);
    }

    #[test]
    fn test_global_counter_never_goes_back() {
        let first = GlobalZOrder.raise();
        let second = GlobalZOrder.raise();
        assert!(second > first);
        assert!(GlobalZOrder.top() >= second);
    }
}
