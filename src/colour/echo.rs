//! Recycling of allocated colours after a fixed number of allocations.

use std::collections::VecDeque;

/// Sliding window of recently allocated colours.
///
/// Every allocation is pushed; once `window` allocations have been made in
/// total, each further push hands back the oldest entry so the allocator can
/// return it to the cube. Colours therefore stay reserved for `window - 1`
/// allocations after their own.
#[derive(Debug, Clone)]
pub struct EchoQueue {
    window: usize,
    pushed: usize,
    entries: VecDeque<[u8; 3]>,
}

impl EchoQueue {
    /// `window` must be at least 1.
    pub fn new(window: usize) -> Self {
        debug_assert!(window > 0);
        Self {
            window,
            pushed: 0,
            entries: VecDeque::with_capacity(window.min(1 << 16)),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records an allocation and returns the colour that falls out of the window.
    pub fn push(&mut self, p: [u8; 3]) -> Option<[u8; 3]> {
        self.entries.push_back(p);
        self.pushed += 1;
        if self.pushed >= self.window {
            let expired = self.entries.pop_front();
            debug_assert!(expired.is_some(), "echo queue drained below its window");
            expired
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_after_window() {
        let mut q = EchoQueue::new(3);
        assert_eq!(q.push([1, 0, 0]), None);
        assert_eq!(q.push([2, 0, 0]), None);
        assert_eq!(q.push([3, 0, 0]), Some([1, 0, 0]));
        assert_eq!(q.push([4, 0, 0]), Some([2, 0, 0]));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_window_of_one_releases_immediately() {
        let mut q = EchoQueue::new(1);
        assert_eq!(q.push([9, 9, 9]), Some([9, 9, 9]));
        assert!(q.is_empty());
    }
}
