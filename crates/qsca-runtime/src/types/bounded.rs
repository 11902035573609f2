//! Capacity-bounded FIFO log

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Append-only log that keeps at most `capacity` entries.
///
/// When a push would exceed the capacity the oldest entry is evicted first
/// (strict FIFO; reads never refresh an entry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundedLog<T> {
    capacity: usize,
    entries: VecDeque<T>,
}

impl<T> BoundedLog<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append an entry, returning the evicted oldest entry if any.
    pub fn push(&mut self, entry: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(entry);
        }
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Oldest-first iteration.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }

    /// The last `n` entries, oldest-first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &T> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }
}

impl<T: Clone> BoundedLog<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_first() {
        let mut log = BoundedLog::new(3);
        for i in 0..3 {
            assert!(log.push(i).is_none());
        }
        assert_eq!(log.push(3), Some(0));
        assert_eq!(log.push(4), Some(1));
        assert_eq!(log.to_vec(), vec![2, 3, 4]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn tail_returns_most_recent_in_order() {
        let mut log = BoundedLog::new(10);
        for i in 0..6 {
            log.push(i);
        }
        let tail: Vec<_> = log.tail(2).copied().collect();
        assert_eq!(tail, vec![4, 5]);
        let all: Vec<_> = log.tail(50).copied().collect();
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut log = BoundedLog::new(0);
        assert_eq!(log.push("x"), Some("x"));
        assert!(log.is_empty());
    }
}
