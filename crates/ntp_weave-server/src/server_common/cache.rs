use std::collections::{HashMap, VecDeque};

/// Bounded mapping from a server receive timestamp to the transmit timestamp
/// that was measured after sending the response to it.
///
/// Interleaved mode requires remembering, for every recent exchange, which
/// transmit timestamp the server actually used: the next request from that
/// client echoes the server's receive timestamp as its origin, asking the
/// server to reveal the precise transmit time it couldn't know until after
/// sending. An unbounded cache would be a memory-exhaustion vector under
/// spoofed or high-rate traffic, so entries are evicted in strict FIFO
/// insertion order once `max_entries` is exceeded.
///
/// Keys are opaque 64-bit fixed-point timestamps. The responder guarantees
/// key uniqueness before insertion; a duplicate key or a divergence between
/// the mapping and the insertion-order record is a logic defect and panics.
pub struct TimestampCache {
    saved: HashMap<u64, u64>,
    order: VecDeque<u64>,
    max_entries: usize,
}

impl TimestampCache {
    /// Create a cache holding at most `max_entries` timestamp pairs.
    pub fn new(max_entries: usize) -> Self {
        TimestampCache {
            saved: HashMap::new(),
            order: VecDeque::new(),
            max_entries,
        }
    }

    /// Whether `key` is currently present.
    pub fn contains(&self, key: u64) -> bool {
        self.saved.contains_key(&key)
    }

    /// Look up the transmit timestamp recorded for `key`.
    pub fn lookup(&self, key: u64) -> Option<u64> {
        self.saved.get(&key).copied()
    }

    /// Record the transmit timestamp measured for the exchange received at
    /// `key`, evicting the oldest entry if the cache is over capacity.
    ///
    /// # Panics
    ///
    /// Panics if `key` is already present or if the mapping and the
    /// insertion-order record have diverged. Both indicate a responder logic
    /// defect, not a runtime condition to recover from.
    pub fn insert(&mut self, key: u64, value: u64) {
        assert!(
            !self.saved.contains_key(&key),
            "duplicate receive timestamp key: {key:#018x}"
        );
        assert!(self.saved.len() <= self.max_entries);
        assert_eq!(self.saved.len(), self.order.len());

        self.saved.insert(key, value);
        self.order.push_back(key);

        if self.order.len() > self.max_entries
            && let Some(oldest) = self.order.pop_front()
        {
            self.saved.remove(&oldest);
        }
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.saved.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}
