use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identifier for a committed stroke.
/// 8 bytes, Copy, Eq, Hash in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeId(u64);

static COUNTER: AtomicU64 = AtomicU64::new(1);

impl StrokeId {
    /// Allocate the next unused id.
    pub fn next() -> Self {
        StrokeId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a raw value (e.g. an id coming back from JavaScript).
    ///
    /// Bumps the allocator past `raw` so later `next()` calls never collide.
    pub fn from_raw(raw: u64) -> Self {
        COUNTER.fetch_max(raw.saturating_add(1), Ordering::Relaxed);
        StrokeId(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for StrokeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StrokeId(#{})", self.0)
    }
}

impl fmt::Display for StrokeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_ids_are_unique() {
        let a = StrokeId::next();
        let b = StrokeId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn from_raw_advances_allocator() {
        let raw = StrokeId::next().as_u64() + 1000;
        let imported = StrokeId::from_raw(raw);
        let fresh = StrokeId::next();
        assert!(fresh > imported, "{fresh} should be allocated after {imported}");
    }

    #[test]
    fn display_format() {
        assert_eq!(StrokeId::from_raw(7).to_string(), "#7");
    }
}
