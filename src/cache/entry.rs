//! Cache Entry Module
//!
//! Defines the metadata wrapper for individual cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A single cache entry: the stored value plus lifecycle metadata.
///
/// `expires_at` is fixed at creation (`created_at + ttl`) and never
/// refreshed; only `usage_count` and `last_used` change over an entry's
/// lifetime, via [`CacheEntry::touch`].
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// Last access timestamp (Unix milliseconds)
    pub last_used: u64,
    /// Number of times this entry was served
    pub usage_count: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl_secs` from now, counting the
    /// insertion itself as the first use.
    pub fn new(value: V, ttl_secs: u64) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            created_at: now,
            expires_at: now + ttl_secs * 1000,
            last_used: now,
            usage_count: 1,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once the current time is
    /// greater than or equal to `expires_at`.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    // == Touch ==
    /// Records a use: bumps `usage_count` and refreshes `last_used`.
    pub fn touch(&mut self) {
        self.usage_count += 1;
        self.last_used = current_timestamp_ms();
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("payload", 60);

        assert_eq!(entry.value, "payload");
        assert_eq!(entry.usage_count, 1);
        assert_eq!(entry.last_used, entry.created_at);
        assert_eq!(entry.expires_at, entry.created_at + 60_000);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new((), 1);
        assert!(!entry.is_expired());

        sleep(Duration::from_millis(1100));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_touch_updates_usage_and_recency() {
        let mut entry = CacheEntry::new((), 60);
        let expires = entry.expires_at;

        sleep(Duration::from_millis(10));
        entry.touch();
        entry.touch();

        assert_eq!(entry.usage_count, 3);
        assert!(entry.last_used > entry.created_at);
        // Touch must never extend the lifetime
        assert_eq!(entry.expires_at, expires);
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new((), 10);
        let remaining = entry.ttl_remaining_ms();
        assert!(remaining <= 10_000);
        assert!(remaining >= 9_000);
    }

    #[test]
    fn test_ttl_remaining_expired() {
        let entry = CacheEntry::new((), 1);
        sleep(Duration::from_millis(1100));
        assert_eq!(entry.ttl_remaining_ms(), 0);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = CacheEntry {
            value: (),
            created_at: now,
            expires_at: now, // expires exactly at creation time
            last_used: now,
            usage_count: 1,
        };

        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }
}
