use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

// Rate limit entry - tracks requests per IP/key
#[derive(Debug, Clone)]
pub struct RateLimitEntry {
    pub key: String,
    pub count: u32,
    pub window_start: Instant,
}

/// Fixed-size admission table.
///
/// A client key maps to exactly one slot; a different key landing on an
/// occupied slot evicts the occupant and starts fresh. Memory never grows past
/// `table_size` entries, at the cost of occasionally forgetting a client.
pub struct RateLimiter {
    slots: Mutex<Vec<Option<RateLimitEntry>>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(table_size: usize, max_requests: u32, window: Duration) -> Self {
        Self {
            slots: Mutex::new(vec![None; table_size.max(1)]),
            max_requests,
            window,
        }
    }

    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut slots = self.slots.lock();
        let idx = slot_index(key, slots.len());
        let slot = &mut slots[idx];

        if let Some(entry) = slot.as_mut().filter(|e| e.key == key) {
            // window expired, start a new one
            if now.saturating_duration_since(entry.window_start) >= self.window {
                entry.count = 1;
                entry.window_start = now;
                return true;
            }
            entry.count = entry.count.saturating_add(1);
            return entry.count <= self.max_requests;
        }

        // empty slot or a different client: evict and start fresh
        *slot = Some(RateLimitEntry {
            key: key.to_string(),
            count: 1,
            window_start: now,
        });
        true
    }

    pub fn table_size(&self) -> usize {
        self.slots.lock().len()
    }
}

// Stable slot for a key (first 8 bytes of its SHA-256)
fn slot_index(key: &str, table_size: usize) -> usize {
    let digest = Sha256::digest(key.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) % table_size as u64) as usize
}
