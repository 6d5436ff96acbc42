//! Monotonic millisecond tick factory for client-generated ids.
//!
//! Comment ids and generated-question ids are wall-clock millisecond ticks
//! (questions add an `a`/`b` suffix to a shared tick). A raw wall clock
//! collides when asked twice in the same millisecond, so this factory bumps
//! past the last issued tick: ids stay time-ordered and are unique within
//! the process.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Default)]
pub struct TickIdFactory {
    last: AtomicU64,
}

impl TickIdFactory {
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Issue the next tick: the wall clock when it moved forward, otherwise
    /// one past the last issued tick.
    pub fn next_tick(&self) -> u64 {
        let now = current_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = if now > last { now } else { last + 1 };
            match self.last.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return candidate,
                Err(observed) => last = observed,
            }
        }
    }

    /// A single time-based id.
    pub fn next_id(&self) -> String {
        self.next_tick().to_string()
    }

    /// Two ids sharing one tick, disambiguated by suffix. Distinct even when
    /// issued within the same millisecond as another pair.
    pub fn next_suffixed_pair(&self) -> (String, String) {
        let tick = self.next_tick();
        (format!("{tick}a"), format!("{tick}b"))
    }
}

fn current_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
