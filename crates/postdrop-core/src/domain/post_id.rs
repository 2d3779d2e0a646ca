//! Post identifier generation.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Generates post ids from the wall clock in epoch milliseconds.
///
/// Ids are strictly increasing within a process: when two requests land in
/// the same millisecond the second one gets the next integer instead of a
/// duplicate.
#[derive(Debug, Default)]
pub struct PostIdGenerator {
    last: AtomicI64,
}

impl PostIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id as decimal text.
    pub fn next_id(&self) -> String {
        self.next_after(Utc::now().timestamp_millis()).to_string()
    }

    fn next_after(&self, now_ms: i64) -> i64 {
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = if now_ms > last { now_ms } else { last + 1 };
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}
