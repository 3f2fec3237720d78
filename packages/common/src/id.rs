//! Id and timestamp helpers.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

static MESSAGE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generate a process-unique message id.
///
/// Used for traceability only; the protocol has no request/response
/// correlation, so uniqueness within one session is all that matters.
pub fn next_message_id() -> String {
    let n = MESSAGE_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("msg-{}-{}", now_millis(), n)
}
