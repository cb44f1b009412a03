use std::time::{SystemTime, UNIX_EPOCH};
use udc_core::ports::ClockPort;

/// Wall clock in milliseconds since the UNIX epoch.
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now_ms(&self) -> i64 {
        // A clock set before 1970 reads as the epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}
