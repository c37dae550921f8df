//! System clock adapter

use chrono::{DateTime, Utc};
use stackline_application::Clock;

/// Production clock backed by the operating system.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
