//! DateTime display utilities.
//!
//! Wrappers formatting timestamps in the system time zone.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Full date and time: `YYYY-MM-DD HH:MM:SS TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl<'a> fmt::Display for LocalDateTime<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// Wall-clock time only, `HH:MM:SS`, as shown in the log feed.
pub struct LocalTime<'a>(pub &'a Timestamp);

impl<'a> fmt::Display for LocalTime<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0.to_zoned(TimeZone::system()).strftime("%H:%M:%S")
        )
    }
}
