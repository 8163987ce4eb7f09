use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::constants::LATE_GRACE_MINUTES;

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub hours: i64,
    pub amount: f64,
}

/// Charge for parking between `from` and `to`, billing any started hour in full.
pub fn quote(from: OffsetDateTime, to: OffsetDateTime, hourly_rate: f64) -> Quote {
    if to <= from {
        return Quote {
            hours: 0,
            amount: 0.0,
        };
    }

    let mut hours = (to - from).whole_hours();
    if from + Duration::hours(hours) < to {
        hours += 1;
    }

    Quote {
        hours,
        amount: hours as f64 * hourly_rate,
    }
}

/// Penalty for checking out after `scheduled`; the first ten minutes are free.
pub fn late_penalty(scheduled: OffsetDateTime, actual: OffsetDateTime, rate_per_minute: f64) -> f64 {
    let minutes_late = (actual - scheduled).whole_minutes();
    if minutes_late <= LATE_GRACE_MINUTES {
        return 0.0;
    }
    (minutes_late - LATE_GRACE_MINUTES) as f64 * rate_per_minute
}
