//! Client-side booking time-window policy.
//!
//! Before the daily cutoff (20:00 in the lot's offset) a booking must start
//! today and end by the cutoff. At or after the cutoff it must start tomorrow.
//! The check is advisory: the backend re-validates and its own 400/409
//! responses are what the user finally sees.

use time::macros::time;
use time::{Duration, OffsetDateTime, Time};

use crate::constants::{EARLY_MORNING_HOUR, SUGGESTED_DURATION_HOURS};

const SUGGESTED_START: Time = time!(09:00);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingWindowError {
    #[error("Invalid time range: check-out must be after check-in")]
    InvalidTimeRange,
    #[error("Only bookings for today until 8 pm are allowed before 8 pm")]
    BeforeCutoff,
    #[error("Bookings after 8 pm are only allowed for tomorrow")]
    AfterCutoff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    pub cutoff: Time,
}

impl Default for BookingWindow {
    fn default() -> Self {
        Self {
            cutoff: time!(20:00),
        }
    }
}

impl BookingWindow {
    /// Dates are compared in `now`'s offset, so callers pass `now` already
    /// converted to the lot's local offset.
    pub fn check(
        &self,
        now: OffsetDateTime,
        check_in: OffsetDateTime,
        check_out: OffsetDateTime,
    ) -> Result<(), BookingWindowError> {
        if check_out <= check_in {
            return Err(BookingWindowError::InvalidTimeRange);
        }

        let today = now.date();
        let check_in_date = check_in.to_offset(now.offset()).date();
        let cutoff = now.replace_time(self.cutoff);

        if now < cutoff {
            if check_in_date != today || check_out > cutoff {
                return Err(BookingWindowError::BeforeCutoff);
            }
        } else if Some(check_in_date) != today.next_day() {
            // check_out is deliberately not bounded by tomorrow's cutoff here.
            return Err(BookingWindowError::AfterCutoff);
        }

        Ok(())
    }

    pub fn is_allowed(
        &self,
        now: OffsetDateTime,
        check_in: OffsetDateTime,
        check_out: OffsetDateTime,
    ) -> bool {
        self.check(now, check_in, check_out).is_ok()
    }

    /// Default interval offered when the booking form opens.
    ///
    /// At or after the cutoff: tomorrow 09:00 for two hours. Before 06:00:
    /// today 09:00 for two hours. Otherwise from `now` for two hours, capped
    /// at the cutoff. The result always passes [`BookingWindow::check`].
    pub fn suggest_slot(&self, now: OffsetDateTime) -> (OffsetDateTime, OffsetDateTime) {
        let duration = Duration::hours(SUGGESTED_DURATION_HOURS);
        let cutoff = now.replace_time(self.cutoff);

        if now >= cutoff {
            let start = (now + Duration::days(1)).replace_time(SUGGESTED_START);
            return (start, start + duration);
        }

        let start = if now.hour() < EARLY_MORNING_HOUR && now.replace_time(SUGGESTED_START) < cutoff
        {
            now.replace_time(SUGGESTED_START)
        } else {
            now
        };
        (start, (start + duration).min(cutoff))
    }
}

/// [`BookingWindow::check`] with the default 20:00 cutoff.
pub fn check_booking_window(
    now: OffsetDateTime,
    check_in: OffsetDateTime,
    check_out: OffsetDateTime,
) -> Result<(), BookingWindowError> {
    BookingWindow::default().check(now, check_in, check_out)
}

pub fn is_booking_allowed(
    now: OffsetDateTime,
    check_in: OffsetDateTime,
    check_out: OffsetDateTime,
) -> bool {
    check_booking_window(now, check_in, check_out).is_ok()
}
