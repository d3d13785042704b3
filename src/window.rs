//! Reporting windows.
//!
//! The weekly review compares "this week so far" against the same
//! calendar days one year earlier. On a Monday there is nothing of the
//! new week to report yet, so the window rolls back to the whole of the
//! previous week instead.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use tracing::debug;

use crate::error::{ReportError, Result};
use crate::types::{OperationRecord, PeriodWindow, ReportingWindow};
use crate::util::days_inclusive;

impl PeriodWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ReportError::InvalidRange { start, end });
        }
        Ok(Self::span(start, end))
    }

    // Callers guarantee start <= end.
    fn span(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            days: days_inclusive(start, end),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Records dated inside the window, in input order.
    pub fn select<'a>(&self, records: &'a [OperationRecord]) -> Vec<&'a OperationRecord> {
        records.iter().filter(|r| self.contains(r.date)).collect()
    }

    /// `start` at 00:00:00.
    pub fn start_of_day(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// `end` at 23:59:59.
    pub fn end_of_day(&self) -> NaiveDateTime {
        self.end
            .and_hms_opt(23, 59, 59)
            .unwrap_or_else(|| self.end.and_time(NaiveTime::MIN))
    }
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Same month and day in the previous year. 29 February maps to 28
/// February.
pub fn year_earlier(date: NaiveDate) -> NaiveDate {
    let year = date.year() - 1;
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
        .unwrap_or(date)
}

pub fn shift_year_back(window: &PeriodWindow) -> PeriodWindow {
    PeriodWindow::span(year_earlier(window.start), year_earlier(window.end))
}

/// Week-to-date window for `today`, plus its mirror one year back.
///
/// - Monday: the whole previous week, Monday through Sunday.
/// - Tuesday to Sunday: this week's Monday through yesterday.
pub fn resolve_reporting_window(today: NaiveDate) -> ReportingWindow {
    let current = if today.weekday() == Weekday::Mon {
        let end = today - Duration::days(1);
        PeriodWindow::span(monday_of(end), end)
    } else {
        PeriodWindow::span(monday_of(today), today - Duration::days(1))
    };
    let previous = shift_year_back(&current);
    debug!(
        %today,
        current_start = %current.start,
        current_end = %current.end,
        previous_start = %previous.start,
        previous_end = %previous.end,
        "resolved reporting window"
    );
    ReportingWindow { current, previous }
}

/// Explicit window, compared against the same dates one year earlier.
pub fn custom_window(start: NaiveDate, end: NaiveDate) -> Result<ReportingWindow> {
    let current = PeriodWindow::new(start, end)?;
    Ok(ReportingWindow {
        current,
        previous: shift_year_back(&current),
    })
}
