// Occurrence calculators for each recurrence family.
//
// Each calculator returns the first matching date strictly after the
// reference date. Every loop in here has a small fixed bound: at most 7 days
// for weekly and weekend scans, at most one month of days for nth-weekday
// scans and at most two months (the reference month and the one after it)
// for the monthly families. A `None` result means the bound was exhausted,
// which can't happen for patterns whose parameters are in range.

use jiff::{
    ToSpan,
    civil::{Date, Weekday},
};

use super::Error;

/// The direction in which `scan` walks the calendar.
#[derive(Clone, Copy, Debug)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self, date: Date) -> Result<Date, Error> {
        Ok(match self {
            Direction::Forward => date.tomorrow()?,
            Direction::Backward => date.yesterday()?,
        })
    }
}

/// Examines at most `limit` consecutive dates beginning at `start` (which is
/// always examined first), and returns the first one for which `found`
/// returns true.
///
/// The predicate may be stateful, e.g., for counting matching days. Dates
/// are visited in order, and a date past the last one examined is never
/// computed. So scanning right up to the end of the supported range is fine.
fn scan(
    start: Date,
    direction: Direction,
    limit: i8,
    mut found: impl FnMut(Date) -> bool,
) -> Result<Option<Date>, Error> {
    let mut date = start;
    for i in 0..limit {
        if i > 0 {
            date = direction.step(date)?;
        }
        if found(date) {
            return Ok(Some(date));
        }
    }
    Ok(None)
}

/// Looks for a candidate in the reference date's month, and then in the
/// month after it, returning the first candidate strictly after `reference`.
///
/// `candidate_in` is given the first day of the month to search.
fn this_or_next_month(
    reference: Date,
    mut candidate_in: impl FnMut(Date) -> Result<Option<Date>, Error>,
) -> Result<Option<Date>, Error> {
    let this_month = reference.first_of_month();
    if let Some(candidate) = candidate_in(this_month)? {
        if candidate > reference {
            return Ok(Some(candidate));
        }
    }
    let next_month = this_month.checked_add(1.month())?;
    Ok(candidate_in(next_month)?.filter(|&candidate| candidate > reference))
}

/// Returns the next date falling on `weekday`, starting with the day after
/// `reference`.
pub(super) fn weekly(
    reference: Date,
    weekday: Weekday,
) -> Result<Option<Date>, Error> {
    scan(reference.tomorrow()?, Direction::Forward, 7, |date| {
        date.weekday() == weekday
    })
}

/// Returns the next date on day `day` of a month, clamped to the last day of
/// months that are too short.
pub(super) fn monthly_day(
    reference: Date,
    day: i8,
) -> Result<Option<Date>, Error> {
    this_or_next_month(reference, |first| clamped_day(first, day).map(Some))
}

/// Returns the next date that is the `n`th Monday-Friday day of its month.
pub(super) fn nth_weekday(
    reference: Date,
    n: i8,
) -> Result<Option<Date>, Error> {
    this_or_next_month(reference, |first| nth_weekday_of_month(first, n))
}

/// Returns the next date that is the last Saturday or Sunday of its month.
pub(super) fn last_weekend(reference: Date) -> Result<Option<Date>, Error> {
    this_or_next_month(reference, |first| {
        scan(first.last_of_month(), Direction::Backward, 7, |date| {
            is_weekend(date.weekday())
        })
    })
}

/// Returns day `day` of the month starting at `first`, or the last day of
/// that month if it is too short.
fn clamped_day(first: Date, day: i8) -> Result<Date, Error> {
    let days_in_month = first.days_in_month();
    if day > days_in_month {
        log::trace!(
            "clamping day {day} to {days_in_month} for {year:04}-{month:02}",
            year = first.year(),
            month = first.month(),
        );
        return Ok(first.last_of_month());
    }
    Ok(Date::new(first.year(), first.month(), day)?)
}

/// Returns the `n`th Monday-Friday day in the month starting at `first`, if
/// the month has that many.
fn nth_weekday_of_month(first: Date, n: i8) -> Result<Option<Date>, Error> {
    let mut count = 0;
    scan(first, Direction::Forward, first.days_in_month(), |date| {
        if is_weekday(date.weekday()) {
            count += 1;
        }
        count == n
    })
}

fn is_weekday(weekday: Weekday) -> bool {
    !is_weekend(weekday)
}

fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Saturday | Weekday::Sunday)
}
