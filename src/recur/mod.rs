/*!
The recurrence engine.

A `Pattern` is parsed from a free-form description like `every monday` or
`2nd weekday of the month`. Given a reference date, a pattern can then
compute its next occurrence, which is always strictly after the reference
date and always at the start of a day.

Nothing in here touches the CLI, the task store or any global mutable
state. Every operation is a pure function of its inputs.
*/

use jiff::{
    Zoned,
    civil::{Date, Weekday},
};

use crate::parse::FromBytes;

pub use self::grammar::PatternParser;

mod grammar;
mod occurrence;

/// A canonical recurrence rule.
///
/// The canonical textual form of a pattern is its `Display` output. That
/// text always parses back into an equivalent pattern, which is what makes
/// it suitable as the opaque string a task store persists.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Pattern {
    /// The task does not recur.
    #[default]
    Never,
    /// Every week on the given weekday.
    Weekly(Weekday),
    /// The given day of every month, in the range `1..=31`.
    ///
    /// Months that are too short for the day get their last day instead.
    MonthlyDay(i8),
    /// The nth weekday (Monday through Friday) of every month, in the range
    /// `1..=5`.
    MonthlyNthWeekday(i8),
    /// The chronologically last Saturday or Sunday of every month.
    MonthlyLastWeekend,
}

impl Pattern {
    /// Parses a free-form recurrence description.
    ///
    /// Matching is case insensitive and ignores surrounding whitespace. The
    /// empty string (and `none`) parse to `Pattern::Never`.
    pub fn parse(input: &str) -> Result<Pattern, Error> {
        PatternParser::global().parse(input)
    }

    /// Returns a monthly pattern for the given day of the month.
    ///
    /// This returns an "invalid day" error when `day` is not in the range
    /// `1..=31`.
    pub fn monthly_day(day: i64) -> Result<Pattern, Error> {
        if !(1..=31).contains(&day) {
            return Err(Error::invalid_day(day));
        }
        // OK because of the range check above.
        Ok(Pattern::MonthlyDay(i8::try_from(day).unwrap()))
    }

    /// Returns a pattern for the `n`th weekday of each month.
    ///
    /// This returns an "invalid pattern" error when `n` is not in the range
    /// `1..=5`.
    pub fn nth_weekday(n: i64) -> Result<Pattern, Error> {
        if !(1..=5).contains(&n) {
            return Err(Error::invalid_pattern(format!(
                "{} weekday of each month",
                Ordinal(n),
            )));
        }
        // OK because of the range check above.
        Ok(Pattern::MonthlyNthWeekday(i8::try_from(n).unwrap()))
    }

    /// Returns true for every pattern except `Pattern::Never`.
    pub fn is_recurring(&self) -> bool {
        !matches!(*self, Pattern::Never)
    }

    /// Returns the first date strictly after `reference` on which this
    /// pattern occurs.
    ///
    /// Asking `Pattern::Never` for its next occurrence is an error.
    pub fn next_after(&self, reference: Date) -> Result<Date, Error> {
        let next = match *self {
            Pattern::Never => return Err(Error::not_recurring()),
            Pattern::Weekly(weekday) => {
                occurrence::weekly(reference, weekday)?
            }
            Pattern::MonthlyDay(day) => {
                if !(1..=31).contains(&day) {
                    return Err(Error::invalid_day(i64::from(day)));
                }
                occurrence::monthly_day(reference, day)?
            }
            Pattern::MonthlyNthWeekday(n) => {
                if !(1..=5).contains(&n) {
                    return Err(Error::invalid_pattern(self.to_string()));
                }
                occurrence::nth_weekday(reference, n)?
            }
            Pattern::MonthlyLastWeekend => {
                occurrence::last_weekend(reference)?
            }
        };
        let Some(next) = next else {
            return Err(Error::no_occurrence(*self, reference));
        };
        log::trace!("next occurrence of `{self}` after {reference} is {next}");
        Ok(next)
    }

    /// Returns the next occurrence of this pattern after the calendar date
    /// of `reference`.
    ///
    /// The time of day of `reference` is ignored. The occurrence returned is
    /// the start of its day in the same time zone as `reference`.
    pub fn next_occurrence(&self, reference: &Zoned) -> Result<Zoned, Error> {
        let date = self.next_after(reference.date())?;
        Ok(date.to_zoned(reference.time_zone().clone())?)
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Pattern::Never => f.write_str("none"),
            Pattern::Weekly(weekday) => {
                write!(f, "Every {}", weekday_name(weekday))
            }
            Pattern::MonthlyDay(day) => write!(f, "Day {day} of each month"),
            Pattern::MonthlyNthWeekday(n) => {
                write!(f, "{} weekday of each month", Ordinal(i64::from(n)))
            }
            Pattern::MonthlyLastWeekend => {
                f.write_str("Last weekend of each month")
            }
        }
    }
}

impl std::str::FromStr for Pattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Pattern, Error> {
        Pattern::parse(s)
    }
}

impl FromBytes for Pattern {
    type Err = anyhow::Error;

    fn from_bytes(s: &[u8]) -> anyhow::Result<Pattern> {
        let s = std::str::from_utf8(s).map_err(|_| {
            anyhow::anyhow!(
                "recurrence pattern `{}` is not valid UTF-8",
                bstr::BStr::new(s),
            )
        })?;
        Ok(Pattern::parse(s)?)
    }
}

impl serde::Serialize for Pattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Pattern {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Pattern, D::Error> {
        use serde::de;

        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = Pattern;

            fn expecting(
                &self,
                f: &mut core::fmt::Formatter,
            ) -> core::fmt::Result {
                f.write_str("a recurrence pattern string")
            }

            fn visit_str<E: de::Error>(
                self,
                value: &str,
            ) -> Result<Pattern, E> {
                value.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}

/// An error that can occur when parsing a pattern or computing its next
/// occurrence.
///
/// None of these are transient. Callers can inspect `Error::kind` to give
/// more specific hints, e.g., the valid range of days for an invalid day.
#[derive(Clone, Debug)]
pub struct Error {
    kind: ErrorKind,
}

/// The specific kind of a recurrence error.
#[derive(Clone, Debug)]
pub enum ErrorKind {
    /// The input matched none of the supported recurrence descriptions, or
    /// the ordinal of an nth-weekday description is out of range.
    InvalidPattern { input: String },
    /// A monthly description named a day outside of `1..=31`.
    InvalidDay { day: i64 },
    /// The next occurrence of `Pattern::Never` was requested.
    NotRecurring,
    /// The pattern has no occurrence within its search bound.
    NoOccurrence { pattern: Pattern, reference: Date },
    /// Date arithmetic fell outside the range of supported dates.
    Calendar(jiff::Error),
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    fn invalid_pattern(input: impl Into<String>) -> Error {
        Error { kind: ErrorKind::InvalidPattern { input: input.into() } }
    }

    fn invalid_day(day: i64) -> Error {
        Error { kind: ErrorKind::InvalidDay { day } }
    }

    fn not_recurring() -> Error {
        Error { kind: ErrorKind::NotRecurring }
    }

    fn no_occurrence(pattern: Pattern, reference: Date) -> Error {
        Error { kind: ErrorKind::NoOccurrence { pattern, reference } }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.kind {
            ErrorKind::InvalidPattern { ref input } => {
                write!(f, "invalid recurrence pattern `{input}`")
            }
            ErrorKind::InvalidDay { day } => write!(
                f,
                "invalid day `{day}` for monthly recurrence, \
                 day must be in the range 1-31",
            ),
            ErrorKind::NotRecurring => f.write_str(
                "a non-recurring pattern does not have a next occurrence",
            ),
            ErrorKind::NoOccurrence { pattern, reference } => write!(
                f,
                "could not find an occurrence of `{pattern}` \
                 after {reference}",
            ),
            ErrorKind::Calendar(ref err) => {
                write!(f, "failed to compute occurrence: {err}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind {
            ErrorKind::Calendar(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<jiff::Error> for Error {
    fn from(err: jiff::Error) -> Error {
        Error { kind: ErrorKind::Calendar(err) }
    }
}

/// Returns the capitalized English name of a weekday.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sunday => "Sunday",
        Weekday::Monday => "Monday",
        Weekday::Tuesday => "Tuesday",
        Weekday::Wednesday => "Wednesday",
        Weekday::Thursday => "Thursday",
        Weekday::Friday => "Friday",
        Weekday::Saturday => "Saturday",
    }
}

/// Displays a number with its English ordinal suffix, e.g., `2nd`.
struct Ordinal(i64);

impl std::fmt::Display for Ordinal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let n = self.0;
        let suffix = match (n.rem_euclid(10), n.rem_euclid(100)) {
            (_, 11..=13) => "th",
            (1, _) => "st",
            (2, _) => "nd",
            (3, _) => "rd",
            _ => "th",
        };
        write!(f, "{n}{suffix}")
    }
}
