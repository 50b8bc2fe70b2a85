use {
    anyhow::Context,
    bstr::{BStr, ByteSlice},
    jiff::{
        Zoned, civil, fmt,
        tz::{self, Offset},
    },
};

use crate::{
    NOW, TZ,
    args::Usage,
    parse::{BytesExt, FromBytes},
};

static TEMPORAL_PARSER: fmt::temporal::DateTimeParser =
    fmt::temporal::DateTimeParser::new();
static RFC2822_PARSER: fmt::rfc2822::DateTimeParser =
    fmt::rfc2822::DateTimeParser::new();

/// Represents a datetime parsed from user input.
///
/// Everything comes down to a physical instant in time in some time zone.
/// Datetimes without an explicit offset or time zone are interpreted in
/// `jiff::tz::TimeZone::system`, which users can change via the `TZ`
/// environment variable.
///
/// Parsing this type directly (e.g., from lines on stdin) only accepts
/// formats that unambiguously refer to an instant. Use `DateTimeFlexible`
/// for arguments given on the command line.
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct DateTime {
    zdt: Zoned,
}

impl DateTime {
    pub const ARG_OR_STDIN: Usage = Usage::arg(
        "<datetime>",
        "A datetime string, e.g., `today` or `2025-03-15T00:00Z`.",
        r#"
A datetime string.

Datetimes can either be passed as positional arguments or as line delimited
data on stdin, but not both. That is, datetimes will only be read from stdin
when there are no datetimes provided as positional arguments.

The following formats, each of which unambiguously refers to an instant in
time, are always accepted:

RFC 9557, e.g., `2025-03-15T10:23:00-04:00[America/New_York]`

RFC 3339, e.g., `2025-03-15T10:23:00-04:00`

RFC 2822, e.g., `Sat, 15 Mar 2025 10:23:00 -0400`

When datetimes are given as positional arguments, a few more flexible formats
are supported too:

An ISO 8601 date or datetime without an offset, e.g., `2025-03-15` or
`2025-03-15T08:30`. It is interpreted as a local time in your system's
configured time zone (which may be overridden by the `TZ` environment
variable). When the time is missing, the first instant of the day is used.

`now` refers to the current datetime. The current datetime is computed once
when Cadence starts, or if the `CADENCE_NOW` environment variable is set, that
time is used instead.

`today`, `yesterday` and `tomorrow` refer to the first instant of the
corresponding day.
"#,
    );

    pub const DATE_FLAG: Usage = Usage::flag(
        "-d/--date <datetime>",
        "The day a task falls on, e.g., `tomorrow` or `2025-03-15`.",
        r#"
The day a task falls on, e.g., `tomorrow` or `2025-03-15`.

Only the calendar date, in your system's configured time zone, is used. Any
datetime accepted on the command line works here, including RFC 9557 and RFC
3339 timestamps, ISO 8601 dates and the special strings `now`, `today`,
`yesterday` and `tomorrow`.

When this is not given, tasks default to the current day.
"#,
    );

    pub fn now() -> DateTime {
        DateTime { zdt: NOW.clone() }
    }

    /// Get the underlying Jiff zoned date time.
    pub fn get(&self) -> &Zoned {
        &self.zdt
    }

    /// Returns the calendar date of this datetime in the local time zone.
    pub fn local_date(&self) -> civil::Date {
        self.zdt.with_time_zone(TZ.clone()).date()
    }
}

impl Default for DateTime {
    fn default() -> DateTime {
        DateTime::now()
    }
}

impl From<Zoned> for DateTime {
    fn from(zdt: Zoned) -> DateTime {
        DateTime { zdt }
    }
}

impl From<DateTimeFlexible> for DateTime {
    fn from(dt: DateTimeFlexible) -> DateTime {
        DateTime { zdt: dt.zdt }
    }
}

impl std::fmt::Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.zdt, f)
    }
}

impl std::str::FromStr for DateTime {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<DateTime> {
        s.as_bytes().parse()
    }
}

impl FromBytes for DateTime {
    type Err = anyhow::Error;

    fn from_bytes(s: &[u8]) -> anyhow::Result<DateTime> {
        let s = s.trim_ascii();
        // We attempt the most specific thing first: an RFC 9557 timestamp
        // with a time zone annotation. The error is kept around in case it
        // turns out that there was an annotation, but something else about
        // the timestamp was invalid.
        let temporal_parse_err = match TEMPORAL_PARSER.parse_zoned(s) {
            Err(err) => err,
            Ok(zdt) => return Ok(DateTime::from(zdt)),
        };
        if let Ok(pieces) = fmt::temporal::Pieces::parse(s) {
            if pieces.time_zone_annotation().is_some() {
                return Err(temporal_parse_err.into());
            }
            let Some(zdt) = pieces_to_zoned(&pieces, None)? else {
                anyhow::bail!(
                    "RFC 3339 timestamp requires an offset, \
                     but {s} is missing an offset",
                    s = s.as_bstr(),
                )
            };
            return Ok(DateTime::from(zdt));
        }
        if let Ok(zdt) = RFC2822_PARSER.parse_zoned(s) {
            return Ok(DateTime::from(zdt));
        }
        anyhow::bail!("unrecognized datetime `{s}`", s = BStr::new(s))
    }
}

/// Represents a datetime parsed on the CLI.
///
/// This is only for parsing datetimes given to the CLI as positional
/// arguments or flag values. In this context, local datetimes without an
/// offset and datetimes relative to now (e.g., `today`) are supported.
///
/// Callers should only use this type as a target for parsing. Then you'll
/// want to convert it to `DateTime` (via the `From` impl) as soon as you can.
#[derive(Clone, Debug)]
pub struct DateTimeFlexible {
    zdt: Zoned,
}

impl DateTimeFlexible {
    /// Parses a "flexible" datetime, where `now`, `today`, `yesterday` and
    /// `tomorrow` are interpreted relative to the zoned datetime given.
    ///
    /// This type's `FromStr` and `FromBytes` impls are equivalent to calling
    /// this routine with `&crate::NOW`.
    pub fn parse_relative(
        relative: &Zoned,
        s: &[u8],
    ) -> anyhow::Result<DateTimeFlexible> {
        let s = s.trim_ascii();
        let temporal_parse_err = match TEMPORAL_PARSER.parse_zoned(s) {
            Err(err) => err,
            Ok(zdt) => return Ok(DateTimeFlexible::from(zdt)),
        };
        // Unlike `DateTime`, a missing offset is fine here. The datetime is
        // then taken to be local to the time zone of `relative`.
        if let Ok(pieces) = fmt::temporal::Pieces::parse(s) {
            if pieces.time_zone_annotation().is_some() {
                return Err(temporal_parse_err.into());
            }
            let local = relative.time_zone().clone();
            if let Some(zdt) = pieces_to_zoned(&pieces, Some(local))? {
                return Ok(DateTimeFlexible { zdt });
            }
        }
        if let Ok(zdt) = RFC2822_PARSER.parse_zoned(s) {
            return Ok(DateTimeFlexible::from(zdt));
        }
        if let Some(zdt) = parse_keyword(relative, s.as_bstr())? {
            return Ok(DateTimeFlexible::from(zdt));
        }
        anyhow::bail!("unrecognized datetime `{s}`", s = BStr::new(s))
    }
}

impl From<Zoned> for DateTimeFlexible {
    fn from(zdt: Zoned) -> DateTimeFlexible {
        DateTimeFlexible { zdt }
    }
}

impl std::str::FromStr for DateTimeFlexible {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<DateTimeFlexible> {
        s.as_bytes().parse()
    }
}

impl FromBytes for DateTimeFlexible {
    type Err = anyhow::Error;

    fn from_bytes(s: &[u8]) -> anyhow::Result<DateTimeFlexible> {
        DateTimeFlexible::parse_relative(&NOW, s)
    }
}

/// Converts parsed Temporal pieces (without a time zone annotation) into a
/// zoned datetime.
///
/// When the pieces have no offset, the datetime is interpreted in `local`.
/// If there is no `local` zone either, then `None` is returned.
fn pieces_to_zoned(
    pieces: &fmt::temporal::Pieces<'_>,
    local: Option<tz::TimeZone>,
) -> anyhow::Result<Option<Zoned>> {
    let date = pieces.date();
    let time = pieces.time().unwrap_or(civil::Time::midnight());
    let dt = date.to_datetime(time);
    let zdt = match pieces.offset() {
        None => {
            let Some(local) = local else { return Ok(None) };
            // A missing time means "the start of the day," which isn't
            // always midnight.
            if pieces.time().is_none() {
                date.to_zoned(local)?
            } else {
                dt.to_zoned(local)?
            }
        }
        Some(fmt::temporal::PiecesOffset::Zulu) => {
            dt.to_zoned(tz::TimeZone::unknown())?
        }
        Some(fmt::temporal::PiecesOffset::Numeric(ref off)) => {
            if off.offset() == Offset::UTC && off.is_negative() {
                dt.to_zoned(tz::TimeZone::unknown())?
            } else {
                dt.to_zoned(tz::TimeZone::fixed(off.offset()))?
            }
        }
        Some(unk) => anyhow::bail!("unrecognized parsed offset: {unk:?}"),
    };
    Ok(Some(zdt))
}

/// Parses one of the special strings `now`, `today`, `yesterday` or
/// `tomorrow` relative to the datetime given.
///
/// All but `now` refer to the first instant of the corresponding day.
fn parse_keyword(
    relative: &Zoned,
    s: &BStr,
) -> anyhow::Result<Option<Zoned>> {
    let zdt = match &*s.to_ascii_lowercase() {
        b"now" => relative.clone(),
        b"today" => relative.start_of_day()?,
        b"yesterday" => relative
            .yesterday()
            .and_then(|zdt| zdt.start_of_day())
            .with_context(|| format!("failed to find day before {relative}"))?,
        b"tomorrow" => relative
            .tomorrow()
            .and_then(|zdt| zdt.start_of_day())
            .with_context(|| format!("failed to find day after {relative}"))?,
        _ => return Ok(None),
    };
    Ok(Some(zdt))
}
