use std::sync::LazyLock;

use {jiff::civil::Weekday, regex::Regex};

use super::{Error, Pattern};

/// A parser for free-form recurrence descriptions.
///
/// The parser owns its compiled regexes. Building one is somewhat costly,
/// so most callers should use `PatternParser::global`, which is built once
/// and then reused.
///
/// Alternatives are tried from most to least specific. In particular, the
/// monthly day-of-month regex is permissive enough that it must go last.
#[derive(Clone, Debug)]
pub struct PatternParser {
    weekly: Regex,
    nth_weekday: Regex,
    last_weekend: Regex,
    monthly_day: Regex,
}

impl PatternParser {
    /// Compiles a new parser.
    pub fn new() -> PatternParser {
        // Note that `[0-9]` is used instead of `\d` since the latter matches
        // any Unicode digit, which `str::parse` would then reject.
        //
        // The unwraps are OK since these are fixed regexes known to compile.
        PatternParser {
            weekly: Regex::new(
                r"^every\s+(sunday|monday|tuesday|wednesday|thursday|friday|saturday)$",
            )
            .unwrap(),
            nth_weekday: Regex::new(
                r"(?x)
                ^(?:
                    (?<digits>[0-9]+)(?:st|nd|rd|th)
                    |
                    (?<word>first|second|third|fourth|fifth)
                )
                \s+weekday\s+of\s+(?:(?:the|each|every)\s+)?month$
                ",
            )
            .unwrap(),
            last_weekend: Regex::new(
                r"^last\s+weekend\s+of\s+(?:(?:the|each|every)\s+)?month$",
            )
            .unwrap(),
            monthly_day: Regex::new(
                r"(?x)
                ^(?:on\s+)?(?:day\s+)?
                (?<day>[0-9]{1,2})(?:st|nd|rd|th)?
                (?:\s+of\s+(?:(?:the|each|every)\s+)?month)?$
                ",
            )
            .unwrap(),
        }
    }

    /// Returns a shared parser that is compiled on first use.
    pub fn global() -> &'static PatternParser {
        static PARSER: LazyLock<PatternParser> =
            LazyLock::new(PatternParser::new);
        &*PARSER
    }

    /// Parses the given description into a pattern.
    ///
    /// When the description names a monthly day outside of `1..=31`, then an
    /// "invalid day" error is returned. Otherwise, when the description
    /// doesn't match any supported form (including an nth-weekday ordinal
    /// outside of `1..=5`), an "invalid pattern" error is returned.
    pub fn parse(&self, input: &str) -> Result<Pattern, Error> {
        let trimmed = input.trim();
        let normalized = trimmed.to_lowercase();
        if normalized.is_empty() || normalized == "none" {
            log::trace!("`{trimmed}` is a non-recurring pattern");
            return Ok(Pattern::Never);
        }

        if let Some(caps) = self.weekly.captures(&normalized) {
            let Some(weekday) = parse_weekday(&caps[1]) else {
                return Err(Error::invalid_pattern(trimmed));
            };
            log::trace!("`{trimmed}` matched weekly pattern");
            return Ok(Pattern::Weekly(weekday));
        }
        if let Some(caps) = self.nth_weekday.captures(&normalized) {
            let n = if let Some(digits) = caps.name("digits") {
                // Too many digits to fit into an `i64` is out of range too.
                digits
                    .as_str()
                    .parse::<i64>()
                    .map_err(|_| Error::invalid_pattern(trimmed))?
            } else {
                match caps.name("word").map(|m| m.as_str()) {
                    Some("first") => 1,
                    Some("second") => 2,
                    Some("third") => 3,
                    Some("fourth") => 4,
                    Some("fifth") => 5,
                    _ => return Err(Error::invalid_pattern(trimmed)),
                }
            };
            if !(1..=5).contains(&n) {
                return Err(Error::invalid_pattern(trimmed));
            }
            log::trace!("`{trimmed}` matched nth weekday pattern (n={n})");
            return Pattern::nth_weekday(n);
        }
        if self.last_weekend.is_match(&normalized) {
            log::trace!("`{trimmed}` matched last weekend pattern");
            return Ok(Pattern::MonthlyLastWeekend);
        }
        if let Some(caps) = self.monthly_day.captures(&normalized) {
            // At most two ASCII digits, so this can't fail.
            let day = caps["day"]
                .parse::<i64>()
                .map_err(|_| Error::invalid_pattern(trimmed))?;
            log::trace!("`{trimmed}` matched monthly pattern (day={day})");
            return Pattern::monthly_day(day);
        }
        Err(Error::invalid_pattern(trimmed))
    }
}

impl Default for PatternParser {
    fn default() -> PatternParser {
        PatternParser::new()
    }
}

/// Parses a lowercase English weekday name.
fn parse_weekday(name: &str) -> Option<Weekday> {
    Some(match name {
        "sunday" => Weekday::Sunday,
        "monday" => Weekday::Monday,
        "tuesday" => Weekday::Tuesday,
        "wednesday" => Weekday::Wednesday,
        "thursday" => Weekday::Thursday,
        "friday" => Weekday::Friday,
        "saturday" => Weekday::Saturday,
        _ => return None,
    })
}
