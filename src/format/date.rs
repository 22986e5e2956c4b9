use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use regex::Regex;

use super::DateFormatting;

pub const INVALID_DATE: &str = "Invalid date";
pub const DEFAULT_DISPLAY_PATTERN: &str = "MM/DD/YYYY";

/// Longest tokens first so `YYYY` wins over `YY` and `MMM` over `MM`.
const TOKENS: [&str; 21] = [
    "YYYY", "YY", "MMMM", "MMM", "MM", "M", "dddd", "ddd", "DD", "D", "HH", "H", "hh", "h", "mm",
    "m", "ss", "s", "A", "a", "Z",
];

enum Piece<'a> {
    Token(&'a str),
    Literal(&'a str),
}

/// Splits a pattern into tokens and literal runs. `[...]` is always literal.
fn tokenize(pattern: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut rest = pattern;
    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                pieces.push(Piece::Literal(&rest[1..end]));
                rest = &rest[end + 1..];
                continue;
            }
        }
        if let Some(token) = TOKENS.iter().copied().find(|t| rest.starts_with(t)) {
            pieces.push(Piece::Token(token));
            rest = &rest[token.len()..];
            continue;
        }
        pieces.push(Piece::Literal(&rest[..c.len_utf8()]));
        rest = &rest[c.len_utf8()..];
    }
    pieces
}

/// Moment-style date patterns (`YYYY-MM-DD`, `MMM D, YYYY`, `hh:mm A`, ...)
/// parsed strictly and rendered through chrono.
#[derive(Clone, Debug, Default)]
pub struct MomentDateFormatter;

impl MomentDateFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, value: &str, source_pattern: Option<&str>) -> Option<DateTime<FixedOffset>> {
        let value = value.trim();
        match source_pattern.filter(|p| !p.trim().is_empty()) {
            Some(pattern) => parse_with_pattern(value, &MomentPattern::compile(pattern)),
            None => parse_iso(value),
        }
    }
}

impl DateFormatting for MomentDateFormatter {
    fn format_date(
        &self,
        value: &str,
        source_pattern: Option<&str>,
        display_pattern: Option<&str>,
    ) -> String {
        let Some(parsed) = self.parse(value, source_pattern) else {
            return INVALID_DATE.to_string();
        };
        let display = display_pattern
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_DISPLAY_PATTERN);
        parsed
            .format(&MomentPattern::compile(display).format)
            .to_string()
    }
}

/// A moment pattern translated to chrono strftime strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MomentPattern {
    /// Used for parsing once `matcher` has accepted the input.
    pub parse: String,
    /// Anchored regex source fixing the digit count of every numeric field.
    pub matcher: String,
    /// Used for rendering: unpadded tokens map to `%-` specifiers.
    pub format: String,
    pub has_date: bool,
    pub has_time: bool,
    pub has_offset: bool,
}

impl MomentPattern {
    pub fn compile(pattern: &str) -> Self {
        let mut out = Self {
            parse: String::new(),
            matcher: String::from("^"),
            format: String::new(),
            has_date: false,
            has_time: false,
            has_offset: false,
        };

        for piece in tokenize(pattern) {
            let token = match piece {
                Piece::Literal(text) => {
                    out.push_literal(text);
                    continue;
                }
                Piece::Token(token) => token,
            };

            let (parse, matcher, format) = match token {
                "YYYY" => ("%Y", r"\d{4}", "%Y"),
                "YY" => ("%y", r"\d{2}", "%y"),
                "MMMM" => ("%B", "[A-Za-z]+", "%B"),
                "MMM" => ("%b", "[A-Za-z]{3}", "%b"),
                "MM" => ("%m", r"\d{2}", "%m"),
                "M" => ("%m", r"\d{1,2}", "%-m"),
                "dddd" => ("%A", "[A-Za-z]+", "%A"),
                "ddd" => ("%a", "[A-Za-z]{3}", "%a"),
                "DD" => ("%d", r"\d{2}", "%d"),
                "D" => ("%d", r"\d{1,2}", "%-d"),
                "HH" => ("%H", r"\d{2}", "%H"),
                "H" => ("%H", r"\d{1,2}", "%-H"),
                "hh" => ("%I", r"\d{2}", "%I"),
                "h" => ("%I", r"\d{1,2}", "%-I"),
                "mm" => ("%M", r"\d{2}", "%M"),
                "m" => ("%M", r"\d{1,2}", "%-M"),
                "ss" => ("%S", r"\d{2}", "%S"),
                "s" => ("%S", r"\d{1,2}", "%-S"),
                "A" => ("%p", "(?i:am|pm)", "%p"),
                "a" => ("%p", "(?i:am|pm)", "%P"),
                "Z" => ("%:z", r"[+-]\d{2}:\d{2}", "%:z"),
                _ => continue,
            };
            match token {
                "Z" => out.has_offset = true,
                "HH" | "H" | "hh" | "h" | "mm" | "m" | "ss" | "s" | "A" | "a" => {
                    out.has_time = true
                }
                _ => out.has_date = true,
            }
            out.parse.push_str(parse);
            out.matcher.push_str(matcher);
            out.format.push_str(format);
        }
        out.matcher.push('$');
        out
    }

    fn push_literal(&mut self, text: &str) {
        let escaped = text.replace('%', "%%");
        self.parse.push_str(&escaped);
        self.matcher.push_str(&regex::escape(text));
        self.format.push_str(&escaped);
    }
}

fn attach_utc(naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    Utc.fix().from_local_datetime(&naive).single()
}

fn parse_with_pattern(value: &str, pattern: &MomentPattern) -> Option<DateTime<FixedOffset>> {
    if !Regex::new(&pattern.matcher).ok()?.is_match(value) {
        return None;
    }
    if pattern.has_offset {
        return DateTime::parse_from_str(value, &pattern.parse).ok();
    }
    if pattern.has_time && pattern.has_date {
        let naive = NaiveDateTime::parse_from_str(value, &pattern.parse).ok()?;
        return attach_utc(naive);
    }
    if pattern.has_date {
        let date = NaiveDate::parse_from_str(value, &pattern.parse).ok()?;
        return attach_utc(date.and_time(NaiveTime::MIN));
    }
    None
}

fn parse_iso(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return attach_utc(naive);
        }
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    attach_utc(date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: &str, from: Option<&str>, to: Option<&str>) -> String {
        MomentDateFormatter::new().format_date(value, from, to)
    }

    #[test]
    fn compiles_tokens_and_literals() {
        let p = MomentPattern::compile("YYYY-MM-DD [at] HH:mm");
        assert_eq!(p.parse, "%Y-%m-%d at %H:%M");
        assert!(p.has_date && p.has_time && !p.has_offset);

        let p = MomentPattern::compile("M/D/YY");
        assert_eq!(p.format, "%-m/%-d/%y");
        assert_eq!(p.parse, "%m/%d/%y");

        let p = MomentPattern::compile("DD [100%]");
        assert_eq!(p.format, "%d 100%%");

        let p = MomentPattern::compile("YYYY.MM [x");
        assert_eq!(p.matcher, r"^\d{4}\.\d{2} \[x$");
    }

    #[test]
    fn iso_date_to_us() {
        assert_eq!(fmt("2021-03-07", Some("YYYY-MM-DD"), Some("MM/DD/YYYY")), "03/07/2021");
        assert_eq!(fmt("2021-03-07", Some("YYYY-MM-DD"), Some("MMM D, YYYY")), "Mar 7, 2021");
        assert_eq!(fmt("2021-03-07", Some("YYYY-MM-DD"), Some("dddd")), "Sunday");
    }

    #[test]
    fn datetime_with_twelve_hour_clock() {
        assert_eq!(
            fmt("2021-03-07 14:05", Some("YYYY-MM-DD HH:mm"), Some("M/D/YYYY h:mm A")),
            "3/7/2021 2:05 PM"
        );
    }

    #[test]
    fn single_letter_tokens_take_one_or_two_digits() {
        assert_eq!(fmt("3/7/2021", Some("M/D/YYYY"), None), "03/07/2021");
        assert_eq!(fmt("12/25/2021", Some("M/D/YYYY"), None), "12/25/2021");
        assert_eq!(fmt("Mar 7, 2021", Some("MMM D, YYYY"), Some("YYYY-MM-DD")), "2021-03-07");
    }

    #[test]
    fn missing_patterns_fall_back_to_iso_and_us() {
        assert_eq!(fmt("2021-12-25", None, None), "12/25/2021");
        assert_eq!(fmt("2021-12-25T08:30:00Z", None, Some("YYYY-MM-DD HH:mm")), "2021-12-25 08:30");
    }

    #[test]
    fn strict_parse_rejects_mismatch() {
        assert_eq!(fmt("07/03/2021", Some("YYYY-MM-DD"), Some("MM/DD/YYYY")), INVALID_DATE);
        assert_eq!(fmt("2021-03-07 extra", Some("YYYY-MM-DD"), None), INVALID_DATE);
        assert_eq!(fmt("2021-02-30", Some("YYYY-MM-DD"), None), INVALID_DATE);
        assert_eq!(fmt("2021-3-7", Some("YYYY-MM-DD"), None), INVALID_DATE);
        assert_eq!(fmt("21-03-07", Some("YYYY-MM-DD"), None), INVALID_DATE);
        assert_eq!(fmt("2021-03-07 9:05", Some("YYYY-MM-DD HH:mm"), None), INVALID_DATE);
        assert_eq!(fmt("not a date", None, None), INVALID_DATE);
    }
}
