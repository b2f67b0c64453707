use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CANONICAL_SEPARATOR, CalendarDate, FORMATTED_LEN, ParseError};

/// Order in which day, month and year appear in a display format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldOrder {
    DayMonthYear,
    MonthDayYear,
    YearMonthDay,
}

impl FieldOrder {
    /// Maps three fields in display order onto `(year, month, day)`.
    const fn assign(self, [a, b, c]: [u32; 3]) -> (u32, u32, u32) {
        match self {
            Self::DayMonthYear => (c, b, a),
            Self::MonthDayYear => (c, a, b),
            Self::YearMonthDay => (a, b, c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Separator {
    Dash,
    Slash,
}

impl Separator {
    pub const fn as_char(self) -> char {
        match self {
            Self::Dash => '-',
            Self::Slash => '/',
        }
    }
}

/// One of the six user-facing date layouts.
///
/// Serialized, parsed and printed as its pattern string, e.g. `"DD/MM/YYYY"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayFormat {
    #[serde(rename = "DD-MM-YYYY")]
    DayMonthYearDash,
    #[serde(rename = "MM-DD-YYYY")]
    MonthDayYearDash,
    #[serde(rename = "YYYY-MM-DD")]
    YearMonthDayDash,
    #[default]
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYearSlash,
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYearSlash,
    #[serde(rename = "YYYY/MM/DD")]
    YearMonthDaySlash,
}

impl DisplayFormat {
    /// The whole catalog.
    pub const ALL: [Self; 6] = [
        Self::DayMonthYearDash,
        Self::MonthDayYearDash,
        Self::YearMonthDayDash,
        Self::DayMonthYearSlash,
        Self::MonthDayYearSlash,
        Self::YearMonthDaySlash,
    ];

    pub const fn order(self) -> FieldOrder {
        match self {
            Self::DayMonthYearDash | Self::DayMonthYearSlash => FieldOrder::DayMonthYear,
            Self::MonthDayYearDash | Self::MonthDayYearSlash => FieldOrder::MonthDayYear,
            Self::YearMonthDayDash | Self::YearMonthDaySlash => FieldOrder::YearMonthDay,
        }
    }

    pub const fn separator(self) -> Separator {
        match self {
            Self::DayMonthYearDash | Self::MonthDayYearDash | Self::YearMonthDayDash => {
                Separator::Dash
            }
            Self::DayMonthYearSlash | Self::MonthDayYearSlash | Self::YearMonthDaySlash => {
                Separator::Slash
            }
        }
    }

    pub const fn pattern(self) -> &'static str {
        match self {
            Self::DayMonthYearDash => "DD-MM-YYYY",
            Self::MonthDayYearDash => "MM-DD-YYYY",
            Self::YearMonthDayDash => "YYYY-MM-DD",
            Self::DayMonthYearSlash => "DD/MM/YYYY",
            Self::MonthDayYearSlash => "MM/DD/YYYY",
            Self::YearMonthDaySlash => "YYYY/MM/DD",
        }
    }
}

impl fmt::Display for DisplayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern())
    }
}

impl FromStr for DisplayFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|format| format.pattern() == trimmed)
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!("Unknown date format pattern: {trimmed}"))
            })
    }
}

/// Parses `text` under `format`, or as canonical `YYYY-MM-DD` whatever `format` is.
///
/// Blank text, a wrong separator, non-digit fields and days that do not exist
/// all yield `None`.
pub fn parse(text: &str, format: DisplayFormat) -> Option<CalendarDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(date) = parse_canonical(trimmed) {
        return Some(date);
    }

    let parts: Vec<&str> = trimmed.split(format.separator().as_char()).collect();
    let [a, b, c] = parts.as_slice() else {
        return None;
    };
    let fields = [digits(a)?, digits(b)?, digits(c)?];
    let (year, month, day) = format.order().assign(fields);

    CalendarDate::from_parts(i64::from(year), month, day).ok()
}

/// Parses only the canonical interchange text.
pub fn parse_canonical(text: &str) -> Option<CalendarDate> {
    let (year, month, day) = split_canonical(text.trim())?;
    CalendarDate::from_parts(year, month, day).ok()
}

/// Renders `date` under `format`: zero padded, always `FORMATTED_LEN` characters.
pub fn format(date: &CalendarDate, format: DisplayFormat) -> String {
    let sep = format.separator().as_char();
    let (year, month, day) = (date.year_typed(), date.month_typed(), date.day_typed());
    // Year, Month and Day already pad themselves.
    match format.order() {
        FieldOrder::DayMonthYear => format!("{day}{sep}{month}{sep}{year}"),
        FieldOrder::MonthDayYear => format!("{month}{sep}{day}{sep}{year}"),
        FieldOrder::YearMonthDay => format!("{year}{sep}{month}{sep}{day}"),
    }
}

/// Renders `date` as canonical `YYYY-MM-DD`.
pub fn format_canonical(date: &CalendarDate) -> String {
    date.to_string()
}

/// Matches `^\d{4}-\d{2}-\d{2}$` and returns the raw numeric fields.
pub(crate) fn split_canonical(text: &str) -> Option<(i64, u32, u32)> {
    let bytes = text.as_bytes();
    if bytes.len() != FORMATTED_LEN {
        return None;
    }
    let sep = CANONICAL_SEPARATOR as u8;
    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == sep,
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }
    let year = digits(&text[0..4])?;
    let month = digits(&text[5..7])?;
    let day = digits(&text[8..10])?;
    Some((i64::from(year), month, day))
}

/// A field made only of ASCII digits; signs, spaces and empty fields are rejected.
fn digits(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: u16, m: u8, d: u8) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    #[test]
    fn test_format_each_layout() {
        let d = date(2024, 3, 5);
        let expected = [
            (DisplayFormat::DayMonthYearDash, "05-03-2024"),
            (DisplayFormat::MonthDayYearDash, "03-05-2024"),
            (DisplayFormat::YearMonthDayDash, "2024-03-05"),
            (DisplayFormat::DayMonthYearSlash, "05/03/2024"),
            (DisplayFormat::MonthDayYearSlash, "03/05/2024"),
            (DisplayFormat::YearMonthDaySlash, "2024/03/05"),
        ];
        for (format_kind, text) in expected {
            let out = format(&d, format_kind);
            assert_eq!(out, text, "{format_kind}");
            assert_eq!(out.len(), FORMATTED_LEN);
        }
    }

    #[test]
    fn test_format_pads_small_years() {
        assert_eq!(format(&date(12, 1, 2), DisplayFormat::DayMonthYearSlash), "02/01/0012");
        assert_eq!(format_canonical(&date(12, 1, 2)), "0012-01-02");
    }

    fn assert_round_trips(d: CalendarDate) {
        for format_kind in DisplayFormat::ALL {
            let text = format(&d, format_kind);
            assert_eq!(parse(&text, format_kind), Some(d), "{d} as {format_kind}");
        }
        assert_eq!(parse_canonical(&format_canonical(&d)), Some(d), "{d}");
    }

    #[test]
    fn test_parse_round_trips_every_day() {
        let last = date(2030, 12, 31);
        let mut d = date(1999, 1, 1);
        while d <= last {
            assert_round_trips(d);
            d = d.checked_add_days(1).unwrap();
        }
    }

    #[test]
    fn test_parse_round_trips_at_supported_edges() {
        for d in [date(1, 1, 1), date(12, 1, 2), date(1900, 2, 28), date(9999, 12, 31)] {
            assert_round_trips(d);
        }
    }

    #[test]
    fn test_canonical_accepted_under_any_format() {
        let d = date(2024, 3, 15);
        for format_kind in DisplayFormat::ALL {
            assert_eq!(parse(&format_canonical(&d), format_kind), Some(d), "{format_kind}");
        }
    }

    #[test]
    fn test_impossible_dates_rejected() {
        assert_eq!(parse("30-02-2024", DisplayFormat::DayMonthYearDash), None);
        assert_eq!(parse("02/29/2023", DisplayFormat::MonthDayYearSlash), None);
        assert_eq!(parse("2024-13-01", DisplayFormat::YearMonthDayDash), None);
        assert_eq!(parse("00/01/2024", DisplayFormat::DayMonthYearSlash), None);
        assert_eq!(parse("2024-02-30", DisplayFormat::DayMonthYearSlash), None);
    }

    #[test]
    fn test_malformed_text_rejected() {
        let f = DisplayFormat::DayMonthYearSlash;
        assert_eq!(parse("", f), None);
        assert_eq!(parse("   ", f), None);
        assert_eq!(parse("15-03-2024", f), None, "wrong separator");
        assert_eq!(parse("15/03", f), None);
        assert_eq!(parse("15/03/2024/1", f), None);
        assert_eq!(parse("aa/03/2024", f), None);
        assert_eq!(parse("+5/03/2024", f), None);
        assert_eq!(parse("15//2024", f), None);
        assert_eq!(parse("15/03/99999", f), None);
    }

    #[test]
    fn test_parse_accepts_unpadded_fields_and_whitespace() {
        let f = DisplayFormat::DayMonthYearSlash;
        assert_eq!(parse("5/3/2024", f), Some(date(2024, 3, 5)));
        assert_eq!(parse(" 15/03/2024 ", f), Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_parse_canonical_only() {
        assert_eq!(parse_canonical("2024-03-15"), Some(date(2024, 3, 15)));
        assert_eq!(parse_canonical("15/03/2024"), None);
        assert_eq!(parse_canonical("2024-3-15"), None);
        assert_eq!(parse_canonical("2024-02-30"), None);
    }

    #[test]
    fn test_pattern_from_str() {
        for format_kind in DisplayFormat::ALL {
            assert_eq!(format_kind.pattern().parse::<DisplayFormat>(), Ok(format_kind));
        }
        assert!(matches!(
            "DD.MM.YYYY".parse::<DisplayFormat>(),
            Err(ParseError::InvalidFormat(_))
        ));
        assert_eq!(DisplayFormat::default(), DisplayFormat::DayMonthYearSlash);
    }

    #[test]
    fn test_serde_uses_pattern() {
        let json = serde_json::to_string(&DisplayFormat::YearMonthDaySlash).unwrap();
        assert_eq!(json, r#""YYYY/MM/DD""#);
        let parsed: DisplayFormat = serde_json::from_str(r#""MM-DD-YYYY""#).unwrap();
        assert_eq!(parsed, DisplayFormat::MonthDayYearDash);
        assert!(serde_json::from_str::<DisplayFormat>(r#""D/M/Y""#).is_err());
    }
}
