use chrono::{Locale, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::prelude::*;
use crate::{CalendarDate, DAYS_PER_WEEK, DEFAULT_LOCALE, REFERENCE_SUNDAY};

/// A BCP 47 style tag such as `en-US` or `es`. Selects labels only, never arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Deref, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleTag(String);

impl LocaleTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary language subtag, lowercased: `es-MX` gives `es`.
    pub fn language(&self) -> String {
        self.0
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    /// POSIX spelling (`es_MX`) used by the locale tables.
    fn posix(&self) -> String {
        self.0.trim().replace('-', "_")
    }
}

impl Default for LocaleTag {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl From<&str> for LocaleTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// Languages with their own "Today" label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Spanish,
    French,
    German,
    Portuguese,
}

impl Language {
    pub const ALL: [Self; 5] = [
        Self::English,
        Self::Spanish,
        Self::French,
        Self::German,
        Self::Portuguese,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
            Self::French => "fr",
            Self::German => "de",
            Self::Portuguese => "pt",
        }
    }

    pub const fn today(self) -> &'static str {
        match self {
            Self::English => "Today",
            Self::Spanish => "Hoy",
            Self::French => "Aujourd'hui",
            Self::German => "Heute",
            Self::Portuguese => "Hoje",
        }
    }

    /// Locale used when a tag names the language but no known region.
    const fn default_locale(self) -> Locale {
        match self {
            Self::English => Locale::en_US,
            Self::Spanish => Locale::es_ES,
            Self::French => Locale::fr_FR,
            Self::German => Locale::de_DE,
            Self::Portuguese => Locale::pt_BR,
        }
    }

    /// Resolves full tags and bare language codes alike: `es-ES`, `es-MX` and `es`.
    pub fn from_tag(tag: &LocaleTag) -> Option<Self> {
        let language = tag.language();
        Self::ALL.into_iter().find(|l| l.code() == language)
    }
}

/// Localized "Today", falling back to English for unknown tags.
pub fn today_label(locale: &LocaleTag) -> &'static str {
    Language::from_tag(locale).map_or(Language::English.today(), Language::today)
}

/// Short weekday names, Sunday first, in `locale`.
///
/// Walks seven days from a fixed Sunday through the locale formatter; unknown
/// tags use their language's default region, then `en-US`.
pub fn weekday_labels(locale: &LocaleTag) -> [String; DAYS_PER_WEEK] {
    let chrono_locale = resolve(locale);
    let (year, month, day) = REFERENCE_SUNDAY;
    let sunday = NaiveDate::from_ymd_opt(year, month, day);
    std::array::from_fn(|offset| {
        sunday
            .and_then(|d| d.checked_add_days(chrono::Days::new(offset as u64)))
            .map(|d| localized(d, "%a", chrono_locale))
            .unwrap_or_default()
    })
}

/// Header text for the month view, e.g. `March 2024`.
pub fn month_label(locale: &LocaleTag, anchor: &CalendarDate) -> String {
    let chrono_locale = resolve(locale);
    anchor
        .first_of_month()
        .to_naive()
        .map(|d| localized(d, "%B %Y", chrono_locale))
        .unwrap_or_else(|| anchor.to_string())
}

fn resolve(locale: &LocaleTag) -> Locale {
    Locale::try_from(locale.posix().as_str())
        .ok()
        .or_else(|| Language::from_tag(locale).map(Language::default_locale))
        .unwrap_or(Locale::en_US)
}

fn localized(date: NaiveDate, pattern: &str, locale: Locale) -> String {
    date.and_hms_opt(12, 0, 0)
        .map(|noon| {
            Utc.from_utc_datetime(&noon)
                .format_localized(pattern, locale)
                .to_string()
        })
        .unwrap_or_default()
}
