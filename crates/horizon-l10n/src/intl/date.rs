//! Locale-aware date and time formatting.

use chrono::{DateTime, Datelike};
use chrono_tz::Tz;

use super::options::{DateLength, TimeLength};

/// Date component ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateOrder {
    /// Day/Month/Year (most of the world)
    Dmy,
    /// Month/Day/Year (US)
    Mdy,
    /// Year/Month/Day (ISO, East Asian)
    Ymd,
}

/// Locale-aware date and time formatter.
///
/// Without the `cldr` feature, formats come from built-in tables:
/// - `en-US`: MM/DD/YY, 12-hour time
/// - `en-GB`, `en-AU`: DD/MM/YY, 24-hour time
/// - `de-DE`, `de-AT`: DD.MM.YY, 24-hour time
/// - `fr-FR`: DD/MM/YY, 24-hour time
/// - `ja-JP`, `zh-CN`, `ko-KR`: YY/MM/DD, 24-hour time
pub struct DateTimeFormatter {
    locale: String,
    date_order: DateOrder,
    use_24_hour: bool,
    date_sep: char,
}

impl DateTimeFormatter {
    /// Create a date/time formatter for a specific locale.
    pub fn with_locale(locale: &str) -> Self {
        let parts: Vec<&str> = locale.trim().split(['-', '_']).collect();
        let lang = parts
            .first()
            .map(|s| s.to_lowercase())
            .unwrap_or_else(|| "en".to_string());
        let region = parts.get(1).map(|s| s.to_uppercase());

        let (date_order, date_sep) = Self::date_format_for_locale(&lang, region.as_deref());

        let use_24_hour = !matches!(
            (lang.as_str(), region.as_deref()),
            ("en", Some("US")) | ("en", Some("PH")) | ("es", Some("US")) | ("fil", _)
        );

        Self {
            locale: locale.to_string(),
            date_order,
            use_24_hour,
            date_sep,
        }
    }

    fn date_format_for_locale(lang: &str, region: Option<&str>) -> (DateOrder, char) {
        let ymd_langs = ["ja", "zh", "ko", "hu", "lt", "mn", "fa"];
        if ymd_langs.contains(&lang) {
            return (DateOrder::Ymd, '/');
        }

        if matches!(
            (lang, region),
            ("en", Some("US")) | ("en", Some("PH")) | ("es", Some("US")) | ("fil", _)
        ) {
            return (DateOrder::Mdy, '/');
        }

        let period_sep_langs = [
            "de", "no", "nb", "nn", "fi", "et", "lv", "sl", "sk", "cs", "hr", "ro", "bg", "ru",
            "uk",
        ];
        if period_sep_langs.contains(&lang) {
            return (DateOrder::Dmy, '.');
        }

        let dash_sep_langs = ["nl", "da", "sv", "is"];
        if dash_sep_langs.contains(&lang) {
            return (DateOrder::Dmy, '-');
        }

        (DateOrder::Dmy, '/')
    }

    /// Get the locale identifier.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Format date and/or time. With neither length a medium date is produced.
    pub fn format(
        &self,
        datetime: &DateTime<Tz>,
        date: Option<DateLength>,
        time: Option<TimeLength>,
    ) -> String {
        match (date, time) {
            (Some(date), Some(time)) => format!(
                "{} {}",
                self.format_date(datetime, date),
                self.format_time(datetime, time)
            ),
            (None, Some(time)) => self.format_time(datetime, time),
            (Some(date), None) => self.format_date(datetime, date),
            (None, None) => self.format_date(datetime, DateLength::Medium),
        }
    }

    /// Format a date according to the locale.
    #[cfg(feature = "cldr")]
    pub fn format_date(&self, datetime: &DateTime<Tz>, length: DateLength) -> String {
        use icu::calendar::Date;
        use icu::datetime::DateTimeFormatter as IcuDateTimeFormatter;
        use icu::datetime::fieldsets;
        use icu::locale::Locale;

        let Ok(locale) = self.locale.parse::<Locale>() else {
            return self.format_date_table(datetime, length);
        };
        let naive = datetime.naive_local();
        let Ok(icu_date) = Date::try_new_iso(naive.year(), naive.month() as u8, naive.day() as u8)
        else {
            return self.format_date_table(datetime, length);
        };

        let result = match length {
            DateLength::Short => IcuDateTimeFormatter::try_new(locale.into(), fieldsets::YMD::short())
                .ok()
                .map(|f| f.format(&icu_date).to_string()),
            DateLength::Medium => {
                IcuDateTimeFormatter::try_new(locale.into(), fieldsets::YMD::medium())
                    .ok()
                    .map(|f| f.format(&icu_date).to_string())
            }
            DateLength::Long => IcuDateTimeFormatter::try_new(locale.into(), fieldsets::YMD::long())
                .ok()
                .map(|f| f.format(&icu_date).to_string()),
            DateLength::Full => IcuDateTimeFormatter::try_new(locale.into(), fieldsets::YMDE::long())
                .ok()
                .map(|f| f.format(&icu_date).to_string()),
        };

        result.unwrap_or_else(|| self.format_date_table(datetime, length))
    }

    /// Format a date according to the locale.
    #[cfg(not(feature = "cldr"))]
    pub fn format_date(&self, datetime: &DateTime<Tz>, length: DateLength) -> String {
        self.format_date_table(datetime, length)
    }

    /// Format a time according to the locale.
    #[cfg(feature = "cldr")]
    pub fn format_time(&self, datetime: &DateTime<Tz>, length: TimeLength) -> String {
        use chrono::Timelike;
        use icu::datetime::NoCalendarFormatter;
        use icu::datetime::fieldsets;
        use icu::locale::Locale;
        use icu::time::Time;

        let Ok(locale) = self.locale.parse::<Locale>() else {
            return self.format_time_table(datetime, length);
        };
        let naive = datetime.naive_local();
        let Ok(icu_time) = Time::try_new(
            naive.hour() as u8,
            naive.minute() as u8,
            naive.second() as u8,
            0,
        ) else {
            return self.format_time_table(datetime, length);
        };

        let result = match length {
            TimeLength::Short => NoCalendarFormatter::try_new(locale.into(), fieldsets::T::short())
                .ok()
                .map(|f| f.format(&icu_time).to_string()),
            TimeLength::Medium => {
                NoCalendarFormatter::try_new(locale.into(), fieldsets::T::medium())
                    .ok()
                    .map(|f| f.format(&icu_time).to_string())
            }
            // ICU time-only field sets carry no zone; append the abbreviation.
            TimeLength::Long => NoCalendarFormatter::try_new(locale.into(), fieldsets::T::medium())
                .ok()
                .map(|f| format!("{} {}", f.format(&icu_time), datetime.format("%Z"))),
        };

        result.unwrap_or_else(|| self.format_time_table(datetime, length))
    }

    /// Format a time according to the locale.
    #[cfg(not(feature = "cldr"))]
    pub fn format_time(&self, datetime: &DateTime<Tz>, length: TimeLength) -> String {
        self.format_time_table(datetime, length)
    }

    fn format_date_table(&self, datetime: &DateTime<Tz>, length: DateLength) -> String {
        let d = datetime.day();
        let m = datetime.month();
        let y = datetime.year();
        let y_short = y % 100;
        let sep = self.date_sep;

        match length {
            DateLength::Short => match self.date_order {
                DateOrder::Dmy => format!("{d:02}{sep}{m:02}{sep}{y_short:02}"),
                DateOrder::Mdy => format!("{m:02}{sep}{d:02}{sep}{y_short:02}"),
                DateOrder::Ymd => format!("{y_short:02}{sep}{m:02}{sep}{d:02}"),
            },
            DateLength::Medium => {
                let month_abbr = datetime.format("%b");
                match self.date_order {
                    DateOrder::Dmy => format!("{d} {month_abbr} {y}"),
                    DateOrder::Mdy => format!("{month_abbr} {d}, {y}"),
                    DateOrder::Ymd => format!("{y} {month_abbr} {d}"),
                }
            }
            DateLength::Long => {
                let month_full = datetime.format("%B");
                match self.date_order {
                    DateOrder::Dmy => format!("{d} {month_full} {y}"),
                    DateOrder::Mdy => format!("{month_full} {d}, {y}"),
                    DateOrder::Ymd => format!("{y} {month_full} {d}"),
                }
            }
            DateLength::Full => {
                let weekday = datetime.format("%A");
                let month_full = datetime.format("%B");
                match self.date_order {
                    DateOrder::Dmy => format!("{weekday}, {d} {month_full} {y}"),
                    DateOrder::Mdy => format!("{weekday}, {month_full} {d}, {y}"),
                    DateOrder::Ymd => format!("{weekday}, {y} {month_full} {d}"),
                }
            }
        }
    }

    fn format_time_table(&self, datetime: &DateTime<Tz>, length: TimeLength) -> String {
        let pattern = match (self.use_24_hour, length) {
            (true, TimeLength::Short) => "%H:%M",
            (true, TimeLength::Medium) => "%H:%M:%S",
            (true, TimeLength::Long) => "%H:%M:%S %Z",
            (false, TimeLength::Short) => "%I:%M %p",
            (false, TimeLength::Medium) => "%I:%M:%S %p",
            (false, TimeLength::Long) => "%I:%M:%S %p %Z",
        };
        datetime.format(pattern).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(tz: Tz) -> DateTime<Tz> {
        tz.with_ymd_and_hms(2026, 1, 17, 15, 45, 30).unwrap()
    }

    #[cfg(not(feature = "cldr"))]
    #[test]
    fn test_us_formats() {
        let formatter = DateTimeFormatter::with_locale("en-US");
        let dt = sample(chrono_tz::America::New_York);
        assert_eq!(formatter.format_date(&dt, DateLength::Short), "01/17/26");
        assert_eq!(formatter.format_date(&dt, DateLength::Medium), "Jan 17, 2026");
        assert_eq!(formatter.format_date(&dt, DateLength::Long), "January 17, 2026");
        assert_eq!(
            formatter.format_date(&dt, DateLength::Full),
            "Saturday, January 17, 2026"
        );
        assert_eq!(formatter.format_time(&dt, TimeLength::Short), "03:45 PM");
        assert_eq!(formatter.format_time(&dt, TimeLength::Long), "03:45:30 PM EST");
    }

    #[cfg(not(feature = "cldr"))]
    #[test]
    fn test_european_formats() {
        let german = DateTimeFormatter::with_locale("de-DE");
        let dt = sample(chrono_tz::Europe::Berlin);
        assert_eq!(german.format_date(&dt, DateLength::Short), "17.01.26");
        assert_eq!(german.format_time(&dt, TimeLength::Medium), "15:45:30");

        let swedish = DateTimeFormatter::with_locale("sv_SE");
        assert_eq!(swedish.format_date(&dt, DateLength::Short), "17-01-26");

        let japanese = DateTimeFormatter::with_locale("ja-JP");
        assert_eq!(japanese.format_date(&dt, DateLength::Short), "26/01/17");
    }

    #[cfg(not(feature = "cldr"))]
    #[test]
    fn test_default_is_medium_date() {
        let formatter = DateTimeFormatter::with_locale("en-GB");
        let dt = sample(chrono_tz::UTC);
        assert_eq!(formatter.format(&dt, None, None), "17 Jan 2026");
        assert_eq!(
            formatter.format(&dt, Some(DateLength::Short), Some(TimeLength::Short)),
            "17/01/26 15:45"
        );
    }

    #[test]
    fn test_locale_is_kept() {
        assert_eq!(DateTimeFormatter::with_locale("fr-FR").locale(), "fr-FR");
    }
}
