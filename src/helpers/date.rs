//! Date helper functions
//!
//! Content dates are authored as bare `YYYYMMDD` values in front matter.

use chrono::NaiveDate;
use chrono_tz::Tz;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Parse a `YYYYMMDD` value
pub fn parse_ymd(ymd: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(ymd.trim(), "%Y%m%d").ok()
}

/// Format a `YYYYMMDD` value like "Apr 1, 2020"
pub fn formatted_date(ymd: &str) -> Option<String> {
    parse_ymd(ymd).map(|date| date.format("%b %-d, %Y").to_string())
}

/// Full English month name for a 1-based month number
pub fn month_name(month: u32) -> Option<&'static str> {
    if (1..=12).contains(&month) {
        Some(MONTH_NAMES[(month - 1) as usize])
    } else {
        None
    }
}

/// RSS publication date for a `YYYYMMDD` value: noon in the given timezone,
/// RFC-822 formatted.
pub fn rss_date(ymd: &str, tz: Tz) -> Option<String> {
    let date = parse_ymd(ymd)?;
    let noon = date.and_hms_opt(12, 0, 0)?;
    let zoned = noon.and_local_timezone(tz).single()?;
    Some(zoned.to_rfc2822())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ymd() {
        assert_eq!(
            parse_ymd("20200401"),
            NaiveDate::from_ymd_opt(2020, 4, 1)
        );
        assert_eq!(parse_ymd("not-a-date"), None);
    }

    #[test]
    fn test_formatted_date() {
        assert_eq!(formatted_date("20200401").as_deref(), Some("Apr 1, 2020"));
        assert_eq!(formatted_date("20201225").as_deref(), Some("Dec 25, 2020"));
        assert_eq!(formatted_date("garbage"), None);
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(5), Some("May"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn test_rss_date_noon_in_offset() {
        let formatted = rss_date("20200401", chrono_tz::America::Detroit).unwrap();
        assert_eq!(formatted, "Wed, 01 Apr 2020 12:00:00 -0400");
    }

    #[test]
    fn test_rss_date_rejects_bad_input() {
        assert_eq!(rss_date("2020-04-01", chrono_tz::America::Detroit), None);
    }
}
