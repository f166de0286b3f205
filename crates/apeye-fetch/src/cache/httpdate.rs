//! IMF-fixdate parsing and formatting for `Date` and `Expires`.

use chrono::{DateTime, Utc};

const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc2822(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            // RFC 850, e.g. "Sunday, 06-Nov-94 08:49:37 GMT"
            chrono::NaiveDateTime::parse_from_str(value, "%A, %d-%b-%y %H:%M:%S GMT")
                .ok()
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            // asctime, e.g. "Sun Nov  6 08:49:37 1994"
            chrono::NaiveDateTime::parse_from_str(value, "%a %b %e %H:%M:%S %Y")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

pub fn format(time: DateTime<Utc>) -> String { time.format(IMF_FIXDATE).to_string() }
