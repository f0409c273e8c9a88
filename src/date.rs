//! Calendar date helpers: midnight truncation, date-only comparison and the
//! fixed `DD.MM.YYYY` display format used by the widget.

use std::cmp::Ordering;

use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::Error;

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

const DATE_TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Zero out the hours, minutes, seconds and sub-second part of `date_time`.
pub fn truncate_to_midnight(date_time: OffsetDateTime) -> OffsetDateTime {
    date_time.replace_time(Time::MIDNIGHT)
}

/// The current date in the timezone given by `local_offset`, truncated to midnight.
pub fn today(local_offset: UtcOffset) -> Date {
    truncate_to_midnight(OffsetDateTime::now_utc().to_offset(local_offset)).date()
}

/// Compare two calendar dates, ignoring any time-of-day.
///
/// `Less` means `a` is before `b`, `Greater` means `a` is after `b`.
pub fn compare_dates(a: Date, b: Date) -> Ordering {
    a.cmp(&b)
}

/// Format `date` as `DD.MM.YYYY`, zero-padded.
pub fn format_display(date: Date) -> String {
    format!(
        "{:02}.{:02}.{:04}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

/// Parse a coupon date as sent by the exchange.
///
/// Accepts `YYYY-MM-DD` and `YYYY-MM-DD HH:MM:SS`, in which case only the
/// date part is kept.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` matches neither format.
pub fn parse_coupon_date(text: &str) -> Result<Date, Error> {
    let text = text.trim();

    if let Ok(date) = Date::parse(text, DATE_FORMAT) {
        return Ok(date);
    }

    PrimitiveDateTime::parse(text, DATE_TIME_FORMAT)
        .map(|date_time| date_time.date())
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use time::macros::{date, datetime};

    use crate::{
        Error,
        date::{compare_dates, format_display, parse_coupon_date, truncate_to_midnight},
    };

    #[test]
    fn truncates_time_of_day() {
        let date_time = datetime!(2024-07-01 17:45:12.345 +3);

        let got = truncate_to_midnight(date_time);

        assert_eq!(got, datetime!(2024-07-01 0:00 +3));
    }

    #[test]
    fn compares_dates() {
        assert_eq!(
            compare_dates(date!(2024 - 01 - 01), date!(2024 - 06 - 01)),
            Ordering::Less
        );
        assert_eq!(
            compare_dates(date!(2024 - 06 - 01), date!(2024 - 06 - 01)),
            Ordering::Equal
        );
        assert_eq!(
            compare_dates(date!(2024 - 12 - 01), date!(2024 - 06 - 01)),
            Ordering::Greater
        );
    }

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(format_display(date!(2024 - 03 - 05)), "05.03.2024");
        assert_eq!(format_display(date!(2031 - 12 - 25)), "25.12.2031");
    }

    #[test]
    fn parses_date_and_date_time() {
        assert_eq!(parse_coupon_date("2024-12-01"), Ok(date!(2024 - 12 - 01)));
        assert_eq!(
            parse_coupon_date("2024-12-01 00:00:00"),
            Ok(date!(2024 - 12 - 01))
        );
        assert_eq!(parse_coupon_date(" 2024-12-01 "), Ok(date!(2024 - 12 - 01)));
    }

    #[test]
    fn rejects_malformed_dates() {
        for text in ["", "not a date", "2024-13-01", "01.12.2024", "0000-00-00"] {
            assert_eq!(
                parse_coupon_date(text),
                Err(Error::InvalidDate(text.to_owned())),
                "want {text:?} to be rejected"
            );
        }
    }
}
