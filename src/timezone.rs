//! Resolves the timezone that decides which day "today" is.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// The timezone the exchange publishes coupon dates in.
pub const DEFAULT_TIMEZONE: &str = "Europe/Moscow";

/// Get the current UTC offset of `canonical_timezone`, e.g. "Europe/Moscow".
///
/// # Errors
/// Returns [Error::InvalidTimezone] if `canonical_timezone` is not a known
/// canonical timezone name.
pub fn get_local_offset(canonical_timezone: &str) -> Result<UtcOffset, Error> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
        .ok_or_else(|| Error::InvalidTimezone(canonical_timezone.to_owned()))
}

#[cfg(test)]
mod tests {
    use time::UtcOffset;

    use crate::{Error, timezone::get_local_offset};

    #[test]
    fn resolves_moscow_offset() {
        // Moscow has not observed daylight saving time since 2014.
        assert_eq!(
            get_local_offset("Europe/Moscow"),
            Ok(UtcOffset::from_hms(3, 0, 0).unwrap())
        );
    }

    #[test]
    fn rejects_unknown_timezone() {
        assert_eq!(
            get_local_offset("Mars/Olympus_Mons"),
            Err(Error::InvalidTimezone("Mars/Olympus_Mons".to_owned()))
        );
    }
}
