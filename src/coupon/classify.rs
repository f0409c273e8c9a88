use std::cmp::Ordering;

use time::Date;

use crate::coupon::CouponDate;

/// How a coupon row is marked in the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponStatus {
    /// The next coupon to be paid.
    Current,
    /// A coupon paid before today.
    Disabled,
    /// A coupon paid today that is not the current coupon.
    Upcoming,
    /// A future coupon with no marker.
    Plain,
}

/// Classify a coupon by its date.
///
/// The checks run in order: a match with `current_coupon_date` wins over
/// everything else, then dates before `today` are disabled and dates equal to
/// `today` are upcoming. `today` must already be truncated to midnight.
pub fn classify(
    coupon_date: &CouponDate,
    today: Date,
    current_coupon_date: Option<&CouponDate>,
) -> CouponStatus {
    if current_coupon_date == Some(coupon_date) {
        return CouponStatus::Current;
    }

    match coupon_date.cmp_day(today) {
        Ordering::Less => CouponStatus::Disabled,
        Ordering::Equal => CouponStatus::Upcoming,
        Ordering::Greater => CouponStatus::Plain,
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::coupon::{CouponDate, CouponStatus, classify};

    const TODAY: time::Date = date!(2024 - 07 - 01);

    #[test]
    fn anchor_is_current() {
        let anchor = CouponDate::Valid(date!(2024 - 12 - 01));

        assert_eq!(
            classify(&anchor, TODAY, Some(&anchor)),
            CouponStatus::Current
        );
    }

    #[test]
    fn anchor_on_today_is_current_not_upcoming() {
        let anchor = CouponDate::Valid(TODAY);

        assert_eq!(
            classify(&anchor, TODAY, Some(&anchor)),
            CouponStatus::Current
        );
    }

    #[test]
    fn past_coupon_is_disabled() {
        let anchor = CouponDate::Valid(date!(2024 - 12 - 01));
        let past = CouponDate::Valid(date!(2024 - 06 - 30));

        assert_eq!(classify(&past, TODAY, Some(&anchor)), CouponStatus::Disabled);
        assert_eq!(classify(&past, TODAY, None), CouponStatus::Disabled);
    }

    #[test]
    fn coupon_on_today_without_matching_anchor_is_upcoming() {
        let on_today = CouponDate::Valid(TODAY);
        let other_anchor = CouponDate::Valid(date!(2024 - 12 - 01));

        assert_eq!(classify(&on_today, TODAY, None), CouponStatus::Upcoming);
        assert_eq!(
            classify(&on_today, TODAY, Some(&other_anchor)),
            CouponStatus::Upcoming
        );
    }

    #[test]
    fn later_coupon_is_plain() {
        let anchor = CouponDate::Valid(date!(2024 - 12 - 01));
        let later = CouponDate::Valid(date!(2025 - 06 - 01));

        assert_eq!(classify(&later, TODAY, Some(&anchor)), CouponStatus::Plain);
    }

    #[test]
    fn invalid_date_is_plain_unless_it_is_the_anchor() {
        let invalid = CouponDate::Invalid("n/a".to_owned());
        let other_invalid = CouponDate::Invalid("tbd".to_owned());

        assert_eq!(classify(&invalid, TODAY, None), CouponStatus::Plain);
        assert_eq!(
            classify(&invalid, TODAY, Some(&other_invalid)),
            CouponStatus::Plain
        );
        assert_eq!(
            classify(&invalid, TODAY, Some(&invalid)),
            CouponStatus::Current
        );
    }
}
