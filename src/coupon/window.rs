use std::ops::Range;

use time::Date;

use crate::coupon::{CouponDate, DisplayCouponEntry, RawCouponRecord, classify};

/// Past coupons shown before the current one.
const PAST_COUPONS: usize = 2;
/// Coupons shown from the current one onwards.
const FUTURE_COUPONS: usize = 3;
/// Coupons shown from the current one onwards when there are fewer than
/// [PAST_COUPONS] past coupons to fill the left side of the window.
const FUTURE_COUPONS_WHEN_CLAMPED: usize = 5;

/// Select the coupons worth showing around `today` and mark each one.
///
/// The records are sorted by date (the input is left untouched) and the
/// window is anchored on the first coupon paid on or after `today`: up to
/// two coupons before it, then it and the two after it. When there are
/// fewer than two earlier coupons the window reaches further forward
/// instead. Records with unreadable dates sort after every valid date.
///
/// At most one entry is current: the anchor. Other records paid on the same
/// day keep their input order and are classified as if there were no anchor.
///
/// `today` must already be truncated to midnight. Returns an empty list for
/// empty input.
pub fn select_coupon_window(records: &[RawCouponRecord], today: Date) -> Vec<DisplayCouponEntry> {
    if records.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<(CouponDate, &RawCouponRecord)> = records
        .iter()
        .map(|record| (CouponDate::parse(&record.date), record))
        .collect();
    sorted.sort_by(|(a, _), (b, _)| a.chronological_cmp(b));

    let first_upcoming_index = sorted
        .iter()
        .position(|(date, _)| date.cmp_day(today).is_ge())
        .unwrap_or(sorted.len());

    tracing::debug!(
        "selecting coupons around index {first_upcoming_index} of {}",
        sorted.len()
    );

    window_bounds(first_upcoming_index, sorted.len())
        .map(|index| {
            let (date, record) = &sorted[index];
            // Only the anchor itself is current, records sharing its date are not.
            let current_coupon_date = (index == first_upcoming_index).then_some(date);
            let status = classify(date, today, current_coupon_date);
            DisplayCouponEntry::new(record, date, status)
        })
        .collect()
}

/// The slice of a sorted series of `len` coupons to display, where
/// `first_upcoming_index` is `len` when every coupon is in the past.
fn window_bounds(first_upcoming_index: usize, len: usize) -> Range<usize> {
    let start = first_upcoming_index.saturating_sub(PAST_COUPONS);
    let forward = if start == 0 {
        FUTURE_COUPONS_WHEN_CLAMPED
    } else {
        FUTURE_COUPONS
    };
    let end = len.min(first_upcoming_index + forward);

    start..end
}
