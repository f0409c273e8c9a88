//! Coupon records as they arrive from the exchange and as the widget displays them.

use std::cmp::Ordering;

use serde::Serialize;
use time::Date;

use crate::date::{compare_dates, format_display, parse_coupon_date};

mod classify;
mod window;

pub use classify::{CouponStatus, classify};
pub use window::select_coupon_window;

/// Shown in place of a missing rate, amount or unreadable date.
pub const MISSING_VALUE: &str = "-";

/// A coupon payment as received from the data source.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCouponRecord {
    /// The payment date as sent by the exchange, e.g. "2024-12-01".
    pub date: String,
    /// The coupon rate as a percentage, if announced.
    pub rate: Option<f64>,
    /// The cash amount per bond in roubles, if announced.
    pub amount: Option<f64>,
}

impl RawCouponRecord {
    /// Create a record from the exchange's fields.
    pub fn new(date: impl Into<String>, rate: Option<f64>, amount: Option<f64>) -> Self {
        Self {
            date: date.into(),
            rate,
            amount,
        }
    }
}

/// A coupon date that may not have been readable.
///
/// Unreadable dates keep their original text so that two records can still
/// be matched against each other exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponDate {
    /// A readable calendar date.
    Valid(Date),
    /// The original text of a date that could not be parsed.
    Invalid(String),
}

impl CouponDate {
    /// Parse `text`, keeping it as [CouponDate::Invalid] if it is not a date.
    pub fn parse(text: &str) -> Self {
        match parse_coupon_date(text) {
            Ok(date) => Self::Valid(date),
            Err(error) => {
                tracing::warn!("{error}, it will be ordered after all valid dates");
                Self::Invalid(text.to_owned())
            }
        }
    }

    /// Chronological order where invalid dates come after every valid date
    /// and tie with each other.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Valid(a), Self::Valid(b)) => compare_dates(*a, *b),
            (Self::Valid(_), Self::Invalid(_)) => Ordering::Less,
            (Self::Invalid(_), Self::Valid(_)) => Ordering::Greater,
            (Self::Invalid(_), Self::Invalid(_)) => Ordering::Equal,
        }
    }

    /// Compare against a calendar day. Invalid dates are always after `day`.
    pub fn cmp_day(&self, day: Date) -> Ordering {
        match self {
            Self::Valid(date) => compare_dates(*date, day),
            Self::Invalid(_) => Ordering::Greater,
        }
    }

    /// The `DD.MM.YYYY` form of the date, or [MISSING_VALUE].
    pub fn display(&self) -> String {
        match self {
            Self::Valid(date) => format_display(*date),
            Self::Invalid(_) => MISSING_VALUE.to_owned(),
        }
    }
}

/// A display-ready row of the coupon widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayCouponEntry {
    /// The payment date as `DD.MM.YYYY`.
    pub payment_date: String,
    /// The rate such as "8.5%".
    pub rate: String,
    /// The amount such as "42.38₽".
    pub amount: String,
    /// Set on the first coupon paid on or after today.
    pub is_current: bool,
    /// Set on coupons paid before today.
    pub is_disabled: bool,
}

impl DisplayCouponEntry {
    pub(crate) fn new(record: &RawCouponRecord, date: &CouponDate, status: CouponStatus) -> Self {
        Self {
            payment_date: date.display(),
            rate: format_optional(record.rate, "%"),
            amount: format_optional(record.amount, "₽"),
            is_current: status == CouponStatus::Current,
            is_disabled: status == CouponStatus::Disabled,
        }
    }
}

fn format_optional(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(value) => format!("{value}{unit}"),
        None => MISSING_VALUE.to_owned(),
    }
}
