//! Implements a struct that holds the state of the widget server.

use std::sync::Arc;

use crate::{Error, source::CouponSource, timezone::get_local_offset};

/// The state of the widget server.
#[derive(Clone)]
pub struct AppState {
    /// Where coupon records are fetched from.
    pub coupon_source: Arc<dyn CouponSource>,

    /// The local timezone as a canonical timezone name, e.g. "Europe/Moscow".
    ///
    /// Decides which day counts as today when coupons are marked as past or current.
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState].
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if `local_timezone` is not a valid,
    /// canonical timezone name.
    pub fn new(coupon_source: Arc<dyn CouponSource>, local_timezone: &str) -> Result<Self, Error> {
        get_local_offset(local_timezone)?;

        Ok(Self {
            coupon_source,
            local_timezone: local_timezone.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{AppState, Error, test_utils::FakeCouponSource};

    #[test]
    fn accepts_canonical_timezone() {
        let state = AppState::new(Arc::new(FakeCouponSource::default()), "Europe/Moscow").unwrap();

        assert_eq!(state.local_timezone, "Europe/Moscow");
    }

    #[test]
    fn rejects_invalid_timezone() {
        let result = AppState::new(Arc::new(FakeCouponSource::default()), "Moscow");

        assert!(matches!(result, Err(Error::InvalidTimezone(_))));
    }
}
