use std::collections::HashMap;

use async_trait::async_trait;

use crate::{Error, coupon::RawCouponRecord, source::CouponSource};

/// Answers fetches from a fixed table, unknown targets fail with a network error.
#[derive(Default)]
pub(crate) struct FakeCouponSource {
    responses: HashMap<String, Result<Vec<RawCouponRecord>, Error>>,
}

impl FakeCouponSource {
    pub(crate) fn with_coupons(mut self, target: &str, coupons: Vec<RawCouponRecord>) -> Self {
        self.responses.insert(target.to_owned(), Ok(coupons));
        self
    }

    pub(crate) fn with_error(mut self, target: &str, error: Error) -> Self {
        self.responses.insert(target.to_owned(), Err(error));
        self
    }
}

#[async_trait]
impl CouponSource for FakeCouponSource {
    async fn fetch_coupons(&self, target: &str) -> Result<Vec<RawCouponRecord>, Error> {
        self.responses
            .get(target)
            .cloned()
            .unwrap_or_else(|| Err(Error::Network(format!("no coupons for {target}"))))
    }
}
