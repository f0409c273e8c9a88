//! Fetches coupon schedules from the Moscow Exchange ISS API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, coupon::RawCouponRecord};

/// The public Moscow Exchange ISS host.
pub const DEFAULT_ISS_BASE_URL: &str = "https://iss.moex.com";

const BONDIZATION_PATH: &str = "/iss/statistics/engines/stock/markets/bonds/bondization";

const BONDIZATION_QUERY: &str = "iss.meta=off&iss.only=coupons&iss.json=extended&limit=unlimited";

/// Somewhere coupon records can be fetched from.
#[async_trait]
pub trait CouponSource: Send + Sync {
    /// Fetch the coupons for `target`, which is either a security identifier
    /// such as an ISIN or a full `http(s)://` URL to fetch as-is.
    ///
    /// # Errors
    /// - [Error::InvalidSecurityId] if `target` is not a usable identifier,
    /// - [Error::Network] if the request fails or the response status is not a success,
    /// - [Error::Parse] if the response body is not in the expected shape.
    async fn fetch_coupons(&self, target: &str) -> Result<Vec<RawCouponRecord>, Error>;
}

/// Fetches coupons from the ISS bondization endpoint with a single request.
#[derive(Debug, Clone)]
pub struct IssCouponSource {
    client: Client,
    base_url: String,
}

impl IssCouponSource {
    /// Create a source for the ISS API hosted at `base_url`.
    ///
    /// Requests that take longer than `timeout` fail with [Error::Network].
    ///
    /// # Errors
    /// Returns [Error::Network] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// The URL to request for `target`.
    fn coupons_url(&self, target: &str) -> Result<String, Error> {
        let target = target.trim();

        if is_url(target) {
            return Ok(target.to_owned());
        }

        let security_id = validate_security_id(target)?;

        Ok(format!(
            "{}{BONDIZATION_PATH}/{security_id}.json?{BONDIZATION_QUERY}",
            self.base_url
        ))
    }
}

#[async_trait]
impl CouponSource for IssCouponSource {
    async fn fetch_coupons(&self, target: &str) -> Result<Vec<RawCouponRecord>, Error> {
        let url = self.coupons_url(target)?;
        tracing::debug!("fetching coupons from {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .inspect_err(|error| tracing::error!("Could not fetch coupons from {url}: {error}"))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("{url} responded with status {status}");
            return Err(Error::Network(format!("the server responded with {status}")));
        }

        let body = response.text().await?;

        parse_coupons_response(&body)
            .inspect_err(|error| tracing::error!("Could not read coupons from {url}: {error}"))
    }
}

fn is_url(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

/// Check that `security_id` is an ISIN or ticker and return it trimmed.
///
/// Targets taken from requests must pass through this before reaching a
/// [CouponSource], which would otherwise fetch a URL target as-is.
///
/// # Errors
/// Returns [Error::InvalidSecurityId] if `security_id` is empty, is a URL or
/// contains anything other than ASCII alphanumerics, `-`, `_` and `.`.
pub fn validate_security_id(security_id: &str) -> Result<&str, Error> {
    let security_id = security_id.trim();
    let is_valid = !security_id.is_empty()
        && security_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if is_valid {
        Ok(security_id)
    } else {
        Err(Error::InvalidSecurityId(security_id.to_owned()))
    }
}

#[derive(Debug, Deserialize)]
struct IssCoupon {
    coupondate: Option<String>,
    valueprc: Option<f64>,
    value_rub: Option<f64>,
}

impl From<IssCoupon> for RawCouponRecord {
    fn from(coupon: IssCoupon) -> Self {
        RawCouponRecord::new(
            coupon.coupondate.unwrap_or_default(),
            coupon.valueprc,
            coupon.value_rub,
        )
    }
}

/// Extract the coupon records from an ISS response body.
///
/// The extended ISS format is an array of blocks, one of which holds the
/// `coupons` list. A single block object is accepted too. A response without
/// a `coupons` list has no coupons.
fn parse_coupons_response(body: &str) -> Result<Vec<RawCouponRecord>, Error> {
    let document: Value = serde_json::from_str(body)?;

    let blocks = match &document {
        Value::Array(blocks) => blocks.as_slice(),
        Value::Object(_) => std::slice::from_ref(&document),
        _ => {
            return Err(Error::Parse(
                "expected a JSON array or object at the top level".to_owned(),
            ));
        }
    };

    let coupons = match blocks.iter().find_map(|block| block.get("coupons")) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(coupons) => Vec::<IssCoupon>::deserialize(coupons)?,
    };

    Ok(coupons.into_iter().map(RawCouponRecord::from).collect())
}
