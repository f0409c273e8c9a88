//! Coupon widget renders a small table of a bond's coupon payments: the
//! last couple of payments, the next one and a few after it.
//!
//! Coupon data is fetched from the Moscow Exchange ISS API and rendered to
//! HTML on the server, either as full pages, as fragments for embedding or
//! for every widget placeholder found in a host page.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod controller;
mod coupon;
mod coupons_page;
mod date;
mod discovery;
mod endpoints;
mod html;
mod logging;
mod not_found;
mod routing;
mod source;
mod timezone;
mod view;
mod widget_api;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use controller::{LoadOutcome, Today, WidgetController};
pub use coupon::{
    CouponDate, CouponStatus, DisplayCouponEntry, RawCouponRecord, classify, select_coupon_window,
};
pub use date::{compare_dates, format_display, parse_coupon_date, truncate_to_midnight};
pub use discovery::{MAX_WIDGETS_PER_PAGE, WidgetRegistry, WidgetSlot, discover_widgets};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use source::{CouponSource, DEFAULT_ISS_BASE_URL, IssCouponSource, validate_security_id};
pub use timezone::{DEFAULT_TIMEZONE, get_local_offset};
pub use view::WidgetView;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request to the data source failed or it responded with a
    /// non-success status.
    #[error("network error: {0}")]
    Network(String),

    /// The data source responded with a body that is not the expected shape.
    #[error("unexpected response from the data source: {0}")]
    Parse(String),

    /// A coupon date could not be parsed.
    ///
    /// This error never leaves the coupon window selection, invalid dates are
    /// kept and ordered after all valid dates instead.
    #[error("invalid coupon date \"{0}\"")]
    InvalidDate(String),

    /// The security identifier is empty or contains characters that are not
    /// allowed in an ISIN or ticker.
    #[error("invalid security identifier \"{0}\"")]
    InvalidSecurityId(String),

    /// A posted host page has more widget placeholders than one request may load.
    #[error("the page has {found} coupon widgets, at most {max} are allowed")]
    TooManyWidgets {
        /// The number of placeholders found.
        found: usize,
        /// The most placeholders a page may have.
        max: usize,
    },

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Network(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Parse(value.to_string())
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Network(_) | Error::Parse(_) => StatusCode::BAD_GATEWAY,
            Error::InvalidSecurityId(_) | Error::TooManyWidgets { .. } => StatusCode::BAD_REQUEST,
            Error::InvalidDate(_) | Error::InvalidTimezone(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        (status_code, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
