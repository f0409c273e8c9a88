//! Endpoints for embedding widgets in other pages: HTML fragments, the raw
//! coupon window as JSON and server-side rendering of a whole host page.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::Html,
};

use crate::{
    AppState, Error,
    controller::{Today, WidgetController},
    coupon::{DisplayCouponEntry, select_coupon_window},
    discovery::WidgetRegistry,
    source::{CouponSource, validate_security_id},
    timezone::get_local_offset,
    view::WidgetView,
};

/// The element id given to widgets rendered on their own.
pub const WIDGET_CONTAINER_ID: &str = "coupon-widget";

/// The state needed by the widget route handlers.
#[derive(Clone)]
pub struct CouponWidgetState {
    /// Where coupon records are fetched from.
    pub coupon_source: Arc<dyn CouponSource>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Moscow".
    pub local_timezone: String,
}

impl FromRef<AppState> for CouponWidgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            coupon_source: state.coupon_source.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl CouponWidgetState {
    fn today(&self) -> Result<Today, Error> {
        get_local_offset(&self.local_timezone)
            .map(Today::Local)
            .inspect_err(|error| tracing::error!("Could not resolve today: {error}"))
    }

    /// Load the widget for `security_id` and return its HTML.
    ///
    /// Fetch failures are rendered inside the widget.
    ///
    /// # Errors
    /// Returns [Error::InvalidSecurityId] without fetching anything if
    /// `security_id` is not a plain security identifier.
    pub(crate) async fn render_widget(&self, security_id: &str) -> Result<String, Error> {
        let security_id = validate_security_id(security_id)?;
        let controller = WidgetController::new(
            WidgetView::new(WIDGET_CONTAINER_ID),
            self.coupon_source.clone(),
            self.today()?,
        );
        controller.load(security_id).await;

        Ok(controller.html().unwrap_or_default())
    }
}

/// The coupon widget for a security as an HTML fragment.
///
/// Fetch failures are rendered inside the widget, the response is still a success.
pub async fn get_widget_fragment(
    State(state): State<CouponWidgetState>,
    Path(security_id): Path<String>,
) -> Result<Html<String>, Error> {
    state.render_widget(&security_id).await.map(Html)
}

/// The coupon window for a security as JSON.
pub async fn get_coupon_entries(
    State(state): State<CouponWidgetState>,
    Path(security_id): Path<String>,
) -> Result<Json<Vec<DisplayCouponEntry>>, Error> {
    let security_id = validate_security_id(&security_id)?;
    let today = state.today()?;
    let records = state.coupon_source.fetch_coupons(security_id).await?;

    Ok(Json(select_coupon_window(&records, today.date())))
}

/// Render every widget placeholder in the posted host page.
///
/// Responds with a JSON object mapping each widget's element id to its HTML.
/// Pages with more than [crate::MAX_WIDGETS_PER_PAGE] placeholders are
/// rejected before anything is fetched.
pub async fn render_widgets(
    State(state): State<CouponWidgetState>,
    host_page: String,
) -> Result<Json<BTreeMap<String, String>>, Error> {
    let registry =
        WidgetRegistry::initialize(&host_page, state.coupon_source.clone(), state.today()?)?;
    registry.load_all().await;

    Ok(Json(registry.rendered()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use scraper::Html;

    use crate::{
        Error,
        coupon::RawCouponRecord,
        test_utils::{
            FakeCouponSource, assert_content_type, assert_status_ok, assert_valid_html,
            must_get_element, parse_html_fragment,
        },
        widget_api::{
            CouponWidgetState, get_coupon_entries, get_widget_fragment, render_widgets,
        },
    };

    fn get_state() -> CouponWidgetState {
        let source = FakeCouponSource::default()
            .with_coupons(
                "RU000A0JX0J2",
                vec![
                    RawCouponRecord::new("2001-06-05", Some(8.0), Some(39.89)),
                    RawCouponRecord::new("2998-12-04", Some(8.0), Some(39.89)),
                    RawCouponRecord::new("2999-06-04", None, None),
                ],
            )
            .with_error(
                "SU26238RMFS4",
                Error::Parse("expected a JSON array or object at the top level".to_owned()),
            );

        CouponWidgetState {
            coupon_source: Arc::new(source),
            local_timezone: "Europe/Moscow".to_owned(),
        }
    }

    #[tokio::test]
    async fn fragment_contains_widget_table() {
        let response = get_widget_fragment(State(get_state()), Path("RU000A0JX0J2".to_owned()))
            .await
            .into_response();

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        must_get_element(&html, "div#coupon-widget tr[data-disabled]");
        let current = must_get_element(&html, "div#coupon-widget tr[data-current]");
        assert!(current.text().collect::<String>().contains("04.12.2998"));
    }

    #[tokio::test]
    async fn fragment_shows_fetch_errors_in_widget() {
        let response = get_widget_fragment(State(get_state()), Path("SU26238RMFS4".to_owned()))
            .await
            .into_response();

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        must_get_element(&html, "p.coupon-widget__message--error");
    }

    #[tokio::test]
    async fn entries_are_json() {
        let Json(entries) =
            get_coupon_entries(State(get_state()), Path("RU000A0JX0J2".to_owned()))
                .await
                .unwrap();

        assert_eq!(entries.len(), 3);
        assert!(entries[0].is_disabled);
        assert!(entries[1].is_current);
        assert_eq!(entries[2].rate, "-");
    }

    #[tokio::test]
    async fn entries_report_fetch_errors() {
        let response = get_coupon_entries(State(get_state()), Path("SU26238RMFS4".to_owned()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn renders_each_widget_in_host_page() {
        let host_page = r#"<html><body>
            <div id="corp" data-coupon-widget data-isin="RU000A0JX0J2"></div>
            <div data-coupon-widget></div>
        </body></html>"#;

        let Json(rendered) = render_widgets(State(get_state()), host_page.to_owned())
            .await
            .unwrap();

        assert_eq!(
            rendered.keys().collect::<Vec<_>>(),
            vec!["corp", "coupon-widget-1"]
        );
        let corp = Html::parse_fragment(&rendered["corp"]);
        must_get_element(&corp, "div#corp tr[data-current]");
        let generated = Html::parse_fragment(&rendered["coupon-widget-1"]);
        must_get_element(&generated, "p.coupon-widget__message--empty");
    }

    #[tokio::test]
    async fn url_targets_are_rejected_without_fetching() {
        let url = "http://127.0.0.1:9/internal/secret";
        let source = FakeCouponSource::default().with_coupons(
            url,
            vec![RawCouponRecord::new("2999-01-01", Some(42.0), Some(1337.0))],
        );
        let state = CouponWidgetState {
            coupon_source: Arc::new(source),
            ..get_state()
        };

        let fragment = get_widget_fragment(State(state.clone()), Path(url.to_owned())).await;
        let entries = get_coupon_entries(State(state), Path(url.to_owned())).await;

        assert!(matches!(fragment, Err(Error::InvalidSecurityId(id)) if id == url));
        assert!(matches!(entries, Err(Error::InvalidSecurityId(_))));
    }

    #[tokio::test]
    async fn invalid_timezone_is_an_error() {
        let state = CouponWidgetState {
            local_timezone: "Nowhere/Special".to_owned(),
            ..get_state()
        };

        let result = get_widget_fragment(State(state), Path("RU000A0JX0J2".to_owned())).await;

        assert!(matches!(result, Err(Error::InvalidTimezone(_))));
    }
}
