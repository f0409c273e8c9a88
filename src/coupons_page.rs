//! Full HTML pages: the landing page and a page per security.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    Error,
    discovery::{SECURITY_ID_ATTRIBUTE, WIDGET_MARKER_ATTRIBUTE},
    endpoints::{self, format_endpoint},
    html::base,
    widget_api::CouponWidgetState,
};

const EXAMPLE_SECURITY_ID: &str = "SU26238RMFS4";

/// The landing page explaining how to embed the widget.
pub async fn get_index_page() -> Response {
    index_view().into_response()
}

/// A page with the coupon widget for `security_id`.
pub async fn get_coupons_page(
    State(state): State<CouponWidgetState>,
    Path(security_id): Path<String>,
) -> Result<Response, Error> {
    let widget = state.render_widget(&security_id).await?;

    Ok(coupons_view(&security_id, &widget).into_response())
}

fn coupons_view(security_id: &str, widget_html: &str) -> Markup {
    let content = html!(
        h1 { "Coupons of " (security_id) }

        (PreEscaped(widget_html))

        p
        {
            "Embed this widget with "
            code { (format_endpoint(endpoints::WIDGET_FRAGMENT, security_id)) }
            " or get the data as JSON from "
            code { (format_endpoint(endpoints::COUPONS_API, security_id)) }
            "."
        }
    );

    base(security_id, &content)
}

fn index_view() -> Markup {
    let example_page = format_endpoint(endpoints::COUPONS_VIEW, EXAMPLE_SECURITY_ID);
    let placeholder = format!(
        r#"<div id="my-bond" {WIDGET_MARKER_ATTRIBUTE} {SECURITY_ID_ATTRIBUTE}="{EXAMPLE_SECURITY_ID}"></div>"#
    );

    let content = html!(
        h1 { "Coupon Widget" }

        p
        {
            "Shows the last two coupon payments of a bond, the next one and the few after it. "
            "Past payments are greyed out and the next payment is highlighted."
        }

        h2 { "Try it" }
        p
        {
            a href=(example_page) { (example_page) }
        }

        h2 { "Embed it" }
        ul
        {
            li
            {
                "Fetch the HTML fragment from "
                code { (endpoints::WIDGET_FRAGMENT) }
            }
            li
            {
                "Fetch the coupon window as JSON from "
                code { (endpoints::COUPONS_API) }
            }
            li
            {
                "POST a page containing placeholders such as "
                code { (placeholder) }
                " to "
                code { (endpoints::RENDER_WIDGETS) }
                " to get the HTML for every widget, keyed by element id."
            }
        }
    );

    base("Home", &content)
}
