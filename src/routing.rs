//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    AppState,
    coupons_page::{get_coupons_page, get_index_page},
    endpoints,
    logging::logging_middleware,
    not_found::get_404_not_found,
    widget_api::{get_coupon_entries, get_widget_fragment, render_widgets},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::COUPONS_VIEW, get(get_coupons_page))
        .route(endpoints::WIDGET_FRAGMENT, get(get_widget_fragment))
        .route(endpoints::COUPONS_API, get(get_coupon_entries))
        .route(endpoints::RENDER_WIDGETS, post(render_widgets))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
