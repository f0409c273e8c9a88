//! The server's endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/coupons/{security_id}', use [format_endpoint].

/// The landing page with instructions for embedding widgets.
pub const ROOT: &str = "/";
/// A full page showing the coupon widget for a security.
pub const COUPONS_VIEW: &str = "/coupons/{security_id}";
/// The coupon widget for a security as an HTML fragment.
pub const WIDGET_FRAGMENT: &str = "/api/widgets/{security_id}";
/// The coupon window for a security as JSON.
pub const COUPONS_API: &str = "/api/coupons/{security_id}";
/// Renders every widget placeholder in a posted host page.
pub const RENDER_WIDGETS: &str = "/api/widgets/render";

/// Replace the parameter in `endpoint_path` with `value`.
///
/// A parameter is a string that starts with a left brace and ends with a
/// right brace. For example, in the endpoint path '/coupons/{security_id}',
/// '{security_id}' is the parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, value: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}
