//! The widget's container and the markup for each of its states.

use maud::{Markup, html};

use crate::coupon::DisplayCouponEntry;

/// Shown while coupons are being fetched.
pub const LOADING_MESSAGE: &str = "Loading coupons…";

/// Shown when there are no coupons to display.
pub const EMPTY_MESSAGE: &str = "No coupon payments found";

/// Owns a widget container and replaces its contents on every render.
#[derive(Debug, Clone)]
pub struct WidgetView {
    container_id: String,
    contents: Markup,
}

impl WidgetView {
    /// Create an empty view for the container with the element id `container_id`.
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            contents: html!(),
        }
    }

    /// The element id of the container.
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Replace the contents with a message saying there is nothing to show.
    pub fn render_empty(&mut self, message: &str) {
        self.contents = message_view(message, "empty");
    }

    /// Replace the contents with a message saying coupons are on their way.
    pub fn render_loading(&mut self, message: &str) {
        self.contents = message_view(message, "loading");
    }

    /// Replace the contents with an error message.
    pub fn render_error(&mut self, message: &str) {
        self.contents = message_view(message, "error");
    }

    /// Replace the contents with a table of `entries`.
    pub fn render_entries(&mut self, entries: &[DisplayCouponEntry]) {
        self.contents = entries_view(entries);
    }

    /// Remove everything from the container.
    pub fn clear(&mut self) {
        self.contents = html!();
    }

    /// The container element with its current contents.
    pub fn markup(&self) -> Markup {
        html!(
            div id=(self.container_id) class="coupon-widget" data-coupon-widget
            {
                (self.contents)
            }
        )
    }

    /// The container element with its current contents as an HTML string.
    pub fn html(&self) -> String {
        self.markup().into_string()
    }
}

fn message_view(message: &str, kind: &str) -> Markup {
    html!(
        p class={ "coupon-widget__message coupon-widget__message--" (kind) }
        {
            (message)
        }
    )
}

fn entries_view(entries: &[DisplayCouponEntry]) -> Markup {
    let row_class = |entry: &DisplayCouponEntry| {
        if entry.is_current {
            "coupon-widget__row coupon-widget__row--current"
        } else if entry.is_disabled {
            "coupon-widget__row coupon-widget__row--disabled"
        } else {
            "coupon-widget__row"
        }
    };

    html!(
        table class="coupon-widget__table"
        {
            thead
            {
                tr
                {
                    th scope="col" { "Payment date" }
                    th scope="col" { "Rate" }
                    th scope="col" { "Amount" }
                }
            }

            tbody
            {
                @for entry in entries {
                    tr
                        class=(row_class(entry))
                        data-current[entry.is_current]
                        data-disabled[entry.is_disabled]
                    {
                        td { (entry.payment_date) }
                        td { (entry.rate) }
                        td { (entry.amount) }
                    }
                }
            }
        }
    )
}
