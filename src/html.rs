use maud::{DOCTYPE, Markup, html};

use crate::endpoints;

pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Coupon Widget" }
            }

            body
            {
                main
                {
                    (content)
                }
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        section class="error-page"
        {
            h1 { (header) }
            p { (description) }
            p { (fix) }
            a href=(endpoints::ROOT) { "Back to Homepage" }
        }
    );

    base(title, &content)
}
