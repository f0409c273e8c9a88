//! Finds widget placeholders in a host page and sets up a controller for each.

use std::{
    collections::{BTreeMap, HashSet},
    sync::{Arc, LazyLock},
};

use scraper::{Html, Selector};

use crate::{
    Error,
    controller::{LoadOutcome, Today, WidgetController},
    source::CouponSource,
    view::WidgetView,
};

/// Elements with this attribute are turned into widgets.
pub const WIDGET_MARKER_ATTRIBUTE: &str = "data-coupon-widget";

/// The attribute holding the security identifier to load into a widget.
pub const SECURITY_ID_ATTRIBUTE: &str = "data-isin";

/// The most widget placeholders one host page may have.
pub const MAX_WIDGETS_PER_PAGE: usize = 20;

const GENERATED_ID_PREFIX: &str = "coupon-widget-";

static WIDGET_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&format!("[{WIDGET_MARKER_ATTRIBUTE}]")).expect("invalid widget selector")
});

static ID_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[id]").expect("invalid id selector"));

/// A widget placeholder found in a host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSlot {
    /// The placeholder's element id, generated if it has none.
    pub id: String,
    /// The security to load into the widget, if the page names one.
    pub security_id: Option<String>,
}

/// Find every element marked with [WIDGET_MARKER_ATTRIBUTE] in `root_html`,
/// in document order.
///
/// Elements without an id, or whose id is already used by an earlier
/// widget, get a `coupon-widget-<n>` id that is not used anywhere in the
/// page.
pub fn discover_widgets(root_html: &str) -> Vec<WidgetSlot> {
    let document = Html::parse_document(root_html);

    let mut taken_ids: HashSet<String> = document
        .select(&ID_SELECTOR)
        .filter_map(|element| element.attr("id"))
        .map(str::to_owned)
        .collect();
    let mut assigned_ids = HashSet::new();
    let mut next_generated = 1;

    document
        .select(&WIDGET_SELECTOR)
        .map(|element| {
            let id = match element.attr("id").map(str::trim) {
                Some(id) if !id.is_empty() && !assigned_ids.contains(id) => id.to_owned(),
                _ => loop {
                    let candidate = format!("{GENERATED_ID_PREFIX}{next_generated}");
                    next_generated += 1;
                    if !taken_ids.contains(&candidate) {
                        break candidate;
                    }
                },
            };
            taken_ids.insert(id.clone());
            assigned_ids.insert(id.clone());

            let security_id = element
                .attr(SECURITY_ID_ATTRIBUTE)
                .map(str::trim)
                .filter(|security_id| !security_id.is_empty())
                .map(str::to_owned);

            WidgetSlot { id, security_id }
        })
        .collect()
}

/// The widgets of one host page, keyed by element id.
pub struct WidgetRegistry {
    widgets: Vec<(WidgetSlot, WidgetController)>,
}

impl WidgetRegistry {
    /// Scan `root_html` for placeholders and create a controller for each one.
    ///
    /// Nothing is fetched until [WidgetRegistry::load_all] is called.
    ///
    /// # Errors
    /// Returns [Error::TooManyWidgets] if the page has more than
    /// [MAX_WIDGETS_PER_PAGE] placeholders.
    pub fn initialize(
        root_html: &str,
        source: Arc<dyn CouponSource>,
        today: Today,
    ) -> Result<Self, Error> {
        let slots = discover_widgets(root_html);
        if slots.len() > MAX_WIDGETS_PER_PAGE {
            return Err(Error::TooManyWidgets {
                found: slots.len(),
                max: MAX_WIDGETS_PER_PAGE,
            });
        }

        let widgets = slots
            .into_iter()
            .map(|slot| {
                let controller =
                    WidgetController::new(WidgetView::new(slot.id.clone()), source.clone(), today);
                (slot, controller)
            })
            .collect::<Vec<_>>();

        tracing::debug!("discovered {} coupon widgets", widgets.len());

        Ok(Self { widgets })
    }

    /// The number of widgets found.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Whether the page had no widgets.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// The controller for the widget with the element id `id`.
    pub fn get(&self, id: &str) -> Option<&WidgetController> {
        self.widgets
            .iter()
            .find(|(slot, _)| slot.id == id)
            .map(|(_, controller)| controller)
    }

    /// Load every widget that names a security. Widgets without one show
    /// the empty state.
    ///
    /// Security ids come from the page, so anything that is not a plain
    /// identifier, such as a URL, is shown as an error and never fetched.
    pub async fn load_all(&self) -> Vec<LoadOutcome> {
        let mut outcomes = Vec::with_capacity(self.widgets.len());

        for (slot, controller) in &self.widgets {
            let outcome = match &slot.security_id {
                Some(security_id) => controller.load_security(security_id).await,
                None => controller.update_data(&[]),
            };
            outcomes.push(outcome);
        }

        outcomes
    }

    /// The current HTML of every widget that has not been destroyed, keyed by id.
    pub fn rendered(&self) -> BTreeMap<String, String> {
        self.widgets
            .iter()
            .filter_map(|(slot, controller)| {
                controller.html().map(|html| (slot.id.clone(), html))
            })
            .collect()
    }

    /// Destroy every widget.
    pub fn destroy_all(&self) {
        for (_, controller) in &self.widgets {
            controller.destroy();
        }
    }
}
