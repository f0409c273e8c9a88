//! Drives a single widget: fetch, select the coupon window, render.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use time::{Date, UtcOffset};

use crate::{
    Error,
    coupon::{DisplayCouponEntry, RawCouponRecord, select_coupon_window},
    date,
    source::{CouponSource, validate_security_id},
    view::{EMPTY_MESSAGE, LOADING_MESSAGE, WidgetView},
};

/// Decides which day counts as today when coupons are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Today {
    /// The current date at the given UTC offset.
    Local(UtcOffset),
    /// Always the given date.
    Fixed(Date),
}

impl Today {
    /// The date of today, truncated to midnight.
    pub fn date(&self) -> Date {
        match self {
            Today::Local(offset) => date::today(*offset),
            Today::Fixed(date) => *date,
        }
    }
}

/// What happened to a render requested by [WidgetController].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The view now shows the result.
    Rendered,
    /// A later load or update replaced this one before it finished, the view
    /// was left alone.
    Superseded,
    /// The controller was destroyed, nothing was rendered.
    Destroyed,
}

struct WidgetState {
    view: Option<WidgetView>,
    /// Bumped by every load, update and destroy. Only the holder of the
    /// latest generation may render a fetched result.
    generation: u64,
}

/// Loads coupons into a [WidgetView].
///
/// Loads may overlap: each one takes a new generation number and a fetch
/// that completes after a newer load or update has started is dropped.
pub struct WidgetController {
    source: Arc<dyn CouponSource>,
    today: Today,
    state: Mutex<WidgetState>,
}

impl WidgetController {
    /// Create a controller that renders into `view` using coupons from `source`.
    pub fn new(view: WidgetView, source: Arc<dyn CouponSource>, today: Today) -> Self {
        Self {
            source,
            today,
            state: Mutex::new(WidgetState {
                view: Some(view),
                generation: 0,
            }),
        }
    }

    /// Fetch the coupons for `target` (a security identifier or a URL) and
    /// render them.
    ///
    /// The loading state is shown while the fetch is pending. Fetch errors are
    /// rendered as the error state rather than returned.
    pub async fn load(&self, target: &str) -> LoadOutcome {
        let Some(generation) = self.next_generation(|view| view.render_loading(LOADING_MESSAGE))
        else {
            return LoadOutcome::Destroyed;
        };

        tracing::debug!("load {generation} started for \"{target}\"");
        let result = self
            .source
            .fetch_coupons(target)
            .await
            .map(|records| select_coupon_window(&records, self.today.date()));

        let mut state = self.lock_state();
        if state.generation != generation {
            tracing::debug!(
                "dropping load {generation} for \"{target}\", load {} is newer",
                state.generation
            );
            return LoadOutcome::Superseded;
        }

        let Some(view) = state.view.as_mut() else {
            return LoadOutcome::Destroyed;
        };

        match result {
            Ok(entries) => render_entries(view, &entries),
            Err(error) => view.render_error(&error_message(&error)),
        }

        LoadOutcome::Rendered
    }

    /// Fetch and render the coupons of a security, refusing anything that is
    /// not a plain security identifier.
    ///
    /// Use this instead of [WidgetController::load] for identifiers that come
    /// from untrusted input such as a posted page. A rejected identifier is
    /// rendered as the error state without fetching anything.
    pub async fn load_security(&self, security_id: &str) -> LoadOutcome {
        match validate_security_id(security_id) {
            Ok(security_id) => self.load(security_id).await,
            Err(error) => {
                tracing::warn!("refusing to load coupons: {error}");
                self.render_failure(&error)
            }
        }
    }

    /// Render `records` directly without fetching anything.
    ///
    /// Any load still in flight is superseded.
    pub fn update_data(&self, records: &[RawCouponRecord]) -> LoadOutcome {
        let entries = select_coupon_window(records, self.today.date());

        match self.next_generation(|view| render_entries(view, &entries)) {
            Some(_) => LoadOutcome::Rendered,
            None => LoadOutcome::Destroyed,
        }
    }

    /// Clear the view and let it go. Loads still in flight are dropped and
    /// later calls do nothing.
    pub fn destroy(&self) {
        let mut state = self.lock_state();
        state.generation += 1;

        if let Some(mut view) = state.view.take() {
            view.clear();
            tracing::debug!("destroyed widget \"{}\"", view.container_id());
        }
    }

    /// The element id of the widget's container, or `None` once destroyed.
    pub fn container_id(&self) -> Option<String> {
        self.lock_state()
            .view
            .as_ref()
            .map(|view| view.container_id().to_owned())
    }

    /// The widget's current HTML, or `None` once destroyed.
    pub fn html(&self) -> Option<String> {
        self.lock_state().view.as_ref().map(WidgetView::html)
    }

    fn render_failure(&self, error: &Error) -> LoadOutcome {
        match self.next_generation(|view| view.render_error(&error_message(error))) {
            Some(_) => LoadOutcome::Rendered,
            None => LoadOutcome::Destroyed,
        }
    }

    /// Start a new generation and render the first state for it.
    fn next_generation(&self, render: impl FnOnce(&mut WidgetView)) -> Option<u64> {
        let mut state = self.lock_state();
        state.generation += 1;
        let generation = state.generation;

        state.view.as_mut().map(|view| {
            render(view);
            generation
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, WidgetState> {
        // The state only holds rendered markup, a panic mid-render leaves
        // nothing that needs repairing.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn render_entries(view: &mut WidgetView, entries: &[DisplayCouponEntry]) {
    if entries.is_empty() {
        view.render_empty(EMPTY_MESSAGE);
    } else {
        view.render_entries(entries);
    }
}

fn error_message(error: &Error) -> String {
    format!("Could not load coupons: {error}")
}
