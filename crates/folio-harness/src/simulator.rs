#![forbid(unsafe_code)]

//! Deterministic page simulator for testing.
//!
//! `PageSimulator` drives a [`PageController`] against a [`PageModel`]
//! without a browser. Events are injected, the virtual clock is advanced
//! explicitly, and every emitted patch is applied to the model and kept in
//! a log for inspection.
//!
//! # Example
//!
//! ```
//! use folio_harness::simulator::PageSimulator;
//!
//! let mut sim = PageSimulator::standard();
//! sim.scroll_to(1000.0);
//! assert_eq!(sim.page().active_nav_links(), vec![1]);
//!
//! sim.submit();
//! assert_eq!(sim.page().toast_count(), 1);
//! sim.advance_ms(4300);
//! assert_eq!(sim.page().toast_count(), 0);
//! ```

use std::time::Duration;

use folio_core::{
    DomPatch, FieldId, HandlerId, ObservedEntry, PageConfig, PageController, PageEvent,
    PageLayout, ScrollSnapshot, SectionMetrics, SubmitOutcome,
};
use tracing::debug;

use crate::page_model::PageModel;

/// Section ids and document offsets of the stock page.
pub const STANDARD_SECTIONS: &[(&str, f64)] = &[
    ("home", 0.0),
    ("about", 900.0),
    ("skills", 1700.0),
    ("projects", 2600.0),
    ("experience", 3400.0),
    ("contact", 4300.0),
];

/// Viewport height used by [`PageSimulator::standard`].
pub const STANDARD_VIEWPORT: f64 = 900.0;

/// Upper bound on timers fired by one [`PageSimulator::run_until_idle`].
const IDLE_TIMER_LIMIT: usize = 100_000;

/// Deterministic simulator for [`PageController`] testing.
pub struct PageSimulator {
    controller: PageController,
    page: PageModel,
    sections: Vec<(String, f64)>,
    viewport_height: f64,
    patch_log: Vec<DomPatch>,
}

impl PageSimulator {
    /// Create a simulator over an existing controller and page.
    pub fn new(
        controller: PageController,
        page: PageModel,
        sections: &[(&str, f64)],
        viewport_height: f64,
    ) -> Self {
        Self {
            controller,
            page,
            sections: sections
                .iter()
                .map(|(id, top)| ((*id).to_owned(), *top))
                .collect(),
            viewport_height,
            patch_log: Vec::new(),
        }
    }

    /// Stock page with default config.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_config(PageConfig::default())
    }

    /// Stock page with a custom config.
    #[must_use]
    pub fn with_config(config: PageConfig) -> Self {
        Self::with_layout(config, PageLayout::standard())
    }

    /// Stock page and sections, custom wiring.
    #[must_use]
    pub fn with_layout(config: PageConfig, layout: PageLayout) -> Self {
        Self::new(
            PageController::new(config, layout),
            PageModel::standard(),
            STANDARD_SECTIONS,
            STANDARD_VIEWPORT,
        )
    }

    // -- Accessors ------------------------------------------------------

    pub fn controller(&self) -> &PageController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PageController {
        &mut self.controller
    }

    pub fn page(&self) -> &PageModel {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut PageModel {
        &mut self.page
    }

    /// Every patch applied so far, in order.
    pub fn patch_log(&self) -> &[DomPatch] {
        &self.patch_log
    }

    pub fn clear_patch_log(&mut self) {
        self.patch_log.clear();
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        u64::try_from(self.controller.now().as_millis()).unwrap_or(u64::MAX)
    }

    // -- Events ---------------------------------------------------------

    /// Deliver an event through the binding table and apply the result.
    pub fn send(&mut self, event: PageEvent) {
        self.controller.handle(event);
        self.flush();
    }

    /// Measure the page at its current scroll position.
    pub fn scroll_snapshot(&self) -> ScrollSnapshot {
        let scroll_y = self.page.scroll_y();
        ScrollSnapshot {
            scroll_y,
            viewport_height: self.viewport_height,
            sections: self
                .sections
                .iter()
                .map(|(id, top)| SectionMetrics::new(id.as_str(), *top, top - scroll_y))
                .collect(),
        }
    }

    /// Scroll the window and fire `scroll`.
    pub fn scroll_to(&mut self, y: f64) {
        self.page.set_scroll_y(y);
        let snapshot = self.scroll_snapshot();
        self.send(PageEvent::Scroll(snapshot));
    }

    /// Fire `scroll` again without moving, as a resize or layout shift would.
    pub fn rescroll(&mut self) {
        let snapshot = self.scroll_snapshot();
        self.send(PageEvent::Scroll(snapshot));
    }

    pub fn dom_ready(&mut self) {
        let event = PageEvent::DomReady {
            nav_menu_items: self.page.nav_menu_items(),
            scroll: self.scroll_snapshot(),
        };
        self.send(event);
    }

    pub fn load(&mut self) {
        self.send(PageEvent::Load);
    }

    pub fn mouse_move(&mut self, x: f64, y: f64) {
        self.send(PageEvent::MouseMove { x, y });
    }

    pub fn click_hamburger(&mut self) {
        self.send(PageEvent::HamburgerClick);
    }

    pub fn click_nav_link(&mut self) {
        self.send(PageEvent::NavLinkClick);
    }

    /// Click an in-page anchor. The target is looked up among the sections
    /// by id.
    pub fn click_anchor(&mut self, href: &str) {
        let id = href.trim_start_matches('#');
        let target_top = self
            .sections
            .iter()
            .find(|(section, _)| section == id)
            .map(|(_, top)| *top);
        let event = PageEvent::AnchorClick {
            href: href.to_owned(),
            target_top,
            scroll_y: self.page.scroll_y(),
        };
        self.send(event);
    }

    pub fn intersect(&mut self, entries: Vec<ObservedEntry>) {
        self.send(PageEvent::Intersect(entries));
    }

    /// Fill every form input.
    pub fn fill_form(&mut self, name: &str, email: &str, subject: &str, message: &str) {
        self.page.set_field(FieldId::Name, name);
        self.page.set_field(FieldId::Email, email);
        self.page.set_field(FieldId::Subject, subject);
        self.page.set_field(FieldId::Message, message);
    }

    /// Submit the form as it currently reads. Returns `None` when the submit
    /// handler is not bound.
    pub fn submit(&mut self) -> Option<SubmitOutcome> {
        let event = PageEvent::Submit(self.page.form_snapshot());
        let outcome = if self.controller.bindings().is_bound(HandlerId::SubmitContact) {
            self.controller.dispatch(HandlerId::SubmitContact, &event)
        } else {
            debug!("submit with no bound handler");
            None
        };
        self.flush();
        outcome
    }

    // -- Time -----------------------------------------------------------

    pub fn advance(&mut self, dt: Duration) {
        self.controller.advance(dt);
        self.flush();
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Move the clock to an absolute time in milliseconds.
    pub fn advance_to_ms(&mut self, ms: u64) {
        self.controller.advance_to(Duration::from_millis(ms));
        self.flush();
    }

    /// Fire timers until none remain. Returns the number of steps taken.
    pub fn run_until_idle(&mut self) -> usize {
        let mut steps = 0;
        while let Some(deadline) = self.controller.next_deadline() {
            if steps >= IDLE_TIMER_LIMIT {
                debug!(steps, "run_until_idle gave up");
                break;
            }
            self.controller.advance_to(deadline);
            self.flush();
            steps += 1;
        }
        steps
    }

    fn flush(&mut self) {
        let patches = self.controller.take_patches();
        self.page.apply_all(&patches);
        self.patch_log.extend(patches);
    }
}

impl Default for PageSimulator {
    fn default() -> Self {
        Self::standard()
    }
}
