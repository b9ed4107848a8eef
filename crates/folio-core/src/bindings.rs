#![forbid(unsafe_code)]

//! Declarative event wiring.
//!
//! [`BINDINGS`] lists every `(target, event) → handler` pair the page uses.
//! A host resolves the table once against its document: bindings whose
//! required elements are missing are skipped, and the rest attach
//! independently, so one absent element never disables unrelated behavior.
//!
//! ```text
//! BINDINGS ──resolve(probe)──▶ BindingTable { bound, skipped }
//!                                   │
//!              host listener ──PageEvent──▶ PageController::handle
//! ```

use tracing::debug;

/// DOM event kinds the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
    Scroll,
    MouseMove,
    DomReady,
    Load,
    /// Intersection observer batch (not a DOM event name).
    Intersect,
}

impl EventKind {
    /// Name passed to `addEventListener`.
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Submit => "submit",
            EventKind::Scroll => "scroll",
            EventKind::MouseMove => "mousemove",
            EventKind::DomReady => "DOMContentLoaded",
            EventKind::Load => "load",
            EventKind::Intersect => "intersect",
        }
    }
}

/// Where a listener attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Window,
    Document,
    /// Every element matching a CSS selector.
    Selector(&'static str),
}

/// Identity of a page behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandlerId {
    SmoothScroll,
    ToggleMenu,
    CloseMenu,
    SubmitContact,
    NavbarScroll,
    ActiveLink,
    RevealSections,
    Parallax,
    ObserveReveal,
    StaggerNavMenu,
    CursorTrail,
    ShowLoadingOverlay,
    HideLoadingOverlay,
    TypeHeroTitle,
}

/// One row of the wiring table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub target: Target,
    pub event: EventKind,
    pub handler: HandlerId,
    /// Selectors that must each match at least one element.
    pub requires: &'static [&'static str],
}

const fn bind(
    target: Target,
    event: EventKind,
    handler: HandlerId,
    requires: &'static [&'static str],
) -> Binding {
    Binding {
        target,
        event,
        handler,
        requires,
    }
}

pub const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";
pub const NAV_LINK_SELECTOR: &str = ".nav-link";
pub const CONTACT_FORM_SELECTOR: &str = "#contactForm";

/// The page's complete wiring, in attach order.
pub const BINDINGS: &[Binding] = &[
    bind(
        Target::Selector(ANCHOR_SELECTOR),
        EventKind::Click,
        HandlerId::SmoothScroll,
        &[ANCHOR_SELECTOR],
    ),
    bind(
        Target::Selector(".hamburger"),
        EventKind::Click,
        HandlerId::ToggleMenu,
        &[".hamburger", ".nav-menu"],
    ),
    bind(
        Target::Selector(NAV_LINK_SELECTOR),
        EventKind::Click,
        HandlerId::CloseMenu,
        &[NAV_LINK_SELECTOR, ".hamburger", ".nav-menu"],
    ),
    bind(
        Target::Selector(CONTACT_FORM_SELECTOR),
        EventKind::Submit,
        HandlerId::SubmitContact,
        &[CONTACT_FORM_SELECTOR, "#name", "#email", "#subject", "#message"],
    ),
    bind(
        Target::Window,
        EventKind::Scroll,
        HandlerId::NavbarScroll,
        &[".navbar"],
    ),
    bind(
        Target::Window,
        EventKind::Scroll,
        HandlerId::ActiveLink,
        &["section", NAV_LINK_SELECTOR],
    ),
    bind(
        Target::Window,
        EventKind::Scroll,
        HandlerId::RevealSections,
        &["section"],
    ),
    bind(
        Target::Window,
        EventKind::Scroll,
        HandlerId::Parallax,
        &[".hero", ".hero-content"],
    ),
    bind(
        Target::Document,
        EventKind::MouseMove,
        HandlerId::CursorTrail,
        &[],
    ),
    bind(
        Target::Document,
        EventKind::DomReady,
        HandlerId::ShowLoadingOverlay,
        &[],
    ),
    bind(
        Target::Document,
        EventKind::DomReady,
        HandlerId::StaggerNavMenu,
        &[".nav-menu li"],
    ),
    bind(
        Target::Document,
        EventKind::DomReady,
        HandlerId::RevealSections,
        &["section"],
    ),
    bind(
        Target::Document,
        EventKind::Intersect,
        HandlerId::ObserveReveal,
        &[],
    ),
    bind(
        Target::Window,
        EventKind::Load,
        HandlerId::HideLoadingOverlay,
        &[],
    ),
    bind(
        Target::Window,
        EventKind::Load,
        HandlerId::TypeHeroTitle,
        &[".hero-title"],
    ),
];

/// Answers whether a selector matches anything in the document.
pub trait ElementProbe {
    fn exists(&self, selector: &str) -> bool;
}

impl<F> ElementProbe for F
where
    F: Fn(&str) -> bool,
{
    fn exists(&self, selector: &str) -> bool {
        self(selector)
    }
}

/// [`BINDINGS`] split by whether their elements exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    bound: Vec<Binding>,
    skipped: Vec<Binding>,
}

impl BindingTable {
    /// Keep the bindings whose required selectors all resolve.
    pub fn resolve(probe: &impl ElementProbe) -> Self {
        let mut table = Self::default();
        for binding in BINDINGS {
            match binding.requires.iter().find(|s| !probe.exists(s)) {
                None => table.bound.push(*binding),
                Some(missing) => {
                    debug!(
                        handler = ?binding.handler,
                        event = binding.event.dom_name(),
                        missing,
                        "binding skipped"
                    );
                    table.skipped.push(*binding);
                }
            }
        }
        table
    }

    /// Every binding attached, as on the complete page.
    #[must_use]
    pub fn all() -> Self {
        Self {
            bound: BINDINGS.to_vec(),
            skipped: Vec::new(),
        }
    }

    #[must_use]
    pub fn bound(&self) -> &[Binding] {
        &self.bound
    }

    #[must_use]
    pub fn skipped(&self) -> &[Binding] {
        &self.skipped
    }

    /// Handlers attached for `event`, in attach order.
    pub fn handlers_for(&self, event: EventKind) -> impl Iterator<Item = HandlerId> + '_ {
        self.bound
            .iter()
            .filter(move |b| b.event == event)
            .map(|b| b.handler)
    }

    #[must_use]
    pub fn is_bound(&self, handler: HandlerId) -> bool {
        self.bound.iter().any(|b| b.handler == handler)
    }

    /// Distinct `(target, event)` pairs, one host listener each.
    pub fn listeners(&self) -> Vec<(Target, EventKind)> {
        let mut out: Vec<(Target, EventKind)> = Vec::new();
        for binding in &self.bound {
            let key = (binding.target, binding.event);
            if !out.contains(&key) {
                out.push(key);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_page_binds_everything() {
        let table = BindingTable::resolve(&|_: &str| true);
        assert_eq!(table.bound().len(), BINDINGS.len());
        assert!(table.skipped().is_empty());
        assert_eq!(table, BindingTable::all());
    }

    #[test]
    fn missing_form_skips_only_submit() {
        let table = BindingTable::resolve(&|s: &str| s != CONTACT_FORM_SELECTOR);
        assert!(!table.is_bound(HandlerId::SubmitContact));
        assert!(table.is_bound(HandlerId::ActiveLink));
        assert!(table.is_bound(HandlerId::ToggleMenu));
        assert_eq!(table.skipped().len(), 1);
    }

    #[test]
    fn missing_hamburger_skips_menu_handlers() {
        let table = BindingTable::resolve(&|s: &str| s != ".hamburger");
        assert!(!table.is_bound(HandlerId::ToggleMenu));
        assert!(!table.is_bound(HandlerId::CloseMenu));
        assert!(table.is_bound(HandlerId::SmoothScroll));
    }

    #[test]
    fn empty_document_keeps_unconditional_bindings() {
        let table = BindingTable::resolve(&|_: &str| false);
        let bound: Vec<_> = table.bound().iter().map(|b| b.handler).collect();
        assert_eq!(
            bound,
            vec![
                HandlerId::CursorTrail,
                HandlerId::ShowLoadingOverlay,
                HandlerId::ObserveReveal,
                HandlerId::HideLoadingOverlay,
            ]
        );
    }

    #[test]
    fn scroll_handlers_in_order() {
        let table = BindingTable::all();
        let handlers: Vec<_> = table.handlers_for(EventKind::Scroll).collect();
        assert_eq!(
            handlers,
            vec![
                HandlerId::NavbarScroll,
                HandlerId::ActiveLink,
                HandlerId::RevealSections,
                HandlerId::Parallax,
            ]
        );
    }

    #[test]
    fn listeners_are_deduplicated() {
        let listeners = BindingTable::all().listeners();
        let scroll = listeners
            .iter()
            .filter(|(t, e)| *t == Target::Window && *e == EventKind::Scroll)
            .count();
        assert_eq!(scroll, 1);
    }
}
