#![forbid(unsafe_code)]

//! Scroll-driven state: active nav link, section reveal, navbar look and
//! hero parallax.
//!
//! Every scroll event recomputes each fact from the host's measurements in a
//! single pass over the sections. Nothing is throttled or memoized beyond the
//! last offset (for direction) and the current markers (to emit diffs).

use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::config::PageConfig;
use crate::controller::Cx;
use crate::patch::{CLASS_ACTIVE, CLASS_VISIBLE, DomPatch, ElementRef};

/// Geometry of one `section` element at event time.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionMetrics {
    /// The `id` attribute, if any.
    pub id: Option<String>,
    /// Distance from the document top (`offsetTop`).
    pub offset_top: f64,
    /// Distance from the viewport top (`getBoundingClientRect().top`).
    pub viewport_top: f64,
}

impl SectionMetrics {
    pub fn new(id: impl Into<String>, offset_top: f64, viewport_top: f64) -> Self {
        Self {
            id: Some(id.into()),
            offset_top,
            viewport_top,
        }
    }
}

/// Everything the dispatcher needs from one scroll event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollSnapshot {
    pub scroll_y: f64,
    pub viewport_height: f64,
    /// Sections in document order.
    pub sections: Vec<SectionMetrics>,
}

impl ScrollSnapshot {
    /// Build a snapshot for a page whose sections sit at fixed document
    /// offsets, deriving each viewport top from `scroll_y`.
    pub fn at(scroll_y: f64, viewport_height: f64, sections: &[(&str, f64)]) -> Self {
        Self {
            scroll_y,
            viewport_height,
            sections: sections
                .iter()
                .map(|(id, top)| SectionMetrics::new(*id, *top, top - scroll_y))
                .collect(),
        }
    }
}

/// Index of the last section whose `offset_top - offset` is at or above
/// `scroll_y`, document order.
#[must_use]
pub fn current_section(sections: &[SectionMetrics], scroll_y: f64, offset: f64) -> Option<usize> {
    sections
        .iter()
        .enumerate()
        .filter(|(_, s)| scroll_y >= s.offset_top - offset)
        .map(|(i, _)| i)
        .last()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NavbarLook {
    scrolled: bool,
    hidden: bool,
}

/// Scroll state owned by the controller.
#[derive(Debug)]
pub struct ScrollDispatcher {
    nav_hrefs: Vec<String>,
    active_offset: f64,
    reveal_margin: f64,
    navbar_scrolled_threshold: f64,
    navbar_hide_threshold: f64,
    parallax_rate: f64,
    current: Option<String>,
    active_links: BTreeSet<usize>,
    revealed: BTreeSet<usize>,
    last_scroll_y: f64,
    navbar: Option<NavbarLook>,
}

impl ScrollDispatcher {
    /// `nav_hrefs` holds the `href` attribute of each `.nav-link`, in order.
    pub fn new(config: &PageConfig, nav_hrefs: Vec<String>) -> Self {
        Self {
            nav_hrefs,
            active_offset: config.active_offset,
            reveal_margin: config.reveal_margin,
            navbar_scrolled_threshold: config.navbar_scrolled_threshold,
            navbar_hide_threshold: config.navbar_hide_threshold,
            parallax_rate: config.parallax_rate,
            current: None,
            active_links: BTreeSet::new(),
            revealed: BTreeSet::new(),
            last_scroll_y: 0.0,
            navbar: None,
        }
    }

    /// Id of the section the reader is in.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Indices of nav links carrying `active`.
    pub fn active_links(&self) -> impl Iterator<Item = usize> + '_ {
        self.active_links.iter().copied()
    }

    #[must_use]
    pub fn is_revealed(&self, section: usize) -> bool {
        self.revealed.contains(&section)
    }

    #[must_use]
    pub fn last_scroll_y(&self) -> f64 {
        self.last_scroll_y
    }

    /// Mark the nav link(s) pointing at the current section.
    pub(crate) fn update_active_link(&mut self, cx: &mut Cx<'_>, snap: &ScrollSnapshot) {
        self.current = current_section(&snap.sections, snap.scroll_y, self.active_offset)
            .and_then(|i| snap.sections[i].id.clone());

        let wanted: BTreeSet<usize> = match &self.current {
            Some(id) => {
                let fragment = format!("#{id}");
                self.nav_hrefs
                    .iter()
                    .enumerate()
                    .filter(|(_, href)| **href == fragment)
                    .map(|(i, _)| i)
                    .collect()
            }
            None => BTreeSet::new(),
        };
        if wanted == self.active_links {
            return;
        }
        trace!(current = ?self.current, "active section changed");

        for &link in self.active_links.difference(&wanted) {
            cx.emit(DomPatch::RemoveClass {
                target: ElementRef::NavLink(link),
                class: CLASS_ACTIVE,
            });
        }
        for &link in wanted.difference(&self.active_links) {
            cx.emit(DomPatch::AddClass {
                target: ElementRef::NavLink(link),
                class: CLASS_ACTIVE,
            });
        }
        self.active_links = wanted;
    }

    /// Reveal every section whose top has entered the lower reveal band.
    /// Reveals are never undone.
    pub(crate) fn reveal_sections(&mut self, cx: &mut Cx<'_>, snap: &ScrollSnapshot) {
        let limit = snap.viewport_height - self.reveal_margin;
        for (i, section) in snap.sections.iter().enumerate() {
            if section.viewport_top < limit && self.revealed.insert(i) {
                debug!(section = i, id = ?section.id, "section revealed");
                cx.emit(DomPatch::AddClass {
                    target: ElementRef::Section(i),
                    class: CLASS_VISIBLE,
                });
            }
        }
    }

    /// Navbar background past the first threshold; hide while scrolling down
    /// past the second.
    pub(crate) fn update_navbar(&mut self, cx: &mut Cx<'_>, snap: &ScrollSnapshot) {
        let y = snap.scroll_y;
        let look = NavbarLook {
            scrolled: y > self.navbar_scrolled_threshold,
            hidden: y > self.last_scroll_y && y > self.navbar_hide_threshold,
        };
        self.last_scroll_y = y;

        let previous = self.navbar.replace(look);
        if previous.map(|p| p.scrolled) != Some(look.scrolled) {
            let (background, shadow, blur) = if look.scrolled {
                (
                    "rgba(255, 255, 255, 0.98)",
                    "0 2px 25px rgba(0, 0, 0, 0.15)",
                    "blur(15px)",
                )
            } else {
                (
                    "rgba(255, 255, 255, 0.95)",
                    "0 2px 20px rgba(0, 0, 0, 0.1)",
                    "blur(10px)",
                )
            };
            cx.emit(DomPatch::style(ElementRef::Navbar, "background", background));
            cx.emit(DomPatch::style(ElementRef::Navbar, "box-shadow", shadow));
            cx.emit(DomPatch::style(ElementRef::Navbar, "backdrop-filter", blur));
        }
        if previous.map(|p| p.hidden) != Some(look.hidden) {
            let transform = if look.hidden {
                "translateY(-100%)"
            } else {
                "translateY(0)"
            };
            cx.emit(DomPatch::style(ElementRef::Navbar, "transform", transform));
        }
    }

    pub(crate) fn parallax(&self, cx: &mut Cx<'_>, snap: &ScrollSnapshot) {
        let rate = snap.scroll_y * self.parallax_rate;
        cx.emit(DomPatch::style(
            ElementRef::HeroContent,
            "transform",
            format!("translateY({rate}px)"),
        ));
    }
}
