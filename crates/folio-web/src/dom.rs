#![forbid(unsafe_code)]

//! Document access for the wasm adapter: measuring the page into
//! [`PageEvent`]s and applying [`DomPatch`]es.
//!
//! Lookups that find nothing are not errors; the patch is skipped with a
//! trace line, as the page may legitimately lack an element.

use std::collections::HashMap;

use folio_core::bindings::{ANCHOR_SELECTOR, CONTACT_FORM_SELECTOR, NAV_LINK_SELECTOR};
use folio_core::effects::reveal::{ANIMATED_SELECTOR, SKILL_TAG_SELECTOR, STAGGERED_CLASSES};
use folio_core::{
    BindingTable, DomPatch, ElementRef, EventKind, FieldId, FormSnapshot, ObservedEntry,
    PageEvent, PageLayout, ScrollSnapshot, SectionMetrics, Target,
};
use js_sys::Reflect;
use tracing::trace;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlFormElement, IntersectionObserverEntry,
    MouseEvent, Window,
};

use crate::markup;

/// Attribute carrying an observed element's index.
pub(crate) const OBSERVED_INDEX_ATTR: &str = "data-folio-index";

const SUBMIT_BUTTON_SELECTOR: &str = "#contactForm button[type=\"submit\"]";
const KEYFRAMES_STYLE_ID: &str = "folio-keyframes";

pub(crate) struct Dom {
    window: Window,
    document: Document,
    /// Elements created by patches, addressable until removed.
    created: HashMap<ElementRef, Element>,
}

impl Dom {
    pub(crate) fn new(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            created: HashMap::new(),
        }
    }

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    // -- Queries --------------------------------------------------------

    pub(crate) fn first(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    pub(crate) fn exists(&self, selector: &str) -> bool {
        self.first(selector).is_some()
    }

    pub(crate) fn all(&self, selector: &str) -> Result<Vec<Element>, JsValue> {
        let list = self.document.query_selector_all(selector)?;
        Ok((0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn nth(&self, selector: &str, index: usize) -> Option<Element> {
        let index = u32::try_from(index).ok()?;
        let list = self.document.query_selector_all(selector).ok()?;
        list.get(index)?.dyn_into::<Element>().ok()
    }

    /// Nav hrefs and the binding table for the current document.
    pub(crate) fn layout(&self) -> PageLayout {
        let nav_hrefs = self
            .all(NAV_LINK_SELECTOR)
            .unwrap_or_default()
            .iter()
            .map(|link| link.get_attribute("href").unwrap_or_default())
            .collect();
        PageLayout {
            nav_hrefs,
            bindings: BindingTable::resolve(&|selector: &str| self.exists(selector)),
        }
    }

    // -- Measurement ----------------------------------------------------

    pub(crate) fn scroll_snapshot(&self) -> ScrollSnapshot {
        let sections = self
            .all("section")
            .unwrap_or_default()
            .iter()
            .map(|section| {
                let id = section.id();
                SectionMetrics {
                    id: (!id.is_empty()).then_some(id),
                    offset_top: offset_top(section),
                    viewport_top: section.get_bounding_client_rect().top(),
                }
            })
            .collect();
        ScrollSnapshot {
            scroll_y: self.window.scroll_y().unwrap_or(0.0),
            viewport_height: self
                .window
                .inner_height()
                .ok()
                .and_then(|h| h.as_f64())
                .unwrap_or(0.0),
            sections,
        }
    }

    pub(crate) fn form_snapshot(&self) -> FormSnapshot {
        let value = |field: FieldId| {
            self.document
                .get_element_by_id(field.dom_id())
                .and_then(|input| Reflect::get(&input, &JsValue::from_str("value")).ok())
                .and_then(|v| v.as_string())
                .unwrap_or_default()
        };
        let snapshot = FormSnapshot::new(
            value(FieldId::Name),
            value(FieldId::Email),
            value(FieldId::Subject),
            value(FieldId::Message),
        );
        match self.first(SUBMIT_BUTTON_SELECTOR) {
            Some(button) => snapshot.with_submit_label(button.inner_html()),
            None => snapshot,
        }
    }

    /// Translate a DOM event delivered to a `(target, kind)` listener.
    pub(crate) fn page_event(&self, target: Target, kind: EventKind, event: &Event) -> Option<PageEvent> {
        match (target, kind) {
            (Target::Selector(ANCHOR_SELECTOR), EventKind::Click) => {
                event.prevent_default();
                let anchor = event.current_target()?.dyn_into::<Element>().ok()?;
                let href = anchor.get_attribute("href").unwrap_or_default();
                let target_top = self.first(&href).map(|el| offset_top(&el));
                Some(PageEvent::AnchorClick {
                    href,
                    target_top,
                    scroll_y: self.window.scroll_y().unwrap_or(0.0),
                })
            }
            (Target::Selector(NAV_LINK_SELECTOR), EventKind::Click) => Some(PageEvent::NavLinkClick),
            (Target::Selector(_), EventKind::Click) => Some(PageEvent::HamburgerClick),
            (_, EventKind::Submit) => {
                event.prevent_default();
                Some(PageEvent::Submit(self.form_snapshot()))
            }
            (_, EventKind::Scroll) => Some(PageEvent::Scroll(self.scroll_snapshot())),
            (_, EventKind::MouseMove) => {
                let mouse = event.dyn_ref::<MouseEvent>()?;
                Some(PageEvent::MouseMove {
                    x: f64::from(mouse.client_x()),
                    y: f64::from(mouse.client_y()),
                })
            }
            (_, EventKind::DomReady) => Some(self.dom_ready()),
            (_, EventKind::Load) => Some(PageEvent::Load),
            (_, EventKind::Intersect) => None,
        }
    }

    pub(crate) fn dom_ready(&self) -> PageEvent {
        PageEvent::DomReady {
            nav_menu_items: self.all(".nav-menu li").map_or(0, |items| items.len()),
            scroll: self.scroll_snapshot(),
        }
    }

    /// Tag every animated element with its index for observer lookups.
    pub(crate) fn index_animated(&self) -> Result<Vec<Element>, JsValue> {
        let elements = self.all(ANIMATED_SELECTOR)?;
        for (i, el) in elements.iter().enumerate() {
            el.set_attribute(OBSERVED_INDEX_ATTR, &i.to_string())?;
        }
        Ok(elements)
    }

    pub(crate) fn observed_entry(entry: &IntersectionObserverEntry) -> Option<ObservedEntry> {
        let target = entry.target();
        let element = target.get_attribute(OBSERVED_INDEX_ATTR)?.parse().ok()?;
        let classes = target.class_list();
        let skill_tags = if classes.contains("skill-category") {
            target
                .query_selector_all(SKILL_TAG_SELECTOR)
                .map_or(0, |tags| tags.length() as usize)
        } else {
            0
        };
        Some(ObservedEntry {
            element,
            intersecting: entry.is_intersecting(),
            staggered: STAGGERED_CLASSES.iter().any(|c| classes.contains(c)),
            skill_tags,
        })
    }

    /// Add the keyframes used by inline animations, once.
    pub(crate) fn inject_keyframes(&self) -> Result<(), JsValue> {
        if self.document.get_element_by_id(KEYFRAMES_STYLE_ID).is_some() {
            return Ok(());
        }
        let Some(head) = self.document.head() else {
            return Ok(());
        };
        let style = self.document.create_element("style")?;
        style.set_id(KEYFRAMES_STYLE_ID);
        style.set_text_content(Some(markup::KEYFRAMES_CSS));
        head.append_child(&style)?;
        Ok(())
    }

    // -- Patches --------------------------------------------------------

    fn resolve(&self, target: ElementRef) -> Option<Element> {
        let found = match target {
            ElementRef::Field(field) => self.document.get_element_by_id(field.dom_id()),
            ElementRef::Form => self.first(CONTACT_FORM_SELECTOR),
            ElementRef::SubmitButton => self.first(SUBMIT_BUTTON_SELECTOR),
            ElementRef::Navbar => self.first(".navbar"),
            ElementRef::Hamburger => self.first(".hamburger"),
            ElementRef::HamburgerBar(i) => self.nth(".hamburger .bar", i),
            ElementRef::NavMenu => self.first(".nav-menu"),
            ElementRef::NavMenuItem(i) => self.nth(".nav-menu li", i),
            ElementRef::NavLink(i) => self.nth(NAV_LINK_SELECTOR, i),
            ElementRef::Section(i) => self.nth("section", i),
            ElementRef::Animated(i) => self.first(&format!("[{OBSERVED_INDEX_ATTR}=\"{i}\"]")),
            ElementRef::SkillTag { element, tag } => self
                .first(&format!("[{OBSERVED_INDEX_ATTR}=\"{element}\"]"))
                .and_then(|host| host.query_selector_all(SKILL_TAG_SELECTOR).ok())
                .and_then(|tags| tags.get(u32::try_from(tag).ok()?))
                .and_then(|node| node.dyn_into::<Element>().ok()),
            ElementRef::HeroContent => self.first(".hero-content"),
            ElementRef::HeroTitle => self.first(".hero-title"),
            ElementRef::Toast(_) | ElementRef::TrailDot(_) | ElementRef::LoadingOverlay => {
                self.created.get(&target).cloned()
            }
        };
        if found.is_none() {
            trace!(?target, "patch target not in document");
        }
        found
    }

    fn create(&self, tag: &str, class: &str, css: &str) -> Result<Element, JsValue> {
        let el = self.document.create_element(tag)?;
        el.set_class_name(class);
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            html.style().set_css_text(css);
        }
        Ok(el)
    }

    fn append_to_body(&self, el: &Element) -> Result<(), JsValue> {
        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        body.append_child(el)?;
        Ok(())
    }

    pub(crate) fn apply(&mut self, patch: &DomPatch) -> Result<(), JsValue> {
        match patch {
            DomPatch::AddClass { target, class } => {
                if let Some(el) = self.resolve(*target) {
                    el.class_list().add_1(class)?;
                }
            }
            DomPatch::RemoveClass { target, class } => {
                if let Some(el) = self.resolve(*target) {
                    el.class_list().remove_1(class)?;
                }
            }
            DomPatch::SetStyle {
                target,
                property,
                value,
            } => {
                if let Some(el) = self.resolve(*target).and_then(|el| el.dyn_into::<HtmlElement>().ok()) {
                    el.style().set_property(property, value)?;
                }
            }
            DomPatch::SetHtml { target, html } => {
                if let Some(el) = self.resolve(*target) {
                    el.set_inner_html(html);
                }
            }
            DomPatch::SetDisabled { target, disabled } => {
                if let Some(el) = self.resolve(*target) {
                    el.toggle_attribute_with_force("disabled", *disabled)?;
                }
            }
            DomPatch::CreateToast {
                id,
                message,
                severity,
            } => {
                let toast = self.create("div", severity.class_name(), &markup::toast_css(*severity))?;
                let row = self.create("div", "", markup::TOAST_ROW_CSS)?;
                row.set_inner_html(&markup::toast_icon_html(*severity));
                let text = self.document.create_element("span")?;
                text.set_text_content(Some(message));
                row.append_child(&text)?;
                toast.append_child(&row)?;
                self.append_to_body(&toast)?;
                self.created.insert(ElementRef::Toast(*id), toast);
            }
            DomPatch::CreateTrailDot {
                id,
                left,
                top,
                size,
                opacity,
            } => {
                let dot = self.create(
                    "div",
                    "cursor-trail",
                    &markup::trail_dot_css(*left, *top, *size, *opacity),
                )?;
                self.append_to_body(&dot)?;
                self.created.insert(ElementRef::TrailDot(*id), dot);
            }
            DomPatch::CreateLoadingOverlay => {
                let overlay = self.create("div", "loading-overlay", "")?;
                let spinner = self.create("div", "spinner", "")?;
                let text = self.create("div", "", markup::LOADING_TEXT_CSS)?;
                text.set_text_content(Some(markup::LOADING_TEXT));
                overlay.append_child(&spinner)?;
                overlay.append_child(&text)?;
                self.append_to_body(&overlay)?;
                self.created.insert(ElementRef::LoadingOverlay, overlay);
            }
            DomPatch::AppendTypingCursor => {
                if let Some(title) = self.resolve(ElementRef::HeroTitle) {
                    let host = title
                        .query_selector(".highlight")
                        .ok()
                        .flatten()
                        .unwrap_or(title);
                    let cursor = self.create("span", "cursor", markup::TYPING_CURSOR_CSS)?;
                    host.append_child(&cursor)?;
                }
            }
            DomPatch::Remove { target } => {
                let el = self.created.remove(target).or_else(|| self.resolve(*target));
                match el {
                    Some(el) if el.parent_node().is_some() => el.remove(),
                    _ => trace!(?target, "already detached"),
                }
            }
            DomPatch::ResetForm => {
                if let Some(form) = self
                    .resolve(ElementRef::Form)
                    .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
                {
                    form.reset();
                }
            }
            DomPatch::Navigate { url } => self.window.location().set_href(url)?,
            DomPatch::ScrollTo { y } => self.window.scroll_to_with_x_and_y(0.0, *y),
        }
        Ok(())
    }
}

fn offset_top(el: &Element) -> f64 {
    el.dyn_ref::<HtmlElement>()
        .map_or(0.0, |html| f64::from(html.offset_top()))
}
