#![forbid(unsafe_code)]

//! In-memory page model for testing controller output.
//!
//! Applies [`DomPatch`] streams to a small element table, so tests can
//! assert on the resulting page state (classes, inline styles, field values,
//! live toasts) instead of on raw patch sequences.
//!
//! # Supported Patches
//! - Class and inline-style edits on any [`ElementRef`]
//! - `innerHTML` and `disabled` on any element
//! - Toast, trail dot and loading overlay creation and removal
//! - Form reset, navigation and window scrolling
//!
//! # Example
//! ```
//! use folio_core::{CLASS_ACTIVE, DomPatch, ElementRef};
//! use folio_harness::page_model::PageModel;
//!
//! let mut page = PageModel::standard();
//! page.apply(&DomPatch::AddClass { target: ElementRef::NavLink(1), class: CLASS_ACTIVE });
//! assert!(page.has_class(ElementRef::NavLink(1), CLASS_ACTIVE));
//! assert_eq!(page.active_nav_links(), vec![1]);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use folio_core::{
    CLASS_ACTIVE, DomPatch, ElementRef, FieldId, FormSnapshot, NotificationId, Severity,
};
use tracing::trace;

/// Label of the submit button on the stock page.
pub const SUBMIT_LABEL: &str = "Send Message";

/// State of one element in the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelElement {
    pub classes: BTreeSet<String>,
    pub styles: BTreeMap<String, String>,
    pub html: String,
    pub disabled: bool,
}

impl ModelElement {
    fn with_class_names(names: &str) -> Self {
        Self {
            classes: names.split_whitespace().map(str::to_owned).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }
}

/// A toast currently attached to the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelToast {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
}

/// A cursor trail dot currently attached to the body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelDot {
    pub left: f64,
    pub top: f64,
    pub size: f64,
    pub opacity: f64,
}

/// Simplified page that interprets [`DomPatch`]es.
#[derive(Debug, Clone)]
pub struct PageModel {
    elements: BTreeMap<ElementRef, ModelElement>,
    fields: [String; 4],
    toasts: BTreeMap<NotificationId, ModelToast>,
    dots: BTreeMap<u64, ModelDot>,
    typing_cursor: bool,
    navigations: Vec<String>,
    scroll_y: f64,
    stale_removals: usize,
    applied: usize,
}

impl PageModel {
    /// Empty page: only elements created by patches will exist.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            elements: BTreeMap::new(),
            fields: Default::default(),
            toasts: BTreeMap::new(),
            dots: BTreeMap::new(),
            typing_cursor: false,
            navigations: Vec::new(),
            scroll_y: 0.0,
            stale_removals: 0,
            applied: 0,
        }
    }

    /// The stock page: navbar, hamburger with three bars, six nav links and
    /// sections, hero and the contact form.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_counts(6, 6)
    }

    /// A page with `links` nav links (and menu items) and `sections`
    /// sections.
    #[must_use]
    pub fn with_counts(links: usize, sections: usize) -> Self {
        let mut page = Self::empty();
        let mut insert = |target, classes: &str| {
            page.elements
                .insert(target, ModelElement::with_class_names(classes));
        };
        insert(ElementRef::Navbar, "navbar");
        insert(ElementRef::Hamburger, "hamburger");
        for i in 0..3 {
            insert(ElementRef::HamburgerBar(i), "bar");
        }
        insert(ElementRef::NavMenu, "nav-menu");
        for i in 0..links {
            insert(ElementRef::NavMenuItem(i), "");
            insert(ElementRef::NavLink(i), "nav-link");
        }
        for i in 0..sections {
            insert(ElementRef::Section(i), "");
        }
        insert(ElementRef::HeroContent, "hero-content");
        insert(ElementRef::HeroTitle, "hero-title");
        insert(ElementRef::Form, "contact-form");
        for field in FieldId::ALL {
            insert(ElementRef::Field(field), "");
        }
        insert(ElementRef::SubmitButton, "btn btn-primary");
        if let Some(button) = page.elements.get_mut(&ElementRef::SubmitButton) {
            button.html = SUBMIT_LABEL.to_owned();
        }
        page
    }

    /// Apply patches in order.
    pub fn apply_all<'a>(&mut self, patches: impl IntoIterator<Item = &'a DomPatch>) {
        for patch in patches {
            self.apply(patch);
        }
    }

    /// Apply one patch. Patches addressing a missing element are ignored,
    /// as a host would ignore a failed lookup.
    pub fn apply(&mut self, patch: &DomPatch) {
        self.applied += 1;
        match patch {
            DomPatch::AddClass { target, class } => {
                if let Some(el) = self.element_mut(*target) {
                    el.classes.insert((*class).to_owned());
                }
            }
            DomPatch::RemoveClass { target, class } => {
                if let Some(el) = self.element_mut(*target) {
                    el.classes.remove(*class);
                }
            }
            DomPatch::SetStyle {
                target,
                property,
                value,
            } => {
                if let Some(el) = self.element_mut(*target) {
                    if value.is_empty() {
                        el.styles.remove(*property);
                    } else {
                        el.styles.insert((*property).to_owned(), value.clone());
                    }
                }
            }
            DomPatch::SetHtml { target, html } => {
                if *target == ElementRef::HeroTitle {
                    self.typing_cursor = false;
                }
                if let Some(el) = self.element_mut(*target) {
                    el.html.clone_from(html);
                }
            }
            DomPatch::SetDisabled { target, disabled } => {
                if let Some(el) = self.element_mut(*target) {
                    el.disabled = *disabled;
                }
            }
            DomPatch::CreateToast {
                id,
                message,
                severity,
            } => {
                let mut el = ModelElement::with_class_names(severity.class_name());
                el.html = message.clone();
                el.styles
                    .insert("background".to_owned(), severity.background().to_owned());
                self.elements.insert(ElementRef::Toast(*id), el);
                self.toasts.insert(
                    *id,
                    ModelToast {
                        id: *id,
                        message: message.clone(),
                        severity: *severity,
                    },
                );
            }
            DomPatch::CreateTrailDot {
                id,
                left,
                top,
                size,
                opacity,
            } => {
                self.elements.insert(
                    ElementRef::TrailDot(*id),
                    ModelElement::with_class_names("cursor-trail"),
                );
                self.dots.insert(
                    *id,
                    ModelDot {
                        left: *left,
                        top: *top,
                        size: *size,
                        opacity: *opacity,
                    },
                );
            }
            DomPatch::CreateLoadingOverlay => {
                self.elements.insert(
                    ElementRef::LoadingOverlay,
                    ModelElement::with_class_names("loading-overlay"),
                );
            }
            DomPatch::AppendTypingCursor => {
                if self.elements.contains_key(&ElementRef::HeroTitle) {
                    self.typing_cursor = true;
                }
            }
            DomPatch::Remove { target } => {
                if self.elements.remove(target).is_none() {
                    trace!(?target, "remove of detached element");
                    self.stale_removals += 1;
                }
                match target {
                    ElementRef::Toast(id) => {
                        self.toasts.remove(id);
                    }
                    ElementRef::TrailDot(id) => {
                        self.dots.remove(id);
                    }
                    _ => {}
                }
            }
            DomPatch::ResetForm => {
                if self.elements.contains_key(&ElementRef::Form) {
                    self.fields = Default::default();
                }
            }
            DomPatch::Navigate { url } => self.navigations.push(url.clone()),
            DomPatch::ScrollTo { y } => self.scroll_y = *y,
        }
    }

    fn element_mut(&mut self, target: ElementRef) -> Option<&mut ModelElement> {
        let found = self.elements.get_mut(&target);
        if found.is_none() {
            trace!(?target, "patch for missing element");
        }
        found
    }

    // -- Elements -------------------------------------------------------

    #[must_use]
    pub fn element(&self, target: ElementRef) -> Option<&ModelElement> {
        self.elements.get(&target)
    }

    #[must_use]
    pub fn exists(&self, target: ElementRef) -> bool {
        self.elements.contains_key(&target)
    }

    #[must_use]
    pub fn has_class(&self, target: ElementRef, class: &str) -> bool {
        self.element(target).is_some_and(|el| el.classes.contains(class))
    }

    #[must_use]
    pub fn style(&self, target: ElementRef, property: &str) -> Option<&str> {
        self.element(target).and_then(|el| el.style(property))
    }

    #[must_use]
    pub fn html(&self, target: ElementRef) -> Option<&str> {
        self.element(target).map(|el| el.html.as_str())
    }

    #[must_use]
    pub fn is_disabled(&self, target: ElementRef) -> bool {
        self.element(target).is_some_and(|el| el.disabled)
    }

    /// Indices of nav links carrying `active`.
    #[must_use]
    pub fn active_nav_links(&self) -> Vec<usize> {
        self.elements
            .iter()
            .filter_map(|(target, el)| match target {
                ElementRef::NavLink(i) if el.classes.contains(CLASS_ACTIVE) => Some(*i),
                _ => None,
            })
            .collect()
    }

    /// Number of `.nav-menu li` elements.
    #[must_use]
    pub fn nav_menu_items(&self) -> usize {
        self.elements
            .keys()
            .filter(|target| matches!(target, ElementRef::NavMenuItem(_)))
            .count()
    }

    // -- Form -----------------------------------------------------------

    #[must_use]
    pub fn field(&self, field: FieldId) -> &str {
        &self.fields[field.index()]
    }

    /// Type into an input, as the user would.
    pub fn set_field(&mut self, field: FieldId, value: impl Into<String>) {
        self.fields[field.index()] = value.into();
    }

    /// Current input values and button label.
    #[must_use]
    pub fn form_snapshot(&self) -> FormSnapshot {
        let snapshot = FormSnapshot::new(
            self.field(FieldId::Name),
            self.field(FieldId::Email),
            self.field(FieldId::Subject),
            self.field(FieldId::Message),
        );
        match self.html(ElementRef::SubmitButton) {
            Some(label) => snapshot.with_submit_label(label),
            None => snapshot,
        }
    }

    // -- Created elements -----------------------------------------------

    /// Toasts attached to the body, oldest first.
    pub fn toasts(&self) -> impl Iterator<Item = &ModelToast> {
        self.toasts.values()
    }

    #[must_use]
    pub fn toast_count(&self) -> usize {
        self.toasts.len()
    }

    pub fn dots(&self) -> impl Iterator<Item = (u64, &ModelDot)> {
        self.dots.iter().map(|(id, dot)| (*id, dot))
    }

    #[must_use]
    pub fn dot_count(&self) -> usize {
        self.dots.len()
    }

    #[must_use]
    pub fn overlay_attached(&self) -> bool {
        self.exists(ElementRef::LoadingOverlay)
    }

    #[must_use]
    pub fn has_typing_cursor(&self) -> bool {
        self.typing_cursor
    }

    // -- Window ---------------------------------------------------------

    /// URLs handed to `location.href`, in order.
    #[must_use]
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y;
    }

    /// `Remove` patches that found nothing to detach.
    #[must_use]
    pub fn stale_removals(&self) -> usize {
        self.stale_removals
    }

    /// Total patches applied.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl Default for PageModel {
    fn default() -> Self {
        Self::standard()
    }
}
