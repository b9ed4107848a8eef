#![forbid(unsafe_code)]

//! DOM mutations emitted by the controller.
//!
//! The controller never touches a document. Each handler and timer appends
//! [`DomPatch`] values to an output queue; the host drains the queue and
//! applies the patches in order. Elements are addressed by [`ElementRef`],
//! a host-neutral handle the host resolves against its own element table.

use serde::Serialize;

use crate::form::FieldId;
use crate::notify::{NotificationId, Severity};

/// Class toggled on nav links, the hamburger and the nav menu.
pub const CLASS_ACTIVE: &str = "active";
/// Monotonic reveal class on sections and animated elements.
pub const CLASS_VISIBLE: &str = "visible";

/// Host-neutral address of a page element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum ElementRef {
    /// One of the four contact form inputs.
    Field(FieldId),
    /// The contact form itself.
    Form,
    /// The form's submit button.
    SubmitButton,
    /// `.navbar`.
    Navbar,
    /// `.hamburger`.
    Hamburger,
    /// The n-th `.bar` inside the hamburger.
    HamburgerBar(usize),
    /// `.nav-menu`.
    NavMenu,
    /// The n-th `.nav-menu li`.
    NavMenuItem(usize),
    /// The n-th `.nav-link`.
    NavLink(usize),
    /// The n-th `section`, document order.
    Section(usize),
    /// The n-th observed animated element.
    Animated(usize),
    /// The `tag`-th `.skill-tag` inside observed element `element`.
    SkillTag { element: usize, tag: usize },
    /// `.hero-content`.
    HeroContent,
    /// `.hero-title`.
    HeroTitle,
    /// A toast created by [`DomPatch::CreateToast`].
    Toast(NotificationId),
    /// A dot created by [`DomPatch::CreateTrailDot`].
    TrailDot(u64),
    /// The overlay created by [`DomPatch::CreateLoadingOverlay`].
    LoadingOverlay,
}

/// A single DOM mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DomPatch {
    AddClass {
        target: ElementRef,
        class: &'static str,
    },
    RemoveClass {
        target: ElementRef,
        class: &'static str,
    },
    /// Set an inline style property (CSS name, custom properties allowed).
    SetStyle {
        target: ElementRef,
        property: &'static str,
        value: String,
    },
    SetHtml {
        target: ElementRef,
        html: String,
    },
    SetDisabled {
        target: ElementRef,
        disabled: bool,
    },
    /// Append a toast to the body, anchored top-right and off-screen.
    CreateToast {
        id: NotificationId,
        message: String,
        severity: Severity,
    },
    /// Append a `.cursor-trail` dot to the body.
    CreateTrailDot {
        id: u64,
        left: f64,
        top: f64,
        size: f64,
        opacity: f64,
    },
    CreateLoadingOverlay,
    /// Append the blinking cursor to the hero title's highlight.
    AppendTypingCursor,
    /// Detach an element. Hosts must tolerate elements already gone.
    Remove {
        target: ElementRef,
    },
    /// Clear every form input.
    ResetForm,
    /// Hand off to another URL (the `mailto:` link).
    Navigate {
        url: String,
    },
    ScrollTo {
        y: f64,
    },
}

impl DomPatch {
    pub(crate) fn style(target: ElementRef, property: &'static str, value: impl Into<String>) -> Self {
        Self::SetStyle {
            target,
            property,
            value: value.into(),
        }
    }

    /// The element this patch mutates, if it addresses an existing one.
    #[must_use]
    pub fn target(&self) -> Option<ElementRef> {
        match self {
            Self::AddClass { target, .. }
            | Self::RemoveClass { target, .. }
            | Self::SetStyle { target, .. }
            | Self::SetHtml { target, .. }
            | Self::SetDisabled { target, .. }
            | Self::Remove { target } => Some(*target),
            Self::ResetForm => Some(ElementRef::Form),
            Self::AppendTypingCursor => Some(ElementRef::HeroTitle),
            Self::CreateToast { .. }
            | Self::CreateTrailDot { .. }
            | Self::CreateLoadingOverlay
            | Self::Navigate { .. }
            | Self::ScrollTo { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_of_class_patch() {
        let patch = DomPatch::AddClass {
            target: ElementRef::Section(2),
            class: CLASS_VISIBLE,
        };
        assert_eq!(patch.target(), Some(ElementRef::Section(2)));
    }

    #[test]
    fn creation_patches_have_no_target() {
        assert_eq!(DomPatch::CreateLoadingOverlay.target(), None);
        assert_eq!(DomPatch::ScrollTo { y: 1.0 }.target(), None);
    }

    #[test]
    fn patches_serialize_with_op_tag() {
        let json = serde_json::to_string(&DomPatch::Navigate {
            url: "mailto:a@b.c".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"op":"navigate","url":"mailto:a@b.c"}"#);
    }
}
