#![forbid(unsafe_code)]

//! Mobile hamburger menu.

use crate::controller::Cx;
use crate::patch::{CLASS_ACTIVE, DomPatch, ElementRef};

const OPEN_BARS: [(&str, &str); 3] = [
    ("transform", "rotate(-45deg) translate(-5px, 6px)"),
    ("opacity", "0"),
    ("transform", "rotate(45deg) translate(-5px, -6px)"),
];
const CLOSED_BARS: [(&str, &str); 3] = [
    ("transform", "rotate(0) translate(0, 0)"),
    ("opacity", "1"),
    ("transform", "rotate(0) translate(0, 0)"),
];

#[derive(Debug, Default)]
pub struct Menu {
    open: bool,
}

impl Menu {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) fn toggle(&mut self, cx: &mut Cx<'_>) {
        self.set(cx, !self.open);
    }

    /// Close after a nav link click. Always re-emits the closed look.
    pub(crate) fn close(&mut self, cx: &mut Cx<'_>) {
        self.set(cx, false);
    }

    fn set(&mut self, cx: &mut Cx<'_>, open: bool) {
        self.open = open;
        for target in [ElementRef::Hamburger, ElementRef::NavMenu] {
            cx.emit(if open {
                DomPatch::AddClass {
                    target,
                    class: CLASS_ACTIVE,
                }
            } else {
                DomPatch::RemoveClass {
                    target,
                    class: CLASS_ACTIVE,
                }
            });
        }
        let bars = if open { OPEN_BARS } else { CLOSED_BARS };
        for (i, (property, value)) in bars.into_iter().enumerate() {
            cx.emit(DomPatch::style(ElementRef::HamburgerBar(i), property, value));
        }
    }
}
