#![forbid(unsafe_code)]

//! Staggered reveal of observed elements.
//!
//! The host reports intersection batches; every intersecting entry is
//! revealed `index * stagger` after the batch arrives, where `index` is its
//! position in the batch.

use std::collections::BTreeSet;
use std::time::Duration;

use super::EffectTask;
use crate::config::PageConfig;
use crate::controller::Cx;
use crate::patch::{CLASS_VISIBLE, DomPatch, ElementRef};

/// Elements the host observes for reveal.
pub const ANIMATED_SELECTOR: &str = ".section-title, .about-intro, .detail-item, .skill-category, .project-card, .timeline-item, .contact-item, .contact-form";

/// Tags inside a `.skill-category`, each indexed with `--i` on reveal.
pub const SKILL_TAG_SELECTOR: &str = ".skill-tag";

/// Classes whose elements also get a `--i` stagger index.
pub const STAGGERED_CLASSES: [&str; 4] =
    ["detail-item", "project-card", "timeline-item", "contact-item"];

/// One intersection observer entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservedEntry {
    /// Index among the elements matched by [`ANIMATED_SELECTOR`].
    pub element: usize,
    pub intersecting: bool,
    /// Whether the element carries one of [`STAGGERED_CLASSES`].
    pub staggered: bool,
    /// Number of [`SKILL_TAG_SELECTOR`] children; zero unless the element
    /// is a `.skill-category`.
    pub skill_tags: usize,
}

#[derive(Debug)]
pub struct RevealObserver {
    stagger: Duration,
    revealed: BTreeSet<usize>,
}

impl RevealObserver {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            stagger: config.reveal_stagger(),
            revealed: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn is_revealed(&self, element: usize) -> bool {
        self.revealed.contains(&element)
    }

    pub(crate) fn observe(&mut self, cx: &mut Cx<'_>, entries: &[ObservedEntry]) {
        for (index, entry) in entries.iter().enumerate() {
            if !entry.intersecting {
                continue;
            }
            let delay = self.stagger * u32::try_from(index).unwrap_or(u32::MAX);
            cx.after(
                delay,
                EffectTask::Reveal {
                    element: entry.element,
                    stagger: entry.staggered.then_some(index),
                    skill_tags: entry.skill_tags,
                },
            );
        }
    }

    pub(crate) fn reveal(
        &mut self,
        cx: &mut Cx<'_>,
        element: usize,
        stagger: Option<usize>,
        skill_tags: usize,
    ) {
        let target = ElementRef::Animated(element);
        if self.revealed.insert(element) {
            cx.emit(DomPatch::AddClass {
                target,
                class: CLASS_VISIBLE,
            });
        }
        if let Some(index) = stagger {
            cx.emit(DomPatch::style(target, "--i", index.to_string()));
        }
        for tag in 0..skill_tags {
            cx.emit(DomPatch::style(
                ElementRef::SkillTag { element, tag },
                "--i",
                tag.to_string(),
            ));
        }
    }
}
