#![forbid(unsafe_code)]

//! Decorative page effects.
//!
//! Each effect is a small state holder driven by the controller. None of
//! them fail; each only emits patches and schedules its own follow-ups.

pub mod menu;
pub mod overlay;
pub mod reveal;
pub mod smooth_scroll;
pub mod trail;
pub mod typewriter;

pub use menu::Menu;
pub use overlay::LoadingOverlay;
pub use reveal::{ObservedEntry, RevealObserver};
pub use smooth_scroll::{SmoothScroller, ease_in_out_quad};
pub use trail::CursorTrail;
pub use typewriter::Typewriter;

/// Timer follow-ups scheduled by effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectTask {
    ScrollFrame { animation: u64 },
    Reveal {
        element: usize,
        stagger: Option<usize>,
        skill_tags: usize,
    },
    StartTyping,
    TypeNext,
    RemoveTrailDot(u64),
    FadeOverlay,
    RemoveOverlay,
}
