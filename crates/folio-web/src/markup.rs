#![forbid(unsafe_code)]

//! Inline styles and markup for elements the host creates.
//!
//! Kept free of DOM types so the exact strings can be checked natively.

use folio_core::Severity;

/// Keyframes referenced by the inline animations below, injected once at
/// mount.
pub const KEYFRAMES_CSS: &str = "\
@keyframes shake {
    0%, 100% { transform: translateX(0); }
    10%, 30%, 50%, 70%, 90% { transform: translateX(-5px); }
    20%, 40%, 60%, 80% { transform: translateX(5px); }
}
@keyframes trailFade {
    0% { opacity: 0.8; transform: scale(1); }
    100% { opacity: 0; transform: scale(0); }
}";

pub const LOADING_TEXT: &str = "Loading Portfolio...";

pub const LOADING_TEXT_CSS: &str =
    "color: white; font-size: 1.2rem; margin-top: 2rem; animation: pulse 2s infinite;";

pub const TYPING_CURSOR_CSS: &str = "display: inline-block; width: 2px; height: 1.2em; \
     background: #fbbf24; margin-left: 2px; animation: blink 1s infinite;";

/// Inline style of a toast. Slide-in is driven by later `transform` patches.
#[must_use]
pub fn toast_css(severity: Severity) -> String {
    format!(
        "position: fixed; top: 20px; right: 20px; padding: 1rem 1.5rem; \
         border-radius: 10px; color: white; z-index: 10000; \
         transform: translateX(100%); transition: transform 0.3s ease; \
         box-shadow: 0 10px 25px rgba(0, 0, 0, 0.2); background: {};",
        severity.background()
    )
}

/// Icon row of a toast. The message is appended as a text node.
#[must_use]
pub fn toast_icon_html(severity: Severity) -> String {
    format!(r#"<i class="fas {}"></i>"#, severity.icon())
}

pub const TOAST_ROW_CSS: &str = "display: flex; align-items: center; gap: 0.5rem;";

/// Inline style of one cursor trail dot.
#[must_use]
pub fn trail_dot_css(left: f64, top: f64, size: f64, opacity: f64) -> String {
    format!(
        "position: fixed; width: {size}px; height: {size}px; \
         background: linear-gradient(45deg, #2563eb, #7c3aed); border-radius: 50%; \
         pointer-events: none; z-index: 9999; opacity: {opacity}; \
         animation: trailFade 0.5s ease-out forwards; left: {left}px; top: {top}px;"
    )
}
