//! Property-based invariant tests for validation, scrolling and timers.
//!
//! These tests verify structural invariants that must hold for any input:
//!
//! 1. A blank required field always fails validation.
//! 2. A non-empty email failing the pattern always invalidates the form.
//! 3. Validity is the conjunction of per-field outcomes.
//! 4. Percent-encoding only emits the unreserved set and `%XX` escapes.
//! 5. At most one nav link is active for unique hrefs, and it matches the
//!    current section.
//! 6. `visible` is never removed from a section.
//! 7. Timers fire in non-decreasing deadline order.
//! 8. Every toast is removed exactly 4300 ms after creation.

use std::time::Duration;

use folio_core::form::{EMAIL_PATTERN, is_email, validate};
use folio_core::mailto::encode_uri_component;
use folio_core::scroll::current_section;
use folio_core::{
    DomPatch, ElementRef, FieldId, FieldOutcome, FormSnapshot, PageController, PageEvent,
    ScrollSnapshot, TimerQueue,
};
use proptest::prelude::*;

const PAGE: &[(&str, f64)] = &[
    ("home", 0.0),
    ("about", 900.0),
    ("skills", 1700.0),
    ("projects", 2600.0),
    ("experience", 3400.0),
    ("contact", 4300.0),
];

fn field_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_owned()),
        "[a-zA-Z ]{1,12}",
    ]
}

fn email_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z]{1,6}@[a-z]{1,6}\\.[a-z]{2,3}",
        "[a-z@. ]{1,12}",
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Validation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn blank_field_always_fails(
        name in field_value(),
        email in email_value(),
        subject in field_value(),
        message in field_value(),
    ) {
        let form = FormSnapshot::new(name, email, subject, message);
        let result = validate(&form);
        for field in FieldId::ALL {
            if form.value(field).trim().is_empty() {
                prop_assert!(!result.outcome(field).is_valid());
                prop_assert!(!result.is_valid());
            }
        }
    }

    #[test]
    fn malformed_email_always_invalid(email in "[^@]{1,20}") {
        let form = FormSnapshot::new("Jane", email.clone(), "Hi", "Hello");
        let result = validate(&form);
        prop_assert!(!is_email(&email), "{} should not match {}", email, EMAIL_PATTERN);
        prop_assert!(!result.is_valid());
        prop_assert_eq!(result.outcome(FieldId::Email), FieldOutcome::Malformed);
    }

    #[test]
    fn validity_is_conjunction(
        name in field_value(),
        email in email_value(),
        subject in field_value(),
        message in field_value(),
    ) {
        let result = validate(&FormSnapshot::new(name, email, subject, message));
        let all = FieldId::ALL.iter().all(|f| result.outcome(*f).is_valid());
        prop_assert_eq!(result.is_valid(), all);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Percent-encoding alphabet
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn encoded_output_alphabet(s in "\\PC{0,32}") {
        let encoded = encode_uri_component(&s);
        let bytes = encoded.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if b == b'%' {
                prop_assert!(i + 2 < bytes.len(), "truncated escape in {}", encoded);
                prop_assert!(bytes[i + 1].is_ascii_hexdigit() && bytes[i + 2].is_ascii_hexdigit());
                i += 3;
            } else {
                prop_assert!(b.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&b));
                i += 1;
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5-6. Scroll dispatcher
// ═════════════════════════════════════════════════════════════════════════

fn active_links(page: &PageController) -> Vec<usize> {
    page.scroll_state().active_links().collect()
}

proptest! {
    #[test]
    fn active_link_matches_current_section(ys in prop::collection::vec(0.0f64..5000.0, 1..40)) {
        let mut page = PageController::with_defaults();
        for y in ys {
            let snap = ScrollSnapshot::at(y, 900.0, PAGE);
            page.handle(PageEvent::Scroll(snap.clone()));
            let links = active_links(&page);
            prop_assert!(links.len() <= 1);
            match current_section(&snap.sections, y, 200.0) {
                Some(i) => prop_assert_eq!(links, vec![i]),
                None => prop_assert!(links.is_empty()),
            }
        }
    }

    #[test]
    fn reveal_is_monotonic(ys in prop::collection::vec(0.0f64..5000.0, 1..40)) {
        let mut page = PageController::with_defaults();
        let mut seen = vec![false; PAGE.len()];
        for y in ys {
            page.handle(PageEvent::Scroll(ScrollSnapshot::at(y, 900.0, PAGE)));
            for (i, was) in seen.iter_mut().enumerate() {
                let now = page.scroll_state().is_revealed(i);
                prop_assert!(!*was || now, "section {} un-revealed", i);
                *was = now;
            }
        }
        let patches = page.take_patches();
        let removed_visible = patches.iter().any(|p| matches!(
            p,
            DomPatch::RemoveClass { target: ElementRef::Section(_), .. }
        ));
        prop_assert!(!removed_visible);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Timer ordering
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn timers_fire_in_deadline_order(deadlines in prop::collection::vec(0u64..10_000, 0..64)) {
        let mut timers = TimerQueue::new();
        for d in &deadlines {
            timers.schedule(Duration::from_millis(*d), *d);
        }
        let mut last = 0;
        let mut count = 0;
        while let Some((_, d)) = timers.pop_due(Duration::from_millis(10_000)) {
            prop_assert!(d >= last);
            last = d;
            count += 1;
        }
        prop_assert_eq!(count, deadlines.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Toast lifetime
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn toasts_live_exactly_4300ms(offsets in prop::collection::vec(0u64..3000, 1..6)) {
        let mut page = PageController::with_defaults();
        let mut created = Vec::new();
        let mut sorted = offsets;
        sorted.sort_unstable();
        sorted.dedup();
        for at in sorted {
            page.advance_to(Duration::from_millis(at));
            page.handle(PageEvent::Submit(FormSnapshot::default()));
            created.push(at);
        }
        for at in created {
            page.advance_to(Duration::from_millis(at + 4299));
            let alive = page
                .notifications()
                .any(|n| n.created_at == Duration::from_millis(at));
            prop_assert!(alive);
            page.advance_to(Duration::from_millis(at + 4300));
            let alive = page
                .notifications()
                .any(|n| n.created_at == Duration::from_millis(at));
            prop_assert!(!alive);
        }
    }
}
