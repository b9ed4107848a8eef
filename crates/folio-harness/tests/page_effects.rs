#![forbid(unsafe_code)]

//! Integration tests for scroll-driven state and decorative effects.
//!
//! These tests validate that the page:
//! - Keeps exactly one nav link active per section threshold crossed
//! - Never un-reveals a section
//! - Skips behaviors whose elements are missing without disturbing others
//! - Runs the menu, navbar, typing, trail, overlay and smooth scroll
//!   effects on schedule

use folio_core::bindings::CONTACT_FORM_SELECTOR;
use folio_core::effects::typewriter::TypingState;
use folio_core::{
    BindingTable, CLASS_ACTIVE, CLASS_VISIBLE, DomPatch, ElementRef, HandlerId, ObservedEntry, PageConfig,
    PageController, PageLayout,
};
use folio_harness::page_model::PageModel;
use folio_harness::simulator::{PageSimulator, STANDARD_SECTIONS, STANDARD_VIEWPORT};
use pretty_assertions::assert_eq;
use tracing::{Level, info};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::DEBUG)
        .try_init();
}

/// Stock page whose first section starts below a 400px hero banner.
fn offset_page() -> PageSimulator {
    let sections: Vec<(&str, f64)> = STANDARD_SECTIONS
        .iter()
        .map(|(id, top)| (*id, top + 400.0))
        .collect();
    PageSimulator::new(
        PageController::with_defaults(),
        PageModel::standard(),
        &sections,
        STANDARD_VIEWPORT,
    )
}

fn without(missing: &'static str) -> PageSimulator {
    let layout = PageLayout {
        bindings: BindingTable::resolve(&|s: &str| s != missing),
        ..PageLayout::standard()
    };
    PageSimulator::with_layout(PageConfig::default(), layout)
}

// -- Active nav link ----------------------------------------------------

#[test]
fn crossing_each_threshold_activates_its_link() {
    init_tracing();
    let mut sim = PageSimulator::standard();
    for (i, (id, top)) in STANDARD_SECTIONS.iter().enumerate() {
        info!(%id, "crossing threshold");
        sim.scroll_to((top - 200.0).max(0.0));
        assert_eq!(sim.page().active_nav_links(), vec![i], "{id}");
        assert_eq!(sim.controller().scroll_state().current(), Some(*id));
        if i > 0 {
            sim.scroll_to(top - 201.0);
            assert_eq!(sim.page().active_nav_links(), vec![i - 1], "{id}");
        }
    }
}

#[test]
fn no_link_active_above_first_threshold() {
    init_tracing();
    let mut sim = offset_page();
    sim.scroll_to(0.0);
    assert!(sim.page().active_nav_links().is_empty());

    sim.scroll_to(10_000.0);
    assert_eq!(sim.page().active_nav_links(), vec![5]);

    sim.scroll_to(0.0);
    assert!(sim.page().active_nav_links().is_empty());
    assert_eq!(sim.controller().scroll_state().current(), None);
}

#[test]
fn unchanged_section_emits_nothing() {
    init_tracing();
    let mut sim = PageSimulator::standard();
    sim.scroll_to(1000.0);
    sim.clear_patch_log();
    sim.scroll_to(1010.0);
    sim.rescroll();
    let link_patches = sim
        .patch_log()
        .iter()
        .filter(|p| matches!(p.target(), Some(ElementRef::NavLink(_))))
        .count();
    assert_eq!(link_patches, 0);
}

// -- Reveal -------------------------------------------------------------

#[test]
fn reveal_is_monotonic() {
    init_tracing();
    let mut sim = PageSimulator::standard();
    sim.scroll_to(2000.0);
    for i in 0..4 {
        assert!(sim.page().has_class(ElementRef::Section(i), CLASS_VISIBLE), "{i}");
    }
    assert!(!sim.page().has_class(ElementRef::Section(4), CLASS_VISIBLE));

    sim.scroll_to(0.0);
    for i in 0..4 {
        assert!(sim.page().has_class(ElementRef::Section(i), CLASS_VISIBLE), "{i}");
    }
}

#[test]
fn observed_elements_reveal_staggered() {
    init_tracing();
    let mut sim = PageSimulator::standard();
    sim.intersect(vec![
        ObservedEntry {
            element: 0,
            intersecting: true,
            staggered: false,
            skill_tags: 0,
        },
        ObservedEntry {
            element: 1,
            intersecting: false,
            staggered: true,
            skill_tags: 0,
        },
        ObservedEntry {
            element: 2,
            intersecting: true,
            staggered: true,
            skill_tags: 0,
        },
    ]);
    sim.advance_ms(0);
    assert!(sim.controller().is_element_revealed(0));
    assert!(!sim.controller().is_element_revealed(2));

    sim.advance_ms(199);
    assert!(!sim.controller().is_element_revealed(2));
    sim.advance_ms(1);
    assert!(sim.controller().is_element_revealed(2));
    assert!(!sim.controller().is_element_revealed(1));
}

#[test]
fn revealed_skill_category_indexes_its_tags() {
    init_tracing();
    let mut sim = PageSimulator::standard();
    sim.intersect(vec![
        ObservedEntry {
            element: 3,
            intersecting: true,
            staggered: false,
            skill_tags: 0,
        },
        ObservedEntry {
            element: 4,
            intersecting: true,
            staggered: false,
            skill_tags: 3,
        },
    ]);
    sim.advance_ms(100);
    assert!(sim.controller().is_element_revealed(4));

    let tags: Vec<_> = sim
        .patch_log()
        .iter()
        .filter_map(|p| match p {
            DomPatch::SetStyle {
                target: ElementRef::SkillTag { element, tag },
                property: "--i",
                value,
            } => Some((*element, *tag, value.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(tags, vec![(4, 0, "0"), (4, 1, "1"), (4, 2, "2")]);
    assert!(
        !sim.patch_log()
            .iter()
            .any(|p| p.target() == Some(ElementRef::Animated(4)) && matches!(p, DomPatch::SetStyle { .. }))
    );
}

#[test]
fn dom_ready_staggers_nav_menu() {
    init_tracing();
    let mut sim = PageSimulator::standard();
    sim.dom_ready();
    for i in 0..6 {
        let expected = i.to_string();
        assert_eq!(
            sim.page().style(ElementRef::NavMenuItem(i), "--i"),
            Some(expected.as_str())
        );
    }
}

// -- Missing elements ---------------------------------------------------

#[test]
fn missing_form_only_disables_submit() {
    init_tracing();
    let mut sim = without(CONTACT_FORM_SELECTOR);
    assert!(!sim.controller().bindings().is_bound(HandlerId::SubmitContact));
    assert_eq!(sim.submit(), None);
    assert_eq!(sim.page().toast_count(), 0);

    sim.scroll_to(1000.0);
    assert_eq!(sim.page().active_nav_links(), vec![1]);
}

#[test]
fn missing_navbar_keeps_active_link() {
    init_tracing();
    let mut sim = without(".navbar");
    sim.scroll_to(1000.0);
    assert_eq!(sim.page().style(ElementRef::Navbar, "background"), None);
    assert_eq!(sim.page().active_nav_links(), vec![1]);
}

#[test]
fn missing_hamburger_ignores_clicks() {
    init_tracing();
    let mut sim = without(".hamburger");
    sim.click_hamburger();
    assert!(!sim.controller().menu_open());
    assert!(!sim.page().has_class(ElementRef::NavMenu, CLASS_ACTIVE));
}

// -- Navbar and parallax ------------------------------------------------

#[test]
fn navbar_styles_follow_scroll() {
    init_tracing();
    let mut sim = PageSimulator::standard();
    sim.scroll_to(150.0);
    assert_eq!(
        sim.page().style(ElementRef::Navbar, "background"),
        Some("rgba(255, 255, 255, 0.98)")
    );
    assert_eq!(
        sim.page().style(ElementRef::Navbar, "transform"),
        Some("translateY(0)")
    );

    sim.scroll_to(300.0);
    assert_eq!(
        sim.page().style(ElementRef::Navbar, "transform"),
        Some("translateY(-100%)")
    );

    sim.scroll_to(250.0);
    assert_eq!(
        sim.page().style(ElementRef::Navbar, "transform"),
        Some("translateY(0)")
    );

    sim.scroll_to(50.0);
    assert_eq!(
        sim.page().style(ElementRef::Navbar, "background"),
        Some("rgba(255, 255, 255, 0.95)")
    );
}

#[test]
fn hero_parallax() {
    init_tracing();
    let mut sim = PageSimulator::standard();
    sim.scroll_to(200.0);
    assert_eq!(
        sim.page().style(ElementRef::HeroContent, "transform"),
        Some("translateY(-60px)")
    );
}

// -- Menu ---------------------------------------------------------------

#[test]
fn hamburger_toggles_and_nav_link_closes() {
    init_tracing();
    let mut sim = PageSimulator::standard();
    sim.click_hamburger();
    assert!(sim.controller().menu_open());
    assert!(sim.page().has_class(ElementRef::Hamburger, CLASS_ACTIVE));
    assert!(sim.page().has_class(ElementRef::NavMenu, CLASS_ACTIVE));
    assert_eq!(sim.page().style(ElementRef::HamburgerBar(1), "opacity"), Some("0"));

    sim.click_nav_link();
    assert!(!sim.controller().menu_open());
    assert!(!sim.page().has_class(ElementRef::NavMenu, CLASS_ACTIVE));
    assert_eq!(sim.page().style(ElementRef::HamburgerBar(1), "opacity"), Some("1"));

    sim.click_hamburger();
    sim.click_hamburger();
    assert!(!sim.controller().menu_open());
}

// -- Smooth scroll ------------------------------------------------------

#[test]
fn anchor_click_eases_to_target() {
    init_tracing();
    let mut sim = PageSimulator::standard();
    sim.click_anchor("#about");
    assert!(sim.controller().is_smooth_scrolling());

    sim.advance_ms(500);
    let mid = sim.page().scroll_y();
    assert!(mid > 0.0 && mid < 820.0, "{mid}");

    sim.run_until_idle();
    assert_eq!(sim.page().scroll_y(), 820.0);
    assert!(!sim.controller().is_smooth_scrolling());
}

#[test]
fn newer_anchor_click_supersedes() {
    init_tracing();
    let mut sim = PageSimulator::standard();
    sim.click_anchor("#about");
    sim.advance_ms(100);
    sim.click_anchor("#contact");
    sim.run_until_idle();
    assert!((sim.page().scroll_y() - 4220.0).abs() < 1e-6);
}

#[test]
fn unknown_anchor_does_nothing() {
    init_tracing();
    let mut sim = PageSimulator::standard();
    sim.click_anchor("#nowhere");
    assert!(!sim.controller().is_smooth_scrolling());
    assert_eq!(sim.run_until_idle(), 0);
    assert_eq!(sim.page().scroll_y(), 0.0);
}

// -- Typing -------------------------------------------------------------

#[test]
fn hero_title_types_with_balanced_markup() {
    init_tracing();
    let mut sim = PageSimulator::standard();
    sim.load();
    sim.advance_to_ms(799);
    assert_eq!(sim.controller().typewriter().state(), TypingState::Scheduled);

    sim.advance_to_ms(800);
    assert_eq!(sim.page().html(ElementRef::HeroTitle), Some("H"));

    sim.advance_to_ms(1600);
    assert_eq!(
        sim.page().html(ElementRef::HeroTitle),
        Some(r#"Hi, I'm <span class="highlight">Al</span>"#)
    );

    sim.run_until_idle();
    let source = PageConfig::default().hero_title_html;
    assert_eq!(sim.page().html(ElementRef::HeroTitle), Some(source.as_str()));
    assert_eq!(sim.controller().typewriter().state(), TypingState::Done);
    assert!(sim.page().has_typing_cursor());
}

// -- Cursor trail -------------------------------------------------------

#[test]
fn trail_dots_grow_and_expire() {
    init_tracing();
    let mut sim = PageSimulator::standard();
    sim.mouse_move(10.0, 10.0);
    sim.mouse_move(20.0, 20.0);
    sim.mouse_move(30.0, 30.0);
    assert_eq!(sim.page().dot_count(), 1 + 2 + 3);

    let sizes: Vec<f64> = sim.page().dots().skip(3).map(|(_, d)| d.size).collect();
    assert_eq!(sizes, vec![4.0, 6.0, 8.0]);

    sim.advance_ms(499);
    assert_eq!(sim.page().dot_count(), 6);
    sim.advance_ms(1);
    assert_eq!(sim.page().dot_count(), 0);
    assert_eq!(sim.controller().trail().live_dots(), 0);
}

#[test]
fn trail_keeps_last_ten_points() {
    init_tracing();
    let mut sim = PageSimulator::standard();
    for i in 0..12 {
        sim.mouse_move(f64::from(i), 0.0);
    }
    let points: Vec<_> = sim.controller().trail().points().collect();
    assert_eq!(points.len(), 10);
    assert_eq!(points[0], (2.0, 0.0));
}

// -- Loading overlay ----------------------------------------------------

#[test]
fn overlay_fades_then_detaches() {
    init_tracing();
    let mut sim = PageSimulator::standard();
    sim.dom_ready();
    assert!(sim.page().overlay_attached());

    sim.advance_to_ms(300);
    sim.load();
    sim.advance_to_ms(1499);
    assert_eq!(sim.page().style(ElementRef::LoadingOverlay, "opacity"), None);
    sim.advance_to_ms(1500);
    assert_eq!(sim.page().style(ElementRef::LoadingOverlay, "opacity"), Some("0"));
    sim.advance_to_ms(2000);
    assert!(!sim.page().overlay_attached());
    assert!(!sim.controller().overlay_present());
}
