#![forbid(unsafe_code)]

//! The page interaction controller.
//!
//! `PageController` owns every piece of transient page state and a virtual
//! clock. Hosts feed it [`PageEvent`]s and the current time; it answers with
//! [`DomPatch`]es drained through [`PageController::take_patches`].
//!
//! # Determinism
//!
//! Same events at the same times produce the same patches. Timers fire in
//! deadline order and each runs with the clock set to its own deadline, so
//! follow-ups scheduled by a late timer keep their intended spacing no
//! matter how coarsely the host advances time.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use folio_core::{FormSnapshot, PageController, PageEvent, DomPatch};
//!
//! let mut page = PageController::with_defaults();
//! page.handle(PageEvent::Submit(FormSnapshot::new(
//!     "Jane Doe", "jane@example.com", "Hi", "Hello there",
//! )));
//! page.advance(Duration::from_millis(1500));
//!
//! let patches = page.take_patches();
//! assert!(patches.iter().any(|p| matches!(p, DomPatch::Navigate { .. })));
//! ```

use std::time::Duration;

use tracing::{trace, warn};

use crate::bindings::{BindingTable, EventKind, HandlerId};
use crate::config::{ConfigError, PageConfig};
use crate::contact::{ContactFlow, ContactTask, SubmitOutcome};
use crate::effects::{
    CursorTrail, EffectTask, LoadingOverlay, Menu, ObservedEntry, RevealObserver,
    SmoothScroller, Typewriter,
};
use crate::form::FormSnapshot;
use crate::mailto::MailtoLink;
use crate::notify::{Notification, Toaster, ToastTask};
use crate::patch::{DomPatch, ElementRef};
use crate::scroll::{ScrollDispatcher, ScrollSnapshot};
use crate::timer::{TimerId, TimerQueue};

/// Any scheduled follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Toast(ToastTask),
    Contact(ContactTask),
    Effect(EffectTask),
}

impl From<ToastTask> for Task {
    fn from(task: ToastTask) -> Self {
        Task::Toast(task)
    }
}

impl From<ContactTask> for Task {
    fn from(task: ContactTask) -> Self {
        Task::Contact(task)
    }
}

impl From<EffectTask> for Task {
    fn from(task: EffectTask) -> Self {
        Task::Effect(task)
    }
}

/// Per-call context handed to components: the clock, the timer queue and
/// the patch output.
pub(crate) struct Cx<'a> {
    now: Duration,
    timers: &'a mut TimerQueue<Task>,
    out: &'a mut Vec<DomPatch>,
}

impl<'a> Cx<'a> {
    pub(crate) fn new(
        now: Duration,
        timers: &'a mut TimerQueue<Task>,
        out: &'a mut Vec<DomPatch>,
    ) -> Self {
        Self { now, timers, out }
    }

    pub(crate) fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn emit(&mut self, patch: DomPatch) {
        self.out.push(patch);
    }

    pub(crate) fn after(&mut self, delay: Duration, task: impl Into<Task>) -> TimerId {
        self.timers.schedule(self.now + delay, task.into())
    }

    pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }
}

/// Input from the host, already measured.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Click on an in-page anchor. `target_top` is the target's document
    /// offset, `None` when the fragment resolves to nothing.
    AnchorClick {
        href: String,
        target_top: Option<f64>,
        scroll_y: f64,
    },
    HamburgerClick,
    NavLinkClick,
    Submit(FormSnapshot),
    Scroll(ScrollSnapshot),
    MouseMove { x: f64, y: f64 },
    DomReady {
        nav_menu_items: usize,
        scroll: ScrollSnapshot,
    },
    Load,
    Intersect(Vec<ObservedEntry>),
}

impl PageEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            PageEvent::AnchorClick { .. } | PageEvent::HamburgerClick | PageEvent::NavLinkClick => {
                EventKind::Click
            }
            PageEvent::Submit(_) => EventKind::Submit,
            PageEvent::Scroll(_) => EventKind::Scroll,
            PageEvent::MouseMove { .. } => EventKind::MouseMove,
            PageEvent::DomReady { .. } => EventKind::DomReady,
            PageEvent::Load => EventKind::Load,
            PageEvent::Intersect(_) => EventKind::Intersect,
        }
    }
}

/// Static facts about the document, gathered once by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLayout {
    /// `href` of each `.nav-link`, document order.
    pub nav_hrefs: Vec<String>,
    pub bindings: BindingTable,
}

impl PageLayout {
    /// The stock page: every binding attached and the standard nav links.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            nav_hrefs: ["#home", "#about", "#skills", "#projects", "#experience", "#contact"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            bindings: BindingTable::all(),
        }
    }
}

pub struct PageController {
    bindings: BindingTable,
    now: Duration,
    timers: TimerQueue<Task>,
    out: Vec<DomPatch>,
    toaster: Toaster,
    contact: ContactFlow,
    scroll: ScrollDispatcher,
    menu: Menu,
    smooth: SmoothScroller,
    typewriter: Typewriter,
    trail: CursorTrail,
    overlay: LoadingOverlay,
    reveal: RevealObserver,
}

impl PageController {
    /// Build a controller at time zero. `config` is trusted; use
    /// [`PageController::from_json`] for untrusted input.
    pub fn new(config: PageConfig, layout: PageLayout) -> Self {
        Self {
            bindings: layout.bindings,
            now: Duration::ZERO,
            timers: TimerQueue::new(),
            out: Vec::new(),
            toaster: Toaster::new(&config),
            contact: ContactFlow::new(&config),
            scroll: ScrollDispatcher::new(&config, layout.nav_hrefs),
            menu: Menu::default(),
            smooth: SmoothScroller::new(&config),
            typewriter: Typewriter::new(&config),
            trail: CursorTrail::new(&config),
            overlay: LoadingOverlay::new(&config),
            reveal: RevealObserver::new(&config),
        }
    }

    /// Defaults for both config and layout.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(PageConfig::default(), PageLayout::standard())
    }

    pub fn from_json(json: &str, layout: PageLayout) -> Result<Self, ConfigError> {
        Ok(Self::new(PageConfig::from_json(json)?, layout))
    }

    // -- Clock ----------------------------------------------------------

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Earliest pending timer deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Advance the clock by `dt`, firing due timers.
    pub fn advance(&mut self, dt: Duration) {
        self.advance_to(self.now + dt);
    }

    /// Move the clock to `target`, firing every timer due on the way.
    /// Moving backwards is ignored.
    pub fn advance_to(&mut self, target: Duration) {
        if target < self.now {
            warn!(now = ?self.now, ?target, "clock moved backwards; ignored");
            return;
        }
        while let Some(deadline) = self.timers.next_deadline().filter(|d| *d <= target) {
            self.now = self.now.max(deadline);
            let Some((_, task)) = self.timers.pop_due(self.now) else {
                break;
            };
            self.run_task(task);
        }
        self.now = target;
    }

    /// Abort a pending contact send, restoring the submit button.
    pub fn cancel_pending_send(&mut self) -> bool {
        let mut cx = Cx::new(self.now, &mut self.timers, &mut self.out);
        self.contact.cancel(&mut cx)
    }

    // -- Output ---------------------------------------------------------

    /// Drain accumulated patches, in emission order.
    pub fn take_patches(&mut self) -> Vec<DomPatch> {
        std::mem::take(&mut self.out)
    }

    // -- State queries --------------------------------------------------

    #[must_use]
    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.toaster.live()
    }

    #[must_use]
    pub fn scroll_state(&self) -> &ScrollDispatcher {
        &self.scroll
    }

    #[must_use]
    pub fn menu_open(&self) -> bool {
        self.menu.is_open()
    }

    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.contact.is_sending()
    }

    #[must_use]
    pub fn last_mailto(&self) -> Option<&MailtoLink> {
        self.contact.last_link()
    }

    #[must_use]
    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    #[must_use]
    pub fn trail(&self) -> &CursorTrail {
        &self.trail
    }

    #[must_use]
    pub fn overlay_present(&self) -> bool {
        self.overlay.is_present()
    }

    #[must_use]
    pub fn is_smooth_scrolling(&self) -> bool {
        self.smooth.is_animating()
    }

    #[must_use]
    pub fn is_element_revealed(&self, element: usize) -> bool {
        self.reveal.is_revealed(element)
    }

    // -- Events ---------------------------------------------------------

    /// Run every bound handler for `event`, in binding order. Handlers whose
    /// elements were missing at resolve time are skipped.
    pub fn handle(&mut self, event: PageEvent) {
        let handlers: Vec<HandlerId> = self.bindings.handlers_for(event.kind()).collect();
        if handlers.is_empty() {
            trace!(event = event.kind().dom_name(), "no handlers bound");
        }
        for handler in handlers {
            self.dispatch(handler, &event);
        }
    }

    /// Invoke one handler directly, bypassing the binding table. Returns the
    /// submit outcome for [`HandlerId::SubmitContact`].
    pub fn dispatch(&mut self, handler: HandlerId, event: &PageEvent) -> Option<SubmitOutcome> {
        let mut cx = Cx::new(self.now, &mut self.timers, &mut self.out);
        match (handler, event) {
            (
                HandlerId::SmoothScroll,
                PageEvent::AnchorClick {
                    target_top,
                    scroll_y,
                    href,
                },
            ) => match target_top {
                Some(top) => self.smooth.start(&mut cx, *top, *scroll_y),
                None => trace!(%href, "anchor target missing"),
            },
            (HandlerId::ToggleMenu, PageEvent::HamburgerClick) => self.menu.toggle(&mut cx),
            (HandlerId::CloseMenu, PageEvent::NavLinkClick) => self.menu.close(&mut cx),
            (HandlerId::SubmitContact, PageEvent::Submit(form)) => {
                return Some(self.contact.submit(&mut cx, &mut self.toaster, form.clone()));
            }
            (HandlerId::NavbarScroll, PageEvent::Scroll(snap)) => {
                self.scroll.update_navbar(&mut cx, snap);
            }
            (HandlerId::ActiveLink, PageEvent::Scroll(snap)) => {
                self.scroll.update_active_link(&mut cx, snap);
            }
            (HandlerId::RevealSections, PageEvent::Scroll(snap))
            | (HandlerId::RevealSections, PageEvent::DomReady { scroll: snap, .. }) => {
                self.scroll.reveal_sections(&mut cx, snap);
            }
            (HandlerId::Parallax, PageEvent::Scroll(snap)) => self.scroll.parallax(&mut cx, snap),
            (HandlerId::ObserveReveal, PageEvent::Intersect(entries)) => {
                self.reveal.observe(&mut cx, entries);
            }
            (HandlerId::StaggerNavMenu, PageEvent::DomReady { nav_menu_items, .. }) => {
                for i in 0..*nav_menu_items {
                    cx.emit(DomPatch::style(
                        ElementRef::NavMenuItem(i),
                        "--i",
                        i.to_string(),
                    ));
                }
            }
            (HandlerId::CursorTrail, PageEvent::MouseMove { x, y }) => {
                self.trail.moved(&mut cx, *x, *y);
            }
            (HandlerId::ShowLoadingOverlay, PageEvent::DomReady { .. }) => self.overlay.show(&mut cx),
            (HandlerId::HideLoadingOverlay, PageEvent::Load) => self.overlay.page_loaded(&mut cx),
            (HandlerId::TypeHeroTitle, PageEvent::Load) => self.typewriter.page_loaded(&mut cx),
            (handler, event) => {
                trace!(?handler, event = event.kind().dom_name(), "handler ignores event");
            }
        }
        None
    }

    fn run_task(&mut self, task: Task) {
        let mut cx = Cx::new(self.now, &mut self.timers, &mut self.out);
        match task {
            Task::Toast(step) => self.toaster.run(&mut cx, step),
            Task::Contact(step) => self.contact.run(&mut cx, &mut self.toaster, step),
            Task::Effect(step) => match step {
                EffectTask::ScrollFrame { animation } => self.smooth.frame(&mut cx, animation),
                EffectTask::Reveal {
                    element,
                    stagger,
                    skill_tags,
                } => {
                    self.reveal.reveal(&mut cx, element, stagger, skill_tags);
                }
                EffectTask::StartTyping => self.typewriter.start(&mut cx),
                EffectTask::TypeNext => self.typewriter.step(&mut cx),
                EffectTask::RemoveTrailDot(id) => self.trail.remove(&mut cx, id),
                EffectTask::FadeOverlay => self.overlay.fade(&mut cx),
                EffectTask::RemoveOverlay => self.overlay.remove(&mut cx),
            },
        }
    }
}

impl Default for PageController {
    fn default() -> Self {
        Self::with_defaults()
    }
}
