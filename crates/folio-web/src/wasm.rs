#![forbid(unsafe_code)]

//! wasm-bindgen exports.
//!
//! `PortfolioPage` resolves the binding table against the live document,
//! attaches one listener per `(target, event)` pair, and pumps the
//! controller's timers with `setTimeout`. All state lives in a shared
//! [`Host`]; listeners and timer callbacks only hold an `Rc` to it.
//!
//! ```text
//! DOM event ─▶ Dom::page_event ─▶ RunnerCore::handle_at ─▶ patches ─▶ Dom::apply
//!                                        │
//!                           next_wakeup_ms ─▶ setTimeout ─▶ pump
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::OnceLock;

use folio_core::{EventKind, HandlerId, PageEvent, Target};
use js_sys::{Array, Date};
use tracing::{Level, debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom::Dom;
use crate::log::LogBuffer;
use crate::runner_core::RunnerCore;

/// Observer options: reveal once a tenth is visible, 100px above the fold.
const OBSERVER_THRESHOLD: f64 = 0.1;
const OBSERVER_ROOT_MARGIN: &str = "0px 0px -100px 0px";

static LOGS: OnceLock<LogBuffer> = OnceLock::new();

fn console_line(line: &str) {
    web_sys::console::log_1(&JsValue::from_str(line));
}

/// Install the console subscriber once per module instance.
fn install_logging() -> LogBuffer {
    LOGS.get_or_init(|| {
        let logs = LogBuffer::with_echo(console_line);
        let _ = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(Level::DEBUG)
            .try_init();
        logs
    })
    .clone()
}

struct Host {
    dom: Dom,
    core: RunnerCore,
    /// Host time of the earliest pending `setTimeout`.
    wake_at: Option<f64>,
}

type Shared = Rc<RefCell<Host>>;

impl Host {
    fn flush(&mut self) {
        for patch in self.core.take_patches() {
            if let Err(err) = self.dom.apply(&patch) {
                warn!(?err, ?patch, "patch failed");
            }
        }
    }
}

/// Deliver one event, apply its patches, and re-arm the timer.
fn deliver(shared: &Shared, event: PageEvent) {
    {
        let Ok(mut host) = shared.try_borrow_mut() else {
            warn!(event = event.kind().dom_name(), "re-entrant event dropped");
            return;
        };
        host.core.handle_at(Date::now(), event);
        host.flush();
    }
    arm_timer(shared);
}

/// Fire due timers.
fn pump(shared: &Shared, armed_for: f64) {
    {
        let Ok(mut host) = shared.try_borrow_mut() else {
            return;
        };
        if host.wake_at == Some(armed_for) {
            host.wake_at = None;
        }
        host.core.set_time_ms(Date::now());
        host.flush();
    }
    arm_timer(shared);
}

/// Schedule a `setTimeout` for the next controller deadline unless an
/// earlier one is already pending.
fn arm_timer(shared: &Shared) {
    let now = Date::now();
    let (window, delay, at) = {
        let Ok(mut host) = shared.try_borrow_mut() else {
            return;
        };
        let Some(delay) = host.core.next_wakeup_ms(now) else {
            return;
        };
        let at = now + delay;
        if host.wake_at.is_some_and(|pending| pending <= at) {
            return;
        }
        host.wake_at = Some(at);
        (host.dom.window().clone(), delay, at)
    };

    let target = Rc::clone(shared);
    let callback = Closure::once_into_js(move || pump(&target, at));
    let timeout = delay.ceil().clamp(0.0, f64::from(i32::MAX)) as i32;
    if let Err(err) =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), timeout)
    {
        warn!(?err, "setTimeout failed");
        if let Ok(mut host) = shared.try_borrow_mut() {
            host.wake_at = None;
        }
    }
}

type Listener = Closure<dyn FnMut(Event)>;
type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Interactive behavior for the portfolio page.
#[wasm_bindgen]
pub struct PortfolioPage {
    host: Shared,
    listeners: Vec<Listener>,
    observer: Option<(IntersectionObserver, ObserverCallback)>,
    mounted: bool,
}

#[wasm_bindgen]
impl PortfolioPage {
    /// Create a page controller for the current document. `config_json`
    /// overrides defaults field by field.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PortfolioPage, JsValue> {
        let logs = install_logging();
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let dom = Dom::new(window, document);
        let layout = dom.layout();
        for skipped in layout.bindings.skipped() {
            debug!(handler = ?skipped.handler, "behavior disabled: elements missing");
        }
        let core = RunnerCore::new(config_json.as_deref(), layout, logs)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Self {
            host: Rc::new(RefCell::new(Host {
                dom,
                core,
                wake_at: None,
            })),
            listeners: Vec::new(),
            observer: None,
            mounted: false,
        })
    }

    /// Attach every bound listener. Safe to call more than once.
    pub fn mount(&mut self) -> Result<(), JsValue> {
        if self.mounted {
            return Ok(());
        }
        self.mounted = true;

        let (listeners, observe, ready_state) = {
            let host = self.host.borrow();
            if let Err(err) = host.dom.inject_keyframes() {
                warn!(?err, "keyframes not injected");
            }
            let bindings = host.core.controller().bindings();
            (
                bindings.listeners(),
                bindings.is_bound(HandlerId::ObserveReveal),
                host.dom.document().ready_state(),
            )
        };

        let mut ready_now = false;
        let mut loaded_now = false;
        for (target, kind) in listeners {
            match kind {
                EventKind::DomReady if ready_state != "loading" => ready_now = true,
                EventKind::Load if ready_state == "complete" => loaded_now = true,
                EventKind::Intersect => {}
                _ => {
                    if let Err(err) = self.listen(target, kind) {
                        warn!(?err, event = kind.dom_name(), "listener not attached");
                    }
                }
            }
        }
        if observe {
            if let Err(err) = self.observe() {
                warn!(?err, "intersection observer not attached");
            }
        }

        // The module usually loads after these have fired.
        if ready_now {
            let event = self.host.borrow().dom.dom_ready();
            deliver(&self.host, event);
        }
        if loaded_now {
            deliver(&self.host, PageEvent::Load);
        }
        info!(listeners = self.listeners.len(), "page mounted");
        Ok(())
    }

    /// Drain captured log lines.
    #[wasm_bindgen(js_name = takeLogs)]
    pub fn take_logs(&mut self) -> Vec<String> {
        match self.host.try_borrow_mut() {
            Ok(mut host) => host.core.take_logs(),
            Err(_) => Vec::new(),
        }
    }
}

impl PortfolioPage {
    fn listen(&mut self, target: Target, kind: EventKind) -> Result<(), JsValue> {
        let targets: Vec<EventTarget> = {
            let host = self.host.borrow();
            match target {
                Target::Window => vec![host.dom.window().clone().into()],
                Target::Document => vec![host.dom.document().clone().into()],
                Target::Selector(selector) => host
                    .dom
                    .all(selector)?
                    .into_iter()
                    .map(Into::into)
                    .collect(),
            }
        };

        let shared = Rc::clone(&self.host);
        let listener = Listener::new(move |event: Event| {
            let page_event = match shared.try_borrow() {
                Ok(host) => host.dom.page_event(target, kind, &event),
                Err(_) => None,
            };
            if let Some(page_event) = page_event {
                deliver(&shared, page_event);
            }
        });
        for el in &targets {
            el.add_event_listener_with_callback(kind.dom_name(), listener.as_ref().unchecked_ref())?;
        }
        self.listeners.push(listener);
        Ok(())
    }

    fn observe(&mut self) -> Result<(), JsValue> {
        let elements = self.host.borrow().dom.index_animated()?;

        let shared = Rc::clone(&self.host);
        let callback = ObserverCallback::new(move |entries: Array, _observer: IntersectionObserver| {
            let observed: Vec<_> = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .filter_map(|entry| Dom::observed_entry(&entry))
                .collect();
            if !observed.is_empty() {
                deliver(&shared, PageEvent::Intersect(observed));
            }
        });

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(OBSERVER_THRESHOLD));
        options.set_root_margin(OBSERVER_ROOT_MARGIN);
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        for el in &elements {
            observer.observe(el);
        }
        self.observer = Some((observer, callback));
        Ok(())
    }
}

impl Drop for PortfolioPage {
    fn drop(&mut self) {
        if let Some((observer, _)) = &self.observer {
            observer.disconnect();
        }
    }
}
