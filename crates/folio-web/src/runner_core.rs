#![forbid(unsafe_code)]

//! Platform-independent runner core wrapping [`PageController`].
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and the native test harness. No JS/WASM types here: host time arrives
//! as milliseconds (`Date.now()`), patches leave as values or JSON.

use core::time::Duration;

use folio_core::{ConfigError, DomPatch, PageController, PageEvent, PageLayout};
use tracing::{debug, warn};

use crate::log::LogBuffer;

/// Host-facing runner: millisecond clock, patch and log draining.
pub struct RunnerCore {
    inner: PageController,
    /// Host timestamp that maps to controller time zero.
    origin_ms: Option<f64>,
    logs: LogBuffer,
}

impl RunnerCore {
    /// Create a runner. `config_json` overrides defaults field by field.
    pub fn new(
        config_json: Option<&str>,
        layout: PageLayout,
        logs: LogBuffer,
    ) -> Result<Self, ConfigError> {
        let inner = match config_json {
            Some(json) => PageController::from_json(json, layout)?,
            None => PageController::new(Default::default(), layout),
        };
        Ok(Self {
            inner,
            origin_ms: None,
            logs,
        })
    }

    /// Move the clock to host time `now_ms`, firing due timers. The first
    /// call fixes the origin.
    pub fn set_time_ms(&mut self, now_ms: f64) {
        let origin = *self.origin_ms.get_or_insert(now_ms);
        let elapsed = (now_ms - origin).max(0.0);
        let target = Duration::from_secs_f64(elapsed / 1000.0);
        if target < self.inner.now() {
            warn!(now_ms, "host clock went backwards");
            return;
        }
        self.inner.advance_to(target);
    }

    /// Controller time in milliseconds since the origin.
    pub fn elapsed_ms(&self) -> f64 {
        self.inner.now().as_secs_f64() * 1000.0
    }

    /// Deliver an event at host time `now_ms`.
    pub fn handle_at(&mut self, now_ms: f64, event: PageEvent) {
        self.set_time_ms(now_ms);
        debug!(event = event.kind().dom_name(), "host event");
        self.inner.handle(event);
    }

    /// Milliseconds from host time `now_ms` until the next timer is due.
    pub fn next_wakeup_ms(&self, now_ms: f64) -> Option<f64> {
        let deadline = self.inner.next_deadline()?.as_secs_f64() * 1000.0;
        let elapsed = self.origin_ms.map_or(0.0, |origin| now_ms - origin);
        Some((deadline - elapsed).max(0.0))
    }

    /// Drain patches in emission order.
    pub fn take_patches(&mut self) -> Vec<DomPatch> {
        self.inner.take_patches()
    }

    /// Drain patches as a JSON array.
    pub fn take_patches_json(&mut self) -> serde_json::Result<String> {
        serde_json::to_string(&self.inner.take_patches())
    }

    /// Drain captured log lines.
    pub fn take_logs(&mut self) -> Vec<String> {
        self.logs.drain()
    }

    pub fn controller(&self) -> &PageController {
        &self.inner
    }

    pub fn controller_mut(&mut self) -> &mut PageController {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{FormSnapshot, ScrollSnapshot};
    use pretty_assertions::assert_eq;

    fn runner() -> RunnerCore {
        RunnerCore::new(None, PageLayout::standard(), LogBuffer::new()).unwrap()
    }

    #[test]
    fn first_timestamp_is_origin() {
        let mut core = runner();
        core.set_time_ms(1_700_000_000_000.0);
        assert_eq!(core.elapsed_ms(), 0.0);
        core.set_time_ms(1_700_000_000_250.0);
        assert_eq!(core.elapsed_ms(), 250.0);
    }

    #[test]
    fn backwards_host_clock_is_ignored() {
        let mut core = runner();
        core.set_time_ms(1000.0);
        core.set_time_ms(1500.0);
        core.set_time_ms(1200.0);
        assert_eq!(core.elapsed_ms(), 500.0);
    }

    #[test]
    fn wakeup_counts_down_to_deadline() {
        let mut core = runner();
        assert_eq!(core.next_wakeup_ms(0.0), None);
        core.handle_at(10_000.0, PageEvent::Submit(FormSnapshot::default()));
        // Toast slides in 100 ms after the submit.
        assert_eq!(core.next_wakeup_ms(10_000.0), Some(100.0));
        assert_eq!(core.next_wakeup_ms(10_060.0), Some(40.0));
        assert_eq!(core.next_wakeup_ms(10_500.0), Some(0.0));
    }

    #[test]
    fn timers_fire_on_host_time() {
        let mut core = runner();
        core.handle_at(
            0.0,
            PageEvent::Submit(FormSnapshot::new(
                "Jane Doe",
                "jane@example.com",
                "Hi",
                "Hello there",
            )),
        );
        core.take_patches();
        core.set_time_ms(1500.0);
        let patches = core.take_patches();
        assert!(
            patches
                .iter()
                .any(|p| matches!(p, DomPatch::Navigate { url } if url.starts_with("mailto:")))
        );
    }

    #[test]
    fn patches_drain_as_json() {
        let mut core = runner();
        core.handle_at(0.0, PageEvent::Scroll(ScrollSnapshot::at(0.0, 900.0, &[("home", 0.0)])));
        let json = core.take_patches_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let ops: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p["op"].as_str())
            .collect();
        assert!(ops.contains(&"add_class"));
        assert_eq!(core.take_patches_json().unwrap(), "[]");
    }

    #[test]
    fn bad_config_is_rejected() {
        let err = RunnerCore::new(
            Some(r#"{"recipient": "nobody"}"#),
            PageLayout::standard(),
            LogBuffer::new(),
        );
        assert!(matches!(err, Err(ConfigError::Recipient(_))));
    }

    #[test]
    fn config_overrides_apply() {
        let mut core = RunnerCore::new(
            Some(r#"{"toast_enter_ms": 250}"#),
            PageLayout::standard(),
            LogBuffer::new(),
        )
        .unwrap();
        core.handle_at(0.0, PageEvent::Submit(FormSnapshot::default()));
        assert_eq!(core.next_wakeup_ms(0.0), Some(250.0));
    }

    #[test]
    fn logs_drain_once() {
        let logs = LogBuffer::new();
        let mut core = RunnerCore::new(None, PageLayout::standard(), logs.clone()).unwrap();
        logs.push("mounted");
        assert_eq!(core.take_logs(), vec!["mounted"]);
        assert!(core.take_logs().is_empty());
    }
}
