#![forbid(unsafe_code)]

//! Toast notifications.
//!
//! Every toast runs the same fixed timeline from its creation time `t`:
//!
//! ```text
//! t            t+enter        t+visible        t+visible+exit
//! |--created--->|---shown------>|---leaving------>| removed
//!  off-screen    slide in         slide out
//! ```
//!
//! Toasts are independent: there is no queue, no deduplication, and all of
//! them share the top-right anchor, so concurrent toasts overlap.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::PageConfig;
use crate::controller::Cx;
use crate::patch::{DomPatch, ElementRef};

const OFFSCREEN: &str = "translateX(100%)";
const ONSCREEN: &str = "translateX(0)";

/// Identity of a toast, unique per controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NotificationId(u64);

impl NotificationId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    /// Class list of the toast element.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Severity::Success => "notification notification-success",
            Severity::Error => "notification notification-error",
        }
    }

    /// Font Awesome icon class.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Severity::Success => "fa-check-circle",
            Severity::Error => "fa-exclamation-circle",
        }
    }

    /// Background of the toast.
    #[must_use]
    pub const fn background(self) -> &'static str {
        match self {
            Severity::Success => "linear-gradient(45deg, #10b981, #059669)",
            Severity::Error => "linear-gradient(45deg, #ef4444, #dc2626)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Entering,
    Shown,
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub created_at: Duration,
    pub phase: ToastPhase,
}

/// Timeline steps scheduled per toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastTask {
    Enter(NotificationId),
    Exit(NotificationId),
    Remove(NotificationId),
}

/// Owner of all live toasts.
#[derive(Debug)]
pub struct Toaster {
    next_id: u64,
    live: BTreeMap<NotificationId, Notification>,
    enter: Duration,
    visible: Duration,
    exit: Duration,
}

impl Toaster {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            next_id: 0,
            live: BTreeMap::new(),
            enter: config.toast_enter(),
            visible: config.toast_visible(),
            exit: config.toast_exit(),
        }
    }

    /// Toasts currently in the document, oldest first.
    pub fn live(&self) -> impl Iterator<Item = &Notification> {
        self.live.values()
    }

    #[must_use]
    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.live.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub(crate) fn raise(
        &mut self,
        cx: &mut Cx<'_>,
        message: &str,
        severity: Severity,
    ) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        debug!(id = id.0, ?severity, message, "notification raised");

        self.live.insert(
            id,
            Notification {
                id,
                message: message.to_owned(),
                severity,
                created_at: cx.now(),
                phase: ToastPhase::Entering,
            },
        );
        cx.emit(DomPatch::CreateToast {
            id,
            message: message.to_owned(),
            severity,
        });
        cx.emit(DomPatch::style(ElementRef::Toast(id), "transform", OFFSCREEN));
        cx.after(self.enter, ToastTask::Enter(id));
        cx.after(self.visible, ToastTask::Exit(id));
        id
    }

    pub(crate) fn run(&mut self, cx: &mut Cx<'_>, task: ToastTask) {
        match task {
            ToastTask::Enter(id) => {
                // Never slide a leaving toast back in.
                if let Some(toast) = self
                    .live
                    .get_mut(&id)
                    .filter(|t| t.phase == ToastPhase::Entering)
                {
                    toast.phase = ToastPhase::Shown;
                    cx.emit(DomPatch::style(ElementRef::Toast(id), "transform", ONSCREEN));
                }
            }
            ToastTask::Exit(id) => {
                if let Some(toast) = self.live.get_mut(&id) {
                    toast.phase = ToastPhase::Leaving;
                    cx.emit(DomPatch::style(ElementRef::Toast(id), "transform", OFFSCREEN));
                    cx.after(self.exit, ToastTask::Remove(id));
                }
            }
            ToastTask::Remove(id) => {
                if self.live.remove(&id).is_some() {
                    cx.emit(DomPatch::Remove {
                        target: ElementRef::Toast(id),
                    });
                } else {
                    trace!(id = id.0, "toast already removed");
                }
            }
        }
    }
}
