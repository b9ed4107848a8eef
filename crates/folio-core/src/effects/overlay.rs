#![forbid(unsafe_code)]

//! Loading overlay: shown on DOM ready, faded and removed after load.

use std::time::Duration;

use tracing::debug;

use super::EffectTask;
use crate::config::PageConfig;
use crate::controller::Cx;
use crate::patch::{DomPatch, ElementRef};

#[derive(Debug)]
pub struct LoadingOverlay {
    present: bool,
    fading: bool,
    fade_delay: Duration,
    remove_delay: Duration,
}

impl LoadingOverlay {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            present: false,
            fading: false,
            fade_delay: config.overlay_fade_delay(),
            remove_delay: config.overlay_remove(),
        }
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.present
    }

    pub(crate) fn show(&mut self, cx: &mut Cx<'_>) {
        if self.present {
            return;
        }
        self.present = true;
        cx.emit(DomPatch::CreateLoadingOverlay);
    }

    /// Schedule the fade. Ignored if the overlay never appeared.
    pub(crate) fn page_loaded(&mut self, cx: &mut Cx<'_>) {
        if !self.present || self.fading {
            return;
        }
        self.fading = true;
        cx.after(self.fade_delay, EffectTask::FadeOverlay);
    }

    pub(crate) fn fade(&mut self, cx: &mut Cx<'_>) {
        if !self.present {
            return;
        }
        cx.emit(DomPatch::style(ElementRef::LoadingOverlay, "opacity", "0"));
        cx.after(self.remove_delay, EffectTask::RemoveOverlay);
    }

    pub(crate) fn remove(&mut self, cx: &mut Cx<'_>) {
        if !self.present {
            return;
        }
        self.present = false;
        self.fading = false;
        debug!("loading overlay removed");
        cx.emit(DomPatch::Remove {
            target: ElementRef::LoadingOverlay,
        });
    }
}
