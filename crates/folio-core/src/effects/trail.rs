#![forbid(unsafe_code)]

//! Cursor trail.
//!
//! Keeps the last `capacity` pointer positions. Every move spawns one dot
//! per remembered point, older points smaller and fainter, each removed
//! after a fixed lifetime.

use std::collections::{BTreeSet, VecDeque};
use std::time::Duration;

use super::EffectTask;
use crate::config::PageConfig;
use crate::controller::Cx;
use crate::patch::{DomPatch, ElementRef};

#[derive(Debug)]
pub struct CursorTrail {
    points: VecDeque<(f64, f64)>,
    capacity: usize,
    lifetime: Duration,
    next_dot: u64,
    live: BTreeSet<u64>,
}

impl CursorTrail {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            points: VecDeque::with_capacity(config.trail_length),
            capacity: config.trail_length,
            lifetime: config.trail_lifetime(),
            next_dot: 0,
            live: BTreeSet::new(),
        }
    }

    /// Remembered positions, oldest first.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().copied()
    }

    /// Dots currently in the document.
    #[must_use]
    pub fn live_dots(&self) -> usize {
        self.live.len()
    }

    pub(crate) fn moved(&mut self, cx: &mut Cx<'_>, x: f64, y: f64) {
        self.points.push_back((x, y));
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }

        for (i, &(px, py)) in self.points.iter().enumerate() {
            let i = i as f64;
            let id = self.next_dot;
            self.next_dot += 1;
            self.live.insert(id);
            cx.emit(DomPatch::CreateTrailDot {
                id,
                left: px - (2.0 + i),
                top: py - (2.0 + i),
                size: 4.0 + i * 2.0,
                opacity: 0.1 + i * 0.1,
            });
            cx.after(self.lifetime, EffectTask::RemoveTrailDot(id));
        }
    }

    pub(crate) fn remove(&mut self, cx: &mut Cx<'_>, id: u64) {
        if self.live.remove(&id) {
            cx.emit(DomPatch::Remove {
                target: ElementRef::TrailDot(id),
            });
        }
    }
}
