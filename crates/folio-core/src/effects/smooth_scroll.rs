#![forbid(unsafe_code)]

//! Eased in-page anchor scrolling.

use std::time::Duration;

use tracing::trace;

use super::EffectTask;
use crate::config::PageConfig;
use crate::controller::Cx;
use crate::patch::DomPatch;

/// Quadratic ease-in-out: position at `t` of a move from `b` by `c` over `d`.
#[must_use]
pub fn ease_in_out_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if d <= 0.0 {
        return b + c;
    }
    let mut t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t + b;
    }
    t -= 1.0;
    -c / 2.0 * (t * (t - 2.0) - 1.0) + b
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    id: u64,
    started_at: Duration,
    from: f64,
    distance: f64,
}

/// One animation at a time; starting a new one supersedes the old.
#[derive(Debug)]
pub struct SmoothScroller {
    duration: Duration,
    offset: f64,
    frame: Duration,
    next_id: u64,
    active: Option<Animation>,
}

impl SmoothScroller {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            duration: config.smooth_scroll(),
            offset: config.smooth_scroll_offset,
            frame: config.frame_interval(),
            next_id: 0,
            active: None,
        }
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Scroll from `scroll_y` to just above a target at document offset
    /// `target_top`.
    pub(crate) fn start(&mut self, cx: &mut Cx<'_>, target_top: f64, scroll_y: f64) {
        let id = self.next_id;
        self.next_id += 1;
        let destination = target_top - self.offset;
        trace!(id, from = scroll_y, to = destination, "smooth scroll started");
        self.active = Some(Animation {
            id,
            started_at: cx.now(),
            from: scroll_y,
            distance: destination - scroll_y,
        });
        // First frame draws at elapsed zero, the rest every frame interval.
        self.frame(cx, id);
    }

    pub(crate) fn frame(&mut self, cx: &mut Cx<'_>, animation: u64) {
        let Some(anim) = self.active.filter(|a| a.id == animation) else {
            return;
        };
        let elapsed = cx.now().saturating_sub(anim.started_at).min(self.duration);
        let y = ease_in_out_quad(
            elapsed.as_secs_f64() * 1000.0,
            anim.from,
            anim.distance,
            self.duration.as_secs_f64() * 1000.0,
        );
        cx.emit(DomPatch::ScrollTo { y });
        if elapsed < self.duration {
            cx.after(self.frame, EffectTask::ScrollFrame { animation });
        } else {
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Task;
    use crate::timer::TimerQueue;

    #[test]
    fn ease_endpoints() {
        assert_eq!(ease_in_out_quad(0.0, 100.0, 400.0, 1000.0), 100.0);
        assert_eq!(ease_in_out_quad(500.0, 100.0, 400.0, 1000.0), 300.0);
        assert_eq!(ease_in_out_quad(1000.0, 100.0, 400.0, 1000.0), 500.0);
    }

    #[test]
    fn ease_is_monotonic_for_positive_distance() {
        let mut last = f64::MIN;
        for t in 0..=100 {
            let y = ease_in_out_quad(f64::from(t) * 10.0, 0.0, 1000.0, 1000.0);
            assert!(y >= last);
            last = y;
        }
    }

    #[test]
    fn first_frame_is_immediate() {
        let mut scroller = SmoothScroller::new(&PageConfig::default());
        let mut timers = TimerQueue::<Task>::new();
        let mut out = Vec::new();
        let mut cx = Cx::new(Duration::ZERO, &mut timers, &mut out);
        scroller.start(&mut cx, 900.0, 300.0);

        assert_eq!(out, vec![DomPatch::ScrollTo { y: 300.0 }]);
        assert_eq!(timers.next_deadline(), Some(Duration::from_millis(16)));
        assert!(scroller.is_animating());
    }

    #[test]
    fn zero_duration_jumps() {
        assert_eq!(ease_in_out_quad(0.0, 10.0, 5.0, 0.0), 15.0);
    }
}
