use std::time::{Duration, Instant};

/// What to do once the handle reaches its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleAction {
    None,
    CommitSelection(usize),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum HandleAnimation {
    #[default]
    Idle,
    Animating {
        from: f64,
        to: f64,
        started: Instant,
        duration: Duration,
        on_settle: SettleAction,
    },
    Settled {
        at: f64,
    },
}

impl HandleAnimation {
    pub fn start(&mut self, from: f64, to: f64, now: Instant, duration: Duration, on_settle: SettleAction) {
        *self = HandleAnimation::Animating {
            from,
            to,
            started: now,
            duration,
            on_settle,
        };
    }

    pub fn is_animating(&self) -> bool {
        matches!(self, HandleAnimation::Animating { .. })
    }

    /// Handle position at `now`, or `None` when nothing is animating or settled
    pub fn sample(&self, now: Instant) -> Option<f64> {
        match *self {
            HandleAnimation::Idle => None,
            HandleAnimation::Settled { at } => Some(at),
            HandleAnimation::Animating { from, to, started, duration, .. } => {
                let t = progress(started, duration, now);
                if t >= 1.0 {
                    Some(to)
                } else {
                    Some(from + (to - from) * ease_out_cubic(t))
                }
            }
        }
    }

    /// Move to `Settled` once the duration has passed.
    /// Returns the settle action exactly once, on that transition.
    pub fn advance(&mut self, now: Instant) -> Option<SettleAction> {
        if let HandleAnimation::Animating { to, started, duration, on_settle, .. } = *self {
            if progress(started, duration, now) >= 1.0 {
                *self = HandleAnimation::Settled { at: to };
                return Some(on_settle);
            }
        }
        None
    }

    /// Stop wherever the handle is; the pending settle action is dropped
    pub fn cancel(&mut self) {
        *self = HandleAnimation::Idle;
    }
}

fn progress(started: Instant, duration: Duration, now: Instant) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(started);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}
