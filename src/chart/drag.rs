use std::time::{Duration, Instant};

use super::animation::{HandleAnimation, SettleAction};
use super::geometry::ChartGeometry;

/// One-shot selection that runs shortly after the chart is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoSelect {
    Off,
    Scheduled { due: Instant, index: usize },
    Running,
    Finished,
    Cancelled,
}

/// Owns the selected bar and the handle that points at it.
///
/// The handle either follows the pointer (while dragging), eases toward a
/// bar (animating), or rests where it was left.
#[derive(Debug, Clone)]
pub struct DragController {
    geometry: ChartGeometry,
    selected: Option<usize>,
    handle_x: f64,
    dragging: bool,
    animation: HandleAnimation,
    auto_select: AutoSelect,
    snap_duration: Duration,
}

impl DragController {
    pub fn new(geometry: ChartGeometry, snap_duration: Duration) -> Self {
        Self {
            geometry,
            selected: None,
            handle_x: geometry.offset,
            dragging: false,
            animation: HandleAnimation::Idle,
            auto_select: AutoSelect::Off,
            snap_duration,
        }
    }

    pub fn geometry(&self) -> &ChartGeometry {
        &self.geometry
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn handle_x(&self) -> f64 {
        self.handle_x
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_animating()
    }

    pub fn auto_select(&self) -> AutoSelect {
        self.auto_select
    }

    /// Swap in a new layout (resize or new projection)
    pub fn set_geometry(&mut self, geometry: ChartGeometry) {
        self.geometry = geometry;
        self.selected = self
            .selected
            .and_then(|i| geometry.clamp_index(i as i64));

        if self.dragging {
            self.handle_x = geometry.clamp_x(self.handle_x);
            return;
        }

        // A running animation targets stale coordinates; land it on the new layout
        if let HandleAnimation::Animating { on_settle, .. } = self.animation {
            if let SettleAction::CommitSelection(index) = on_settle {
                self.commit(index);
            }
        }

        self.handle_x = match self.selected {
            Some(index) => geometry.bar_center(index),
            None => geometry.clamp_x(self.handle_x),
        };
        // a settled animation would otherwise pull the handle back on the next tick
        self.animation = HandleAnimation::Settled { at: self.handle_x };
    }

    pub fn schedule_auto_select(&mut self, index: usize, now: Instant, delay: Duration) {
        if self.geometry.year_count == 0 {
            self.auto_select = AutoSelect::Off;
            return;
        }
        tracing::debug!("Auto-select of bar {} scheduled in {:?}", index, delay);
        self.auto_select = AutoSelect::Scheduled { due: now + delay, index };
    }

    /// Start a drag at `x`. Returns false when there is nothing to drag over.
    pub fn begin(&mut self, x: f64) -> bool {
        if self.geometry.year_count == 0 {
            return false;
        }
        self.cancel_auto_select();
        self.animation.cancel();
        self.dragging = true;
        self.drag_to(x);
        true
    }

    pub fn drag_to(&mut self, x: f64) {
        if !self.dragging {
            return;
        }
        self.handle_x = self.geometry.clamp_x(x);
        self.selected = self.geometry.index_at(x);
    }

    /// Finish a drag: select the bar under `x` and snap the handle onto it
    pub fn end(&mut self, x: f64, now: Instant) -> Option<usize> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        self.selected = self.geometry.index_at(x);

        if let Some(index) = self.selected {
            self.animation.start(
                self.handle_x,
                self.geometry.bar_center(index),
                now,
                self.snap_duration,
                SettleAction::None,
            );
        }
        self.selected
    }

    /// Select a bar directly (keyboard) and snap the handle onto it
    pub fn select(&mut self, index: i64, now: Instant) -> Option<usize> {
        let index = self.geometry.clamp_index(index)?;
        self.cancel_auto_select();
        self.dragging = false;
        self.selected = Some(index);

        let from = self.animation.sample(now).unwrap_or(self.handle_x);
        self.animation.start(
            from,
            self.geometry.bar_center(index),
            now,
            self.snap_duration,
            SettleAction::None,
        );
        Some(index)
    }

    /// Move the selection by `delta` bars, starting from the first bar if nothing is selected
    pub fn step(&mut self, delta: i64, now: Instant) -> Option<usize> {
        let target = match self.selected {
            Some(index) => index as i64 + delta,
            None => 0,
        };
        self.select(target, now)
    }

    /// Advance timers and the handle animation.
    /// Returns the index committed by a settling animation, if any.
    pub fn tick(&mut self, now: Instant) -> Option<usize> {
        if let AutoSelect::Scheduled { due, index } = self.auto_select {
            if now >= due {
                match self.geometry.clamp_index(index as i64) {
                    Some(index) => {
                        tracing::debug!("Auto-select animating to bar {}", index);
                        self.animation.start(
                            self.handle_x,
                            self.geometry.bar_center(index),
                            now,
                            self.snap_duration,
                            SettleAction::CommitSelection(index),
                        );
                        self.auto_select = AutoSelect::Running;
                    }
                    None => self.auto_select = AutoSelect::Cancelled,
                }
            }
        }

        let settled = self.animation.advance(now);
        if let Some(x) = self.animation.sample(now) {
            self.handle_x = x;
        }

        match settled {
            Some(SettleAction::CommitSelection(index)) => self.commit(index),
            _ => None,
        }
    }

    /// Drop every pending timer and animation (teardown)
    pub fn shutdown(&mut self) {
        self.cancel_auto_select();
        self.animation.cancel();
        self.dragging = false;
    }

    fn commit(&mut self, index: usize) -> Option<usize> {
        let index = self.geometry.clamp_index(index as i64)?;
        self.selected = Some(index);
        if self.auto_select == AutoSelect::Running {
            self.auto_select = AutoSelect::Finished;
        }
        tracing::debug!("Committed selection {}", index);
        Some(index)
    }

    fn cancel_auto_select(&mut self) {
        if matches!(self.auto_select, AutoSelect::Scheduled { .. } | AutoSelect::Running) {
            tracing::debug!("Auto-select cancelled");
            self.auto_select = AutoSelect::Cancelled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAP: Duration = Duration::from_millis(300);
    const DELAY: Duration = Duration::from_millis(500);

    fn controller() -> DragController {
        DragController::new(ChartGeometry::new(133.0, 43, 1.0), SNAP)
    }

    #[test]
    fn test_auto_select_commits_after_delay_and_animation() {
        let start = Instant::now();
        let mut drag = controller();
        drag.schedule_auto_select(30, start, DELAY);

        assert_eq!(drag.tick(start + Duration::from_millis(100)), None);
        assert_eq!(drag.selected(), None);

        assert_eq!(drag.tick(start + DELAY), None);
        assert_eq!(drag.auto_select(), AutoSelect::Running);
        assert_eq!(drag.selected(), None);

        assert_eq!(drag.tick(start + DELAY + SNAP), Some(30));
        assert_eq!(drag.selected(), Some(30));
        assert_eq!(drag.auto_select(), AutoSelect::Finished);
        assert_eq!(drag.handle_x(), drag.geometry().bar_center(30));
    }

    #[test]
    fn test_drag_during_auto_select_prevents_commit() {
        let start = Instant::now();
        let mut drag = controller();
        drag.schedule_auto_select(30, start, DELAY);
        drag.tick(start + DELAY);

        let x = drag.geometry().bar_center(5);
        assert!(drag.begin(x));
        assert_eq!(drag.selected(), Some(5));
        assert_eq!(drag.auto_select(), AutoSelect::Cancelled);

        assert_eq!(drag.tick(start + DELAY + SNAP * 2), None);
        assert_eq!(drag.selected(), Some(5));
    }

    #[test]
    fn test_drag_selection_is_clamped() {
        let start = Instant::now();
        let mut drag = controller();
        drag.begin(0.0);
        assert_eq!(drag.selected(), Some(0));
        assert_eq!(drag.handle_x(), drag.geometry().offset);

        drag.drag_to(500.0);
        assert_eq!(drag.selected(), Some(42));

        assert_eq!(drag.end(-20.0, start), Some(0));
        assert!(!drag.is_dragging());
        assert!(drag.is_animating());

        drag.tick(start + SNAP);
        assert_eq!(drag.handle_x(), drag.geometry().bar_center(0));
    }

    #[test]
    fn test_drag_end_snaps_to_bar_center() {
        let start = Instant::now();
        let mut drag = controller();
        let geometry = *drag.geometry();
        let x = geometry.bar_x(12) + geometry.bar_width;

        drag.begin(x);
        assert_eq!(drag.end(x, start), Some(12));
        assert_eq!(drag.tick(start + SNAP), None);
        assert_eq!(drag.handle_x(), geometry.bar_center(12));
    }

    #[test]
    fn test_step_moves_and_clamps() {
        let now = Instant::now();
        let mut drag = controller();
        assert_eq!(drag.step(1, now), Some(0));
        assert_eq!(drag.step(1, now), Some(1));
        assert_eq!(drag.step(-5, now), Some(0));
        assert_eq!(drag.select(1000, now), Some(42));
    }

    #[test]
    fn test_shutdown_cancels_pending_auto_select() {
        let start = Instant::now();
        let mut drag = controller();
        drag.schedule_auto_select(30, start, DELAY);
        drag.shutdown();

        assert_eq!(drag.tick(start + DELAY + SNAP), None);
        assert_eq!(drag.selected(), None);
        assert_eq!(drag.auto_select(), AutoSelect::Cancelled);
    }

    #[test]
    fn test_empty_chart_never_selects() {
        let start = Instant::now();
        let mut drag = DragController::new(ChartGeometry::new(100.0, 0, 1.0), SNAP);
        drag.schedule_auto_select(30, start, DELAY);
        assert_eq!(drag.auto_select(), AutoSelect::Off);
        assert!(!drag.begin(10.0));
        assert_eq!(drag.step(1, start), None);
    }

    #[test]
    fn test_resize_keeps_selection_and_resnaps() {
        let now = Instant::now();
        let mut drag = controller();
        drag.select(20, now);
        drag.tick(now + SNAP);

        let wider = ChartGeometry::new(200.0, 43, 1.0);
        drag.set_geometry(wider);
        assert_eq!(drag.selected(), Some(20));
        assert_eq!(drag.handle_x(), wider.bar_center(20));

        drag.set_geometry(ChartGeometry::new(200.0, 10, 1.0));
        assert_eq!(drag.selected(), Some(9));
    }

    #[test]
    fn test_resnapped_handle_stays_put_on_later_ticks() {
        let now = Instant::now();
        let mut drag = controller();
        drag.select(20, now);
        drag.tick(now + SNAP);

        let wider = ChartGeometry::new(200.0, 43, 1.0);
        drag.set_geometry(wider);
        drag.tick(now + SNAP + Duration::from_millis(100));
        assert_eq!(drag.handle_x(), wider.bar_center(20));
        assert!(!drag.is_animating());

        let fewer = ChartGeometry::new(200.0, 10, 1.0);
        drag.set_geometry(fewer);
        drag.tick(now + SNAP + Duration::from_millis(200));
        assert_eq!(drag.handle_x(), fewer.bar_center(9));
    }

    #[test]
    fn test_resize_during_auto_select_commits_on_new_layout() {
        let start = Instant::now();
        let mut drag = controller();
        drag.schedule_auto_select(30, start, DELAY);
        drag.tick(start + DELAY);

        let wider = ChartGeometry::new(200.0, 43, 1.0);
        drag.set_geometry(wider);
        assert_eq!(drag.selected(), Some(30));
        assert_eq!(drag.auto_select(), AutoSelect::Finished);
        assert_eq!(drag.handle_x(), wider.bar_center(30));
    }
}
