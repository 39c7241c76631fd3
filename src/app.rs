use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use std::time::Instant;

use crate::chart::{AutoSelect, ChartGeometry, DragController};
use crate::config::AppConfig;
use crate::model::{format_dollars, project_years, ChartInputs, YearProjection, MAX_AGE};
use crate::slider::Slider;
use crate::ui::ScreenLayout;

/// Blank columns kept on each side of the bar row
pub const CHART_MARGIN: f64 = 1.0;

/// Status messages clear after this many seconds
const STATUS_SECONDS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Chart,
    Slider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

pub struct App {
    pub focus: Focus,
    pub popup: Popup,

    pub config: AppConfig,

    // Projection (regenerated whenever the inputs change)
    pub inputs: ChartInputs,
    pub years: Vec<YearProjection>,

    // Selection + drag handle
    pub drag: DragController,

    // Weekly slider, independent of the chart
    pub slider: Slider,
    slider_dragging: bool,

    // Last computed screen layout, used to map mouse positions
    pub layout: ScreenLayout,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,
}

impl App {
    pub fn new(config: AppConfig, now: Instant) -> Self {
        let inputs = config.chart_inputs().sanitized();
        let years = project_years(&inputs);
        let geometry = ChartGeometry::new(0.0, years.len(), CHART_MARGIN);

        let mut drag = DragController::new(geometry, config.snap_duration());
        drag.schedule_auto_select(config.auto_select_index, now, config.auto_select_delay());

        tracing::info!(
            "Projecting {} years from age {} at {:.2}%",
            years.len(),
            inputs.current_age,
            inputs.rate * 100.0
        );

        Self {
            focus: Focus::Chart,
            popup: Popup::None,
            slider: Slider::new(config.slider_default),
            slider_dragging: false,
            config,
            inputs,
            years,
            drag,
            layout: ScreenLayout::default(),
            status_message: None,
            status_message_time: None,
        }
    }

    /// Set a status message (auto-clears after a few seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn selected_year(&self) -> Option<&YearProjection> {
        self.drag.selected().and_then(|i| self.years.get(i))
    }

    /// Recompute geometry for a new screen layout
    pub fn on_resize(&mut self, layout: ScreenLayout) {
        self.layout = layout;
        let geometry = ChartGeometry::new(
            f64::from(layout.chart.width),
            self.years.len(),
            CHART_MARGIN,
        );
        if geometry != *self.drag.geometry() {
            tracing::debug!("Chart width now {} columns", layout.chart.width);
            self.drag.set_geometry(geometry);
        }
    }

    /// Replace the projection inputs and regenerate every bar
    pub fn set_inputs(&mut self, inputs: ChartInputs) {
        self.inputs = inputs.sanitized();
        self.years = project_years(&self.inputs);
        let geometry = ChartGeometry::new(
            f64::from(self.layout.chart.width),
            self.years.len(),
            CHART_MARGIN,
        );
        self.drag.set_geometry(geometry);
        tracing::info!(
            "Reprojected {} years from age {}",
            self.years.len(),
            self.inputs.current_age
        );
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Result<()> {
        if self.popup != Popup::None {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char('q')
            ) {
                self.popup = Popup::None;
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Chart => Focus::Slider,
                    Focus::Slider => Focus::Chart,
                };
            }

            KeyCode::Left | KeyCode::Char('h') => self.nudge(-1, now),
            KeyCode::Right | KeyCode::Char('l') => self.nudge(1, now),

            KeyCode::Home if self.focus == Focus::Chart => {
                self.drag.select(0, now);
            }
            KeyCode::End if self.focus == Focus::Chart => {
                self.drag.select(self.years.len() as i64 - 1, now);
            }

            // Shift the starting age
            KeyCode::Char('[') => self.change_age(-1)?,
            KeyCode::Char(']') => self.change_age(1)?,

            KeyCode::Char('?') => self.popup = Popup::Help,

            _ => {}
        }
        Ok(())
    }

    fn nudge(&mut self, delta: i64, now: Instant) {
        match self.focus {
            Focus::Chart => {
                self.drag.step(delta, now);
            }
            Focus::Slider if delta < 0 => self.slider.decrement(),
            Focus::Slider => self.slider.increment(),
        }
    }

    fn change_age(&mut self, delta: i64) -> Result<()> {
        let age = i64::from(self.inputs.current_age) + delta;
        if !(0..i64::from(MAX_AGE)).contains(&age) {
            self.set_status(format!("Age must stay below {}", MAX_AGE));
            return Ok(());
        }
        let age = u32::try_from(age)?;
        self.set_inputs(ChartInputs { current_age: age, ..self.inputs });
        self.set_status(format!("Starting age {}", age));
        Ok(())
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) -> Result<()> {
        if self.popup != Popup::None {
            return Ok(());
        }
        let position = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.layout.chart.contains(position) {
                    self.focus = Focus::Chart;
                    self.drag.begin(self.chart_x(mouse.column));
                } else if self.layout.slider.contains(position) {
                    self.focus = Focus::Slider;
                    self.slider_dragging = true;
                    self.slider.set_from_ratio(self.slider_ratio(mouse.column));
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.drag.is_dragging() {
                    self.drag.drag_to(self.chart_x(mouse.column));
                } else if self.slider_dragging {
                    self.slider.set_from_ratio(self.slider_ratio(mouse.column));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.drag.is_dragging() {
                    if let Some(index) = self.drag.end(self.chart_x(mouse.column), now) {
                        tracing::info!("Drag ended on bar {} (age {})", index, self.years[index].age);
                    }
                }
                self.slider_dragging = false;
            }
            _ => {}
        }
        Ok(())
    }

    /// Chart-space x for a terminal column (cell center)
    fn chart_x(&self, column: u16) -> f64 {
        f64::from(column) - f64::from(self.layout.chart.x) + 0.5
    }

    /// Slider value under a column; the gauge line runs from the second track column to the end
    fn slider_ratio(&self, column: u16) -> f64 {
        let track = self.layout.slider;
        if track.width <= 2 {
            return 0.0;
        }
        (f64::from(column) - f64::from(track.x) - 1.0) / f64::from(track.width - 2)
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some(index) = self.drag.tick(now) {
            tracing::info!("Auto-selected bar {} (age {})", index, self.years[index].age);
        }

        // Clear status message after a few seconds
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_SECONDS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Something is moving or about to; the event loop should poll at frame rate
    pub fn is_busy(&self) -> bool {
        self.drag.is_dragging()
            || self.drag.is_animating()
            || matches!(self.drag.auto_select(), AutoSelect::Scheduled { .. } | AutoSelect::Running)
    }

    /// Teardown: nothing may fire after the UI is gone
    pub fn shutdown(&mut self) {
        self.drag.shutdown();
        tracing::info!("Shutting down");
    }

    /// Summary for the info line
    pub fn info_message(&self) -> String {
        match self.selected_year() {
            Some(year) => format!(
                "Age {} │ grown {} │ contributed {}",
                year.age,
                format_dollars(year.interest_value),
                format_dollars(year.cash_contributed)
            ),
            None if self.years.is_empty() => format!("Nothing to project past age {}", MAX_AGE),
            None => "Drag the handle or use ←/→ to pick an age".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;
    use std::time::Duration;

    fn layout() -> ScreenLayout {
        ScreenLayout {
            chart: Rect::new(1, 3, 88, 14),
            slider: Rect::new(1, 19, 101, 1),
            ..Default::default()
        }
    }

    fn app() -> (App, Instant) {
        let now = Instant::now();
        let mut app = App::new(AppConfig::default(), now);
        app.on_resize(layout());
        (app, now)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn test_auto_select_lands_on_age_67() {
        let (mut app, start) = app();
        app.tick(start + Duration::from_millis(500));
        app.tick(start + Duration::from_millis(500 + 350));
        assert_eq!(app.selected_year().map(|y| y.age), Some(67));
    }

    #[test]
    fn test_mouse_drag_selects_bar_under_pointer() {
        let (mut app, now) = app();
        let geometry = *app.drag.geometry();
        let column = (geometry.bar_center(10) + f64::from(layout().chart.x)) as u16;

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), column, 5), now).unwrap();
        assert!(app.drag.is_dragging());
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 500, 5), now).unwrap();
        assert_eq!(app.drag.selected(), Some(42));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), column, 5), now).unwrap();
        assert_eq!(app.drag.selected(), Some(10));

        // the pending auto-select must not override the drag
        app.tick(now + Duration::from_secs(2));
        assert_eq!(app.drag.selected(), Some(10));
    }

    #[test]
    fn test_slider_keys_and_mouse() {
        let (mut app, now) = app();
        app.handle_key(key(KeyCode::Tab), now).unwrap();
        assert_eq!(app.focus, Focus::Slider);
        app.handle_key(key(KeyCode::Right), now).unwrap();
        assert_eq!(app.slider.value(), 51);

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 101, 19), now).unwrap();
        assert_eq!(app.slider.value(), 100);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 1, 19), now).unwrap();
        assert_eq!(app.slider.value(), 0);
        assert_eq!(app.drag.selected(), None);
    }

    #[test]
    fn test_arrow_keys_move_selection() {
        let (mut app, now) = app();
        app.handle_key(key(KeyCode::End), now).unwrap();
        assert_eq!(app.drag.selected(), Some(42));
        app.handle_key(key(KeyCode::Right), now).unwrap();
        assert_eq!(app.drag.selected(), Some(42));
        app.handle_key(key(KeyCode::Left), now).unwrap();
        assert_eq!(app.drag.selected(), Some(41));
    }

    #[test]
    fn test_handle_follows_selection_after_age_change_and_resize() {
        let (mut app, now) = app();
        app.handle_key(key(KeyCode::End), now).unwrap();
        app.tick(now + Duration::from_secs(1));

        app.handle_key(key(KeyCode::Char(']')), now + Duration::from_secs(1)).unwrap();
        app.tick(now + Duration::from_secs(2));
        assert_eq!(app.drag.selected(), Some(41));
        assert_eq!(app.drag.handle_x(), app.drag.geometry().bar_center(41));

        app.on_resize(ScreenLayout { chart: Rect::new(1, 3, 140, 14), ..layout() });
        app.tick(now + Duration::from_secs(3));
        assert_eq!(app.drag.geometry().total_width, 138.0);
        assert_eq!(app.drag.handle_x(), app.drag.geometry().bar_center(41));
    }

    #[test]
    fn test_age_change_reprojects() {
        let (mut app, now) = app();
        app.handle_key(key(KeyCode::End), now).unwrap();
        app.handle_key(key(KeyCode::Char(']')), now).unwrap();
        assert_eq!(app.years.len(), 42);
        assert_eq!(app.years[0].age, 38);
        assert_eq!(app.drag.selected(), Some(41));
    }

    #[test]
    fn test_help_popup_swallows_input() {
        let (mut app, now) = app();
        app.handle_key(key(KeyCode::Char('?')), now).unwrap();
        assert_eq!(app.popup, Popup::Help);
        app.handle_key(key(KeyCode::Right), now).unwrap();
        assert_eq!(app.drag.selected(), None);
        app.handle_key(key(KeyCode::Esc), now).unwrap();
        assert_eq!(app.popup, Popup::None);
    }

    #[test]
    fn test_busy_until_auto_select_settles() {
        let (mut app, start) = app();
        assert!(app.is_busy());
        app.tick(start + Duration::from_millis(500));
        assert!(app.is_busy());
        app.tick(start + Duration::from_millis(900));
        assert!(!app.is_busy());
    }

    #[test]
    fn test_shutdown_cancels_auto_select() {
        let (mut app, start) = app();
        app.shutdown();
        assert!(!app.is_busy());
        app.tick(start + Duration::from_secs(2));
        assert_eq!(app.drag.selected(), None);
    }
}
