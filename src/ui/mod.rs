mod components;

use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus, Popup};
use crate::chart::{build_scene, ValueScale};
use crate::theme::Theme;

use components::HEADROOM;

// Load theme colors from system (Omarchy/Hyprland) once at startup
static THEME: OnceLock<Theme> = OnceLock::new();

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::load)
}

fn accent() -> Color { theme().accent }
fn inactive() -> Color { theme().inactive }
fn warning() -> Color { theme().warning }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }

/// Where each part of the screen goes. Recomputed on every resize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub info: Rect,
    pub readout: Rect,
    /// Chart box including its border
    pub chart_box: Rect,
    /// Bar drawing area (inside the border, above the axis row)
    pub chart: Rect,
    pub axis: Rect,
    pub slider_box: Rect,
    pub slider_label: Rect,
    /// Slider track (inside the border, right of the label)
    pub slider: Rect,
    pub footer: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Info line
                Constraint::Length(1), // Value readout
                Constraint::Min(6),    // Chart box
                Constraint::Length(3), // Slider box
                Constraint::Length(1), // Footer
            ])
            .split(area);

        let chart_box = chunks[2];
        let chart_inner = Block::default().borders(Borders::ALL).inner(chart_box);
        let chart_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(chart_inner);

        let slider_box = chunks[3];
        let slider_inner = Block::default().borders(Borders::ALL).inner(slider_box);
        let slider_row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(components::SLIDER_LABEL_WIDTH), Constraint::Min(1)])
            .split(slider_inner);

        Self {
            info: chunks[0],
            readout: chunks[1],
            chart_box,
            chart: chart_rows[0],
            axis: chart_rows[1],
            slider_box,
            slider_label: slider_row[0],
            slider: slider_row[1],
            footer: chunks[4],
        }
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let layout = app.layout;

    draw_info_line(f, app, layout.info);
    draw_chart(f, app, &layout);
    components::draw_slider(f, &app.slider, app.focus == Focus::Slider, theme(), &layout);
    draw_footer(f, layout.footer);

    if app.popup == Popup::Help {
        draw_help_popup(f);
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    // Status message wins over the selection summary
    let line = match app.status_message {
        Some(ref status) => Line::from(Span::styled(status, Style::default().fg(warning()))),
        None => Line::from(Span::styled(app.info_message(), Style::default().fg(text_dim()))),
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn draw_chart(f: &mut Frame, app: &App, layout: &ScreenLayout) {
    let is_active = app.focus == Focus::Chart;
    let border_color = if is_active { accent() } else { inactive() };
    let title_style = if is_active {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(inactive())
    };

    let title = format!(
        " Ages {}–{} at {:.1}% ",
        app.inputs.current_age,
        crate::model::MAX_AGE.saturating_sub(1).max(app.inputs.current_age),
        app.inputs.rate * 100.0
    );
    let block = Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme().bg));
    f.render_widget(block, layout.chart_box);

    let scale = ValueScale {
        domain_min: app.inputs.initial_principal,
        domain_max: app.config.value_ceiling,
        max_height: (f64::from(layout.chart.height) - HEADROOM).max(0.0),
    };
    let scene = build_scene(
        &app.years,
        app.drag.geometry(),
        scale,
        app.drag.selected(),
        app.drag.handle_x(),
    );

    let readout = Paragraph::new(Line::from(Span::styled(
        scene.readout.clone().unwrap_or_default(),
        Style::default().fg(text()).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(readout, layout.readout);

    components::draw_bars(f, &scene, theme(), layout.chart);
    components::draw_axis(f, &scene.labels, theme(), layout.axis);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let hint = |key: &'static str, what: &'static str| {
        vec![
            Span::styled(key, Style::default().fg(accent())),
            Span::styled(what, Style::default().fg(text_dim())),
        ]
    };

    let spans: Vec<Span> = [
        hint("drag/←→", " select  "),
        hint("Tab", " focus  "),
        hint("[ ]", " age  "),
        hint("?", " help  "),
        hint("q", " quit"),
    ]
    .into_iter()
    .flatten()
    .collect();

    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 95 } else { 60 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().fg(warning()).add_modifier(Modifier::BOLD)))
    };
    let binding = |key: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", key), Style::default().fg(accent())),
            Span::raw(what),
        ])
    };

    let help_text = vec![
        section("═══ Chart ═══"),
        binding("Mouse drag", "Move the handle; release snaps to the nearest bar"),
        binding("←/→ h/l", "Previous / next age"),
        binding("Home/End", "First / last age"),
        binding("[ / ]", "Start one year earlier / later"),
        Line::from(""),
        section("═══ Slider ═══"),
        binding("Tab", "Switch focus between chart and slider"),
        binding("←/→", "Adjust weekly amount (slider focused)"),
        binding("Click/drag", "Set weekly amount"),
        Line::from(""),
        section("═══ General ═══"),
        binding("?", "Toggle this help"),
        binding("q / Ctrl-C", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Config: ", Style::default().fg(text_dim())),
            Span::styled("~/.config/agebars/config.toml", Style::default().fg(text())),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("?", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" agebars Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_splits_screen() {
        let layout = ScreenLayout::new(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.info, Rect::new(0, 0, 100, 1));
        assert_eq!(layout.readout, Rect::new(0, 1, 100, 1));
        assert_eq!(layout.chart_box, Rect::new(0, 2, 100, 24));
        assert_eq!(layout.chart, Rect::new(1, 3, 98, 21));
        assert_eq!(layout.axis, Rect::new(1, 24, 98, 1));
        assert_eq!(layout.slider_label, Rect::new(1, 27, 12, 1));
        assert_eq!(layout.slider, Rect::new(13, 27, 86, 1));
        assert_eq!(layout.footer, Rect::new(0, 29, 100, 1));
    }
}
