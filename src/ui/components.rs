//! Chart and slider widgets

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Context, Line as Segment},
        Block, Borders, LineGauge, Paragraph,
    },
    Frame,
};

use crate::chart::scene::{AxisLabel, BarShape, Scene};
use crate::slider::Slider;
use crate::theme::Theme;

use super::ScreenLayout;

/// Columns left of the slider track for the `$NN/Weeks` label
pub const SLIDER_LABEL_WIDTH: u16 = 12;

/// Horizontal braille resolution: two dots per column
const DOT: f64 = 0.5;

/// Rows reserved above the tallest bar for the handle ring
pub const HEADROOM: f64 = 1.0;

/// Bars, cash overlay and the drag handle on a braille canvas
pub fn draw_bars(f: &mut Frame, scene: &Scene, theme: &Theme, area: Rect) {
    let width = f64::from(area.width);
    let height = f64::from(area.height);
    let handle_top = (height - HEADROOM).max(0.0);

    let canvas = Canvas::default()
        .background_color(theme.bg)
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for bar in &scene.bars {
                let color = if bar.selected { theme.bar_selected } else { theme.bar };
                fill_columns(ctx, bar, bar.total_height, color);
            }
            ctx.layer();
            for bar in &scene.bars {
                fill_columns(ctx, bar, bar.cash_height, theme.bar_cash);
            }
            ctx.layer();

            ctx.draw(&Segment::new(scene.handle_x, 0.0, scene.handle_x, handle_top, theme.handle));
            ctx.print(
                scene.handle_x,
                height,
                Span::styled("○", Style::default().fg(theme.handle).add_modifier(Modifier::BOLD)),
            );
        });

    f.render_widget(canvas, area);
}

/// Vertical strokes every braille dot across the bar's width
fn fill_columns(ctx: &mut Context, bar: &BarShape, height: f64, color: Color) {
    if height <= 0.0 {
        return;
    }
    let strokes = (bar.width / DOT).floor().max(1.0) as usize;
    let step = bar.width / strokes as f64;
    for s in 0..strokes {
        let x = bar.x + step * (s as f64 + 0.5);
        ctx.draw(&Segment::new(x, 0.0, x, height, color));
    }
}

/// A label placed on the axis row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLabel {
    pub column: u16,
    pub text: String,
    pub emphasized: bool,
}

/// Lay out age labels on a single row of `width` columns.
///
/// Emphasized labels are placed first; others are dropped when they would overlap.
pub fn place_labels(labels: &[AxisLabel], width: u16) -> Vec<PlacedLabel> {
    let mut taken = vec![false; usize::from(width)];
    let mut placed = Vec::new();

    let ordered = labels
        .iter()
        .filter(|l| l.emphasized)
        .chain(labels.iter().filter(|l| !l.emphasized));

    for label in ordered {
        let text = label.age.to_string();
        let len = text.len();
        if len > taken.len() {
            continue;
        }
        let start = (label.x - len as f64 / 2.0).round().max(0.0) as usize;
        let start = start.min(taken.len() - len);

        // keep a blank column between neighbours
        let lo = start.saturating_sub(1);
        let hi = (start + len + 1).min(taken.len());
        if taken[lo..hi].iter().any(|t| *t) {
            continue;
        }
        taken[start..start + len].iter_mut().for_each(|t| *t = true);

        placed.push(PlacedLabel {
            column: start as u16,
            text,
            emphasized: label.emphasized,
        });
    }

    placed.sort_by_key(|p| p.column);
    placed
}

pub fn draw_axis(f: &mut Frame, labels: &[AxisLabel], theme: &Theme, area: Rect) {
    let mut spans = Vec::new();
    let mut cursor = 0u16;

    for label in place_labels(labels, area.width) {
        if label.column > cursor {
            spans.push(Span::raw(" ".repeat(usize::from(label.column - cursor))));
        }
        cursor = label.column + label.text.len() as u16;
        let style = if label.emphasized {
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme.text_dim)
        };
        spans.push(Span::styled(label.text, style));
    }

    let axis = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg));
    f.render_widget(axis, area);
}

pub fn draw_slider(f: &mut Frame, slider: &Slider, focused: bool, theme: &Theme, layout: &ScreenLayout) {
    let border_color = if focused { theme.accent } else { theme.inactive };
    let title_style = if focused {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.inactive)
    };

    let block = Block::default()
        .title(Span::styled(" Weekly ", title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    f.render_widget(block, layout.slider_box);

    let label = Paragraph::new(Span::styled(
        slider.label(),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Right);
    f.render_widget(label, layout.slider_label);

    // The gauge line starts one column into the track
    let gauge = LineGauge::default()
        .filled_style(Style::default().fg(theme.accent))
        .unfilled_style(Style::default().fg(theme.inactive))
        .label("")
        .ratio(slider.ratio());

    f.render_widget(gauge, layout.slider);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(x: f64, age: u32, emphasized: bool) -> AxisLabel {
        AxisLabel { x, age, emphasized }
    }

    #[test]
    fn test_place_labels_centers_text() {
        let placed = place_labels(&[label(10.0, 42, false)], 40);
        assert_eq!(placed, vec![PlacedLabel { column: 9, text: "42".into(), emphasized: false }]);
    }

    #[test]
    fn test_place_labels_prefers_emphasized_on_overlap() {
        let placed = place_labels(&[label(10.0, 42, false), label(11.0, 43, true)], 40);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].text, "43");
        assert!(placed[0].emphasized);
    }

    #[test]
    fn test_place_labels_stays_inside_row() {
        let placed = place_labels(&[label(0.2, 37, false), label(39.9, 77, false)], 40);
        assert_eq!(placed[0].column, 0);
        assert_eq!(placed[1].column, 38);

        assert!(place_labels(&[label(0.5, 37, false)], 1).is_empty());
    }
}
