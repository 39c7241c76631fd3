//! Everything the chart draws, resolved to plain shapes.
//!
//! Kept free of terminal types so the layout rules can be tested directly.

use crate::model::{format_dollars, scale_to_height, YearProjection};

use super::geometry::ChartGeometry;

/// Selected bars are drawn this much wider
pub const SELECTED_WIDTH_SCALE: f64 = 2.5;

/// Every n-th bar gets an age label
pub const LABEL_EVERY: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct BarShape {
    pub index: usize,
    pub x: f64,
    pub width: f64,
    pub total_height: f64,
    pub cash_height: f64,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub x: f64,
    pub age: u32,
    pub emphasized: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub bars: Vec<BarShape>,
    pub labels: Vec<AxisLabel>,
    pub handle_x: f64,
    pub readout: Option<String>,
}

/// Vertical scale of the bars
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    pub domain_min: f64,
    pub domain_max: f64,
    pub max_height: f64,
}

pub fn build_scene(
    years: &[YearProjection],
    geometry: &ChartGeometry,
    scale: ValueScale,
    selected: Option<usize>,
    handle_x: f64,
) -> Scene {
    let height = |value| scale_to_height(value, scale.domain_min, scale.domain_max, scale.max_height);

    let bars = years
        .iter()
        .enumerate()
        .map(|(i, year)| {
            let is_selected = selected == Some(i);
            let (x, width) = if is_selected {
                let width = geometry.bar_width * SELECTED_WIDTH_SCALE;
                (geometry.bar_center(i) - width / 2.0, width)
            } else {
                (geometry.bar_x(i), geometry.bar_width)
            };
            BarShape {
                index: i,
                x,
                width,
                total_height: height(year.interest_value),
                cash_height: height(year.cash_contributed),
                selected: is_selected,
            }
        })
        .collect();

    let labels = years
        .iter()
        .enumerate()
        .filter_map(|(i, year)| {
            let near_selection = selected.is_some_and(|s| i.abs_diff(s) <= 1);
            if selected == Some(i) {
                Some(AxisLabel { x: geometry.bar_center(i), age: year.age, emphasized: true })
            } else if i % LABEL_EVERY == 0 && !near_selection {
                Some(AxisLabel { x: geometry.bar_center(i), age: year.age, emphasized: false })
            } else {
                None
            }
        })
        .collect();

    let readout = selected
        .and_then(|i| years.get(i))
        .map(|year| format_dollars(year.interest_value));

    Scene {
        bars,
        labels,
        handle_x,
        readout,
    }
}
