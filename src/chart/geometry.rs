/// Horizontal layout of the bar row.
///
/// All lengths are in terminal columns. Recomputed whenever the viewport
/// width or the number of projected years changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGeometry {
    pub bar_width: f64,
    pub spacing: f64,
    pub offset: f64,
    pub total_width: f64,
    pub year_count: usize,
}

impl ChartGeometry {
    pub fn new(viewport_width: f64, year_count: usize, margin: f64) -> Self {
        let margin = margin.max(0.0);
        let total_width = (viewport_width - 2.0 * margin).max(0.0);
        let pitch = if year_count == 0 { 0.0 } else { total_width / year_count as f64 };
        let bar_width = pitch / 3.0;

        Self {
            bar_width,
            spacing: pitch - bar_width,
            offset: margin,
            total_width,
            year_count,
        }
    }

    /// Distance between the starts of two neighbouring slots
    pub fn pitch(&self) -> f64 {
        self.bar_width + self.spacing
    }

    /// Left edge of bar `index`
    pub fn bar_x(&self, index: usize) -> f64 {
        self.offset + index as f64 * self.pitch() + self.spacing / 2.0
    }

    pub fn bar_center(&self, index: usize) -> f64 {
        self.bar_x(index) + self.bar_width / 2.0
    }

    /// Slot under `x`, not clamped. Negative left of the first slot.
    pub fn raw_index_at(&self, x: f64) -> i64 {
        let pitch = self.pitch();
        if pitch <= 0.0 || !x.is_finite() {
            return 0;
        }
        ((x - self.offset) / pitch).floor() as i64
    }

    /// Slot under `x`, clamped to a valid bar index
    pub fn index_at(&self, x: f64) -> Option<usize> {
        self.clamp_index(self.raw_index_at(x))
    }

    pub fn clamp_index(&self, index: i64) -> Option<usize> {
        if self.year_count == 0 {
            return None;
        }
        Some(index.clamp(0, self.year_count as i64 - 1) as usize)
    }

    /// Clamp a handle position to the draggable range
    pub fn clamp_x(&self, x: f64) -> f64 {
        x.clamp(self.offset, self.offset + self.total_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert_eq, proptest};

    #[test]
    fn test_default_layout_pitch() {
        let geometry = ChartGeometry::new(133.0, 43, 1.0);
        assert_eq!(geometry.total_width, 131.0);
        assert!((geometry.pitch() - 131.0 / 43.0).abs() < 1e-12);
        assert!((geometry.spacing - 2.0 * geometry.bar_width).abs() < 1e-12);
    }

    #[test]
    fn test_index_at_clamps_to_bounds() {
        let geometry = ChartGeometry::new(100.0, 43, 2.0);
        assert_eq!(geometry.raw_index_at(geometry.offset - 5.0), -3);
        assert_eq!(geometry.index_at(0.0), Some(0));
        assert_eq!(geometry.index_at(geometry.offset), Some(0));
        assert_eq!(geometry.index_at(geometry.offset + geometry.total_width), Some(42));
        assert_eq!(geometry.index_at(10_000.0), Some(42));
    }

    #[test]
    fn test_empty_chart_has_no_index() {
        let geometry = ChartGeometry::new(100.0, 0, 2.0);
        assert_eq!(geometry.pitch(), 0.0);
        assert_eq!(geometry.index_at(50.0), None);
    }

    #[test]
    fn test_narrow_viewport_degenerates() {
        let geometry = ChartGeometry::new(3.0, 43, 2.0);
        assert_eq!(geometry.total_width, 0.0);
        assert_eq!(geometry.index_at(3.0), Some(0));
        assert_eq!(geometry.clamp_x(50.0), geometry.offset);
    }

    proptest! {
        #[test]
        fn prop_bar_center_maps_back_to_its_index(
            width in 50.0f64..400.0,
            year_count in 1usize..80,
            margin in 0.0f64..4.0,
            pick in 0usize..80,
        ) {
            let geometry = ChartGeometry::new(width, year_count, margin);
            let index = pick % year_count;
            prop_assert_eq!(geometry.index_at(geometry.bar_center(index)), Some(index));
        }
    }
}
