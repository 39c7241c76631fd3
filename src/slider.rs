//! Weekly-contribution slider (0..=100)
//!
//! Not wired into the projection; it only reports its own value.

pub const SLIDER_MIN: u8 = 0;
pub const SLIDER_MAX: u8 = 100;
pub const SLIDER_DEFAULT: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slider {
    value: u8,
}

impl Default for Slider {
    fn default() -> Self {
        Self::new(SLIDER_DEFAULT)
    }
}

impl Slider {
    pub fn new(value: u8) -> Self {
        Self { value: value.min(SLIDER_MAX) }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn increment(&mut self) {
        self.value = (self.value + 1).min(SLIDER_MAX);
    }

    pub fn decrement(&mut self) {
        self.value = self.value.saturating_sub(1).max(SLIDER_MIN);
    }

    /// Position along the track, 0.0 at the left end and 1.0 at the right
    pub fn ratio(&self) -> f64 {
        f64::from(self.value - SLIDER_MIN) / f64::from(SLIDER_MAX - SLIDER_MIN)
    }

    pub fn set_from_ratio(&mut self, ratio: f64) {
        let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
        let span = f64::from(SLIDER_MAX - SLIDER_MIN);
        self.value = SLIDER_MIN + (ratio * span).round() as u8;
    }

    pub fn label(&self) -> String {
        format!("${}/Weeks", self.value)
    }
}
