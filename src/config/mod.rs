use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::model::{
    ChartInputs, DEFAULT_CURRENT_AGE, DEFAULT_INITIAL_PRINCIPAL, DEFAULT_RATE,
    DEFAULT_YEARLY_CONTRIBUTION, MAX_AGE, VALUE_CEILING,
};
use crate::slider::{SLIDER_DEFAULT, SLIDER_MAX};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("current_age {0} is past the last projected age (80)")]
    AgeOutOfRange(u32),
    #[error("{field} must be a finite, non-negative number (got {value})")]
    NegativeAmount { field: &'static str, value: f64 },
    #[error("value_ceiling ({ceiling}) must be above initial_principal ({principal})")]
    CeilingBelowPrincipal { ceiling: f64, principal: f64 },
    #[error("slider_default {0} is above 100")]
    SliderOutOfRange(u8),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Age of the first bar
    pub current_age: u32,
    pub yearly_contribution: f64,
    pub initial_principal: f64,
    /// Yearly growth rate, 0.04 = 4%
    pub rate: f64,

    /// Bar picked automatically once the chart is shown
    pub auto_select_index: usize,
    pub auto_select_delay_ms: u64,

    /// How long the handle takes to snap onto a bar
    pub snap_duration_ms: u64,

    /// Value drawn as a full-height bar
    pub value_ceiling: f64,

    pub slider_default: u8,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            current_age: DEFAULT_CURRENT_AGE,
            yearly_contribution: DEFAULT_YEARLY_CONTRIBUTION,
            initial_principal: DEFAULT_INITIAL_PRINCIPAL,
            rate: DEFAULT_RATE,
            auto_select_index: 30,
            auto_select_delay_ms: 500,
            snap_duration_ms: 350,
            value_ceiling: VALUE_CEILING,
            slider_default: SLIDER_DEFAULT,
        }
    }
}

impl AppConfig {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("agebars");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from `path` (or the default location), creating a default file if missing
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Ok(p) => p,
                Err(_) => return Ok(AppConfig::default()),
            },
        };

        if path.exists() {
            let config = match std::fs::read_to_string(&path) {
                Ok(content) => match Self::parse(&content) {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config: {}", e);
                        AppConfig::default()
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config: {}", e);
                    AppConfig::default()
                }
            };
            tracing::info!("Loaded config from {}", path.display());
            return Ok(config.validated());
        }

        let config = AppConfig::default();
        if let Err(e) = config.save(&path) {
            tracing::warn!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.current_age > MAX_AGE {
            return Err(ConfigError::AgeOutOfRange(self.current_age));
        }
        for (field, value) in [
            ("yearly_contribution", self.yearly_contribution),
            ("initial_principal", self.initial_principal),
            ("rate", self.rate),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeAmount { field, value });
            }
        }
        if !(self.value_ceiling > self.initial_principal) {
            return Err(ConfigError::CeilingBelowPrincipal {
                ceiling: self.value_ceiling,
                principal: self.initial_principal,
            });
        }
        if self.slider_default > SLIDER_MAX {
            return Err(ConfigError::SliderOutOfRange(self.slider_default));
        }
        Ok(())
    }

    /// Log any validation problem and clamp values into range
    pub fn validated(mut self) -> Self {
        if let Err(e) = self.validate() {
            tracing::warn!("Invalid config, clamping: {}", e);
        }

        let inputs = self.chart_inputs().sanitized();
        self.current_age = inputs.current_age;
        self.yearly_contribution = inputs.yearly_contribution;
        self.initial_principal = inputs.initial_principal;
        self.rate = inputs.rate;

        if !(self.value_ceiling > self.initial_principal) {
            self.value_ceiling = self.initial_principal.max(VALUE_CEILING) + 1.0;
        }
        self.slider_default = self.slider_default.min(SLIDER_MAX);
        self
    }

    pub fn chart_inputs(&self) -> ChartInputs {
        ChartInputs {
            current_age: self.current_age,
            yearly_contribution: self.yearly_contribution,
            initial_principal: self.initial_principal,
            rate: self.rate,
        }
    }

    pub fn auto_select_delay(&self) -> Duration {
        Duration::from_millis(self.auto_select_delay_ms)
    }

    pub fn snap_duration(&self) -> Duration {
        Duration::from_millis(self.snap_duration_ms)
    }
}
