//! Engine configuration.
//!
//! Every window length, classifier threshold and delta band is configurable.
//! Defaults match the daily-bar dashboards:
//!
//! ```toml
//! [windows]
//! ma_short = 5
//! ma_medium = 20
//! ma_long = 50
//! reference_ma = "medium"
//! rv_short = 5
//! rv_long = 20
//! regime_vol = "short"
//! atr = 14
//! adx = 14
//! slope_lookback = 10
//! periods_per_year = 252.0
//!
//! [thresholds]
//! adx = { lower = 18.0, upper = 25.0 }
//! ma_distance_pct = { lower = 0.6, upper = 1.2 }
//! realized_vol = { lower = 0.10, upper = 0.16 }
//! premium_spread = { lower = 0.02, upper = 0.06 }
//! ```
//!
//! Omitted keys fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::indicators::stats::MIN_SLOPE_POINTS;
use crate::strategy::BandConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid window '{name}': {value}")]
    InvalidWindow { name: &'static str, value: usize },

    #[error("Invalid periods per year: {0}")]
    InvalidPeriodsPerYear(f64),

    #[error("Invalid thresholds '{name}': lower {lower}, upper {upper}")]
    InvalidThresholds {
        name: &'static str,
        lower: f64,
        upper: f64,
    },

    #[error("Invalid delta band '{name}': {lower}-{upper}")]
    InvalidBand {
        name: String,
        lower: f64,
        upper: f64,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which moving average the classifier measures trend against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaChoice {
    Short,
    Medium,
    Long,
}

/// Which realized volatility window feeds the classifier and the IV spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolWindow {
    Short,
    Long,
}

/// Indicator window lengths, in bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub ma_short: usize,
    pub ma_medium: usize,
    pub ma_long: usize,
    pub reference_ma: MaChoice,
    pub rv_short: usize,
    pub rv_long: usize,
    pub regime_vol: VolWindow,
    pub atr: usize,
    pub adx: usize,
    /// Points of the reference MA used for the trend slope.
    pub slope_lookback: usize,
    /// Annualization factor for realized volatility (252 for daily bars).
    pub periods_per_year: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            ma_short: 5,
            ma_medium: 20,
            ma_long: 50,
            reference_ma: MaChoice::Medium,
            rv_short: 5,
            rv_long: 20,
            regime_vol: VolWindow::Short,
            atr: 14,
            adx: 14,
            slope_lookback: 10,
            periods_per_year: 252.0,
        }
    }
}

impl WindowConfig {
    /// Bars needed before every configured indicator has a value.
    pub fn warmup_bars(&self) -> usize {
        [
            self.ma_short,
            self.ma_medium,
            self.ma_long,
            self.rv_short + 1,
            self.rv_long + 1,
            self.atr + 1,
            2 * self.adx,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    fn validate(&self) -> ConfigResult<()> {
        let positive = [
            ("ma_short", self.ma_short),
            ("ma_medium", self.ma_medium),
            ("ma_long", self.ma_long),
            ("atr", self.atr),
            ("adx", self.adx),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidWindow { name, value });
            }
        }

        // Sample deviation needs at least two returns.
        for (name, value) in [("rv_short", self.rv_short), ("rv_long", self.rv_long)] {
            if value < 2 {
                return Err(ConfigError::InvalidWindow { name, value });
            }
        }

        if self.slope_lookback < MIN_SLOPE_POINTS {
            return Err(ConfigError::InvalidWindow {
                name: "slope_lookback",
                value: self.slope_lookback,
            });
        }

        if !self.periods_per_year.is_finite() || self.periods_per_year <= 0.0 {
            return Err(ConfigError::InvalidPeriodsPerYear(self.periods_per_year));
        }
        Ok(())
    }
}

/// Position of a value relative to a pair of thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// `value < lower`
    Below,
    /// `lower <= value < upper`
    Within,
    /// `value >= upper`
    Above,
}

/// Two cut points splitting a value range into three half-open bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub lower: f64,
    pub upper: f64,
}

impl Thresholds {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn tier(&self, value: f64) -> Tier {
        if value < self.lower {
            Tier::Below
        } else if value < self.upper {
            Tier::Within
        } else {
            Tier::Above
        }
    }

    fn validate(&self, name: &'static str) -> ConfigResult<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() || self.lower > self.upper {
            return Err(ConfigError::InvalidThresholds {
                name,
                lower: self.lower,
                upper: self.upper,
            });
        }
        Ok(())
    }
}

/// Classifier cut points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// ADX: Weak / Medium / Strong.
    pub adx: Thresholds,
    /// Distance of close from the reference MA, percent.
    pub ma_distance_pct: Thresholds,
    /// Annualized realized volatility, fraction.
    pub realized_vol: Thresholds,
    /// Implied minus realized volatility, fraction.
    pub premium_spread: Thresholds,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            adx: Thresholds::new(18.0, 25.0),
            ma_distance_pct: Thresholds::new(0.6, 1.2),
            realized_vol: Thresholds::new(0.10, 0.16),
            premium_spread: Thresholds::new(0.02, 0.06),
        }
    }
}

impl ThresholdConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.adx.validate("adx")?;
        self.ma_distance_pct.validate("ma_distance_pct")?;
        self.realized_vol.validate("realized_vol")?;
        self.premium_spread.validate("premium_spread")?;
        Ok(())
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub windows: WindowConfig,
    pub thresholds: ThresholdConfig,
    pub bands: BandConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.windows.validate()?;
        self.thresholds.validate()?;

        for (profile, legs) in [
            ("range_bound", &self.bands.range_bound),
            ("mild_trend", &self.bands.mild_trend),
            ("strong_trend", &self.bands.strong_trend),
            ("conservative", &self.bands.conservative),
        ] {
            for (leg, range) in legs.legs() {
                if !range.is_valid() {
                    return Err(ConfigError::InvalidBand {
                        name: format!("{}.{}", profile, leg),
                        lower: range.lower,
                        upper: range.upper,
                    });
                }
            }
        }
        Ok(())
    }
}
