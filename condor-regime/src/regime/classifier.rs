//! Market regime classifier.
//!
//! Maps an indicator snapshot to categorical labels using fixed, configurable
//! cut points. Every band is half-open (`lower <= x < upper`) and the top band
//! is unbounded. Labels whose inputs are not yet computable are `Unknown`.

use serde::{Deserialize, Serialize};

use crate::config::{ThresholdConfig, Thresholds, Tier};

use super::snapshot::IndicatorSnapshot;

/// Trend strength from ADX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendStrength {
    /// ADX below the lower threshold (default 18).
    Weak,
    /// ADX 18-25.
    Medium,
    /// ADX at or above 25.
    Strong,
    Unknown,
}

impl TrendStrength {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Weak => "Weak / range-bound",
            Self::Medium => "Moderate trend",
            Self::Strong => "Strong trend",
            Self::Unknown => "Trend strength unknown (insufficient data)",
        }
    }
}

/// Trend direction from close vs. reference MA and the MA slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendDirection {
    Up,
    Down,
    Sideways,
    Unknown,
}

impl TrendDirection {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Up => "Above a rising moving average",
            Self::Down => "Below a falling moving average",
            Self::Sideways => "No consistent direction",
            Self::Unknown => "Direction unknown (insufficient data)",
        }
    }
}

/// Realized volatility level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolatilityLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl VolatilityLevel {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low realized volatility",
            Self::Medium => "Medium realized volatility",
            Self::High => "High realized volatility",
            Self::Unknown => "Realized volatility unknown (insufficient data)",
        }
    }
}

/// Size of the implied-minus-realized premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpreadLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl SpreadLevel {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Premium thin relative to realized movement",
            Self::Medium => "Premium moderately rich",
            Self::High => "Premium rich relative to realized movement",
            Self::Unknown => "Premium unknown (no volatility proxy)",
        }
    }
}

/// Distance of the close from the reference moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaDistance {
    RangeBound,
    Mild,
    Strong,
    Unknown,
}

impl MaDistance {
    pub fn description(&self) -> &'static str {
        match self {
            Self::RangeBound => "Hugging the moving average",
            Self::Mild => "Mildly stretched from the moving average",
            Self::Strong => "Stretched from the moving average",
            Self::Unknown => "Distance from moving average unknown",
        }
    }
}

/// Sign of implied minus realized volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpreadSign {
    /// IV > RV.
    Positive,
    /// IV <= RV.
    NonPositive,
    Unknown,
}

/// Categorical market regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Regime {
    pub trend_strength: TrendStrength,
    pub trend_direction: TrendDirection,
    pub volatility_level: VolatilityLevel,
    pub premium_spread_level: SpreadLevel,
    pub ma_distance: MaDistance,
    pub spread_sign: SpreadSign,
}

impl Regime {
    /// True when no dimension fell back to `Unknown`.
    pub fn is_fully_classified(&self) -> bool {
        self.trend_strength != TrendStrength::Unknown
            && self.trend_direction != TrendDirection::Unknown
            && self.volatility_level != VolatilityLevel::Unknown
            && self.premium_spread_level != SpreadLevel::Unknown
            && self.ma_distance != MaDistance::Unknown
            && self.spread_sign != SpreadSign::Unknown
    }

    /// Whether conditions suit selling premium on both sides.
    pub fn favors_premium_selling(&self) -> bool {
        self.trend_strength == TrendStrength::Weak && self.spread_sign == SpreadSign::Positive
    }

    /// Multi-line human-readable commentary.
    pub fn summary(&self) -> String {
        format!(
            "Trend: {}\n\
             Direction: {}\n\
             Distance from MA: {}\n\
             Volatility: {}\n\
             Premium: {}",
            self.trend_strength.description(),
            self.trend_direction.description(),
            self.ma_distance.description(),
            self.volatility_level.description(),
            self.premium_spread_level.description(),
        )
    }
}

/// Classify a snapshot.
pub fn classify(snapshot: &IndicatorSnapshot, thresholds: &ThresholdConfig) -> Regime {
    let trend_strength = match tier(snapshot.adx, &thresholds.adx) {
        Some(Tier::Below) => TrendStrength::Weak,
        Some(Tier::Within) => TrendStrength::Medium,
        Some(Tier::Above) => TrendStrength::Strong,
        None => TrendStrength::Unknown,
    };

    let volatility_level = match tier(snapshot.realized_vol, &thresholds.realized_vol) {
        Some(Tier::Below) => VolatilityLevel::Low,
        Some(Tier::Within) => VolatilityLevel::Medium,
        Some(Tier::Above) => VolatilityLevel::High,
        None => VolatilityLevel::Unknown,
    };

    let premium_spread_level = match tier(snapshot.iv_minus_rv, &thresholds.premium_spread) {
        Some(Tier::Below) => SpreadLevel::Low,
        Some(Tier::Within) => SpreadLevel::Medium,
        Some(Tier::Above) => SpreadLevel::High,
        None => SpreadLevel::Unknown,
    };

    let ma_distance = match tier(snapshot.ma_distance_pct, &thresholds.ma_distance_pct) {
        Some(Tier::Below) => MaDistance::RangeBound,
        Some(Tier::Within) => MaDistance::Mild,
        Some(Tier::Above) => MaDistance::Strong,
        None => MaDistance::Unknown,
    };

    let spread_sign = match snapshot.iv_minus_rv {
        Some(spread) if spread > 0.0 => SpreadSign::Positive,
        Some(_) => SpreadSign::NonPositive,
        None => SpreadSign::Unknown,
    };

    Regime {
        trend_strength,
        trend_direction: direction(snapshot.close, snapshot.reference_ma, snapshot.ma_slope),
        volatility_level,
        premium_spread_level,
        ma_distance,
        spread_sign,
    }
}

fn tier(value: Option<f64>, thresholds: &Thresholds) -> Option<Tier> {
    value.map(|v| thresholds.tier(v))
}

fn direction(close: f64, ma: Option<f64>, slope: Option<f64>) -> TrendDirection {
    match (ma, slope) {
        (Some(ma), Some(slope)) if close > ma && slope >= 0.0 => TrendDirection::Up,
        (Some(ma), Some(slope)) if close < ma && slope <= 0.0 => TrendDirection::Down,
        (Some(_), Some(_)) => TrendDirection::Sideways,
        _ => TrendDirection::Unknown,
    }
}
