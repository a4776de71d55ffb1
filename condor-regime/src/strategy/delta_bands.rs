//! Iron condor delta-band selection.
//!
//! Maps a classified regime to short/long strike deltas for each side:
//! - Range-bound with rich premium: 10-15 delta shorts, 5-10 delta wings
//! - Mild trend: 15-20 delta shorts, 8-12 delta wings
//! - Strong trend: 25-30 delta short put, 20-25 delta short call, 8-15 wings
//! - Anything not covered above: the conservative (lowest delta) band
//!
//! Informational only. Deltas are in points (15 means 0.15).

use serde::{Deserialize, Serialize};

use crate::regime::{Regime, SpreadSign, TrendStrength};

/// Closed delta range in points, `lower <= upper`, both within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaRange {
    pub lower: f64,
    pub upper: f64,
}

impl DeltaRange {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, delta: f64) -> bool {
        delta >= self.lower && delta <= self.upper
    }

    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn is_valid(&self) -> bool {
        self.lower.is_finite()
            && self.upper.is_finite()
            && self.lower >= 0.0
            && self.upper <= 100.0
            && self.lower <= self.upper
    }

    /// Same range as an absolute option delta (15 -> 0.15).
    pub fn as_fraction(&self) -> (f64, f64) {
        (self.lower / 100.0, self.upper / 100.0)
    }
}

/// Delta ranges for the four legs of an iron condor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegBands {
    pub short_put: DeltaRange,
    pub long_put: DeltaRange,
    pub short_call: DeltaRange,
    pub long_call: DeltaRange,
}

impl LegBands {
    /// Same ranges on both sides.
    pub const fn symmetric(short: DeltaRange, long: DeltaRange) -> Self {
        Self {
            short_put: short,
            long_put: long,
            short_call: short,
            long_call: long,
        }
    }

    pub fn legs(&self) -> [(&'static str, DeltaRange); 4] {
        [
            ("short_put", self.short_put),
            ("long_put", self.long_put),
            ("short_call", self.short_call),
            ("long_call", self.long_call),
        ]
    }
}

/// Which canonical band a recommendation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyProfile {
    RangeBound,
    MildTrend,
    StrongTrend,
    /// Fallback for any regime the table does not cover.
    Conservative,
}

impl StrategyProfile {
    pub fn description(&self) -> &'static str {
        match self {
            Self::RangeBound => "Calm, range-bound regime with premium above realized movement",
            Self::MildTrend => "Mixed regime with a moderate trend",
            Self::StrongTrend => "Trend risk elevated",
            Self::Conservative => "Regime unclassified or premium not rich; widest strikes",
        }
    }
}

/// Configured delta bands per profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    pub range_bound: LegBands,
    pub mild_trend: LegBands,
    pub strong_trend: LegBands,
    pub conservative: LegBands,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            range_bound: LegBands::symmetric(DeltaRange::new(10.0, 15.0), DeltaRange::new(5.0, 10.0)),
            mild_trend: LegBands::symmetric(DeltaRange::new(15.0, 20.0), DeltaRange::new(8.0, 12.0)),
            strong_trend: LegBands {
                short_put: DeltaRange::new(25.0, 30.0),
                long_put: DeltaRange::new(8.0, 15.0),
                short_call: DeltaRange::new(20.0, 25.0),
                long_call: DeltaRange::new(8.0, 15.0),
            },
            conservative: LegBands::symmetric(DeltaRange::new(5.0, 10.0), DeltaRange::new(2.0, 5.0)),
        }
    }
}

impl BandConfig {
    pub fn bands_for(&self, profile: StrategyProfile) -> LegBands {
        match profile {
            StrategyProfile::RangeBound => self.range_bound,
            StrategyProfile::MildTrend => self.mild_trend,
            StrategyProfile::StrongTrend => self.strong_trend,
            StrategyProfile::Conservative => self.conservative,
        }
    }
}

/// Delta-band recommendation for the four legs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeltaBandRecommendation {
    pub profile: StrategyProfile,
    pub short_put: DeltaRange,
    pub long_put: DeltaRange,
    pub short_call: DeltaRange,
    pub long_call: DeltaRange,
}

impl DeltaBandRecommendation {
    pub fn summary(&self) -> String {
        format!(
            "{}: short put {:.0}-{:.0}d / long put {:.0}-{:.0}d, short call {:.0}-{:.0}d / long call {:.0}-{:.0}d",
            self.profile.description(),
            self.short_put.lower,
            self.short_put.upper,
            self.long_put.lower,
            self.long_put.upper,
            self.short_call.lower,
            self.short_call.upper,
            self.long_call.lower,
            self.long_call.upper,
        )
    }
}

/// Select the profile for a regime.
///
/// Only trend strength and spread sign are consulted.
pub fn select_profile(regime: &Regime) -> StrategyProfile {
    match (regime.trend_strength, regime.spread_sign) {
        (TrendStrength::Weak, SpreadSign::Positive) => StrategyProfile::RangeBound,
        (TrendStrength::Medium, _) => StrategyProfile::MildTrend,
        (TrendStrength::Strong, _) => StrategyProfile::StrongTrend,
        (TrendStrength::Weak, SpreadSign::NonPositive | SpreadSign::Unknown)
        | (TrendStrength::Unknown, _) => StrategyProfile::Conservative,
    }
}

/// Map a regime to its delta-band recommendation.
pub fn recommend(regime: &Regime, bands: &BandConfig) -> DeltaBandRecommendation {
    let profile = select_profile(regime);
    let legs = bands.bands_for(profile);
    DeltaBandRecommendation {
        profile,
        short_put: legs.short_put,
        long_put: legs.long_put,
        short_call: legs.short_call,
        long_call: legs.long_call,
    }
}
