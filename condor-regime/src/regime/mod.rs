//! Market regime classification.
//!
//! Labels the latest indicator snapshot along each dimension:
//! - Trend strength: ADX < 18 weak, 18-25 medium, >= 25 strong
//! - Trend direction: close vs. reference MA and the MA slope
//! - Distance from MA: < 0.6% range-bound, 0.6-1.2% mild, >= 1.2% strong
//! - Realized volatility: < 10% low, 10-16% medium, >= 16% high
//! - Premium (IV - RV): < 2 pts low, 2-6 pts medium, >= 6 pts high

pub mod classifier;
pub mod snapshot;

pub use classifier::{
    classify, MaDistance, Regime, SpreadLevel, SpreadSign, TrendDirection, TrendStrength,
    VolatilityLevel,
};
pub use snapshot::IndicatorSnapshot;
