//! Condor Regime
//!
//! Technical indicators, market regime classification and iron condor
//! delta-band guidance from daily OHLC bars and a volatility index.
//!
//! Key components:
//! - Bar and volatility proxy series with CSV loading
//! - Rolling statistics, ATR and ADX
//! - Implied vs. realized volatility comparison
//! - Regime classification with configurable thresholds
//! - Regime-to-delta-band mapping that falls back to the most conservative band

pub mod analytics;
pub mod config;
pub mod data;
pub mod engine;
pub mod indicators;
pub mod regime;
pub mod strategy;

// Re-export commonly used types
pub use analytics::{AlignmentStatus, VolatilityComparison};
pub use config::{ConfigError, EngineConfig, ThresholdConfig, Thresholds, WindowConfig};
pub use data::{Bar, BarSeries, DataLoader, ProxyPoint, VolatilityProxySeries};
pub use engine::{
    assess_many, classify_history, compute, Assessment, DataQualityEvent, EngineError,
    EngineResult, IndicatorSet, InstrumentData, RegimeHistory, RegimeStats,
};
pub use regime::{classify, IndicatorSnapshot, Regime};
pub use strategy::{recommend, BandConfig, DeltaBandRecommendation, DeltaRange, StrategyProfile};
