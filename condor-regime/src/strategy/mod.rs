//! Options strategy guidance derived from the regime.

pub mod delta_bands;

pub use delta_bands::{
    recommend, select_profile, BandConfig, DeltaBandRecommendation, DeltaRange, LegBands,
    StrategyProfile,
};
