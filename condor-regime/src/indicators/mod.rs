//! Technical indicators over daily bars.
//!
//! - Windowed statistics: returns, rolling mean/std/sum, annualization, OLS slope
//! - True range and average true range
//! - Average Directional Index (summed directional movement)

pub mod adx;
pub mod range;
pub mod stats;

pub use adx::{adx, directional_movement, AdxSeries};
pub use range::{atr, atr_pct, true_range};
pub use stats::{
    aligned_returns, annualize, linear_slope, returns, rolling_mean, rolling_std, rolling_sum,
    Series, MIN_SLOPE_POINTS,
};
