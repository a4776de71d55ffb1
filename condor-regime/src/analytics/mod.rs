//! Volatility analytics.
//!
//! Provides:
//! - Proxy alignment (left join of a volatility index onto bar dates)
//! - Implied-minus-realized volatility spread

pub mod vol_spread;

pub use vol_spread::{align_proxy, compare, AlignmentStatus, VolatilityComparison};
