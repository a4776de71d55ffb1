//! Implied-minus-realized volatility spread.
//!
//! The volatility index (e.g. VIX, India VIX) stands in for option-implied
//! volatility. It is left-joined to the bar dates, converted from percentage
//! points to a fraction, and compared with annualized realized volatility:
//! - IV > RV: premiums are rich relative to recent movement
//! - IV < RV: the market is moving more than options are pricing
//!
//! Bar positions without a proxy print are kept and left `None`.

use serde::Serialize;

use crate::data::{BarSeries, VolatilityProxySeries};
use crate::indicators::Series;

/// How the proxy series lined up with the bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AlignmentStatus {
    /// At least one bar date had a proxy value.
    Aligned { matched: usize },
    /// No proxy series was supplied, or it was empty.
    ProxyUnavailable,
    /// Proxy data exists but shares no dates with the bars.
    Misaligned,
}

impl AlignmentStatus {
    pub fn is_aligned(&self) -> bool {
        matches!(self, Self::Aligned { .. })
    }
}

/// Proxy levels and the IV-RV spread, aligned to the bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityComparison {
    /// Proxy level as a fraction (VIX 14.5 -> 0.145).
    pub iv_proxy: Series,
    /// `iv_proxy - realized_vol`.
    pub spread: Series,
    pub status: AlignmentStatus,
}

impl VolatilityComparison {
    fn unavailable(len: usize, status: AlignmentStatus) -> Self {
        Self {
            iv_proxy: vec![None; len],
            spread: vec![None; len],
            status,
        }
    }
}

/// Left-join the proxy onto the bar dates.
///
/// Returns `None` positions where the proxy has no print for that date.
pub fn align_proxy(bars: &BarSeries, proxy: &VolatilityProxySeries) -> Series {
    let points = proxy.points();
    let mut out = Vec::with_capacity(bars.len());
    let mut cursor = 0;

    // Both sides are strictly increasing, so a single merge pass suffices.
    for bar in bars.bars() {
        while cursor < points.len() && points[cursor].date < bar.date() {
            cursor += 1;
        }
        match points.get(cursor) {
            Some(point) if point.date == bar.date() => out.push(Some(point.value)),
            _ => out.push(None),
        }
    }
    out
}

/// Compare realized volatility (annualized fraction, aligned to `bars`)
/// against the implied-volatility proxy.
pub fn compare(
    bars: &BarSeries,
    realized_vol: &[Option<f64>],
    proxy: Option<&VolatilityProxySeries>,
) -> VolatilityComparison {
    let proxy = match proxy {
        Some(p) if !p.is_empty() => p,
        _ => return VolatilityComparison::unavailable(bars.len(), AlignmentStatus::ProxyUnavailable),
    };

    let aligned = align_proxy(bars, proxy);
    let matched = aligned.iter().filter(|v| v.is_some()).count();

    // Reported by the engine as a data-quality event.
    if matched == 0 {
        return VolatilityComparison::unavailable(bars.len(), AlignmentStatus::Misaligned);
    }

    let iv_proxy: Series = aligned.iter().map(|v| v.map(|pct| pct / 100.0)).collect();
    let spread = iv_proxy
        .iter()
        .zip(realized_vol)
        .map(|(iv, rv)| match (iv, rv) {
            (Some(iv), Some(rv)) => Some(iv - rv),
            _ => None,
        })
        .collect();

    VolatilityComparison {
        iv_proxy,
        spread,
        status: AlignmentStatus::Aligned { matched },
    }
}
