//! Windowed statistics over index-aligned series.
//!
//! Every function takes and returns series aligned to the originating bars.
//! A position is `None` ("not yet computable") until the full window ending
//! at that position is populated; a single missing input inside the window
//! makes the output missing as well.
//!
//! Standard deviation is the sample deviation (divides by `window - 1`).

use std::iter;

use statrs::statistics::Statistics;

/// Index-aligned series with explicit "not yet computable" positions.
pub type Series = Vec<Option<f64>>;

/// Minimum number of points `linear_slope` will fit a line through.
pub const MIN_SLOPE_POINTS: usize = 5;

/// Simple percentage changes between consecutive closes.
///
/// Yields `closes.len() - 1` items. A change from a zero close is `None`.
pub fn returns(closes: &[f64]) -> impl Iterator<Item = Option<f64>> + '_ {
    closes.windows(2).map(|w| {
        let (prev, curr) = (w[0], w[1]);
        if prev == 0.0 {
            None
        } else {
            Some((curr - prev) / prev)
        }
    })
}

/// `returns` aligned to the closes: position 0 is always `None`.
pub fn aligned_returns(closes: &[f64]) -> Series {
    if closes.is_empty() {
        return Vec::new();
    }
    iter::once(None).chain(returns(closes)).collect()
}

/// Rolling arithmetic mean.
pub fn rolling_mean(series: &[Option<f64>], window: usize) -> Series {
    rolling_apply(series, window, |values| {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    })
}

/// Rolling sample standard deviation. Windows shorter than 2 have none.
pub fn rolling_std(series: &[Option<f64>], window: usize) -> Series {
    if window < 2 {
        return vec![None; series.len()];
    }
    rolling_apply(series, window, |values| Some(values.iter().std_dev()))
}

/// Rolling sum.
pub fn rolling_sum(series: &[Option<f64>], window: usize) -> Series {
    rolling_apply(series, window, |values| Some(values.iter().sum()))
}

/// Scale a per-period standard deviation to an annual figure.
pub fn annualize(std: f64, periods_per_year: f64) -> f64 {
    std * periods_per_year.sqrt()
}

/// Ordinary least squares slope of the last `lookback` present values,
/// regressed against their position `0..n`.
///
/// Returns `None` with fewer than `max(5, lookback / 2)` usable points.
pub fn linear_slope(series: &[Option<f64>], lookback: usize) -> Option<f64> {
    let valid: Vec<f64> = series.iter().flatten().copied().collect();
    let tail = &valid[valid.len().saturating_sub(lookback)..];

    let min_points = MIN_SLOPE_POINTS.max(lookback / 2);
    if tail.is_empty() || tail.len() < min_points {
        return None;
    }

    let n = tail.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = tail.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut x_variance = 0.0;
    for (i, y) in tail.iter().enumerate() {
        let dx = i as f64 - x_mean;
        covariance += dx * (y - y_mean);
        x_variance += dx * dx;
    }

    if x_variance == 0.0 {
        return None;
    }
    Some(covariance / x_variance)
}

/// Apply `f` to each complete window; positions without a full window of
/// present values are `None`.
fn rolling_apply<F>(series: &[Option<f64>], window: usize, f: F) -> Series
where
    F: Fn(&[f64]) -> Option<f64>,
{
    if window == 0 {
        return vec![None; series.len()];
    }

    let mut out = Vec::with_capacity(series.len());
    let mut buf = Vec::with_capacity(window);
    for end in 0..series.len() {
        if end + 1 < window {
            out.push(None);
            continue;
        }

        buf.clear();
        let complete = series[end + 1 - window..=end].iter().all(|v| match v {
            Some(x) => {
                buf.push(*x);
                true
            }
            None => false,
        });

        out.push(if complete { f(&buf) } else { None });
    }
    out
}
