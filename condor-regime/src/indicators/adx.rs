//! Average Directional Index.
//!
//! Directional movement is summed (not smoothed) over the window:
//!
//! 1. `up = high[i] - high[i-1]`, `down = low[i-1] - low[i]`
//! 2. `+DM = up` when `up > down && up > 0`, else 0 (mirrored for `-DM`)
//! 3. `+DI = 100 * sum(+DM) / sum(TR)`, `-DI` likewise
//! 4. `DX = 100 * |+DI - -DI| / (+DI + -DI)`
//! 5. `ADX = mean(DX)` over the same window
//!
//! A zero true-range sum or a zero DI sum leaves that position `None`
//! instead of dividing by zero. On clean data the first ADX value appears at
//! index `2 * window - 1`.

use serde::Serialize;

use crate::data::Bar;

use super::stats::{rolling_mean, rolling_sum, Series};

/// ADX output, every series aligned to the input bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdxSeries {
    pub plus_di: Series,
    pub minus_di: Series,
    pub dx: Series,
    pub adx: Series,
    /// Positions where a complete window had a zero divisor.
    pub degenerate_positions: usize,
}

impl AdxSeries {
    /// Latest ADX value, if any.
    pub fn last(&self) -> Option<f64> {
        self.adx.last().copied().flatten()
    }
}

/// Plus and minus directional movement. Position 0 is `None`.
pub fn directional_movement(bars: &[Bar]) -> (Series, Series) {
    let mut plus = Vec::with_capacity(bars.len());
    let mut minus = Vec::with_capacity(bars.len());
    if bars.is_empty() {
        return (plus, minus);
    }

    plus.push(None);
    minus.push(None);
    for w in bars.windows(2) {
        let up = w[1].high() - w[0].high();
        let down = w[0].low() - w[1].low();

        plus.push(Some(if up > down && up > 0.0 { up } else { 0.0 }));
        minus.push(Some(if down > up && down > 0.0 { down } else { 0.0 }));
    }
    (plus, minus)
}

/// Compute ADX from bars and their precomputed true range.
pub fn adx(bars: &[Bar], true_range: &[Option<f64>], window: usize) -> AdxSeries {
    let (plus_dm, minus_dm) = directional_movement(bars);

    let plus_sum = rolling_sum(&plus_dm, window);
    let minus_sum = rolling_sum(&minus_dm, window);
    let tr_sum = rolling_sum(true_range, window);

    let mut degenerate_positions = 0;
    let mut plus_di = Vec::with_capacity(bars.len());
    let mut minus_di = Vec::with_capacity(bars.len());
    let mut dx = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        let (pdi, mdi) = match (plus_sum[i], minus_sum[i], tr_sum[i]) {
            (Some(_), Some(_), Some(tr)) if tr == 0.0 => {
                degenerate_positions += 1;
                (None, None)
            }
            (Some(p), Some(m), Some(tr)) => (Some(100.0 * p / tr), Some(100.0 * m / tr)),
            _ => (None, None),
        };

        let dx_value = match (pdi, mdi) {
            (Some(p), Some(m)) if p + m == 0.0 => {
                degenerate_positions += 1;
                None
            }
            (Some(p), Some(m)) => Some(100.0 * (p - m).abs() / (p + m)),
            _ => None,
        };

        plus_di.push(pdi);
        minus_di.push(mdi);
        dx.push(dx_value);
    }

    let adx = rolling_mean(&dx, window);

    AdxSeries {
        plus_di,
        minus_di,
        dx,
        adx,
        degenerate_positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::range::true_range;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn bar(i: usize, o: f64, h: f64, l: f64, c: f64) -> Bar {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Bar::new(start + Duration::days(i as i64), o, h, l, c).unwrap()
    }

    fn run(bars: &[Bar], window: usize) -> AdxSeries {
        adx(bars, &true_range(bars), window)
    }

    fn trending_up(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let c = 100.0 + i as f64;
                bar(i, c - 0.5, c + 1.0, c - 1.0, c)
            })
            .collect()
    }

    /// Deterministic zig-zag with a mild drift.
    fn choppy(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let swing = [0.0, 2.5, -1.0, 3.0, -2.0, 1.5, -0.5][i % 7];
                let c = 100.0 + 0.1 * i as f64 + swing;
                let range = 1.0 + (i % 3) as f64 * 0.5;
                bar(i, c, c + range, c - range, c)
            })
            .collect()
    }

    #[test]
    fn test_directional_movement() {
        let bars = vec![
            bar(0, 100.0, 101.0, 99.0, 100.0),
            // up 2, down -1 -> +DM 2
            bar(1, 101.0, 103.0, 100.0, 102.0),
            // up -2, down 3 -> -DM 3
            bar(2, 99.0, 101.0, 97.0, 98.0),
            // inside day: up -1, down -1 -> neither
            bar(3, 98.0, 100.0, 98.0, 99.0),
        ];
        let (plus, minus) = directional_movement(&bars);
        assert_eq!(plus, vec![None, Some(2.0), Some(0.0), Some(0.0)]);
        assert_eq!(minus, vec![None, Some(0.0), Some(3.0), Some(0.0)]);
    }

    #[test]
    fn test_equal_moves_produce_no_directional_movement() {
        let bars = vec![
            bar(0, 100.0, 101.0, 99.0, 100.0),
            // Outside day expanding 1 both ways.
            bar(1, 100.0, 102.0, 98.0, 100.0),
        ];
        let (plus, minus) = directional_movement(&bars);
        assert_eq!(plus[1], Some(0.0));
        assert_eq!(minus[1], Some(0.0));
    }

    #[test]
    fn test_first_defined_index() {
        let window = 5;
        let result = run(&trending_up(20), window);

        assert!(result.adx[..2 * window - 1].iter().all(Option::is_none));
        assert!(result.adx[2 * window - 1..].iter().all(Option::is_some));
        assert!(result.dx[..window].iter().all(Option::is_none));
        assert!(result.dx[window].is_some());
    }

    #[test]
    fn test_pure_uptrend_is_maximal() {
        let result = run(&trending_up(20), 5);

        // Every bar adds +DM only, so -DI is zero and DX is 100.
        assert_relative_eq!(result.minus_di[19].unwrap(), 0.0);
        assert_relative_eq!(result.last().unwrap(), 100.0);
        assert_eq!(result.degenerate_positions, 0);
    }

    #[test]
    fn test_short_series_is_undefined() {
        let result = run(&trending_up(27), 14);
        assert!(result.adx.iter().all(Option::is_none));

        let result = run(&trending_up(28), 14);
        assert!(result.adx[27].is_some());
    }

    #[test]
    fn test_flat_market_is_degenerate() {
        let bars: Vec<Bar> = (0..40).map(|i| bar(i, 50.0, 50.0, 50.0, 50.0)).collect();
        let result = run(&bars, 14);

        assert!(result.plus_di.iter().all(Option::is_none));
        assert!(result.dx.iter().all(Option::is_none));
        assert!(result.adx.iter().all(Option::is_none));
        assert_eq!(result.degenerate_positions, 40 - 14);
    }

    #[test]
    fn test_range_without_direction_is_degenerate_dx() {
        // Identical bars with non-zero range: TR > 0 but no directional move.
        let bars: Vec<Bar> = (0..12).map(|i| bar(i, 50.0, 51.0, 49.0, 50.0)).collect();
        let result = run(&bars, 4);

        assert_relative_eq!(result.plus_di[11].unwrap(), 0.0);
        assert_relative_eq!(result.minus_di[11].unwrap(), 0.0);
        assert_eq!(result.dx[11], None);
        assert_eq!(result.adx[11], None);
        assert_eq!(result.degenerate_positions, 12 - 4);
    }

    #[test]
    fn test_degenerate_dx_poisons_adx_window() {
        let mut bars: Vec<Bar> = (0..8).map(|i| bar(i, 50.0, 51.0, 49.0, 50.0)).collect();
        bars.extend((8..16).map(|i| {
            let c = 50.0 + (i - 7) as f64;
            bar(i, c, c + 1.0, c - 1.0, c)
        }));
        let result = run(&bars, 4);

        // DX at 4..=7 is degenerate; ADX needs four clean DX values after it.
        assert!(result.dx[4..8].iter().all(Option::is_none));
        assert!(result.adx[..11].iter().all(Option::is_none));
        assert!(result.adx[11].is_some());
    }

    #[test]
    fn test_adx_bounded() {
        for window in [3, 5, 14] {
            let result = run(&choppy(120), window);
            let defined: Vec<f64> = result.adx.iter().flatten().copied().collect();
            assert!(!defined.is_empty());
            for value in defined {
                assert!(value.is_finite());
                assert!((0.0..=100.0).contains(&value), "ADX {} out of range", value);
            }
            for value in result.dx.iter().flatten() {
                assert!((0.0..=100.0).contains(value));
            }
        }
    }

    #[test]
    fn test_hand_computed_window() {
        let bars = vec![
            bar(0, 10.0, 11.0, 9.0, 10.0),
            bar(1, 10.0, 12.0, 10.0, 11.0),
            bar(2, 11.0, 11.5, 8.0, 9.0),
            bar(3, 9.0, 10.0, 8.5, 9.5),
        ];
        let result = run(&bars, 3);

        // +DM: 1, 0, 0   -DM: 0, 2, 0   TR: 2, 3.5, 1.5
        let tr_sum = 7.0;
        let pdi = 100.0 * 1.0 / tr_sum;
        let mdi = 100.0 * 2.0 / tr_sum;
        assert_relative_eq!(result.plus_di[3].unwrap(), pdi, epsilon = 1e-12);
        assert_relative_eq!(result.minus_di[3].unwrap(), mdi, epsilon = 1e-12);
        assert_relative_eq!(
            result.dx[3].unwrap(),
            100.0 * (pdi - mdi).abs() / (pdi + mdi),
            epsilon = 1e-12
        );
    }
}
