//! True range and average true range.

use crate::data::Bar;

use super::stats::{rolling_mean, Series};

/// True range per bar. Position 0 has no previous close and is `None`.
pub fn true_range(bars: &[Bar]) -> Series {
    let mut out = Vec::with_capacity(bars.len());
    if bars.is_empty() {
        return out;
    }

    out.push(None);
    for w in bars.windows(2) {
        let prev_close = w[0].close();
        let bar = &w[1];
        let tr = (bar.high() - bar.low())
            .max((bar.high() - prev_close).abs())
            .max((bar.low() - prev_close).abs());
        out.push(Some(tr));
    }
    out
}

/// Average true range: rolling mean of the true range.
pub fn atr(true_range: &[Option<f64>], window: usize) -> Series {
    rolling_mean(true_range, window)
}

/// ATR as a percentage of the close. `None` where the close is zero.
pub fn atr_pct(atr: &[Option<f64>], closes: &[f64]) -> Series {
    atr.iter()
        .zip(closes)
        .map(|(atr, &close)| match atr {
            Some(a) if close != 0.0 => Some(a / close * 100.0),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn bars(ohlc: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ohlc.iter()
            .enumerate()
            .map(|(i, &(o, h, l, c))| Bar::new(start + Duration::days(i as i64), o, h, l, c).unwrap())
            .collect()
    }

    #[test]
    fn test_true_range_uses_gaps() {
        let tr = true_range(&bars(&[
            (100.0, 101.0, 99.0, 100.0),
            // Plain range.
            (100.0, 102.0, 99.5, 101.0),
            // Gap up: high - prev close dominates.
            (105.0, 106.0, 104.0, 105.5),
            // Gap down: |low - prev close| dominates.
            (101.0, 102.0, 100.0, 101.0),
        ]));

        assert_eq!(tr[0], None);
        assert_relative_eq!(tr[1].unwrap(), 2.5);
        assert_relative_eq!(tr[2].unwrap(), 5.0);
        assert_relative_eq!(tr[3].unwrap(), 5.5);
    }

    #[test]
    fn test_true_range_empty() {
        assert!(true_range(&[]).is_empty());
    }

    #[test]
    fn test_duplicate_day_lowers_atr() {
        let series = bars(&[
            (100.0, 101.0, 99.0, 100.0),
            (100.0, 102.0, 99.0, 101.0),
            (101.0, 103.0, 100.0, 102.0),
            (102.0, 104.0, 101.0, 103.0),
            // Flat at the previous close: zero true range.
            (103.0, 103.0, 103.0, 103.0),
        ]);
        let tr = true_range(&series);
        assert_eq!(tr[4], Some(0.0));

        let with_flat_day = atr(&tr, 3)[4].unwrap();
        let without_flat_day = atr(&tr[..4], 3)[3].unwrap();
        assert!(with_flat_day < without_flat_day);
    }

    #[test]
    fn test_atr_pct() {
        let pct = atr_pct(&[None, Some(2.0), Some(1.0)], &[100.0, 200.0, 0.0]);
        assert_eq!(pct[0], None);
        assert_relative_eq!(pct[1].unwrap(), 1.0);
        assert_eq!(pct[2], None);
    }
}
