//! Point-in-time indicator values.

use chrono::NaiveDate;
use serde::Serialize;

/// All indicator values at one bar. `None` means not yet computable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub daily_return: Option<f64>,

    pub ma_short: Option<f64>,
    pub ma_medium: Option<f64>,
    pub ma_long: Option<f64>,
    /// The moving average trend is measured against.
    pub reference_ma: Option<f64>,
    /// OLS slope of the reference MA, price units per bar.
    pub ma_slope: Option<f64>,
    /// `|close - reference_ma| / reference_ma * 100`.
    pub ma_distance_pct: Option<f64>,

    /// Annualized realized volatility, fractions.
    pub rv_short: Option<f64>,
    pub rv_long: Option<f64>,
    /// Whichever of the two feeds the classifier and the spread.
    pub realized_vol: Option<f64>,

    pub atr: Option<f64>,
    pub atr_pct: Option<f64>,
    pub adx: Option<f64>,
    pub plus_di: Option<f64>,
    pub minus_di: Option<f64>,

    /// Volatility index level as a fraction.
    pub iv_proxy: Option<f64>,
    pub iv_minus_rv: Option<f64>,
}

impl IndicatorSnapshot {
    /// Whether the close sits above the reference MA.
    pub fn above_reference_ma(&self) -> Option<bool> {
        self.reference_ma.map(|ma| self.close > ma)
    }

    /// Names of the fields that are still not computable.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("daily_return", self.daily_return),
            ("ma_short", self.ma_short),
            ("ma_medium", self.ma_medium),
            ("ma_long", self.ma_long),
            ("ma_slope", self.ma_slope),
            ("rv_short", self.rv_short),
            ("rv_long", self.rv_long),
            ("atr", self.atr),
            ("adx", self.adx),
            ("iv_proxy", self.iv_proxy),
            ("iv_minus_rv", self.iv_minus_rv),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields() {
        let snapshot = IndicatorSnapshot {
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            close: 100.0,
            daily_return: Some(0.01),
            ma_short: Some(99.0),
            ma_medium: None,
            ma_long: None,
            reference_ma: Some(99.0),
            ma_slope: Some(0.2),
            ma_distance_pct: Some(1.0),
            rv_short: Some(0.12),
            rv_long: None,
            realized_vol: Some(0.12),
            atr: Some(1.5),
            atr_pct: Some(1.5),
            adx: None,
            plus_di: None,
            minus_di: None,
            iv_proxy: None,
            iv_minus_rv: None,
        };

        assert_eq!(
            snapshot.missing_fields(),
            vec!["ma_medium", "ma_long", "rv_long", "adx", "iv_proxy", "iv_minus_rv"]
        );
        assert_eq!(snapshot.above_reference_ma(), Some(true));
    }
}
