//! Single-instrument indicator pipeline.
//!
//! Bars flow one way through the stages:
//! 1. Statistics: returns, moving averages, realized volatility
//! 2. Range and trend: true range, ATR, ADX
//! 3. Volatility comparison against the optional proxy
//! 4. Regime classification and delta-band mapping of the latest bar
//!
//! Nothing here mutates its inputs, reads a clock, or draws random numbers,
//! so identical inputs always produce identical assessments.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::analytics::{compare, AlignmentStatus, VolatilityComparison};
use crate::config::{EngineConfig, MaChoice, VolWindow, WindowConfig};
use crate::data::{BarSeries, VolatilityProxySeries};
use crate::indicators::{
    adx, aligned_returns, annualize, atr, atr_pct, linear_slope, rolling_mean, rolling_std,
    true_range, AdxSeries, Series, MIN_SLOPE_POINTS,
};
use crate::regime::{classify, IndicatorSnapshot, Regime};
use crate::strategy::{recommend, DeltaBandRecommendation};

use super::{EngineError, EngineResult};

/// Non-fatal data problems found while computing indicators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityEvent {
    /// Fewer bars than the indicator's warm-up period.
    InsufficientHistory {
        indicator: &'static str,
        required: usize,
        available: usize,
    },
    /// Windows whose divisor was zero; their values were left undefined.
    DegenerateWindow {
        indicator: &'static str,
        positions: usize,
    },
    /// The proxy series shares no dates with the bars.
    MisalignedProxy { proxy: String },
}

impl DataQualityEvent {
    pub fn description(&self) -> String {
        match self {
            Self::InsufficientHistory {
                indicator,
                required,
                available,
            } => format!("{indicator}: needs {required} bars, have {available}"),
            Self::DegenerateWindow {
                indicator,
                positions,
            } => format!("{indicator}: {positions} windows with a zero divisor"),
            Self::MisalignedProxy { proxy } => {
                format!("{proxy}: no dates in common with the bar series")
            }
        }
    }
}

/// Every indicator series for one instrument, index-aligned to its bars.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
    pub returns: Series,
    pub ma_short: Series,
    pub ma_medium: Series,
    pub ma_long: Series,
    /// Annualized.
    pub rv_short: Series,
    /// Annualized.
    pub rv_long: Series,
    pub true_range: Series,
    pub atr: Series,
    pub atr_pct: Series,
    pub adx: AdxSeries,
    pub volatility: VolatilityComparison,
    proxy_instrument: Option<String>,
    windows: WindowConfig,
}

impl IndicatorSet {
    /// Run the statistics, range/trend and comparison stages.
    pub fn compute(
        bars: &BarSeries,
        proxy: Option<&VolatilityProxySeries>,
        windows: &WindowConfig,
    ) -> Self {
        debug!(
            instrument = bars.instrument(),
            bars = bars.len(),
            "Computing indicators"
        );

        let closes = bars.closes();
        let close_series: Series = closes.iter().copied().map(Some).collect();
        let returns = aligned_returns(&closes);

        let annualized = |window: usize| -> Series {
            rolling_std(&returns, window)
                .into_iter()
                .map(|std| std.map(|s| annualize(s, windows.periods_per_year)))
                .collect()
        };
        let rv_short = annualized(windows.rv_short);
        let rv_long = annualized(windows.rv_long);

        let tr = true_range(bars.bars());
        let atr_series = atr(&tr, windows.atr);
        let atr_pct_series = atr_pct(&atr_series, &closes);
        let adx_series = adx(bars.bars(), &tr, windows.adx);

        let realized = match windows.regime_vol {
            VolWindow::Short => &rv_short,
            VolWindow::Long => &rv_long,
        };
        let volatility = compare(bars, realized, proxy);

        Self {
            dates: bars.dates(),
            ma_short: rolling_mean(&close_series, windows.ma_short),
            ma_medium: rolling_mean(&close_series, windows.ma_medium),
            ma_long: rolling_mean(&close_series, windows.ma_long),
            closes,
            returns,
            rv_short,
            rv_long,
            true_range: tr,
            atr: atr_series,
            atr_pct: atr_pct_series,
            adx: adx_series,
            volatility,
            proxy_instrument: proxy.map(|p| p.instrument().to_string()),
            windows: windows.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The moving average trend is measured against.
    pub fn reference_ma(&self) -> &Series {
        match self.windows.reference_ma {
            MaChoice::Short => &self.ma_short,
            MaChoice::Medium => &self.ma_medium,
            MaChoice::Long => &self.ma_long,
        }
    }

    /// The realized volatility series the classifier reads.
    pub fn realized_vol(&self) -> &Series {
        match self.windows.regime_vol {
            VolWindow::Short => &self.rv_short,
            VolWindow::Long => &self.rv_long,
        }
    }

    /// Snapshot of every indicator at bar `index`.
    pub fn snapshot_at(&self, index: usize) -> Option<IndicatorSnapshot> {
        let date = *self.dates.get(index)?;
        let close = self.closes[index];
        let reference = self.reference_ma();
        let reference_ma = reference[index];

        // The reference MA has no gaps after warm-up, so the last
        // `slope_lookback` positions hold the last present values.
        let lookback = self.windows.slope_lookback;
        let start = (index + 1).saturating_sub(lookback);
        let ma_slope = reference_ma.and_then(|_| linear_slope(&reference[start..=index], lookback));
        let ma_distance_pct = reference_ma
            .filter(|ma| *ma != 0.0)
            .map(|ma| (close - ma).abs() / ma * 100.0);

        Some(IndicatorSnapshot {
            date,
            close,
            daily_return: self.returns[index],
            ma_short: self.ma_short[index],
            ma_medium: self.ma_medium[index],
            ma_long: self.ma_long[index],
            reference_ma,
            ma_slope,
            ma_distance_pct,
            rv_short: self.rv_short[index],
            rv_long: self.rv_long[index],
            realized_vol: self.realized_vol()[index],
            atr: self.atr[index],
            atr_pct: self.atr_pct[index],
            adx: self.adx.adx[index],
            plus_di: self.adx.plus_di[index],
            minus_di: self.adx.minus_di[index],
            iv_proxy: self.volatility.iv_proxy[index],
            iv_minus_rv: self.volatility.spread[index],
        })
    }

    /// Snapshot of the most recent bar.
    pub fn latest(&self) -> Option<IndicatorSnapshot> {
        self.len().checked_sub(1).and_then(|i| self.snapshot_at(i))
    }

    /// Warm-up length of each indicator, in bars.
    pub fn required_bars(&self) -> Vec<(&'static str, usize)> {
        let w = &self.windows;
        let reference_window = match w.reference_ma {
            MaChoice::Short => w.ma_short,
            MaChoice::Medium => w.ma_medium,
            MaChoice::Long => w.ma_long,
        };
        let slope_points = MIN_SLOPE_POINTS.max(w.slope_lookback / 2);

        vec![
            ("ma_short", w.ma_short),
            ("ma_medium", w.ma_medium),
            ("ma_long", w.ma_long),
            ("ma_slope", reference_window + slope_points - 1),
            ("rv_short", w.rv_short + 1),
            ("rv_long", w.rv_long + 1),
            ("atr", w.atr + 1),
            ("adx", 2 * w.adx),
        ]
    }

    /// Data-quality problems in the computed series.
    pub fn quality_events(&self) -> Vec<DataQualityEvent> {
        let available = self.len();
        let mut events: Vec<DataQualityEvent> = self
            .required_bars()
            .into_iter()
            .filter(|(_, required)| *required > available)
            .map(|(indicator, required)| DataQualityEvent::InsufficientHistory {
                indicator,
                required,
                available,
            })
            .collect();

        if self.adx.degenerate_positions > 0 {
            events.push(DataQualityEvent::DegenerateWindow {
                indicator: "adx",
                positions: self.adx.degenerate_positions,
            });
        }

        if self.volatility.status == AlignmentStatus::Misaligned {
            events.push(DataQualityEvent::MisalignedProxy {
                proxy: self.proxy_instrument.clone().unwrap_or_default(),
            });
        }
        events
    }
}

/// Everything known about one instrument at its latest bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub instrument: String,
    pub snapshot: IndicatorSnapshot,
    pub regime: Regime,
    pub recommendation: DeltaBandRecommendation,
    pub alignment: AlignmentStatus,
    pub events: Vec<DataQualityEvent>,
}

impl Assessment {
    pub fn summary(&self) -> String {
        format!(
            "{} as of {}\n{}\nBands: {}",
            self.instrument,
            self.snapshot.date,
            self.regime.summary(),
            self.recommendation.summary(),
        )
    }
}

/// Compute the latest snapshot, regime and delta bands for one instrument.
pub fn compute(
    bars: &BarSeries,
    proxy: Option<&VolatilityProxySeries>,
    config: &EngineConfig,
) -> EngineResult<Assessment> {
    config.validate()?;

    let indicators = IndicatorSet::compute(bars, proxy, &config.windows);
    let snapshot = indicators.latest().ok_or_else(|| EngineError::EmptySeries {
        instrument: bars.instrument().to_string(),
    })?;

    let regime = classify(&snapshot, &config.thresholds);
    let recommendation = recommend(&regime, &config.bands);

    let events = indicators.quality_events();
    for event in &events {
        warn!(instrument = bars.instrument(), "{}", event.description());
    }

    debug!(
        instrument = bars.instrument(),
        date = %snapshot.date,
        profile = ?recommendation.profile,
        "Assessment complete"
    );

    Ok(Assessment {
        instrument: bars.instrument().to_string(),
        snapshot,
        regime,
        recommendation,
        alignment: indicators.volatility.status,
        events,
    })
}
