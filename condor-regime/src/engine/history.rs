//! Regime history over every bar, and per-profile statistics.

use std::collections::HashMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::data::{BarSeries, VolatilityProxySeries};
use crate::regime::{classify, Regime};
use crate::strategy::{select_profile, StrategyProfile};

use super::pipeline::IndicatorSet;
use super::{EngineError, EngineResult};

/// Regime on a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub regime: Regime,
    pub profile: StrategyProfile,
    pub adx: Option<f64>,
    pub realized_vol: Option<f64>,
}

/// Time spent in one strategy profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimeStats {
    pub profile: StrategyProfile,
    pub days: usize,
    pub pct_of_total: f64,
    /// Mean ADX over the days where it was defined.
    pub avg_adx: Option<f64>,
    pub avg_realized_vol: Option<f64>,
}

/// Regime classification of every bar of one instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimeHistory {
    pub instrument: String,
    pub entries: Vec<HistoryEntry>,
}

impl RegimeHistory {
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Number of bars on which the profile differs from the bar before.
    pub fn profile_changes(&self) -> usize {
        self.entries
            .windows(2)
            .filter(|w| w[0].profile != w[1].profile)
            .count()
    }

    /// Consecutive bars, ending at the latest, spent in the current profile.
    pub fn current_streak(&self) -> usize {
        match self.entries.last() {
            Some(last) => self
                .entries
                .iter()
                .rev()
                .take_while(|e| e.profile == last.profile)
                .count(),
            None => 0,
        }
    }

    pub fn stats(&self) -> HashMap<StrategyProfile, RegimeStats> {
        let total_days = self.entries.len();
        let mut stats: HashMap<StrategyProfile, RegimeStats> = HashMap::new();
        let mut sums: HashMap<StrategyProfile, (f64, usize, f64, usize)> = HashMap::new();

        for entry in &self.entries {
            let stat = stats.entry(entry.profile).or_insert_with(|| RegimeStats {
                profile: entry.profile,
                days: 0,
                pct_of_total: 0.0,
                avg_adx: None,
                avg_realized_vol: None,
            });
            stat.days += 1;

            let sum = sums.entry(entry.profile).or_insert((0.0, 0, 0.0, 0));
            if let Some(adx) = entry.adx {
                sum.0 += adx;
                sum.1 += 1;
            }
            if let Some(rv) = entry.realized_vol {
                sum.2 += rv;
                sum.3 += 1;
            }
        }

        for stat in stats.values_mut() {
            stat.pct_of_total = stat.days as f64 / total_days as f64 * 100.0;
            if let Some(&(adx_sum, adx_n, rv_sum, rv_n)) = sums.get(&stat.profile) {
                stat.avg_adx = (adx_n > 0).then(|| adx_sum / adx_n as f64);
                stat.avg_realized_vol = (rv_n > 0).then(|| rv_sum / rv_n as f64);
            }
        }

        stats
    }
}

/// Classify every bar of the series. Bars are classified in parallel; the
/// result is in bar order.
pub fn classify_history(
    bars: &BarSeries,
    proxy: Option<&VolatilityProxySeries>,
    config: &EngineConfig,
) -> EngineResult<RegimeHistory> {
    config.validate()?;
    if bars.is_empty() {
        return Err(EngineError::EmptySeries {
            instrument: bars.instrument().to_string(),
        });
    }

    let indicators = IndicatorSet::compute(bars, proxy, &config.windows);
    let entries: Vec<HistoryEntry> = (0..indicators.len())
        .into_par_iter()
        .filter_map(|i| indicators.snapshot_at(i))
        .map(|snapshot| {
            let regime = classify(&snapshot, &config.thresholds);
            HistoryEntry {
                date: snapshot.date,
                regime,
                profile: select_profile(&regime),
                adx: snapshot.adx,
                realized_vol: snapshot.realized_vol,
            }
        })
        .collect();

    debug!(
        instrument = bars.instrument(),
        entries = entries.len(),
        "Regime history classified"
    );

    Ok(RegimeHistory {
        instrument: bars.instrument().to_string(),
        entries,
    })
}
