//! Multi-instrument assessment.

use rayon::prelude::*;
use tracing::info;

use crate::config::EngineConfig;
use crate::data::{BarSeries, VolatilityProxySeries};

use super::pipeline::{compute, Assessment};
use super::EngineResult;

/// Bars for one instrument with its optional volatility proxy.
#[derive(Debug, Clone)]
pub struct InstrumentData {
    pub bars: BarSeries,
    pub proxy: Option<VolatilityProxySeries>,
}

impl InstrumentData {
    pub fn new(bars: BarSeries, proxy: Option<VolatilityProxySeries>) -> Self {
        Self { bars, proxy }
    }

    pub fn instrument(&self) -> &str {
        self.bars.instrument()
    }
}

/// Assess every instrument in parallel. Results keep the input order and
/// one instrument failing does not affect the others.
pub fn assess_many(
    instruments: &[InstrumentData],
    config: &EngineConfig,
) -> Vec<EngineResult<Assessment>> {
    info!("Assessing {} instruments", instruments.len());

    let results: Vec<EngineResult<Assessment>> = instruments
        .par_iter()
        .map(|data| compute(&data.bars, data.proxy.as_ref(), config))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(
        "Assessed {}/{} instruments",
        results.len() - failed,
        results.len()
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pipeline::tests::rising_bars;
    use crate::engine::EngineError;

    #[test]
    fn test_batch_keeps_order_and_isolates_failures() {
        let config = EngineConfig::default();
        let instruments = vec![
            InstrumentData::new(rising_bars("SPY", 60), None),
            InstrumentData::new(BarSeries::new("EMPTY", vec![]).unwrap(), None),
            InstrumentData::new(rising_bars("QQQ", 30), None),
        ];

        let results = assess_many(&instruments, &config);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().instrument, "SPY");
        assert!(matches!(results[1], Err(EngineError::EmptySeries { .. })));
        assert_eq!(results[2].as_ref().unwrap().instrument, "QQQ");
    }

    #[test]
    fn test_batch_matches_single_instrument() {
        let config = EngineConfig::default();
        let bars = rising_bars("SPY", 60);
        let single = compute(&bars, None, &config).unwrap();

        let results = assess_many(&[InstrumentData::new(bars, None)], &config);
        assert_eq!(results[0].as_ref().unwrap(), &single);
    }
}
