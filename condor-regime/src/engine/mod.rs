//! Indicator and regime engine.
//!
//! - `compute`: latest snapshot, regime and delta bands for one instrument
//! - `classify_history`: regime on every bar, with per-profile statistics
//! - `assess_many`: parallel assessment of many instruments

pub mod batch;
pub mod history;
pub mod pipeline;

use thiserror::Error;

use crate::config::ConfigError;

pub use batch::{assess_many, InstrumentData};
pub use history::{classify_history, HistoryEntry, RegimeHistory, RegimeStats};
pub use pipeline::{compute, Assessment, DataQualityEvent, IndicatorSet};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No bars for {instrument}")]
    EmptySeries { instrument: String },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type EngineResult<T> = Result<T, EngineError>;
