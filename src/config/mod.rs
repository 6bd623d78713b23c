//! Configuration module for the structure-scout engine.

pub mod analysis;
pub mod instrument;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig, DetectorSettings, OutputSettings, ScoreWeights};
pub use instrument::{EngineSettings, InstrumentProfile, LabelingMode};
