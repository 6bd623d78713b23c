// Analysis stages: context -> detectors -> scoring -> lifecycle
pub mod context;
pub mod detectors;
pub mod lifecycle;
pub mod scoring;
pub mod swing;

// Re-export commonly used types
pub use context::MarketContext;
pub use detectors::{DetectorOutput, ZoneCandidate, run_detectors};
pub use swing::SwingTracker;
