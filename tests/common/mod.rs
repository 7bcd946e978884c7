mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from boardscan for tests
pub use boardscan::{
    Analysis, BoardScanError, ClassificationConfig, ComponentPipeline, DetectionConfig,
    DetectionResult, RuleToggles, Verdict,
};
