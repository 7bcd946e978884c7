pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod render;

pub use config::{
    CandidateConfig, ClassificationConfig, ColorBand, DetectionConfig, RuleToggles,
    SegmentationConfig,
};
pub use error::{BoardScanError, Result};
pub use models::{
    Analysis, BoundingBox, Candidate, Classified, ComponentDetection, DetectionResult, Mask,
    Verdict,
};
pub use pipeline::ComponentPipeline;
