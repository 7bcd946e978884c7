pub mod candidates;
pub mod color;
pub mod contours;
pub mod features;
pub mod morphology;
pub mod roi;
pub mod rules;
pub mod segmentation;
pub mod xray;

pub use candidates::{candidate_mask, extract_candidates};
pub use features::measure;
pub use roi::extract_roi;
pub use rules::{Cascade, ClassificationRule, RuleContext, RuleOutcome};
pub use segmentation::segment_board;
pub use xray::PinXRay;
