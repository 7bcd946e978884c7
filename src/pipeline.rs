use image::{DynamicImage, GrayImage, RgbImage};
use imageproc::point::Point;
use log::info;

use crate::config::DetectionConfig;
use crate::detection::{
    Cascade, RuleContext, candidate_mask, extract_candidates, extract_roi, measure, segment_board,
};
use crate::error::Result;
use crate::models::{Analysis, Classified, DetectionResult, Verdict};

/// Board component detector.
///
/// Holds one validated configuration and the cascade built from it; every run
/// borrows both read-only, so a pipeline can be reused across images.
pub struct ComponentPipeline {
    config: DetectionConfig,
    cascade: Cascade,
}

impl ComponentPipeline {
    pub fn new(config: DetectionConfig) -> Result<Self> {
        config.validate()?;
        let cascade = Cascade::from_config(&config.classification, &config.rules);
        Ok(Self { config, cascade })
    }

    /// Replace the standard cascade, e.g. to reorder rules or add a custom one.
    pub fn with_cascade(mut self, cascade: Cascade) -> Self {
        self.cascade = cascade;
        self
    }

    /// Run detection and return only the accepted components.
    pub fn detect(&self, img: &DynamicImage) -> Result<DetectionResult> {
        Ok(self.analyze(img)?.result)
    }

    /// Run detection keeping the intermediate masks and every verdict.
    pub fn analyze(&self, img: &DynamicImage) -> Result<Analysis> {
        self.analyze_rgb(&img.to_rgb8())
    }

    pub fn analyze_rgb(&self, img: &RgbImage) -> Result<Analysis> {
        let gray = image::imageops::grayscale(img);

        // Step 1: Board substrate mask
        let board_mask = segment_board(img, &self.config.segmentation)?;

        // Step 2: Region of interest
        let roi_mask = extract_roi(&board_mask)?;

        // Step 3: Candidate regions
        let candidate_mask = candidate_mask(&board_mask, &roi_mask, &self.config.candidates);
        let contours = extract_candidates(&candidate_mask);

        // Step 4 and 5: Features and classification
        let classified = self.classify_all(contours, &gray);
        let result = DetectionResult::from_classified(&classified);

        let analysis = Analysis {
            result,
            board_mask,
            roi_mask,
            candidate_mask,
            classified,
        };
        info!(
            "Classified {} candidates: {} accepted, {} text, {} pins, {} screw holes, {} headers, {} noise",
            analysis.classified.len(),
            analysis.result.count,
            analysis.count_verdict(Verdict::RejectedText),
            analysis.count_verdict(Verdict::RejectedPin),
            analysis.count_verdict(Verdict::RejectedScrewHole),
            analysis.count_verdict(Verdict::RejectedHeader),
            analysis.count_verdict(Verdict::RejectedNoise),
        );
        Ok(analysis)
    }

    #[cfg(not(feature = "parallel"))]
    fn classify_all(&self, contours: Vec<Vec<Point<i32>>>, gray: &GrayImage) -> Vec<Classified> {
        let ctx = RuleContext::new(gray);
        contours
            .into_iter()
            .enumerate()
            .filter_map(|(index, contour)| measure(index, contour, gray))
            .map(|candidate| self.cascade.classify(candidate, &ctx))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn classify_all(&self, contours: Vec<Vec<Point<i32>>>, gray: &GrayImage) -> Vec<Classified> {
        use rayon::prelude::*;

        let ctx = RuleContext::new(gray);
        contours
            .into_par_iter()
            .enumerate()
            .filter_map(|(index, contour)| measure(index, contour, gray))
            .map(|candidate| self.cascade.classify(candidate, &ctx))
            .collect()
    }
}
