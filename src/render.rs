use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use log::info;

use crate::models::{Analysis, DetectionResult};

const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const CENTER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const BOX_THICKNESS: i32 = 2;
const CENTER_RADIUS: i32 = 3;

/// Copy of the image with a box around each accepted component and a dot at its center.
pub fn annotate(img: &RgbImage, result: &DetectionResult) -> RgbImage {
    let mut out = img.clone();
    for component in &result.components {
        let b = component.bbox;
        for t in 0..BOX_THICKNESS {
            let rect = Rect::at(b.x as i32 - t, b.y as i32 - t)
                .of_size(b.width + 2 * t as u32, b.height + 2 * t as u32);
            draw_hollow_rect_mut(&mut out, rect, BOX_COLOR);
        }
        let (cx, cy) = component.center;
        draw_filled_circle_mut(&mut out, (cx as i32, cy as i32), CENTER_RADIUS, CENTER_COLOR);
    }
    out
}

/// Writes the intermediate masks of a run for inspection.
#[derive(Debug, Clone)]
pub struct DebugWriter {
    output_dir: PathBuf,
}

impl DebugWriter {
    /// The directory must be empty or non-existent; it is created if missing.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)
                .with_context(|| format!("Failed to read {}", output_dir.display()))?;
            if entries.count() > 0 {
                anyhow::bail!("Debug directory is not empty: {}", output_dir.display());
            }
        } else {
            std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("Failed to create {}", output_dir.display()))?;
        }
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn write(&self, analysis: &Analysis) -> Result<()> {
        let masks = [
            ("01_board_mask.png", &analysis.board_mask),
            ("02_roi_mask.png", &analysis.roi_mask),
            ("03_candidate_mask.png", &analysis.candidate_mask),
        ];
        for (name, mask) in masks {
            let path = self.output_dir.join(name);
            mask.save(&path)
                .with_context(|| format!("Failed to save debug image {}", path.display()))?;
        }

        let verdicts: Vec<serde_json::Value> = analysis
            .classified
            .iter()
            .map(|c| {
                serde_json::json!({
                    "index": c.candidate.index,
                    "bbox": c.candidate.bbox,
                    "area": c.candidate.area,
                    "mean_intensity": c.candidate.mean_intensity,
                    "solidity": c.candidate.solidity,
                    "circularity": c.candidate.circularity,
                    "aspect_ratio": c.candidate.aspect_ratio,
                    "pin_count": c.pin_count,
                    "verdict": c.verdict,
                    "rule": c.rule,
                })
            })
            .collect();
        let path = self.output_dir.join("04_verdicts.json");
        std::fs::write(&path, serde_json::to_string_pretty(&verdicts)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!("Debug output written to {}", self.output_dir.display());
        Ok(())
    }
}
