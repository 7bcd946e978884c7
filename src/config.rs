use serde::{Deserialize, Serialize};

use crate::error::{BoardScanError, Result};

/// Inclusive HSV band describing the board substrate color.
///
/// Hue is on the 0..=179 half-degree scale, saturation and value on 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorBand {
    pub hue_low: u8,
    pub hue_high: u8,
    pub sat_low: u8,
    pub sat_high: u8,
    pub val_low: u8,
    pub val_high: u8,
}

impl ColorBand {
    /// Teal band covering dark green through light blue solder mask.
    pub const TEAL: ColorBand = ColorBand {
        hue_low: 35,
        hue_high: 100,
        sat_low: 50,
        sat_high: 255,
        val_low: 50,
        val_high: 255,
    };

    pub fn contains(&self, hue: u8, sat: u8, val: u8) -> bool {
        (self.hue_low..=self.hue_high).contains(&hue)
            && (self.sat_low..=self.sat_high).contains(&sat)
            && (self.val_low..=self.val_high).contains(&val)
    }

    pub fn validate(&self) -> Result<()> {
        if self.hue_high > 179 {
            return Err(BoardScanError::config("hue_high", "must be at most 179"));
        }
        let bounds = [
            ("hue", self.hue_low, self.hue_high),
            ("saturation", self.sat_low, self.sat_high),
            ("value", self.val_low, self.val_high),
        ];
        for (channel, low, high) in bounds {
            if low > high {
                return Err(BoardScanError::config(
                    format!("color_band.{channel}"),
                    format!("is empty (low {low} > high {high})"),
                ));
            }
        }
        Ok(())
    }
}

impl Default for ColorBand {
    fn default() -> Self {
        Self::TEAL
    }
}

/// Board segmentation and morphological cleanup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    pub color_band: ColorBand,
    /// Side of the square structuring element; must be odd.
    pub kernel_size: u8,
    pub close_iterations: u32,
    pub open_iterations: u32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            color_band: ColorBand::TEAL,
            kernel_size: 3,
            close_iterations: 2,
            open_iterations: 1,
        }
    }
}

/// Candidate mask denoising.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateConfig {
    pub kernel_size: u8,
    pub open_iterations: u32,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            kernel_size: 3,
            open_iterations: 1,
        }
    }
}

/// Thresholds used by the classification cascade and the X-ray inspector.
///
/// These are empirical defaults for one board family and lighting setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub min_area: f64,
    /// Upper area limit as a fraction of the whole image area.
    pub max_area_fraction: f64,
    pub min_dim: u32,
    pub bright_threshold: f64,
    pub logo_min_area: f64,
    pub logo_brightness: f64,
    pub mid_area_threshold: f64,
    pub metal_threshold: f64,
    pub round_threshold: f64,
    pub hole_brightness_threshold: f64,
    pub max_aspect: f64,
    pub min_solidity: f64,
    pub dark_threshold: f64,
    pub xray_min_area: f64,
    pub pin_brightness: u8,
    pub pin_noise_area: f64,
    pub header_min_pins: usize,
    pub mid_tone_max: f64,
    pub mid_area_min: f64,
    pub large_area_min: f64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            min_area: 50.0,
            max_area_fraction: 0.8,
            min_dim: 5,
            bright_threshold: 190.0,
            logo_min_area: 400.0,
            logo_brightness: 190.0,
            mid_area_threshold: 200.0,
            metal_threshold: 160.0,
            round_threshold: 0.8,
            hole_brightness_threshold: 120.0,
            max_aspect: 4.0,
            min_solidity: 0.6,
            dark_threshold: 100.0,
            xray_min_area: 400.0,
            pin_brightness: 150,
            pin_noise_area: 5.0,
            header_min_pins: 3,
            mid_tone_max: 180.0,
            mid_area_min: 350.0,
            large_area_min: 800.0,
        }
    }
}

/// Switches for each rule of the cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleToggles {
    pub size_gate: bool,
    pub dimension_gate: bool,
    pub brightness_gate: bool,
    /// Older large-and-bright filter, subsumed by the brightness gate at default thresholds.
    pub logo_gate: bool,
    pub pin_gate: bool,
    pub screw_hole_gate: bool,
    pub shape_gate: bool,
    pub header_xray_gate: bool,
    pub whitelist: bool,
}

impl Default for RuleToggles {
    fn default() -> Self {
        Self {
            size_gate: true,
            dimension_gate: true,
            brightness_gate: true,
            logo_gate: false,
            pin_gate: true,
            screw_hole_gate: true,
            shape_gate: true,
            header_xray_gate: true,
            whitelist: true,
        }
    }
}

/// Every tunable of a detection run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub segmentation: SegmentationConfig,
    pub candidates: CandidateConfig,
    pub classification: ClassificationConfig,
    pub rules: RuleToggles,
}

impl DetectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color_band(mut self, band: ColorBand) -> Self {
        self.segmentation.color_band = band;
        self
    }

    pub fn with_classification(mut self, classification: ClassificationConfig) -> Self {
        self.classification = classification;
        self
    }

    pub fn with_rules(mut self, rules: RuleToggles) -> Self {
        self.rules = rules;
        self
    }

    /// Parse a (possibly partial) JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| BoardScanError::config("json", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.segmentation.color_band.validate()?;
        check_kernel("segmentation.kernel_size", self.segmentation.kernel_size)?;
        check_kernel("candidates.kernel_size", self.candidates.kernel_size)?;

        let c = &self.classification;
        if !(c.max_area_fraction > 0.0 && c.max_area_fraction <= 1.0) {
            return Err(BoardScanError::config(
                "classification.max_area_fraction",
                "must be in (0, 1]",
            ));
        }
        if c.min_area < 0.0 {
            return Err(BoardScanError::config(
                "classification.min_area",
                "must not be negative",
            ));
        }
        if c.mid_tone_max < c.dark_threshold {
            return Err(BoardScanError::config(
                "classification.mid_tone_max",
                "must not be below dark_threshold",
            ));
        }
        Ok(())
    }
}

fn check_kernel(field: &str, size: u8) -> Result<()> {
    if size == 0 || size % 2 == 0 {
        return Err(BoardScanError::config(field, format!("must be odd and positive, got {size}")));
    }
    Ok(())
}
