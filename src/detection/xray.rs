use image::GrayImage;
use image::imageops::crop_imm;
use imageproc::contrast::{ThresholdType, threshold};

use crate::detection::contours::{find_external_contours, polygon_area};
use crate::models::BoundingBox;

/// Counts bright sub-regions (pins, pads) inside a dark candidate body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinXRay {
    /// Gray level above which a pixel counts as bright metal.
    pub pin_brightness: u8,
    /// Bright regions with area at or below this are ignored.
    pub noise_area: f64,
}

impl PinXRay {
    pub fn new(pin_brightness: u8, noise_area: f64) -> Self {
        Self {
            pin_brightness,
            noise_area,
        }
    }

    /// Number of bright regions in the given grayscale patch.
    pub fn count_pins(&self, patch: &GrayImage) -> usize {
        let bright = threshold(patch, self.pin_brightness, ThresholdType::Binary);
        find_external_contours(&bright)
            .iter()
            .filter(|c| polygon_area(c) > self.noise_area)
            .count()
    }

    /// Crop the candidate box out of the full grayscale image and count its bright regions.
    pub fn inspect(&self, gray: &GrayImage, bbox: &BoundingBox) -> usize {
        let patch = crop_imm(gray, bbox.x, bbox.y, bbox.width, bbox.height).to_image();
        self.count_pins(&patch)
    }
}
