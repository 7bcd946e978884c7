use image::{GrayImage, Luma, RgbImage};
use log::info;

use crate::config::{ColorBand, SegmentationConfig};
use crate::detection::color::rgb_to_hsv;
use crate::detection::contours::count_set;
use crate::detection::morphology::SquareKernel;
use crate::error::{BoardScanError, Result};
use crate::models::Mask;

/// Pixels whose HSV color falls inside the band (inclusive).
pub fn threshold_band(img: &RgbImage, band: &ColorBand) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let (h, s, v) = rgb_to_hsv(img.get_pixel(x, y));
        Luma([if band.contains(h, s, v) { 255 } else { 0 }])
    })
}

/// Board substrate mask: band threshold, then close to heal silkscreen gaps and open to drop specks.
pub fn segment_board(img: &RgbImage, config: &SegmentationConfig) -> Result<Mask> {
    let mut mask = threshold_band(img, &config.color_band);

    let matched = count_set(&mask);
    if matched == 0 {
        return Err(BoardScanError::EmptyMask);
    }

    let kernel = SquareKernel::new(config.kernel_size);
    kernel.close(&mut mask, config.close_iterations);
    kernel.open(&mut mask, config.open_iterations);

    info!(
        "Board color matched {} px, {} px after cleanup",
        matched,
        count_set(&mask)
    );
    Ok(mask)
}
