use image::{GrayImage, Luma};
use imageproc::point::Point;
use log::info;

use crate::config::CandidateConfig;
use crate::detection::contours::find_external_contours;
use crate::detection::morphology::SquareKernel;
use crate::models::Mask;

/// Inside the ROI, everything that is not board color.
pub fn candidate_mask(board_mask: &Mask, roi_mask: &Mask, config: &CandidateConfig) -> Mask {
    let mut mask = GrayImage::from_fn(board_mask.width(), board_mask.height(), |x, y| {
        let off_board = board_mask.get_pixel(x, y)[0] == 0;
        let in_roi = roi_mask.get_pixel(x, y)[0] > 0;
        Luma([if off_board && in_roi { 255 } else { 0 }])
    });
    SquareKernel::new(config.kernel_size).open(&mut mask, config.open_iterations);
    mask
}

/// Outer contours of the candidate mask in discovery order.
pub fn extract_candidates(candidate_mask: &Mask) -> Vec<Vec<Point<i32>>> {
    let contours = find_external_contours(candidate_mask);
    info!("Found {} candidate regions", contours.len());
    contours
}
