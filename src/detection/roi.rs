use log::info;

use crate::detection::contours::{fill_contour, find_external_contours, polygon_area};
use crate::error::{BoardScanError, Result};
use crate::models::Mask;

/// Solid footprint of the largest board region.
///
/// The largest outer contour by enclosed area wins; on equal areas the one
/// found first in raster order is kept.
pub fn extract_roi(board_mask: &Mask) -> Result<Mask> {
    let contours = find_external_contours(board_mask);

    let mut best: Option<(usize, f64)> = None;
    for (idx, contour) in contours.iter().enumerate() {
        let area = polygon_area(contour);
        if best.is_none_or(|(_, best_area)| area > best_area) {
            best = Some((idx, area));
        }
    }
    let (idx, area) = best.ok_or(BoardScanError::NoBoardFound)?;

    info!(
        "Board region {} of {} selected (enclosed area {:.0})",
        idx + 1,
        contours.len(),
        area
    );
    Ok(fill_contour(&contours[idx], board_mask.width(), board_mask.height()))
}
