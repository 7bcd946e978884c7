use std::f64::consts::PI;

use image::GrayImage;
use imageproc::geometry::{arc_length, convex_hull};
use imageproc::point::Point;
use log::trace;

use crate::detection::contours::{fill_contour_local, polygon_area};
use crate::models::Candidate;

/// Measure one contour against the grayscale image.
///
/// Returns `None` for degenerate shapes (zero hull area or zero enclosed area),
/// which are dropped from the run without raising an error.
pub fn measure(index: usize, contour: Vec<Point<i32>>, gray: &GrayImage) -> Option<Candidate> {
    let area = polygon_area(&contour);
    let hull = if area > 0.0 {
        convex_hull(contour.as_slice())
    } else {
        Vec::new()
    };
    let hull_area = polygon_area(&hull);
    if hull_area <= 0.0 || area <= 0.0 {
        trace!(
            "Candidate {} skipped as degenerate (area {:.1}, hull area {:.1})",
            index, area, hull_area
        );
        return None;
    }

    let perimeter = arc_length(&contour, true);
    let circularity = if perimeter > 0.0 {
        4.0 * PI * area / (perimeter * perimeter)
    } else {
        0.0
    };

    let (bbox, interior) = fill_contour_local(&contour)?;
    let mean_intensity = mean_over_mask(gray, bbox.x, bbox.y, &interior);

    Some(Candidate {
        index,
        bbox,
        area,
        perimeter,
        hull_area,
        solidity: (area / hull_area).min(1.0),
        aspect_ratio: bbox.width as f64 / bbox.height as f64,
        circularity,
        mean_intensity,
        contour,
        hull,
    })
}

/// Mean gray level of the pixels set in `mask`, with the mask placed at (`left`, `top`).
pub fn mean_over_mask(gray: &GrayImage, left: u32, top: u32, mask: &GrayImage) -> f64 {
    let mut sum: u64 = 0;
    let mut count: u64 = 0;
    for (x, y, m) in mask.enumerate_pixels() {
        if m[0] == 0 {
            continue;
        }
        let (gx, gy) = (left + x, top + y);
        if gx < gray.width() && gy < gray.height() {
            sum += gray.get_pixel(gx, gy)[0] as u64;
            count += 1;
        }
    }
    if count > 0 {
        sum as f64 / count as f64
    } else {
        0.0
    }
}
