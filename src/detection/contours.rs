use image::imageops::replace;
use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;

use crate::models::BoundingBox;

/// Outer borders of the top-level 8-connected regions of a 0/255 mask, in raster discovery order.
///
/// Holes and anything nested inside holes are ignored. Pixels outside the
/// image count as background, so regions touching the image edge are traced.
pub fn find_external_contours(mask: &GrayImage) -> Vec<Vec<Point<i32>>> {
    let mut padded = GrayImage::new(mask.width() + 2, mask.height() + 2);
    replace(&mut padded, mask, 1, 1);

    find_contours::<i32>(&padded)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| c.points.into_iter().map(|p| Point::new(p.x - 1, p.y - 1)).collect())
        .collect()
}

/// Shoelace area of the polygon through the given points.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();
    twice.abs() as f64 / 2.0
}

/// Filled interior of one outer contour, rendered into a mask the size of its bounding box.
///
/// The contour pixels act as walls; every pixel of the box that the outside
/// cannot reach through 4-connected steps is interior, so holes in the
/// original region come out filled.
pub fn fill_contour_local(points: &[Point<i32>]) -> Option<(BoundingBox, GrayImage)> {
    let bbox = BoundingBox::enclosing(points)?;

    // Pad by one pixel so the outside is connected all around the shape.
    let pad_w = bbox.width as usize + 2;
    let pad_h = bbox.height as usize + 2;
    let local = |p: &Point<i32>| {
        let lx = (p.x - bbox.x as i32 + 1) as usize;
        let ly = (p.y - bbox.y as i32 + 1) as usize;
        ly * pad_w + lx
    };

    const OPEN: u8 = 0;
    const WALL: u8 = 1;
    const OUTSIDE: u8 = 2;
    let mut cells = vec![OPEN; pad_w * pad_h];
    for p in points {
        cells[local(p)] = WALL;
    }

    let mut stack = vec![0usize];
    cells[0] = OUTSIDE;
    while let Some(idx) = stack.pop() {
        let (x, y) = (idx % pad_w, idx / pad_w);
        let neighbors = [
            (x > 0).then(|| idx - 1),
            (x + 1 < pad_w).then(|| idx + 1),
            (y > 0).then(|| idx - pad_w),
            (y + 1 < pad_h).then(|| idx + pad_w),
        ];
        for n in neighbors.into_iter().flatten() {
            if cells[n] == OPEN {
                cells[n] = OUTSIDE;
                stack.push(n);
            }
        }
    }

    let interior = GrayImage::from_fn(bbox.width, bbox.height, |x, y| {
        let cell = cells[(y as usize + 1) * pad_w + x as usize + 1];
        Luma([if cell == OUTSIDE { 0 } else { 255 }])
    });
    Some((bbox, interior))
}

/// Filled interior of one outer contour in a fresh mask of the given size.
pub fn fill_contour(points: &[Point<i32>], width: u32, height: u32) -> GrayImage {
    let mut out = GrayImage::new(width, height);
    if let Some((bbox, interior)) = fill_contour_local(points) {
        for (x, y, pixel) in interior.enumerate_pixels() {
            let (gx, gy) = (bbox.x + x, bbox.y + y);
            if pixel[0] > 0 && gx < width && gy < height {
                out.put_pixel(gx, gy, *pixel);
            }
        }
    }
    out
}

/// Number of true pixels in a mask.
pub fn count_set(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] > 0).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from_rows(rows: &[&str]) -> GrayImage {
        GrayImage::from_fn(rows[0].len() as u32, rows.len() as u32, |x, y| {
            let on = rows[y as usize].as_bytes()[x as usize] == b'#';
            Luma([if on { 255 } else { 0 }])
        })
    }

    #[test]
    fn square_polygon_area() {
        let square = [Point::new(0, 0), Point::new(4, 0), Point::new(4, 4), Point::new(0, 4)];
        assert_eq!(polygon_area(&square), 16.0);
        assert_eq!(polygon_area(&square[..2]), 0.0);
    }

    #[test]
    fn external_contours_skip_nested_regions() {
        let mask = mask_from_rows(&[
            "..........",
            ".#######..",
            ".#.....#..",
            ".#.##..#..",
            ".#.....#..",
            ".#######..",
            "..........",
            "........##",
        ]);
        let contours = find_external_contours(&mask);
        // The ring and the corner blob; the island inside the ring is nested.
        assert_eq!(contours.len(), 2);
    }

    #[test]
    fn regions_touching_the_image_edge_are_traced() {
        let full = GrayImage::from_pixel(20, 20, Luma([255]));
        let contours = find_external_contours(&full);
        assert_eq!(contours.len(), 1);
        let bbox = BoundingBox::enclosing(&contours[0]).unwrap();
        assert_eq!(bbox, BoundingBox { x: 0, y: 0, width: 20, height: 20 });

        let left = mask_from_rows(&[
            "###...",
            "###...",
            "###..#",
        ]);
        let contours = find_external_contours(&left);
        assert_eq!(contours.len(), 2);
        assert!(contours[0].iter().all(|p| p.x >= 0 && p.y >= 0));
        assert_eq!(BoundingBox::enclosing(&contours[0]).unwrap().x, 0);
    }

    #[test]
    fn fill_closes_holes() {
        let mask = mask_from_rows(&[
            ".......",
            ".#####.",
            ".#...#.",
            ".#...#.",
            ".#####.",
            ".......",
        ]);
        let contours = find_external_contours(&mask);
        assert_eq!(contours.len(), 1);
        let filled = fill_contour(&contours[0], mask.width(), mask.height());
        assert_eq!(count_set(&filled), 20);
        assert_eq!(filled.get_pixel(3, 2)[0], 255);
        assert_eq!(filled.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn local_fill_is_box_sized() {
        let mask = mask_from_rows(&[
            "......",
            "..#...",
            ".###..",
            "..#...",
        ]);
        let contours = find_external_contours(&mask);
        let (bbox, interior) = fill_contour_local(&contours[0]).unwrap();
        assert_eq!(bbox, BoundingBox { x: 1, y: 1, width: 3, height: 3 });
        assert_eq!(count_set(&interior), 5);
        assert_eq!(interior.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn fill_of_single_pixel() {
        let filled = fill_contour(&[Point::new(2, 3)], 5, 5);
        assert_eq!(count_set(&filled), 1);
        assert_eq!(filled.get_pixel(2, 3)[0], 255);
    }
}
