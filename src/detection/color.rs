use image::Rgb;

/// Convert an RGB pixel to 8-bit HSV.
///
/// Hue is halved into 0..=179 so it fits a byte; saturation and value span 0..=255.
pub fn rgb_to_hsv(pixel: &Rgb<u8>) -> (u8, u8, u8) {
    let [r, g, b] = pixel.0.map(f32::from);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = max - min;

    let sat = if max > 0.0 { 255.0 * chroma / max } else { 0.0 };

    let hue_degrees = if chroma == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / chroma
    } else if max == g {
        120.0 + 60.0 * (b - r) / chroma
    } else {
        240.0 + 60.0 * (r - g) / chroma
    };
    let hue_degrees = if hue_degrees < 0.0 { hue_degrees + 360.0 } else { hue_degrees };
    let hue = (hue_degrees / 2.0).round() as u32 % 180;

    (hue as u8, sat.round() as u8, max as u8)
}
