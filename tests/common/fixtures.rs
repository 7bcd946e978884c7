use boardscan::{Analysis, ComponentPipeline, DetectionConfig};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

/// Color constants for tests
pub const TEAL: Rgb<u8> = Rgb([0, 128, 128]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const CHIP: Rgb<u8> = Rgb([20, 20, 20]);
pub const PIN: Rgb<u8> = Rgb([240, 240, 240]);

pub fn gray(level: u8) -> Rgb<u8> {
    Rgb([level, level, level])
}

/// Synthetic photo: a white desk with a teal board rectangle and parts painted on it.
pub struct BoardBuilder {
    img: RgbImage,
}

impl BoardBuilder {
    /// `board` is (x, y, width, height) of the teal substrate.
    pub fn new(width: u32, height: u32, board: (i32, i32, u32, u32)) -> Self {
        let mut img = RgbImage::from_pixel(width, height, WHITE);
        let (x, y, w, h) = board;
        draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(w, h), TEAL);
        Self { img }
    }

    pub fn rect(mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb<u8>) -> Self {
        draw_filled_rect_mut(&mut self.img, Rect::at(x, y).of_size(w, h), color);
        self
    }

    pub fn circle(mut self, cx: i32, cy: i32, radius: i32, color: Rgb<u8>) -> Self {
        draw_filled_circle_mut(&mut self.img, (cx, cy), radius, color);
        self
    }

    /// A dark connector body with a row of bright pins.
    pub fn header(self, x: i32, y: i32, pins: u32) -> Self {
        let width = pins * 12;
        let mut builder = self.rect(x, y, width, 20, CHIP);
        for i in 0..pins as i32 {
            builder = builder.rect(x + 4 + i * 12, y + 8, 4, 4, PIN);
        }
        builder
    }

    pub fn build(self) -> RgbImage {
        self.img
    }
}

/// 200x200 scene: a 30x30 black chip, a 10x10 white label and a 5x5 gray speck on a teal board.
pub fn scenario_a() -> RgbImage {
    BoardBuilder::new(200, 200, (20, 20, 160, 160))
        .rect(40, 40, 30, 30, BLACK)
        .rect(100, 40, 10, 10, WHITE)
        .rect(40, 120, 5, 5, gray(128))
        .build()
}

pub fn analyze(img: &RgbImage) -> Analysis {
    analyze_with(img, DetectionConfig::default())
}

pub fn analyze_with(img: &RgbImage, config: DetectionConfig) -> Analysis {
    ComponentPipeline::new(config)
        .expect("valid config")
        .analyze_rgb(img)
        .expect("detection run")
}

/// Verdict of the candidate whose box contains the given pixel.
pub fn verdict_at(analysis: &Analysis, x: u32, y: u32) -> Option<boardscan::Verdict> {
    analysis
        .classified
        .iter()
        .find(|c| c.candidate.bbox.contains(x, y))
        .map(|c| c.verdict)
}
