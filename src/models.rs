use imageproc::point::Point;
use serde::Serialize;

/// Binary mask: 0 is false, 255 is true. Always the size of the source image.
pub type Mask = image::GrayImage;

/// Axis-aligned box in image coordinates, inclusive of its edge pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Smallest box enclosing all points. `None` for an empty slice.
    pub fn enclosing(points: &[Point<i32>]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            x: min_x.max(0) as u32,
            y: min_y.max(0) as u32,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        })
    }

    /// Center pixel, rounded down.
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }
}

/// A connected foreground region inside the board with its measured features.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Position in contour discovery order.
    pub index: usize,
    pub contour: Vec<Point<i32>>,
    pub bbox: BoundingBox,
    pub area: f64,
    pub perimeter: f64,
    pub hull: Vec<Point<i32>>,
    pub hull_area: f64,
    pub solidity: f64,
    pub aspect_ratio: f64,
    pub circularity: f64,
    pub mean_intensity: f64,
}

impl Candidate {
    pub fn width(&self) -> u32 {
        self.bbox.width
    }

    pub fn height(&self) -> u32 {
        self.bbox.height
    }

    pub fn center(&self) -> (u32, u32) {
        self.bbox.center()
    }
}

/// Outcome of running the classification cascade on one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    Accepted,
    RejectedNoise,
    RejectedText,
    RejectedScrewHole,
    RejectedPin,
    RejectedHeader,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// A candidate together with its verdict and the rule that decided it.
#[derive(Debug, Clone)]
pub struct Classified {
    pub candidate: Candidate,
    pub verdict: Verdict,
    pub rule: &'static str,
    /// Bright sub-region count, when the X-ray gate inspected this candidate.
    pub pin_count: Option<usize>,
}

/// One accepted component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentDetection {
    pub bbox: BoundingBox,
    pub center: (u32, u32),
    pub area: f64,
    pub mean_intensity: f64,
}

impl From<&Candidate> for ComponentDetection {
    fn from(candidate: &Candidate) -> Self {
        Self {
            bbox: candidate.bbox,
            center: candidate.center(),
            area: candidate.area,
            mean_intensity: candidate.mean_intensity,
        }
    }
}

/// Accepted components in discovery order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DetectionResult {
    pub components: Vec<ComponentDetection>,
    pub count: usize,
}

impl DetectionResult {
    pub fn from_classified(classified: &[Classified]) -> Self {
        let components: Vec<ComponentDetection> = classified
            .iter()
            .filter(|c| c.verdict.is_accepted())
            .map(|c| ComponentDetection::from(&c.candidate))
            .collect();
        Self {
            count: components.len(),
            components,
        }
    }
}

/// Detection result plus the intermediate masks and every verdict.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub result: DetectionResult,
    pub board_mask: Mask,
    pub roi_mask: Mask,
    pub candidate_mask: Mask,
    pub classified: Vec<Classified>,
}

impl Analysis {
    pub fn count_verdict(&self, verdict: Verdict) -> usize {
        self.classified.iter().filter(|c| c.verdict == verdict).count()
    }
}
