use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate_mut, erode_mut};

/// Repeated morphology on 0/255 masks with a square structuring element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareKernel {
    radius: u8,
}

impl SquareKernel {
    /// `size` is the side length; an odd value is expected (3 gives a 3x3 square).
    pub fn new(size: u8) -> Self {
        Self { radius: size / 2 }
    }

    pub fn dilate(&self, mask: &mut GrayImage, iterations: u32) {
        if self.radius == 0 {
            return;
        }
        for _ in 0..iterations {
            dilate_mut(mask, Norm::LInf, self.radius);
        }
    }

    pub fn erode(&self, mask: &mut GrayImage, iterations: u32) {
        if self.radius == 0 {
            return;
        }
        for _ in 0..iterations {
            erode_mut(mask, Norm::LInf, self.radius);
        }
    }

    /// Dilate then erode: bridges gaps narrower than the kernel.
    pub fn close(&self, mask: &mut GrayImage, iterations: u32) {
        self.dilate(mask, iterations);
        self.erode(mask, iterations);
    }

    /// Erode then dilate: removes specks smaller than the kernel.
    pub fn open(&self, mask: &mut GrayImage, iterations: u32) {
        self.erode(mask, iterations);
        self.dilate(mask, iterations);
    }
}
