use image::GrayImage;
use rayon::prelude::*;

// 2D height map: row‐major Vec<Vec<f32>>, access as `map[y][x]`.
pub type HeightMap2D = Vec<Vec<f32>>;

// Dense `width × height` grid of samples, stored row-major.
// Owned by the caller once returned; it never aliases generator state.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseMap {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl NoiseMap {
    // Zero-filled grid. Used by generators that seed cells before filling.
    pub(crate) fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    // Build a map by evaluating `f(x, y)` for every cell.
    // Rows are filled in parallel; cells are independent, so `f` only needs
    // shared access to whatever it reads.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> f32 + Sync,
    {
        let mut data = vec![0.0f32; width * height];
        if width > 0 {
            data.par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, cell) in row.iter_mut().enumerate() {
                        *cell = f(x, y);
                    }
                });
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    // Sample at column `x`, row `y`. Panics when out of range.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, value: f32) {
        let i = self.index(x, y);
        self.data[i] = value;
    }

    pub fn row(&self, y: usize) -> &[f32] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks(self.width.max(1))
    }

    // Flat row-major view, e.g. for uploading as a texture.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_rows(self) -> HeightMap2D {
        self.rows().map(|r| r.to_vec()).collect()
    }

    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    // True when every cell holds a finite value.
    pub fn is_complete(&self) -> bool {
        self.data.len() == self.width * self.height && self.data.iter().all(|v| v.is_finite())
    }

    // 8-bit grayscale rendering, stretched over the map's own min/max.
    pub fn to_gray_image(&self) -> GrayImage {
        let (min, max) = self.min_max();
        let range = (max - min).max(f32::EPSILON);
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let v = (self.get(x as usize, y as usize) - min) / range;
            image::Luma([(v * 255.0).round() as u8])
        })
    }
}
