use crate::NoiseGenerator;
use crate::error::{NoiseError, check_resolution};
use crate::lattice::{PermutationTable, lattice_index};
use crate::map::NoiseMap;

// Sampling step factor: each lattice unit is covered by this many cells.
pub const DEFAULT_SUPERSAMPLE: usize = 10;

// The four diagonal gradient directions, picked by hash % 4
const GRADIENTS: [(f64, f64); 4] = [(1.0, -1.0), (-1.0, 1.0), (1.0, 1.0), (-1.0, -1.0)];

// 2D gradient (Perlin) noise over a lattice with period 256.
// `generate_map` produces a `(xres·K) × (yres·K)` map sampled at step `1/K`.
#[derive(Debug, Clone)]
pub struct GradientNoise {
    xres: usize,
    yres: usize,
    supersample: usize, // K
    perm: PermutationTable,
}

impl GradientNoise {
    // Generator over the reference permutation table.
    pub fn new(xres: usize, yres: usize) -> Result<Self, NoiseError> {
        Self::with_permutation(PermutationTable::reference(), xres, yres)
    }

    pub fn with_seed(seed: u64, xres: usize, yres: usize) -> Result<Self, NoiseError> {
        Self::with_permutation(PermutationTable::from_seed(seed), xres, yres)
    }

    pub fn with_permutation(
        perm: PermutationTable,
        xres: usize,
        yres: usize,
    ) -> Result<Self, NoiseError> {
        check_resolution(xres, yres)?;
        Ok(Self {
            xres,
            yres,
            supersample: DEFAULT_SUPERSAMPLE,
            perm,
        })
    }

    // Change the supersampling factor K (default 10).
    pub fn supersample(mut self, k: usize) -> Result<Self, NoiseError> {
        if k == 0 {
            return Err(NoiseError::InvalidSupersample(k));
        }
        self.supersample = k;
        Ok(self)
    }

    // Quintic fade 6t^5 − 15t^4 + 10t^3
    // First and second derivatives vanish at t=0 and t=1, so the blend is
    // C2-continuous across cell boundaries
    #[inline]
    fn fade(t: f64) -> f64 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    #[inline]
    fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + t * (b - a)
    }

    // Dot product of the hashed gradient with the offset (x, y) from its corner
    #[inline]
    fn grad(hash: u8, x: f64, y: f64) -> f64 {
        let (gx, gy) = GRADIENTS[(hash % 4) as usize];
        gx * x + gy * y
    }

    // perm[perm[cx] + cy], both wrapped to the table
    #[inline]
    fn hash(&self, cx: i32, cy: i32) -> u8 {
        self.perm.get(self.perm.get(cx) as i32 + cy)
    }

    // Single point evaluation. Returns 0 on every lattice point and NaN for
    // non-finite input.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        // Which cell? Reduced to the table period before the cast, so huge
        // coordinates neither saturate nor overflow
        let xfloor = x.floor();
        let yfloor = y.floor();
        let cx = lattice_index(xfloor);
        let cy = lattice_index(yfloor);
        // Where inside the cell?
        let xf = x - xfloor;
        let yf = y - yfloor;
        let u = Self::fade(xf);
        let v = Self::fade(yf);

        let nw = Self::grad(self.hash(cx, cy), xf, yf);
        let ne = Self::grad(self.hash(cx + 1, cy), xf - 1.0, yf);
        let sw = Self::grad(self.hash(cx, cy + 1), xf, yf - 1.0);
        let se = Self::grad(self.hash(cx + 1, cy + 1), xf - 1.0, yf - 1.0);

        // Along x first, then y
        let top = Self::lerp(nw, ne, u);
        let bottom = Self::lerp(sw, se, u);
        Self::lerp(top, bottom, v)
    }
}

impl NoiseGenerator for GradientNoise {
    fn dimensions(&self) -> (usize, usize) {
        (self.xres * self.supersample, self.yres * self.supersample)
    }

    fn generate_map(&self) -> NoiseMap {
        let (width, height) = self.dimensions();
        tracing::debug!(width, height, k = self.supersample, "generating gradient noise map");
        let step = self.supersample as f64;
        NoiseMap::from_fn(width, height, |x, y| {
            self.sample(x as f64 / step, y as f64 / step) as f32
        })
    }
}

#[cfg(test)]
mod tests {
    use super::GradientNoise;
    use crate::NoiseGenerator;

    #[test]
    fn gradient_determinism() {
        let p1 = GradientNoise::with_seed(1234, 4, 4).unwrap();
        let p2 = GradientNoise::with_seed(1234, 4, 4).unwrap();
        let a = p1.sample(10.5, -3.7);
        let b = p2.sample(10.5, -3.7);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn zero_at_lattice_points() {
        let p = GradientNoise::new(4, 4).unwrap();
        assert_eq!(p.sample(5.0, 3.0), 0.0);
        for &(x, y) in &[(0.0, 0.0), (-7.0, 12.0), (255.0, 256.0), (-300.0, -1.0)] {
            assert_eq!(p.sample(x, y), 0.0);
        }
    }

    #[test]
    fn reference_value_by_hand() {
        // Centre of cell (5, 3) with the reference table:
        // nw: hash 3 -> (-1,-1) . ( 0.5,  0.5) = -1
        // ne: hash 1 -> (-1, 1) . (-0.5,  0.5) =  1
        // sw: hash 2 -> ( 1, 1) . ( 0.5, -0.5) =  0
        // se: hash 2 -> ( 1, 1) . (-0.5, -0.5) = -1
        // fade(0.5) = 0.5: top = 0, bottom = -0.5, result = -0.25
        let p = GradientNoise::new(1, 1).unwrap();
        assert_eq!(p.sample(5.5, 3.5), -0.25);
    }

    #[test]
    fn continuous_across_cell_boundary() {
        let p = GradientNoise::new(4, 4).unwrap();
        let eps = 1e-7;
        for &(x, y) in &[(3.0, 2.4), (17.0, 0.3), (8.6, 5.0), (-2.0, 1.5)] {
            let before = p.sample(x - eps, y - eps);
            let after = p.sample(x + eps, y + eps);
            assert!((before - after).abs() < 1e-5, "jump at ({x}, {y})");
        }
    }

    #[test]
    fn periodic_with_period_256() {
        let p = GradientNoise::with_seed(99, 4, 4).unwrap();
        let a = p.sample(3.3, 7.9);
        let b = p.sample(3.3 + 256.0, 7.9 - 512.0);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn huge_coordinates_wrap_to_the_table() {
        let p = GradientNoise::new(1, 1).unwrap();
        // 3e9 is a multiple of 256
        assert_eq!(p.sample(3.0e9 + 0.25, 0.5), p.sample(0.25, 0.5));
        assert_eq!(p.sample(-3.0e9 - 0.75, 1.5), p.sample(255.25, 1.5));
        assert!(p.sample(3.0e9, 0.5).is_finite());
        assert!(p.sample(1.0e300, -1.0e300).is_finite());
    }

    #[test]
    fn non_finite_input_gives_nan() {
        let p = GradientNoise::new(1, 1).unwrap();
        for &(x, y) in &[(f64::INFINITY, 0.5), (0.5, f64::NEG_INFINITY), (f64::NAN, 2.0)] {
            assert!(p.sample(x, y).is_nan(), "({x}, {y})");
        }
    }

    #[test]
    fn map_is_supersampled_and_complete() {
        let p = GradientNoise::new(3, 2).unwrap();
        let m = p.generate_map();
        assert_eq!(m.dimensions(), (30, 20));
        assert!(m.is_complete());
        // every tenth cell lands on a lattice point
        assert_eq!(m.get(10, 10), 0.0);
        assert_eq!(m.get(13, 7), p.sample(1.3, 0.7) as f32);
    }

    #[test]
    fn custom_supersample() {
        let p = GradientNoise::new(2, 2).unwrap().supersample(4).unwrap();
        assert_eq!(p.generate_map().dimensions(), (8, 8));
        assert!(GradientNoise::new(2, 2).unwrap().supersample(0).is_err());
    }

    #[test]
    fn zero_resolution_is_rejected() {
        assert!(GradientNoise::new(0, 4).is_err());
        assert!(GradientNoise::new(4, 0).is_err());
    }
}
