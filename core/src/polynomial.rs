use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::NoiseGenerator;
use crate::error::{NoiseError, check_resolution};
use crate::lattice::DEFAULT_SEED;
use crate::map::NoiseMap;

// Smallest grid on which every quadrant has a non-zero extent.
pub const MIN_RESOLUTION: usize = 4;

// How a cell is recognised as already filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    // A cell holding exactly 0.0 counts as empty, seeded or not.
    #[default]
    ZeroSentinel,
    // Track assignment explicitly; zero is a legitimate value.
    Mask,
}

impl FillMode {
    #[inline]
    fn is_filled(self, value: f32, assigned: bool) -> bool {
        match self {
            FillMode::ZeroSentinel => value != 0.0,
            FillMode::Mask => assigned,
        }
    }
}

// Fill strategy for the cells between the anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubdivisionMode {
    // Four quadrants, each blended from its own four corners.
    // Quadrants share corner values but not slopes, so seams show.
    #[default]
    Flat,
    // Recursive quad subdivision with fresh random edge midpoints per level.
    Recursive,
}

// Value of the border cells where two quadrants meet (flat mode only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeAnchors {
    // Mean of the two outer corners on that edge; a uniform field stays flat.
    #[default]
    Mean,
    // Not seeded; the blend reads them as zero.
    Zero,
}

// Seed values for the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchors {
    // Top-left, top-right, bottom-left, bottom-right.
    pub corners: [f32; 4],
    // Shared by the 2×2 cells around the grid's midpoint.
    pub center: f32,
}

impl Anchors {
    // Every anchor at the same value
    pub fn uniform(value: f32) -> Self {
        Self {
            corners: [value; 4],
            center: value,
        }
    }

    fn random<R: Rng>(rng: &mut R) -> Self {
        let corners = [rng.random(), rng.random(), rng.random(), rng.random()];
        Self {
            corners,
            center: rng.random(),
        }
    }
}

// Cubic smoothstep 3t² − 2t³ (C1 only)
#[inline]
fn fade(t: f32) -> f32 {
    3.0 * t * t - 2.0 * t * t * t
}

// Inclusive cell bounds: columns l..=r, rows u..=d
#[derive(Debug, Clone, Copy)]
struct Region {
    l: usize,
    r: usize,
    u: usize,
    d: usize,
}

impl Region {
    // Bi-variate blend over the four corner values currently in `map`
    fn blend(&self, map: &NoiseMap, x: usize, y: usize) -> f32 {
        let xn = (x - self.l) as f32 / (self.r - self.l) as f32;
        let yn = (y - self.u) as f32 / (self.d - self.u) as f32;

        let lt = map.get(self.l, self.u);
        let rt = map.get(self.r, self.u);
        let lb = map.get(self.l, self.d);
        let rb = map.get(self.r, self.d);

        let delta_x = rt - lt;
        let delta_y = lb - lt;
        let a = rb + lt - rt - lb;
        let (fx, fy) = (fade(xn), fade(yn));
        lt + fx * delta_x + fy * delta_y + a * (fx * yn + fy * xn + xn * yn)
    }
}

// Corner-seeded polynomial noise over an `xres × yres` grid.
// Values are not bounded beyond what the anchors and the blend produce.
#[derive(Debug, Clone)]
pub struct SubdivisionNoise {
    xres: usize,
    yres: usize,
    seed: u64,
    anchors: Anchors,
    mode: SubdivisionMode,
    fill: FillMode,
    edges: EdgeAnchors,
}

impl SubdivisionNoise {
    pub fn new(xres: usize, yres: usize) -> Result<Self, NoiseError> {
        Self::with_seed(DEFAULT_SEED, xres, yres)
    }

    pub fn with_seed(seed: u64, xres: usize, yres: usize) -> Result<Self, NoiseError> {
        let anchors = Anchors::random(&mut ChaCha8Rng::seed_from_u64(seed));
        Self::build(seed, anchors, xres, yres)
    }

    // Use caller-supplied anchor values instead of random ones.
    pub fn with_anchors(anchors: Anchors, xres: usize, yres: usize) -> Result<Self, NoiseError> {
        Self::build(DEFAULT_SEED, anchors, xres, yres)
    }

    fn build(seed: u64, anchors: Anchors, xres: usize, yres: usize) -> Result<Self, NoiseError> {
        check_resolution(xres, yres)?;
        if xres < MIN_RESOLUTION || yres < MIN_RESOLUTION {
            return Err(NoiseError::ResolutionTooSmall {
                xres,
                yres,
                min: MIN_RESOLUTION,
            });
        }
        Ok(Self {
            xres,
            yres,
            seed,
            anchors,
            mode: SubdivisionMode::Flat,
            fill: FillMode::ZeroSentinel,
            edges: EdgeAnchors::Mean,
        })
    }

    pub fn mode(mut self, mode: SubdivisionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn fill(mut self, fill: FillMode) -> Self {
        self.fill = fill;
        self
    }

    pub fn edges(mut self, edges: EdgeAnchors) -> Self {
        self.edges = edges;
        self
    }

    pub fn anchors(&self) -> Anchors {
        self.anchors
    }

    // Write the outer corners; returns the assignment mask alongside
    fn seed_corners(&self) -> (NoiseMap, Vec<bool>) {
        let (w, h) = (self.xres, self.yres);
        let mut map = NoiseMap::zeros(w, h);
        let mut mask = vec![false; w * h];
        let [tl, tr, bl, br] = self.anchors.corners;
        for (x, y, v) in [(0, 0, tl), (w - 1, 0, tr), (0, h - 1, bl), (w - 1, h - 1, br)] {
            assign(&mut map, &mut mask, x, y, v);
        }
        (map, mask)
    }

    // Shared value on the 2×2 cells around (cx, cy)
    fn seed_pair_block(
        map: &mut NoiseMap,
        mask: &mut [bool],
        cx: usize,
        cy: usize,
        value: f32,
    ) {
        for (x, y) in [(cx, cy), (cx - 1, cy), (cx, cy - 1), (cx - 1, cy - 1)] {
            assign(map, mask, x, y, value);
        }
    }

    fn generate_flat(&self) -> NoiseMap {
        let (w, h) = (self.xres, self.yres);
        let (hx, hy) = (w / 2, h / 2);
        let [tl, tr, bl, br] = self.anchors.corners;
        let (mut map, mut mask) = self.seed_corners();

        Self::seed_pair_block(&mut map, &mut mask, hx, hy, self.anchors.center);

        // Border cells where two quadrants meet take the mean of the outer
        // corners on that edge, so every quadrant has four seeded corners.
        // With zero edges they stay unseeded and the blend reads them as 0.
        if self.edges == EdgeAnchors::Mean {
            let edges = [
                ((hx - 1, 0), (hx, 0), (tl + tr) / 2.0),
                ((hx - 1, h - 1), (hx, h - 1), (bl + br) / 2.0),
                ((0, hy - 1), (0, hy), (tl + bl) / 2.0),
                ((w - 1, hy - 1), (w - 1, hy), (tr + br) / 2.0),
            ];
            for ((x0, y0), (x1, y1), v) in edges {
                assign(&mut map, &mut mask, x0, y0, v);
                assign(&mut map, &mut mask, x1, y1, v);
            }
        }

        let fill = self.fill;
        let seeded = &map;
        let mask = &mask;
        // Only anchors are read, so rows fill independently
        NoiseMap::from_fn(w, h, |x, y| {
            let v = seeded.get(x, y);
            if fill.is_filled(v, mask[y * w + x]) {
                return v;
            }
            let quadrant = Region {
                l: if x < hx { 0 } else { hx },
                r: if x < hx { hx - 1 } else { w - 1 },
                u: if y < hy { 0 } else { hy },
                d: if y < hy { hy - 1 } else { h - 1 },
            };
            quadrant.blend(seeded, x, y)
        })
    }

    fn generate_recursive(&self) -> NoiseMap {
        let (map, mask) = self.seed_corners();
        // Stream 0 produced the anchors; midpoints draw from their own stream
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(1);
        let mut state = Subdivider {
            map,
            mask,
            fill: self.fill,
            rng,
            center: self.anchors.center,
        };
        let whole = Region {
            l: 0,
            r: self.xres - 1,
            u: 0,
            d: self.yres - 1,
        };
        state.subdivide(whole, 0);
        state.map
    }
}

#[inline]
fn assign(map: &mut NoiseMap, mask: &mut [bool], x: usize, y: usize, value: f32) {
    map.set(x, y, value);
    mask[y * map.width() + x] = true;
}

struct Subdivider {
    map: NoiseMap,
    mask: Vec<bool>,
    fill: FillMode,
    rng: ChaCha8Rng,
    center: f32,
}

impl Subdivider {
    fn subdivide(&mut self, region: Region, depth: usize) {
        let Region { l, r, u, d } = region;
        if r - l < 3 || d - u < 3 {
            self.fill_leaf(region);
            return;
        }
        // Split so the centre pair is (size/2 - 1, size/2), the same cells
        // flat mode seeds
        let lrm = l + (r - l - 1) / 2;
        let udm = u + (d - u - 1) / 2;

        // The grid centre keeps the shared anchor; deeper levels blend it
        // from the region corners
        for (x, y) in [(lrm, udm), (lrm + 1, udm), (lrm, udm + 1), (lrm + 1, udm + 1)] {
            let v = if depth == 0 {
                self.center
            } else {
                region.blend(&self.map, x, y)
            };
            assign(&mut self.map, &mut self.mask, x, y, v);
        }

        // Edge midpoints: left, right, top, bottom
        let pairs = [
            ((l, udm), (l, udm + 1)),
            ((r, udm), (r, udm + 1)),
            ((lrm, u), (lrm + 1, u)),
            ((lrm, d), (lrm + 1, d)),
        ];
        for ((x0, y0), (x1, y1)) in pairs {
            let v: f32 = self.rng.random();
            assign(&mut self.map, &mut self.mask, x0, y0, v);
            assign(&mut self.map, &mut self.mask, x1, y1, v);
        }

        let children = [
            Region { l, r: lrm, u, d: udm },
            Region { l: lrm + 1, r, u, d: udm },
            Region { l, r: lrm, u: udm + 1, d },
            Region { l: lrm + 1, r, u: udm + 1, d },
        ];
        for child in children {
            self.subdivide(child, depth + 1);
        }
    }

    // Blend every cell of a small region that is still empty
    fn fill_leaf(&mut self, region: Region) {
        let w = self.map.width();
        for y in region.u..=region.d {
            for x in region.l..=region.r {
                let v = self.map.get(x, y);
                if !self.fill.is_filled(v, self.mask[y * w + x]) {
                    let blended = region.blend(&self.map, x, y);
                    assign(&mut self.map, &mut self.mask, x, y, blended);
                }
            }
        }
    }
}

impl NoiseGenerator for SubdivisionNoise {
    fn dimensions(&self) -> (usize, usize) {
        (self.xres, self.yres)
    }

    fn generate_map(&self) -> NoiseMap {
        tracing::debug!(
            width = self.xres,
            height = self.yres,
            mode = ?self.mode,
            fill = ?self.fill,
            edges = ?self.edges,
            "generating polynomial noise map"
        );
        match self.mode {
            SubdivisionMode::Flat => self.generate_flat(),
            SubdivisionMode::Recursive => self.generate_recursive(),
        }
    }
}
