use crate::NoiseGenerator;
use crate::error::{NoiseError, check_resolution};
use crate::lattice::{PermutationTable, TABLE_SIZE, lattice_index};
use crate::map::NoiseMap;

pub const DEFAULT_OCTAVES: usize = 10;
pub const DEFAULT_PERSISTENCE: f64 = 0.5;

// Skew onto the simplectic lattice, and back
const STRETCH: f64 = -1.0 / 6.0;
const SQUISH: f64 = 1.0 / 3.0;

// Largest magnitude observed over billions of evaluations is ~28.13,
// so this keeps the raw sum inside [-1, 1]
const NORM: f64 = 28.25;

// 24 gradients as (x, y, z) triples, pointing to the edges of a cuboctahedron
#[rustfmt::skip]
const GRADIENTS_3D: [i8; 72] = [
     0,  3,  2,    0,  2,  3,    3,  0,  2,    2,  0,  3,    3,  2,  0,    2,  3,  0,
     0, -3,  2,    0,  2, -3,   -3,  0,  2,    2,  0, -3,   -3,  2,  0,    2, -3,  0,
     0,  3, -2,    0, -2,  3,    3,  0, -2,   -2,  0,  3,    3, -2,  0,   -2,  3,  0,
     0, -3, -2,    0, -2, -3,   -3,  0, -2,   -2,  0, -3,   -3, -2,  0,   -2, -3,  0,
];

// One candidate lattice vertex: skewed lattice coords plus the offset from it
#[derive(Clone, Copy, Default)]
struct Vertex {
    xsv: i32,
    ysv: i32,
    zsv: i32,
    dx: f64,
    dy: f64,
    dz: f64,
}

impl Vertex {
    #[inline]
    fn new(xsv: i32, ysv: i32, zsv: i32, dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            xsv,
            ysv,
            zsv,
            dx,
            dy,
            dz,
        }
    }
}

// 3D OpenSimplex (simplectic) noise, sampled in 2D with a fixed third coordinate.
// `generate_map` produces an `xres × yres` map over `[0,1)²`, summing
// `octaves` octaves (default 10) with the given persistence (default 0.5).
#[derive(Debug, Clone)]
pub struct SimplexNoise {
    xres: usize,
    yres: usize,
    octaves: usize,
    persistence: f64,
    perm: PermutationTable,
    // perm[i] % 24 * 3, precomputed so evaluation skips the modulo
    perm_grad_index: [u8; TABLE_SIZE],
}

impl SimplexNoise {
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
        let gradient_count = (GRADIENTS_3D.len() / 3) as u8;
        let perm_grad_index = perm.as_array().map(|p| (p % gradient_count) * 3);
        Ok(Self {
            xres,
            yres,
            octaves: DEFAULT_OCTAVES,
            persistence: DEFAULT_PERSISTENCE,
            perm,
            perm_grad_index,
        })
    }

    pub fn octaves(mut self, octaves: usize) -> Result<Self, NoiseError> {
        if octaves == 0 {
            return Err(NoiseError::InvalidOctaves(octaves));
        }
        self.octaves = octaves;
        Ok(self)
    }

    pub fn persistence(mut self, persistence: f64) -> Self {
        self.persistence = persistence;
        self
    }

    // Single-octave noise remapped from [-1, 1] to [0, 1].
    pub fn eval_point(&self, x: f64, y: f64, z: f64) -> f64 {
        (self.eval_raw(x, y, z) + 1.0) / 2.0
    }

    // Fractal sum in the z = 0 plane.
    pub fn eval_octaves(&self, x: f64, y: f64, octaves: usize, persistence: f64) -> f64 {
        self.eval_octaves3(x, y, 0.0, octaves, persistence)
    }

    // Fractal sum normalised by the accumulated amplitude, so the result
    // stays in the single-octave range whatever the octave count.
    // An octave count of 0 is treated as 1.
    pub fn eval_octaves3(&self, x: f64, y: f64, z: f64, octaves: usize, persistence: f64) -> f64 {
        let mut amplitude = 1.0;
        let mut freq = 1.0;
        let mut total = 0.0;
        let mut max_amp = 0.0;

        for _ in 0..octaves.max(1) {
            total += self.eval_point(x * freq, y * freq, z * freq) * amplitude;
            max_amp += amplitude;
            amplitude *= persistence;
            freq *= 2.0;
        }

        total / max_amp
    }

    // Gradient dot offset for the lattice vertex (xsv, ysv, zsv)
    #[inline]
    fn extrapolate(&self, v: &Vertex) -> f64 {
        // perm_grad_index already holds the third permutation lookup
        let p = &self.perm;
        let slot = (p.get(p.get(v.xsv) as i32 + v.ysv) as i32 + v.zsv)
            .rem_euclid(TABLE_SIZE as i32);
        let i = self.perm_grad_index[slot as usize] as usize;
        GRADIENTS_3D[i] as f64 * v.dx
            + GRADIENTS_3D[i + 1] as f64 * v.dy
            + GRADIENTS_3D[i + 2] as f64 * v.dz
    }

    // attn^4 * (g . d) inside the support radius, zero outside
    #[inline]
    fn contribution(&self, v: &Vertex) -> f64 {
        let attn = 2.0 - v.dx * v.dx - v.dy * v.dy - v.dz * v.dz;
        if attn > 0.0 {
            let attn2 = attn * attn;
            attn2 * attn2 * self.extrapolate(v)
        } else {
            0.0
        }
    }

    // Single-octave noise before the [0, 1] remap; nominally in [-1, 1].
    pub fn eval_raw(&self, x: f64, y: f64, z: f64) -> f64 {
        // Place input coordinates on the simplectic lattice
        let stretch_offset = (x + y + z) * STRETCH;
        let xs = x + stretch_offset;
        let ys = y + stretch_offset;
        let zs = z + stretch_offset;

        // Origin of the rhombohedral super-cell; offsets stay in f64
        let xsf = xs.floor();
        let ysf = ys.floor();
        let zsf = zs.floor();

        // Unskew the origin back to input space
        let squish_offset = (xsf + ysf + zsf) * SQUISH;
        let xb = xsf + squish_offset;
        let yb = ysf + squish_offset;
        let zb = zsf + squish_offset;

        // Position inside the cell in lattice space; the sum picks the region
        let xins = xs - xsf;
        let yins = ys - ysf;
        let zins = zs - zsf;
        let in_sum = xins + yins + zins;

        // Offset from the cell origin
        let dx0 = x - xb;
        let dy0 = y - yb;
        let dz0 = z - zb;
        // Only the hash sees the integer origin, reduced to the table period
        let cell = Cell {
            xsb: lattice_index(xsf),
            ysb: lattice_index(ysf),
            zsb: lattice_index(zsf),
            dx0,
            dy0,
            dz0,
        };

        let vertices = if in_sum <= 1.0 {
            cell.lower_tetrahedron(xins, yins, zins, in_sum)
        } else if in_sum >= 2.0 {
            cell.upper_tetrahedron(xins, yins, zins, in_sum)
        } else {
            cell.octahedron(xins, yins, zins)
        };

        let value: f64 = vertices.iter().map(|v| self.contribution(v)).sum();

        value / NORM
    }
}

// Skewed origin of the super-cell (in [0, 256)) and the sample's offset from it
struct Cell {
    xsb: i32,
    ysb: i32,
    zsb: i32,
    dx0: f64,
    dy0: f64,
    dz0: f64,
}

// Four or six main vertices plus the two extra ones, kept on the stack
struct Vertices {
    main: [Vertex; 6],
    count: usize,
    extra: [Vertex; 2],
}

impl Vertices {
    fn tetrahedron(main: [Vertex; 4], extra: [Vertex; 2]) -> Self {
        let mut all = [Vertex::default(); 6];
        all[..4].copy_from_slice(&main);
        Self {
            main: all,
            count: 4,
            extra,
        }
    }

    fn octahedron(main: [Vertex; 6], extra: [Vertex; 2]) -> Self {
        Self {
            main,
            count: 6,
            extra,
        }
    }

    fn iter(&self) -> impl Iterator<Item = &Vertex> {
        self.main[..self.count].iter().chain(self.extra.iter())
    }
}

impl Cell {
    // Vertex at lattice offset (i, j, k) from the cell origin
    #[inline]
    fn vertex(&self, i: i32, j: i32, k: i32) -> Vertex {
        let squish = (i + j + k) as f64 * SQUISH;
        Vertex::new(
            self.xsb + i,
            self.ysb + j,
            self.zsb + k,
            self.dx0 - i as f64 - squish,
            self.dy0 - j as f64 - squish,
            self.dz0 - k as f64 - squish,
        )
    }

    // Inside the tetrahedron at (0,0,0)
    fn lower_tetrahedron(&self, xins: f64, yins: f64, zins: f64, in_sum: f64) -> Vertices {
        // Which two of (1,0,0), (0,1,0), (0,0,1) are closest
        let mut a_point: u8 = 0x01;
        let mut a_score = xins;
        let mut b_point: u8 = 0x02;
        let mut b_score = yins;
        if a_score >= b_score && zins > b_score {
            b_score = zins;
            b_point = 0x04;
        } else if a_score < b_score && zins > a_score {
            a_score = zins;
            a_point = 0x04;
        }

        let wins = 1.0 - in_sum;
        let ext = if wins > a_score || wins > b_score {
            // (0,0,0) is one of the closest two; the other is the closer of a and b
            let c = if b_score > a_score { b_point } else { a_point };

            let (x0, x1) = if c & 0x01 == 0 { (-1, 0) } else { (1, 1) };
            let (y0, y1) = if c & 0x02 == 0 {
                if c & 0x01 == 0 { (0, -1) } else { (-1, 0) }
            } else {
                (1, 1)
            };
            let (z0, z1) = if c & 0x04 == 0 { (0, -1) } else { (1, 1) };
            [self.raw_vertex(x0, y0, z0, 0), self.raw_vertex(x1, y1, z1, 0)]
        } else {
            // Extra vertices follow from the closest two
            let c = a_point | b_point;
            self.pair_from_mask(c, false)
        };

        let main = [
            self.vertex(0, 0, 0),
            self.vertex(1, 0, 0),
            self.vertex(0, 1, 0),
            self.vertex(0, 0, 1),
        ];
        Vertices::tetrahedron(main, ext)
    }

    // Inside the tetrahedron at (1,1,1)
    fn upper_tetrahedron(&self, xins: f64, yins: f64, zins: f64, in_sum: f64) -> Vertices {
        // Which two of (1,1,0), (1,0,1), (0,1,1) are closest
        let mut a_point: u8 = 0x06;
        let mut a_score = xins;
        let mut b_point: u8 = 0x05;
        let mut b_score = yins;
        if a_score <= b_score && zins < b_score {
            b_score = zins;
            b_point = 0x03;
        } else if a_score > b_score && zins < a_score {
            a_score = zins;
            a_point = 0x03;
        }

        let wins = 3.0 - in_sum;
        let ext = if wins < a_score || wins < b_score {
            // (1,1,1) is one of the closest two
            let c = if b_score < a_score { b_point } else { a_point };

            let (x0, x1) = if c & 0x01 != 0 { (2, 1) } else { (0, 0) };
            let (y0, y1) = if c & 0x02 != 0 {
                if c & 0x01 != 0 { (1, 2) } else { (2, 1) }
            } else {
                (0, 0)
            };
            let (z0, z1) = if c & 0x04 != 0 { (1, 2) } else { (0, 0) };
            // Offsets here all use the (1,1,1) squish, whatever the vertex
            [self.raw_vertex(x0, y0, z0, 3), self.raw_vertex(x1, y1, z1, 3)]
        } else {
            let c = a_point & b_point;
            self.pair_from_mask(c, true)
        };

        let main = [
            self.vertex(1, 1, 0),
            self.vertex(1, 0, 1),
            self.vertex(0, 1, 1),
            self.vertex(1, 1, 1),
        ];
        Vertices::tetrahedron(main, ext)
    }

    // Inside the octahedron between the two tetrahedra
    fn octahedron(&self, xins: f64, yins: f64, zins: f64) -> Vertices {
        let a_score;
        let mut a_point: u8;
        let mut a_further;
        let b_score;
        let mut b_point: u8;
        let mut b_further;

        // (1,0,0) vs (0,1,1)
        let p1 = xins + yins;
        if p1 > 1.0 {
            a_score = p1 - 1.0;
            a_point = 0x03;
            a_further = true;
        } else {
            a_score = 1.0 - p1;
            a_point = 0x04;
            a_further = false;
        }

        // (0,1,0) vs (1,0,1)
        let p2 = xins + zins;
        if p2 > 1.0 {
            b_score = p2 - 1.0;
            b_point = 0x05;
            b_further = true;
        } else {
            b_score = 1.0 - p2;
            b_point = 0x02;
            b_further = false;
        }

        // The closer of (0,0,1) and (1,1,0) replaces the further of the two above
        let p3 = yins + zins;
        let (score, point, further) = if p3 > 1.0 {
            (p3 - 1.0, 0x06, true)
        } else {
            (1.0 - p3, 0x01, false)
        };
        if a_score <= b_score && a_score < score {
            a_point = point;
            a_further = further;
        } else if a_score > b_score && b_score < score {
            b_point = point;
            b_further = further;
        }

        let ext = if a_further == b_further {
            if a_further {
                // Both on the (1,1,1) side: (1,1,1) plus one on the shared axis
                let c = a_point & b_point;
                [self.vertex(1, 1, 1), self.double_step(c)]
            } else {
                // Both on the (0,0,0) side: (0,0,0) plus one off the omitted axis
                let c = a_point | b_point;
                [self.vertex(0, 0, 0), self.negative_step(c)]
            }
        } else {
            // One on each side
            let (c1, c2) = if a_further {
                (a_point, b_point)
            } else {
                (b_point, a_point)
            };
            [self.negative_step(c1), self.double_step(c2)]
        };

        let main = [
            self.vertex(1, 0, 0),
            self.vertex(0, 1, 0),
            self.vertex(0, 0, 1),
            self.vertex(1, 1, 0),
            self.vertex(1, 0, 1),
            self.vertex(0, 1, 1),
        ];
        Vertices::octahedron(main, ext)
    }

    // Vertex at offset (i, j, k) whose distance uses a fixed squish multiple
    #[inline]
    fn raw_vertex(&self, i: i32, j: i32, k: i32, squish_steps: i32) -> Vertex {
        let squish = squish_steps as f64 * SQUISH;
        Vertex::new(
            self.xsb + i,
            self.ysb + j,
            self.zsb + k,
            self.dx0 - i as f64 - squish,
            self.dy0 - j as f64 - squish,
            self.dz0 - k as f64 - squish,
        )
    }

    // Extra pair decided axis by axis from a closest-vertex mask.
    // Lower side: set bit -> (1,1) else (0,-1).
    // Upper side: set bit -> (1,2) else (0,0).
    fn pair_from_mask(&self, c: u8, upper: bool) -> [Vertex; 2] {
        let axis = |bit: u8| -> (i32, i32) {
            match (upper, c & bit != 0) {
                (false, true) => (1, 1),
                (false, false) => (0, -1),
                (true, true) => (1, 2),
                (true, false) => (0, 0),
            }
        };
        let (x0, x1) = axis(0x01);
        let (y0, y1) = axis(0x02);
        let (z0, z1) = axis(0x04);
        [self.vertex(x0, y0, z0), self.vertex(x1, y1, z1)]
    }

    // Permutation of (2,0,0) along the first axis set in `c`
    fn double_step(&self, c: u8) -> Vertex {
        if c & 0x01 != 0 {
            self.vertex(2, 0, 0)
        } else if c & 0x02 != 0 {
            self.vertex(0, 2, 0)
        } else {
            self.vertex(0, 0, 2)
        }
    }

    // Permutation of (-1,1,1) with the -1 on the first axis clear in `c`
    fn negative_step(&self, c: u8) -> Vertex {
        if c & 0x01 == 0 {
            self.vertex(-1, 1, 1)
        } else if c & 0x02 == 0 {
            self.vertex(1, -1, 1)
        } else {
            self.vertex(1, 1, -1)
        }
    }
}

impl NoiseGenerator for SimplexNoise {
    fn dimensions(&self) -> (usize, usize) {
        (self.xres, self.yres)
    }

    fn generate_map(&self) -> NoiseMap {
        tracing::debug!(
            width = self.xres,
            height = self.yres,
            octaves = self.octaves,
            "generating open simplex noise map"
        );
        let (w, h) = (self.xres as f64, self.yres as f64);
        NoiseMap::from_fn(self.xres, self.yres, |x, y| {
            self.eval_octaves(x as f64 / w, y as f64 / h, self.octaves, self.persistence) as f32
        })
    }
}
