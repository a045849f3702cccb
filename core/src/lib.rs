// Procedural height-field generators: gradient (Perlin), OpenSimplex and
// corner-seeded polynomial noise. Each produces a finished `NoiseMap`.
pub mod config;
pub mod error;
pub mod generator;
pub mod lattice;
pub mod map;
pub mod open_simplex;
pub mod perlin2;
pub mod polynomial;
pub mod utils;

pub use config::MapConfig;
pub use error::NoiseError;
pub use generator::{Generator, NoiseKind};
pub use lattice::PermutationTable;
pub use map::{HeightMap2D, NoiseMap};
pub use open_simplex::SimplexNoise;
pub use perlin2::GradientNoise;
pub use polynomial::{Anchors, EdgeAnchors, FillMode, SubdivisionMode, SubdivisionNoise};

// A generator that fills a whole grid in one call.
// Implementations must assign every cell; consumers do no further checks.
pub trait NoiseGenerator {
    // Output (width, height) of `generate_map`
    fn dimensions(&self) -> (usize, usize);

    // Build a fresh map owned by the caller
    fn generate_map(&self) -> NoiseMap;
}
