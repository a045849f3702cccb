use serde::{Deserialize, Serialize};

use crate::error::NoiseError;
use crate::generator::{Generator, NoiseKind};
use crate::lattice::{DEFAULT_SEED, PermutationTable};
use crate::open_simplex::{DEFAULT_OCTAVES, DEFAULT_PERSISTENCE, SimplexNoise};
use crate::perlin2::{DEFAULT_SUPERSAMPLE, GradientNoise};
use crate::polynomial::{EdgeAnchors, FillMode, SubdivisionMode, SubdivisionNoise};

// Everything needed to build a `Generator`.
// Missing fields fall back to the defaults, so a TOML document only needs
// to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    // Algorithm to run.
    pub kind: NoiseKind,
    // Horizontal resolution.
    pub xres: usize,
    // Vertical resolution.
    pub yres: usize,
    // Seed; `None` keeps the reference permutation table.
    pub seed: Option<u64>,
    // Gradient noise: cells per lattice unit.
    pub supersample: usize,
    // OpenSimplex: number of octaves.
    pub octaves: usize,
    // OpenSimplex: amplitude decay per octave.
    pub persistence: f64,
    // Polynomial: flat quadrants or recursive subdivision.
    pub subdivision: SubdivisionMode,
    // Polynomial: how filled cells are tracked.
    pub fill: FillMode,
    // Polynomial: value of the quadrant border anchors in flat mode.
    pub edges: EdgeAnchors,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            kind: NoiseKind::Perlin,
            xres: 64,
            yres: 64,
            seed: None,
            supersample: DEFAULT_SUPERSAMPLE,
            octaves: DEFAULT_OCTAVES,
            persistence: DEFAULT_PERSISTENCE,
            subdivision: SubdivisionMode::Flat,
            fill: FillMode::ZeroSentinel,
            edges: EdgeAnchors::Mean,
        }
    }
}

impl MapConfig {
    pub fn from_toml(src: &str) -> Result<Self, NoiseError> {
        Ok(toml::from_str(src)?)
    }

    // Validate and construct the configured generator.
    pub fn build(&self) -> Result<Generator, NoiseError> {
        let perm = PermutationTable::from_optional_seed(self.seed);
        let generator: Generator = match self.kind {
            NoiseKind::Perlin => GradientNoise::with_permutation(perm, self.xres, self.yres)?
                .supersample(self.supersample)?
                .into(),
            NoiseKind::OpenSimplex => SimplexNoise::with_permutation(perm, self.xres, self.yres)?
                .octaves(self.octaves)?
                .persistence(self.persistence)
                .into(),
            NoiseKind::Polynomial => {
                let seed = self.seed.unwrap_or(DEFAULT_SEED);
                SubdivisionNoise::with_seed(seed, self.xres, self.yres)?
                    .mode(self.subdivision)
                    .fill(self.fill)
                    .edges(self.edges)
                    .into()
            }
        };
        tracing::debug!(kind = ?self.kind, xres = self.xres, yres = self.yres, "built generator");
        Ok(generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoiseGenerator;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(MapConfig::from_toml("").unwrap(), MapConfig::default());
    }

    #[test]
    fn parses_partial_document() {
        let cfg = MapConfig::from_toml(
            r#"
            kind = "polynomial"
            xres = 32
            yres = 16
            seed = 99
            subdivision = "recursive"
            fill = "mask"
            edges = "zero"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.kind, NoiseKind::Polynomial);
        assert_eq!(cfg.seed, Some(99));
        assert_eq!(cfg.subdivision, SubdivisionMode::Recursive);
        assert_eq!(cfg.fill, FillMode::Mask);
        assert_eq!(cfg.edges, EdgeAnchors::Zero);
        assert_eq!(cfg.octaves, DEFAULT_OCTAVES);

        let g = cfg.build().unwrap();
        assert_eq!(g.kind(), NoiseKind::Polynomial);
        assert_eq!(g.dimensions(), (32, 16));
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        assert!(matches!(
            MapConfig::from_toml("kind = \"voronoi\""),
            Err(NoiseError::Config(_))
        ));
    }

    #[test]
    fn build_rejects_invalid_values() {
        let zero = MapConfig {
            xres: 0,
            ..Default::default()
        };
        assert!(matches!(zero.build(), Err(NoiseError::InvalidResolution { .. })));

        let no_octaves = MapConfig {
            kind: NoiseKind::OpenSimplex,
            octaves: 0,
            ..Default::default()
        };
        assert!(matches!(no_octaves.build(), Err(NoiseError::InvalidOctaves(0))));
    }

    #[test]
    fn perlin_map_is_supersampled() {
        let cfg = MapConfig {
            xres: 3,
            yres: 2,
            supersample: 5,
            ..Default::default()
        };
        assert_eq!(cfg.build().unwrap().generate_map().dimensions(), (15, 10));
    }
}
