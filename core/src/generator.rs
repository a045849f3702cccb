use serde::{Deserialize, Serialize};

use crate::NoiseGenerator;
use crate::map::NoiseMap;
use crate::open_simplex::SimplexNoise;
use crate::perlin2::GradientNoise;
use crate::polynomial::SubdivisionNoise;

// Which algorithm a `Generator` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    #[default]
    Perlin,
    OpenSimplex,
    Polynomial,
}

// One of the three generators, chosen at runtime.
#[derive(Debug, Clone)]
pub enum Generator {
    Gradient(GradientNoise),
    Simplex(SimplexNoise),
    Subdivision(SubdivisionNoise),
}

impl Generator {
    pub fn kind(&self) -> NoiseKind {
        match self {
            Generator::Gradient(_) => NoiseKind::Perlin,
            Generator::Simplex(_) => NoiseKind::OpenSimplex,
            Generator::Subdivision(_) => NoiseKind::Polynomial,
        }
    }

    fn inner(&self) -> &dyn NoiseGenerator {
        match self {
            Generator::Gradient(g) => g,
            Generator::Simplex(g) => g,
            Generator::Subdivision(g) => g,
        }
    }
}

impl NoiseGenerator for Generator {
    fn dimensions(&self) -> (usize, usize) {
        self.inner().dimensions()
    }

    fn generate_map(&self) -> NoiseMap {
        self.inner().generate_map()
    }
}

impl From<GradientNoise> for Generator {
    fn from(g: GradientNoise) -> Self {
        Generator::Gradient(g)
    }
}

impl From<SimplexNoise> for Generator {
    fn from(g: SimplexNoise) -> Self {
        Generator::Simplex(g)
    }
}

impl From<SubdivisionNoise> for Generator {
    fn from(g: SubdivisionNoise) -> Self {
        Generator::Subdivision(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_matches_variant() {
        let simplex = SimplexNoise::new(8, 6).unwrap();
        let g: Generator = simplex.clone().into();
        assert_eq!(g.kind(), NoiseKind::OpenSimplex);
        assert_eq!(g.dimensions(), (8, 6));
        assert_eq!(g.generate_map(), simplex.generate_map());
    }

    #[test]
    fn trait_objects_share_the_contract() {
        let gens: Vec<Box<dyn NoiseGenerator>> = vec![
            Box::new(GradientNoise::new(2, 3).unwrap()),
            Box::new(SimplexNoise::new(5, 4).unwrap()),
            Box::new(SubdivisionNoise::new(6, 7).unwrap()),
        ];
        for g in &gens {
            let m = g.generate_map();
            assert_eq!(m.dimensions(), g.dimensions());
            assert!(m.is_complete());
        }
    }
}
