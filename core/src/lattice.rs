use crate::error::NoiseError;

// Size of every permutation table; lattice coordinates wrap with this period.
pub const TABLE_SIZE: usize = 256;

// Seed used whenever the caller does not provide one.
pub const DEFAULT_SEED: u64 = 2021;

// Ken Perlin's "Improved Noise" ordering, shared by basically every
// gradient noise implementation out there.
// A single wrong entry changes every derived field, so don't touch it.
const PERM_REFERENCE: [u8; TABLE_SIZE] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, //
    140, 36, 103, 30, 69, 142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, //
    247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219, 203, 117, 35, 11, 32, //
    57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175, //
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, //
    60, 211, 133, 230, 220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, //
    65, 25, 63, 161, 1, 216, 80, 73, 209, 76, 132, 187, 208, 89, 18, 169, //
    200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173, 186, 3, 64, //
    52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, //
    207, 206, 59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, //
    119, 248, 152, 2, 44, 154, 163, 70, 221, 153, 101, 155, 167, 43, 172, 9, //
    129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232, 178, 185, 112, 104, //
    218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162, 241, //
    81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, //
    184, 84, 204, 176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, //
    222, 114, 67, 29, 24, 72, 243, 141, 128, 195, 78, 66, 215, 61, 156, 180, //
];

// 48-bit linear congruential generator (multiplier 0x5DEECE66D, increment
// 0xB, 31-bit outputs). Seeded tables are reproducible bit for bit against
// any other generator built on the same constants.
#[derive(Debug, Clone)]
pub struct Lcg48 {
    state: u64,
}

impl Lcg48 {
    const MULTIPLIER: u64 = 0x5_DEEC_E66D;
    const INCREMENT: u64 = 0xB;
    const MASK: u64 = (1 << 48) - 1;

    pub fn new(seed: u64) -> Self {
        Self {
            state: (seed ^ Self::MULTIPLIER) & Self::MASK,
        }
    }

    // Advance the state and return the top `bits` bits
    fn next(&mut self, bits: u32) -> i32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
            & Self::MASK;
        (self.state >> (48 - bits)) as i32
    }

    // Uniform integer in `[0, bound)`. `bound` must be positive.
    pub fn next_int(&mut self, bound: i32) -> i32 {
        debug_assert!(bound > 0, "bound must be positive");
        // Power of two: take the high bits directly
        if bound & bound.wrapping_neg() == bound {
            return ((bound as i64 * self.next(31) as i64) >> 31) as i32;
        }
        loop {
            let bits = self.next(31);
            let val = bits % bound;
            // Reject the values from the incomplete last bucket
            if bits.wrapping_sub(val).wrapping_add(bound - 1) >= 0 {
                return val;
            }
        }
    }
}

// A bijection of `0..256` used to hash lattice coordinates.
// Immutable after construction. Each generator owns its own copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationTable {
    perm: [u8; TABLE_SIZE],
}

impl PermutationTable {
    // The fixed reference table. No randomness involved.
    pub fn reference() -> Self {
        tracing::trace!("using reference permutation table");
        Self {
            perm: PERM_REFERENCE,
        }
    }

    // Seeded Fisher–Yates shuffle. The same seed always yields the same table.
    pub fn from_seed(seed: u64) -> Self {
        tracing::trace!(seed, "building seeded permutation table");
        let mut source: [u8; TABLE_SIZE] = std::array::from_fn(|i| i as u8);
        let mut perm = [0u8; TABLE_SIZE];
        let mut rng = Lcg48::new(seed);
        // Draw from the shrinking prefix of `source` and move the tail
        // element into the hole
        for i in (0..TABLE_SIZE).rev() {
            let r = rng.next_int(i as i32 + 1) as usize;
            perm[i] = source[r];
            source[r] = source[i];
        }
        Self { perm }
    }

    // Use an externally supplied table. Fails unless it is a bijection of `0..256`.
    pub fn from_slice(values: &[u8]) -> Result<Self, NoiseError> {
        let perm: [u8; TABLE_SIZE] = values
            .try_into()
            .map_err(|_| NoiseError::InvalidPermutation(values.len()))?;
        let table = Self { perm };
        if !table.is_bijection() {
            return Err(NoiseError::InvalidPermutation(values.len()));
        }
        tracing::trace!("using permutation override");
        Ok(table)
    }

    // Seeded table, or the reference one when no seed is given
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::reference(),
        }
    }

    // Every value `0..256` appears exactly once.
    pub fn is_bijection(&self) -> bool {
        let mut seen = [false; TABLE_SIZE];
        for &v in &self.perm {
            if seen[v as usize] {
                return false;
            }
            seen[v as usize] = true;
        }
        true
    }

    // Table lookup with wrap-around; negative coordinates resolve via
    // floor-toward-negative-infinity semantics.
    #[inline]
    pub fn get(&self, index: i32) -> u8 {
        self.perm[index.rem_euclid(TABLE_SIZE as i32) as usize]
    }

    pub fn as_array(&self) -> &[u8; TABLE_SIZE] {
        &self.perm
    }
}

// Floor of a coordinate as a table index in [0, 256). The reduction happens
// in f64, so coordinates past the i32 range neither saturate nor overflow.
// Non-finite input maps to 0.
#[inline]
pub(crate) fn lattice_index(floor: f64) -> i32 {
    floor.rem_euclid(TABLE_SIZE as f64) as i32
}

impl Default for PermutationTable {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reference_table_is_bijection() {
        let t = PermutationTable::reference();
        assert!(t.is_bijection());
        assert_eq!(t.get(0), 151);
        assert_eq!(t.get(255), 180);
    }

    #[test]
    fn get_wraps_negative_indices() {
        let t = PermutationTable::reference();
        assert_eq!(t.get(-1), t.get(255));
        assert_eq!(t.get(256), t.get(0));
        assert_eq!(t.get(-257), t.get(255));
    }

    #[test]
    fn lattice_index_reduces_before_the_cast() {
        assert_eq!(lattice_index(3.0), 3);
        assert_eq!(lattice_index(-1.0), 255);
        assert_eq!(lattice_index(3.0e9), 0);
        assert_eq!(lattice_index(-3.0e9 - 1.0), 255);
        assert_eq!(lattice_index(2.0f64.powi(40) + 7.0), 7);
        assert_eq!(lattice_index(f64::NAN), 0);
        assert_eq!(lattice_index(f64::INFINITY), 0);
    }

    #[test]
    fn seeded_determinism() {
        assert_eq!(
            PermutationTable::from_seed(1234),
            PermutationTable::from_seed(1234)
        );
        assert_ne!(
            PermutationTable::from_seed(1234),
            PermutationTable::from_seed(1235)
        );
    }

    #[test]
    fn lcg_matches_known_sequence() {
        // seed 42, bound 10
        let mut rng = Lcg48::new(42);
        assert_eq!(rng.next_int(10), 0);
        assert_eq!(rng.next_int(10), 3);
        assert_eq!(rng.next_int(10), 8);
    }

    #[test]
    fn lcg_power_of_two_bound() {
        let mut rng = Lcg48::new(7);
        for _ in 0..1000 {
            let v = rng.next_int(256);
            assert!((0..256).contains(&v));
        }
    }

    #[test]
    fn override_rejects_non_bijection() {
        let mut values: Vec<u8> = (0..=255).collect();
        assert!(PermutationTable::from_slice(&values).is_ok());
        values[10] = values[11];
        assert!(matches!(
            PermutationTable::from_slice(&values),
            Err(NoiseError::InvalidPermutation(256))
        ));
        assert!(matches!(
            PermutationTable::from_slice(&values[..100]),
            Err(NoiseError::InvalidPermutation(100))
        ));
    }

    proptest! {
        #[test]
        fn seeded_table_is_bijection(seed in any::<u64>()) {
            prop_assert!(PermutationTable::from_seed(seed).is_bijection());
        }
    }
}
