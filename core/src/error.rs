use thiserror::Error;

// Errors raised while building a generator. Evaluation itself never fails.
#[derive(Error, Debug)]
pub enum NoiseError {
    #[error("invalid resolution {xres}x{yres}: both dimensions must be positive")]
    InvalidResolution { xres: usize, yres: usize },
    #[error("resolution {xres}x{yres} too small: need at least {min}x{min}")]
    ResolutionTooSmall { xres: usize, yres: usize, min: usize },
    #[error("supersampling factor must be positive, got {0}")]
    InvalidSupersample(usize),
    #[error("octave count must be positive, got {0}")]
    InvalidOctaves(usize),
    #[error("permutation override of length {0} is not a bijection of 0..256")]
    InvalidPermutation(usize),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

// Shared precondition for every generator
pub(crate) fn check_resolution(xres: usize, yres: usize) -> Result<(), NoiseError> {
    if xres == 0 || yres == 0 {
        return Err(NoiseError::InvalidResolution { xres, yres });
    }
    Ok(())
}
