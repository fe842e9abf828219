use serde::{Deserialize, Serialize};

/// Default limit on the largest dimension of a corrected image.
pub const DEFAULT_MAX_SIZE: usize = 256;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
/// Parameters of the image corrector.
pub struct CorrectionParams {
    /// Largest allowed dimension after correction. Larger images are
    /// downscaled, keeping their proportions.
    pub max_size: usize,
    /// Convert to grayscale before correcting.
    pub gray_shades: bool,
}

impl Default for CorrectionParams {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            gray_shades: true,
        }
    }
}

impl CorrectionParams {
    pub fn new(max_size: usize, gray_shades: bool) -> Self {
        Self {
            max_size,
            gray_shades,
        }
    }

    /// Same parameters, keeping the color channels.
    pub fn color(self) -> Self {
        Self {
            gray_shades: false,
            ..self
        }
    }
}
