use std::path::PathBuf;
use thiserror::Error;

/// Proportional downscale planning for image resizing.
pub mod shape;
pub use shape::get_new_shape;

/// Contrast and exposure invariant normalization of descriptors.
pub mod descriptor;
pub use descriptor::{correct_descriptor, DescNorm};

/// Deduplicating set of normalized descriptors.
pub mod vocab;
pub use vocab::Vocabulary;
#[cfg(feature = "opencv")]
pub use vocab::add_descriptors_to_vocab;

/// Knobs for the image corrector.
pub mod params;
pub use params::CorrectionParams;

/// Image correction (contrast, noise, size) using opencv.
#[cfg(feature = "opencv")]
pub mod correct;
#[cfg(feature = "opencv")]
pub use correct::*;

/// Utilities for loading images and extracting keypoint descriptors using opencv.
#[cfg(feature = "opencv")]
pub mod opencv_utils;
#[cfg(feature = "opencv")]
pub use opencv_utils::*;

/// Length of a SIFT descriptor.
pub const DESC_LEN: usize = 128;

/// Supported descriptor type is a 128-dimensional float array.
///
/// This is the layout produced by SIFT. Descriptors are stored as raw
/// values, and only compared for exact (bitwise) equality.
pub type Desc = [f32; DESC_LEN];

pub type VocResult<T> = std::result::Result<T, VocErr>;

#[derive(Error, Debug)]
pub enum VocErr {
    #[error("Image not found: {0:?}")]
    NotFound(PathBuf),
    #[error("Could not decode image: {0:?}")]
    Decode(PathBuf),
    #[error("Could not encode image: {0:?}")]
    Encode(PathBuf),
    #[error("Path is not valid UTF-8: {0:?}")]
    PathToString(PathBuf),
    #[cfg(feature = "opencv")]
    #[error("Opencv Error")]
    OpenCvInternal(#[from] opencv::Error),
    #[cfg(feature = "opencv")]
    #[error("Opencv Descriptor decode error")]
    OpenCvDecode,
}
