use crate::{Desc, VocErr, VocResult, DESC_LEN};
use log::{debug, trace};
use opencv::{
    core::{KeyPoint, Vector},
    features2d::SIFT,
    imgcodecs, imgproc,
    prelude::*,
};
use std::path::Path;

type CvImage = opencv::core::Mat;
type CvMat = opencv::core::Mat;

/// An 8-bit image, either single channel or three channel (BGR).
#[derive(Debug)]
pub enum Image {
    Grayscale(CvImage),
    Color(CvImage),
}

impl Image {
    /// Spatial dimensions `[rows, cols]`, whatever the channel layout.
    pub fn dims(&self) -> [usize; 2] {
        let m = self.mat();
        [m.rows() as usize, m.cols() as usize]
    }

    pub fn channels(&self) -> i32 {
        self.mat().channels()
    }

    pub fn is_gray(&self) -> bool {
        matches!(self, Image::Grayscale(_))
    }

    pub fn mat(&self) -> &CvImage {
        match self {
            Image::Grayscale(m) | Image::Color(m) => m,
        }
    }

    /// Convert to a single channel image. Grayscale images are returned as is.
    pub fn into_gray(self) -> VocResult<Self> {
        match self {
            Image::Grayscale(_) => Ok(self),
            Image::Color(m) => {
                let mut gray = CvMat::default();
                imgproc::cvt_color_def(&m, &mut gray, imgproc::COLOR_BGR2GRAY)?;
                Ok(Image::Grayscale(gray))
            }
        }
    }

    /// Apply an operation to the pixel buffer, keeping the variant.
    pub(crate) fn map<F>(self, f: F) -> VocResult<Self>
    where
        F: FnOnce(&CvImage) -> VocResult<CvImage>,
    {
        Ok(match self {
            Image::Grayscale(m) => Image::Grayscale(f(&m)?),
            Image::Color(m) => Image::Color(f(&m)?),
        })
    }
}

pub(crate) fn path_str(path: &Path) -> VocResult<&str> {
    path.to_str()
        .ok_or_else(|| VocErr::PathToString(path.to_path_buf()))
}

/// Use opencv to load an image in color (BGR).
///
/// Fails with `NotFound` if nothing exists at `path` and with `Decode` if the
/// file is not an image opencv can read.
pub fn load_image<P: AsRef<Path>>(path: P) -> VocResult<Image> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(VocErr::NotFound(path.to_path_buf()));
    }
    let img: CvImage = imgcodecs::imread(path_str(path)?, imgcodecs::IMREAD_COLOR)?;
    if img.empty() {
        return Err(VocErr::Decode(path.to_path_buf()));
    }
    trace!("loaded {:?}: {}x{}", path, img.cols(), img.rows());
    Ok(Image::Color(img))
}

/// Extract SIFT keypoint descriptors from an image.
pub fn sift_from_cvimage(cv_img: &CvImage) -> VocResult<Vec<Desc>> {
    // Create detector with opencv defaults
    let mut sift = SIFT::create_def()?;

    // Detect keypoints and compute descriptors
    let mut kps = Vector::<KeyPoint>::new();
    let mut desc = CvMat::default();
    let mask = CvMat::default();
    sift.detect_and_compute(cv_img, &mask, &mut kps, &mut desc, false)?;

    if kps.is_empty() || desc.empty() {
        return Ok(Vec::new());
    }
    descriptors_from_mat(&desc)
}

/// Copy rows of a `CV_32F` descriptor matrix into descriptor buffers.
fn descriptors_from_mat(desc: &CvMat) -> VocResult<Vec<Desc>> {
    if desc.typ() != opencv::core::CV_32F || desc.cols() as usize != DESC_LEN {
        return Err(VocErr::OpenCvDecode);
    }
    (0..desc.rows())
        .map(|i| -> VocResult<Desc> {
            let row = desc.at_row::<f32>(i)?;
            row.try_into().map_err(|_| VocErr::OpenCvDecode)
        })
        .collect()
}

/// Use opencv to load an image and extract SIFT keypoint descriptors.
///
/// An image without keypoints gives an empty list.
pub fn get_descriptors<P: AsRef<Path>>(image_path: P) -> VocResult<Vec<Desc>> {
    let img = load_image(&image_path)?;
    let descriptors = sift_from_cvimage(img.mat())?;
    debug!(
        "Extracted {} SIFT descriptors from {:?}",
        descriptors.len(),
        image_path.as_ref()
    );
    Ok(descriptors)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use opencv::core::{Point, Scalar, CV_8UC1, CV_8UC3};

    /// Gray background with a few filled shapes: plenty of blobs and corners.
    pub(crate) fn shapes_image(rows: i32, cols: i32) -> CvImage {
        let mut img =
            CvMat::new_rows_cols_with_default(rows, cols, CV_8UC3, Scalar::all(90.)).unwrap();
        let step = (rows.min(cols) / 4).max(8);
        let mut k = 0;
        for y in (step / 2..rows - step / 2).step_by(step as usize) {
            for x in (step / 2..cols - step / 2).step_by(step as usize) {
                let color = if k % 2 == 0 {
                    Scalar::new(250., 230., 20., 0.)
                } else {
                    Scalar::new(10., 30., 200., 0.)
                };
                imgproc::circle(&mut img, Point::new(x, y), step / 3, color, -1, imgproc::LINE_8, 0)
                    .unwrap();
                k += 1;
            }
        }
        img
    }

    pub(crate) fn flat_image(rows: i32, cols: i32, value: f64) -> CvImage {
        CvMat::new_rows_cols_with_default(rows, cols, CV_8UC1, Scalar::all(value)).unwrap()
    }

    pub(crate) fn write(dir: &Path, name: &str, img: &CvImage) -> std::path::PathBuf {
        let path = dir.join(name);
        assert!(imgcodecs::imwrite(path.to_str().unwrap(), img, &Vector::new()).unwrap());
        path
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, VocErr::NotFound(_)));
    }

    #[test]
    fn load_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, VocErr::Decode(_)));
    }

    #[test]
    fn load_gray_file_as_color() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "flat.png", &flat_image(20, 30, 12.));
        let img = load_image(&path).unwrap();
        assert!(!img.is_gray());
        assert_eq!(img.channels(), 3);
        assert_eq!(img.dims(), [20, 30]);

        let gray = img.into_gray().unwrap();
        assert!(gray.is_gray());
        assert_eq!(gray.channels(), 1);
        assert_eq!(gray.dims(), [20, 30]);
    }

    #[test]
    fn flat_image_has_no_descriptors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "flat.png", &flat_image(64, 64, 128.));
        assert!(get_descriptors(&path).unwrap().is_empty());
    }

    #[test]
    fn textured_image_has_descriptors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "shapes.png", &shapes_image(160, 200));
        let descriptors = get_descriptors(&path).unwrap();
        assert!(!descriptors.is_empty());
        // SIFT descriptors are non-negative histograms
        assert!(descriptors.iter().flatten().all(|&c| c >= 0.));
    }

    #[test]
    fn wrong_descriptor_layout_is_rejected() {
        let m = flat_image(2, DESC_LEN as i32, 1.);
        assert!(matches!(descriptors_from_mat(&m), Err(VocErr::OpenCvDecode)));
    }
}
