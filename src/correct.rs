use crate::opencv_utils::path_str;
use crate::{get_new_shape, load_image, CorrectionParams, Image, VocErr, VocResult};
use log::debug;
use opencv::{
    core::{self, Mat, Scalar, Size, Vector, CV_8UC1},
    imgcodecs, imgproc, photo,
    prelude::*,
};
use std::path::{Path, PathBuf};

/// Filter strength of the non-local-means denoising.
const DENOISE_H: f32 = 3.;
const DENOISE_TEMPLATE_WINDOW: i32 = 7;
const DENOISE_SEARCH_WINDOW: i32 = 21;

/// Correct the contrast, brightness and noise of an image, and reduce its
/// resolution if its largest dimension exceeds `params.max_size`.
///
/// Stages, in order: optional grayscale conversion, contrast stretching,
/// histogram equalization, non-local-means denoising, proportional resize.
pub fn correct_image<P: AsRef<Path>>(path: P, params: &CorrectionParams) -> VocResult<Image> {
    let mut img = load_image(&path)?;
    if params.gray_shades {
        img = img.into_gray()?;
    }

    let img = img
        .map(|m| per_channel(m, stretch_contrast))?
        .map(|m| per_channel(m, equalize))?
        .map(denoise)?;

    let shape = img.dims();
    let new_shape = get_new_shape(shape, params.max_size);
    debug!(
        "Correcting {:?}: {:?} -> {:?} ({} channels)",
        path.as_ref(),
        shape,
        new_shape,
        img.channels()
    );
    if new_shape == shape {
        return Ok(img);
    }
    // planned shape is width first
    img.map(|m| resize(m, new_shape[0], new_shape[1]))
}

/// Correct `in_dir/file_name` with [`correct_image`] and write the result to
/// `out_dir/file_name`, the format following the extension.
///
/// `out_dir` must exist. Returns the path written.
pub fn save_corrected_image<P, Q, R>(
    file_name: P,
    in_dir: Q,
    out_dir: R,
    params: &CorrectionParams,
) -> VocResult<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let img = correct_image(in_dir.as_ref().join(&file_name), params)?;
    let out = out_dir.as_ref().join(&file_name);
    if !imgcodecs::imwrite(path_str(&out)?, img.mat(), &Vector::new())? {
        return Err(VocErr::Encode(out));
    }
    debug!("Saved corrected image to {:?}", out);
    Ok(out)
}

/// Run a single channel operation on every channel of `src`.
fn per_channel<F>(src: &Mat, f: F) -> VocResult<Mat>
where
    F: Fn(&Mat) -> VocResult<Mat>,
{
    if src.channels() == 1 {
        return f(src);
    }
    let mut planes = Vector::<Mat>::new();
    core::split(src, &mut planes)?;
    let mut out = Vector::<Mat>::new();
    for plane in planes.iter() {
        out.push(f(&plane)?);
    }
    let mut dst = Mat::default();
    core::merge(&out, &mut dst)?;
    Ok(dst)
}

/// Linearly remap the intensities of a single channel so the darkest pixel
/// becomes 0 and the brightest 255. Flat channels are returned unchanged.
///
/// Mapped values are truncated, not rounded.
fn stretch_contrast(src: &Mat) -> VocResult<Mat> {
    let mut lo = 0.;
    let mut hi = 0.;
    core::min_max_loc(src, Some(&mut lo), Some(&mut hi), None, None, &Mat::default())?;
    if hi <= lo {
        return Ok(src.try_clone()?);
    }
    let (lo, hi) = (lo as i32, hi as i32);
    let mut table = Mat::new_rows_cols_with_default(1, 256, CV_8UC1, Scalar::all(0.))?;
    for v in 0..256 {
        let mapped = ((v - lo) * 255 / (hi - lo)).clamp(0, 255);
        *table.at_2d_mut::<u8>(0, v)? = mapped as u8;
    }
    let mut dst = Mat::default();
    core::lut(src, &table, &mut dst)?;
    Ok(dst)
}

fn equalize(src: &Mat) -> VocResult<Mat> {
    let mut dst = Mat::default();
    imgproc::equalize_hist(src, &mut dst)?;
    Ok(dst)
}

fn denoise(src: &Mat) -> VocResult<Mat> {
    let mut dst = Mat::default();
    photo::fast_nl_means_denoising(
        src,
        &mut dst,
        DENOISE_H,
        DENOISE_TEMPLATE_WINDOW,
        DENOISE_SEARCH_WINDOW,
    )?;
    Ok(dst)
}

fn resize(src: &Mat, width: usize, height: usize) -> VocResult<Mat> {
    let mut dst = Mat::default();
    imgproc::resize(
        src,
        &mut dst,
        Size::new(width as i32, height as i32),
        0.,
        0.,
        imgproc::INTER_CUBIC,
    )?;
    Ok(dst)
}
