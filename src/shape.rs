/// Compute the dimensions an image should be resized to so that its largest
/// dimension does not exceed `max_size`, keeping its proportions.
///
/// `shape` is given as `[rows, cols]`. If the image is already small enough
/// the shape is returned as is. Otherwise the planned dimensions are returned
/// in reversed order (`[width, height]`), which is what the resize step takes.
///
/// Ties between equal dimensions are broken by the first one.
pub fn get_new_shape(shape: [usize; 2], max_size: usize) -> [usize; 2] {
    let max_dim = shape[0].max(shape[1]);
    if max_dim <= max_size {
        return shape;
    }

    let ind_max = if shape[0] == max_dim { 0 } else { 1 };
    let ind_other = 1 - ind_max;
    let min_over_max = shape[ind_other] as f64 / shape[ind_max] as f64;

    let mut new_shape = shape;
    new_shape[ind_max] = max_size;
    new_shape[ind_other] = (min_over_max * max_size as f64).round_ties_even() as usize;
    new_shape.reverse();
    new_shape
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_shape_is_unchanged() {
        assert_eq!(get_new_shape([256, 256], 256), [256, 256]);
        assert_eq!(get_new_shape([100, 30], 256), [100, 30]);
        assert_eq!(get_new_shape([0, 0], 256), [0, 0]);
    }

    #[test]
    fn wide_shape_is_scaled_and_reversed() {
        // ratio 128 / 512 = 0.25 -> [64, 256] -> reversed
        assert_eq!(get_new_shape([128, 512], 256), [256, 64]);
    }

    #[test]
    fn tall_shape_is_scaled_and_reversed() {
        assert_eq!(get_new_shape([1024, 300], 256), [75, 256]);
    }

    #[test]
    fn square_shape_picks_first_dimension() {
        assert_eq!(get_new_shape([600, 600], 256), [256, 256]);
    }

    #[test]
    fn rounding_is_half_to_even() {
        // 100 / 400 * 10 = 2.5 -> 2, 300 / 400 * 10 = 7.5 -> 8
        assert_eq!(get_new_shape([100, 400], 10), [10, 2]);
        assert_eq!(get_new_shape([300, 400], 10), [10, 8]);
    }

    #[test]
    fn aspect_ratio_is_preserved() {
        for &(rows, cols) in &[(480, 640), (1080, 1920), (333, 777), (4000, 3000), (257, 1)] {
            let [w, h] = get_new_shape([rows, cols], 256);
            let (big, small, expected) = if rows >= cols {
                (h, w, cols as f64 * 256.0 / rows as f64)
            } else {
                (w, h, rows as f64 * 256.0 / cols as f64)
            };
            assert_eq!(big, 256, "{:?} -> {:?}", (rows, cols), (w, h));
            assert!((small as f64 - expected).abs() <= 0.5, "{:?} -> {:?}", (rows, cols), (w, h));
        }
    }
}
