use crackdepth_image::{Image, ImageError};

use crate::parallel;

/// A hue band with a wrap-around tail.
///
/// A hue `h` is inside the band when `low < h < high` or `h > wrap`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HueBand {
    /// Exclusive lower bound of the main interval, in degrees.
    pub low: f64,
    /// Exclusive upper bound of the main interval, in degrees.
    pub high: f64,
    /// Hues strictly above this value are inside the band, in degrees.
    pub wrap: f64,
}

impl Default for HueBand {
    fn default() -> Self {
        Self {
            low: 0.0,
            high: 70.0,
            wrap: 300.0,
        }
    }
}

impl HueBand {
    /// Check whether a hue value lies in the band.
    #[inline]
    pub fn contains(&self, hue: f64) -> bool {
        (hue > self.low && hue < self.high) || hue > self.wrap
    }
}

/// Mark the pixels of a hue image that fall inside a hue band.
///
/// # Arguments
///
/// * `src` - The input hue image in degrees.
/// * `dst` - The output mask, 255 inside the band and 0 elsewhere.
/// * `band` - The hue band.
///
/// # Examples
///
/// ```
/// use crackdepth_image::{Image, ImageSize};
/// use crackdepth_imgproc::threshold::{in_hue_band, HueBand};
///
/// let hue = Image::<f64, 1>::new(
///     ImageSize {
///         width: 4,
///         height: 1,
///     },
///     vec![0.0, 35.0, 120.0, 330.0],
/// )
/// .unwrap();
///
/// let mut mask = Image::<u8, 1>::from_size_val(hue.size(), 0).unwrap();
///
/// in_hue_band(&hue, &mut mask, &HueBand::default()).unwrap();
///
/// assert_eq!(mask.as_slice(), &[0, 255, 0, 255]);
/// ```
pub fn in_hue_band(
    src: &Image<f64, 1>,
    dst: &mut Image<u8, 1>,
    band: &HueBand,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if band.contains(*src_pixel) { 255 } else { 0 };
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{in_hue_band, HueBand};
    use crackdepth_image::{Image, ImageError, ImageSize};

    #[test]
    fn band_bounds_are_exclusive() {
        let band = HueBand::default();
        assert!(!band.contains(0.0));
        assert!(band.contains(0.5));
        assert!(band.contains(69.9));
        assert!(!band.contains(70.0));
        assert!(!band.contains(300.0));
        assert!(band.contains(300.1));
        assert!(band.contains(359.9));
    }

    #[test]
    fn in_hue_band_custom() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let hue = Image::<f64, 1>::new(
            ImageSize { width: 3, height: 2 },
            vec![
                10.0, 100.0, 150.0,
                200.0, 250.0, 350.0,
            ],
        )?;

        let band = HueBand {
            low: 90.0,
            high: 160.0,
            wrap: 360.0,
        };

        let mut mask = Image::<u8, 1>::from_size_val(hue.size(), 7)?;
        in_hue_band(&hue, &mut mask, &band)?;

        assert_eq!(mask.as_slice(), &[0, 255, 255, 0, 0, 0]);
        Ok(())
    }
}
