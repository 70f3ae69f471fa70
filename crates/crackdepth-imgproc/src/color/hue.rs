use crate::parallel;
use crackdepth_image::{Image, ImageError};

/// Order of the color channels in an interleaved 3 channel image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    /// Channels stored as R, G, B.
    #[default]
    Rgb,
    /// Channels stored as B, G, R.
    Bgr,
}

/// Compute the hue in degrees of a single RGB pixel.
///
/// The channels are normalized to [0, 1] before the conversion. Gray pixels
/// (equal channels) have hue 0. When several channels share the maximum the
/// red channel takes precedence, then green.
///
/// # Returns
///
/// The hue in degrees in the range [0, 360).
///
/// # Example
///
/// ```
/// use crackdepth_imgproc::color::hue_from_rgb_pixel;
///
/// assert_eq!(hue_from_rgb_pixel(255, 0, 0), 0.0);
/// assert!((hue_from_rgb_pixel(0, 255, 0) - 120.0).abs() < 1e-9);
/// assert_eq!(hue_from_rgb_pixel(40, 40, 40), 0.0);
/// ```
pub fn hue_from_rgb_pixel(r: u8, g: u8, b: u8) -> f64 {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    if delta == 0.0 {
        return 0.0;
    }

    let sector = if max == r {
        (g - b) / delta
    } else if max == g {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };

    // floored modulo keeps the hue in [0, 1) before scaling
    (sector / 6.0).rem_euclid(1.0) * 360.0
}

/// Convert an RGB image to a single channel hue image.
///
/// Every pixel is converted independently, rows are processed in parallel.
///
/// # Arguments
///
/// * `src` - The input image with 3 channels.
/// * `dst` - The output hue image in degrees [0, 360).
/// * `order` - The channel order of `src`.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use crackdepth_image::{Image, ImageSize};
/// use crackdepth_imgproc::color::{hue_from_rgb, ChannelOrder};
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![255, 0, 0, 0, 0, 255],
/// )
/// .unwrap();
///
/// let mut hue = Image::<f64, 1>::from_size_val(image.size(), 0.0).unwrap();
///
/// hue_from_rgb(&image, &mut hue, ChannelOrder::Rgb).unwrap();
///
/// assert_eq!(hue.as_slice()[0], 0.0);
/// assert!((hue.as_slice()[1] - 240.0).abs() < 1e-9);
/// ```
pub fn hue_from_rgb(
    src: &Image<u8, 3>,
    dst: &mut Image<f64, 1>,
    order: ChannelOrder,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[0] = match order {
            ChannelOrder::Rgb => hue_from_rgb_pixel(src_pixel[0], src_pixel[1], src_pixel[2]),
            ChannelOrder::Bgr => hue_from_rgb_pixel(src_pixel[2], src_pixel[1], src_pixel[0]),
        };
    });

    Ok(())
}
