use crackdepth_image::Image;
use crackdepth_imgproc::{
    color::{hue_from_rgb, ChannelOrder},
    reduce,
    threshold::{in_hue_band, HueBand},
};
use serde::Serialize;

use crate::{config::DepthConfig, error::DepthError};

/// The result of a crack depth estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepthEstimate {
    /// Estimated depth in millimetres.
    pub depth_mm: f64,
    /// First row of the region of interest.
    pub first_row: usize,
    /// Last row of the region of interest.
    pub last_row: usize,
    /// The dividing line row, when it split the region of interest.
    pub dividing_line: Option<usize>,
}

/// Compute the hue grid, in degrees, of an RGB region.
pub fn hue_grid(region: &Image<u8, 3>, order: ChannelOrder) -> Result<Image<f64, 1>, DepthError> {
    let mut hue = Image::<f64, 1>::from_size_val(region.size(), 0.0)?;
    hue_from_rgb(region, &mut hue, order)?;
    Ok(hue)
}

/// Collect, in ascending order, the rows holding at least one pixel inside the hue band.
pub fn roi_rows(hue: &Image<f64, 1>, band: &HueBand) -> Result<Vec<usize>, DepthError> {
    let mut mask = Image::<u8, 1>::from_size_val(hue.size(), 0)?;
    in_hue_band(hue, &mut mask, band)?;
    Ok(reduce::flagged_rows(&reduce::rows_any(&mask)))
}

/// Collect the rows whose hue is exactly zero across the whole row.
///
/// A grid without columns has no dividing lines.
pub fn dividing_lines(hue: &Image<f64, 1>) -> Vec<usize> {
    if hue.cols() == 0 {
        return Vec::new();
    }
    reduce::flagged_rows(&reduce::rows_all_eq(hue, 0.0))
}

/// Turn the region of interest rows and the dividing line candidates into a depth.
///
/// # Arguments
///
/// * `roi_rows` - Sorted rows of the region of interest.
/// * `dividing` - Rows that are candidates for the dividing line.
/// * `depth_per_pixel` - Physical depth of one pixel row.
///
/// # Errors
///
/// * [`DepthError::NoMeasurableFeature`] if `roi_rows` is empty.
/// * [`DepthError::AmbiguousDividingLine`] if there is more than one candidate.
///
/// # Examples
///
/// ```
/// use crackdepth_depth::depth_from_rows;
///
/// let estimate = depth_from_rows(&[2, 3, 4, 9, 10], &[6], 1.0).unwrap();
/// assert_eq!(estimate.depth_mm, 4.0);
/// assert_eq!(estimate.dividing_line, Some(6));
/// ```
pub fn depth_from_rows(
    roi_rows: &[usize],
    dividing: &[usize],
    depth_per_pixel: f64,
) -> Result<DepthEstimate, DepthError> {
    let (Some(&first), Some(&last)) = (roi_rows.first(), roi_rows.last()) else {
        return Err(DepthError::NoMeasurableFeature);
    };

    let line = match dividing {
        [] => None,
        [line] => Some(*line),
        _ => return Err(DepthError::AmbiguousDividingLine(dividing.to_vec())),
    };

    let estimate = match line {
        // the dividing line splits the region, keep the larger side
        Some(d) if first < d && d < last => DepthEstimate {
            depth_mm: (last - d).max(d - first) as f64 * depth_per_pixel,
            first_row: first,
            last_row: last,
            dividing_line: Some(d),
        },
        _ => DepthEstimate {
            depth_mm: (last - first) as f64 * depth_per_pixel,
            first_row: first,
            last_row: last,
            dividing_line: None,
        },
    };

    Ok(estimate)
}

/// Estimate the crack depth from a hue grid.
pub fn estimate_depth(hue: &Image<f64, 1>, config: &DepthConfig) -> Result<DepthEstimate, DepthError> {
    let rows = roi_rows(hue, &config.hue_band)?;
    if rows.is_empty() {
        return Err(DepthError::NoMeasurableFeature);
    }

    let dividing = dividing_lines(hue);
    log::debug!(
        "roi rows {}..={} ({} rows), dividing line candidates {:?}",
        rows[0],
        rows[rows.len() - 1],
        rows.len(),
        dividing
    );

    depth_from_rows(&rows, &dividing, config.depth_per_pixel)
}

/// Estimate the crack depth of an RGB region.
///
/// # Examples
///
/// ```
/// use crackdepth_depth::{estimate_crack_depth, DepthConfig, DepthError};
/// use crackdepth_image::{Image, ImageSize};
///
/// // a green region has no crack colored pixels
/// let region = Image::<u8, 3>::new(
///     ImageSize { width: 1, height: 2 },
///     vec![0, 255, 0, 0, 255, 0],
/// )
/// .unwrap();
///
/// let res = estimate_crack_depth(&region, &DepthConfig::default());
/// assert_eq!(res, Err(DepthError::NoMeasurableFeature));
/// ```
pub fn estimate_crack_depth(
    region: &Image<u8, 3>,
    config: &DepthConfig,
) -> Result<DepthEstimate, DepthError> {
    let hue = hue_grid(region, config.channel_order)?;
    estimate_depth(&hue, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crackdepth_image::{ImageError, ImageSize};

    const UNIT: f64 = 12.0 / 110.0;

    // Builds a 3 column hue grid: `roi` rows at 30 degrees, `zero` rows at 0
    // and the remaining rows at 120 degrees.
    fn grid(height: usize, roi: &[usize], zero: &[usize]) -> Result<Image<f64, 1>, ImageError> {
        let data = (0..height)
            .flat_map(|row| {
                let hue = if roi.contains(&row) {
                    30.0
                } else if zero.contains(&row) {
                    0.0
                } else {
                    120.0
                };
                [hue; 3]
            })
            .collect();
        Image::new(ImageSize { width: 3, height }, data)
    }

    #[test]
    fn roi_rows_partial_rows() -> Result<(), DepthError> {
        #[rustfmt::skip]
        let hue = Image::<f64, 1>::new(
            ImageSize { width: 3, height: 4 },
            vec![
                120.0, 120.0, 120.0,
                120.0, 310.0, 120.0,
                0.0, 0.0, 0.0,
                69.0, 120.0, 0.0,
            ],
        )?;
        assert_eq!(roi_rows(&hue, &HueBand::default())?, vec![1, 3]);
        assert_eq!(dividing_lines(&hue), vec![2]);
        Ok(())
    }

    #[test]
    fn depth_without_dividing_line() -> Result<(), DepthError> {
        let hue = grid(12, &[2, 3, 4, 9, 10], &[])?;
        let estimate = estimate_depth(&hue, &DepthConfig::default())?;
        assert_relative_eq!(estimate.depth_mm, 8.0 * UNIT);
        assert_relative_eq!(estimate.depth_mm, 0.8727, epsilon = 1e-4);
        assert_eq!((estimate.first_row, estimate.last_row), (2, 10));
        assert_eq!(estimate.dividing_line, None);
        Ok(())
    }

    #[test]
    fn depth_with_dividing_line_inside() -> Result<(), DepthError> {
        let hue = grid(12, &[2, 3, 4, 9, 10], &[6])?;
        let estimate = estimate_depth(&hue, &DepthConfig::default())?;
        assert_relative_eq!(estimate.depth_mm, 4.0 * UNIT);
        assert_relative_eq!(estimate.depth_mm, 0.4364, epsilon = 1e-4);
        assert_eq!(estimate.dividing_line, Some(6));
        Ok(())
    }

    #[test]
    fn depth_with_dividing_line_outside() -> Result<(), DepthError> {
        let hue = grid(16, &[2, 3, 4, 9, 10], &[15])?;
        let estimate = estimate_depth(&hue, &DepthConfig::default())?;
        assert_relative_eq!(estimate.depth_mm, 8.0 * UNIT);
        assert_eq!(estimate.dividing_line, None);
        Ok(())
    }

    #[test]
    fn depth_with_dividing_line_on_boundary() -> Result<(), DepthError> {
        // a line on the ROI edge is not strictly inside the span
        let estimate = depth_from_rows(&[2, 10], &[2], UNIT)?;
        assert_relative_eq!(estimate.depth_mm, 8.0 * UNIT);
        assert_eq!(estimate.dividing_line, None);
        Ok(())
    }

    #[test]
    fn depth_takes_larger_side() -> Result<(), DepthError> {
        let estimate = depth_from_rows(&[1, 2, 9], &[3], 1.0)?;
        assert_relative_eq!(estimate.depth_mm, 6.0);
        let estimate = depth_from_rows(&[1, 2, 9], &[8], 1.0)?;
        assert_relative_eq!(estimate.depth_mm, 7.0);
        Ok(())
    }

    #[test]
    fn depth_ambiguous_dividing_line() -> Result<(), DepthError> {
        let hue = grid(12, &[2, 3, 4, 9, 10], &[0, 6])?;
        assert_eq!(
            estimate_depth(&hue, &DepthConfig::default()),
            Err(DepthError::AmbiguousDividingLine(vec![0, 6]))
        );
        Ok(())
    }

    #[test]
    fn depth_no_measurable_feature() -> Result<(), DepthError> {
        let hue = grid(8, &[], &[])?;
        assert_eq!(
            estimate_depth(&hue, &DepthConfig::default()),
            Err(DepthError::NoMeasurableFeature)
        );

        // empty ROI wins over an ambiguous dividing line
        let hue = grid(8, &[], &[1, 2])?;
        assert_eq!(
            estimate_depth(&hue, &DepthConfig::default()),
            Err(DepthError::NoMeasurableFeature)
        );
        Ok(())
    }

    #[test]
    fn depth_single_row() -> Result<(), DepthError> {
        let estimate = depth_from_rows(&[5], &[], UNIT)?;
        assert_eq!(estimate.depth_mm, 0.0);
        Ok(())
    }

    #[test]
    fn depth_empty_region() -> Result<(), DepthError> {
        let region = Image::<u8, 3>::new(
            ImageSize {
                width: 0,
                height: 4,
            },
            vec![],
        )?;
        assert_eq!(
            estimate_crack_depth(&region, &DepthConfig::default()),
            Err(DepthError::NoMeasurableFeature)
        );
        Ok(())
    }

    #[test]
    fn depth_scales_with_config() -> Result<(), DepthError> {
        let hue = grid(12, &[2, 10], &[])?;
        let config = DepthConfig::default().with_depth_per_pixel(0.5);
        assert_relative_eq!(estimate_depth(&hue, &config)?.depth_mm, 4.0);
        Ok(())
    }
}
