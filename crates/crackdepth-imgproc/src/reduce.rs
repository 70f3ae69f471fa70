use crackdepth_image::Image;

use crate::parallel;

/// Flag the rows of a mask that contain at least one non-zero pixel.
///
/// # Examples
///
/// ```
/// use crackdepth_image::{Image, ImageSize};
/// use crackdepth_imgproc::reduce::rows_any;
///
/// let mask = Image::<u8, 1>::new(
///     ImageSize {
///         width: 2,
///         height: 3,
///     },
///     vec![0, 0, 0, 255, 255, 255],
/// )
/// .unwrap();
///
/// assert_eq!(rows_any(&mask), vec![false, true, true]);
/// ```
pub fn rows_any(mask: &Image<u8, 1>) -> Vec<bool> {
    parallel::par_map_rows(mask, |row| row.iter().any(|&v| v != 0))
}

/// Flag the rows of an image whose pixels all equal `val`.
///
/// Rows of an image with zero width are vacuously flagged.
pub fn rows_all_eq<T>(src: &Image<T, 1>, val: T) -> Vec<bool>
where
    T: PartialEq + Copy + Send + Sync,
{
    parallel::par_map_rows(src, |row| row.iter().all(|&v| v == val))
}

/// Collect the indices of the flagged rows in ascending order.
pub fn flagged_rows(flags: &[bool]) -> Vec<usize> {
    flags
        .iter()
        .enumerate()
        .filter_map(|(i, &flag)| flag.then_some(i))
        .collect()
}
