use crackdepth_image::{Image, ImageError, ImageSize};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Crop an image to a specified region.
///
/// # Arguments
///
/// * `src` - The source image to crop.
/// * `dst` - The destination image to store the cropped image.
/// * `x` - The x-coordinate of the top-left corner of the region to crop.
/// * `y` - The y-coordinate of the top-left corner of the region to crop.
///
/// # Errors
///
/// Returns an error if the region does not fit inside the source image.
///
/// # Examples
///
/// ```rust
/// use crackdepth_image::{Image, ImageSize};
/// use crackdepth_imgproc::crop::crop_image;
///
/// let image = Image::<_, 1>::new(ImageSize { width: 4, height: 4 }, vec![
///     0u8, 1, 2, 3,
///     4u8, 5, 6, 7,
///     8u8, 9, 10, 11,
///     12u8, 13, 14, 15
/// ]).unwrap();
///
/// let mut cropped = Image::<_, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 0u8).unwrap();
///
/// crop_image(&image, &mut cropped, 1, 1).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_image<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    x: usize,
    y: usize,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if x + dst.cols() > src.cols() || y + dst.rows() > src.rows() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            x + dst.cols(),
            y + dst.rows(),
        ));
    }

    let dst_cols = dst.cols();
    if dst_cols == 0 {
        return Ok(());
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .enumerate()
        .for_each(|(i, dst_row)| {
            // get the slice at the top left corner
            let offset = (y + i) * src.cols() * C + x * C;
            let src_slice = &src.as_slice()[offset..offset + dst_cols * C];

            // copy the slice to the destination
            dst_row.copy_from_slice(src_slice);
        });

    Ok(())
}

/// Crop the region `[y1, y2) x [x1, x2)` out of an image.
///
/// Corners are clamped to the image bounds, an inverted region yields an
/// empty image.
///
/// # Examples
///
/// ```rust
/// use crackdepth_image::{Image, ImageSize};
/// use crackdepth_imgproc::crop::crop_region;
///
/// let image = Image::<_, 1>::new(ImageSize { width: 3, height: 2 }, vec![
///     0u8, 1, 2,
///     3u8, 4, 5,
/// ]).unwrap();
///
/// let cropped = crop_region(&image, 1, 0, 10, 1).unwrap();
///
/// assert_eq!(cropped.size(), ImageSize { width: 2, height: 1 });
/// assert_eq!(cropped.as_slice(), &[1u8, 2]);
/// ```
pub fn crop_region<T, const C: usize>(
    src: &Image<T, C>,
    x1: i64,
    y1: i64,
    x2: i64,
    y2: i64,
) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Default + Send + Sync,
{
    let clamp = |v: i64, max: usize| v.clamp(0, max as i64) as usize;

    let (x1, x2) = (clamp(x1, src.cols()), clamp(x2, src.cols()));
    let (y1, y2) = (clamp(y1, src.rows()), clamp(y2, src.rows()));

    let size = ImageSize {
        width: x2.saturating_sub(x1),
        height: y2.saturating_sub(y1),
    };

    let mut dst = Image::from_size_val(size, T::default())?;
    crop_image(src, &mut dst, x1, y1)?;

    Ok(dst)
}
