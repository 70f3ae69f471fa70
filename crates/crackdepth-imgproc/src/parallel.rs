use rayon::prelude::*;

use crackdepth_image::Image;

/// Apply a function to each pixel in the image in parallel.
///
/// Rows are distributed over the rayon thread pool; within a row pixels are
/// visited in order. Images with zero width are a no-op.
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    if src.cols() == 0 {
        return;
    }

    src.as_slice()
        .par_chunks_exact(C1 * src.cols())
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * src.cols()))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each pixel in the image in parallel with a value.
pub fn par_iter_rows_val<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&T1, &mut T2) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    if src.cols() == 0 {
        return;
    }

    src.as_slice()
        .par_chunks_exact(C1 * src.cols())
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * src.cols()))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .iter()
                .zip(dst_chunk.iter_mut())
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Reduce each row of a single channel image to a value in parallel.
///
/// The result holds one value per row, in row order.
pub fn par_map_rows<T, U>(src: &Image<T, 1>, f: impl Fn(&[T]) -> U + Send + Sync) -> Vec<U>
where
    T: Send + Sync,
    U: Send,
{
    let rows = src.rows_iter().collect::<Vec<_>>();
    rows.into_par_iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use crackdepth_image::{Image, ImageError, ImageSize};

    #[test]
    fn par_iter_rows_copies_channel() -> Result<(), ImageError> {
        let src = Image::<u8, 2>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![1, 10, 2, 20, 3, 30, 4, 40],
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;

        super::par_iter_rows(&src, &mut dst, |s, d| d[0] = s[1]);

        assert_eq!(dst.as_slice(), &[10, 20, 30, 40]);
        Ok(())
    }

    #[test]
    fn par_map_rows_sums() -> Result<(), ImageError> {
        let src = Image::<u32, 1>::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            vec![1, 2, 3, 4, 5, 6],
        )?;
        let sums = super::par_map_rows(&src, |row| row.iter().sum::<u32>());
        assert_eq!(sums, vec![6, 15]);
        Ok(())
    }
}
