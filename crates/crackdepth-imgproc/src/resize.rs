use crackdepth_image::{Image, ImageError, ImageSize};
use fast_image_resize::{
    images::{Image as FrImage, ImageRef},
    FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer,
};

use crate::draw::draw_filled_rect;

/// Interpolation mode used when resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    /// Bilinear interpolation
    Bilinear,
    /// Nearest neighbor interpolation
    Nearest,
}

/// Resize an image to a new size using the [fast_image_resize](https://crates.io/crates/fast_image_resize) crate.
///
/// The function resizes an image to the size of `dst` using the specified interpolation mode.
/// It supports only 3-channel images and u8 data type.
///
/// # Example
///
/// ```
/// use crackdepth_image::{Image, ImageSize};
/// use crackdepth_imgproc::resize::{resize_fast, InterpolationMode};
///
/// let image = Image::<_, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0u8; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let mut image_resized = Image::<_, 3>::from_size_val([2, 3].into(), 0).unwrap();
///
/// resize_fast(&image, &mut image_resized, InterpolationMode::Nearest).unwrap();
///
/// assert_eq!(image_resized.size().width, 2);
/// assert_eq!(image_resized.size().height, 3);
/// ```
pub fn resize_fast(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 3>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if src.is_empty() || dst.is_empty() {
        return Err(ImageError::ResizeError(format!(
            "cannot resize {} into {}",
            src.size(),
            dst.size()
        )));
    }

    let src_image = ImageRef::new(
        src.width() as u32,
        src.height() as u32,
        src.as_slice(),
        PixelType::U8x3,
    )
    .map_err(|e| ImageError::ResizeError(e.to_string()))?;

    let (dst_width, dst_height) = (dst.width() as u32, dst.height() as u32);
    let mut dst_image =
        FrImage::from_slice_u8(dst_width, dst_height, dst.as_slice_mut(), PixelType::U8x3)
            .map_err(|e| ImageError::ResizeError(e.to_string()))?;

    let options = match interpolation {
        InterpolationMode::Bilinear => {
            ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear))
        }
        InterpolationMode::Nearest => ResizeOptions::new().resize_alg(ResizeAlg::Nearest),
    };

    Resizer::new()
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| ImageError::ResizeError(e.to_string()))?;

    Ok(())
}

/// Geometry of a letterbox transform, used to map model coordinates back to
/// the source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Scale applied to the source image.
    pub ratio: f32,
    /// Horizontal padding added on the left, in pixels.
    pub pad_x: f32,
    /// Vertical padding added on the top, in pixels.
    pub pad_y: f32,
    /// Size of the source image.
    pub source: ImageSize,
}

impl Letterbox {
    /// Map a point from letterboxed coordinates back to the source image,
    /// clipped to the source bounds.
    pub fn unmap(&self, x: f32, y: f32) -> (f32, f32) {
        let x = ((x - self.pad_x) / self.ratio).clamp(0.0, self.source.width as f32);
        let y = ((y - self.pad_y) / self.ratio).clamp(0.0, self.source.height as f32);
        (x, y)
    }
}

/// Resize an image keeping its aspect ratio and pad it to a square of `new_shape`.
///
/// When `auto` is set the padding is reduced to the minimum multiple of
/// `stride`, producing a rectangular output. Padding is split evenly between
/// both sides and filled with `pad_value`.
///
/// # Returns
///
/// The letterboxed image and the transform that produced it.
pub fn letterbox(
    src: &Image<u8, 3>,
    new_shape: usize,
    stride: usize,
    auto: bool,
    pad_value: u8,
) -> Result<(Image<u8, 3>, Letterbox), ImageError> {
    let (w, h) = (src.width() as f32, src.height() as f32);
    let ratio = (new_shape as f32 / h).min(new_shape as f32 / w);

    let unpad_w = (w * ratio).round() as usize;
    let unpad_h = (h * ratio).round() as usize;

    let mut dw = (new_shape - unpad_w.min(new_shape)) as f32;
    let mut dh = (new_shape - unpad_h.min(new_shape)) as f32;
    if auto && stride > 0 {
        dw %= stride as f32;
        dh %= stride as f32;
    }
    dw /= 2.0;
    dh /= 2.0;

    let top = (dh - 0.1).round().max(0.0) as usize;
    let bottom = (dh + 0.1).round().max(0.0) as usize;
    let left = (dw - 0.1).round().max(0.0) as usize;
    let right = (dw + 0.1).round().max(0.0) as usize;

    let resized = if unpad_w == src.width() && unpad_h == src.height() {
        src.clone()
    } else {
        let mut resized = Image::from_size_val([unpad_w, unpad_h].into(), 0u8)?;
        resize_fast(src, &mut resized, InterpolationMode::Bilinear)?;
        resized
    };

    let out_size = ImageSize {
        width: unpad_w + left + right,
        height: unpad_h + top + bottom,
    };
    let mut out = Image::from_size_val(out_size, 0u8)?;
    draw_filled_rect(
        &mut out,
        (0, 0),
        (out_size.width as i64, out_size.height as i64),
        [pad_value; 3],
    );

    // paste the resized image row by row
    let row_len = unpad_w * 3;
    for (y, row) in resized.as_slice().chunks_exact(row_len.max(1)).enumerate() {
        let offset = ((top + y) * out_size.width + left) * 3;
        out.as_slice_mut()[offset..offset + row_len].copy_from_slice(row);
    }

    Ok((
        out,
        Letterbox {
            ratio,
            pad_x: dw,
            pad_y: dh,
            source: src.size(),
        },
    ))
}
