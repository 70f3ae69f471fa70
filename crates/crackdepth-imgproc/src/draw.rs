use crackdepth_image::Image;
use std::cmp::{max, min};

// Writes a pixel only when it lies inside the image.
#[inline]
fn put_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x < 0 || y < 0 || x >= img.cols() as i64 || y >= img.rows() as i64 {
        return;
    }
    let start = (y as usize * img.cols() + x as usize) * C;
    img.as_slice_mut()[start..start + C].copy_from_slice(&color);
}

/// Draws a line on an image inplace using Bresenham's line algorithm.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
/// * `thickness` - The thickness of the line. Values above 1 are approximated
///   with a square brush.
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;
    let half = if thickness > 1 {
        thickness as i64 / 2
    } else {
        0
    };

    loop {
        for i in -half..=half {
            for j in -half..=half {
                put_pixel(img, x0 + i, y0 + j, color);
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draws a rectangle outline on an image inplace.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `top_left` - The top-left corner coordinates (x, y).
/// * `bottom_right` - The bottom-right corner coordinates (x, y).
/// * `color` - The color of the rectangle outline.
/// * `thickness` - The thickness of the lines.
pub fn draw_rect<const C: usize>(
    img: &mut Image<u8, C>,
    top_left: (i64, i64),
    bottom_right: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    // corners beyond the brush reach of the border draw nothing, clip them there
    let margin = thickness as i64 / 2 + 1;
    let clip_x = |x: i64| x.clamp(-margin, img.cols() as i64 - 1 + margin);
    let clip_y = |y: i64| y.clamp(-margin, img.rows() as i64 - 1 + margin);

    let (x0, y0) = (clip_x(top_left.0), clip_y(top_left.1));
    let (x1, y1) = (clip_x(bottom_right.0), clip_y(bottom_right.1));

    let (lx0, lx1) = (min(x0, x1), max(x0, x1));
    let (ly0, ly1) = (min(y0, y1), max(y0, y1));

    draw_line(img, (lx0, ly0), (lx1, ly0), color, thickness);
    draw_line(img, (lx0, ly1), (lx1, ly1), color, thickness);
    draw_line(img, (lx0, ly0), (lx0, ly1), color, thickness);
    draw_line(img, (lx1, ly0), (lx1, ly1), color, thickness);
}

/// Draws a filled rectangle on an image inplace.
///
/// The bottom-right corner is exclusive.
pub fn draw_filled_rect<const C: usize>(
    img: &mut Image<u8, C>,
    top_left: (i64, i64),
    bottom_right: (i64, i64),
    color: [u8; C],
) {
    let (x_start, y_start) = top_left;
    let (x_end, y_end) = bottom_right;

    let x_min = max(0, min(x_start, x_end));
    let y_min = max(0, min(y_start, y_end));
    let x_max = min(img.cols() as i64, max(x_start, x_end));
    let y_max = min(img.rows() as i64, max(y_start, y_end));

    for y in y_min..y_max {
        for x in x_min..x_max {
            put_pixel(img, x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crackdepth_image::{Image, ImageError, ImageSize};

    #[rustfmt::skip]
    #[test]
    fn test_draw_line() -> Result<(), ImageError> {
        let mut img = Image::new(
            ImageSize { width: 5, height: 5 }, vec![0u8; 25],
        )?;
        draw_line(&mut img, (0, 0), (4, 4), [255], 1);
        assert_eq!(
            img.as_slice(),
            &[
                255,   0,   0,   0,   0,
                  0, 255,   0,   0,   0,
                  0,   0, 255,   0,   0,
                  0,   0,   0, 255,   0,
                  0,   0,   0,   0, 255,
            ]
        );
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_draw_rect() -> Result<(), ImageError> {
        let mut img = Image::new(
            ImageSize { width: 5, height: 5 }, vec![0u8; 25],
        )?;
        draw_rect(&mut img, (1, 1), (3, 3), [128], 1);
        assert_eq!(
            img.as_slice(),
            &[
                  0,   0,   0,   0,   0,
                  0, 128, 128, 128,   0,
                  0, 128,   0, 128,   0,
                  0, 128, 128, 128,   0,
                  0,   0,   0,   0,   0,
            ]
        );
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_draw_rect_clipped() -> Result<(), ImageError> {
        let mut img = Image::new(
            ImageSize { width: 3, height: 3 }, vec![0u8; 9],
        )?;
        draw_rect(&mut img, (-1, -1), (1, 1), [9], 1);
        assert_eq!(
            img.as_slice(),
            &[
                0, 9, 0,
                9, 9, 0,
                0, 0, 0,
            ]
        );
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_draw_rect_far_outside() -> Result<(), ImageError> {
        let mut img = Image::new(
            ImageSize { width: 3, height: 3 }, vec![0u8; 9],
        )?;
        draw_rect(&mut img, (i64::MIN, 0), (2, 2), [9], 1);
        assert_eq!(
            img.as_slice(),
            &[
                9, 9, 9,
                0, 0, 9,
                9, 9, 9,
            ]
        );

        let mut img = Image::new(
            ImageSize { width: 3, height: 3 }, vec![0u8; 9],
        )?;
        draw_rect(&mut img, (0, 0), (i64::MAX, 1_000_000_000), [9], 3);
        assert_eq!(
            img.as_slice(),
            &[
                9, 9, 9,
                9, 9, 9,
                9, 9, 0,
            ]
        );
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_draw_filled_rect() -> Result<(), ImageError> {
        let mut img = Image::new(
            ImageSize { width: 4, height: 3 }, vec![0u8; 12],
        )?;
        draw_filled_rect(&mut img, (1, 0), (3, 2), [7]);
        assert_eq!(
            img.as_slice(),
            &[
                0, 7, 7, 0,
                0, 7, 7, 0,
                0, 0, 0, 0,
            ]
        );
        Ok(())
    }
}
