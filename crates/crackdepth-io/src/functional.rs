use std::path::Path;

use crackdepth_image::{Image, ImageSize};

use crate::error::IoError;

/// File extensions, lowercase, of the image formats read and written by this module.
pub const IMAGE_EXTENSIONS: &[&str] = &["bmp", "jpeg", "jpg", "png", "tif", "tiff", "webp"];

/// File extensions, lowercase, of the video containers decoded frame by frame.
pub const VIDEO_EXTENSIONS: &[&str] = &["avi", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg", "wmv"];

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            extensions.contains(&ext.to_ascii_lowercase().as_str())
        })
}

/// Check whether a path has one of the supported image extensions.
pub fn has_image_extension(path: impl AsRef<Path>) -> bool {
    has_extension(path.as_ref(), IMAGE_EXTENSIONS)
}

/// Check whether a path has one of the supported video extensions.
pub fn has_video_extension(path: impl AsRef<Path>) -> bool {
    has_extension(path.as_ref(), VIDEO_EXTENSIONS)
}

/// Reads an RGB8 image from the given file path.
///
/// The method tries to read from any image format supported by the image crate
/// and converts the result to 8-bit RGB.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref().to_owned();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path));
    }

    let bytes = std::fs::read(&file_path)?;

    let img = image::ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Writes an RGB8 image to the given file path.
///
/// The encoder is chosen from the file extension.
///
/// # Arguments
///
/// * `file_path` - The path to the output image.
/// * `image` - The image to write.
pub fn write_image_rgb8(file_path: impl AsRef<Path>, image: &Image<u8, 3>) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    if !has_image_extension(file_path) {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    image::save_buffer(
        file_path,
        image.as_slice(),
        image.width() as u32,
        image.height() as u32,
        image::ExtendedColorType::Rgb8,
    )?;

    Ok(())
}
