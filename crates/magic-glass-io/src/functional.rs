use std::path::Path;

use magic_glass_image::{Image, ImageSize};

use crate::error::IoError;
use crate::{jpeg, png};

/// Default JPEG quality used by [`write_image_any_rgb8`].
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Reads an image from the given file path as RGB8.
///
/// The method tries to read from any image format supported by the image crate.
/// Gray, alpha and 16-bit sources are converted to 8-bit RGB.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    log::debug!(
        "decoded {} as {:?} {}x{}",
        file_path.display(),
        img.color(),
        img.width(),
        img.height()
    );

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Writes an RGB8 image, picking the encoder from the file extension.
///
/// `jpg`/`jpeg` are written with [`DEFAULT_JPEG_QUALITY`], `png` losslessly.
///
/// # Errors
///
/// Returns [`IoError::InvalidFileExtension`] for any other extension.
pub fn write_image_any_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    write_image_any_rgb8_with_quality(file_path, image, DEFAULT_JPEG_QUALITY)
}

/// Same as [`write_image_any_rgb8`] with an explicit JPEG quality.
pub fn write_image_any_rgb8_with_quality(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
    quality: u8,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let ext = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => jpeg::write_image_jpeg_rgb8(file_path, image, quality),
        Some("png") => png::write_image_png_rgb8(file_path, image),
        _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard() -> Result<Image<u8, 3>, IoError> {
        let size = ImageSize {
            width: 4,
            height: 4,
        };
        let mut image = Image::from_size_val(size, 0)?;
        for y in 0..4 {
            for x in 0..4 {
                if (x + y) % 2 == 0 {
                    image.set_pixel(x, y, [255, 255, 255])?;
                }
            }
        }
        Ok(image)
    }

    #[test]
    fn write_read_any_png() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("board.PNG");

        let image = checkerboard()?;
        write_image_any_rgb8(&file_path, &image)?;
        let back = read_image_any_rgb8(&file_path)?;
        assert_eq!(back, image);

        Ok(())
    }

    #[test]
    fn write_read_any_jpeg() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("board.jpeg");

        write_image_any_rgb8(&file_path, &checkerboard()?)?;
        let back = read_image_any_rgb8(&file_path)?;
        assert_eq!(back.size(), ImageSize::from([4, 4]));

        Ok(())
    }

    #[test]
    fn write_unknown_extension() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let res = write_image_any_rgb8(tmp_dir.path().join("board.gif"), &checkerboard()?);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));

        let res = write_image_any_rgb8(tmp_dir.path().join("board"), &checkerboard()?);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));

        Ok(())
    }

    #[test]
    fn read_missing_file() {
        let res = read_image_any_rgb8("does/not/exist.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }
}
