use std::path::Path;

use jpeg_encoder::{ColorType, Encoder};
use magic_glass_image::Image;

use crate::error::IoError;

/// Writes the given JPEG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG image.
/// - `image` - The image to encode.
/// - `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest)
///
/// # Errors
///
/// Fails when a side exceeds 65535 pixels, the file cannot be created or encoding fails.
pub fn write_image_jpeg_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
    quality: u8,
) -> Result<(), IoError> {
    let size = image.size();
    let (width, height) = match (u16::try_from(size.width), u16::try_from(size.height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(IoError::UnsupportedImageSize(size.width, size.height)),
    };

    let encoder = Encoder::new_file(file_path, quality.min(100))?;
    encoder.encode(image.as_slice(), width, height, ColorType::Rgb)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functional::read_image_any_rgb8;
    use magic_glass_image::ImageSize;

    #[test]
    fn write_flat_jpeg() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("flat.jpg");

        let size = ImageSize {
            width: 32,
            height: 16,
        };
        let image = Image::<u8, 3>::from_size_pixel(size, [200, 40, 40])?;
        write_image_jpeg_rgb8(&file_path, &image, 100)?;
        assert!(file_path.exists(), "File does not exist: {:?}", file_path);

        let back = read_image_any_rgb8(&file_path)?;
        assert_eq!(back.size(), size);

        // lossy, but a flat color survives within a small tolerance
        let px = back.pixel(16, 8)?;
        for (got, want) in px.iter().zip([200u8, 40, 40]) {
            assert!(got.abs_diff(want) <= 4, "{px:?}");
        }

        Ok(())
    }
}
