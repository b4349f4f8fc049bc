use fast_image_resize as fr;
use magic_glass_image::{Image, ImageError, ImageSize};

/// Interpolation mode for the resize operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InterpolationMode {
    /// Bilinear interpolation
    Bilinear,
    /// Nearest neighbor interpolation
    #[default]
    Nearest,
}

/// Size of an image scaled by a zoom factor.
///
/// Each side is truncated toward zero and kept at least one pixel wide.
///
/// # Example
///
/// ```
/// use magic_glass_image::ImageSize;
/// use magic_glass_imgproc::resize::scaled_size;
///
/// let size = scaled_size(ImageSize { width: 100, height: 30 }, 1.25);
/// assert_eq!(size, ImageSize { width: 125, height: 37 });
/// ```
pub fn scaled_size(size: ImageSize, factor: f64) -> ImageSize {
    let scale = |side: usize| ((factor * side as f64) as usize).max(1);
    ImageSize {
        width: scale(size.width),
        height: scale(size.height),
    }
}

fn side_u32(side: usize, size: ImageSize) -> Result<u32, ImageError> {
    u32::try_from(side)
        .ok()
        .filter(|&side| side > 0)
        .ok_or(ImageError::InvalidImageSize(size.width, size.height, 1, 1))
}

/// Resize an RGB8 image using the [fast_image_resize](https://crates.io/crates/fast_image_resize) crate.
///
/// Both buffers are wrapped in place; the destination size drives the output.
///
/// # Arguments
///
/// * `src` - The input image container with 3 channels.
/// * `dst` - The output image container, already allocated with the new size.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use magic_glass_image::{Image, ImageSize};
/// use magic_glass_imgproc::resize::{resize_fast, InterpolationMode};
///
/// let image = Image::<_, 3>::new(
///    ImageSize {
///       width: 4,
///       height: 5,
///    },
///    vec![0u8; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let new_size = ImageSize {
///   width: 2,
///   height: 3,
/// };
///
/// let mut image_resized = Image::<_, 3>::from_size_val(new_size, 0).unwrap();
///
/// resize_fast(&image, &mut image_resized, InterpolationMode::Nearest).unwrap();
///
/// assert_eq!(image_resized.size().width, 2);
/// assert_eq!(image_resized.size().height, 3);
/// ```
///
/// # Errors
///
/// The function returns an error if either image is empty or the buffers cannot be wrapped.
pub fn resize_fast(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 3>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    let src_width = side_u32(src.width(), src.size())?;
    let src_height = side_u32(src.height(), src.size())?;
    let dst_width = side_u32(dst.width(), dst.size())?;
    let dst_height = side_u32(dst.height(), dst.size())?;

    let src_image =
        fr::images::ImageRef::new(src_width, src_height, src.as_slice(), fr::PixelType::U8x3)
            .map_err(|e| ImageError::IncompatiblePixelTypes(e.to_string()))?;

    let mut dst_image = fr::images::Image::from_slice_u8(
        dst_width,
        dst_height,
        dst.as_slice_mut(),
        fr::PixelType::U8x3,
    )
    .map_err(|e| ImageError::IncompatiblePixelTypes(e.to_string()))?;

    let alg = match interpolation {
        InterpolationMode::Bilinear => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
        InterpolationMode::Nearest => fr::ResizeAlg::Nearest,
    };
    let options = fr::ResizeOptions::new().resize_alg(alg);

    fr::Resizer::new()
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| ImageError::IncompatiblePixelTypes(e.to_string()))?;

    Ok(())
}

/// Return `src` scaled to `size`, or a clone when the sizes already match.
pub fn resized_to(
    src: &Image<u8, 3>,
    size: ImageSize,
    interpolation: InterpolationMode,
) -> Result<Image<u8, 3>, ImageError> {
    if src.size() == size {
        return Ok(src.clone());
    }

    let mut dst = Image::from_size_val(size, 0)?;
    resize_fast(src, &mut dst, interpolation)?;
    Ok(dst)
}
