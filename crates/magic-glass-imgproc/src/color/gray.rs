use magic_glass_image::{Image, ImageError};

use crate::pixel_iter;

/// Luminance weights in hundredths: Y = 0.30 * R + 0.59 * G + 0.11 * B
const RW: u32 = 30;
const GW: u32 = 59;
const BW: u32 = 11;

/// Average of the three channels, truncated toward zero.
#[inline]
pub fn gray_average_u8(r: u8, g: u8, b: u8) -> u8 {
    ((r as u16 + g as u16 + b as u16) / 3) as u8
}

/// Luminance of an RGB8 pixel, truncated toward zero.
///
/// Computes `floor(0.30 * R + 0.59 * G + 0.11 * B)` exactly in integer arithmetic,
/// so white maps to 255 without any floating point drift.
///
/// # Examples
///
/// ```
/// use magic_glass_imgproc::color::gray_luminance_u8;
///
/// assert_eq!(gray_luminance_u8(255, 255, 255), 255);
/// assert_eq!(gray_luminance_u8(100, 0, 0), 30);
/// assert_eq!(gray_luminance_u8(0, 0, 9), 0);
/// ```
#[inline]
pub fn gray_luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    ((RW * r as u32 + GW * g as u32 + BW * b as u32) / 100) as u8
}

/// Convert an RGB8 image to a single channel luminance image.
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output grayscale image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use magic_glass_image::{Image, ImageSize};
/// use magic_glass_imgproc::color::gray_from_rgb_u8;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![255, 255, 255, 100, 0, 0],
/// )
/// .unwrap();
///
/// let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// gray_from_rgb_u8(&image, &mut gray).unwrap();
/// assert_eq!(gray.as_slice(), &[255, 30]);
/// ```
pub fn gray_from_rgb_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    pixel_iter::ensure_same_size(src, dst)?;

    pixel_iter::iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[0] = gray_luminance_u8(src_pixel[0], src_pixel[1], src_pixel[2]);
    });

    Ok(())
}

/// Convert a grayscale image to an RGB image by replicating the grayscale value across all three channels.
///
/// # Arguments
///
/// * `src` - The input grayscale image.
/// * `dst` - The output RGB image.
///
/// Precondition: the input and output images must have the same size.
pub fn rgb_from_gray<T>(src: &Image<T, 1>, dst: &mut Image<T, 3>) -> Result<(), ImageError>
where
    T: Copy,
{
    pixel_iter::ensure_same_size(src, dst)?;

    pixel_iter::iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[0] = src_pixel[0];
        dst_pixel[1] = src_pixel[0];
        dst_pixel[2] = src_pixel[0];
    });

    Ok(())
}
