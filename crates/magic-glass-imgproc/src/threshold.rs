use magic_glass_image::{Image, ImageError};

use crate::pixel_iter;

/// Number of entries in an 8-bit lookup table.
pub const LUT_SIZE: usize = 256;

/// A 256-entry binary step function used for thresholding 8-bit samples.
///
/// Values strictly below `level` map to 0, every other value maps to 255.
/// The table is a self-contained snapshot of the level it was built from.
///
/// # Examples
///
/// ```
/// use magic_glass_imgproc::threshold::ThresholdLut;
///
/// let lut = ThresholdLut::new(128);
/// assert_eq!(lut.apply(200), 255);
/// assert_eq!(lut.apply(50), 0);
/// assert_eq!(lut.apply(255), 255);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThresholdLut {
    level: u8,
    table: [u8; LUT_SIZE],
}

impl ThresholdLut {
    /// Build the lookup table for the given cut level.
    pub fn new(level: u8) -> Self {
        let mut table = [255u8; LUT_SIZE];
        table[..level as usize].fill(0);
        Self { level, table }
    }

    /// The level this table was built from.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Map a single sample through the table.
    #[inline]
    pub fn apply(&self, value: u8) -> u8 {
        self.table[value as usize]
    }

    /// The raw table entries.
    pub fn as_slice(&self) -> &[u8; LUT_SIZE] {
        &self.table
    }
}

impl Default for ThresholdLut {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Map every sample of an image through a threshold lookup table.
///
/// Each channel is thresholded independently.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels.
/// * `dst` - The output image with the same size and channels as `src`.
/// * `lut` - The lookup table to apply.
///
/// # Examples
///
/// ```
/// use magic_glass_image::{Image, ImageSize};
/// use magic_glass_imgproc::threshold::{threshold_lut, ThresholdLut};
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![10, 100, 200]).unwrap();
/// let mut thresholded = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// threshold_lut(&image, &mut thresholded, &ThresholdLut::new(100)).unwrap();
/// assert_eq!(thresholded.as_slice(), &[0, 255, 255]);
/// ```
pub fn threshold_lut<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    lut: &ThresholdLut,
) -> Result<(), ImageError> {
    pixel_iter::ensure_same_size(src, dst)?;

    pixel_iter::iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel
            .iter_mut()
            .zip(src_pixel.iter())
            .for_each(|(d, &s)| *d = lut.apply(s));
    });

    Ok(())
}
