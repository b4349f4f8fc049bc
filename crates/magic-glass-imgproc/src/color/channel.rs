use std::fmt;
use std::str::FromStr;

use magic_glass_image::{Image, ImageError};

use super::{gray_average_u8, gray_luminance_u8};
use crate::pixel_iter;
use crate::threshold::{threshold_lut, ThresholdLut};

/// The per-pixel channel transform to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChannelMode {
    /// Red band replicated to all channels.
    Red,
    /// Green band replicated to all channels.
    Green,
    /// Blue band replicated to all channels.
    Blue,
    /// Truncated average of the three bands.
    AverageGray,
    /// Weighted luminance `0.30 R + 0.59 G + 0.11 B`.
    LuminanceGray,
    /// Luminance passed through the threshold lookup table.
    ThresholdAll,
    /// Each band passed through the threshold lookup table independently.
    ThresholdIndividual,
}

impl ChannelMode {
    /// All modes, in flag precedence order.
    pub const ALL: [ChannelMode; 7] = [
        ChannelMode::Red,
        ChannelMode::Green,
        ChannelMode::Blue,
        ChannelMode::AverageGray,
        ChannelMode::LuminanceGray,
        ChannelMode::ThresholdAll,
        ChannelMode::ThresholdIndividual,
    ];

    /// Whether this mode reads the threshold lookup table.
    pub fn needs_lut(&self) -> bool {
        matches!(
            self,
            ChannelMode::ThresholdAll | ChannelMode::ThresholdIndividual
        )
    }

    /// Short lowercase name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            ChannelMode::Red => "red",
            ChannelMode::Green => "green",
            ChannelMode::Blue => "blue",
            ChannelMode::AverageGray => "average",
            ChannelMode::LuminanceGray => "luminance",
            ChannelMode::ThresholdAll => "threshold-all",
            ChannelMode::ThresholdIndividual => "threshold-individual",
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChannelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChannelMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown channel mode '{s}', expected one of: {}",
                    ChannelMode::ALL.map(|m| m.name()).join(", ")
                )
            })
    }
}

/// Map a single RGB8 pixel through a channel mode.
///
/// # Arguments
///
/// * `mode` - The transform to apply.
/// * `rgb` - The source pixel.
/// * `lut` - The threshold table, required by the threshold modes.
///
/// # Errors
///
/// Returns [`ImageError::MissingLookupTable`] when a threshold mode is requested
/// without a table.
///
/// # Examples
///
/// ```
/// use magic_glass_imgproc::color::{map_pixel, ChannelMode};
/// use magic_glass_imgproc::threshold::ThresholdLut;
///
/// let lut = ThresholdLut::new(128);
/// assert_eq!(map_pixel(ChannelMode::Green, [1, 2, 3], None).unwrap(), [2, 2, 2]);
/// assert_eq!(
///     map_pixel(ChannelMode::ThresholdIndividual, [200, 50, 128], Some(&lut)).unwrap(),
///     [255, 0, 255]
/// );
/// ```
#[inline]
pub fn map_pixel(
    mode: ChannelMode,
    rgb: [u8; 3],
    lut: Option<&ThresholdLut>,
) -> Result<[u8; 3], ImageError> {
    let [r, g, b] = rgb;
    let v = match mode {
        ChannelMode::Red => r,
        ChannelMode::Green => g,
        ChannelMode::Blue => b,
        ChannelMode::AverageGray => gray_average_u8(r, g, b),
        ChannelMode::LuminanceGray => gray_luminance_u8(r, g, b),
        ChannelMode::ThresholdAll => {
            let lut = lut.ok_or(ImageError::MissingLookupTable)?;
            lut.apply(gray_luminance_u8(r, g, b))
        }
        ChannelMode::ThresholdIndividual => {
            let lut = lut.ok_or(ImageError::MissingLookupTable)?;
            return Ok([lut.apply(r), lut.apply(g), lut.apply(b)]);
        }
    };
    Ok([v, v, v])
}

/// Apply a channel mode to every pixel of an RGB8 image.
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output RGB8 image, fully overwritten.
/// * `mode` - The transform to apply.
/// * `lut` - The threshold table, required by the threshold modes.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use magic_glass_image::{Image, ImageSize};
/// use magic_glass_imgproc::color::{apply_channel_mode, ChannelMode};
///
/// let image = Image::<u8, 3>::new(
///     ImageSize { width: 1, height: 1 },
///     vec![30, 60, 90],
/// )
/// .unwrap();
/// let mut out = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
///
/// apply_channel_mode(&image, &mut out, ChannelMode::AverageGray, None).unwrap();
/// assert_eq!(out.as_slice(), &[60, 60, 60]);
/// ```
pub fn apply_channel_mode(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 3>,
    mode: ChannelMode,
    lut: Option<&ThresholdLut>,
) -> Result<(), ImageError> {
    pixel_iter::ensure_same_size(src, dst)?;

    if mode.needs_lut() && lut.is_none() {
        return Err(ImageError::MissingLookupTable);
    }

    if let (ChannelMode::ThresholdIndividual, Some(lut)) = (mode, lut) {
        return threshold_lut(src, dst, lut);
    }

    let mut result = Ok(());
    pixel_iter::iter_rows(src, dst, |src_pixel, dst_pixel| {
        if result.is_err() {
            return;
        }
        match map_pixel(mode, [src_pixel[0], src_pixel[1], src_pixel[2]], lut) {
            Ok(px) => dst_pixel.copy_from_slice(&px),
            Err(e) => result = Err(e),
        }
    });

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use magic_glass_image::ImageSize;

    fn sample() -> Result<Image<u8, 3>, ImageError> {
        Image::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![200, 100, 50, 10, 20, 250],
        )
    }

    #[test]
    fn single_bands() -> Result<(), ImageError> {
        let image = sample()?;
        let mut out = Image::from_size_val(image.size(), 0)?;

        apply_channel_mode(&image, &mut out, ChannelMode::Red, None)?;
        assert_eq!(out.as_slice(), &[200, 200, 200, 10, 10, 10]);

        apply_channel_mode(&image, &mut out, ChannelMode::Green, None)?;
        assert_eq!(out.as_slice(), &[100, 100, 100, 20, 20, 20]);

        apply_channel_mode(&image, &mut out, ChannelMode::Blue, None)?;
        assert_eq!(out.as_slice(), &[50, 50, 50, 250, 250, 250]);

        Ok(())
    }

    #[test]
    fn grayscales() -> Result<(), ImageError> {
        let image = sample()?;
        let mut out = Image::from_size_val(image.size(), 0)?;

        // (200 + 100 + 50) / 3 = 116.6, (10 + 20 + 250) / 3 = 93.3
        apply_channel_mode(&image, &mut out, ChannelMode::AverageGray, None)?;
        assert_eq!(out.as_slice(), &[116, 116, 116, 93, 93, 93]);

        // 60 + 59 + 5.5 = 124.5, 3 + 11.8 + 27.5 = 42.3
        apply_channel_mode(&image, &mut out, ChannelMode::LuminanceGray, None)?;
        assert_eq!(out.as_slice(), &[124, 124, 124, 42, 42, 42]);

        Ok(())
    }

    #[test]
    fn thresholds() -> Result<(), ImageError> {
        let image = sample()?;
        let mut out = Image::from_size_val(image.size(), 0)?;
        let lut = ThresholdLut::new(100);

        apply_channel_mode(&image, &mut out, ChannelMode::ThresholdAll, Some(&lut))?;
        assert_eq!(out.as_slice(), &[255, 255, 255, 0, 0, 0]);

        apply_channel_mode(&image, &mut out, ChannelMode::ThresholdIndividual, Some(&lut))?;
        assert_eq!(out.as_slice(), &[255, 255, 0, 0, 0, 255]);

        Ok(())
    }

    #[test]
    fn threshold_without_lut() -> Result<(), ImageError> {
        let image = sample()?;
        let mut out = Image::from_size_val(image.size(), 0)?;
        assert_eq!(
            apply_channel_mode(&image, &mut out, ChannelMode::ThresholdAll, None),
            Err(ImageError::MissingLookupTable)
        );
        assert_eq!(
            map_pixel(ChannelMode::ThresholdIndividual, [0, 0, 0], None),
            Err(ImageError::MissingLookupTable)
        );

        Ok(())
    }

    #[test]
    fn single_white_pixel_average() -> Result<(), ImageError> {
        let mut image = Image::<u8, 3>::from_size_val([3, 3].into(), 0)?;
        image.set_pixel(0, 0, [255, 255, 255])?;
        let mut out = Image::from_size_val(image.size(), 7)?;

        apply_channel_mode(&image, &mut out, ChannelMode::AverageGray, None)?;
        assert_eq!(out.pixel(0, 0)?, [255, 255, 255]);
        for y in 0..3 {
            for x in 0..3 {
                if (x, y) != (0, 0) {
                    assert_eq!(out.pixel(x, y)?, [0, 0, 0]);
                }
            }
        }

        Ok(())
    }

    #[test]
    fn mode_names_roundtrip() {
        for mode in ChannelMode::ALL {
            assert_eq!(mode.name().parse::<ChannelMode>(), Ok(mode));
        }
        assert_eq!("RED".parse::<ChannelMode>(), Ok(ChannelMode::Red));
        assert!("purple".parse::<ChannelMode>().is_err());
    }
}
