//! Magic lens compositing.
//!
//! The lens shows the result of one [`ChannelMode`] applied to the original image,
//! but only inside a disc around the pointer. Everywhere else the frame currently
//! on display is kept as is.

use std::ops::Range;

use magic_glass_image::{Image, ImageError, ImageSize};

use crate::color::{map_pixel, ChannelMode};
use crate::pixel_iter;
use crate::resize::{resized_to, InterpolationMode};
use crate::threshold::ThresholdLut;

/// A disc in image coordinates.
///
/// The center may lie outside the image; the radius is not range checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// Column of the center.
    pub cx: i64,
    /// Row of the center.
    pub cy: i64,
    /// Radius in pixels.
    pub radius: u32,
}

impl Region {
    /// Create a new region.
    pub fn new(cx: i64, cy: i64, radius: u32) -> Self {
        Self { cx, cy, radius }
    }

    /// Whether `(x, y)` satisfies `(x - cx)^2 + (y - cy)^2 <= r^2`.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        let r = u64::from(self.radius);
        let dx = x.abs_diff(self.cx);
        let dy = y.abs_diff(self.cy);
        if dx > r || dy > r {
            return false;
        }
        // both offsets are at most u32::MAX here, so the squares fit in u128
        let (dx, dy, r) = (u128::from(dx), u128::from(dy), u128::from(r));
        dx * dx + dy * dy <= r * r
    }

    /// The bounding box of the disc clipped to an image, as half-open column and row ranges.
    ///
    /// Returns `None` when the box does not intersect the image.
    pub fn bounding_box(&self, size: ImageSize) -> Option<(Range<usize>, Range<usize>)> {
        let r = i64::from(self.radius);
        let clip = |center: i64, len: usize| {
            let len = i64::try_from(len).unwrap_or(i64::MAX);
            let lo = center.saturating_sub(r).max(0);
            let hi = center.saturating_add(r).saturating_add(1).min(len);
            (lo < hi).then_some(lo as usize..hi as usize)
        };
        Some((clip(self.cx, size.width)?, clip(self.cy, size.height)?))
    }
}

/// One-flag-per-mode selection, as handed over by a toolbar of check actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeFlags {
    /// Red band checked.
    pub red: bool,
    /// Green band checked.
    pub green: bool,
    /// Blue band checked.
    pub blue: bool,
    /// Average grayscale checked.
    pub average_gray: bool,
    /// Luminance grayscale checked.
    pub luminance_gray: bool,
    /// Threshold on luminance checked.
    pub threshold_all: bool,
    /// Per-band threshold checked.
    pub threshold_individual: bool,
}

impl ModeFlags {
    /// Resolve the flags to a single mode.
    ///
    /// Precedence follows [`ChannelMode::ALL`]: red first, per-band threshold last.
    /// Returns `None` when no flag is set.
    pub fn resolve(&self) -> Option<ChannelMode> {
        let flags = [
            self.red,
            self.green,
            self.blue,
            self.average_gray,
            self.luminance_gray,
            self.threshold_all,
            self.threshold_individual,
        ];
        flags
            .iter()
            .zip(ChannelMode::ALL)
            .find_map(|(&set, mode)| set.then_some(mode))
    }
}

impl From<ChannelMode> for ModeFlags {
    fn from(mode: ChannelMode) -> Self {
        let mut flags = ModeFlags::default();
        match mode {
            ChannelMode::Red => flags.red = true,
            ChannelMode::Green => flags.green = true,
            ChannelMode::Blue => flags.blue = true,
            ChannelMode::AverageGray => flags.average_gray = true,
            ChannelMode::LuminanceGray => flags.luminance_gray = true,
            ChannelMode::ThresholdAll => flags.threshold_all = true,
            ChannelMode::ThresholdIndividual => flags.threshold_individual = true,
        }
        flags
    }
}

/// The active lens transform: at most one mode plus the current threshold table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LensState {
    mode: Option<ChannelMode>,
    lut: ThresholdLut,
}

impl LensState {
    /// A state with the given mode and threshold level.
    pub fn new(mode: Option<ChannelMode>, level: u8) -> Self {
        Self {
            mode,
            lut: ThresholdLut::new(level),
        }
    }

    /// The selected mode, `None` when nothing is selected.
    pub fn mode(&self) -> Option<ChannelMode> {
        self.mode
    }

    /// The current threshold table.
    pub fn lut(&self) -> &ThresholdLut {
        &self.lut
    }

    /// Select a mode, replacing the previous one.
    pub fn select(&mut self, mode: ChannelMode) {
        self.mode = Some(mode);
    }

    /// Go back to the "none selected" state.
    pub fn clear(&mut self) {
        self.mode = None;
    }

    /// Rebuild the threshold table.
    pub fn set_threshold_level(&mut self, level: u8) {
        if level != self.lut.level() {
            self.lut = ThresholdLut::new(level);
        }
    }

    /// Overwrite the state from check flags and a threshold level.
    ///
    /// The first set flag in precedence order wins. When no flag is set the
    /// previously selected mode is kept.
    pub fn set_state(&mut self, flags: ModeFlags, level: u8) {
        if let Some(mode) = flags.resolve() {
            self.mode = Some(mode);
        }
        self.set_threshold_level(level);
    }

    /// Map one pixel through the active mode; identity when nothing is selected.
    #[inline]
    pub fn map(&self, rgb: [u8; 3]) -> Result<[u8; 3], ImageError> {
        match self.mode {
            Some(mode) => map_pixel(mode, rgb, Some(&self.lut)),
            None => Ok(rgb),
        }
    }
}

/// Composite the lens over the displayed frame.
///
/// # Arguments
///
/// * `original` - The unprocessed image. Resampled with nearest neighbor to the size
///   of `displayed` when the sizes differ.
/// * `displayed` - The frame currently on screen.
/// * `dst` - The output frame, same size as `displayed`.
/// * `region` - The lens disc.
/// * `state` - The transform applied inside the disc.
///
/// Pixels inside the disc receive `state.map(original(x, y))`; every other pixel is
/// copied from `displayed`. Only the clipped bounding box of the disc is scanned.
///
/// # Example
///
/// ```
/// use magic_glass_image::{Image, ImageSize};
/// use magic_glass_imgproc::color::ChannelMode;
/// use magic_glass_imgproc::lens::{compose_lens, LensState, Region};
///
/// let size = ImageSize { width: 5, height: 5 };
/// let original = Image::<u8, 3>::from_size_pixel(size, [90, 60, 30]).unwrap();
/// let displayed = Image::<u8, 3>::from_size_val(size, 0).unwrap();
/// let mut out = Image::<u8, 3>::from_size_val(size, 0).unwrap();
///
/// let state = LensState::new(Some(ChannelMode::Red), 0);
/// compose_lens(&original, &displayed, &mut out, Region::new(2, 2, 1), &state).unwrap();
///
/// assert_eq!(out.pixel(2, 1).unwrap(), [90, 90, 90]);
/// assert_eq!(out.pixel(1, 1).unwrap(), [0, 0, 0]);
/// ```
pub fn compose_lens(
    original: &Image<u8, 3>,
    displayed: &Image<u8, 3>,
    dst: &mut Image<u8, 3>,
    region: Region,
    state: &LensState,
) -> Result<(), ImageError> {
    pixel_iter::ensure_same_size(displayed, dst)?;

    let resampled;
    let original = if original.size() == displayed.size() {
        original
    } else {
        resampled = resized_to(original, displayed.size(), InterpolationMode::Nearest)?;
        &resampled
    };

    dst.as_slice_mut().copy_from_slice(displayed.as_slice());

    let Some((cols, rows)) = region.bounding_box(displayed.size()) else {
        log::debug!("lens {region:?} misses the {} frame", displayed.size());
        return Ok(());
    };

    let width = displayed.width();
    let src = original.as_slice();
    let out = dst.as_slice_mut();
    for y in rows {
        for x in cols.clone() {
            if !region.contains(x as i64, y as i64) {
                continue;
            }
            let offset = (y * width + x) * 3;
            let px = state.map([src[offset], src[offset + 1], src[offset + 2]])?;
            out[offset..offset + 3].copy_from_slice(&px);
        }
    }

    Ok(())
}
