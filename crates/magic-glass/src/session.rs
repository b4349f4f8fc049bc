use std::path::Path;

use magic_glass_image::{Image, ImageSize};
use magic_glass_imgproc::{
    color::{apply_channel_mode, ChannelMode},
    filter::{edge_filter, EdgeFilter},
    histogram::{compute_histogram, render_histogram_chart, Histogram},
    lens::{compose_lens, LensState, ModeFlags, Region},
    resize::{resized_to, scaled_size, InterpolationMode},
};
use magic_glass_io::jpeg::write_image_jpeg_rgb8;

use crate::config::LensConfig;
use crate::error::SessionError;

/// What the session renders over the whole frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    /// The scaled source, untouched.
    #[default]
    Original,
    /// A channel transform over the full frame.
    Channel(ChannelMode),
    /// An edge filter over the full frame.
    Edges(EdgeFilter),
}

/// Values reported for the pixel under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerReadout {
    /// Pointer position in viewport coordinates.
    pub viewport: (i64, i64),
    /// Pointer position in frame coordinates, i.e. `viewport - pan`.
    pub position: (usize, usize),
    /// RGB of the frame currently shown at `position`.
    pub rgb: [u8; 3],
    /// Histogram counts of the source image for `rgb`, per channel.
    pub counts: (usize, usize, usize),
}

/// Headless state of the image panel.
///
/// Holds the source image, the zoomed frame, the active view and the lens. Each
/// UI event is a method; every method recomputes what it touches synchronously.
pub struct Session {
    config: LensConfig,
    source: Image<u8, 3>,
    histogram: Histogram,
    zoom: f64,
    pan: (i64, i64),
    view: View,
    radius: u32,
    threshold_level: u8,
    lens: LensState,
    lens_enabled: bool,
    pointer: Option<(i64, i64)>,
    // source at the zoomed size, resampled with the configured interpolation
    scaled: Image<u8, 3>,
    // source at the zoomed size, nearest neighbor, read by the lens
    lens_source: Image<u8, 3>,
    displayed: Image<u8, 3>,
    lens_frame: Option<Image<u8, 3>>,
    generation: u64,
}

impl Session {
    /// Create a session showing `image` with the given configuration.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or the image has no pixels.
    pub fn new(image: Image<u8, 3>, config: LensConfig) -> Result<Self, SessionError> {
        config.validate()?;
        ensure_not_empty(image.size())?;

        let mut session = Self {
            radius: config.default_radius,
            config,
            histogram: compute_histogram(&image),
            zoom: 1.0,
            pan: (0, 0),
            view: View::Original,
            threshold_level: 0,
            lens: LensState::default(),
            lens_enabled: false,
            pointer: None,
            scaled: image.clone(),
            lens_source: image.clone(),
            displayed: image.clone(),
            lens_frame: None,
            generation: 0,
            source: image,
        };
        session.rescale()?;

        Ok(session)
    }

    /// Replace the source image.
    ///
    /// Computes the histogram, resets zoom to 1 and pan to the origin, turns the lens
    /// off and shows the original.
    pub fn open(&mut self, image: Image<u8, 3>) -> Result<(), SessionError> {
        ensure_not_empty(image.size())?;
        log::debug!("opening image of size {}", image.size());

        self.histogram = compute_histogram(&image);
        self.source = image;
        self.zoom = 1.0;
        self.pan = (0, 0);
        self.view = View::Original;
        self.lens_enabled = false;
        self.lens.clear();
        self.lens_frame = None;
        self.pointer = None;

        self.rescale()
    }

    /// The configuration in use.
    pub fn config(&self) -> &LensConfig {
        &self.config
    }

    /// The unprocessed source image.
    pub fn source(&self) -> &Image<u8, 3> {
        &self.source
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current view.
    pub fn view(&self) -> View {
        self.view
    }

    /// Current lens radius.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Current threshold level.
    pub fn threshold_level(&self) -> u8 {
        self.threshold_level
    }

    /// Current viewport offset.
    pub fn pan(&self) -> (i64, i64) {
        self.pan
    }

    /// Whether the lens is on.
    pub fn lens_enabled(&self) -> bool {
        self.lens_enabled
    }

    /// The lens mode, `None` when nothing is selected.
    pub fn lens_mode(&self) -> Option<ChannelMode> {
        self.lens.mode()
    }

    /// Counter bumped on every recompute.
    ///
    /// A caller holding an older value knows its frame is stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Size of the frame on display.
    pub fn frame_size(&self) -> ImageSize {
        self.displayed.size()
    }

    /// The frame to display: the lens composite when the lens is on and has a
    /// position, the full-frame view otherwise.
    pub fn frame(&self) -> &Image<u8, 3> {
        match (&self.lens_frame, self.lens_enabled) {
            (Some(frame), true) => frame,
            _ => &self.displayed,
        }
    }

    /// Histogram of the source image.
    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Render the histogram chart of the source image.
    pub fn histogram_chart(&self) -> Result<Image<u8, 3>, SessionError> {
        Ok(render_histogram_chart(&self.histogram)?)
    }

    /// Save the histogram chart as a JPEG with the configured quality.
    pub fn save_histogram_chart(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let chart = self.histogram_chart()?;
        write_image_jpeg_rgb8(path.as_ref(), &chart, self.config.chart_quality)?;
        log::info!("histogram chart written to {}", path.as_ref().display());
        Ok(())
    }

    /// Multiply the zoom by the zoom-in step while it is below the maximum.
    ///
    /// Returns whether the zoom changed.
    pub fn zoom_in(&mut self) -> Result<bool, SessionError> {
        if self.zoom >= self.config.max_zoom {
            log::debug!("zoom {:.3} already at the maximum", self.zoom);
            return Ok(false);
        }
        self.zoom *= self.config.zoom_step_in;
        self.rescale()?;
        Ok(true)
    }

    /// Multiply the zoom by the zoom-out step while it is above the minimum.
    ///
    /// Returns whether the zoom changed.
    pub fn zoom_out(&mut self) -> Result<bool, SessionError> {
        if self.zoom <= self.config.min_zoom {
            log::debug!("zoom {:.3} already at the minimum", self.zoom);
            return Ok(false);
        }
        self.zoom *= self.config.zoom_step_out;
        self.rescale()?;
        Ok(true)
    }

    /// Show the scaled source without processing.
    pub fn show_original(&mut self) -> Result<(), SessionError> {
        self.set_view(View::Original)
    }

    /// Show a channel transform over the full frame.
    pub fn show_channel(&mut self, mode: ChannelMode) -> Result<(), SessionError> {
        self.set_view(View::Channel(mode))
    }

    /// Show an edge filter over the full frame.
    pub fn show_edges(&mut self, filter: EdgeFilter) -> Result<(), SessionError> {
        self.set_view(View::Edges(filter))
    }

    /// Rebuild the threshold table.
    ///
    /// A threshold view or a threshold lens is re-rendered right away.
    pub fn set_threshold_level(&mut self, level: u8) -> Result<(), SessionError> {
        self.threshold_level = level;
        self.lens.set_threshold_level(level);

        if let View::Channel(mode) = self.view {
            if mode.needs_lut() {
                self.render_view()?;
                return self.render_lens();
            }
        }

        if self.lens.mode().is_some_and(|m| m.needs_lut()) {
            self.render_lens()?;
        }
        Ok(())
    }

    /// Set the lens radius, clamped to the configured range.
    ///
    /// Returns the radius actually used.
    pub fn set_radius(&mut self, radius: u32) -> Result<u32, SessionError> {
        let clamped = self.config.clamp_radius(radius);
        if clamped != radius {
            log::warn!(
                "radius {radius} clamped to {clamped}, allowed range is [{}, {}]",
                self.config.radius_range.0,
                self.config.radius_range.1
            );
        }
        self.radius = clamped;
        self.render_lens()?;
        Ok(clamped)
    }

    /// Turn the lens on with the red band selected.
    pub fn enable_lens(&mut self) -> Result<(), SessionError> {
        self.lens_enabled = true;
        self.lens.select(ChannelMode::Red);
        self.render_lens()
    }

    /// Turn the lens off.
    ///
    /// The lens mode is cleared and the unprocessed scaled source is shown again.
    pub fn disable_lens(&mut self) -> Result<(), SessionError> {
        self.lens_enabled = false;
        self.lens.clear();
        self.lens_frame = None;
        self.set_view(View::Original)
    }

    /// Select the transform shown inside the lens.
    pub fn select_lens_mode(&mut self, mode: ChannelMode) -> Result<(), SessionError> {
        self.lens.select(mode);
        self.render_lens()
    }

    /// Set the lens mode from toolbar check flags, keeping the current mode when
    /// none is set.
    pub fn set_lens_flags(&mut self, flags: ModeFlags) -> Result<(), SessionError> {
        self.lens.set_state(flags, self.threshold_level);
        self.render_lens()
    }

    /// Move the viewport by `(dx, dy)`.
    pub fn pan_by(&mut self, dx: i64, dy: i64) -> Result<(), SessionError> {
        self.pan = (self.pan.0.saturating_add(dx), self.pan.1.saturating_add(dy));
        self.render_lens()
    }

    /// Report the pointer at viewport position `(x, y)`.
    ///
    /// The lens is recomputed around the pointer when it is on. Returns the readout
    /// for the pixel under the pointer, or `None` when it lies outside the frame.
    pub fn pointer_moved(&mut self, x: i64, y: i64) -> Result<Option<PointerReadout>, SessionError> {
        self.pointer = Some((x, y));
        self.render_lens()?;

        let (fx, fy) = self.to_frame(x, y);
        let frame = self.frame();
        if !frame.size().contains(fx, fy) {
            return Ok(None);
        }

        let position = (fx as usize, fy as usize);
        let rgb = frame.pixel(position.0, position.1)?;
        let [r, g, b] = rgb;

        Ok(Some(PointerReadout {
            viewport: (x, y),
            position,
            rgb,
            counts: self.histogram.lookup(r, g, b),
        }))
    }

    fn set_view(&mut self, view: View) -> Result<(), SessionError> {
        self.view = view;
        self.render_view()?;
        self.render_lens()
    }

    fn rescale(&mut self) -> Result<(), SessionError> {
        let size = scaled_size(self.source.size(), self.zoom);
        log::debug!("zoom {:.3}: frame size {size}", self.zoom);

        self.scaled = resized_to(&self.source, size, self.config.interpolation)?;
        self.lens_source = match self.config.interpolation {
            InterpolationMode::Nearest => self.scaled.clone(),
            _ => resized_to(&self.source, size, InterpolationMode::Nearest)?,
        };
        self.render_view()?;
        self.render_lens()
    }

    fn render_view(&mut self) -> Result<(), SessionError> {
        self.generation += 1;

        match self.view {
            View::Original => {
                self.displayed = self.scaled.clone();
            }
            View::Channel(mode) => {
                let mut dst = Image::from_size_val(self.scaled.size(), 0)?;
                apply_channel_mode(&self.scaled, &mut dst, mode, Some(self.lens.lut()))?;
                self.displayed = dst;
            }
            View::Edges(filter) => {
                let mut dst = Image::from_size_val(self.scaled.size(), 0)?;
                edge_filter(&self.scaled, &mut dst, filter)?;
                self.displayed = dst;
            }
        }

        log::debug!(
            "generation {}: rendered {:?} at {}",
            self.generation,
            self.view,
            self.displayed.size()
        );
        Ok(())
    }

    // viewport to frame coordinates, saturating at the i64 range
    fn to_frame(&self, x: i64, y: i64) -> (i64, i64) {
        (x.saturating_sub(self.pan.0), y.saturating_sub(self.pan.1))
    }

    fn render_lens(&mut self) -> Result<(), SessionError> {
        if !self.lens_enabled {
            return Ok(());
        }
        let Some((x, y)) = self.pointer else {
            return Ok(());
        };

        self.generation += 1;

        let (cx, cy) = self.to_frame(x, y);
        let region = Region::new(cx, cy, self.radius);
        let mut frame = match self.lens_frame.take() {
            Some(frame) if frame.size() == self.displayed.size() => frame,
            _ => Image::from_size_val(self.displayed.size(), 0)?,
        };
        compose_lens(
            &self.lens_source,
            &self.displayed,
            &mut frame,
            region,
            &self.lens,
        )?;
        self.lens_frame = Some(frame);

        log::debug!(
            "generation {}: lens {:?} at ({}, {}) r={}",
            self.generation,
            self.lens.mode(),
            region.cx,
            region.cy,
            region.radius
        );
        Ok(())
    }
}

fn ensure_not_empty(size: ImageSize) -> Result<(), SessionError> {
    if size.area() == 0 {
        return Err(SessionError::EmptyImage(size.width, size.height));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> Result<Image<u8, 3>, SessionError> {
        let size = ImageSize { width, height };
        let mut data = Vec::with_capacity(size.area() * 3);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x * 2) as u8, (y * 2) as u8, 77]);
            }
        }
        Ok(Image::new(size, data)?)
    }

    #[test]
    fn open_resets_state() -> Result<(), SessionError> {
        let mut session = Session::new(gradient(100, 80)?, LensConfig::default())?;
        session.zoom_in()?;
        session.pan_by(5, 5)?;
        session.enable_lens()?;

        session.open(gradient(40, 30)?)?;
        assert_eq!(session.zoom(), 1.0);
        assert_eq!(session.pan(), (0, 0));
        assert!(!session.lens_enabled());
        assert_eq!(session.lens_mode(), None);
        assert_eq!(session.view(), View::Original);
        assert_eq!(session.frame(), session.source());
        assert_eq!(session.histogram().total(), 40 * 30);

        Ok(())
    }

    #[test]
    fn empty_image_is_rejected() -> Result<(), SessionError> {
        let empty = Image::<u8, 3>::from_size_val([0, 3].into(), 0)?;
        assert!(matches!(
            Session::new(empty, LensConfig::default()),
            Err(SessionError::EmptyImage(0, 3))
        ));
        Ok(())
    }

    #[test]
    fn threshold_view_follows_level() -> Result<(), SessionError> {
        let mut session = Session::new(gradient(100, 10)?, LensConfig::default())?;
        session.show_channel(ChannelMode::ThresholdIndividual)?;

        // level 0: every sample is 255
        assert!(session.frame().as_slice().iter().all(|&v| v == 255));

        let before = session.generation();
        session.set_threshold_level(100)?;
        assert!(session.generation() > before);
        // red = 2x, so column 50 is the first at or above 100
        assert_eq!(session.frame().pixel(49, 0)?[0], 0);
        assert_eq!(session.frame().pixel(50, 0)?[0], 255);

        Ok(())
    }

    #[test]
    fn extreme_pan_and_pointer() -> Result<(), SessionError> {
        let image = gradient(30, 20)?;
        let mut session = Session::new(image.clone(), LensConfig::default())?;
        session.enable_lens()?;

        session.pan_by(i64::MAX, i64::MIN)?;
        session.pan_by(i64::MAX, i64::MIN)?;
        assert_eq!(session.pan(), (i64::MAX, i64::MIN));

        assert_eq!(session.pointer_moved(i64::MIN, i64::MAX)?, None);
        assert_eq!(session.frame(), &image);

        session.pan_by(i64::MIN, i64::MAX)?;
        assert_eq!(session.pan(), (-1, -1));
        assert_eq!(session.pointer_moved(i64::MAX, i64::MIN)?, None);
        assert_eq!(session.frame(), &image);

        Ok(())
    }

    #[test]
    fn generation_is_monotonic() -> Result<(), SessionError> {
        let mut session = Session::new(gradient(20, 20)?, LensConfig::default())?;
        let mut last = session.generation();
        session.show_edges(EdgeFilter::Sobel)?;
        assert!(session.generation() > last);
        last = session.generation();
        session.enable_lens()?;
        session.pointer_moved(10, 10)?;
        assert!(session.generation() > last);
        Ok(())
    }
}
