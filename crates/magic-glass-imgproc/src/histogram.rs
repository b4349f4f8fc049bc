use magic_glass_image::{Image, ImageError, ImageSize};

/// Number of buckets per channel.
pub const NUM_BINS: usize = 256;

/// Side length of the square chart produced by [`render_histogram_chart`].
pub const CHART_SIZE: usize = 256;

const WHITE: [u8; 3] = [255, 255, 255];
const CHANNEL_COLORS: [[u8; 3]; 3] = [[255, 0, 0], [0, 255, 0], [0, 0, 255]];

/// Per-channel frequency counts of an RGB8 image.
///
/// A self-contained snapshot: it keeps no reference to the image it was computed from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    /// Red channel counts.
    pub red: [usize; NUM_BINS],
    /// Green channel counts.
    pub green: [usize; NUM_BINS],
    /// Blue channel counts.
    pub blue: [usize; NUM_BINS],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            red: [0; NUM_BINS],
            green: [0; NUM_BINS],
            blue: [0; NUM_BINS],
        }
    }
}

impl Histogram {
    /// The counts of the given channel, 0 = red, 1 = green, 2 = blue.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel index is larger than 2.
    pub fn channel(&self, channel: usize) -> Result<&[usize; NUM_BINS], ImageError> {
        match channel {
            0 => Ok(&self.red),
            1 => Ok(&self.green),
            2 => Ok(&self.blue),
            _ => Err(ImageError::ChannelIndexOutOfBounds(channel, 3)),
        }
    }

    /// Bucket counts for the given channel values.
    ///
    /// # Examples
    ///
    /// ```
    /// use magic_glass_image::{Image, ImageSize};
    /// use magic_glass_imgproc::histogram::compute_histogram;
    ///
    /// let image = Image::<u8, 3>::new(
    ///     ImageSize { width: 2, height: 1 },
    ///     vec![10, 20, 30, 10, 0, 30],
    /// )
    /// .unwrap();
    ///
    /// let hist = compute_histogram(&image);
    /// assert_eq!(hist.lookup(10, 20, 30), (2, 1, 2));
    /// ```
    pub fn lookup(&self, r: u8, g: u8, b: u8) -> (usize, usize, usize) {
        (
            self.red[r as usize],
            self.green[g as usize],
            self.blue[b as usize],
        )
    }

    /// Number of samples counted in one channel, equal to the image area.
    pub fn total(&self) -> usize {
        self.red.iter().sum()
    }

    /// Largest bucket over all three channels.
    pub fn max_count(&self) -> usize {
        self.red
            .iter()
            .chain(self.green.iter())
            .chain(self.blue.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }
}

/// Compute the per-channel histogram of an RGB8 image.
///
/// Every pixel is visited exactly once.
///
/// # Arguments
///
/// * `src` - The input image.
///
/// # Returns
///
/// The red, green and blue bucket counts.
pub fn compute_histogram(src: &Image<u8, 3>) -> Histogram {
    let mut hist = Histogram::default();

    for px in src.as_slice().chunks_exact(3) {
        hist.red[px[0] as usize] += 1;
        hist.green[px[1] as usize] += 1;
        hist.blue[px[2] as usize] += 1;
    }

    hist
}

/// Render a 256x256 chart of the histogram.
///
/// The background is white. For each bucket `c` a single point is drawn at column
/// `c` and row `255 - round(count / scale)` where `scale = max / 255` and `max`
/// is the largest bucket over all channels. Red is drawn first, then green, then
/// blue, so later channels win on shared points. An empty histogram is drawn with
/// a unit scale.
///
/// # Errors
///
/// Returns an error only if the chart buffer cannot be allocated with the expected shape.
pub fn render_histogram_chart(hist: &Histogram) -> Result<Image<u8, 3>, ImageError> {
    let size = ImageSize {
        width: CHART_SIZE,
        height: CHART_SIZE,
    };
    let mut chart = Image::from_size_pixel(size, WHITE)?;

    let max = hist.max_count();
    let scale = if max == 0 { 1.0 } else { max as f64 / 255.0 };

    let last_row = (CHART_SIZE - 1) as f64;
    for (channel, color) in CHANNEL_COLORS.iter().enumerate() {
        let counts = hist.channel(channel)?;
        for (column, &count) in counts.iter().enumerate() {
            let height = (count as f64 / scale).round().min(last_row);
            let row = (last_row - height) as usize;
            chart.set_pixel(column, row, *color)?;
        }
    }

    Ok(chart)
}
