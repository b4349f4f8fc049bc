use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use magic_glass_image::{Image, ImageError};

use super::kernels;
use crate::color::{gray_from_rgb_u8, rgb_from_gray};
use crate::pixel_iter;

/// The fixed-kernel edge detectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EdgeFilter {
    /// 3x3 Prewitt gradient magnitude.
    Prewitt,
    /// 3x3 Sobel gradient magnitude.
    Sobel,
    /// 5x5 Laplacian-of-Gaussian response.
    LaplacianOfGaussian,
}

impl EdgeFilter {
    /// All filters.
    pub const ALL: [EdgeFilter; 3] = [
        EdgeFilter::Prewitt,
        EdgeFilter::Sobel,
        EdgeFilter::LaplacianOfGaussian,
    ];

    /// Width of the frame of pixels forced to zero around the image.
    pub fn border(&self) -> usize {
        match self {
            EdgeFilter::Prewitt | EdgeFilter::Sobel => 1,
            EdgeFilter::LaplacianOfGaussian => 2,
        }
    }

    /// Short lowercase name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            EdgeFilter::Prewitt => "prewitt",
            EdgeFilter::Sobel => "sobel",
            EdgeFilter::LaplacianOfGaussian => "log",
        }
    }
}

impl fmt::Display for EdgeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EdgeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EdgeFilter::ALL
            .into_iter()
            .find(|filter| filter.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown edge filter '{s}', expected prewitt, sobel or log"))
    }
}

/// Indices at least `border` away from both ends of `0..len`.
fn interior(len: usize, border: usize) -> Range<usize> {
    border..len.saturating_sub(border)
}

/// Shared driver: luminance, per-interior-pixel response, replicate to RGB.
fn edge_response(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 3>,
    border: usize,
    response: impl Fn(&[u8], usize, usize, usize) -> u8,
) -> Result<(), ImageError> {
    pixel_iter::ensure_same_size(src, dst)?;

    if src.cols() <= 2 * border || src.rows() <= 2 * border {
        log::debug!("{} is too small for a border of {border}", src.size());
        dst.as_slice_mut().fill(0);
        return Ok(());
    }

    let mut gray = Image::<u8, 1>::from_size_val(src.size(), 0)?;
    gray_from_rgb_u8(src, &mut gray)?;

    let cols = gray.cols();

    let mut edges = Image::<u8, 1>::from_size_val(src.size(), 0)?;
    {
        let gray_data = gray.as_slice();
        let edges_data = edges.as_slice_mut();
        for y in interior(gray.rows(), border) {
            for x in interior(cols, border) {
                edges_data[y * cols + x] = response(gray_data, cols, x, y);
            }
        }
    }

    rgb_from_gray(&edges, dst)
}

fn gradient_magnitude(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 3>,
    kernel_x: &[[i32; 3]; 3],
    kernel_y: &[[i32; 3]; 3],
) -> Result<(), ImageError> {
    edge_response(src, dst, 1, |data, cols, x, y| {
        let gx = kernels::correlate_at(data, cols, x, y, kernel_x);
        let gy = kernels::correlate_at(data, cols, x, y, kernel_y);
        (gx.abs() + gy.abs()).min(255) as u8
    })
}

/// Compute the Prewitt edge strength of an RGB8 image.
///
/// The image is converted to luminance, then for every interior pixel the
/// magnitude `|gx| + |gy|` is written, saturated at 255. The one pixel wide
/// border is set to 0.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image, fully overwritten.
///
/// PRECONDITION: `src` and `dst` must have the same size.
///
/// # Example
///
/// ```
/// use magic_glass_image::{Image, ImageSize};
/// use magic_glass_imgproc::filter::prewitt;
///
/// let image = Image::<u8, 3>::from_size_val(ImageSize { width: 4, height: 4 }, 90).unwrap();
/// let mut edges = Image::<u8, 3>::from_size_val(image.size(), 1).unwrap();
///
/// prewitt(&image, &mut edges).unwrap();
/// assert!(edges.as_slice().iter().all(|&v| v == 0));
/// ```
pub fn prewitt(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    gradient_magnitude(src, dst, &kernels::PREWITT_X, &kernels::PREWITT_Y)
}

/// Compute the Sobel edge strength of an RGB8 image.
///
/// Same as [`prewitt`] with the center row and column weighted by 2.
///
/// PRECONDITION: `src` and `dst` must have the same size.
pub fn sobel(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    gradient_magnitude(src, dst, &kernels::SOBEL_X, &kernels::SOBEL_Y)
}

/// Compute the Laplacian-of-Gaussian response of an RGB8 image.
///
/// The response is clamped to `[0, 255]`; the two pixel wide border is set to 0.
///
/// PRECONDITION: `src` and `dst` must have the same size.
pub fn laplacian_of_gaussian(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 3>,
) -> Result<(), ImageError> {
    edge_response(src, dst, 2, |data, cols, x, y| {
        kernels::correlate_at(data, cols, x, y, &kernels::LAPLACIAN_OF_GAUSSIAN).clamp(0, 255)
            as u8
    })
}

/// Run the given edge filter.
///
/// PRECONDITION: `src` and `dst` must have the same size.
pub fn edge_filter(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 3>,
    filter: EdgeFilter,
) -> Result<(), ImageError> {
    match filter {
        EdgeFilter::Prewitt => prewitt(src, dst),
        EdgeFilter::Sobel => sobel(src, dst),
        EdgeFilter::LaplacianOfGaussian => laplacian_of_gaussian(src, dst),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magic_glass_image::ImageSize;

    fn gray_image(size: ImageSize, values: &[u8]) -> Result<Image<u8, 3>, ImageError> {
        let data = values.iter().flat_map(|&v| [v, v, v]).collect();
        Image::new(size, data)
    }

    fn assert_border_zero(image: &Image<u8, 3>, border: usize) -> Result<(), ImageError> {
        for y in 0..image.rows() {
            for x in 0..image.cols() {
                let on_border = x < border
                    || y < border
                    || x >= image.cols() - border
                    || y >= image.rows() - border;
                if on_border {
                    assert_eq!(image.pixel(x, y)?, [0, 0, 0], "border pixel ({x}, {y})");
                }
            }
        }
        Ok(())
    }

    fn ramp(size: ImageSize) -> Result<Image<u8, 3>, ImageError> {
        let values: Vec<u8> = (0..size.area())
            .map(|i| ((i * 37 + (i / size.width) * 11) % 256) as u8)
            .collect();
        gray_image(size, &values)
    }

    #[test]
    fn flat_image_has_no_edges() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_pixel([6, 5].into(), [120, 40, 200])?;
        let mut out = Image::<u8, 3>::from_size_val(image.size(), 9)?;

        for filter in EdgeFilter::ALL {
            edge_filter(&image, &mut out, filter)?;
            assert!(out.as_slice().iter().all(|&v| v == 0), "{filter}");
        }

        Ok(())
    }

    #[test]
    fn borders_are_zero() -> Result<(), ImageError> {
        let image = ramp([9, 7].into())?;
        let mut out = Image::<u8, 3>::from_size_val(image.size(), 0)?;

        for filter in EdgeFilter::ALL {
            edge_filter(&image, &mut out, filter)?;
            assert_border_zero(&out, filter.border())?;
        }

        Ok(())
    }

    #[test]
    fn prewitt_vertical_step() -> Result<(), ImageError> {
        // left column 0, right two columns 10
        #[rustfmt::skip]
        let values = [
            0, 10, 10,
            0, 10, 10,
            0, 10, 10,
        ];
        let image = gray_image([3, 3].into(), &values)?;
        let mut out = Image::<u8, 3>::from_size_val(image.size(), 0)?;

        prewitt(&image, &mut out)?;
        // gx = 0, gy = 30 - 0
        assert_eq!(out.pixel(1, 1)?, [30, 30, 30]);

        sobel(&image, &mut out)?;
        // gy = 40 - 0
        assert_eq!(out.pixel(1, 1)?, [40, 40, 40]);

        Ok(())
    }

    #[test]
    fn gradient_uses_both_absolute_values() -> Result<(), ImageError> {
        // bright top-right corner: gx < 0 and gy > 0 at the center
        #[rustfmt::skip]
        let values = [
            0, 0, 50,
            0, 0, 0,
            0, 0, 0,
        ];
        let image = gray_image([3, 3].into(), &values)?;
        let mut out = Image::<u8, 3>::from_size_val(image.size(), 0)?;

        prewitt(&image, &mut out)?;
        // gx = 0 - 50, gy = 50 - 0
        assert_eq!(out.pixel(1, 1)?, [100, 100, 100]);

        Ok(())
    }

    #[test]
    fn gradient_saturates() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let values = [
            255, 255, 255,
            0, 0, 0,
            0, 0, 0,
        ];
        let image = gray_image([3, 3].into(), &values)?;
        let mut out = Image::<u8, 3>::from_size_val(image.size(), 0)?;

        sobel(&image, &mut out)?;
        assert_eq!(out.pixel(1, 1)?, [255, 255, 255]);

        Ok(())
    }

    #[test]
    fn log_clamps_to_byte_range() -> Result<(), ImageError> {
        let mut values = [0u8; 25];
        values[12] = 255;
        let image = gray_image([5, 5].into(), &values)?;
        let mut out = Image::<u8, 3>::from_size_val(image.size(), 0)?;

        laplacian_of_gaussian(&image, &mut out)?;
        // 16 * 255 saturates
        assert_eq!(out.pixel(2, 2)?, [255, 255, 255]);

        // dark center on a bright background goes negative and clamps to 0
        let mut values = [200u8; 25];
        values[12] = 0;
        let image = gray_image([5, 5].into(), &values)?;
        laplacian_of_gaussian(&image, &mut out)?;
        assert_eq!(out.pixel(2, 2)?, [0, 0, 0]);

        Ok(())
    }

    #[test]
    fn log_exact_response() -> Result<(), ImageError> {
        let mut values = [10u8; 25];
        values[12] = 20;
        let image = gray_image([5, 5].into(), &values)?;
        let mut out = Image::<u8, 3>::from_size_val(image.size(), 0)?;

        laplacian_of_gaussian(&image, &mut out)?;
        // 16 * 20 - 16 * 10
        assert_eq!(out.pixel(2, 2)?, [160, 160, 160]);

        Ok(())
    }

    #[test]
    fn tiny_images_are_all_border() -> Result<(), ImageError> {
        for (w, h) in [(1, 1), (2, 2), (2, 5), (4, 4)] {
            let image = ramp([w, h].into())?;
            let mut out = Image::<u8, 3>::from_size_val(image.size(), 3)?;
            laplacian_of_gaussian(&image, &mut out)?;
            assert!(out.as_slice().iter().all(|&v| v == 0), "{w}x{h}");
        }

        for (w, h) in [(0, 4), (1, 9), (2, 2), (9, 2)] {
            let image = ramp([w, h].into())?;
            let mut out = Image::<u8, 3>::from_size_val(image.size(), 3)?;
            sobel(&image, &mut out)?;
            assert!(out.as_slice().iter().all(|&v| v == 0), "{w}x{h}");
            prewitt(&image, &mut out)?;
            assert!(out.as_slice().iter().all(|&v| v == 0), "{w}x{h}");
        }

        Ok(())
    }

    #[test]
    fn filter_names_roundtrip() {
        for filter in EdgeFilter::ALL {
            assert_eq!(filter.name().parse::<EdgeFilter>(), Ok(filter));
        }
        assert!("canny".parse::<EdgeFilter>().is_err());
    }
}
