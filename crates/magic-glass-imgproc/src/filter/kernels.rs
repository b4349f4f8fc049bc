/// Prewitt kernel for the vertical derivative, indexed `[dy][dx]`.
///
/// Subtracts the row above from the row below.
pub const PREWITT_X: [[i32; 3]; 3] = [[-1, -1, -1], [0, 0, 0], [1, 1, 1]];

/// Prewitt kernel for the horizontal derivative, indexed `[dy][dx]`.
///
/// Subtracts the left column from the right column.
pub const PREWITT_Y: [[i32; 3]; 3] = [[-1, 0, 1], [-1, 0, 1], [-1, 0, 1]];

/// Sobel kernel for the vertical derivative, indexed `[dy][dx]`.
pub const SOBEL_X: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Sobel kernel for the horizontal derivative, indexed `[dy][dx]`.
pub const SOBEL_Y: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];

/// Discrete Laplacian-of-Gaussian kernel, indexed `[dy][dx]`.
///
/// The weights sum to zero so flat regions respond with 0.
pub const LAPLACIAN_OF_GAUSSIAN: [[i32; 5]; 5] = [
    [0, 0, -1, 0, 0],
    [0, -1, -2, -1, 0],
    [-1, -2, 16, -2, -1],
    [0, -1, -2, -1, 0],
    [0, 0, -1, 0, 0],
];

/// Correlate a square kernel with a single channel image at `(x, y)`.
///
/// PRECONDITION: the kernel footprint centered at `(x, y)` lies inside the image.
#[inline]
pub(crate) fn correlate_at<const K: usize>(
    data: &[u8],
    cols: usize,
    x: usize,
    y: usize,
    kernel: &[[i32; K]; K],
) -> i32 {
    let half = K / 2;
    let mut sum = 0i32;
    for (dy, kernel_row) in kernel.iter().enumerate() {
        let row_offset = (y + dy - half) * cols;
        for (dx, &weight) in kernel_row.iter().enumerate() {
            if weight != 0 {
                sum += weight * data[row_offset + x + dx - half] as i32;
            }
        }
    }
    sum
}
