use magic_glass_image::{Image, ImageError};

/// Check that two images share the same size.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] when the sizes differ.
pub fn ensure_same_size<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &Image<T2, C2>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }
    Ok(())
}

/// Apply a function to each pixel in the image, row by row.
///
/// The closure receives the `C1` samples of the source pixel and the `C2`
/// samples of the destination pixel.
///
/// PRECONDITION: `src` and `dst` must have the same size.
pub fn iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    mut f: impl FnMut(&[T1], &mut [T2]),
) {
    let cols = src.cols();
    if cols == 0 {
        return;
    }

    src.as_slice()
        .chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

#[cfg(test)]
mod tests {
    use magic_glass_image::{Image, ImageError, ImageSize};

    #[test]
    fn iter_rows_visits_every_pixel() -> Result<(), ImageError> {
        let src = Image::<u8, 3>::new([2, 2].into(), (0..12).collect())?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;

        super::iter_rows(&src, &mut dst, |s, d| d[0] = s[2]);
        assert_eq!(dst.as_slice(), &[2, 5, 8, 11]);

        Ok(())
    }

    #[test]
    fn size_mismatch() -> Result<(), ImageError> {
        let a = Image::<u8, 3>::from_size_val([3, 1].into(), 0)?;
        let b = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 1,
                height: 3,
            },
            0,
        )?;
        assert_eq!(
            super::ensure_same_size(&a, &b),
            Err(ImageError::InvalidImageSize(3, 1, 1, 3))
        );

        Ok(())
    }
}
