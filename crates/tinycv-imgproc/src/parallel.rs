use rayon::prelude::*;

use tinycv_image::Image;

/// Apply a function to each pixel in the image in parallel.
///
/// The source and destination images are iterated row by row, and the
/// function receives one source pixel slice and one destination pixel slice.
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Clone + Send + Sync,
    T2: Clone + Send + Sync,
{
    let src_cols = src.cols();
    src.as_slice()
        .par_chunks_exact(C1 * src_cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * src_cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each value in the image in parallel.
pub fn par_iter_rows_val<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&T1, &mut T2) + Send + Sync,
) where
    T1: Clone + Send + Sync,
    T2: Clone + Send + Sync,
{
    let src_cols = src.cols();
    src.as_slice()
        .par_chunks_exact(C1 * src_cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * src_cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .iter()
                .zip(dst_chunk.iter_mut())
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

#[cfg(test)]
mod tests {
    use tinycv_image::{Image, ImageError, ImageSize};

    #[test]
    fn test_par_iter_rows() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![1u8, 2, 3, 4],
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;

        super::par_iter_rows(&src, &mut dst, |src_pixel, dst_pixel| {
            dst_pixel[0] = src_pixel[0] * 2;
        });

        assert_eq!(dst.as_slice(), &[2u8, 4, 6, 8]);

        Ok(())
    }
}
