use rayon::prelude::*;
use tinycv_image::{Image, ImageError, ImageSize};

/// Compute the output size of a pooling operation with non-overlapping
/// `block_size` x `block_size` windows.
///
/// Trailing rows and columns that do not fill a whole window are ignored.
pub fn pool_output_size(size: ImageSize, block_size: usize) -> ImageSize {
    ImageSize {
        width: size.width / block_size,
        height: size.height / block_size,
    }
}

fn check_pool_args<T, const C: usize>(
    src: &Image<T, C>,
    dst: &Image<T, C>,
    block_size: usize,
) -> Result<(), ImageError> {
    if block_size == 0 {
        return Err(ImageError::InvalidParameter("block_size must be > 0"));
    }

    let expected = pool_output_size(src.size(), block_size);
    if dst.size() != expected {
        return Err(ImageError::InvalidImageSize(
            dst.cols(),
            dst.rows(),
            expected.width,
            expected.height,
        ));
    }

    Ok(())
}

/// Pool an image by averaging non-overlapping square blocks.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image with size `(H / block_size, W / block_size)`.
/// * `block_size` - The side length of the pooling window in pixels.
///
/// # Examples
///
/// ```
/// use tinycv_image::{Image, ImageSize};
/// use tinycv_imgproc::pooling::{average_pool, pool_output_size};
///
/// let image = Image::<f32, 1>::new(
///     ImageSize { width: 2, height: 2 },
///     vec![1.0, 3.0, 5.0, 7.0],
/// ).unwrap();
///
/// let mut pooled = Image::<f32, 1>::from_size_val(pool_output_size(image.size(), 2), 0.0).unwrap();
///
/// average_pool(&image, &mut pooled, 2).unwrap();
/// assert_eq!(pooled.as_slice(), &[4.0]);
/// ```
pub fn average_pool<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    block_size: usize,
) -> Result<(), ImageError>
where
    T: num_traits::Float + Send + Sync,
{
    check_pool_args(src, dst, block_size)?;

    let src_cols = src.cols();
    let dst_cols = dst.cols();
    let src_data = src.as_slice();
    let inv_area = T::one() / T::from(block_size * block_size).ok_or(ImageError::CastError)?;

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .enumerate()
        .for_each(|(by, dst_row)| {
            for (bx, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
                let mut acc = [T::zero(); C];
                for j in 0..block_size {
                    let row_offset = ((by * block_size + j) * src_cols + bx * block_size) * C;
                    for i in 0..block_size {
                        for (c, acc_c) in acc.iter_mut().enumerate() {
                            *acc_c = *acc_c + src_data[row_offset + i * C + c];
                        }
                    }
                }
                for (dst_c, acc_c) in dst_pixel.iter_mut().zip(acc.iter()) {
                    *dst_c = *acc_c * inv_area;
                }
            }
        });

    Ok(())
}

/// Pool an image by taking the maximum over non-overlapping square blocks.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image with size `(H / block_size, W / block_size)`.
/// * `block_size` - The side length of the pooling window in pixels.
pub fn max_pool<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    block_size: usize,
) -> Result<(), ImageError>
where
    T: Copy + PartialOrd + Send + Sync,
{
    check_pool_args(src, dst, block_size)?;

    let src_cols = src.cols();
    let dst_cols = dst.cols();
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .enumerate()
        .for_each(|(by, dst_row)| {
            for (bx, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
                let first = ((by * block_size) * src_cols + bx * block_size) * C;
                dst_pixel.copy_from_slice(&src_data[first..first + C]);
                for j in 0..block_size {
                    let row_offset = ((by * block_size + j) * src_cols + bx * block_size) * C;
                    for i in 0..block_size {
                        for (c, dst_c) in dst_pixel.iter_mut().enumerate() {
                            let v = src_data[row_offset + i * C + c];
                            if v > *dst_c {
                                *dst_c = v;
                            }
                        }
                    }
                }
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{average_pool, max_pool, pool_output_size};
    use tinycv_image::{Image, ImageError, ImageSize};

    #[test]
    fn test_pool_output_size_floors() {
        let out = pool_output_size(
            ImageSize {
                width: 10,
                height: 9,
            },
            4,
        );
        assert_eq!(out.width, 2);
        assert_eq!(out.height, 2);
    }

    #[test]
    fn test_average_pool() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<f32, 1>::new(
            ImageSize { width: 4, height: 2 },
            vec![
                1.0, 2.0, 10.0, 20.0,
                3.0, 4.0, 30.0, 40.0,
            ],
        )?;

        let mut pooled =
            Image::<f32, 1>::from_size_val(pool_output_size(image.size(), 2), 0.0)?;
        average_pool(&image, &mut pooled, 2)?;

        assert_eq!(pooled.as_slice(), &[2.5, 25.0]);

        Ok(())
    }

    #[test]
    fn test_max_pool() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<u8, 1>::new(
            ImageSize { width: 4, height: 2 },
            vec![
                1u8, 2, 10, 20,
                3,   4, 30, 40,
            ],
        )?;

        let mut pooled = Image::<u8, 1>::from_size_val(pool_output_size(image.size(), 2), 0)?;
        max_pool(&image, &mut pooled, 2)?;

        assert_eq!(pooled.as_slice(), &[4u8, 40]);

        Ok(())
    }

    #[test]
    fn test_pool_trailing_pixels_ignored() -> Result<(), ImageError> {
        // 3x3 input with block 2 keeps only the top-left block
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 3,
                height: 3,
            },
            vec![1.0, 1.0, 99.0, 1.0, 1.0, 99.0, 99.0, 99.0, 99.0],
        )?;

        let mut pooled =
            Image::<f32, 1>::from_size_val(pool_output_size(image.size(), 2), 0.0)?;
        average_pool(&image, &mut pooled, 2)?;

        assert_eq!(pooled.as_slice(), &[1.0]);

        Ok(())
    }

    #[test]
    fn test_pool_zero_block() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0.0,
        )?;
        let mut pooled = image.clone();

        assert!(average_pool(&image, &mut pooled, 0).is_err());

        Ok(())
    }
}
