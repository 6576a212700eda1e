use rayon::prelude::*;
use tinycv_image::{Image, ImageError, ImageSize};

/// A border type for the spatial padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMode {
    /// This border type fills the border with a single, constant value.
    ///
    /// Example: ...d c b a | 0 0 0 0...
    Constant,

    /// This border type takes the outermost row or column of pixels and repeats it.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,

    /// This border type reflects the pixel values at the boundary, starting with the edge pixel itself.
    ///
    /// Example: ...d c b a | a b c d...
    Reflect,
}

impl PaddingMode {
    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i - 1;
            } else {
                i = 2 * len - i - 1;
            }
        }
        i as usize
    }

    /// Maps index `i` to a valid index i.e. within `[0, len)` according to the padding mode.
    ///
    /// - `Replicate`: clamp to edge
    /// - `Reflect`: mirror including edge
    /// - `Constant`: clamp to edge; the fill value is substituted by the caller
    ///   for out-of-range indices
    ///
    /// # Arguments
    ///
    /// - `i`: The (possibly out-of-range) coordinate index.
    /// - `len`: The valid length of the dimension.
    ///
    /// # Returns
    ///
    /// A valid mapped index within `[0, len)`.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> usize {
        match self {
            PaddingMode::Replicate | PaddingMode::Constant => {
                i.clamp(0, len as isize - 1) as usize
            }
            PaddingMode::Reflect => Self::reflect(i, len),
        }
    }
}

/// Padding extents in pixels for each side of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding2D {
    /// Padding on the left side.
    pub left: usize,
    /// Padding on the right side.
    pub right: usize,
    /// Padding on the top side.
    pub top: usize,
    /// Padding on the bottom side.
    pub bottom: usize,
}

impl Padding2D {
    /// Create a padding with the same extent on all sides.
    pub fn all(extent: usize) -> Self {
        Self {
            left: extent,
            right: extent,
            top: extent,
            bottom: extent,
        }
    }

    /// The size of the padded image for a given source size.
    pub fn padded_size(&self, size: ImageSize) -> ImageSize {
        ImageSize {
            width: size.width + self.left + self.right,
            height: size.height + self.top + self.bottom,
        }
    }
}

/// Pad an image with the given mode.
///
/// # Arguments
///
/// * `src` - The source image to pad.
/// * `dst` - The destination image, sized `src` plus the padding extents.
/// * `padding` - The padding extents for each side.
/// * `mode` - The padding mode.
/// * `constant` - The fill value used by [`PaddingMode::Constant`].
///
/// # Examples
///
/// ```
/// use tinycv_image::{Image, ImageSize};
/// use tinycv_imgproc::padding::{pad, Padding2D, PaddingMode};
///
/// let image = Image::<u8, 1>::new(
///     ImageSize { width: 2, height: 1 },
///     vec![1u8, 2],
/// ).unwrap();
///
/// let padding = Padding2D::all(1);
/// let mut padded = Image::<u8, 1>::from_size_val(padding.padded_size(image.size()), 0).unwrap();
///
/// pad(&image, &mut padded, &padding, PaddingMode::Reflect, 0).unwrap();
///
/// assert_eq!(padded.as_slice(), &[1u8, 1, 2, 2, 1, 1, 2, 2, 1, 1, 2, 2]);
/// ```
pub fn pad<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    padding: &Padding2D,
    mode: PaddingMode,
    constant: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    let expected = padding.padded_size(src.size());
    if dst.size() != expected {
        return Err(ImageError::InvalidImageSize(
            dst.cols(),
            dst.rows(),
            expected.width,
            expected.height,
        ));
    }

    let src_cols = src.cols();
    let src_rows = src.rows();
    let dst_cols = dst.cols();
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .enumerate()
        .for_each(|(dst_y, dst_row)| {
            let y = dst_y as isize - padding.top as isize;
            let inside_y = y >= 0 && y < src_rows as isize;
            for (dst_x, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
                let x = dst_x as isize - padding.left as isize;
                let inside_x = x >= 0 && x < src_cols as isize;
                if mode == PaddingMode::Constant && !(inside_y && inside_x) {
                    dst_pixel.iter_mut().for_each(|v| *v = constant);
                    continue;
                }
                let sy = mode.map_index(y, src_rows);
                let sx = mode.map_index(x, src_cols);
                let offset = (sy * src_cols + sx) * C;
                dst_pixel.copy_from_slice(&src_data[offset..offset + C]);
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{pad, Padding2D, PaddingMode};
    use tinycv_image::{Image, ImageError, ImageSize};

    #[test]
    fn test_map_index_reflect() {
        assert_eq!(PaddingMode::Reflect.map_index(-1, 4), 0);
        assert_eq!(PaddingMode::Reflect.map_index(-2, 4), 1);
        assert_eq!(PaddingMode::Reflect.map_index(0, 4), 0);
        assert_eq!(PaddingMode::Reflect.map_index(4, 4), 3);
        assert_eq!(PaddingMode::Reflect.map_index(5, 4), 2);
        assert_eq!(PaddingMode::Reflect.map_index(2, 1), 0);
    }

    #[test]
    fn test_map_index_replicate() {
        assert_eq!(PaddingMode::Replicate.map_index(-3, 4), 0);
        assert_eq!(PaddingMode::Replicate.map_index(7, 4), 3);
    }

    #[test]
    fn test_pad_constant() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 1,
                height: 1,
            },
            vec![7u8],
        )?;

        let padding = Padding2D::all(1);
        let mut padded = Image::<u8, 1>::from_size_val(padding.padded_size(image.size()), 0)?;
        pad(&image, &mut padded, &padding, PaddingMode::Constant, 9)?;

        assert_eq!(padded.as_slice(), &[9u8, 9, 9, 9, 7, 9, 9, 9, 9]);

        Ok(())
    }

    #[test]
    fn test_pad_constant_keeps_interior() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![1u8, 2, 3, 4],
        )?;

        let padding = Padding2D::all(1);
        let mut padded = Image::<u8, 1>::from_size_val(padding.padded_size(image.size()), 0)?;
        pad(&image, &mut padded, &padding, PaddingMode::Constant, 9)?;

        #[rustfmt::skip]
        assert_eq!(padded.as_slice(), &[
            9u8, 9, 9, 9,
            9,   1, 2, 9,
            9,   3, 4, 9,
            9,   9, 9, 9,
        ]);

        Ok(())
    }

    #[test]
    fn test_pad_replicate() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![1u8, 2, 3, 4],
        )?;

        let padding = Padding2D::all(1);
        let mut padded = Image::<u8, 1>::from_size_val(padding.padded_size(image.size()), 0)?;
        pad(&image, &mut padded, &padding, PaddingMode::Replicate, 0)?;

        #[rustfmt::skip]
        assert_eq!(padded.as_slice(), &[
            1u8, 1, 2, 2,
            1,   1, 2, 2,
            3,   3, 4, 4,
            3,   3, 4, 4,
        ]);

        Ok(())
    }

    #[test]
    fn test_pad_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )?;
        let mut too_small = Image::<u8, 1>::from_size_val(image.size(), 0)?;

        let res = pad(
            &image,
            &mut too_small,
            &Padding2D::all(1),
            PaddingMode::Reflect,
            0,
        );
        assert!(res.is_err());

        Ok(())
    }
}
