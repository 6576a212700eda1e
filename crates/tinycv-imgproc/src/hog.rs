use rayon::prelude::*;

use tinycv_image::{Image, ImageError, ImageSize};

use crate::padding::PaddingMode;

/// Side length in pixels of the square cell a histogram is accumulated over.
pub const CELL_SIZE: usize = 8;

/// Number of orientation bins per cell.
pub const NUM_BINS: usize = 9;

/// Value substituted for a zero horizontal gradient to keep the orientation
/// angle well defined.
const GX_EPS: f32 = 1e-6;

/// Compute the size of the histogram grid produced by [`hog`] for a given
/// input size.
///
/// The image is partitioned into non-overlapping 8x8 cells; trailing rows and
/// columns that do not fill a whole cell are ignored.
pub fn hog_output_size(size: ImageSize) -> ImageSize {
    ImageSize {
        width: size.width / CELL_SIZE,
        height: size.height / CELL_SIZE,
    }
}

/// Orientation bin for an angle already folded into `[0, PI]`.
///
/// Bins are `PI / 9` wide. An angle on a shared bin boundary belongs to the
/// higher of the two adjacent bins; `PI` itself lands in the last bin.
#[inline]
fn orientation_bin(angle: f32) -> usize {
    let bin_width = std::f32::consts::PI / NUM_BINS as f32;
    ((angle / bin_width) as usize).min(NUM_BINS - 1)
}

/// Compute the histogram of oriented gradients of a grayscale image.
///
/// The image is partitioned into non-overlapping 8x8 cells. For each pixel the
/// image gradient is computed with central differences over a virtual 1-pixel
/// reflected border, the gradient orientation is folded into the unsigned
/// range `[0, PI)` and binned into 9 equal orientation bins, and the gradient
/// magnitude is accumulated into the pixel's cell histogram. Each cell is then
/// normalized by the L2 norm of the raw histograms in its 3x3 cell
/// neighborhood (clipped at the grid edges) plus one.
///
/// # Arguments
///
/// * `src` - The input grayscale image with shape (H, W).
/// * `dst` - The output histogram grid with shape (H / 8, W / 8) and 9 channels.
///
/// # Errors
///
/// Returns an error if `dst` does not match [`hog_output_size`] of `src`.
///
/// # Example
///
/// ```
/// use tinycv_image::{Image, ImageSize};
/// use tinycv_imgproc::hog::{hog, hog_output_size};
///
/// let image = Image::<f32, 1>::from_size_val(
///     ImageSize { width: 32, height: 16 },
///     0.0,
/// ).unwrap();
///
/// let mut descriptor = Image::<f32, 9>::from_size_val(hog_output_size(image.size()), 0.0).unwrap();
///
/// hog(&image, &mut descriptor).unwrap();
/// assert_eq!(descriptor.size().width, 4);
/// assert_eq!(descriptor.size().height, 2);
/// ```
pub fn hog(src: &Image<f32, 1>, dst: &mut Image<f32, 9>) -> Result<(), ImageError> {
    let expected = hog_output_size(src.size());
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
    let cells_w = dst.cols();
    let cells_h = dst.rows();
    let src_data = src.as_slice();

    // accumulate magnitude-weighted orientation histograms per cell
    dst.as_slice_mut()
        .par_chunks_exact_mut(cells_w * NUM_BINS)
        .enumerate()
        .for_each(|(cy, cell_row)| {
            for (cx, hist) in cell_row.chunks_exact_mut(NUM_BINS).enumerate() {
                hist.iter_mut().for_each(|h| *h = 0.0);
                for j in 0..CELL_SIZE {
                    let y = cy * CELL_SIZE + j;
                    for i in 0..CELL_SIZE {
                        let x = cx * CELL_SIZE + i;

                        // central differences with a reflected 1-pixel border
                        let left = PaddingMode::Reflect.map_index(x as isize - 1, src_cols);
                        let right = PaddingMode::Reflect.map_index(x as isize + 1, src_cols);
                        let up = PaddingMode::Reflect.map_index(y as isize - 1, src_rows);
                        let down = PaddingMode::Reflect.map_index(y as isize + 1, src_rows);

                        let mut gx = src_data[y * src_cols + right] - src_data[y * src_cols + left];
                        let gy = src_data[down * src_cols + x] - src_data[up * src_cols + x];

                        if gx == 0.0 {
                            gx = GX_EPS;
                        }

                        let mag = (gx * gx + gy * gy).sqrt();
                        let mut angle = gy.atan2(gx);
                        // fold into the unsigned gradient direction range
                        if angle < 0.0 {
                            angle += std::f32::consts::PI;
                        }

                        hist[orientation_bin(angle)] += mag;
                    }
                }
            }
        });

    // normalize each cell by its clipped 3x3 neighborhood of raw histograms
    let raw = dst.as_slice().to_vec();

    dst.as_slice_mut()
        .par_chunks_exact_mut(cells_w * NUM_BINS)
        .enumerate()
        .for_each(|(cy, cell_row)| {
            let y0 = cy.saturating_sub(1);
            let y1 = (cy + 2).min(cells_h);
            for (cx, hist) in cell_row.chunks_exact_mut(NUM_BINS).enumerate() {
                let x0 = cx.saturating_sub(1);
                let x1 = (cx + 2).min(cells_w);

                let mut sum_sq = 0.0f32;
                for ny in y0..y1 {
                    for nx in x0..x1 {
                        let offset = (ny * cells_w + nx) * NUM_BINS;
                        for &v in &raw[offset..offset + NUM_BINS] {
                            sum_sq += v * v;
                        }
                    }
                }

                let norm = sum_sq.sqrt() + 1.0;
                hist.iter_mut().for_each(|h| *h /= norm);
            }
        });

    Ok(())
}
