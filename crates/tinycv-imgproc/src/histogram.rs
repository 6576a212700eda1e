use rayon::prelude::*;
use tinycv_image::{Image, ImageError};

/// Compute the pixel intensity histogram of an 8-bit single channel image.
///
/// The 256 intensity levels are distributed over `num_bins` equally sized
/// bins and the per-bin counts are written into `hist`, replacing whatever
/// it held before.
///
/// # Arguments
///
/// * `src` - The input image to compute the histogram of.
/// * `hist` - The output slice of per-bin counts, of length `num_bins`.
/// * `num_bins` - The number of bins, between 1 and 256.
///
/// # Errors
///
/// Returns an error if `num_bins` is out of range or does not match the
/// length of `hist`.
///
/// # Example
///
/// ```
/// use tinycv_image::{Image, ImageSize};
/// use tinycv_imgproc::histogram::compute_histogram;
///
/// let image = Image::<u8, 1>::new(
///   ImageSize {
///     width: 3,
///     height: 3,
///   },
///   vec![0, 2, 4, 128, 130, 132, 254, 255, 255],
/// ).unwrap();
///
/// let mut histogram = vec![0; 3];
///
/// compute_histogram(&image, &mut histogram, 3).unwrap();
/// assert_eq!(histogram, vec![3, 3, 3]);
/// ```
pub fn compute_histogram(
    src: &Image<u8, 1>,
    hist: &mut [usize],
    num_bins: usize,
) -> Result<(), ImageError> {
    if num_bins == 0 || num_bins > 256 {
        return Err(ImageError::InvalidHistogramBins(num_bins));
    }

    if hist.len() != num_bins {
        return Err(ImageError::InvalidHistogramBins(num_bins));
    }

    // intensity to bin lookup table
    let mut bin_lut = [0usize; 256];
    for (i, bin) in bin_lut.iter_mut().enumerate() {
        *bin = (i * num_bins) >> 8;
    }

    let counts = src
        .as_slice()
        .par_chunks(4096)
        .fold(
            || vec![0usize; num_bins],
            |mut local, chunk| {
                for &px in chunk {
                    local[bin_lut[px as usize]] += 1;
                }
                local
            },
        )
        .reduce(
            || vec![0usize; num_bins],
            |mut a, b| {
                for (sum, count) in a.iter_mut().zip(b.iter()) {
                    *sum += count;
                }
                a
            },
        );

    hist.copy_from_slice(&counts);

    Ok(())
}
