use rand::Rng;

use tinycv_image::{ImageError, ImageSize};

/// An axis-aligned bounding box with corner coordinates `(x1, y1)` and
/// `(x2, y2)`, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// The x-coordinate of the top-left corner.
    pub x1: f64,
    /// The y-coordinate of the top-left corner.
    pub y1: f64,
    /// The x-coordinate of the bottom-right corner.
    pub x2: f64,
    /// The y-coordinate of the bottom-right corner.
    pub y2: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// The area of the bounding box.
    pub fn area(&self) -> f64 {
        (self.x2 - self.x1) * (self.y2 - self.y1)
    }
}

/// Compute the intersection over union of two bounding boxes.
///
/// The intersection rectangle is clamped to the overlapping region; boxes
/// that do not overlap yield 0.
///
/// # Examples
///
/// ```
/// use tinycv_imgproc::bbox::{iou, BoundingBox};
///
/// let a = BoundingBox::new(50.0, 50.0, 150.0, 150.0);
/// let b = BoundingBox::new(60.0, 60.0, 170.0, 160.0);
///
/// let overlap = iou(&a, &b);
/// assert!((overlap - 8100.0 / 12900.0).abs() < 1e-9);
/// ```
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let iou_x1 = a.x1.max(b.x1);
    let iou_y1 = a.y1.max(b.y1);
    let iou_x2 = a.x2.min(b.x2);
    let iou_y2 = a.y2.min(b.y2);

    let iou_w = iou_x2 - iou_x1;
    let iou_h = iou_y2 - iou_y1;

    if iou_w < 0.0 || iou_h < 0.0 {
        return 0.0;
    }

    let area_iou = iou_w * iou_h;

    area_iou / (a.area() + b.area() - area_iou)
}

/// Parameters for [`sample_crops`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropParams {
    /// Number of crops to sample.
    pub count: usize,
    /// Side length of each square crop in pixels.
    pub side: usize,
    /// Crops with an IoU against ground truth at or above this value are
    /// labeled positive.
    pub iou_threshold: f64,
}

impl Default for CropParams {
    fn default() -> Self {
        Self {
            count: 200,
            side: 60,
            iou_threshold: 0.5,
        }
    }
}

/// A sampled crop with its IoU against the ground truth box and its label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledCrop {
    /// The crop rectangle.
    pub bbox: BoundingBox,
    /// The IoU of the crop against the ground truth box.
    pub iou: f64,
    /// Whether the crop is a positive example.
    pub positive: bool,
}

/// Sample random fixed-size crops from an image and label them by IoU
/// against a ground truth box.
///
/// Crop top-left corners are drawn uniformly so the whole crop lies inside
/// the image.
///
/// # Arguments
///
/// * `rng` - The random number generator to draw crop corners from.
/// * `image_size` - The size of the image being cropped.
/// * `gt` - The ground truth bounding box.
/// * `params` - The sampling parameters.
///
/// # Errors
///
/// Returns an error if the crop side does not fit in the image.
pub fn sample_crops<R: Rng>(
    rng: &mut R,
    image_size: ImageSize,
    gt: &BoundingBox,
    params: &CropParams,
) -> Result<Vec<LabeledCrop>, ImageError> {
    if params.side == 0 || params.side >= image_size.width || params.side >= image_size.height {
        return Err(ImageError::InvalidParameter(
            "crop side must be > 0 and smaller than the image",
        ));
    }

    let mut crops = Vec::with_capacity(params.count);

    for _ in 0..params.count {
        let x1 = rng.random_range(0..image_size.width - params.side);
        let y1 = rng.random_range(0..image_size.height - params.side);

        let bbox = BoundingBox::new(
            x1 as f64,
            y1 as f64,
            (x1 + params.side) as f64,
            (y1 + params.side) as f64,
        );

        let overlap = iou(gt, &bbox);
        crops.push(LabeledCrop {
            bbox,
            iou: overlap,
            positive: overlap >= params.iou_threshold,
        });
    }

    Ok(crops)
}

#[cfg(test)]
mod tests {
    use super::{iou, sample_crops, BoundingBox, CropParams};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tinycv_image::{ImageError, ImageSize};

    #[test]
    fn test_iou_reference_boxes() {
        let a = BoundingBox::new(50.0, 50.0, 150.0, 150.0);
        let b = BoundingBox::new(60.0, 60.0, 170.0, 160.0);

        // overlap 90x90 = 8100, union 10000 + 11000 - 8100 = 12900
        assert_relative_eq!(iou(&a, &b), 8100.0 / 12900.0, epsilon = 1e-12);
    }

    #[test]
    fn test_iou_disjoint() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(20.0, 20.0, 30.0, 30.0);

        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn test_iou_identical() {
        let a = BoundingBox::new(5.0, 5.0, 25.0, 35.0);

        assert_relative_eq!(iou(&a, &a), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_crops() -> Result<(), ImageError> {
        let mut rng = StdRng::seed_from_u64(42);
        let image_size = ImageSize {
            width: 320,
            height: 240,
        };
        let gt = BoundingBox::new(50.0, 50.0, 150.0, 150.0);
        let params = CropParams::default();

        let crops = sample_crops(&mut rng, image_size, &gt, &params)?;
        assert_eq!(crops.len(), params.count);

        for crop in &crops {
            assert!(crop.bbox.x1 >= 0.0 && crop.bbox.x2 <= image_size.width as f64);
            assert!(crop.bbox.y1 >= 0.0 && crop.bbox.y2 <= image_size.height as f64);
            assert_relative_eq!(crop.bbox.area(), (params.side * params.side) as f64);
            assert_eq!(crop.positive, crop.iou >= params.iou_threshold);
        }

        Ok(())
    }

    #[test]
    fn test_sample_crops_side_too_large() {
        let mut rng = StdRng::seed_from_u64(0);
        let image_size = ImageSize {
            width: 50,
            height: 50,
        };
        let gt = BoundingBox::new(0.0, 0.0, 10.0, 10.0);

        let res = sample_crops(&mut rng, image_size, &gt, &CropParams::default());
        assert!(res.is_err());
    }
}
