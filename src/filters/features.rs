//! Per-pixel feature fields for the live-wire cost model.
//!
//! Features are computed once per image and never patched: a changed image
//! means a new [`Features`] value.

use ndarray::{Array2, Array3, ArrayView2};

use super::edge::{gradient_magnitude_cost, laplacian_of_gaussian, sobel, zero_crossings};
use super::grayscale::{grayscale_u8, LumaWeights};
use crate::error::{LiveWireError, Result};
use crate::image::RgbaImage;

/// Smallest width/height accepted (the 3x3 window needs a 1-pixel border).
pub const MIN_IMAGE_SIZE: usize = 3;

/// Edge features of one image, all of shape (height, width).
#[derive(Debug, Clone, PartialEq)]
pub struct Features {
    width: usize,
    height: usize,
    grayscale: Array2<u8>,
    zero_crossings: Array2<u8>,
    sobel_x: Array2<f64>,
    sobel_y: Array2<f64>,
    gradient_magnitude: Array2<f64>,
    max_gradient: f64,
}

impl Features {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Rounded BT.601 luminance.
    pub fn grayscale(&self) -> ArrayView2<'_, u8> {
        self.grayscale.view()
    }

    /// 0 at Laplacian zero crossings, 1 elsewhere.
    pub fn zero_crossings(&self) -> ArrayView2<'_, u8> {
        self.zero_crossings.view()
    }

    pub fn sobel_x(&self) -> ArrayView2<'_, f64> {
        self.sobel_x.view()
    }

    pub fn sobel_y(&self) -> ArrayView2<'_, f64> {
        self.sobel_y.view()
    }

    /// Normalized gradient cost in `[0, 1]`; low values mark strong edges.
    pub fn gradient_magnitude(&self) -> ArrayView2<'_, f64> {
        self.gradient_magnitude.view()
    }

    /// Largest rounded gradient magnitude in the image.
    pub fn max_gradient(&self) -> f64 {
        self.max_gradient
    }

    /// Render the gradient cost as an opaque grayscale RGBA image.
    ///
    /// Edges show up dark. Useful for checking what the scissors will snap to.
    pub fn cost_image_rgba(&self) -> Array3<u8> {
        let mut output = Array3::<u8>::zeros((self.height, self.width, 4));
        for ((y, x), &cost) in self.gradient_magnitude.indexed_iter() {
            let val = (cost * 255.0).round().clamp(0.0, 255.0) as u8;
            output[[y, x, 0]] = val;
            output[[y, x, 1]] = val;
            output[[y, x, 2]] = val;
            output[[y, x, 3]] = 255;
        }
        output
    }
}

/// Compute all live-wire features of an RGBA image.
///
/// # Errors
/// `InvalidImage` if the image is smaller than 3x3.
pub fn build_features(image: &RgbaImage) -> Result<Features> {
    build_features_with(image, LumaWeights::default())
}

/// Compute features with custom grayscale weights.
pub fn build_features_with(image: &RgbaImage, luma: LumaWeights) -> Result<Features> {
    let (width, height) = (image.width(), image.height());
    if width < MIN_IMAGE_SIZE || height < MIN_IMAGE_SIZE {
        return Err(LiveWireError::InvalidImage(format!(
            "{width}x{height} is smaller than the {MIN_IMAGE_SIZE}x{MIN_IMAGE_SIZE} filter window"
        )));
    }

    let grayscale = grayscale_u8(image.view(), luma);
    let intensity = grayscale.mapv(f64::from);

    // Zero crossings work on the smoothed field, Sobel on the raw one
    let (zero_crossings, (sobel_x, sobel_y)) = rayon::join(
        || zero_crossings(laplacian_of_gaussian(intensity.view()).view()),
        || sobel(intensity.view()),
    );
    let (gradient_magnitude, max_gradient) =
        gradient_magnitude_cost(sobel_x.view(), sobel_y.view());

    log::debug!(
        "built live-wire features for {}x{} image (max gradient {})",
        width,
        height,
        max_gradient
    );

    Ok(Features {
        width,
        height,
        grayscale,
        zero_crossings,
        sobel_x,
        sobel_y,
        gradient_magnitude,
        max_gradient,
    })
}
