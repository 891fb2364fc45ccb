//! Edge features: Laplacian zero crossings and Sobel gradients.
//!
//! All functions take and return single-channel fields of shape
//! (height, width), indexed `[[y, x]]`.

use ndarray::parallel::prelude::*;
use ndarray::{Array2, ArrayView2, Zip};

use super::core::{
    convolve3x3, BorderMode, GAUSSIAN_3X3, LAPLACIAN_3X3, SOBEL_X, SOBEL_Y,
};

// ============================================================================
// Laplacian Zero-Crossing
// ============================================================================

/// Gaussian blur followed by a 4-connected Laplacian.
///
/// Both passes copy border pixels unchanged from their input.
pub fn laplacian_of_gaussian(gray: ArrayView2<f64>) -> Array2<f64> {
    let blurred = convolve3x3(gray, &GAUSSIAN_3X3, BorderMode::Copy);
    convolve3x3(blurred.view(), &LAPLACIAN_3X3, BorderMode::Copy)
}

/// Label zero crossings of a Laplacian response.
///
/// Returns 1 where there is no usable sign change and 0 where the response
/// changes sign against one of the 4-connected neighbors *and* this pixel is
/// the one closer to zero. Border pixels are always 1.
pub fn zero_crossings(laplacian: ArrayView2<f64>) -> Array2<u8> {
    let (height, width) = laplacian.dim();
    let mut output = Array2::<u8>::from_elem((height, width), 1);

    Zip::indexed(&mut output).par_for_each(|(y, x), label| {
        if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
            return;
        }

        let pixel = laplacian[[y, x]];
        let neighbours = [
            laplacian[[y - 1, x]],
            laplacian[[y + 1, x]],
            laplacian[[y, x - 1]],
            laplacian[[y, x + 1]],
        ];

        let crosses = neighbours.iter().any(|&n| {
            let sign_change = (pixel < 0.0 && n > 0.0) || (pixel > 0.0 && n < 0.0);
            sign_change && pixel.abs() < n.abs()
        });
        if crosses {
            *label = 0;
        }
    });

    output
}

// ============================================================================
// Sobel Gradient
// ============================================================================

/// Horizontal and vertical Sobel responses of the raw intensity field.
///
/// The gradient is undefined on the 1-pixel border, which is reported as 0.
pub fn sobel(gray: ArrayView2<f64>) -> (Array2<f64>, Array2<f64>) {
    rayon::join(
        || convolve3x3(gray, &SOBEL_X, BorderMode::Zero),
        || convolve3x3(gray, &SOBEL_Y, BorderMode::Zero),
    )
}

/// Rounded gradient magnitude `round(sqrt(gx^2 + gy^2))`.
pub fn gradient_magnitude(sobel_x: ArrayView2<f64>, sobel_y: ArrayView2<f64>) -> Array2<f64> {
    let mut output = Array2::<f64>::zeros(sobel_x.raw_dim());
    Zip::from(&mut output)
        .and(&sobel_x)
        .and(&sobel_y)
        .par_for_each(|g, &gx, &gy| {
            *g = (gx * gx + gy * gy).sqrt().round();
        });
    output
}

/// Gradient magnitude turned into a cost in `[0, 1]`: `1 - g / max(g)`.
///
/// Strong edges cost close to 0. A field without any gradient (`max(g) == 0`)
/// saturates to 1 everywhere. Returns the cost field and `max(g)`.
pub fn gradient_magnitude_cost(
    sobel_x: ArrayView2<f64>,
    sobel_y: ArrayView2<f64>,
) -> (Array2<f64>, f64) {
    let mut magnitude = gradient_magnitude(sobel_x, sobel_y);
    let max_g = magnitude.par_iter().copied().reduce(|| 0.0, f64::max);

    if max_g > 0.0 {
        magnitude.par_mapv_inplace(|g| 1.0 - g / max_g);
    } else {
        magnitude.fill(1.0);
    }

    (magnitude, max_g)
}
