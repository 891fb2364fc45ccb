//! Core utilities shared by the feature filters.
//!
//! This module provides:
//! - The fixed 3x3 kernels used by the live-wire cost model
//! - 3x3 convolution with an explicit border policy

use ndarray::{Array2, ArrayView2, Zip};

/// A 3x3 kernel, indexed `[ky][kx]` and applied to `(y + ky - 1, x + kx - 1)`.
pub type Kernel3 = [[f64; 3]; 3];

/// 3x3 binomial approximation of a Gaussian (sums to 1).
pub const GAUSSIAN_3X3: Kernel3 = [
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
    [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
];

/// 4-connected Laplacian.
pub const LAPLACIAN_3X3: Kernel3 = [
    [0.0, -1.0, 0.0],
    [-1.0, 4.0, -1.0],
    [0.0, -1.0, 0.0],
];

/// Horizontal derivative (positive for intensity increasing with x).
pub const SOBEL_X: Kernel3 = [
    [-1.0, 0.0, 1.0],
    [-2.0, 0.0, 2.0],
    [-1.0, 0.0, 1.0],
];

/// Vertical derivative (positive for intensity increasing with y).
pub const SOBEL_Y: Kernel3 = [
    [-1.0, -2.0, -1.0],
    [0.0, 0.0, 0.0],
    [1.0, 2.0, 1.0],
];

/// What a 3x3 convolution writes on the 1-pixel image border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderMode {
    /// Border pixels keep the unconvolved source value.
    Copy,
    /// Border pixels are 0.
    Zero,
}

#[inline]
fn is_border(x: usize, y: usize, width: usize, height: usize) -> bool {
    x == 0 || y == 0 || x + 1 >= width || y + 1 >= height
}

/// Convolve a single-channel field with a 3x3 kernel.
///
/// Only interior pixels (`1 <= x < width-1`, `1 <= y < height-1`) are
/// convolved; there is no reflection or clamping. Images narrower or shorter
/// than 3 pixels consist entirely of border.
pub fn convolve3x3(input: ArrayView2<f64>, kernel: &Kernel3, border: BorderMode) -> Array2<f64> {
    let (height, width) = input.dim();
    let mut output = Array2::<f64>::zeros((height, width));

    Zip::indexed(&mut output).par_for_each(|(y, x), out| {
        if is_border(x, y, width, height) {
            *out = match border {
                BorderMode::Copy => input[[y, x]],
                BorderMode::Zero => 0.0,
            };
            return;
        }

        let mut sum = 0.0f64;
        for (ky, row) in kernel.iter().enumerate() {
            for (kx, &k) in row.iter().enumerate() {
                sum += input[[y + ky - 1, x + kx - 1]] * k;
            }
        }
        *out = sum;
    });

    output
}
