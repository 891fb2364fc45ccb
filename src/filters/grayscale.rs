//! Grayscale conversion for edge features.
//!
//! Uses ITU-R BT.601 luminance weights by default and rounds to the nearest
//! integer intensity, so the result is an exact 0-255 field.

use ndarray::{Array2, ArrayView3, Zip};

/// ITU-R BT.601 luminance coefficients
const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// RGB channel weights for grayscale conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumaWeights {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Default for LumaWeights {
    fn default() -> Self {
        Self {
            r: LUMA_R,
            g: LUMA_G,
            b: LUMA_B,
        }
    }
}

impl LumaWeights {
    /// BT.601 luminance (default)
    pub fn bt601() -> Self {
        Self::default()
    }

    /// Create custom weights (normalized automatically)
    pub fn custom(r: f64, g: f64, b: f64) -> Self {
        let sum = (r + g + b).abs().max(0.001);
        Self {
            r: r / sum,
            g: g / sum,
            b: b / sum,
        }
    }
}

/// Convert an RGBA u8 image (height, width, 4) into a rounded intensity field.
///
/// Alpha is ignored.
pub fn grayscale_u8(input: ArrayView3<u8>, weights: LumaWeights) -> Array2<u8> {
    let (height, width, _) = input.dim();
    let mut output = Array2::<u8>::zeros((height, width));

    Zip::indexed(&mut output).par_for_each(|(y, x), gray| {
        let r = input[[y, x, 0]] as f64;
        let g = input[[y, x, 1]] as f64;
        let b = input[[y, x, 2]] as f64;
        *gray = (weights.r * r + weights.g * g + weights.b * b)
            .round()
            .clamp(0.0, 255.0) as u8;
    });

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn pixel(r: u8, g: u8, b: u8, a: u8) -> Array3<u8> {
        let mut img = Array3::<u8>::zeros((1, 1, 4));
        img[[0, 0, 0]] = r;
        img[[0, 0, 1]] = g;
        img[[0, 0, 2]] = b;
        img[[0, 0, 3]] = a;
        img
    }

    #[test]
    fn test_grayscale_red() {
        let img = pixel(255, 0, 0, 255);
        let result = grayscale_u8(img.view(), LumaWeights::default());
        // 0.299 * 255 = 76.245
        assert_eq!(result[[0, 0]], 76);
    }

    #[test]
    fn test_grayscale_green_rounds_up() {
        let img = pixel(0, 255, 0, 255);
        let result = grayscale_u8(img.view(), LumaWeights::default());
        // 0.587 * 255 = 149.685
        assert_eq!(result[[0, 0]], 150);
    }

    #[test]
    fn test_grayscale_white_and_black() {
        let white = grayscale_u8(pixel(255, 255, 255, 255).view(), LumaWeights::default());
        let black = grayscale_u8(pixel(0, 0, 0, 255).view(), LumaWeights::default());
        assert_eq!(white[[0, 0]], 255);
        assert_eq!(black[[0, 0]], 0);
    }

    #[test]
    fn test_grayscale_ignores_alpha() {
        let opaque = grayscale_u8(pixel(10, 120, 200, 255).view(), LumaWeights::default());
        let clear = grayscale_u8(pixel(10, 120, 200, 0).view(), LumaWeights::default());
        assert_eq!(opaque, clear);
    }

    #[test]
    fn test_custom_weights_are_normalized() {
        let w = LumaWeights::custom(1.0, 1.0, 2.0);
        assert!((w.r + w.g + w.b - 1.0).abs() < 1e-12);
        assert!((w.b - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_layout_follows_rows() {
        let mut img = Array3::<u8>::zeros((2, 3, 4));
        img[[1, 2, 0]] = 255;
        img[[1, 2, 1]] = 255;
        img[[1, 2, 2]] = 255;
        let result = grayscale_u8(img.view(), LumaWeights::default());
        assert_eq!(result.dim(), (2, 3));
        assert_eq!(result[[1, 2]], 255);
        assert_eq!(result[[0, 2]], 0);
    }
}
