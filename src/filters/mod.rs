//! Feature extraction for the live-wire cost model.
//!
//! ## Pipeline
//!
//! | Step | Input | Output |
//! |------|-------|--------|
//! | Grayscale | RGBA u8 (H, W, 4) | rounded luminance u8 (H, W) |
//! | Gaussian 3x3 | luminance | smoothed f64 (H, W) |
//! | Laplacian 3x3 | smoothed | LoG response f64 (H, W) |
//! | Zero crossings | LoG response | 0/1 u8 (H, W) |
//! | Sobel X/Y | luminance (unsmoothed) | signed f64 (H, W) |
//! | Gradient cost | Sobel X/Y | `1 - g/max(g)` f64 (H, W) |
//!
//! All fields are row-major with index `y * width + x`. Gaussian and
//! Laplacian passes copy the 1-pixel border from their input; Sobel
//! responses are 0 on the border.
//!
//! Element-wise passes run on rayon through ndarray's parallel `Zip`; every
//! output element is written by exactly one task, so results are identical
//! from run to run.

pub mod core;
pub mod edge;
pub mod features;
pub mod grayscale;

pub use features::{build_features, build_features_with, Features, MIN_IMAGE_SIZE};
pub use grayscale::LumaWeights;
