//! Pixel coordinates and the RGBA input image.
//!
//! The image is an explicit input: callers hand over the pixel buffer they
//! read from their display surface and the core keeps no reference to it
//! beyond feature extraction.

use std::fmt;

use ndarray::{Array3, ArrayView3};

use crate::error::{LiveWireError, Result};

/// Integer pixel coordinate. Flat index is always `y * width + x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pixel {
    pub x: usize,
    pub y: usize,
}

impl Pixel {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Row-major index into a field of the given width.
    #[inline]
    pub const fn index(self, width: usize) -> usize {
        self.y * width + self.x
    }

    #[inline]
    pub const fn from_index(index: usize, width: usize) -> Self {
        Self {
            x: index % width,
            y: index / width,
        }
    }

    /// True if `other` is one of the 8 neighbors of `self`.
    #[inline]
    pub fn is_neighbor(self, other: Pixel) -> bool {
        self != other && self.x.abs_diff(other.x) <= 1 && self.y.abs_diff(other.y) <= 1
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(usize, usize)> for Pixel {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

/// RGBA u8 image of shape (height, width, 4).
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaImage {
    data: Array3<u8>,
}

impl RgbaImage {
    /// Wrap a flat RGBA byte buffer (`4 * width * height` bytes, row-major).
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LiveWireError::InvalidImage(format!(
                "image has zero size ({width}x{height})"
            )));
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                LiveWireError::InvalidImage(format!("image size {width}x{height} overflows"))
            })?;
        if data.len() != expected {
            return Err(LiveWireError::InvalidImage(format!(
                "expected {expected} RGBA bytes for {width}x{height}, got {}",
                data.len()
            )));
        }

        let data = Array3::from_shape_vec((height, width, 4), data)
            .map_err(|e| LiveWireError::InvalidImage(e.to_string()))?;
        Ok(Self { data })
    }

    /// Wrap an existing (height, width, 4) array.
    pub fn from_array(data: Array3<u8>) -> Result<Self> {
        let (height, width, channels) = data.dim();
        if channels != 4 {
            return Err(LiveWireError::InvalidImage(format!(
                "expected 4 channels (RGBA), got {channels}"
            )));
        }
        if width == 0 || height == 0 {
            return Err(LiveWireError::InvalidImage(format!(
                "image has zero size ({width}x{height})"
            )));
        }
        Ok(Self { data })
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }
}

/// Validate `(x, y)` against a `width x height` grid.
pub(crate) fn check_bounds(x: usize, y: usize, width: usize, height: usize) -> Result<Pixel> {
    if x < width && y < height {
        Ok(Pixel::new(x, y))
    } else {
        Err(LiveWireError::OutOfBounds {
            x,
            y,
            width,
            height,
        })
    }
}
