//! WebAssembly exports for the live-wire tool.
//!
//! [`LiveWireTool`] is exposed to JavaScript via wasm-bindgen.
//!
//! ## Data Layout
//!
//! - Images are flat RGBA bytes, `width * height * 4`, row-major
//! - Paths are flat `[x0, y0, x1, y1, ...]` arrays, query pixel first,
//!   seed last
//! - The cost field is flat `width * height` floats

use wasm_bindgen::prelude::*;

use crate::error::LiveWireError;
use crate::image::{Pixel, RgbaImage};
use crate::selection::LiveWire;

fn to_js_err(err: LiveWireError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn flatten(path: &[Pixel]) -> Vec<u32> {
    path.iter()
        .flat_map(|p| [p.x as u32, p.y as u32])
        .collect()
}

/// Intelligent-scissors state for one canvas image.
#[wasm_bindgen]
pub struct LiveWireTool {
    inner: LiveWire,
}

#[wasm_bindgen]
impl LiveWireTool {
    /// Build features from canvas `ImageData` bytes.
    ///
    /// # Arguments
    /// * `data` - Flat array of RGBA bytes (length = width * height * 4)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    #[wasm_bindgen(constructor)]
    pub fn new(data: &[u8], width: usize, height: usize) -> Result<LiveWireTool, JsValue> {
        let inner = LiveWire::from_rgba(width, height, data.to_vec()).map_err(to_js_err)?;
        Ok(LiveWireTool { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> usize {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> usize {
        self.inner.height()
    }

    /// Replace the image. Clears the seed point.
    pub fn set_image(&mut self, data: &[u8], width: usize, height: usize) -> Result<(), JsValue> {
        let image = RgbaImage::from_raw(width, height, data.to_vec()).map_err(to_js_err)?;
        self.inner.set_image(&image).map_err(to_js_err)
    }

    /// Set the seed point and compute the pointer tree.
    pub fn set_seed_point(&mut self, x: usize, y: usize) -> Result<(), JsValue> {
        self.inner.set_seed_point(x, y).map_err(to_js_err)
    }

    /// Current seed as `[x, y]`, or undefined.
    pub fn seed_point(&self) -> Option<Vec<u32>> {
        self.inner
            .seed_point()
            .map(|p| vec![p.x as u32, p.y as u32])
    }

    /// Boundary from (x, y) back to the seed as flat `[x0, y0, ...]`.
    pub fn path_to(&self, x: usize, y: usize) -> Result<Vec<u32>, JsValue> {
        self.inner
            .path_to(x, y)
            .map(|path| flatten(&path))
            .map_err(to_js_err)
    }

    /// Normalized gradient cost, row-major.
    pub fn cost_field(&self) -> Vec<f32> {
        self.inner.cost_field().iter().map(|&c| c as f32).collect()
    }

    /// Gradient cost as RGBA bytes, ready for `putImageData`.
    pub fn cost_image(&self) -> Vec<u8> {
        self.inner
            .features()
            .cost_image_rgba()
            .into_raw_vec_and_offset()
            .0
    }
}
