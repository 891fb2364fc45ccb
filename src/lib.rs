//! Live-Wire Rust Core
//!
//! Intelligent-scissors boundary tracing implemented in Rust
//! with Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Input images are RGBA u8 arrays of shape (height, width, 4). Every
//! derived per-pixel field is a (height, width) array indexed `[[y, x]]`.
//!
//! ## Pipeline
//! 1. [`filters::build_features`]: grayscale, Laplacian zero-crossings,
//!    Sobel gradients and the normalized gradient cost, computed once per image
//! 2. [`selection::compute_tree`]: minimum-cost back-pointer tree from a seed
//! 3. [`selection::PointerMap::path_to`]: boundary from any pixel to the seed
//!
//! [`LiveWire`] wraps all three; [`ScissorsSession`] adds the multi-click
//! workflow on top.

pub mod error;
pub mod filters;
pub mod image;
pub mod selection;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{LiveWireError, Result};
pub use filters::{build_features, Features};
pub use image::{Pixel, RgbaImage};
pub use selection::{CostWeights, LiveWire, PointerMap, ScissorsSession};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::LiveWireError;
    use crate::image::{Pixel, RgbaImage};
    use crate::selection::{CostWeights, LiveWire};

    fn to_py_err(err: LiveWireError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    fn to_image(image: PyReadonlyArray3<'_, u8>) -> PyResult<RgbaImage> {
        RgbaImage::from_array(image.as_array().to_owned()).map_err(to_py_err)
    }

    fn to_tuples(path: Vec<Pixel>) -> Vec<(usize, usize)> {
        path.into_iter().map(|p| (p.x, p.y)).collect()
    }

    /// Intelligent-scissors state for one RGBA image.
    ///
    /// Feature extraction and the seed search release the GIL.
    #[pyclass(name = "LiveWire")]
    pub struct PyLiveWire {
        inner: LiveWire,
    }

    #[pymethods]
    impl PyLiveWire {
        /// Build features for an RGBA u8 image of shape (height, width, 4).
        ///
        /// # Arguments
        /// * `zero_crossing` - Weight of the Laplacian zero-crossing term (default: 0.43)
        /// * `gradient_magnitude` - Weight of the gradient magnitude term (default: 0.14)
        /// * `gradient_direction` - Weight of the gradient direction term (default: 0.43)
        #[new]
        #[pyo3(signature = (image, zero_crossing=0.43, gradient_magnitude=0.14, gradient_direction=0.43))]
        fn new<'py>(
            py: Python<'py>,
            image: PyReadonlyArray3<'py, u8>,
            zero_crossing: f64,
            gradient_magnitude: f64,
            gradient_direction: f64,
        ) -> PyResult<Self> {
            let image = to_image(image)?;
            let weights = CostWeights {
                zero_crossing,
                gradient_magnitude,
                gradient_direction,
            };
            let inner = py
                .allow_threads(|| LiveWire::with_weights(&image, weights))
                .map_err(to_py_err)?;
            Ok(Self { inner })
        }

        #[getter]
        fn width(&self) -> usize {
            self.inner.width()
        }

        #[getter]
        fn height(&self) -> usize {
            self.inner.height()
        }

        /// Replace the image. Clears the seed point.
        fn set_image<'py>(
            &mut self,
            py: Python<'py>,
            image: PyReadonlyArray3<'py, u8>,
        ) -> PyResult<()> {
            let image = to_image(image)?;
            let inner = &mut self.inner;
            py.allow_threads(|| inner.set_image(&image)).map_err(to_py_err)
        }

        /// Set the seed point and compute the pointer tree.
        fn set_seed_point(&mut self, py: Python<'_>, x: usize, y: usize) -> PyResult<()> {
            let inner = &mut self.inner;
            py.allow_threads(|| inner.set_seed_point(x, y)).map_err(to_py_err)
        }

        fn seed_point(&self) -> Option<(usize, usize)> {
            self.inner.seed_point().map(|p| (p.x, p.y))
        }

        /// Boundary from (x, y) back to the seed as a list of (x, y) tuples.
        fn path_to(&self, x: usize, y: usize) -> PyResult<Vec<(usize, usize)>> {
            self.inner.path_to(x, y).map(to_tuples).map_err(to_py_err)
        }

        /// Normalized gradient cost, shape (height, width), 0 = strongest edge.
        fn cost_field<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
            self.inner.cost_field().to_owned().into_pyarray(py)
        }

        /// Gradient cost rendered as an opaque RGBA image.
        fn cost_image<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray3<u8>> {
            self.inner.features().cost_image_rgba().into_pyarray(py)
        }

        /// Directed link cost between two 8-connected pixels.
        fn local_cost(&self, from_xy: (usize, usize), to_xy: (usize, usize)) -> PyResult<f64> {
            self.inner
                .local_cost(Pixel::from(from_xy), Pixel::from(to_xy))
                .map_err(to_py_err)
        }
    }

    /// Live-wire Rust extension module
    #[pymodule]
    pub fn livewire_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_class::<PyLiveWire>()?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::livewire_rust;
