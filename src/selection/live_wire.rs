//! The live-wire tool core: image features, seed point and pointer tree.
//!
//! This is the surface an editor's scissors tool talks to. It carries no UI
//! state; the caller turns clicks and cursor moves into `set_seed_point` and
//! `path_to` calls. Both feature extraction and the search block the calling
//! thread, so interactive callers should run them on a worker.

use std::sync::atomic::AtomicBool;

use ndarray::ArrayView2;

use super::cost::{CostModel, CostWeights};
use super::search::{compute_tree, compute_tree_cancellable, PointerMap};
use crate::error::{LiveWireError, Result};
use crate::filters::{build_features, Features};
use crate::image::{check_bounds, Pixel, RgbaImage};

/// Intelligent-scissors state for one image.
#[derive(Debug, Clone)]
pub struct LiveWire {
    features: Features,
    weights: CostWeights,
    seed: Option<Pixel>,
    tree: Option<PointerMap>,
}

impl LiveWire {
    /// Build features for `image` with the default cost weights.
    pub fn new(image: &RgbaImage) -> Result<Self> {
        Self::with_weights(image, CostWeights::default())
    }

    /// Build features for `image` with custom cost weights.
    pub fn with_weights(image: &RgbaImage, weights: CostWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self {
            features: build_features(image)?,
            weights,
            seed: None,
            tree: None,
        })
    }

    /// Build from a flat RGBA buffer of `4 * width * height` bytes.
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        Self::new(&RgbaImage::from_raw(width, height, data)?)
    }

    pub fn width(&self) -> usize {
        self.features.width()
    }

    pub fn height(&self) -> usize {
        self.features.height()
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn weights(&self) -> CostWeights {
        self.weights
    }

    /// Replace the image (e.g. after a filter was applied).
    ///
    /// Features are rebuilt in full; the seed and pointer tree are dropped.
    /// On error the previous state is left untouched.
    pub fn set_image(&mut self, image: &RgbaImage) -> Result<()> {
        let features = build_features(image)?;
        self.features = features;
        self.seed = None;
        self.tree = None;
        Ok(())
    }

    /// Set the seed and run the search from it.
    pub fn set_seed_point(&mut self, x: usize, y: usize) -> Result<()> {
        let seed = check_bounds(x, y, self.width(), self.height())?;
        self.clear_seed();
        let tree = compute_tree(&self.cost_model(), seed)?;
        self.seed = Some(seed);
        self.tree = Some(tree);
        Ok(())
    }

    /// Like [`set_seed_point`](Self::set_seed_point) but gives up once
    /// `cancel` is set, leaving no seed behind.
    pub fn set_seed_point_cancellable(
        &mut self,
        x: usize,
        y: usize,
        cancel: &AtomicBool,
    ) -> Result<()> {
        let seed = check_bounds(x, y, self.width(), self.height())?;
        self.clear_seed();
        let tree = compute_tree_cancellable(&self.cost_model(), seed, cancel)?;
        self.seed = Some(seed);
        self.tree = Some(tree);
        Ok(())
    }

    pub fn seed_point(&self) -> Option<Pixel> {
        self.seed
    }

    /// Drop the seed and its pointer tree.
    pub fn clear_seed(&mut self) {
        self.seed = None;
        self.tree = None;
    }

    /// Pointer tree of the current seed.
    pub fn tree(&self) -> Option<&PointerMap> {
        self.tree.as_ref()
    }

    /// Boundary from `(x, y)` back to the seed, both included.
    pub fn path_to(&self, x: usize, y: usize) -> Result<Vec<Pixel>> {
        let target = check_bounds(x, y, self.width(), self.height())?;
        let tree = self.tree.as_ref().ok_or(LiveWireError::SeedNotSet)?;
        tree.path_to(target)
    }

    /// Normalized gradient cost per pixel (0 = strongest edge).
    pub fn cost_field(&self) -> ArrayView2<'_, f64> {
        self.features.gradient_magnitude()
    }

    /// Directed link cost between two 8-connected pixels.
    pub fn local_cost(&self, from: Pixel, to: Pixel) -> Result<f64> {
        self.cost_model().local_cost(from, to)
    }

    fn cost_model(&self) -> CostModel<'_> {
        CostModel::new(&self.features, self.weights)
    }
}
