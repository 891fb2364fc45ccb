//! Path extraction from a back-pointer tree.

use super::search::{PointerMap, NO_PARENT};
use crate::error::{LiveWireError, Result};
use crate::image::{check_bounds, Pixel};

fn invariant_violation(message: String) -> LiveWireError {
    log::error!("live-wire pointer tree is corrupt: {}", message);
    LiveWireError::InvariantViolation(message)
}

impl PointerMap {
    /// Boundary from `target` back to the seed, both included.
    ///
    /// # Errors
    /// - `OutOfBounds` if `target` is outside the image
    /// - `NoPath` if the search never reached `target`
    /// - `InvariantViolation` on a cycle or dangling pointer
    pub fn path_to(&self, target: Pixel) -> Result<Vec<Pixel>> {
        check_bounds(target.x, target.y, self.width, self.height)?;

        let width = self.width;
        let mut index = target.index(width);
        if !self.expanded[index] {
            return Err(LiveWireError::NoPath {
                x: target.x,
                y: target.y,
            });
        }

        let seed_index = self.seed.index(width);
        let limit = self.parent.len();
        let mut path = vec![target];

        while index != seed_index {
            if path.len() >= limit {
                return Err(invariant_violation(format!(
                    "pointer chain from {} exceeds {} pixels",
                    target, limit
                )));
            }
            let parent = self.parent[index];
            if parent == NO_PARENT {
                return Err(invariant_violation(format!(
                    "pixel {} has no predecessor on the way to seed {}",
                    Pixel::from_index(index, width),
                    self.seed
                )));
            }
            index = parent;
            path.push(Pixel::from_index(index, width));
        }

        Ok(path)
    }
}
