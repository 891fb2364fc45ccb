//! Live-wire boundary selection.
//!
//! - **Cost model**: directed link cost between 8-connected pixels
//! - **Search**: Dijkstra from a seed, producing a back-pointer tree
//! - **Path**: minimum-cost boundary from any pixel back to the seed
//! - **Session**: multi-anchor scissors workflow and mask rasterization
//!
//! [`LiveWire`] ties these together for one image.

pub mod cost;
pub mod live_wire;
pub mod path;
pub mod search;
pub mod session;

pub use cost::{CostModel, CostWeights};
pub use live_wire::LiveWire;
pub use search::{compute_tree, compute_tree_cancellable, PointerMap};
pub use session::{polygon_mask, ScissorsSession};
