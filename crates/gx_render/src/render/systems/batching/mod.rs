//! Batch rendering system
//!
//! Batches sprite quads into as few draw calls as possible.

pub mod sprite_batcher;
pub mod vertex;

// Re-export all batching types
pub use sprite_batcher::*;
pub use vertex::*;
