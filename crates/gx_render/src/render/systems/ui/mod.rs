//! UI painting
//!
//! The [`Painter`] facade: frame bracketing, transforms, text and shapes.

pub mod painter;
mod shapes;

pub use painter::{Font, Painter};
