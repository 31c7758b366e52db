//! Text rendering of the registry screen.

pub mod render;
