//! Core data models for the cheat sheet pipeline.

mod army;
mod catalog_unit;
mod confidence;
mod matched;
mod phase;
mod stratagem;

pub use army::*;
pub use catalog_unit::*;
pub use confidence::*;
pub use matched::*;
pub use phase::*;
pub use stratagem::*;
