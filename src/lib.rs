//! # Cheat Sheet
//!
//! Turns a Warhammer 40k army list export and a YAML rules catalog into a
//! per-phase cheat sheet.
//!
//! ## Architecture
//!
//! - **normalize**: Name normalization and alias lookup
//! - **catalog**: YAML catalog loading (units, phases, reminders, stratagems)
//! - **export**: Heuristic export text parser
//! - **resolve**: Fuzzy matching of requested units against the catalog
//! - **timeline**: Phase/step reminder aggregation
//! - **pipeline**: End-to-end sheet building
//! - **render**: HTML output
//! - **config**: Configuration loading and validation

pub mod catalog;
pub mod config;
pub mod export;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod resolve;
pub mod timeline;

pub use models::*;
