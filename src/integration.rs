//! Integration module for connecting the highlighter to a host game.
//!
//! This module provides the traits the host implements (world services and
//! the annotation renderer), an in-memory [`scene::Scene`] implementation,
//! and the [`Highlighter`] that drives the periodic scan.

mod driver;
mod render;
pub mod scene;
mod world;

pub use driver::{Highlighter, HighlighterConfig, TickOutcome, TickReport};
pub use render::{AnnotationRenderer, AnnotationSpec, AnnotationStyle};
pub use world::{CorpseKind, LootContainer, LootItem, Position, World};
