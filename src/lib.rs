//! Proximity scanning and highlight lifecycle management.
//!
//! A periodic spatial query finds interactable objects around the viewer,
//! classifies them as items, containers or corpses, and keeps one floating
//! label + point light per object alive for as long as it stays in range.
//!
//! - [`highlight`] holds the core: classification, the highlight registry,
//!   settings and stats.
//! - [`integration`] holds the boundary to the host game (world queries,
//!   annotation rendering) and the [`Highlighter`] scan loop driver.

pub mod error;
pub mod highlight;
pub mod integration;

pub use error::HighlightError;
pub use highlight::{
    Category, Color, HighlightRegistry, ObjectId, RarityTier, Settings, StatsSnapshot,
};
pub use integration::{
    AnnotationRenderer, AnnotationSpec, Highlighter, HighlighterConfig, Position, TickOutcome,
    World,
};
