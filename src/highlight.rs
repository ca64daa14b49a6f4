mod annotation;
mod category;
mod classifier;
mod color;
mod registry;
mod settings;

pub use annotation::{AnnotationState, LastSeen, ObjectId};
pub use category::Category;
pub use classifier::{Candidate, classify, container_subtype, is_ui_context};
pub use color::{Color, RarityTier};
pub use registry::{DEFAULT_STALE_THRESHOLD, HighlightRegistry, ReconcileReport};
pub use settings::{Settings, StatsSnapshot};
