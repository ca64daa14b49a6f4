//! Per-object annotation state kept by the registry.

use std::fmt;

use crate::highlight::category::Category;
use crate::highlight::color::Color;

/// Stable identity of a world object while it is alive in the scene.
///
/// The host may hand the same value to a different object after the first one
/// is destroyed, so an id is only unique among currently live objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// When a tracked object was last returned by a scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LastSeen {
    /// Seen by the scan at this time (seconds)
    At(f32),
    /// Missing from the latest scan; evict on the next eviction pass
    Evict,
}

/// A live highlight: label text, color, the world object the annotation is
/// attached to and the render handle that owns the visual label + light.
#[derive(Debug)]
pub struct AnnotationState<T, R> {
    pub id: ObjectId,
    pub category: Category,
    pub label: String,
    pub color: Color,
    pub last_seen: LastSeen,
    target: T,
    handle: R,
}

impl<T, R> AnnotationState<T, R> {
    pub(crate) fn new(
        id: ObjectId,
        category: Category,
        label: String,
        color: Color,
        target: T,
        handle: R,
        now: f32,
    ) -> Self {
        Self {
            id,
            category,
            label,
            color,
            last_seen: LastSeen::At(now),
            target,
            handle,
        }
    }

    /// World object the annotation was attached to.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Render handle owning the label + light.
    pub fn handle(&self) -> &R {
        &self.handle
    }

    pub(crate) fn into_handle(self) -> R {
        self.handle
    }

    pub fn refresh(&mut self, now: f32) {
        self.last_seen = LastSeen::At(now);
    }

    pub fn mark_evict(&mut self) {
        self.last_seen = LastSeen::Evict;
    }

    /// Marked for eviction, or not seen for longer than `threshold` seconds.
    pub fn is_stale(&self, now: f32, threshold: f32) -> bool {
        match self.last_seen {
            LastSeen::Evict => true,
            LastSeen::At(seen) => now - seen > threshold,
        }
    }
}
