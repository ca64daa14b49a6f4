//! Annotation render service boundary.

use std::fmt;

use nalgebra::Vector3;

use crate::highlight::Color;

/// Presentation constants for every annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationStyle {
    /// Label offset from the target origin
    pub label_offset: Vector3<f32>,
    /// Text character size in world units
    pub character_size: f32,
    /// Point light range in world units
    pub light_range: f32,
    pub light_intensity: f32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            label_offset: Vector3::new(0.0, 0.2, 0.0),
            character_size: 0.03,
            light_range: 2.0,
            light_intensity: 1.5,
        }
    }
}

/// Everything the render service needs to build one label + light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationSpec<'a> {
    pub text: &'a str,
    /// Used for both the label text and the light
    pub color: Color,
    pub style: &'a AnnotationStyle,
}

/// Creates and destroys the visual annotation attached to a world object.
///
/// Destruction consumes the render handle, so a handle can only ever be
/// destroyed once.
pub trait AnnotationRenderer {
    /// World object handle annotations attach to; the world's handle type.
    ///
    /// Compared to tell a reused identity apart from the object it used to
    /// name.
    type Target: PartialEq;

    /// Handle owning the live label + light.
    type Handle;

    /// Error returned when the annotation could not be created.
    type Error: fmt::Display;

    /// Build the label + light for `target`.
    fn create_annotation(
        &mut self,
        target: &Self::Target,
        spec: &AnnotationSpec<'_>,
    ) -> Result<Self::Handle, Self::Error>;

    /// Remove the label + light owned by `handle`.
    fn destroy_annotation(&mut self, handle: Self::Handle);
}
