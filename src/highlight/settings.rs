//! Runtime settings written by the panel and the stats it reads back.

use std::ops::RangeInclusive;

use crate::highlight::category::Category;
use crate::highlight::color::Color;

/// Settings read by every scan tick.
///
/// Owned by the [`Highlighter`](crate::Highlighter); the panel writes through
/// the highlighter so category changes can trigger a refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    radius: f32,
    interval: f32,
    show_distance: bool,
    enabled: [bool; 3],
    colors: [Color; 3],
    radius_bounds: RangeInclusive<f32>,
    interval_bounds: RangeInclusive<f32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(10.0, 0.5, 5.0..=30.0, 0.1..=2.0)
    }
}

impl Settings {
    /// Create settings with all categories enabled and the default colors.
    /// Initial values are clamped into their bounds.
    pub fn new(
        radius: f32,
        interval: f32,
        radius_bounds: RangeInclusive<f32>,
        interval_bounds: RangeInclusive<f32>,
    ) -> Self {
        let mut settings = Self {
            radius: *radius_bounds.start(),
            interval: *interval_bounds.start(),
            show_distance: false,
            enabled: [true; 3],
            colors: [Color::RED, Color::GREEN, Color::YELLOW],
            radius_bounds,
            interval_bounds,
        };
        settings.set_radius(radius);
        settings.set_interval(interval);
        settings
    }

    /// Detection radius in world units.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Seconds between scans.
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Whether new labels get a distance suffix.
    pub fn show_distance(&self) -> bool {
        self.show_distance
    }

    /// Range radius writes are clamped into.
    pub fn radius_bounds(&self) -> &RangeInclusive<f32> {
        &self.radius_bounds
    }

    /// Range interval writes are clamped into.
    pub fn interval_bounds(&self) -> &RangeInclusive<f32> {
        &self.interval_bounds
    }

    /// Whether objects of `category` are highlighted.
    pub fn is_category_enabled(&self, category: Category) -> bool {
        self.enabled[category.index()]
    }

    /// Color used for `category` annotations. Items use their rarity color.
    pub fn category_color(&self, category: Category) -> Color {
        self.colors[category.index()]
    }

    /// Set the detection radius, clamped into the radius bounds.
    /// Non-finite values are ignored.
    pub fn set_radius(&mut self, radius: f32) {
        if let Some(v) = clamp(radius, &self.radius_bounds) {
            self.radius = v;
        }
    }

    /// Set the scan interval, clamped into the interval bounds.
    /// Non-finite values are ignored.
    pub fn set_interval(&mut self, interval: f32) {
        if let Some(v) = clamp(interval, &self.interval_bounds) {
            self.interval = v;
        }
    }

    /// Toggle the distance suffix on new labels.
    pub fn set_show_distance(&mut self, show: bool) {
        self.show_distance = show;
    }

    /// Enable or disable a category. Returns `true` if the value changed.
    pub fn set_category_enabled(&mut self, category: Category, enabled: bool) -> bool {
        let slot = &mut self.enabled[category.index()];
        let changed = *slot != enabled;
        *slot = enabled;
        changed
    }

    /// Set a category color. Returns `true` if the value changed.
    pub fn set_category_color(&mut self, category: Category, color: Color) -> bool {
        let slot = &mut self.colors[category.index()];
        let changed = *slot != color;
        *slot = color;
        changed
    }
}

fn clamp(value: f32, bounds: &RangeInclusive<f32>) -> Option<f32> {
    if !value.is_finite() {
        return None;
    }
    // max/min instead of f32::clamp: a reversed range from config must not panic
    Some(value.max(*bounds.start()).min(*bounds.end()))
}

/// Highlight counts, recomputed once per scan tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    total: usize,
    per_category: [usize; 3],
}

impl StatsSnapshot {
    /// Count categories of the given highlights.
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut stats = Self::default();
        for category in categories {
            stats.per_category[category.index()] += 1;
            stats.total += 1;
        }
        stats
    }

    /// Number of highlights across all categories.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of highlights in `category`.
    pub fn count(&self, category: Category) -> usize {
        self.per_category[category.index()]
    }
}
