//! Scan loop driver combining the world, the classifier and the registry.

use std::ops::RangeInclusive;

use tracing::{info, trace, warn};

use crate::error::HighlightError;
use crate::highlight::{
    self, Category, Color, DEFAULT_STALE_THRESHOLD, HighlightRegistry, ReconcileReport, Settings,
    StatsSnapshot,
};
use crate::integration::{AnnotationRenderer, AnnotationStyle, World};

/// Configuration for the [`Highlighter`].
#[derive(Debug, Clone)]
pub struct HighlighterConfig {
    /// Seconds an unseen object keeps its highlight
    pub stale_threshold: f32,
    pub default_radius: f32,
    pub default_interval: f32,
    pub radius_bounds: RangeInclusive<f32>,
    pub interval_bounds: RangeInclusive<f32>,
    /// Whether scanning starts active
    pub start_enabled: bool,
    pub style: AnnotationStyle,
}

impl Default for HighlighterConfig {
    fn default() -> Self {
        Self {
            stale_threshold: DEFAULT_STALE_THRESHOLD,
            default_radius: 10.0,
            default_interval: 0.5,
            radius_bounds: 5.0..=30.0,
            interval_bounds: 0.1..=2.0,
            start_enabled: true,
            style: AnnotationStyle::default(),
        }
    }
}

/// Result of a completed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub reconcile: ReconcileReport,
    pub evicted: usize,
    pub stats: StatsSnapshot,
}

/// What a call to [`Highlighter::update`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Highlighting is switched off
    Disabled,
    /// The scan interval has not elapsed yet
    NotDue,
    /// No active viewer; only aged highlights were evicted
    NoViewer,
    /// A dependency failed; only aged highlights were evicted
    Skipped(HighlightError),
    /// Full scan: classify, reconcile, evict, stats
    Scanned(TickReport),
}

/// The highlighter: periodic scanning plus the commands and reads the
/// configuration panel uses.
///
/// Everything runs synchronously on the host's update tick. Each scan
/// classifies, then reconciles, then evicts, then recomputes stats, each stage
/// finishing before the next starts.
pub struct Highlighter<W, A>
where
    W: World,
    A: AnnotationRenderer<Target = W::Handle>,
{
    world: W,
    renderer: A,
    registry: HighlightRegistry<W::Handle, A::Handle>,
    settings: Settings,
    stats: StatsSnapshot,
    enabled: bool,
    last_scan: Option<f32>,
    stale_threshold: f32,
}

impl<W, A> Highlighter<W, A>
where
    W: World,
    W::Handle: PartialEq,
    A: AnnotationRenderer<Target = W::Handle>,
{
    /// Create a highlighter with the given configuration.
    pub fn new(world: W, renderer: A, config: HighlighterConfig) -> Self {
        let settings = Settings::new(
            config.default_radius,
            config.default_interval,
            config.radius_bounds,
            config.interval_bounds,
        );
        Self {
            world,
            renderer,
            registry: HighlightRegistry::new(config.style),
            settings,
            stats: StatsSnapshot::default(),
            enabled: config.start_enabled,
            last_scan: None,
            stale_threshold: config.stale_threshold,
        }
    }

    /// Create a highlighter with [`HighlighterConfig::default`].
    pub fn with_default_config(world: W, renderer: A) -> Self {
        Self::new(world, renderer, HighlighterConfig::default())
    }

    /// Per-frame entry point. Scans when active and the interval has elapsed.
    ///
    /// The interval is read fresh on every call, so a changed interval applies
    /// from the next due check on. The first call after construction scans
    /// right away.
    pub fn update(&mut self, now: f32) -> TickOutcome {
        if !self.enabled {
            return TickOutcome::Disabled;
        }
        if let Some(last) = self.last_scan {
            if now - last < self.settings.interval() {
                return TickOutcome::NotDue;
            }
        }
        self.last_scan = Some(now);
        self.scan(now)
    }

    fn scan(&mut self, now: f32) -> TickOutcome {
        let Some(viewer) = self.world.viewer_position() else {
            trace!("no active viewer, scan skipped");
            self.evict_and_count(now);
            return TickOutcome::NoViewer;
        };

        let candidates = match highlight::classify(
            &self.world,
            &viewer,
            self.settings.radius(),
            &self.settings,
        ) {
            Ok(candidates) => candidates,
            Err(err) => {
                let err = HighlightError::world(err);
                warn!(error = %err, "scan skipped");
                self.evict_and_count(now);
                return TickOutcome::Skipped(err);
            }
        };

        let reconcile = self.registry.reconcile(&candidates, now, &mut self.renderer);
        let evicted = self.evict_and_count(now);

        TickOutcome::Scanned(TickReport {
            reconcile,
            evicted,
            stats: self.stats,
        })
    }

    fn evict_and_count(&mut self, now: f32) -> usize {
        let evicted = self
            .registry
            .evict_stale(now, self.stale_threshold, &mut self.renderer);
        self.stats = self.registry.stats();
        evicted
    }

    /// Whether scanning is active.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip between active and disabled. Returns the new state.
    pub fn toggle_enabled(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    /// Switch scanning on or off. Disabling destroys every highlight before
    /// returning.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        info!(enabled, "loot highlighting toggled");
        if !enabled {
            self.clear_all();
        }
    }

    /// Drop every highlight and rescan immediately, ignoring the interval.
    /// When disabled this only clears.
    pub fn force_refresh(&mut self, now: f32) -> TickOutcome {
        self.clear_all();
        if !self.enabled {
            return TickOutcome::Disabled;
        }
        info!("forced refresh");
        self.last_scan = Some(now);
        self.scan(now)
    }

    /// Destroy every highlight. Returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        let cleared = self.registry.clear_all(&mut self.renderer);
        self.stats = StatsSnapshot::default();
        if cleared > 0 {
            info!(cleared, "highlights cleared");
        }
        cleared
    }

    /// Release every render handle and stop scanning. Call before dropping.
    pub fn shutdown(&mut self) {
        self.enabled = false;
        self.clear_all();
    }

    /// Current settings, for the panel.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Highlight counts as of the last eviction pass or clear.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats
    }

    /// Set the detection radius; used from the next scan on.
    pub fn set_radius(&mut self, radius: f32) {
        self.settings.set_radius(radius);
    }

    /// Set the scan interval; used from the next due check on.
    pub fn set_interval(&mut self, interval: f32) {
        self.settings.set_interval(interval);
    }

    /// Applies to labels created from now on.
    pub fn set_show_distance(&mut self, show: bool) {
        self.settings.set_show_distance(show);
    }

    /// Enable or disable a category and refresh immediately.
    pub fn set_category_enabled(&mut self, category: Category, enabled: bool, now: f32) {
        if self.settings.set_category_enabled(category, enabled) {
            info!(%category, enabled, "category toggled");
        }
        self.force_refresh(now);
    }

    /// Recolor a category and refresh immediately.
    pub fn set_category_color(&mut self, category: Category, color: Color, now: f32) {
        if self.settings.set_category_color(category, color) {
            info!(%category, ?color, "category recolored");
        }
        self.force_refresh(now);
    }

    /// Step a category to the next preset color and refresh. Returns the new
    /// color.
    pub fn cycle_category_color(&mut self, category: Category, now: f32) -> Color {
        let color = self.settings.category_color(category).next_preset();
        self.set_category_color(category, color, now);
        color
    }

    /// Get the registry of live highlights.
    pub fn registry(&self) -> &HighlightRegistry<W::Handle, A::Handle> {
        &self.registry
    }

    /// Get a reference to the world.
    pub fn world(&self) -> &W {
        &self.world
    }

    /// Get a mutable reference to the world.
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Get a reference to the renderer.
    pub fn renderer(&self) -> &A {
        &self.renderer
    }

    /// Get a mutable reference to the renderer.
    pub fn renderer_mut(&mut self) -> &mut A {
        &mut self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::scene::{Scene, SceneHandle, SceneObjectBuilder};
    use crate::integration::{AnnotationSpec, CorpseKind};

    #[derive(Default)]
    struct NullRenderer {
        live: usize,
        created: usize,
    }

    impl AnnotationRenderer for NullRenderer {
        type Target = SceneHandle;
        type Handle = ();
        type Error = std::convert::Infallible;

        fn create_annotation(
            &mut self,
            _target: &SceneHandle,
            _spec: &AnnotationSpec<'_>,
        ) -> Result<(), Self::Error> {
            self.live += 1;
            self.created += 1;
            Ok(())
        }

        fn destroy_annotation(&mut self, _handle: ()) {
            self.live -= 1;
        }
    }

    fn highlighter() -> Highlighter<Scene, NullRenderer> {
        let mut scene = Scene::new();
        scene.insert(
            SceneObjectBuilder::new(1)
                .at(2.0, 0.0, 0.0)
                .corpse(CorpseKind::Observed)
                .build(),
        );
        Highlighter::with_default_config(scene, NullRenderer::default())
    }

    #[test]
    fn test_interval_gate() {
        let mut hl = highlighter();

        assert!(matches!(hl.update(0.0), TickOutcome::Scanned(_)));
        assert_eq!(hl.update(0.3), TickOutcome::NotDue);
        assert!(matches!(hl.update(0.5), TickOutcome::Scanned(_)));

        hl.set_interval(2.0);
        assert_eq!(hl.update(1.5), TickOutcome::NotDue);
        assert!(matches!(hl.update(2.5), TickOutcome::Scanned(_)));
    }

    #[test]
    fn test_disabled_does_nothing() {
        let mut hl = highlighter();
        hl.update(0.0);
        assert_eq!(hl.renderer().live, 1);

        assert!(!hl.toggle_enabled());
        assert_eq!(hl.renderer().live, 0);
        assert_eq!(hl.update(5.0), TickOutcome::Disabled);
        assert_eq!(hl.force_refresh(5.0), TickOutcome::Disabled);
        assert!(hl.registry().is_empty());
    }

    #[test]
    fn test_no_viewer() {
        let mut hl = highlighter();
        hl.world_mut().set_viewer(None);
        assert_eq!(hl.update(0.0), TickOutcome::NoViewer);
        assert!(hl.registry().is_empty());
    }

    #[test]
    fn test_world_failure_skips_tick() {
        let mut hl = highlighter();
        hl.update(0.0);

        hl.world_mut().set_loaded(false);
        let outcome = hl.update(1.0);
        assert_eq!(
            outcome,
            TickOutcome::Skipped(HighlightError::WorldUnavailable(
                "scene is not loaded".to_string()
            ))
        );
        // Within the stale threshold the highlight survives the outage
        assert_eq!(hl.registry().len(), 1);

        // Past it, the aged highlight goes even though no scan succeeded
        hl.update(2.5);
        assert!(hl.registry().is_empty());

        hl.world_mut().set_loaded(true);
        assert!(matches!(hl.update(3.0), TickOutcome::Scanned(_)));
        assert_eq!(hl.registry().len(), 1);
    }

    #[test]
    fn test_category_write_always_refreshes() {
        let mut hl = highlighter();
        hl.update(0.0);
        assert_eq!(hl.renderer().created, 1);

        // Writing the current value still rebuilds, bypassing the interval
        hl.set_category_enabled(Category::Corpse, true, 0.1);
        assert_eq!(hl.renderer().created, 2);
        hl.set_category_color(Category::Corpse, Color::YELLOW, 0.2);
        assert_eq!(hl.renderer().created, 3);
        assert_eq!(hl.renderer().live, 1);
        assert_eq!(hl.registry().len(), 1);
    }

    #[test]
    fn test_shutdown_releases_everything() {
        let mut hl = highlighter();
        hl.update(0.0);
        hl.shutdown();
        assert!(!hl.is_enabled());
        assert_eq!(hl.renderer().live, 0);
    }
}
