//! Highlight registry: one live annotation per tracked object.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace, warn};

use crate::highlight::annotation::{AnnotationState, ObjectId};
use crate::highlight::classifier::Candidate;
use crate::highlight::settings::StatsSnapshot;
use crate::integration::{AnnotationRenderer, AnnotationSpec, AnnotationStyle};

/// Seconds an object may go unseen before its highlight is evicted.
pub const DEFAULT_STALE_THRESHOLD: f32 = 2.0;

/// What a single [`HighlightRegistry::reconcile`] pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    /// New annotations created
    pub created: usize,
    /// Already tracked, timestamp refreshed
    pub refreshed: usize,
    /// Tracked id reappeared on another object or as another category;
    /// annotation rebuilt
    pub replaced: usize,
    /// Tracked but missing from the candidates
    pub marked_for_eviction: usize,
    /// Render service refused to create the annotation
    pub failed: usize,
}

/// Keyed store of live annotations.
///
/// The registry is the only owner of render handles: every handle it gets from
/// [`AnnotationRenderer::create_annotation`] is handed back to
/// [`AnnotationRenderer::destroy_annotation`] exactly once, when the entry is
/// evicted or cleared. Dropping a registry that still tracks entries leaks
/// their visuals, so call [`clear_all`](Self::clear_all) first.
#[derive(Debug)]
pub struct HighlightRegistry<T, R> {
    entries: HashMap<ObjectId, AnnotationState<T, R>>,
    style: AnnotationStyle,
}

impl<T, R> Default for HighlightRegistry<T, R> {
    fn default() -> Self {
        Self::new(AnnotationStyle::default())
    }
}

impl<T, R> HighlightRegistry<T, R> {
    pub fn new(style: AnnotationStyle) -> Self {
        Self {
            entries: HashMap::new(),
            style,
        }
    }

    /// Fold one scan's candidates into the registry.
    ///
    /// Tracked candidates only get their timestamp refreshed; untracked ones
    /// get a new annotation. A tracked id that now names a different object or
    /// category has its annotation rebuilt. Every tracked object missing from
    /// `candidates` is marked for eviction on the next
    /// [`evict_stale`](Self::evict_stale).
    pub fn reconcile<A>(
        &mut self,
        candidates: &[Candidate<T>],
        now: f32,
        renderer: &mut A,
    ) -> ReconcileReport
    where
        A: AnnotationRenderer<Target = T, Handle = R>,
        T: Clone + PartialEq,
    {
        let mut report = ReconcileReport::default();
        let mut present = HashSet::with_capacity(candidates.len());

        for candidate in candidates {
            present.insert(candidate.id);

            if let Some(state) = self.entries.get_mut(&candidate.id) {
                if state.category == candidate.category && *state.target() == candidate.target {
                    state.refresh(now);
                    report.refreshed += 1;
                    continue;
                }

                debug!(
                    id = %candidate.id,
                    old = ?state.category,
                    new = ?candidate.category,
                    "identity reused by another object, rebuilding annotation"
                );
                self.destroy(candidate.id, renderer);
                report.replaced += 1;
            }

            let spec = AnnotationSpec {
                text: &candidate.label,
                color: candidate.color,
                style: &self.style,
            };

            match renderer.create_annotation(&candidate.target, &spec) {
                Ok(handle) => {
                    debug!(
                        id = %candidate.id,
                        category = ?candidate.category,
                        label = %candidate.label,
                        "highlight created"
                    );
                    self.entries.insert(
                        candidate.id,
                        AnnotationState::new(
                            candidate.id,
                            candidate.category,
                            candidate.label.clone(),
                            candidate.color,
                            candidate.target.clone(),
                            handle,
                            now,
                        ),
                    );
                    report.created += 1;
                }
                Err(err) => {
                    warn!(id = %candidate.id, error = %err, "failed to create annotation");
                    report.failed += 1;
                }
            }
        }

        for state in self.entries.values_mut() {
            if !present.contains(&state.id) {
                state.mark_evict();
                report.marked_for_eviction += 1;
            }
        }

        trace!(?report, tracked = self.entries.len(), "reconciled");
        report
    }

    /// Destroy every annotation marked for eviction or unseen for longer than
    /// `stale_threshold` seconds. Returns how many were removed.
    pub fn evict_stale<A>(&mut self, now: f32, stale_threshold: f32, renderer: &mut A) -> usize
    where
        A: AnnotationRenderer<Handle = R>,
    {
        let stale: Vec<ObjectId> = self
            .entries
            .values()
            .filter(|s| s.is_stale(now, stale_threshold))
            .map(|s| s.id)
            .collect();

        for id in &stale {
            self.destroy(*id, renderer);
        }
        stale.len()
    }

    /// Destroy every annotation and empty the registry. Returns how many were
    /// removed.
    pub fn clear_all<A>(&mut self, renderer: &mut A) -> usize
    where
        A: AnnotationRenderer<Handle = R>,
    {
        let count = self.entries.len();
        for (id, state) in self.entries.drain() {
            debug!(%id, "highlight cleared");
            renderer.destroy_annotation(state.into_handle());
        }
        count
    }

    /// Remove one entry and release its render handle. Untracked ids are a
    /// no-op and return `false`.
    pub fn destroy<A>(&mut self, id: ObjectId, renderer: &mut A) -> bool
    where
        A: AnnotationRenderer<Handle = R>,
    {
        match self.entries.remove(&id) {
            Some(state) => {
                debug!(%id, category = ?state.category, "highlight evicted");
                renderer.destroy_annotation(state.into_handle());
                true
            }
            None => {
                debug!(%id, "destroy of untracked highlight ignored");
                false
            }
        }
    }

    /// Number of tracked highlights.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `id` currently has a highlight.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Get the highlight tracked for `id`.
    pub fn get(&self, id: ObjectId) -> Option<&AnnotationState<T, R>> {
        self.entries.get(&id)
    }

    /// Iterate over tracked highlights in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &AnnotationState<T, R>> {
        self.entries.values()
    }

    /// Presentation constants handed to every new annotation.
    pub fn style(&self) -> &AnnotationStyle {
        &self.style
    }

    /// Count the tracked annotations per category.
    pub fn stats(&self) -> StatsSnapshot {
        StatsSnapshot::from_categories(self.entries.values().map(|s| s.category))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::highlight::{Category, Color, LastSeen};
    use crate::integration::Position;

    /// Renderer that hands out increasing handles and counts destroys per handle.
    #[derive(Default)]
    struct CountingRenderer {
        next: u32,
        created: Vec<(u32, String)>,
        destroyed: HashMap<u32, usize>,
        refuse: bool,
    }

    impl AnnotationRenderer for CountingRenderer {
        type Target = u64;
        type Handle = u32;
        type Error = &'static str;

        fn create_annotation(
            &mut self,
            _target: &u64,
            spec: &AnnotationSpec<'_>,
        ) -> Result<u32, &'static str> {
            if self.refuse {
                return Err("renderer offline");
            }
            self.next += 1;
            self.created.push((self.next, spec.text.to_string()));
            Ok(self.next)
        }

        fn destroy_annotation(&mut self, handle: u32) {
            *self.destroyed.entry(handle).or_default() += 1;
        }
    }

    fn candidate(id: u64, category: Category) -> Candidate<u64> {
        Candidate {
            id: ObjectId(id),
            category,
            label: format!("object {id}"),
            color: Color::WHITE,
            position: Position::origin(),
            target: id,
        }
    }

    fn candidate_on(id: u64, category: Category, target: u64) -> Candidate<u64> {
        Candidate {
            target,
            ..candidate(id, category)
        }
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut registry = HighlightRegistry::default();
        let mut renderer = CountingRenderer::default();
        let candidates = vec![candidate(1, Category::Item), candidate(2, Category::Corpse)];

        let first = registry.reconcile(&candidates, 1.0, &mut renderer);
        assert_eq!(first.created, 2);

        let second = registry.reconcile(&candidates, 1.0, &mut renderer);
        assert_eq!(second.created, 0);
        assert_eq!(second.refreshed, 2);

        assert_eq!(registry.len(), 2);
        assert_eq!(renderer.created.len(), 2);
        assert!(renderer.destroyed.is_empty());
    }

    #[test]
    fn test_missing_candidates_are_marked_and_evicted() {
        let mut registry = HighlightRegistry::default();
        let mut renderer = CountingRenderer::default();

        registry.reconcile(
            &[candidate(1, Category::Item), candidate(2, Category::Container)],
            1.0,
            &mut renderer,
        );
        let report = registry.reconcile(&[candidate(2, Category::Container)], 1.5, &mut renderer);
        assert_eq!(report.marked_for_eviction, 1);
        assert_eq!(registry.get(ObjectId(1)).unwrap().last_seen, LastSeen::Evict);

        // Marked entries go immediately, well inside the stale threshold
        let evicted = registry.evict_stale(1.5, DEFAULT_STALE_THRESHOLD, &mut renderer);
        assert_eq!(evicted, 1);
        assert!(!registry.contains(ObjectId(1)));
        assert!(registry.contains(ObjectId(2)));
        assert_eq!(renderer.destroyed.get(&1), Some(&1));
    }

    #[test]
    fn test_age_based_eviction() {
        let mut registry = HighlightRegistry::default();
        let mut renderer = CountingRenderer::default();

        registry.reconcile(&[candidate(1, Category::Corpse)], 1.0, &mut renderer);

        assert_eq!(registry.evict_stale(3.0, DEFAULT_STALE_THRESHOLD, &mut renderer), 0);
        assert_eq!(registry.evict_stale(3.1, DEFAULT_STALE_THRESHOLD, &mut renderer), 1);
        assert!(registry.is_empty());

        // Nothing left: evicting again never destroys twice
        assert_eq!(registry.evict_stale(10.0, DEFAULT_STALE_THRESHOLD, &mut renderer), 0);
        assert_eq!(renderer.destroyed.get(&1), Some(&1));
    }

    #[test]
    fn test_destroy_untracked_is_noop() {
        let mut registry: HighlightRegistry<u64, u32> = HighlightRegistry::default();
        let mut renderer = CountingRenderer::default();

        assert!(!registry.destroy(ObjectId(5), &mut renderer));
        assert!(renderer.destroyed.is_empty());
    }

    #[test]
    fn test_clear_all() {
        let mut registry = HighlightRegistry::default();
        let mut renderer = CountingRenderer::default();

        registry.reconcile(
            &[
                candidate(1, Category::Item),
                candidate(2, Category::Container),
                candidate(3, Category::Corpse),
            ],
            0.0,
            &mut renderer,
        );
        assert_eq!(registry.clear_all(&mut renderer), 3);
        assert!(registry.is_empty());
        assert_eq!(renderer.destroyed.len(), 3);
        assert!(renderer.destroyed.values().all(|&n| n == 1));
        assert_eq!(registry.stats(), StatsSnapshot::default());
    }

    #[test]
    fn test_reused_identity_rebuilds_annotation() {
        let mut registry = HighlightRegistry::default();
        let mut renderer = CountingRenderer::default();

        registry.reconcile(&[candidate(1, Category::Item)], 0.0, &mut renderer);
        let report = registry.reconcile(&[candidate(1, Category::Corpse)], 0.5, &mut renderer);

        assert_eq!(report.replaced, 1);
        assert_eq!(report.created, 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(ObjectId(1)).unwrap().category, Category::Corpse);
        assert_eq!(*registry.get(ObjectId(1)).unwrap().handle(), 2);
        assert_eq!(renderer.destroyed.get(&1), Some(&1));
    }

    #[test]
    fn test_reused_identity_same_category_rebuilds_annotation() {
        let mut registry = HighlightRegistry::default();
        let mut renderer = CountingRenderer::default();

        registry.reconcile(&[candidate_on(1, Category::Item, 10)], 0.0, &mut renderer);
        let report = registry.reconcile(&[candidate_on(1, Category::Item, 11)], 0.5, &mut renderer);

        assert_eq!(report.replaced, 1);
        assert_eq!(report.created, 1);
        assert_eq!(report.refreshed, 0);
        let state = registry.get(ObjectId(1)).unwrap();
        assert_eq!(*state.target(), 11);
        assert_eq!(*state.handle(), 2);
        assert_eq!(renderer.destroyed.get(&1), Some(&1));

        // Same object again: plain refresh
        let report = registry.reconcile(&[candidate_on(1, Category::Item, 11)], 1.0, &mut renderer);
        assert_eq!(report.refreshed, 1);
        assert_eq!(renderer.created.len(), 2);
    }

    #[test]
    fn test_failed_creation_is_not_tracked() {
        let mut registry = HighlightRegistry::default();
        let mut renderer = CountingRenderer {
            refuse: true,
            ..Default::default()
        };

        let report = registry.reconcile(&[candidate(1, Category::Item)], 0.0, &mut renderer);
        assert_eq!(report.failed, 1);
        assert!(registry.is_empty());

        // Retried on the next pass once the renderer is back
        renderer.refuse = false;
        let report = registry.reconcile(&[candidate(1, Category::Item)], 0.5, &mut renderer);
        assert_eq!(report.created, 1);
        assert!(registry.contains(ObjectId(1)));
    }

    #[test]
    fn test_stats() {
        let mut registry = HighlightRegistry::default();
        let mut renderer = CountingRenderer::default();

        registry.reconcile(
            &[
                candidate(1, Category::Item),
                candidate(2, Category::Item),
                candidate(3, Category::Container),
            ],
            0.0,
            &mut renderer,
        );
        let stats = registry.stats();
        assert_eq!(stats.total(), 3);
        assert_eq!(stats.count(Category::Item), 2);
        assert_eq!(stats.count(Category::Container), 1);
        assert_eq!(stats.count(Category::Corpse), 0);
    }
}
