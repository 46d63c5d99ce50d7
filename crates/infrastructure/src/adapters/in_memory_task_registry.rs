//! In-memory analysis task registry - implements TaskStore
//!
//! Single-process registry behind a `parking_lot` RwLock. Insertion order is
//! tracked with a monotonic sequence so eviction can drop the oldest finished
//! records first. Pending tasks are never evicted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use application::ports::{AnalysisFailure, AnalysisState, AnalysisTask, TaskStore};
use domain::value_objects::AnalysisId;
use parking_lot::RwLock;
use tracing::{debug, warn};

/// Registry size that triggers eviction
const EVICTION_THRESHOLD: usize = 100;

/// Size the registry is trimmed down to when eviction runs
const EVICTION_TARGET: usize = 50;

/// Thread-safe in-memory task registry
#[derive(Debug, Default)]
pub struct InMemoryTaskRegistry {
    tasks: RwLock<HashMap<AnalysisId, (u64, AnalysisTask)>>,
    sequence: AtomicU64,
}

impl InMemoryTaskRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }
}

impl TaskStore for InMemoryTaskRegistry {
    fn insert(&self, task: AnalysisTask) {
        let sequence = self.next_sequence();
        self.tasks
            .write()
            .insert(task.id, (sequence, task));
    }

    fn get(&self, id: &AnalysisId) -> Option<AnalysisTask> {
        self.tasks.read().get(id).map(|(_, task)| task.clone())
    }

    fn complete(&self, id: &AnalysisId, model: domain::entities::ThreatModel) {
        let mut tasks = self.tasks.write();
        match tasks.get_mut(id) {
            Some((_, task)) => task.state = AnalysisState::Completed(Box::new(model)),
            None => warn!(analysis_id = %id, "Completion for unknown task"),
        }
    }

    fn fail(&self, id: &AnalysisId, failure: AnalysisFailure) {
        let mut tasks = self.tasks.write();
        match tasks.get_mut(id) {
            Some((_, task)) => task.state = AnalysisState::Failed(failure),
            None => warn!(analysis_id = %id, "Failure for unknown task"),
        }
    }

    fn evict_finished(&self) {
        let mut tasks = self.tasks.write();
        if tasks.len() <= EVICTION_THRESHOLD {
            return;
        }

        // Oldest finished first, by insertion sequence.
        let mut finished: Vec<(u64, AnalysisId)> = tasks
            .iter()
            .filter(|(_, (_, task))| task.state.is_finished())
            .map(|(id, (sequence, _))| (*sequence, *id))
            .collect();
        finished.sort_unstable_by_key(|(sequence, _)| *sequence);

        let mut removed = 0usize;
        for (_, id) in finished {
            if tasks.len() <= EVICTION_TARGET {
                break;
            }
            tasks.remove(&id);
            removed += 1;
        }

        debug!(removed, remaining = tasks.len(), "Evicted finished tasks");
    }

    fn len(&self) -> usize {
        self.tasks.read().len()
    }

    fn is_empty(&self) -> bool {
        self.tasks.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use domain::entities::{Architecture, ThreatModel};

    use super::*;

    fn model() -> ThreatModel {
        ThreatModel::build("App", "desc", Architecture::default(), Vec::new())
    }

    fn insert_pending(registry: &InMemoryTaskRegistry) -> AnalysisId {
        let id = AnalysisId::new();
        registry.insert(AnalysisTask::pending(id));
        id
    }

    fn insert_finished(registry: &InMemoryTaskRegistry) -> AnalysisId {
        let id = insert_pending(registry);
        registry.complete(&id, model());
        id
    }

    #[test]
    fn insert_then_get_roundtrips() {
        let registry = InMemoryTaskRegistry::new();
        let id = insert_pending(&registry);

        let task = registry.get(&id).unwrap();
        assert_eq!(task.id, id);
        assert_eq!(task.state, AnalysisState::Pending);
        assert!(registry.get(&AnalysisId::new()).is_none());
    }

    #[test]
    fn complete_transitions_state() {
        let registry = InMemoryTaskRegistry::new();
        let id = insert_pending(&registry);
        registry.complete(&id, model());

        match registry.get(&id).unwrap().state {
            AnalysisState::Completed(result) => assert_eq!(result.application.name, "App"),
            other => panic!("expected completed, got {other:?}"),
        }
    }

    #[test]
    fn fail_records_the_failure() {
        let registry = InMemoryTaskRegistry::new();
        let id = insert_pending(&registry);
        registry.fail(&id, AnalysisFailure::message("boom"));

        match registry.get(&id).unwrap().state {
            AnalysisState::Failed(failure) => assert_eq!(failure.message, "boom"),
            other => panic!("expected failed, got {other:?}"),
        }
    }

    #[test]
    fn updates_for_unknown_ids_are_ignored() {
        let registry = InMemoryTaskRegistry::new();
        registry.complete(&AnalysisId::new(), model());
        registry.fail(&AnalysisId::new(), AnalysisFailure::message("boom"));
        assert!(registry.is_empty());
    }

    #[test]
    fn eviction_is_a_noop_below_the_threshold() {
        let registry = InMemoryTaskRegistry::new();
        for _ in 0..EVICTION_THRESHOLD {
            insert_finished(&registry);
        }
        registry.evict_finished();
        assert_eq!(registry.len(), EVICTION_THRESHOLD);
    }

    #[test]
    fn eviction_trims_to_the_target() {
        let registry = InMemoryTaskRegistry::new();
        for _ in 0..(EVICTION_THRESHOLD + 1) {
            insert_finished(&registry);
        }
        registry.evict_finished();
        assert_eq!(registry.len(), EVICTION_TARGET);
    }

    #[test]
    fn eviction_drops_the_oldest_finished_first() {
        let registry = InMemoryTaskRegistry::new();
        let oldest = insert_finished(&registry);
        for _ in 0..EVICTION_THRESHOLD {
            insert_finished(&registry);
        }
        let newest = insert_finished(&registry);

        registry.evict_finished();
        assert!(registry.get(&oldest).is_none());
        assert!(registry.get(&newest).is_some());
    }

    #[test]
    fn pending_tasks_survive_eviction() {
        let registry = InMemoryTaskRegistry::new();
        let mut pending = Vec::new();
        for _ in 0..60 {
            pending.push(insert_pending(&registry));
        }
        for _ in 0..60 {
            insert_finished(&registry);
        }

        registry.evict_finished();
        for id in &pending {
            assert!(registry.get(id).is_some());
        }
        // 120 total, 60 finished; trimming stops at the target.
        assert_eq!(registry.len(), 60);
    }

    #[test]
    fn all_pending_registry_never_shrinks() {
        let registry = InMemoryTaskRegistry::new();
        for _ in 0..(EVICTION_THRESHOLD + 20) {
            insert_pending(&registry);
        }
        registry.evict_finished();
        assert_eq!(registry.len(), EVICTION_THRESHOLD + 20);
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        use std::sync::Arc;

        let registry = Arc::new(InMemoryTaskRegistry::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    let id = AnalysisId::new();
                    registry.insert(AnalysisTask::pending(id));
                    registry.complete(&id, model());
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.len(), 400);
    }
}
