//! STRIDE coordination across the six category analyzers
//!
//! Sequential mode walks the categories in canonical order and is fully
//! deterministic. Parallel mode fans the analyzers out on a `JoinSet`
//! bounded by a semaphore and collects in completion order, so positional
//! threat ids are nondeterministic across runs; the threat SET is not.

use std::{fmt, sync::Arc};

use domain::entities::{Architecture, Threat};
use domain::value_objects::{StrideCategory, ThreatId};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

use crate::ports::CompletionPort;
use crate::services::category_analyzer::CategoryAnalyzer;

/// Default bound on in-flight category completions in parallel mode
pub const DEFAULT_MAX_CONCURRENCY: usize = 3;

/// Coordinator owning one analyzer per STRIDE category
pub struct StrideCoordinator {
    completion: Arc<dyn CompletionPort>,
    max_concurrency: usize,
}

impl fmt::Debug for StrideCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrideCoordinator")
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}

impl StrideCoordinator {
    pub fn new(completion: Arc<dyn CompletionPort>) -> Self {
        Self {
            completion,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Set the parallel-mode concurrency bound (minimum 1)
    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    fn analyzer(&self, category: StrideCategory) -> CategoryAnalyzer {
        CategoryAnalyzer::new(category, Arc::clone(&self.completion))
    }

    /// Run all six analyzers and assign positional ids to threats that
    /// arrived without one
    #[instrument(skip(self, architecture), fields(parallel))]
    pub async fn analyze(
        &self,
        architecture: &Architecture,
        model: Option<&str>,
        parallel: bool,
    ) -> Vec<Threat> {
        let mut threats = if parallel {
            self.analyze_parallel(architecture, model).await
        } else {
            self.analyze_sequential(architecture, model).await
        };

        assign_threat_ids(&mut threats);

        info!(count = threats.len(), parallel, "STRIDE analysis finished");

        threats
    }

    /// Canonical-order sequential analysis: deterministic given
    /// deterministic analyzer outputs
    async fn analyze_sequential(
        &self,
        architecture: &Architecture,
        model: Option<&str>,
    ) -> Vec<Threat> {
        let mut all = Vec::new();
        for category in StrideCategory::ALL {
            let found = self.analyzer(category).analyze(architecture, model).await;
            all.extend(found);
        }
        all
    }

    /// Bounded fan-out, collected in completion order
    async fn analyze_parallel(
        &self,
        architecture: &Architecture,
        model: Option<&str>,
    ) -> Vec<Threat> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let architecture = Arc::new(architecture.clone());
        let model = model.map(str::to_string);

        let mut set = JoinSet::new();
        for category in StrideCategory::ALL {
            let analyzer = self.analyzer(category);
            let semaphore = Arc::clone(&semaphore);
            let architecture = Arc::clone(&architecture);
            let model = model.clone();
            set.spawn(async move {
                // Closing the semaphore is not part of this design; a failed
                // acquire still runs the analyzer rather than dropping it.
                let _permit = semaphore.acquire().await;
                analyzer.analyze(&architecture, model.as_deref()).await
            });
        }

        let mut all = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(found) => all.extend(found),
                Err(e) => warn!(error = %e, "Category analysis task did not finish"),
            }
        }
        all
    }
}

/// Stamp `threat-<n>` (1-based over the final order) on each threat that
/// carries no id; supplied ids are never overwritten and never deduplicated
fn assign_threat_ids(threats: &mut [Threat]) {
    for (index, threat) in threats.iter_mut().enumerate() {
        threat.ensure_id(ThreatId::positional(index + 1));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::ports::{CompletionCall, MockCompletionPort};

    /// Mock port answering each category's call with one named threat,
    /// keyed off the category label present in the prompt
    fn port_with_one_threat_per_category() -> MockCompletionPort {
        let mut mock = MockCompletionPort::new();
        mock.expect_complete().returning(|call: CompletionCall| {
            let category = StrideCategory::ALL
                .iter()
                .find(|c| call.prompt.contains(&format!("{} threats", c.label())))
                .map_or("unknown", |c| c.label());
            Ok(format!(r#"[{{"name": "{category} threat"}}]"#))
        });
        mock
    }

    #[tokio::test]
    async fn sequential_mode_is_canonical_order_with_positional_ids() {
        let coordinator = StrideCoordinator::new(Arc::new(port_with_one_threat_per_category()));
        let threats = coordinator
            .analyze(&Architecture::default(), None, false)
            .await;

        assert_eq!(threats.len(), 6);
        let names: Vec<&str> = threats.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Spoofing threat",
                "Tampering threat",
                "Repudiation threat",
                "Information Disclosure threat",
                "Denial of Service threat",
                "Elevation of Privilege threat"
            ]
        );
        for (i, threat) in threats.iter().enumerate() {
            assert_eq!(
                threat.id.as_ref().unwrap().as_str(),
                format!("threat-{}", i + 1)
            );
        }
    }

    #[tokio::test]
    async fn sequential_mode_is_deterministic_across_runs() {
        let first = StrideCoordinator::new(Arc::new(port_with_one_threat_per_category()))
            .analyze(&Architecture::default(), None, false)
            .await;
        let second = StrideCoordinator::new(Arc::new(port_with_one_threat_per_category()))
            .analyze(&Architecture::default(), None, false)
            .await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn parallel_mode_matches_sequential_set() {
        let sequential = StrideCoordinator::new(Arc::new(port_with_one_threat_per_category()))
            .analyze(&Architecture::default(), None, false)
            .await;
        let parallel = StrideCoordinator::new(Arc::new(port_with_one_threat_per_category()))
            .analyze(&Architecture::default(), None, true)
            .await;

        let sequential_names: HashSet<String> =
            sequential.into_iter().map(|t| t.name).collect();
        let parallel_names: HashSet<String> = parallel.into_iter().map(|t| t.name).collect();
        assert_eq!(sequential_names, parallel_names);
    }

    #[tokio::test]
    async fn parallel_mode_stamps_every_category() {
        let coordinator = StrideCoordinator::new(Arc::new(port_with_one_threat_per_category()));
        let threats = coordinator
            .analyze(&Architecture::default(), None, true)
            .await;

        let categories: HashSet<&str> = threats
            .iter()
            .filter_map(|t| t.category.as_deref())
            .collect();
        assert_eq!(categories.len(), 6);
        assert!(categories.contains("Information Disclosure"));
    }

    #[tokio::test]
    async fn parallel_mode_assigns_ids_over_collection_order() {
        let coordinator = StrideCoordinator::new(Arc::new(port_with_one_threat_per_category()));
        let threats = coordinator
            .analyze(&Architecture::default(), None, true)
            .await;

        let ids: HashSet<String> = threats
            .iter()
            .map(|t| t.id.as_ref().unwrap().to_string())
            .collect();
        let expected: HashSet<String> = (1..=6).map(|n| format!("threat-{n}")).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn one_failing_category_does_not_abort_the_rest() {
        let mut mock = MockCompletionPort::new();
        mock.expect_complete().returning(|call: CompletionCall| {
            if call.prompt.contains("Tampering threats") {
                Err(crate::error::ApplicationError::Completion(
                    "backend down".to_string(),
                ))
            } else {
                Ok(r#"[{"name": "found"}]"#.to_string())
            }
        });

        let coordinator = StrideCoordinator::new(Arc::new(mock));
        let threats = coordinator
            .analyze(&Architecture::default(), None, false)
            .await;

        assert_eq!(threats.len(), 5);
        assert!(
            !threats
                .iter()
                .any(|t| t.category.as_deref() == Some("Tampering"))
        );
    }

    #[tokio::test]
    async fn supplied_ids_survive_assignment() {
        let mut mock = MockCompletionPort::new();
        mock.expect_complete().returning(|call: CompletionCall| {
            if call.prompt.contains("Spoofing threats") {
                Ok(r#"[{"id": "llm-chose-this", "name": "spoof"}]"#.to_string())
            } else {
                Ok(r#"[{"name": "anonymous"}]"#.to_string())
            }
        });

        let coordinator = StrideCoordinator::new(Arc::new(mock));
        let threats = coordinator
            .analyze(&Architecture::default(), None, false)
            .await;

        assert_eq!(threats[0].id.as_ref().unwrap().as_str(), "llm-chose-this");
        // Positional ids still reflect list position, so the second threat
        // gets threat-2, not threat-1.
        assert_eq!(threats[1].id.as_ref().unwrap().as_str(), "threat-2");
    }

    #[tokio::test]
    async fn semaphore_bounds_in_flight_analyzers() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct CountingPort {
            current: AtomicUsize,
            peak: AtomicUsize,
        }

        #[async_trait::async_trait]
        impl CompletionPort for CountingPort {
            async fn complete(
                &self,
                _call: CompletionCall,
            ) -> Result<String, crate::error::ApplicationError> {
                let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                self.current.fetch_sub(1, Ordering::SeqCst);
                Ok("[]".to_string())
            }
        }

        let port = Arc::new(CountingPort {
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let coordinator =
            StrideCoordinator::new(Arc::clone(&port) as Arc<dyn CompletionPort>)
                .with_max_concurrency(2);
        coordinator
            .analyze(&Architecture::default(), None, true)
            .await;

        assert!(port.peak.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn assign_ids_is_one_based() {
        let mut threats = vec![Threat::named("a"), Threat::named("b")];
        assign_threat_ids(&mut threats);
        assert_eq!(threats[0].id.as_ref().unwrap().as_str(), "threat-1");
        assert_eq!(threats[1].id.as_ref().unwrap().as_str(), "threat-2");
    }

    #[test]
    fn concurrency_bound_has_a_floor_of_one() {
        let coordinator =
            StrideCoordinator::new(Arc::new(MockCompletionPort::new())).with_max_concurrency(0);
        assert_eq!(coordinator.max_concurrency, 1);
    }
}
