//! Catalog-backed document selector

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::CorpusError;
use plateau_domain::traits::DocumentSelector;
use plateau_domain::{Document, SelectionConstraints, SelectionStrategy};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::cmp::Ordering;
use tracing::debug;

const MIXED_SCORE_WEIGHT: f64 = 0.6;
const MIXED_SECONDARY_WEIGHT: f64 = 0.4;

/// Orders catalog candidates by one of the selection strategies
///
/// Every strategy yields a total order: ties fall back to the candidate id,
/// so the same catalog and constraints always produce the same list.
#[derive(Debug, Clone)]
pub struct CatalogSelector {
    catalog: Catalog,
}

impl CatalogSelector {
    /// Create a selector over a catalog
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// The underlying catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn pool(&self, constraints: &SelectionConstraints) -> Vec<&CatalogEntry> {
        self.catalog
            .entries
            .iter()
            .filter(|e| constraints.include_obsolete || !e.obsolete)
            .filter(|e| constraints.min_score.map_or(true, |min| e.score >= min))
            .collect()
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

fn validate(constraints: &SelectionConstraints) -> Result<(), CorpusError> {
    if constraints.max_documents == 0 {
        return Err(CorpusError::InvalidSelection(
            "max_documents must be greater than 0".to_string(),
        ));
    }
    if let Some(min) = constraints.min_score {
        if !min.is_finite() {
            return Err(CorpusError::InvalidSelection(format!(
                "min_score must be finite, got {}",
                min
            )));
        }
    }
    Ok(())
}

impl DocumentSelector for CatalogSelector {
    type Error = CorpusError;

    fn select(
        &self,
        strategy: SelectionStrategy,
        constraints: &SelectionConstraints,
    ) -> Result<Vec<Document>, Self::Error> {
        validate(constraints)?;

        let mut pool = self.pool(constraints);
        pool.sort_by(|a, b| a.id.cmp(&b.id));

        let ranked: Vec<(f64, &CatalogEntry)> = match strategy {
            SelectionStrategy::ByScore => {
                let mut ranked: Vec<_> = pool.into_iter().map(|e| (e.score, e)).collect();
                ranked.sort_by(|(_, a), (_, b)| {
                    descending(a.score, b.score)
                        .then_with(|| descending(a.secondary_metric, b.secondary_metric))
                        .then_with(|| a.id.cmp(&b.id))
                });
                ranked
            }
            SelectionStrategy::BySecondaryMetric => {
                let mut ranked: Vec<_> = pool.into_iter().map(|e| (e.secondary_metric, e)).collect();
                ranked.sort_by(|(ka, a), (kb, b)| descending(*ka, *kb).then_with(|| a.id.cmp(&b.id)));
                ranked
            }
            SelectionStrategy::Mixed => {
                let max_secondary = pool
                    .iter()
                    .map(|e| e.secondary_metric)
                    .fold(0.0_f64, f64::max);
                let mut ranked: Vec<_> = pool
                    .into_iter()
                    .map(|e| {
                        let normalized = if max_secondary > 0.0 {
                            e.secondary_metric / max_secondary
                        } else {
                            0.0
                        };
                        (MIXED_SCORE_WEIGHT * e.score + MIXED_SECONDARY_WEIGHT * normalized, e)
                    })
                    .collect();
                ranked.sort_by(|(ka, a), (kb, b)| descending(*ka, *kb).then_with(|| a.id.cmp(&b.id)));
                ranked
            }
            SelectionStrategy::Random => {
                let mut rng = StdRng::seed_from_u64(constraints.seed);
                pool.shuffle(&mut rng);
                pool.into_iter().map(|e| (e.score, e)).collect()
            }
            SelectionStrategy::Recent => {
                let mut ranked: Vec<_> = pool.into_iter().map(|e| (e.added_at as f64, e)).collect();
                ranked.sort_by(|(_, a), (_, b)| {
                    b.added_at.cmp(&a.added_at).then_with(|| a.id.cmp(&b.id))
                });
                ranked
            }
        };

        let documents: Vec<Document> = ranked
            .into_iter()
            .take(constraints.max_documents)
            .map(|(significance, entry)| entry.to_document(significance))
            .collect();

        debug!(
            strategy = strategy.as_str(),
            candidates = self.catalog.len(),
            selected = documents.len(),
            "selected documents"
        );
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            CatalogEntry::new("b", "/w/b.txt", 0.8).with_secondary_metric(10.0).with_added_at(300),
            CatalogEntry::new("a", "/w/a.txt", 0.8).with_secondary_metric(40.0).with_added_at(100),
            CatalogEntry::new("c", "/w/c.txt", 0.2).with_secondary_metric(40.0).with_added_at(300),
            CatalogEntry::new("d", "/w/d.txt", 0.9).obsolete(),
        ])
    }

    fn ids(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.id.as_str()).collect()
    }

    fn select(strategy: SelectionStrategy, constraints: &SelectionConstraints) -> Vec<Document> {
        CatalogSelector::new(catalog()).select(strategy, constraints).unwrap()
    }

    #[test]
    fn test_by_score_breaks_ties_by_secondary_metric() {
        let docs = select(SelectionStrategy::ByScore, &SelectionConstraints::default());
        assert_eq!(ids(&docs), vec!["a", "b", "c"]);
        assert_eq!(docs[0].significance, 0.8);
    }

    #[test]
    fn test_by_secondary_metric_breaks_ties_by_id() {
        let docs = select(SelectionStrategy::BySecondaryMetric, &SelectionConstraints::default());
        assert_eq!(ids(&docs), vec!["a", "c", "b"]);
        assert_eq!(docs[0].significance, 40.0);
    }

    #[test]
    fn test_mixed() {
        // a: 0.48 + 0.4, b: 0.48 + 0.1, c: 0.12 + 0.4
        let docs = select(SelectionStrategy::Mixed, &SelectionConstraints::default());
        assert_eq!(ids(&docs), vec!["a", "b", "c"]);
        assert!((docs[0].significance - 0.88).abs() < 1e-12);
    }

    #[test]
    fn test_recent() {
        let docs = select(SelectionStrategy::Recent, &SelectionConstraints::default());
        assert_eq!(ids(&docs), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_random_is_reproducible_for_a_seed() {
        let constraints = SelectionConstraints { seed: 42, ..Default::default() };
        let first = select(SelectionStrategy::Random, &constraints);
        let second = select(SelectionStrategy::Random, &constraints);
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_obsolete_and_min_score_filters() {
        let constraints = SelectionConstraints {
            include_obsolete: true,
            min_score: Some(0.5),
            ..Default::default()
        };
        let docs = select(SelectionStrategy::ByScore, &constraints);
        assert_eq!(ids(&docs), vec!["d", "a", "b"]);
    }

    #[test]
    fn test_max_documents() {
        let constraints = SelectionConstraints { max_documents: 2, ..Default::default() };
        assert_eq!(select(SelectionStrategy::ByScore, &constraints).len(), 2);

        let constraints = SelectionConstraints { max_documents: 0, ..Default::default() };
        let err = CatalogSelector::new(catalog())
            .select(SelectionStrategy::ByScore, &constraints)
            .unwrap_err();
        assert!(matches!(err, CorpusError::InvalidSelection(_)));
    }

    #[test]
    fn test_empty_catalog() {
        let docs = CatalogSelector::new(Catalog::default())
            .select(SelectionStrategy::Mixed, &SelectionConstraints::default())
            .unwrap();
        assert!(docs.is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_entries() -> impl Strategy<Value = Vec<CatalogEntry>> {
        prop::collection::btree_map("[a-z]{1,3}", (0u8..4, 0u8..4, 0u64..3, any::<bool>()), 0..12)
            .prop_map(|entries| {
                entries
                    .into_iter()
                    .map(|(id, (score, secondary, added_at, obsolete))| {
                        let mut entry = CatalogEntry::new(id.clone(), format!("/w/{}.txt", id), score as f64)
                            .with_secondary_metric(secondary as f64)
                            .with_added_at(added_at);
                        entry.obsolete = obsolete;
                        entry
                    })
                    .collect()
            })
    }

    proptest! {
        /// Property: candidate order in the catalog never affects the selection
        #[test]
        fn test_selection_ignores_catalog_order(entries in arb_entries(), seed in any::<u64>()) {
            let mut reversed = entries.clone();
            reversed.reverse();
            let constraints = SelectionConstraints { seed, ..Default::default() };

            for strategy in SelectionStrategy::ALL {
                let forward = CatalogSelector::new(Catalog::new(entries.clone()))
                    .select(strategy, &constraints)
                    .unwrap();
                let backward = CatalogSelector::new(Catalog::new(reversed.clone()))
                    .select(strategy, &constraints)
                    .unwrap();
                prop_assert_eq!(forward, backward);
            }
        }
    }
}
