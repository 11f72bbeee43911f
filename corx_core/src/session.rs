//! Per-session list state and memoized recommendations.
//!
//! A session owns the ordered drug list of one interactive user (the
//! prescription list or the inventory list) together with a cache of
//! computed recommendations. The lifecycle is Empty -> Populated ->
//! (Populated | Empty); the session is created at interaction start,
//! passed by handle into every operation, and dropped at session end.
//!
//! Cache invariant: the recommendation for a drug name is computed at most
//! once per session against the (immutable) rule store. A second lookup, or
//! a second occurrence of the name in the list, reuses the cached result
//! unchanged.

use crate::{engine, Error, RecommendMode, RecommendationResult, Result, RuleStore};
use std::collections::HashMap;
use uuid::Uuid;

/// One user's interactive list plus recommendation cache.
pub struct Session {
    id: Uuid,
    mode: RecommendMode,
    entries: Vec<String>,
    cache: HashMap<String, RecommendationResult>,
    /// First-lookup order of cached names, for stable display
    cache_order: Vec<String>,
}

impl Session {
    pub fn new(mode: RecommendMode) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!("Started {:?} session {}", mode, id);
        Self {
            id,
            mode,
            entries: Vec::new(),
            cache: HashMap::new(),
            cache_order: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> RecommendMode {
        self.mode
    }

    /// List entries in insertion order. Duplicates are permitted.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a drug to the list.
    ///
    /// Fails with a validation error on an empty selection; the list is
    /// left unchanged in that case.
    pub fn add(&mut self, drug: &str, store: &RuleStore) -> Result<()> {
        let drug = drug.trim();
        if drug.is_empty() {
            return Err(Error::Validation("no drug selected".into()));
        }

        self.entries.push(drug.to_string());
        self.ensure_cached(drug, store);
        Ok(())
    }

    /// Append an accepted companion drug. Same semantics as [`Session::add`].
    pub fn accept(&mut self, recommended: &str, store: &RuleStore) -> Result<()> {
        self.add(recommended, store)
    }

    /// Append `alternative` as a substitute suggestion for `original`.
    ///
    /// The original entry stays in the list; a change is an append, not a
    /// replacement.
    pub fn change(&mut self, original: &str, alternative: &str, store: &RuleStore) -> Result<()> {
        self.add(alternative, store)?;
        tracing::info!(
            session = %self.id,
            "Recorded alternative {:?} for {:?}",
            alternative,
            original
        );
        Ok(())
    }

    /// Remove the first occurrence of `drug` from the list.
    ///
    /// Returns `false` when the drug is not present; the list is unchanged
    /// and the miss is logged as a warning, not an error.
    pub fn remove(&mut self, drug: &str) -> bool {
        match self.entries.iter().position(|entry| entry == drug) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => {
                tracing::warn!(session = %self.id, "Cannot remove {:?}: not in list", drug);
                false
            }
        }
    }

    /// Cache-on-first-use recommendation lookup.
    ///
    /// The first call for a name scans the store once; every later call
    /// returns a reference to the same cached object without rescanning.
    pub fn recommendation_for(&mut self, drug: &str, store: &RuleStore) -> &RecommendationResult {
        self.ensure_cached(drug, store);
        &self.cache[drug]
    }

    /// Cached result for a name, if a lookup already ran this session.
    pub fn cached(&self, drug: &str) -> Option<&RecommendationResult> {
        self.cache.get(drug)
    }

    /// Cached (drug, result) pairs in first-lookup order.
    ///
    /// Removal from the list does not evict cache entries, so a removed
    /// drug still shows its recommendation here.
    pub fn recommendations(&self) -> impl Iterator<Item = (&str, &RecommendationResult)> + '_ {
        self.cache_order
            .iter()
            .filter_map(|drug| self.cache.get(drug).map(|result| (drug.as_str(), result)))
    }

    fn ensure_cached(&mut self, drug: &str, store: &RuleStore) {
        if self.cache.contains_key(drug) {
            return;
        }

        let result = engine::recommend(self.mode, drug, store);
        if result.is_none() {
            tracing::debug!(session = %self.id, "No recommendation found for {:?}", drug);
        }
        self.cache_order.push(drug.to_string());
        self.cache.insert(drug.to_string(), result);
    }
}
