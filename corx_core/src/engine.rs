//! Recommendation lookup over the association rule table.
//!
//! A rule matches a drug when its antecedent set contains the drug; the
//! lookup is a linear scan of the store. Two query modes share the scan:
//! - best match: the single rule with maximum support (prescription assistant)
//! - ranked list: every matching rule, support descending (inventory assistant)
//!
//! Both are pure functions of (drug, store): no side effects, no mutation.

use crate::{Recommendation, RecommendMode, RecommendationResult, Rule, RuleStore};
use std::cmp::Ordering;

/// Best matching rule for `drug`, or `None` when no rule applies.
///
/// Support ties resolve to the rule encountered first in store order.
pub fn recommend_best(drug: &str, store: &RuleStore) -> Option<Recommendation> {
    let mut best: Option<&Rule> = None;

    for rule in store.rules() {
        if !rule.applies_to(drug) {
            continue;
        }
        match best {
            // Strictly-greater keeps the earlier rule on ties
            Some(current) if rule.support <= current.support => {}
            _ => best = Some(rule),
        }
    }

    best.map(Recommendation::from_rule)
}

/// Every matching rule for `drug`, sorted by support descending.
///
/// The sort is stable: equal-support matches retain store order.
pub fn recommend_ranked(drug: &str, store: &RuleStore) -> Vec<Recommendation> {
    let mut matches: Vec<Recommendation> = store
        .rules()
        .iter()
        .filter(|rule| rule.applies_to(drug))
        .map(Recommendation::from_rule)
        .collect();

    matches.sort_by(|a, b| {
        b.support
            .partial_cmp(&a.support)
            .unwrap_or(Ordering::Equal)
    });

    matches
}

/// Run the lookup in the given mode and wrap the outcome for caching.
pub fn recommend(mode: RecommendMode, drug: &str, store: &RuleStore) -> RecommendationResult {
    match mode {
        RecommendMode::Best => match recommend_best(drug, store) {
            Some(rec) => RecommendationResult::Best(rec),
            None => RecommendationResult::None,
        },
        RecommendMode::Ranked => {
            let matches = recommend_ranked(drug, store);
            if matches.is_empty() {
                RecommendationResult::None
            } else {
                RecommendationResult::Ranked(matches)
            }
        }
    }
}
