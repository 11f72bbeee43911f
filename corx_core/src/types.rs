//! Core domain types for the Corx recommendation system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Association rules and the read-only rule store
//! - Prescription records and the drug catalog
//! - Recommendations and per-session lookup results
//! - Patient metadata for prescription export

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

// ============================================================================
// Rule Types
// ============================================================================

/// A single association rule over co-prescribed drugs.
///
/// Multiple rules may share an antecedent or consequent. `support` is the
/// fraction of records in which antecedent and consequent co-occur; it is
/// used purely as a ranking score.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Rule {
    pub antecedents: BTreeSet<String>,
    pub consequents: BTreeSet<String>,
    pub support: f64,
}

impl Rule {
    /// Whether this rule applies to `drug`.
    ///
    /// Membership test, not equality: the antecedent may be a multi-drug set.
    pub fn applies_to(&self, drug: &str) -> bool {
        self.antecedents.contains(drug)
    }
}

/// The ordered table of precomputed association rules.
///
/// Loaded once at startup and read-only for the process lifetime. Rule order
/// is the load order; ties in support resolve to the earlier rule.
#[derive(Clone, Debug)]
pub struct RuleStore {
    rules: Vec<Rule>,
}

impl RuleStore {
    pub(crate) fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ============================================================================
// Record and Catalog Types
// ============================================================================

/// One row of the historical prescription records table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PrescriptionRecord {
    pub npi: String,
    pub specialty: String,
    /// Drug names parsed from the comma-separated prescription-counts
    /// field: trimmed, empties dropped, record order preserved.
    pub drugs: Vec<String>,
}

/// Distinct drug names derived from the prescription records, plus the
/// typed record table for downstream display.
#[derive(Clone, Debug)]
pub struct DrugCatalog {
    pub records: Vec<PrescriptionRecord>,
    pub drugs: HashSet<String>,
}

impl DrugCatalog {
    pub fn contains(&self, drug: &str) -> bool {
        self.drugs.contains(drug)
    }

    /// Drug names sorted for display.
    ///
    /// The underlying set has no stable iteration order; only this sorted
    /// view may be shown to users.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.drugs.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// ============================================================================
// Recommendation Types
// ============================================================================

/// The consequent side of a selected rule.
#[derive(Clone, Debug, PartialEq)]
pub struct Recommendation {
    pub consequents: BTreeSet<String>,
    pub support: f64,
}

impl Recommendation {
    pub(crate) fn from_rule(rule: &Rule) -> Self {
        Self {
            consequents: rule.consequents.clone(),
            support: rule.support,
        }
    }

    /// First consequent in set order (lexicographic).
    ///
    /// The best-match display surfaces only this element, even for
    /// multi-drug consequents; the ranked display shows the full set.
    pub fn primary_consequent(&self) -> Option<&str> {
        self.consequents.iter().next().map(String::as_str)
    }

    /// Full consequent set joined into a display string.
    pub fn joined_consequents(&self) -> String {
        self.consequents
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Query mode for the recommendation engine.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendMode {
    /// Single best rule by support (prescription assistant).
    Best,
    /// Every matching rule, support descending (inventory assistant).
    Ranked,
}

/// Memoized per-drug lookup outcome within a session.
#[derive(Clone, Debug, PartialEq)]
pub enum RecommendationResult {
    /// No rule's antecedent contains the drug. A normal outcome, not an error.
    None,
    Best(Recommendation),
    Ranked(Vec<Recommendation>),
}

impl RecommendationResult {
    pub fn is_none(&self) -> bool {
        matches!(self, RecommendationResult::None)
    }
}

// ============================================================================
// Patient Metadata
// ============================================================================

/// Patient metadata captured by the prescription assistant.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Patient {
    pub full_name: String,
    pub email: String,
    pub telephone: String,
}

impl Patient {
    /// All fields must be non-blank before a prescription can be exported.
    pub fn validate(&self) -> Result<()> {
        if self.full_name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.telephone.trim().is_empty()
        {
            return Err(Error::Validation(
                "please fill in all patient information (name, email, telephone)".into(),
            ));
        }
        Ok(())
    }
}
