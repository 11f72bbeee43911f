//! Association rule table loading.
//!
//! Rules are mined upstream from historical co-prescription data and shipped
//! as a JSON array of antecedent/consequent/support triples. The table is
//! loaded once, validated, and never mutated afterwards.

use crate::{Error, Result, Rule, RuleStore};
use once_cell::sync::OnceCell;
use std::path::Path;

/// Process-wide rule store, initialized exactly once
static SHARED_STORE: OnceCell<RuleStore> = OnceCell::new();

impl RuleStore {
    /// Load and validate the rule table from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Load(format!("cannot read rules file {:?}: {}", path, e)))?;
        let rules: Vec<Rule> = serde_json::from_str(&contents)
            .map_err(|e| Error::Load(format!("malformed rules file {:?}: {}", path, e)))?;

        let store = Self::from_rules(rules)?;
        tracing::info!("Loaded {} association rules from {:?}", store.len(), path);
        Ok(store)
    }

    /// Build a validated store from an in-memory rule list.
    ///
    /// The list order is preserved and meaningful: support ties resolve to
    /// the earlier rule.
    pub fn from_rules(rules: Vec<Rule>) -> Result<Self> {
        if rules.is_empty() {
            return Err(Error::Load("rule table is empty".into()));
        }

        for (idx, rule) in rules.iter().enumerate() {
            if rule.antecedents.is_empty() {
                return Err(Error::Load(format!("rule {} has no antecedents", idx)));
            }
            if rule.consequents.is_empty() {
                return Err(Error::Load(format!("rule {} has no consequents", idx)));
            }
            if !rule.support.is_finite() || rule.support <= 0.0 || rule.support > 1.0 {
                return Err(Error::Load(format!(
                    "rule {} has support {} outside (0, 1]",
                    idx, rule.support
                )));
            }
        }

        Ok(Self::new(rules))
    }

    /// Shared process-wide store, loaded on first call.
    ///
    /// Safe to call from any number of concurrent sessions: initialization
    /// runs at most once and the store is read-only thereafter. The path of
    /// the first successful call wins; later calls return the same store.
    pub fn shared(path: &Path) -> Result<&'static RuleStore> {
        SHARED_STORE.get_or_try_init(|| Self::load(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn drugs(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_load_valid_rules_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("rules.json");
        std::fs::write(
            &path,
            r#"[
                {"antecedents": ["AMLODIPINE BESYLATE"], "consequents": ["LISINOPRIL"], "support": 0.8},
                {"antecedents": ["METFORMIN HCL", "GLIPIZIDE"], "consequents": ["SIMVASTATIN"], "support": 0.5}
            ]"#,
        )
        .unwrap();

        let store = RuleStore::load(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.rules()[0].applies_to("AMLODIPINE BESYLATE"));
        assert!(store.rules()[1].applies_to("GLIPIZIDE"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let result = RuleStore::load(&path);
        assert!(matches!(result, Err(Error::Load(_))));
    }

    #[test]
    fn test_load_malformed_json_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("rules.json");
        std::fs::write(&path, "{ not a rule table }").unwrap();

        let result = RuleStore::load(&path);
        assert!(matches!(result, Err(Error::Load(_))));
    }

    #[test]
    fn test_empty_table_fails() {
        let result = RuleStore::from_rules(vec![]);
        assert!(matches!(result, Err(Error::Load(_))));
    }

    #[test]
    fn test_support_out_of_range_fails() {
        for support in [0.0, -0.1, 1.5, f64::NAN] {
            let result = RuleStore::from_rules(vec![Rule {
                antecedents: drugs(&["A"]),
                consequents: drugs(&["B"]),
                support,
            }]);
            assert!(result.is_err(), "support {} should be rejected", support);
        }
    }

    #[test]
    fn test_empty_antecedents_fail() {
        let result = RuleStore::from_rules(vec![Rule {
            antecedents: BTreeSet::new(),
            consequents: drugs(&["B"]),
            support: 0.5,
        }]);
        assert!(matches!(result, Err(Error::Load(_))));
    }

    #[test]
    fn test_load_preserves_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("rules.json");
        std::fs::write(
            &path,
            r#"[
                {"antecedents": ["A"], "consequents": ["B"], "support": 0.4},
                {"antecedents": ["A"], "consequents": ["C"], "support": 0.4}
            ]"#,
        )
        .unwrap();

        let store = RuleStore::load(&path).unwrap();
        assert_eq!(store.rules()[0].consequents, drugs(&["B"]));
        assert_eq!(store.rules()[1].consequents, drugs(&["C"]));
    }
}
