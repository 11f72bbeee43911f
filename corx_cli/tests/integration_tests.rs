//! Integration tests for the corx binary.
//!
//! These tests verify end-to-end behavior including:
//! - One-shot recommendation lookups
//! - Catalog listing
//! - The interactive session loops, driven through stdin
//! - Startup failures on missing or malformed source data

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("corx"))
}

/// Write rule and record fixtures, returning (rules, records) paths
fn write_fixtures(dir: &Path) -> (PathBuf, PathBuf) {
    let rules = dir.join("rules.json");
    fs::write(
        &rules,
        r#"[
            {"antecedents": ["AMLODIPINE BESYLATE"], "consequents": ["LISINOPRIL"], "support": 0.8},
            {"antecedents": ["AMLODIPINE BESYLATE"], "consequents": ["ATORVASTATIN CALCIUM"], "support": 0.9},
            {"antecedents": ["METFORMIN HCL", "GLIPIZIDE"], "consequents": ["SIMVASTATIN"], "support": 0.5}
        ]"#,
    )
    .expect("Failed to write rules fixture");

    let records = dir.join("records.csv");
    fs::write(
        &records,
        "npi,specialty,cms_prescription_counts\n\
         1003000126,Internal Medicine,\"AMLODIPINE BESYLATE, LISINOPRIL, ATORVASTATIN CALCIUM\"\n\
         1003000142,Family Practice,\"METFORMIN HCL, GLIPIZIDE, SIMVASTATIN\"\n",
    )
    .expect("Failed to write records fixture");

    (rules, records)
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Co-prescription recommendation assistant",
        ));
}

#[test]
fn test_recommend_best_match() {
    let temp_dir = setup_test_dir();
    let (rules, records) = write_fixtures(temp_dir.path());

    cli()
        .args(["recommend", "AMLODIPINE BESYLATE"])
        .arg("--rules")
        .arg(&rules)
        .arg("--records")
        .arg(&records)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "AMLODIPINE BESYLATE -> ATORVASTATIN CALCIUM (Support: 0.90)",
        ));
}

#[test]
fn test_recommend_ranked_order() {
    let temp_dir = setup_test_dir();
    let (rules, records) = write_fixtures(temp_dir.path());

    let output = cli()
        .args(["recommend", "AMLODIPINE BESYLATE", "--ranked"])
        .arg("--rules")
        .arg(&rules)
        .arg("--records")
        .arg(&records)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8_lossy(&output);
    let atorvastatin = stdout.find("ATORVASTATIN CALCIUM (Support: 0.90)");
    let lisinopril = stdout.find("LISINOPRIL (Support: 0.80)");
    assert!(atorvastatin.is_some());
    assert!(lisinopril.is_some());
    assert!(atorvastatin < lisinopril, "Ranking must be support-descending");
}

#[test]
fn test_recommend_membership_in_multi_drug_antecedent() {
    let temp_dir = setup_test_dir();
    let (rules, records) = write_fixtures(temp_dir.path());

    cli()
        .args(["recommend", "GLIPIZIDE"])
        .arg("--rules")
        .arg(&rules)
        .arg("--records")
        .arg(&records)
        .assert()
        .success()
        .stdout(predicate::str::contains("SIMVASTATIN"));
}

#[test]
fn test_recommend_unknown_drug() {
    let temp_dir = setup_test_dir();
    let (rules, records) = write_fixtures(temp_dir.path());

    cli()
        .args(["recommend", "IBUPROFEN"])
        .arg("--rules")
        .arg(&rules)
        .arg("--records")
        .arg(&records)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No recommendations found for IBUPROFEN.",
        ));
}

#[test]
fn test_drugs_lists_catalog_sorted() {
    let temp_dir = setup_test_dir();
    let (rules, records) = write_fixtures(temp_dir.path());

    let output = cli()
        .arg("drugs")
        .arg("--rules")
        .arg(&rules)
        .arg("--records")
        .arg(&records)
        .assert()
        .success()
        .stdout(predicate::str::contains("6 distinct drugs"))
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8_lossy(&output);
    let amlodipine = stdout.find("AMLODIPINE BESYLATE");
    let simvastatin = stdout.find("SIMVASTATIN");
    assert!(amlodipine.is_some() && simvastatin.is_some());
    assert!(amlodipine < simvastatin, "Catalog listing must be sorted");
}

#[test]
fn test_missing_rules_file_is_fatal() {
    let temp_dir = setup_test_dir();
    let (_rules, records) = write_fixtures(temp_dir.path());

    cli()
        .args(["recommend", "AMLODIPINE BESYLATE"])
        .arg("--rules")
        .arg(temp_dir.path().join("nonexistent.json"))
        .arg("--records")
        .arg(&records)
        .assert()
        .failure();
}

#[test]
fn test_malformed_rules_file_is_fatal() {
    let temp_dir = setup_test_dir();
    let (_rules, records) = write_fixtures(temp_dir.path());

    let bad_rules = temp_dir.path().join("bad.json");
    fs::write(&bad_rules, "not json at all").unwrap();

    cli()
        .args(["recommend", "AMLODIPINE BESYLATE"])
        .arg("--rules")
        .arg(&bad_rules)
        .arg("--records")
        .arg(&records)
        .assert()
        .failure();
}

#[test]
fn test_doctor_shows_best_recommendation_on_add() {
    let temp_dir = setup_test_dir();
    let (rules, records) = write_fixtures(temp_dir.path());

    cli()
        .arg("doctor")
        .arg("--rules")
        .arg(&rules)
        .arg("--records")
        .arg(&records)
        .arg("--out-dir")
        .arg(temp_dir.path().join("exports"))
        .write_stdin(
            "Jane Roe\njane@example.org\n555-0100\n\
             add AMLODIPINE BESYLATE\nquit\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "AMLODIPINE BESYLATE added to the prescription.",
        ))
        .stdout(predicate::str::contains(
            "AMLODIPINE BESYLATE -> ATORVASTATIN CALCIUM (Support: 0.90)",
        ));
}

#[test]
fn test_doctor_add_without_selection_is_rejected() {
    let temp_dir = setup_test_dir();
    let (rules, records) = write_fixtures(temp_dir.path());

    cli()
        .arg("doctor")
        .arg("--rules")
        .arg(&rules)
        .arg("--records")
        .arg(&records)
        .write_stdin("Jane Roe\njane@example.org\n555-0100\nadd\nlist\nquit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("no drug selected"))
        .stdout(predicate::str::contains("No medicines added yet."));
}

#[test]
fn test_doctor_add_unknown_drug_is_rejected() {
    let temp_dir = setup_test_dir();
    let (rules, records) = write_fixtures(temp_dir.path());

    cli()
        .arg("doctor")
        .arg("--rules")
        .arg(&rules)
        .arg("--records")
        .arg(&records)
        .write_stdin("Jane Roe\njane@example.org\n555-0100\nadd IBUPROFEN\nquit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("not in the drug catalog"));
}

#[test]
fn test_doctor_remove_absent_drug_is_informational() {
    let temp_dir = setup_test_dir();
    let (rules, records) = write_fixtures(temp_dir.path());

    cli()
        .arg("doctor")
        .arg("--rules")
        .arg(&rules)
        .arg("--records")
        .arg(&records)
        .write_stdin("Jane Roe\njane@example.org\n555-0100\nremove LISINOPRIL\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "LISINOPRIL is not in the prescription list.",
        ));
}

#[test]
fn test_doctor_change_keeps_original_in_list() {
    let temp_dir = setup_test_dir();
    let (rules, records) = write_fixtures(temp_dir.path());

    let output = cli()
        .arg("doctor")
        .arg("--rules")
        .arg(&rules)
        .arg("--records")
        .arg(&records)
        .write_stdin(
            "Jane Roe\njane@example.org\n555-0100\n\
             add AMLODIPINE BESYLATE\nchange AMLODIPINE BESYLATE -> LISINOPRIL\nlist\nquit\n",
        )
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8_lossy(&output);
    assert!(stdout.contains("- AMLODIPINE BESYLATE"));
    assert!(stdout.contains("- LISINOPRIL"));
}

#[test]
fn test_pharmacy_shows_ranked_recommendations_on_add() {
    let temp_dir = setup_test_dir();
    let (rules, records) = write_fixtures(temp_dir.path());

    let output = cli()
        .arg("pharmacy")
        .arg("--rules")
        .arg(&rules)
        .arg("--records")
        .arg(&records)
        .write_stdin("add AMLODIPINE BESYLATE\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Recommended drugs to stock along with AMLODIPINE BESYLATE:",
        ))
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8_lossy(&output);
    let atorvastatin = stdout.find("ATORVASTATIN CALCIUM (Support: 0.90)");
    let lisinopril = stdout.find("LISINOPRIL (Support: 0.80)");
    assert!(atorvastatin.is_some() && lisinopril.is_some());
    assert!(atorvastatin < lisinopril);
}

#[test]
fn test_pharmacy_no_recommendations_is_informational() {
    let temp_dir = setup_test_dir();
    let (rules, records) = write_fixtures(temp_dir.path());

    // SIMVASTATIN appears only as a consequent, never as an antecedent
    cli()
        .arg("pharmacy")
        .arg("--rules")
        .arg(&rules)
        .arg("--records")
        .arg(&records)
        .write_stdin("add SIMVASTATIN\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No recommendations found for SIMVASTATIN.",
        ));
}

#[test]
fn test_accept_bypasses_catalog_check() {
    let temp_dir = setup_test_dir();
    let (rules, records) = write_fixtures(temp_dir.path());

    // Extra rule whose consequent is not in the records-derived catalog
    let rules_extra = temp_dir.path().join("rules_extra.json");
    fs::write(
        &rules_extra,
        r#"[
            {"antecedents": ["AMLODIPINE BESYLATE"], "consequents": ["HYDROCHLOROTHIAZIDE"], "support": 0.7}
        ]"#,
    )
    .unwrap();

    cli()
        .arg("pharmacy")
        .arg("--rules")
        .arg(&rules_extra)
        .arg("--records")
        .arg(&records)
        .write_stdin("add AMLODIPINE BESYLATE\naccept HYDROCHLOROTHIAZIDE\nlist\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("- HYDROCHLOROTHIAZIDE"));
}
