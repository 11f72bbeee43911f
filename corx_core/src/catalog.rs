//! Drug catalog built from historical prescription records.
//!
//! The records CSV carries one row per prescriber with a comma-separated
//! field of drug names. The catalog splits that field into trimmed tokens,
//! unions the tokens across all records into the distinct drug set, and
//! keeps the typed record table for downstream display.

use crate::{DrugCatalog, Error, PrescriptionRecord, Result};
use csv::ReaderBuilder;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Raw CSV row before the prescription-counts field is parsed
#[derive(Debug, Deserialize)]
struct CsvRow {
    npi: String,
    specialty: String,
    cms_prescription_counts: String,
}

impl From<CsvRow> for PrescriptionRecord {
    fn from(row: CsvRow) -> Self {
        PrescriptionRecord {
            npi: row.npi,
            specialty: row.specialty,
            drugs: split_drug_field(&row.cms_prescription_counts),
        }
    }
}

/// Split a comma-separated drug-name field into trimmed, non-empty tokens.
fn split_drug_field(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

/// Process-wide catalog, initialized exactly once
static SHARED_CATALOG: OnceCell<DrugCatalog> = OnceCell::new();

impl DrugCatalog {
    /// Load the record table and derive the distinct drug set.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| Error::Load(format!("cannot read records file {:?}: {}", path, e)))?;

        let mut records = Vec::new();
        for result in reader.deserialize::<CsvRow>() {
            let row = result
                .map_err(|e| Error::Load(format!("malformed records file {:?}: {}", path, e)))?;
            records.push(PrescriptionRecord::from(row));
        }

        if records.is_empty() {
            return Err(Error::Load(format!("records file {:?} has no rows", path)));
        }

        let drugs: HashSet<String> = records
            .iter()
            .flat_map(|record| record.drugs.iter().cloned())
            .collect();

        tracing::info!(
            "Loaded {} prescription records, {} distinct drugs, from {:?}",
            records.len(),
            drugs.len(),
            path
        );

        Ok(Self { records, drugs })
    }

    /// Shared process-wide catalog, loaded on first call.
    ///
    /// Same once-only semantics as [`crate::RuleStore::shared`].
    pub fn shared(path: &Path) -> Result<&'static DrugCatalog> {
        SHARED_CATALOG.get_or_try_init(|| Self::load(path))
    }
}
