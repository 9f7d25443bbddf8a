//! CSV batch intake for patient exports.

mod normalizer;
mod parser;

use crate::workflows::myelopathy::{
    FallbackPolicy, FieldFallback, InputError, PatientRecord,
};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum BatchImportError {
    #[error("failed to read patient export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid patient CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },
    #[error("patient export contains no data rows")]
    Empty,
    #[error("row {row}: {source}")]
    InvalidRow { row: usize, source: InputError },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedRow {
    pub row: usize,
    pub record: PatientRecord,
    pub fallbacks: Vec<FieldFallback>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedBatch {
    pub rows: Vec<ImportedRow>,
}

impl ImportedBatch {
    pub fn records(&self) -> impl Iterator<Item = &PatientRecord> {
        self.rows.iter().map(|row| &row.record)
    }

    pub fn fallback_count(&self) -> usize {
        self.rows.iter().map(|row| row.fallbacks.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct PatientCsvImporter;

impl PatientCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        policy: FallbackPolicy,
    ) -> Result<ImportedBatch, BatchImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, policy)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        policy: FallbackPolicy,
    ) -> Result<ImportedBatch, BatchImportError> {
        let raw_rows = parser::parse_rows(reader)?;
        if raw_rows.is_empty() {
            return Err(BatchImportError::Empty);
        }

        let mut rows = Vec::with_capacity(raw_rows.len());
        for raw in raw_rows {
            let parsed = PatientRecord::from_input(&raw.input, policy)
                .map_err(|source| BatchImportError::InvalidRow {
                    row: raw.row,
                    source,
                })?;

            for fallback in &parsed.fallbacks {
                warn!(row = raw.row, field = %fallback.field, "{}", fallback);
            }

            rows.push(ImportedRow {
                row: raw.row,
                record: parsed.record,
                fallbacks: parsed.fallbacks,
            });
        }

        let batch = ImportedBatch { rows };
        info!(
            rows = batch.len(),
            fallbacks = batch.fallback_count(),
            "patient batch imported"
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::myelopathy::{PatientField, Sex};
    use std::io::Cursor;

    const CSV: &str = "age,sex,mjoa,duration_months,t2_signal,levels,canal_ratio,opll,smoker\n\
62,M,13,12,bright,3,<50%,no,no\n\
48,unknown,16,8,bright,1,<50%,,\n";

    #[test]
    fn lenient_import_reports_fallbacks_per_row() {
        let batch = PatientCsvImporter::from_reader(Cursor::new(CSV), FallbackPolicy::Lenient)
            .expect("import succeeds");

        assert_eq!(batch.len(), 2);
        assert!(batch.rows[0].fallbacks.is_empty());
        assert_eq!(batch.rows[1].row, 2);
        assert_eq!(batch.rows[1].record.sex, Sex::Male);
        assert_eq!(batch.rows[1].fallbacks[0].field, PatientField::Sex);
        assert_eq!(batch.fallback_count(), 1);
    }

    #[test]
    fn strict_import_names_the_failing_row() {
        let error = PatientCsvImporter::from_reader(Cursor::new(CSV), FallbackPolicy::Strict)
            .expect_err("strict rejects");

        match error {
            BatchImportError::InvalidRow { row, source } => {
                assert_eq!(row, 2);
                assert_eq!(
                    source,
                    InputError::InvalidField {
                        field: PatientField::Sex,
                        raw: "unknown".to_string(),
                    }
                );
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn header_only_export_is_empty() {
        let csv = "age,sex,mjoa,duration_months,t2_signal,levels,canal_ratio\n,,,,,,\n";
        let error = PatientCsvImporter::from_reader(Cursor::new(csv), FallbackPolicy::Lenient)
            .expect_err("empty batch");
        assert!(matches!(error, BatchImportError::Empty));
    }

    #[test]
    fn row_errors_keep_their_source() {
        use std::error::Error;

        let error = BatchImportError::InvalidRow {
            row: 4,
            source: InputError::MissingField {
                field: PatientField::Levels,
            },
        };
        assert_eq!(error.to_string(), "row 4: field levels is missing");
        assert!(error.source().is_some());
        assert!(BatchImportError::Empty.source().is_none());
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = PatientCsvImporter::from_path("./does-not-exist.csv", FallbackPolicy::Lenient)
            .expect_err("expected io error");

        match error {
            BatchImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
