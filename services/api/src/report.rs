use crate::infra::prepare_command;
use clap::Args;
use dcm_advisor::error::AppError;
use dcm_advisor::workflows::intake::{ImportedBatch, PatientCsvImporter};
use dcm_advisor::workflows::myelopathy::{
    AssessmentEngine, BatchAggregator, BatchSummaryView, FieldFallback, PatientInput,
    PatientRecord, RecommendationResult,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

#[derive(Args, Debug, Default)]
pub(crate) struct AssessArgs {
    /// Age in years
    #[arg(long)]
    pub(crate) age: Option<String>,
    /// Sex (M or F)
    #[arg(long)]
    pub(crate) sex: Option<String>,
    /// mJOA score, 0-18
    #[arg(long)]
    pub(crate) mjoa: Option<String>,
    /// Symptom duration in months
    #[arg(long)]
    pub(crate) duration_months: Option<String>,
    /// T2 cord signal: none, bright or multilevel
    #[arg(long)]
    pub(crate) t2_signal: Option<String>,
    /// Number of stenotic levels
    #[arg(long)]
    pub(crate) levels: Option<String>,
    /// Canal occupying ratio: <50%, 50-60% or >60%
    #[arg(long)]
    pub(crate) canal_ratio: Option<String>,
    /// Ossification of the posterior longitudinal ligament present
    #[arg(long)]
    pub(crate) opll: bool,
    /// T1 hypointensity present
    #[arg(long)]
    pub(crate) t1_hypo: bool,
    /// Current smoker
    #[arg(long)]
    pub(crate) smoker: bool,
    /// Reject unreadable fields instead of substituting defaults
    #[arg(long)]
    pub(crate) strict: bool,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl AssessArgs {
    fn to_input(&self) -> PatientInput {
        PatientInput {
            age: self.age.clone(),
            sex: self.sex.clone(),
            mjoa: self.mjoa.clone(),
            duration_months: self.duration_months.clone(),
            t2_signal: self.t2_signal.clone(),
            levels: self.levels.clone(),
            canal_ratio: self.canal_ratio.clone(),
            opll: Some(self.opll.to_string()),
            t1_hypo: Some(self.t1_hypo.to_string()),
            smoker: Some(self.smoker.to_string()),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export with one patient per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Reject the batch on the first unreadable field
    #[arg(long)]
    pub(crate) strict: bool,
    /// Include a per-row recommendation listing
    #[arg(long)]
    pub(crate) list_rows: bool,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssessmentReport {
    pub(crate) result: RecommendationResult,
    pub(crate) fallbacks: Vec<FieldFallback>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RowWarnings {
    pub(crate) row: usize,
    pub(crate) fallbacks: Vec<FieldFallback>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RowAssessment {
    pub(crate) row: usize,
    pub(crate) record: PatientRecord,
    pub(crate) result: RecommendationResult,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchReport {
    pub(crate) summary: BatchSummaryView,
    pub(crate) warnings: Vec<RowWarnings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) rows: Option<Vec<RowAssessment>>,
}

pub(crate) fn assess_batch(
    engine: &AssessmentEngine,
    batch: ImportedBatch,
    include_rows: bool,
) -> BatchReport {
    let summary = BatchAggregator::new(engine).aggregate(batch.records()).view();

    let rows = include_rows.then(|| {
        batch
            .rows
            .iter()
            .map(|row| RowAssessment {
                row: row.row,
                record: row.record.clone(),
                result: engine.assess(&row.record),
            })
            .collect()
    });

    let warnings = batch
        .rows
        .into_iter()
        .filter(|row| !row.fallbacks.is_empty())
        .map(|row| RowWarnings {
            row: row.row,
            fallbacks: row.fallbacks,
        })
        .collect();

    BatchReport {
        summary,
        warnings,
        rows,
    }
}

pub(crate) fn run_assessment(args: AssessArgs) -> Result<(), AppError> {
    let (engine, policy) = prepare_command(args.strict)?;
    let parsed = PatientRecord::from_input(&args.to_input(), policy)?;
    for fallback in &parsed.fallbacks {
        warn!(field = %fallback.field, "{}", fallback);
    }

    let report = AssessmentReport {
        result: engine.assess(&parsed.record),
        fallbacks: parsed.fallbacks,
    };

    if args.json {
        print_json(&report)
    } else {
        render_assessment(&parsed.record, &report);
        Ok(())
    }
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let BatchArgs {
        csv,
        strict,
        list_rows,
        json,
    } = args;

    let (engine, policy) = prepare_command(strict)?;
    let batch = PatientCsvImporter::from_path(&csv, policy)?;
    let report = assess_batch(&engine, batch, list_rows || json);

    if json {
        print_json(&report)
    } else {
        render_batch(&report, list_rows);
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

fn percent(probability: f64) -> f64 {
    probability * 100.0
}

pub(crate) fn render_assessment(record: &PatientRecord, report: &AssessmentReport) {
    let result = &report.result;

    println!("DCM surgical assessment");
    println!(
        "Patient: age {}, sex {}, mJOA {}, {} months, T2 {}, {} level(s), canal {}",
        record.age,
        record.sex,
        record.mjoa,
        record.duration_months,
        record.t2_signal,
        record.levels,
        record.canal_ratio
    );

    println!("\nRecommendation");
    println!("- Severity: {}", result.severity.label());
    println!(
        "- {} (rule: {})",
        result.label.label(),
        result.decision_rule
    );
    println!("- Risk: {}", result.risk_text);
    println!("- Benefit: {}", result.benefit_text);
    println!(
        "- Risk score {} | benefit score {}",
        result.risk_score, result.benefit_score
    );

    println!("\nApproach probabilities");
    for (approach, probability) in result.approach_probabilities.entries() {
        let marker = if approach == result.recommended_approach {
            " <- recommended"
        } else {
            ""
        };
        println!("- {}: {:.0}%{}", approach.label(), percent(probability), marker);
    }
    println!("Uncertainty: {}", result.uncertainty_tier.label());

    if !result.score_components.is_empty() {
        println!("\nScore adjustments");
        for component in &result.score_components {
            println!(
                "- {}: risk {:+}, benefit {:+} ({})",
                component.factor.label(),
                component.risk,
                component.benefit,
                component.notes
            );
        }
    }

    if !result.approach_adjustments.is_empty() {
        println!("\nApproach adjustments (percentage points)");
        for adjustment in &result.approach_adjustments {
            println!(
                "- {}: anterior {:+}, posterior {:+}, circumferential {:+}",
                adjustment.rule.label(),
                adjustment.anterior,
                adjustment.posterior,
                adjustment.circumferential
            );
        }
    }

    if report.fallbacks.is_empty() {
        println!("\nInput warnings: none");
    } else {
        println!("\nInput warnings");
        for fallback in &report.fallbacks {
            println!("- {}", fallback);
        }
    }
}

pub(crate) fn render_batch(report: &BatchReport, list_rows: bool) {
    let summary = &report.summary;

    println!("DCM batch summary");
    println!("Patients assessed: {}", summary.total);

    println!("\nRecommendations");
    for entry in &summary.recommendations {
        println!(
            "- {}: {} ({:.0}%)",
            entry.label,
            entry.count,
            percent(entry.share)
        );
    }

    println!("\nLeading approaches");
    for entry in &summary.leading_approaches {
        println!(
            "- {}: {} ({:.0}%)",
            entry.label,
            entry.count,
            percent(entry.share)
        );
    }

    if report.warnings.is_empty() {
        println!("\nInput warnings: none");
    } else {
        println!("\nInput warnings");
        for row in &report.warnings {
            for fallback in &row.fallbacks {
                println!("- row {}: {}", row.row, fallback);
            }
        }
    }

    if list_rows {
        if let Some(rows) = &report.rows {
            println!("\nPatients");
            for row in rows {
                println!(
                    "- row {}: {} | {} | {} ({:.0}%) | uncertainty {}",
                    row.row,
                    row.result.severity.label(),
                    row.result.label.label(),
                    row.result.recommended_approach.label(),
                    percent(
                        row.result
                            .approach_probabilities
                            .get(row.result.recommended_approach)
                    ),
                    row.result.uncertainty_tier.label()
                );
            }
        }
    }
}
