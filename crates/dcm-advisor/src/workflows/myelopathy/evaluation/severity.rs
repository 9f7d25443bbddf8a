use super::super::domain::Severity;
use super::config::SeverityThresholds;

/// Maps an mJOA score to its severity band. First match wins: mild, moderate, severe.
pub fn classify_severity(mjoa: u8, thresholds: &SeverityThresholds) -> Severity {
    if mjoa >= thresholds.mild_min_mjoa {
        Severity::Mild
    } else if mjoa >= thresholds.moderate_min_mjoa {
        Severity::Moderate
    } else {
        Severity::Severe
    }
}
