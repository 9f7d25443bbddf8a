use super::super::domain::UncertaintyTier;
use super::approach::ApproachPoints;
use super::config::UncertaintyThresholds;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UncertaintyError {
    #[error("uncertainty needs at least two approach probabilities, found {found}")]
    InsufficientApproaches { found: usize },
    #[error("approach probability {value} is outside [0, 1]")]
    InvalidProbability { value: String },
}

/// Tier from the gap between the two most likely approaches.
pub(crate) fn classify_points(
    points: &ApproachPoints,
    thresholds: &UncertaintyThresholds,
) -> UncertaintyTier {
    let mut values = points.entries().map(|(_, value)| value);
    values.sort_unstable_by(|a, b| b.cmp(a));
    tier_for_gap(values[0].saturating_sub(values[1]), thresholds)
}

/// Classifies an arbitrary set of probabilities in `[0, 1]`.
///
/// Fewer than two entries, or any value outside `[0, 1]`, is a caller error
/// rather than a confident result.
pub fn classify_probabilities(
    probabilities: &[f64],
    thresholds: &UncertaintyThresholds,
) -> Result<UncertaintyTier, UncertaintyError> {
    if probabilities.len() < 2 {
        return Err(UncertaintyError::InsufficientApproaches {
            found: probabilities.len(),
        });
    }

    let mut points = Vec::with_capacity(probabilities.len());
    for value in probabilities {
        if !(0.0..=1.0).contains(value) {
            return Err(UncertaintyError::InvalidProbability {
                value: value.to_string(),
            });
        }
        // Thresholds are whole percentage points; rounding keeps 0.70 - 0.55 at 15.
        points.push((value * 100.0).round() as i16);
    }
    points.sort_unstable_by(|a, b| b.cmp(a));

    let gap = points[0] - points[1];
    Ok(tier_for_gap(gap, thresholds))
}

fn tier_for_gap(gap: i16, thresholds: &UncertaintyThresholds) -> UncertaintyTier {
    if gap >= thresholds.low_min_gap {
        UncertaintyTier::Low
    } else if gap >= thresholds.moderate_min_gap {
        UncertaintyTier::Moderate
    } else {
        UncertaintyTier::High
    }
}
