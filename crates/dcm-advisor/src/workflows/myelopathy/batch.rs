use super::domain::{Approach, PatientRecord, RecommendationLabel};
use super::evaluation::AssessmentEngine;
use serde::{Deserialize, Serialize};
use std::iter::Sum;

/// Tallies over a set of assessed patients.
///
/// Both groupings always sum to `total`. Counters combine by per-field sum,
/// so partial summaries from partitioned batches can be merged in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub surgery_recommended: usize,
    pub consider_surgery: usize,
    pub non_operative_trial: usize,
    pub anterior: usize,
    pub posterior: usize,
    pub circumferential: usize,
}

impl BatchSummary {
    pub fn record(&mut self, label: RecommendationLabel, approach: Approach) {
        self.total += 1;
        match label {
            RecommendationLabel::SurgeryRecommended => self.surgery_recommended += 1,
            RecommendationLabel::ConsiderSurgery => self.consider_surgery += 1,
            RecommendationLabel::NonOperativeTrial => self.non_operative_trial += 1,
        }
        match approach {
            Approach::Anterior => self.anterior += 1,
            Approach::Posterior => self.posterior += 1,
            Approach::Circumferential => self.circumferential += 1,
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            total: self.total + other.total,
            surgery_recommended: self.surgery_recommended + other.surgery_recommended,
            consider_surgery: self.consider_surgery + other.consider_surgery,
            non_operative_trial: self.non_operative_trial + other.non_operative_trial,
            anterior: self.anterior + other.anterior,
            posterior: self.posterior + other.posterior,
            circumferential: self.circumferential + other.circumferential,
        }
    }

    pub fn label_count(&self, label: RecommendationLabel) -> usize {
        match label {
            RecommendationLabel::SurgeryRecommended => self.surgery_recommended,
            RecommendationLabel::ConsiderSurgery => self.consider_surgery,
            RecommendationLabel::NonOperativeTrial => self.non_operative_trial,
        }
    }

    pub fn approach_count(&self, approach: Approach) -> usize {
        match approach {
            Approach::Anterior => self.anterior,
            Approach::Posterior => self.posterior,
            Approach::Circumferential => self.circumferential,
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.surgery_recommended + self.consider_surgery + self.non_operative_trial == self.total
            && self.anterior + self.posterior + self.circumferential == self.total
    }

    pub fn view(&self) -> BatchSummaryView {
        let labels = RecommendationLabel::ordered()
            .into_iter()
            .map(|label| CategoryCount::new(label, label.label(), self.label_count(label), self.total))
            .collect();

        let approaches = Approach::ordered()
            .into_iter()
            .map(|approach| {
                CategoryCount::new(
                    approach,
                    approach.label(),
                    self.approach_count(approach),
                    self.total,
                )
            })
            .collect();

        BatchSummaryView {
            total: self.total,
            recommendations: labels,
            leading_approaches: approaches,
        }
    }
}

impl Sum for BatchSummary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Self::merge)
    }
}

/// One category line of a batch report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount<K> {
    pub key: K,
    pub label: &'static str,
    pub count: usize,
    /// Share of the batch in `[0, 1]`; zero for an empty batch.
    pub share: f64,
}

impl<K> CategoryCount<K> {
    fn new(key: K, label: &'static str, count: usize, total: usize) -> Self {
        let share = if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        };
        Self {
            key,
            label,
            count,
            share,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummaryView {
    pub total: usize,
    pub recommendations: Vec<CategoryCount<RecommendationLabel>>,
    pub leading_approaches: Vec<CategoryCount<Approach>>,
}

/// Folds assessments of many patients into a [`BatchSummary`].
#[derive(Debug, Clone, Copy)]
pub struct BatchAggregator<'a> {
    engine: &'a AssessmentEngine,
}

impl<'a> BatchAggregator<'a> {
    pub fn new(engine: &'a AssessmentEngine) -> Self {
        Self { engine }
    }

    pub fn aggregate<'r, I>(&self, records: I) -> BatchSummary
    where
        I: IntoIterator<Item = &'r PatientRecord>,
    {
        records
            .into_iter()
            .fold(BatchSummary::default(), |mut summary, record| {
                let (label, approach) = self.engine.triage(record);
                summary.record(label, approach);
                summary
            })
    }

    /// Aggregates fixed-size partitions independently and merges the partial counts.
    pub fn aggregate_partitioned(&self, records: &[PatientRecord], partition: usize) -> BatchSummary {
        if partition == 0 {
            return self.aggregate(records);
        }

        records
            .chunks(partition)
            .map(|chunk| self.aggregate(chunk))
            .sum()
    }
}
