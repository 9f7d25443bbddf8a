use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// T2-weighted intramedullary signal change on MRI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum T2Signal {
    None,
    Bright,
    Multilevel,
}

impl T2Signal {
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bright => "bright",
            Self::Multilevel => "multilevel",
        }
    }
}

impl fmt::Display for T2Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canal occupying ratio of the compressive lesion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanalRatio {
    #[serde(rename = "<50%")]
    BelowFifty,
    #[serde(rename = "50-60%")]
    FiftyToSixty,
    #[serde(rename = ">60%")]
    AboveSixty,
}

impl CanalRatio {
    pub const fn label(self) -> &'static str {
        match self {
            Self::BelowFifty => "<50%",
            Self::FiftyToSixty => "50-60%",
            Self::AboveSixty => ">60%",
        }
    }
}

impl fmt::Display for CanalRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated feature record for a single patient evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub age: i32,
    pub sex: Sex,
    pub mjoa: u8,
    pub duration_months: u32,
    pub t2_signal: T2Signal,
    pub levels: u32,
    pub canal_ratio: CanalRatio,
    pub opll: bool,
    pub t1_hypo: bool,
    pub smoker: bool,
}

impl PatientRecord {
    pub const DEFAULT_AGE: i32 = 65;
    pub const DEFAULT_SEX: Sex = Sex::Male;
    pub const DEFAULT_MJOA: u8 = 18;
    pub const MAX_MJOA: u8 = 18;
    pub const DEFAULT_DURATION_MONTHS: u32 = 0;
    pub const DEFAULT_T2_SIGNAL: T2Signal = T2Signal::Bright;
    pub const DEFAULT_LEVELS: u32 = 1;
    pub const DEFAULT_CANAL_RATIO: CanalRatio = CanalRatio::BelowFifty;
}

/// Functional severity band derived from the mJOA score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub const fn ordered() -> [Self; 3] {
        [Self::Mild, Self::Moderate, Self::Severe]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
        }
    }

    /// Moderate and severe myelopathy share the operative thresholds.
    pub const fn is_at_least_moderate(self) -> bool {
        matches!(self, Self::Moderate | Self::Severe)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationLabel {
    SurgeryRecommended,
    ConsiderSurgery,
    NonOperativeTrial,
}

impl RecommendationLabel {
    pub const fn ordered() -> [Self; 3] {
        [
            Self::SurgeryRecommended,
            Self::ConsiderSurgery,
            Self::NonOperativeTrial,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SurgeryRecommended => "Surgery recommended",
            Self::ConsiderSurgery => "Consider surgery",
            Self::NonOperativeTrial => "Non-operative trial",
        }
    }

    pub const fn risk_text(self) -> &'static str {
        match self {
            Self::SurgeryRecommended => {
                "Substantial risk of further neurological decline without decompression."
            }
            Self::ConsiderSurgery => {
                "Moderate risk of progression; close surveillance is required if surgery is deferred."
            }
            Self::NonOperativeTrial => {
                "Low to moderate risk of progression while monitored with serial examinations."
            }
        }
    }

    pub const fn benefit_text(self) -> &'static str {
        match self {
            Self::SurgeryRecommended => {
                "High likelihood of meaningful neurological improvement after decompression."
            }
            Self::ConsiderSurgery => {
                "Surgery offers meaningful but optional benefit; a structured non-operative programme is a reasonable alternative."
            }
            Self::NonOperativeTrial => {
                "Modest expected benefit from surgery at this stage."
            }
        }
    }
}

impl fmt::Display for RecommendationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Surgical access route for decompression and/or fusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Approach {
    Anterior,
    Posterior,
    Circumferential,
}

impl Approach {
    /// Declaration order, also used to break probability ties.
    pub const fn ordered() -> [Self; 3] {
        [Self::Anterior, Self::Posterior, Self::Circumferential]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Anterior => "Anterior",
            Self::Posterior => "Posterior",
            Self::Circumferential => "Circumferential",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncertaintyTier {
    Low,
    Moderate,
    High,
}

impl UncertaintyTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}
