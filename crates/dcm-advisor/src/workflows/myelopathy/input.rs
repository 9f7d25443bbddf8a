//! Conversion of raw form or CSV values into a [`PatientRecord`].
//!
//! Scalar fields that are missing or fail to parse either fall back to the
//! documented default (and are reported as a [`FieldFallback`]) or reject the
//! record, depending on the [`FallbackPolicy`].

use super::domain::{CanalRatio, PatientRecord, Sex, T2Signal};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Unvalidated patient fields exactly as a form or CSV row supplied them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInput {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub sex: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub mjoa: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub duration_months: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub t2_signal: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub levels: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub canal_ratio: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub opll: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub t1_hypo: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub smoker: Option<String>,
}

impl PatientInput {
    pub fn set(&mut self, field: PatientField, value: Option<String>) {
        let slot = match field {
            PatientField::Age => &mut self.age,
            PatientField::Sex => &mut self.sex,
            PatientField::Mjoa => &mut self.mjoa,
            PatientField::DurationMonths => &mut self.duration_months,
            PatientField::T2Signal => &mut self.t2_signal,
            PatientField::Levels => &mut self.levels,
            PatientField::CanalRatio => &mut self.canal_ratio,
            PatientField::Opll => &mut self.opll,
            PatientField::T1Hypo => &mut self.t1_hypo,
            PatientField::Smoker => &mut self.smoker,
        };
        *slot = value;
    }
}

impl From<&PatientRecord> for PatientInput {
    fn from(record: &PatientRecord) -> Self {
        Self {
            age: Some(record.age.to_string()),
            sex: Some(record.sex.to_string()),
            mjoa: Some(record.mjoa.to_string()),
            duration_months: Some(record.duration_months.to_string()),
            t2_signal: Some(record.t2_signal.to_string()),
            levels: Some(record.levels.to_string()),
            canal_ratio: Some(record.canal_ratio.to_string()),
            opll: Some(record.opll.to_string()),
            t1_hypo: Some(record.t1_hypo.to_string()),
            smoker: Some(record.smoker.to_string()),
        }
    }
}

/// Accepts JSON strings, numbers, and booleans so form clients need not quote values.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(serde_json::Value::Bool(flag)) => Some(flag.to_string()),
        Some(serde_json::Value::Number(number)) => Some(number.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Identifies a patient field in fallback reports and CSV headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientField {
    Age,
    Sex,
    Mjoa,
    DurationMonths,
    T2Signal,
    Levels,
    CanalRatio,
    Opll,
    T1Hypo,
    Smoker,
}

impl PatientField {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Age,
            Self::Sex,
            Self::Mjoa,
            Self::DurationMonths,
            Self::T2Signal,
            Self::Levels,
            Self::CanalRatio,
            Self::Opll,
            Self::T1Hypo,
            Self::Smoker,
        ]
    }

    pub const fn column(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::Mjoa => "mjoa",
            Self::DurationMonths => "duration_months",
            Self::T2Signal => "t2_signal",
            Self::Levels => "levels",
            Self::CanalRatio => "canal_ratio",
            Self::Opll => "opll",
            Self::T1Hypo => "t1_hypo",
            Self::Smoker => "smoker",
        }
    }

    /// Columns a batch export must carry; flag columns default to `false`.
    pub const fn is_required_column(self) -> bool {
        !matches!(self, Self::Opll | Self::T1Hypo | Self::Smoker)
    }

    pub fn from_column(column: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|field| field.column() == column)
    }
}

impl fmt::Display for PatientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Whether unparseable fields are defaulted or rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    #[default]
    Lenient,
    Strict,
}

impl FallbackPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lenient" | "fallback" => Some(Self::Lenient),
            "strict" | "fail-fast" | "fail_fast" => Some(Self::Strict),
            _ => None,
        }
    }
}

/// A field that could not be read and was replaced by its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFallback {
    pub field: PatientField,
    pub raw: Option<String>,
    pub substituted: String,
}

impl fmt::Display for FieldFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => write!(
                f,
                "{}: could not read '{}', using {}",
                self.field, raw, self.substituted
            ),
            None => write!(f, "{}: missing, using {}", self.field, self.substituted),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("field {field} has invalid value '{raw}'")]
    InvalidField { field: PatientField, raw: String },
    #[error("field {field} is missing")]
    MissingField { field: PatientField },
}

/// A constructed record plus every default that was substituted along the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedPatient {
    pub record: PatientRecord,
    pub fallbacks: Vec<FieldFallback>,
}

impl ParsedPatient {
    pub fn is_clean(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

impl PatientRecord {
    pub fn from_input(
        input: &PatientInput,
        policy: FallbackPolicy,
    ) -> Result<ParsedPatient, InputError> {
        let mut resolver = FieldResolver {
            policy,
            fallbacks: Vec::new(),
        };

        let record = PatientRecord {
            age: resolver.resolve(
                PatientField::Age,
                input.age.as_deref(),
                |raw| parse_integer(raw).and_then(|value| i32::try_from(value).ok()),
                Self::DEFAULT_AGE,
            )?,
            sex: resolver.resolve(
                PatientField::Sex,
                input.sex.as_deref(),
                parse_sex,
                Self::DEFAULT_SEX,
            )?,
            mjoa: resolver.resolve(
                PatientField::Mjoa,
                input.mjoa.as_deref(),
                |raw| {
                    parse_integer(raw)
                        .and_then(|value| u8::try_from(value).ok())
                        .filter(|score| *score <= Self::MAX_MJOA)
                },
                Self::DEFAULT_MJOA,
            )?,
            duration_months: resolver.resolve(
                PatientField::DurationMonths,
                input.duration_months.as_deref(),
                |raw| parse_integer(raw).and_then(|value| u32::try_from(value).ok()),
                Self::DEFAULT_DURATION_MONTHS,
            )?,
            t2_signal: resolver.resolve(
                PatientField::T2Signal,
                input.t2_signal.as_deref(),
                parse_t2_signal,
                Self::DEFAULT_T2_SIGNAL,
            )?,
            levels: resolver.resolve(
                PatientField::Levels,
                input.levels.as_deref(),
                |raw| {
                    parse_integer(raw)
                        .and_then(|value| u32::try_from(value).ok())
                        .filter(|levels| *levels >= 1)
                },
                Self::DEFAULT_LEVELS,
            )?,
            canal_ratio: resolver.resolve(
                PatientField::CanalRatio,
                input.canal_ratio.as_deref(),
                parse_canal_ratio,
                Self::DEFAULT_CANAL_RATIO,
            )?,
            opll: resolver.resolve_flag(PatientField::Opll, input.opll.as_deref())?,
            t1_hypo: resolver.resolve_flag(PatientField::T1Hypo, input.t1_hypo.as_deref())?,
            smoker: resolver.resolve_flag(PatientField::Smoker, input.smoker.as_deref())?,
        };

        Ok(ParsedPatient {
            record,
            fallbacks: resolver.fallbacks,
        })
    }
}

struct FieldResolver {
    policy: FallbackPolicy,
    fallbacks: Vec<FieldFallback>,
}

impl FieldResolver {
    fn resolve<T, F>(
        &mut self,
        field: PatientField,
        raw: Option<&str>,
        parse: F,
        default: T,
    ) -> Result<T, InputError>
    where
        T: fmt::Display,
        F: Fn(&str) -> Option<T>,
    {
        let raw = raw.map(str::trim).filter(|value| !value.is_empty());
        match raw {
            Some(value) => match parse(value) {
                Some(parsed) => Ok(parsed),
                None => self.fall_back(field, Some(value), default),
            },
            None => self.fall_back(field, None, default),
        }
    }

    /// Blank flags read as `false`; only unreadable values are reported.
    fn resolve_flag(&mut self, field: PatientField, raw: Option<&str>) -> Result<bool, InputError> {
        match raw.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => match parse_flag(value) {
                Some(flag) => Ok(flag),
                None => self.fall_back(field, Some(value), false),
            },
            None => Ok(false),
        }
    }

    fn fall_back<T: fmt::Display>(
        &mut self,
        field: PatientField,
        raw: Option<&str>,
        default: T,
    ) -> Result<T, InputError> {
        match (self.policy, raw) {
            (FallbackPolicy::Strict, Some(raw)) => Err(InputError::InvalidField {
                field,
                raw: raw.to_string(),
            }),
            (FallbackPolicy::Strict, None) => Err(InputError::MissingField { field }),
            (FallbackPolicy::Lenient, raw) => {
                self.fallbacks.push(FieldFallback {
                    field,
                    raw: raw.map(str::to_string),
                    substituted: default.to_string(),
                });
                Ok(default)
            }
        }
    }
}

/// Whole numbers, with decimals truncated toward zero.
fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }

    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.abs() < i64::MAX as f64)
        .map(|value| value.trunc() as i64)
}

fn parse_sex(raw: &str) -> Option<Sex> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "m" | "male" => Some(Sex::Male),
        "f" | "female" => Some(Sex::Female),
        _ => None,
    }
}

fn parse_t2_signal(raw: &str) -> Option<T2Signal> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "none" | "no" | "normal" | "absent" => Some(T2Signal::None),
        "bright" | "focal" | "yes" | "present" => Some(T2Signal::Bright),
        "multilevel" | "multi" | "multi-level" | "multi_level" | "multiple" => {
            Some(T2Signal::Multilevel)
        }
        _ => None,
    }
}

fn parse_canal_ratio(raw: &str) -> Option<CanalRatio> {
    let compact: String = raw
        .trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| if matches!(ch, '\u{2013}' | '\u{2014}') { '-' } else { ch })
        .collect();

    match compact.trim_end_matches('%') {
        "<50" | "lt50" | "below50" => Some(CanalRatio::BelowFifty),
        "50-60" | "50%-60" => Some(CanalRatio::FiftyToSixty),
        ">60" | "gt60" | "above60" => Some(CanalRatio::AboveSixty),
        _ => None,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}
