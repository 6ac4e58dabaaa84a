use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinal education scale. Declaration order is the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    pub const LOWEST: EducationLevel = EducationLevel::HighSchool;

    pub fn ordinal(self) -> u8 {
        match self {
            EducationLevel::HighSchool => 0,
            EducationLevel::Bachelor => 1,
            EducationLevel::Master => 2,
            EducationLevel::Doctorate => 3,
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EducationLevel::HighSchool => "high school",
            EducationLevel::Bachelor => "bachelor",
            EducationLevel::Master => "master",
            EducationLevel::Doctorate => "doctorate",
        };
        write!(f, "{label}")
    }
}

/// How much the extracted fields can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Low,
}

/// Which backend produced a document's fields and how trustworthy they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub backend: String,
    pub confidence: Confidence,
    pub degraded_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

/// Canonical candidate fields after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFields {
    pub name: Option<String>,
    pub contact: Contact,
    pub skills: BTreeSet<String>,
    pub experience_years: f64,
    pub education_level: EducationLevel,
    /// False when no education string mapped to a known level.
    pub education_recognized: bool,
    pub certifications: BTreeSet<String>,
    pub titles: BTreeSet<String>,
    pub projects: Vec<String>,
}

/// One resume, normalized and classified. Built once per run and shared
/// read-only with the results that reference it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateProfile {
    pub id: String,
    pub raw_text: String,
    pub fields: NormalizedFields,
    pub domain: String,
    /// `None` when the embedding service could not produce a usable vector.
    pub embedding: Option<Vec<f32>>,
    pub provenance: Provenance,
}

/// The job side of a run: required skills with importance weights plus
/// minimums. One per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRequirement {
    pub raw_text: String,
    pub required_skills: BTreeMap<String, f64>,
    pub minimum_experience_years: f64,
    /// `None` when the description states no education requirement.
    pub required_education_level: Option<EducationLevel>,
    pub certifications: BTreeSet<String>,
    pub titles: BTreeSet<String>,
    pub domain: String,
    pub embedding: Option<Vec<f32>>,
    pub provenance: Provenance,
}
