use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Which kind of document a piece of text is. Drives prompt and pattern choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRole {
    Resume,
    JobDescription,
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRole::Resume => write!(f, "resume"),
            DocumentRole::JobDescription => write!(f, "job description"),
        }
    }
}

/// One employment entry as written in the source document.
/// Dates stay raw here; the normalizer owns parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmploymentSpan {
    #[serde(default, deserialize_with = "nullable")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub start: String,
    #[serde(default, deserialize_with = "nullable")]
    pub end: Option<String>,
}

/// Raw fields produced by any extraction backend, before normalization.
///
/// Resume and job extraction share the shape. For a job description `skills`
/// are the required skills and `education` the required education.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedFields {
    #[serde(deserialize_with = "nullable")]
    pub name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub email: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub location: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub skills: Vec<String>,
    /// Per-skill importance for job descriptions. Missing entries weigh 1.0.
    #[serde(deserialize_with = "nullable")]
    pub skill_importance: BTreeMap<String, f64>,
    #[serde(deserialize_with = "nullable")]
    pub employment: Vec<EmploymentSpan>,
    #[serde(deserialize_with = "nullable")]
    pub years_of_experience: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub min_experience_years: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub education: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub certifications: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub titles: Vec<String>,
    /// Informational only; no scorer reads projects.
    #[serde(deserialize_with = "nullable")]
    pub projects: Vec<String>,
}

/// LLMs emit `null` for empty lists as often as `[]`.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Outcome of extracting one document.
///
/// `Degraded` carries usable fields that needed repair; consumers must never
/// treat it as `Success`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ExtractionResult {
    Success(ExtractedFields),
    Degraded(ExtractedFields, String),
    Failed(String),
}

impl ExtractionResult {
    pub fn fields(&self) -> Option<&ExtractedFields> {
        match self {
            ExtractionResult::Success(fields) | ExtractionResult::Degraded(fields, _) => {
                Some(fields)
            }
            ExtractionResult::Failed(_) => None,
        }
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match self {
            ExtractionResult::Degraded(_, reason) => Some(reason),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ExtractionResult::Failed(_))
    }
}
