//! Feature Normalizer: Maps raw extracted fields into canonical, comparable form.
//!
//! Skills: lower-cased, trimmed, synonym-collapsed set.
//! Experience: union of employment intervals; stated years only when no
//! interval parses.
//! Education: ordinal scale, unknown strings fall to the lowest level and
//! are flagged rather than rejected.

pub mod education;
pub mod experience;
pub mod skills;

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::models::{Contact, EducationLevel, ExtractedFields, NormalizedFields};
use crate::normalize::experience::resolve_spans;
use crate::normalize::skills::{clean_token, SkillCanonicalizer};

/// Normalized fields plus notes worth surfacing in the explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub value: T,
    pub notes: Vec<String>,
}

/// Canonical job requirements, before domain and embedding are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedJob {
    pub required_skills: BTreeMap<String, f64>,
    pub minimum_experience_years: f64,
    pub required_education_level: Option<EducationLevel>,
    pub certifications: BTreeSet<String>,
    pub titles: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct FeatureNormalizer {
    skills: SkillCanonicalizer,
    as_of: NaiveDate,
}

impl FeatureNormalizer {
    /// `as_of` resolves open-ended employment ("Present"); pass the run date.
    pub fn new(synonyms: &BTreeMap<String, String>, as_of: NaiveDate) -> Self {
        Self {
            skills: SkillCanonicalizer::new(synonyms),
            as_of,
        }
    }

    pub fn candidate(&self, fields: &ExtractedFields) -> Normalized<NormalizedFields> {
        let mut notes = Vec::new();

        let experience_years = self.experience_years(fields, &mut notes);

        let (education_level, education_recognized) =
            match education::highest_level(&fields.education) {
                Some(level) => (level, true),
                None => {
                    notes.push(if fields.education.is_empty() {
                        "no education listed; treated as lowest level".to_string()
                    } else {
                        format!(
                            "education not recognized ({}); treated as lowest level",
                            fields.education.join("; ")
                        )
                    });
                    (EducationLevel::LOWEST, false)
                }
            };

        let value = NormalizedFields {
            name: non_blank(fields.name.as_deref()),
            contact: Contact {
                email: non_blank(fields.email.as_deref()),
                phone: non_blank(fields.phone.as_deref()),
                location: non_blank(fields.location.as_deref()),
            },
            skills: self.skills.canonical_set(&fields.skills),
            experience_years,
            education_level,
            education_recognized,
            certifications: token_set(&fields.certifications),
            titles: token_set(&fields.titles),
            projects: fields
                .projects
                .iter()
                .filter_map(|p| non_blank(Some(p.as_str())))
                .collect(),
        };

        Normalized { value, notes }
    }

    pub fn job(&self, fields: &ExtractedFields) -> Normalized<NormalizedJob> {
        let mut notes = Vec::new();

        let minimum_experience_years = fields
            .min_experience_years
            .or(fields.years_of_experience)
            .filter(|y| y.is_finite())
            .unwrap_or(0.0)
            .max(0.0);

        let required_education_level = education::minimum_required_level(&fields.education);
        if required_education_level.is_none() && !fields.education.is_empty() {
            notes.push(format!(
                "job education requirement not recognized ({}); no education minimum applied",
                fields.education.join("; ")
            ));
        }

        let value = NormalizedJob {
            required_skills: self.skills.weighted(&fields.skills, &fields.skill_importance),
            minimum_experience_years,
            required_education_level,
            certifications: token_set(&fields.certifications),
            titles: token_set(&fields.titles),
        };

        Normalized { value, notes }
    }

    fn experience_years(&self, fields: &ExtractedFields, notes: &mut Vec<String>) -> f64 {
        let summary = resolve_spans(&fields.employment, self.as_of);
        if !summary.rejected.is_empty() {
            notes.push(format!(
                "ignored unparseable employment dates: {}",
                summary.rejected.join(", ")
            ));
        }
        if !summary.ranges.is_empty() {
            return summary.union_years();
        }
        fields
            .years_of_experience
            .filter(|y| y.is_finite())
            .unwrap_or(0.0)
            .max(0.0)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
}

fn token_set(raw: &[String]) -> BTreeSet<String> {
    raw.iter()
        .map(|s| clean_token(s))
        .filter(|s| !s.is_empty())
        .collect()
}
