//! Structural validation of LLM output.
//!
//! Missing mandatory fields reject the output outright so the chain moves
//! on. Repairable problems in optional fields are fixed in place and the
//! result is downgraded to `Degraded` with the list of repairs.

use chrono::Utc;

use crate::errors::BackendError;
use crate::models::{DocumentRole, ExtractedFields, ExtractionResult};
use crate::normalize::experience::parse_month;

pub fn validate(
    mut fields: ExtractedFields,
    role: DocumentRole,
) -> Result<ExtractionResult, BackendError> {
    let mut repairs = Vec::new();

    let before = fields.skills.len();
    fields.skills.retain(|s| !s.trim().is_empty());
    if fields.skills.len() != before {
        repairs.push(format!("dropped {} blank skill entries", before - fields.skills.len()));
    }

    missing_mandatory(&fields, role)?;

    for (label, value) in [
        ("years_of_experience", &mut fields.years_of_experience),
        ("min_experience_years", &mut fields.min_experience_years),
    ] {
        if let Some(v) = *value {
            if !v.is_finite() || v < 0.0 {
                repairs.push(format!("discarded invalid {label} ({v})"));
                *value = None;
            }
        }
    }

    let today = Utc::now().date_naive();
    let before = fields.employment.len();
    fields.employment.retain(|span| {
        parse_month(&span.start, today).is_some()
            && span
                .end
                .as_deref()
                .map_or(true, |end| parse_month(end, today).is_some())
    });
    if fields.employment.len() != before {
        repairs.push(format!(
            "dropped {} employment entries with unparseable dates",
            before - fields.employment.len()
        ));
    }

    let before = fields.skill_importance.len();
    fields.skill_importance.retain(|_, w| w.is_finite() && *w > 0.0);
    if fields.skill_importance.len() != before {
        repairs.push("discarded non-positive skill importance weights".to_string());
    }

    if repairs.is_empty() {
        Ok(ExtractionResult::Success(fields))
    } else {
        Ok(ExtractionResult::Degraded(fields, repairs.join("; ")))
    }
}

fn missing_mandatory(fields: &ExtractedFields, role: DocumentRole) -> Result<(), BackendError> {
    let mut missing = Vec::new();
    let blank_name = fields.name.as_deref().map_or(true, |n| n.trim().is_empty());
    if role == DocumentRole::Resume && blank_name {
        missing.push("name");
    }
    if fields.skills.is_empty() {
        missing.push("skills");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(BackendError::InvalidResponse(format!(
            "{role} output missing mandatory fields: {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmploymentSpan;

    fn resume() -> ExtractedFields {
        ExtractedFields {
            name: Some("Jane Doe".into()),
            skills: vec!["Python".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_output_is_success() {
        let result = validate(resume(), DocumentRole::Resume).unwrap();
        assert!(result.is_success());
    }

    #[test]
    fn test_resume_without_name_is_invalid() {
        let fields = ExtractedFields {
            name: Some("  ".into()),
            ..resume()
        };
        let err = validate(fields, DocumentRole::Resume).unwrap_err();
        assert!(matches!(err, BackendError::InvalidResponse(m) if m.contains("name")));
    }

    #[test]
    fn test_job_needs_only_skills() {
        let job = ExtractedFields {
            skills: vec!["SQL".into()],
            ..Default::default()
        };
        assert!(validate(job, DocumentRole::JobDescription).unwrap().is_success());
        assert!(validate(ExtractedFields::default(), DocumentRole::JobDescription).is_err());
    }

    #[test]
    fn test_only_blank_skills_is_invalid() {
        let fields = ExtractedFields {
            skills: vec!["".into(), " ".into()],
            ..resume()
        };
        assert!(validate(fields, DocumentRole::Resume).is_err());
    }

    #[test]
    fn test_repairs_downgrade_to_degraded() {
        let fields = ExtractedFields {
            years_of_experience: Some(-2.0),
            employment: vec![
                EmploymentSpan {
                    title: None,
                    start: "2019-01".into(),
                    end: Some("Present".into()),
                },
                EmploymentSpan {
                    title: None,
                    start: "sometime".into(),
                    end: None,
                },
            ],
            ..resume()
        };
        let result = validate(fields, DocumentRole::Resume).unwrap();
        let reason = result.degraded_reason().unwrap();
        assert!(reason.contains("years_of_experience"));
        assert!(reason.contains("employment"));
        let fields = result.fields().unwrap();
        assert_eq!(fields.years_of_experience, None);
        assert_eq!(fields.employment.len(), 1);
    }
}
