//! Domain Classifier: Assigns one coarse domain label per profile from a
//! configured keyword table and decides candidate/job compatibility.
//!
//! Ties: highest distinct-keyword overlap wins, then the domain declared
//! first in the table. Below `min_domain_overlap` the label is the unknown
//! label.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::MatchingConfig;
use crate::models::DimensionScore;
use crate::normalize::skills::clean_token;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainAssignment {
    pub label: String,
    pub overlap: usize,
    pub matched_keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainCompatibility {
    Match,
    Mismatch,
    /// At least one side is the unknown domain.
    Indeterminate,
}

#[derive(Debug, Clone)]
struct DomainEntry {
    label: String,
    keywords: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct DomainClassifier {
    table: Vec<DomainEntry>,
    unknown: String,
    min_overlap: usize,
    unknown_score: f64,
}

impl DomainClassifier {
    pub fn new(config: &MatchingConfig) -> Self {
        let table = config
            .domains
            .iter()
            .map(|d| DomainEntry {
                label: d.label.clone(),
                keywords: d
                    .keywords
                    .iter()
                    .map(|k| words(&clean_token(k)))
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();
        Self {
            table,
            unknown: config.unknown_domain.clone(),
            min_overlap: config.min_domain_overlap.max(1),
            unknown_score: config.unknown_domain_score,
        }
    }

    pub fn is_unknown(&self, label: &str) -> bool {
        label.eq_ignore_ascii_case(&self.unknown)
    }

    /// Classifies from normalized skill and title tokens.
    pub fn classify<'a, I>(&self, terms: I) -> DomainAssignment
    where
        I: IntoIterator<Item = &'a String>,
    {
        let terms: Vec<Vec<String>> = terms.into_iter().map(|t| words(t)).collect();

        let mut best: Option<DomainAssignment> = None;
        for entry in &self.table {
            let matched: Vec<String> = entry
                .keywords
                .iter()
                .filter(|keyword| terms.iter().any(|term| contains_phrase(term, keyword)))
                .map(|keyword| keyword.join(" "))
                .collect();
            let overlap = matched.len();

            // Strictly greater keeps the first-declared domain on ties.
            if overlap >= self.min_overlap && best.as_ref().map_or(true, |b| overlap > b.overlap)
            {
                best = Some(DomainAssignment {
                    label: entry.label.clone(),
                    overlap,
                    matched_keywords: matched,
                });
            }
        }

        best.unwrap_or_else(|| DomainAssignment {
            label: self.unknown.clone(),
            overlap: 0,
            matched_keywords: Vec::new(),
        })
    }

    /// Convenience for the usual inputs: skills plus titles.
    pub fn classify_profile(
        &self,
        skills: &BTreeSet<String>,
        titles: &BTreeSet<String>,
    ) -> DomainAssignment {
        self.classify(skills.iter().chain(titles.iter()))
    }

    pub fn compatibility(&self, candidate: &str, job: &str) -> DomainCompatibility {
        if self.is_unknown(candidate) || self.is_unknown(job) {
            DomainCompatibility::Indeterminate
        } else if candidate.eq_ignore_ascii_case(job) {
            DomainCompatibility::Match
        } else {
            DomainCompatibility::Mismatch
        }
    }

    /// Domain sub-score: 1 on match, 0 on mismatch, the configured neutral
    /// value when either side is unknown. The rationale names the keywords
    /// behind each label.
    pub fn score(
        &self,
        candidate: &DomainAssignment,
        job: &DomainAssignment,
    ) -> (DomainCompatibility, DimensionScore) {
        let compatibility = self.compatibility(&candidate.label, &job.label);
        let (c, j) = (&candidate.label, &job.label);
        let score = match compatibility {
            DomainCompatibility::Match => DimensionScore::available(
                1.0,
                format!(
                    "candidate and job are both {j} (candidate matched: {}; job matched: {})",
                    keyword_list(candidate),
                    keyword_list(job)
                ),
            ),
            DomainCompatibility::Mismatch => DimensionScore::available(
                0.0,
                format!(
                    "candidate domain {c} ({}) does not match job domain {j} ({})",
                    keyword_list(candidate),
                    keyword_list(job)
                ),
            ),
            DomainCompatibility::Indeterminate => DimensionScore::available(
                self.unknown_score,
                format!(
                    "domain could not be determined (candidate: {c} [{}], job: {j} [{}]); \
                     neutral score",
                    keyword_list(candidate),
                    keyword_list(job)
                ),
            ),
        };
        (compatibility, score)
    }
}

fn keyword_list(assignment: &DomainAssignment) -> String {
    if assignment.matched_keywords.is_empty() {
        "no keywords".to_string()
    } else {
        assignment.matched_keywords.join(", ")
    }
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == '/' || c == ',')
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// True when `needle` appears as a contiguous run of whole words in `haystack`.
fn contains_phrase(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && haystack.len() >= needle.len()
        && haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DomainKeywords;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn classifier_with(domains: Vec<(&str, &[&str])>) -> DomainClassifier {
        let config = MatchingConfig {
            domains: domains
                .into_iter()
                .map(|(label, kws)| DomainKeywords {
                    label: label.to_string(),
                    keywords: kws.iter().map(|k| k.to_string()).collect(),
                })
                .collect(),
            ..MatchingConfig::default()
        };
        DomainClassifier::new(&config)
    }

    #[test]
    fn test_classifies_by_highest_overlap() {
        let c = DomainClassifier::new(&MatchingConfig::default());
        let assignment = c.classify_profile(
            &set(&["python", "tensorflow", "deep learning", "pytorch"]),
            &set(&["machine learning engineer"]),
        );
        assert_eq!(assignment.label, "AI/ML");
        assert!(assignment.overlap >= 3);
    }

    #[test]
    fn test_accounting_profile() {
        let c = DomainClassifier::new(&MatchingConfig::default());
        let assignment =
            c.classify_profile(&set(&["ifrs", "audit", "excel"]), &set(&["senior auditor"]));
        assert_eq!(assignment.label, "Accounting");
    }

    #[test]
    fn test_tie_broken_by_table_order() {
        let c = classifier_with(vec![("First", &["rust"]), ("Second", &["go"])]);
        let assignment = c.classify(set(&["go", "rust"]).iter());
        assert_eq!(assignment.label, "First");
        assert_eq!(assignment.overlap, 1);
    }

    #[test]
    fn test_below_threshold_is_unknown() {
        let c = DomainClassifier::new(&MatchingConfig::default());
        let assignment = c.classify(set(&["cooking", "gardening"]).iter());
        assert_eq!(assignment.label, "Unknown");
        assert_eq!(assignment.overlap, 0);
    }

    #[test]
    fn test_min_overlap_threshold_respected() {
        let mut config = MatchingConfig::default();
        config.min_domain_overlap = 2;
        let c = DomainClassifier::new(&config);
        assert_eq!(c.classify(set(&["audit"]).iter()).label, "Unknown");
        assert_eq!(c.classify(set(&["audit", "ifrs"]).iter()).label, "Accounting");
    }

    #[test]
    fn test_phrase_match_requires_whole_words() {
        let c = classifier_with(vec![("Data", &["data science"])]);
        assert_eq!(c.classify(set(&["big data science team"]).iter()).label, "Data");
        assert_eq!(c.classify(set(&["datascience"]).iter()).label, "Unknown");
    }

    #[test]
    fn test_compatibility() {
        let c = DomainClassifier::new(&MatchingConfig::default());
        assert_eq!(c.compatibility("AI/ML", "ai/ml"), DomainCompatibility::Match);
        assert_eq!(
            c.compatibility("Accounting", "AI/ML"),
            DomainCompatibility::Mismatch
        );
        assert_eq!(
            c.compatibility("Unknown", "AI/ML"),
            DomainCompatibility::Indeterminate
        );
    }

    #[test]
    fn test_domain_scores() {
        let c = DomainClassifier::new(&MatchingConfig::default());
        let ml = c.classify(set(&["pytorch", "tensorflow"]).iter());
        let accounting = c.classify(set(&["ifrs", "audit"]).iter());
        let unknown = c.classify(set(&["gardening"]).iter());
        assert_eq!(c.score(&ml, &ml).1.score, Some(1.0));
        assert_eq!(c.score(&accounting, &ml).1.score, Some(0.0));
        assert_eq!(c.score(&unknown, &ml).1.score, Some(0.5));
    }

    #[test]
    fn test_domain_rationale_names_matched_keywords() {
        let c = DomainClassifier::new(&MatchingConfig::default());
        let ml = c.classify(set(&["pytorch", "tensorflow"]).iter());
        let accounting = c.classify(set(&["ifrs", "audit"]).iter());

        let (_, score) = c.score(&accounting, &ml);
        assert!(score.rationale.contains("ifrs"), "{}", score.rationale);
        assert!(score.rationale.contains("audit"), "{}", score.rationale);
        assert!(score.rationale.contains("pytorch"), "{}", score.rationale);

        let unknown = c.classify(set(&["gardening"]).iter());
        let (_, score) = c.score(&unknown, &ml);
        assert!(score.rationale.contains("no keywords"), "{}", score.rationale);
    }
}
