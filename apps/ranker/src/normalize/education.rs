use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::EducationLevel;

static LEVEL_PATTERNS: Lazy<Vec<(EducationLevel, Regex)>> = Lazy::new(|| {
    [
        (
            EducationLevel::Doctorate,
            r"(?i)\b(?:ph\.?\s?d|doctorate|doctoral|d\.?phil)\b",
        ),
        (
            EducationLevel::Master,
            r"(?i)\b(?:master(?:'s|s)?|m\.?sc|mba|m\.?tech|m\.?eng|m\.?phil)\b",
        ),
        (
            EducationLevel::Bachelor,
            concat!(
                r"(?i)\b(?:bachelor(?:'s|s)?|b\.?sc|b\.?s|b\.?a|b\.?tech|b\.?eng|b\.?com",
                r"|undergraduate)\b",
            ),
        ),
        (
            EducationLevel::HighSchool,
            r"(?i)\b(?:high\s+school|secondary\s+school|ged|a-levels?|matriculation|hsc)\b",
        ),
    ]
    .into_iter()
    .map(|(level, pattern)| (level, Regex::new(pattern).expect("static education pattern")))
    .collect()
});

/// Every level mentioned in a single education string.
pub fn levels_in(text: &str) -> Vec<EducationLevel> {
    LEVEL_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(level, _)| *level)
        .collect()
}

/// Highest level a candidate holds. `None` when nothing is recognized.
pub fn highest_level(entries: &[String]) -> Option<EducationLevel> {
    entries.iter().flat_map(|e| levels_in(e)).max()
}

/// Lowest level a job accepts. "Bachelor's or Master's" accepts a bachelor.
pub fn minimum_required_level(entries: &[String]) -> Option<EducationLevel> {
    entries.iter().flat_map(|e| levels_in(e)).min()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_recognizes_common_degree_spellings() {
        assert_eq!(levels_in("PhD in Physics"), vec![EducationLevel::Doctorate]);
        assert_eq!(levels_in("MSc Data Science"), vec![EducationLevel::Master]);
        assert_eq!(levels_in("Master's degree"), vec![EducationLevel::Master]);
        assert_eq!(levels_in("B.Tech CSE"), vec![EducationLevel::Bachelor]);
        assert_eq!(
            levels_in("Bachelor of Science in Artificial Intelligence"),
            vec![EducationLevel::Bachelor]
        );
        assert_eq!(levels_in("High School Diploma"), vec![EducationLevel::HighSchool]);
    }

    #[test]
    fn test_unrecognized_text_has_no_level() {
        assert!(levels_in("Coursera certificate").is_empty());
        assert_eq!(highest_level(&strings(&["self taught"])), None);
    }

    #[test]
    fn test_candidate_takes_highest() {
        let entries = strings(&["BSc Computer Science", "MSc Machine Learning"]);
        assert_eq!(highest_level(&entries), Some(EducationLevel::Master));
    }

    #[test]
    fn test_job_takes_lowest_accepted() {
        let entries = strings(&["Bachelor's or Master's in Computer Science"]);
        assert_eq!(minimum_required_level(&entries), Some(EducationLevel::Bachelor));
    }
}
