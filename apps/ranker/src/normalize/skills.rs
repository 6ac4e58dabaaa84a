use std::collections::{BTreeMap, BTreeSet};

/// Canonical surface form: lower-cased, trimmed, inner whitespace collapsed,
/// trailing sentence punctuation dropped.
pub fn clean_token(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .trim_end_matches(['.', ',', ';', ':'])
        .to_string()
}

/// Skill canonicalizer backed by an alias → canonical table.
#[derive(Debug, Clone, Default)]
pub struct SkillCanonicalizer {
    synonyms: BTreeMap<String, String>,
}

impl SkillCanonicalizer {
    pub fn new(synonyms: &BTreeMap<String, String>) -> Self {
        let synonyms = synonyms
            .iter()
            .map(|(alias, canonical)| (clean_token(alias), clean_token(canonical)))
            .filter(|(alias, canonical)| !alias.is_empty() && !canonical.is_empty())
            .collect();
        Self { synonyms }
    }

    /// Returns `None` for blank input.
    pub fn canonical(&self, raw: &str) -> Option<String> {
        let cleaned = clean_token(raw);
        if cleaned.is_empty() {
            return None;
        }
        Some(self.synonyms.get(&cleaned).cloned().unwrap_or(cleaned))
    }

    pub fn canonical_set(&self, raw: &[String]) -> BTreeSet<String> {
        raw.iter().filter_map(|s| self.canonical(s)).collect()
    }

    /// Canonicalizes skills and attaches importance weights. When two aliases
    /// collapse to one skill the larger weight wins. Missing or non-positive
    /// weights count as 1.0.
    pub fn weighted(
        &self,
        raw: &[String],
        importance: &BTreeMap<String, f64>,
    ) -> BTreeMap<String, f64> {
        let importance: BTreeMap<String, f64> = importance
            .iter()
            .filter_map(|(skill, weight)| self.canonical(skill).map(|s| (s, *weight)))
            .collect();

        let mut weighted = BTreeMap::new();
        for skill in raw.iter().filter_map(|s| self.canonical(s)) {
            let weight = importance
                .get(&skill)
                .copied()
                .filter(|w| w.is_finite() && *w > 0.0)
                .unwrap_or(1.0);
            weighted
                .entry(skill)
                .and_modify(|existing: &mut f64| *existing = existing.max(weight))
                .or_insert(weight);
        }
        weighted
    }
}
