//! Pattern-based extraction. Purely local, never fails: a field it cannot
//! find comes back empty.

use std::collections::HashSet;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::BackendError;
use crate::extraction::ExtractionBackend;
use crate::models::{DocumentRole, EmploymentSpan, ExtractedFields, ExtractionResult};
use crate::normalize::education::levels_in;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("static email pattern")
});

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?(?:\(?\d{2,4}\)?[-.\s]?)?\d{3,4}[-.\s]?\d{4}")
        .expect("static phone pattern")
});

static STATED_YEARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b(\d{1,2}(?:\.\d)?)\s*\+?\s*(?:years?|yrs?)\s*",
        r"(?:of\s+)?(?:\w+\s+)?(?:experience|exp)\b",
    ))
    .expect("static years pattern")
});

/// Job minimums, most specific phrasing first.
static MIN_YEARS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:at\s+least|minimum(?:\s+of)?)\s+(\d{1,2})\s*\+?\s*(?:years?|yrs?)",
        r"(?i)\b(\d{1,2})\s*\+\s*(?:years?|yrs?)",
        r"(?i)\b(\d{1,2})\s*(?:years?|yrs?)\s*(?:of\s+)?(?:\w+\s+)?(?:experience|exp)\b",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("static minimum-years pattern"))
    .collect()
});

const DATE: &str = concat!(
    r"(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+\d{4}",
    r"|\d{4}[-/]\d{1,2}|\d{1,2}/\d{4}|\d{4})",
);

static DATE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b({DATE})\s*(?:-|–|—|to|until)\s*(present|current|now|{DATE})\b"
    ))
    .expect("static date range pattern")
});

static CERTIFICATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:PMP|CISSP|CPA|ACCA|CFA|CIMA|CCNA|CCNP|CEH|CompTIA\s+[A-Za-z+]+",
        r"|(?:AWS|Azure|GCP|Google\s+Cloud)\s+Certified[^\n,;]{0,40})",
    ))
    .expect("static certification pattern")
});

static TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:(?:senior|junior|lead|principal|staff|chief)\s+)?",
        r"(?:(?:software|data|devops|frontend|backend|full[\s-]stack|machine\s+learning",
        r"|ml|ai|cloud|security|financial|tax)\s+)?",
        r"(?:engineer|developer|analyst|scientist|accountant|auditor|architect)\b",
    ))
    .expect("static title pattern")
});

/// "Skills:", "Requirements:" style lines in a job description.
static REQUIREMENT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?im)^\s*(?:required(?:\s+skills)?|requirements|must\s+have|skills|technologies",
        r"|tech\s+stack)\s*:\s*(.+)$",
    ))
    .expect("static requirement pattern")
});

static REQUIREMENT_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:experience\s+with|knowledge\s+of|proficien(?:t|cy)\s+in)\s+",
        r"([A-Za-z0-9+#./,\s]+?)(?:[.;\n]|$)",
    ))
    .expect("static requirement phrase pattern")
});

/// "Location: Berlin", "Based in: Austin, TX".
static LOCATION_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*(?:location|address|based\s+in)\s*:\s*(.+?)\s*$")
        .expect("static location label pattern")
});

/// A bare "City, Region" segment such as "San Francisco, CA".
static CITY_REGION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[A-Z][A-Za-z.'-]+(?:\s+[A-Z][A-Za-z.'-]+)*,",
        r"\s*[A-Z][A-Za-z]+(?:\s+[A-Z][A-Za-z]+)*$",
    ))
    .expect("static city pattern")
});

/// Resume section keywords, checked in order against short header lines.
const SECTION_HEADERS: &[&str] = &[
    "education",
    "experience",
    "employment",
    "work history",
    "project",
    "certification",
    "skills",
];

const EMPLOYMENT_SECTIONS: &[&str] = &["experience", "employment", "work history"];

const VOCABULARY: &[&str] = &[
    "Python", "Java", "JavaScript", "TypeScript", "C++", "C#", "Ruby", "PHP", "Golang", "Rust",
    "Swift", "Kotlin", "Scala", "R", "React", "Angular", "Vue", "Node.js", "Django", "Flask",
    "Spring Boot", "Laravel", "AWS", "Azure", "GCP", "Docker", "Kubernetes", "Jenkins", "Git",
    "Terraform", "SQL", "MySQL", "PostgreSQL", "MongoDB", "Redis", "Elasticsearch", "Spark",
    "Airflow", "Machine Learning", "Deep Learning", "NLP", "Computer Vision", "TensorFlow",
    "PyTorch", "Scikit-learn", "Data Analysis", "Data Science", "Pandas", "NumPy", "Tableau",
    "Power BI", "Excel", "HTML", "CSS", "Linux", "Bash", "GraphQL", "Microservices", "Agile",
    "Scrum", "JIRA", "IFRS", "GAAP", "SAP", "QuickBooks", "Auditing", "Bookkeeping",
    "Financial Reporting", "Taxation",
];

/// One matcher per vocabulary term. Boundaries are explicit because `\b`
/// misbehaves around terms like `C++` and `C#`.
static VOCABULARY_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    VOCABULARY
        .iter()
        .map(|term| {
            // A lone "R" is only a skill when written in capitals.
            let flags = if term.len() == 1 { "" } else { "(?i)" };
            let pattern = format!(
                r"{flags}(?:^|[^A-Za-z0-9_+#]){}(?:[^A-Za-z0-9_+#]|$)",
                regex::escape(term)
            );
            (*term, Regex::new(&pattern).expect("static vocabulary pattern"))
        })
        .collect()
});

#[derive(Debug, Clone, Default)]
pub struct RegexExtractor;

impl RegexExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_fields(&self, text: &str, role: DocumentRole) -> ExtractedFields {
        match role {
            DocumentRole::Resume => ExtractedFields {
                name: find_name(text),
                email: EMAIL.find(text).map(|m| m.as_str().to_string()),
                phone: PHONE.find(text).map(|m| m.as_str().trim().to_string()),
                location: location(text),
                skills: resume_skills(text),
                employment: employment_spans(text),
                years_of_experience: stated_years(text),
                education: degree_lines(text),
                certifications: certifications(text),
                titles: titles(text),
                projects: projects(text),
                ..Default::default()
            },
            DocumentRole::JobDescription => ExtractedFields {
                skills: job_skills(text),
                min_experience_years: minimum_years(text),
                education: degree_lines(text),
                certifications: certifications(text),
                titles: titles(text).into_iter().take(1).collect(),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl ExtractionBackend for RegexExtractor {
    fn name(&self) -> &str {
        "regex"
    }

    fn uses_llm(&self) -> bool {
        false
    }

    async fn extract(
        &self,
        text: &str,
        role: DocumentRole,
    ) -> Result<ExtractionResult, BackendError> {
        Ok(ExtractionResult::Success(self.extract_fields(text, role)))
    }
}

/// First line that looks like 2 to 4 capitalized words.
fn find_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(5)
        .find(|line| {
            let words: Vec<&str> = line.split_whitespace().collect();
            (2..=4).contains(&words.len())
                && words.iter().all(|w| {
                    w.chars().next().is_some_and(char::is_uppercase)
                        && w.chars().all(|c| c.is_alphabetic() || matches!(c, '.' | '-' | '\''))
                })
                && !line.to_lowercase().contains("resume")
        })
        .map(String::from)
}

fn resume_skills(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    if let Some(start) = lines.iter().position(|l| l.to_lowercase().contains("skills")) {
        let mut section = Vec::new();
        let header = lines[start];
        if let Some((_, rest)) = header.split_once(':') {
            section.push(rest);
        }
        for line in lines.iter().skip(start + 1).take(10) {
            if line.trim().is_empty() || section_header(line).is_some() {
                break;
            }
            section.push(line);
        }
        let skills = split_items(&section.join("\n"), usize::MAX);
        if !skills.is_empty() {
            return skills;
        }
    }
    vocabulary_matches(text)
}

fn job_skills(text: &str) -> Vec<String> {
    let mut skills = Vec::new();
    for caps in REQUIREMENT_LINE.captures_iter(text) {
        skills.extend(split_items(&caps[1], 4));
    }
    for caps in REQUIREMENT_PHRASE.captures_iter(text) {
        skills.extend(split_items(&caps[1], 4));
    }
    skills.extend(vocabulary_matches(text));
    dedup_case_insensitive(skills)
}

/// Splits a list-ish string on separators and bullets. Items longer than
/// `max_words` or containing digits are prose, not skills.
fn split_items(raw: &str, max_words: usize) -> Vec<String> {
    let items = raw
        .split(|c: char| matches!(c, ',' | ';' | '|' | '•' | '\n'))
        .flat_map(|s| s.split(" and "))
        .flat_map(|s| s.split(" or "))
        .map(|s| s.trim().trim_start_matches(['-', '*']).trim().trim_end_matches('.'))
        .map(|s| s.strip_prefix("and ").unwrap_or(s))
        .filter(|s| !s.is_empty() && s.len() <= 60)
        .filter(|s| s.split_whitespace().count() <= max_words)
        .filter(|s| max_words == usize::MAX || !s.chars().any(|c| c.is_ascii_digit()))
        .map(String::from)
        .collect();
    dedup_case_insensitive(items)
}

fn vocabulary_matches(text: &str) -> Vec<String> {
    VOCABULARY_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(term, _)| term.to_string())
        .collect()
}

fn stated_years(text: &str) -> Option<f64> {
    STATED_YEARS
        .captures_iter(text)
        .filter_map(|c| c[1].parse::<f64>().ok())
        .fold(None, |best: Option<f64>, y| Some(best.map_or(y, |b| b.max(y))))
}

fn minimum_years(text: &str) -> Option<f64> {
    MIN_YEARS
        .iter()
        .find_map(|re| re.captures(text).and_then(|c| c[1].parse::<f64>().ok()))
}

/// A short title-cased line naming a resume section, e.g. "Work Experience"
/// or "Skills: Python, SQL". Returns the matched keyword.
fn section_header(line: &str) -> Option<&'static str> {
    let head = line.split(':').next().unwrap_or_default().trim();
    let words: Vec<&str> = head.split_whitespace().collect();
    if words.is_empty()
        || words.len() > 3
        || words.iter().any(|w| w.chars().next().is_some_and(char::is_lowercase))
    {
        return None;
    }
    let lower = head.to_lowercase();
    SECTION_HEADERS.iter().copied().find(|h| lower.contains(h))
}

/// Pairs every line with the section it sits in. A header line belongs to
/// its own section; lines before the first header have none.
fn tag_sections(text: &str) -> Vec<(Option<&'static str>, &str)> {
    let mut current = None;
    text.lines()
        .map(|line| {
            if let Some(header) = section_header(line) {
                current = Some(header);
            }
            (current, line)
        })
        .collect()
}

fn is_employment_section(section: Option<&str>) -> bool {
    section.is_some_and(|s| EMPLOYMENT_SECTIONS.contains(&s))
}

/// Date ranges from the work history only. Without an experience section,
/// ranges outside other named sections count unless the line names a degree.
fn employment_spans(text: &str) -> Vec<EmploymentSpan> {
    let tagged = tag_sections(text);
    let has_employment_section = tagged.iter().any(|(s, _)| is_employment_section(*s));

    tagged
        .into_iter()
        .filter(|(section, line)| match section {
            Some(_) => is_employment_section(*section),
            None => !has_employment_section && levels_in(line).is_empty(),
        })
        .flat_map(|(_, line)| DATE_RANGE.captures_iter(line))
        .map(|c| EmploymentSpan {
            title: None,
            start: c[1].to_string(),
            end: Some(c[2].to_string()),
        })
        .collect()
}

/// Entries under a "Projects" header, or inline "Project: ..." lines.
fn projects(text: &str) -> Vec<String> {
    let items = tag_sections(text)
        .into_iter()
        .filter(|(section, _)| *section == Some("project"))
        .filter_map(|(_, line)| {
            let item = if section_header(line).is_some() {
                line.split_once(':')?.1
            } else {
                line
            };
            let item = item.trim().trim_start_matches(['-', '*', '•']).trim();
            (item.len() > 3).then(|| item.to_string())
        })
        .collect();
    dedup_case_insensitive(items)
}

/// An explicit "Location:" line wins; otherwise a "City, Region" segment in
/// the contact block at the top.
fn location(text: &str) -> Option<String> {
    if let Some(caps) = LOCATION_LABEL.captures(text) {
        return Some(caps[1].to_string());
    }
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .take(5)
        .flat_map(|l| l.split(['|', '•', '·']))
        .map(str::trim)
        .find(|segment| CITY_REGION.is_match(segment))
        .map(String::from)
}

fn degree_lines(text: &str) -> Vec<String> {
    let lines = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && l.len() <= 200 && !levels_in(l).is_empty())
        .map(String::from)
        .collect();
    dedup_case_insensitive(lines)
}

fn certifications(text: &str) -> Vec<String> {
    dedup_case_insensitive(
        CERTIFICATION
            .find_iter(text)
            .map(|m| m.as_str().trim().to_string())
            .collect(),
    )
}

fn titles(text: &str) -> Vec<String> {
    dedup_case_insensitive(
        TITLE
            .find_iter(text)
            .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
            .collect(),
    )
}

fn dedup_case_insensitive(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}
