// Shared prompt constants for structured extraction.
// Resume and job prompts share the JSON-only system instruction.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured information extractor. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Resume extraction prompt. Replace `{text}` before sending.
pub const RESUME_EXTRACTION_PROMPT: &str = r#"Extract structured information from the resume below.

IMPORTANT: Be careful with the name. Return the person's actual name, never a
programming language, company, or section heading.

Return a JSON object with this EXACT schema (no extra fields):
{
  "name": "Full name of the person",
  "email": "Email address or null",
  "phone": "Phone number or null",
  "location": "City and region/country or null",
  "skills": ["skill1", "skill2"],
  "employment": [
    {"title": "Job title", "start": "YYYY-MM", "end": "YYYY-MM or Present"}
  ],
  "years_of_experience": 0,
  "education": ["Degree and field, e.g. 'MSc Computer Science'"],
  "certifications": ["cert1"],
  "titles": ["Most recent job title"],
  "projects": ["Short project name"]
}

Resume text:
{text}

Return only the JSON object:"#;

/// Job description extraction prompt. Replace `{text}` before sending.
pub const JOB_EXTRACTION_PROMPT: &str = r#"Extract the requirements from the job description below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "skills": ["required skill1", "required skill2"],
  "skill_importance": {"required skill1": 1.0},
  "min_experience_years": 0,
  "education": ["Minimum degree required, e.g. 'Bachelor'"],
  "certifications": ["required cert"],
  "titles": ["Job title being hired for"]
}

Use skill_importance only when the description clearly marks some skills as
more important than others (1.0 = normal, 2.0 = critical). Omit it otherwise.

Job description:
{text}

Return only the JSON object:"#;
