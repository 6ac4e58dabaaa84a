pub mod extraction;
pub mod profile;
pub mod score;

pub use extraction::{DocumentRole, EmploymentSpan, ExtractedFields, ExtractionResult};
pub use profile::{
    CandidateProfile, Confidence, Contact, EducationLevel, JobRequirement, NormalizedFields,
    Provenance,
};
pub use score::{
    Dimension, DimensionScore, ExcludedCandidate, ExportedResult, RankedResult, ScoreBreakdown,
};
