use serde::{Deserialize, Serialize};

/// Structured fields recovered from a job posting's text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedJob {
    pub title: String,
    /// Ordered set: extraction order, no case-insensitive duplicates.
    pub skills: Vec<String>,
    /// `None` when the posting states no requirement.
    #[serde(rename = "years_of_experience", alias = "years_required")]
    pub years_required: Option<u32>,
    pub summary: Option<String>,
}

/// A job posting reconstructed from one group of search chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobData {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub parsed_data: ParsedJob,
}
