use serde::{Deserialize, Serialize};

/// Parsed resume profile of a candidate, as produced by the upload backend.
///
/// Only `years_of_experience` and `skills` drive matching; the free-text
/// fields ride along so callers can echo the profile back unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeData {
    pub years_of_experience: u32,
    /// Case preserved. Upstream parsers sometimes repeat entries; matching tolerates that.
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub technical_experience: String,
    #[serde(default)]
    pub summary: Option<String>,
}
