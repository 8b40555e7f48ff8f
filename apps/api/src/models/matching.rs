use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::job::JobData;

/// Metadata attached to a search chunk by the backend. Every key is optional.
///
/// Built by the engine from the raw JSON, which accepts `chunkIndex`,
/// `chunkTotal` and `jobId` as aliases. Unrecognised keys land in `extra`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMetadata {
    pub chunk_type: Option<String>,
    pub chunk_index: Option<i64>,
    pub chunk_total: Option<i64>,
    /// Job identity hint. Backends send either a string or a number.
    pub job_id: Option<Value>,
    /// Older backends put the job identity under a bare `id` key.
    pub id: Option<Value>,
    pub extra: Map<String, Value>,
}

impl ChunkMetadata {
    /// The raw identity hint, `job_id` taking precedence over `id`.
    pub fn identity_hint(&self) -> Option<&Value> {
        self.job_id
            .as_ref()
            .filter(|v| !v.is_null())
            .or_else(|| self.id.as_ref().filter(|v| !v.is_null()))
    }

    /// The identity hint as a group key. Empty strings count as absent.
    pub fn job_key(&self) -> Option<String> {
        match self.identity_hint()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn index(&self) -> i64 {
        self.chunk_index.unwrap_or(0)
    }

    /// Expected group size; missing or zero means a self-contained chunk.
    pub fn total(&self) -> i64 {
        match self.chunk_total {
            Some(t) if t > 0 => t,
            _ => 1,
        }
    }
}

/// One scored text fragment returned by the backend's vector search.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub score: f64,
    pub content: String,
    pub metadata: ChunkMetadata,
}

/// A reconciled job match, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job: JobData,
    pub match_score: u32,
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub experience_match: bool,
}

/// The decoded `results` payload of a match response.
///
/// Current backends return raw search chunks; older ones returned fully
/// reconciled results.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchPayload {
    Reconciled(Vec<MatchResult>),
    Chunks(Vec<ScoredChunk>),
}

/// Response envelope of the backend's resume-match endpoint.
///
/// `results` stays raw JSON so a badly typed entry is reported by the engine
/// with its field path instead of failing the whole envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub results: Option<Vec<Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_defaults_when_missing() {
        let meta = ChunkMetadata::default();
        assert_eq!(meta.index(), 0);
        assert_eq!(meta.total(), 1);
        assert!(meta.job_key().is_none());
    }

    #[test]
    fn test_numeric_id_falls_back_from_job_id() {
        let meta = ChunkMetadata {
            job_id: Some(Value::Null),
            id: Some(json!(42)),
            ..Default::default()
        };
        assert_eq!(meta.job_key().as_deref(), Some("42"));
    }

    #[test]
    fn test_blank_job_id_is_not_a_key() {
        let meta = ChunkMetadata {
            job_id: Some(json!("  ")),
            ..Default::default()
        };
        assert!(meta.job_key().is_none());
    }

    #[test]
    fn test_non_positive_total_means_single_chunk() {
        let meta = ChunkMetadata {
            chunk_total: Some(0),
            ..Default::default()
        };
        assert_eq!(meta.total(), 1);
    }

    #[test]
    fn test_envelope_keeps_badly_typed_results() {
        let response: MatchResponse = serde_json::from_value(json!({
            "message": "ok",
            "status": 200,
            "results": [{"score": "high", "content": 7}]
        }))
        .unwrap();
        assert_eq!(response.results.map(|r| r.len()), Some(1));
    }

    #[test]
    fn test_reconciled_result_reads_backend_field_names() {
        let result: MatchResult = serde_json::from_value(json!({
            "job": {
                "title": "Backend Engineer",
                "description": "Build APIs",
                "parsed_data": {"years_of_experience": 3, "skills": ["Go"], "technical_experience": "", "summary": null}
            },
            "match_score": 77,
            "matched_skills": ["Go"]
        }))
        .unwrap();
        assert_eq!(result.match_score, 77);
        assert_eq!(result.job.parsed_data.years_required, Some(3));
        assert!(result.missing_skills.is_empty());
        assert!(!result.experience_match);
    }

    #[test]
    fn test_null_results_is_none() {
        let response: MatchResponse =
            serde_json::from_value(json!({"message": "none", "status": 200, "results": null}))
                .unwrap();
        assert!(response.results.is_none());
    }
}
