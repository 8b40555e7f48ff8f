//! Match Engine — turns a vector-search response into ranked job matches.
//!
//! Pipeline: decode → validate → group → extract (skills, title, experience, summary)
//! → compare skills → compose score → rank. Pure and synchronous: no I/O,
//! no shared mutable state.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::matching::comparator::compare_skills;
use crate::matching::fields::{extract_experience_years, extract_summary, extract_title};
use crate::matching::grouping::{ChunkGrouper, JobGroup};
use crate::matching::scoring::{compose_score, rank_results, MAX_SCORE};
use crate::matching::skills::extract_skills;
use crate::models::job::{JobData, ParsedJob};
use crate::models::matching::{
    ChunkMetadata, MatchPayload, MatchResponse, MatchResult, ScoredChunk,
};
use crate::models::resume::ResumeData;

/// Raised when a chunk carries a value of the wrong shape. Nothing has been
/// computed when this is returned.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid input at {field}: {reason}")]
pub struct InvalidInputError {
    pub field: String,
    pub reason: String,
}

impl InvalidInputError {
    fn new(field: String, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Decoding
// ────────────────────────────────────────────────────────────────────────────

/// Decodes the raw `results` array. The first entry decides the shape: an
/// object carrying both `job` and `match_score` means the backend already
/// reconciled the list, anything else is read as search chunks.
pub fn decode_payload(results: &[Value]) -> Result<MatchPayload, InvalidInputError> {
    let reconciled = results
        .first()
        .and_then(Value::as_object)
        .is_some_and(|obj| obj.contains_key("job") && obj.contains_key("match_score"));

    if reconciled {
        let decoded = results
            .iter()
            .enumerate()
            .map(|(i, value)| decode_result(i, value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MatchPayload::Reconciled(decoded))
    } else {
        let decoded = results
            .iter()
            .enumerate()
            .map(|(i, value)| decode_chunk(i, value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MatchPayload::Chunks(decoded))
    }
}

fn decode_result(i: usize, value: &Value) -> Result<MatchResult, InvalidInputError> {
    let score = value.get("match_score");
    if !score
        .and_then(Value::as_u64)
        .is_some_and(|s| s <= u64::from(MAX_SCORE))
    {
        return Err(InvalidInputError::new(
            format!("results[{i}].match_score"),
            format!(
                "expected an integer score in [0, {MAX_SCORE}], got {}",
                score.unwrap_or(&Value::Null)
            ),
        ));
    }

    serde_json::from_value(value.clone())
        .map_err(|e| InvalidInputError::new(format!("results[{i}]"), e.to_string()))
}

fn decode_chunk(i: usize, value: &Value) -> Result<ScoredChunk, InvalidInputError> {
    let field = |name: &str| format!("results[{i}].{name}");

    let Some(obj) = value.as_object() else {
        return Err(InvalidInputError::new(
            format!("results[{i}]"),
            "expected a chunk object",
        ));
    };

    let score = obj
        .get("score")
        .and_then(Value::as_f64)
        .ok_or_else(|| InvalidInputError::new(field("score"), "expected a number"))?;

    let content = match obj.get("content") {
        Some(Value::String(s)) => s.clone(),
        _ => return Err(InvalidInputError::new(field("content"), "expected a string")),
    };

    let metadata = match obj.get("metadata") {
        None | Some(Value::Null) => ChunkMetadata::default(),
        Some(Value::Object(map)) => decode_metadata(i, map)?,
        Some(_) => return Err(InvalidInputError::new(field("metadata"), "expected an object")),
    };

    Ok(ScoredChunk {
        score,
        content,
        metadata,
    })
}

fn decode_metadata(i: usize, map: &Map<String, Value>) -> Result<ChunkMetadata, InvalidInputError> {
    let field = |name: &str| format!("results[{i}].metadata.{name}");
    let integer = |name: &str, value: &Value| match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| InvalidInputError::new(field(name), format!("expected an integer, got {n}"))),
        _ => Err(InvalidInputError::new(field(name), "expected an integer")),
    };

    let mut meta = ChunkMetadata::default();
    for (key, value) in map {
        match key.as_str() {
            "type" => {
                meta.chunk_type = match value {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    _ => return Err(InvalidInputError::new(field("type"), "expected a string")),
                }
            }
            "chunk_index" | "chunkIndex" => meta.chunk_index = integer("chunk_index", value)?,
            "chunk_total" | "chunkTotal" => meta.chunk_total = integer("chunk_total", value)?,
            "job_id" | "jobId" => meta.job_id = Some(value.clone()),
            "id" => meta.id = Some(value.clone()),
            _ => {
                meta.extra.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(meta)
}

// ────────────────────────────────────────────────────────────────────────────
// Reconciliation
// ────────────────────────────────────────────────────────────────────────────

/// Checks every chunk before any processing starts.
pub fn validate_chunks(chunks: &[ScoredChunk]) -> Result<(), InvalidInputError> {
    for (i, chunk) in chunks.iter().enumerate() {
        if !chunk.score.is_finite() || !(0.0..=1.0).contains(&chunk.score) {
            return Err(InvalidInputError::new(
                format!("results[{i}].score"),
                format!("expected a relevance score in [0, 1], got {}", chunk.score),
            ));
        }

        let meta = &chunk.metadata;
        if let Some(index) = meta.chunk_index.filter(|v| *v < 0) {
            return Err(InvalidInputError::new(
                format!("results[{i}].metadata.chunk_index"),
                format!("must not be negative, got {index}"),
            ));
        }
        if let Some(total) = meta.chunk_total.filter(|v| *v < 0) {
            return Err(InvalidInputError::new(
                format!("results[{i}].metadata.chunk_total"),
                format!("must not be negative, got {total}"),
            ));
        }

        for (name, hint) in [("job_id", &meta.job_id), ("id", &meta.id)] {
            if let Some(value) = hint {
                if !matches!(value, Value::Null | Value::String(_) | Value::Number(_)) {
                    return Err(InvalidInputError::new(
                        format!("results[{i}].metadata.{name}"),
                        "job identity must be a string or a number",
                    ));
                }
            }
        }
    }
    Ok(())
}

/// Reconciles raw search chunks into match results, best match first.
pub fn reconcile_chunks(
    chunks: &[ScoredChunk],
    profile: &ResumeData,
    grouper: &dyn ChunkGrouper,
) -> Result<Vec<MatchResult>, InvalidInputError> {
    validate_chunks(chunks)?;

    let groups = grouper.group(chunks);
    debug!(
        "Grouped {} chunks into {} jobs",
        chunks.len(),
        groups.len()
    );

    let mut results: Vec<MatchResult> = groups
        .iter()
        .map(|group| build_match(group, profile))
        .collect();
    rank_results(&mut results);
    Ok(results)
}

/// Reconciles a full backend response. Results that the backend already
/// reconciled are checked and re-ranked; a missing payload yields no results.
pub fn reconcile_response(
    response: &MatchResponse,
    profile: &ResumeData,
    grouper: &dyn ChunkGrouper,
) -> Result<Vec<MatchResult>, InvalidInputError> {
    let results = match &response.results {
        None => return Ok(Vec::new()),
        Some(results) => results,
    };

    match decode_payload(results)? {
        MatchPayload::Reconciled(mut results) => {
            rank_results(&mut results);
            Ok(results)
        }
        MatchPayload::Chunks(chunks) => reconcile_chunks(&chunks, profile, grouper),
    }
}

/// Derives the structured fields of one job from its group text.
pub fn parse_job(text: &str) -> ParsedJob {
    ParsedJob {
        title: extract_title(text),
        skills: extract_skills(text),
        years_required: extract_experience_years(text),
        summary: extract_summary(text),
    }
}

fn build_match(group: &JobGroup, profile: &ResumeData) -> MatchResult {
    let description = group.text();
    let parsed = parse_job(&description);

    let comparison = compare_skills(&profile.skills, &parsed.skills);
    let experience_match = parsed
        .years_required
        .map_or(true, |required| profile.years_of_experience >= required);
    let match_score = compose_score(
        group.retrieval_score(),
        comparison.match_ratio(),
        experience_match,
    );

    MatchResult {
        job: JobData {
            id: Some(group.key.clone()),
            title: parsed.title.clone(),
            description,
            parsed_data: parsed,
        },
        match_score,
        matched_skills: comparison.matched,
        missing_skills: comparison.missing,
        experience_match,
    }
}
