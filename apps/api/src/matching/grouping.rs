//! Chunk Grouper — reassembles job postings from an unordered list of search chunks.
//!
//! The backend gives no reliable job identity, so grouping is a heuristic.
//! It sits behind `ChunkGrouper` so an exact strategy can replace it once the
//! backend sends explicit job identifiers on every chunk.

use std::collections::HashMap;

use crate::models::matching::ScoredChunk;

/// Group key used for chunks without an identity hint when other chunks have one.
pub const UNKNOWN_JOB_KEY: &str = "unknown";

/// Chunks believed to belong to one job posting, in reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct JobGroup {
    pub key: String,
    pub chunks: Vec<ScoredChunk>,
}

impl JobGroup {
    /// Chunk contents joined by a blank line.
    pub fn text(&self) -> String {
        self.chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Mean relevance score of the group's chunks.
    pub fn retrieval_score(&self) -> f64 {
        if self.chunks.is_empty() {
            return 0.0;
        }
        self.chunks.iter().map(|c| c.score).sum::<f64>() / self.chunks.len() as f64
    }
}

/// Grouping strategy. Carried in `AppState` as `Arc<dyn ChunkGrouper>`.
pub trait ChunkGrouper: Send + Sync {
    /// Partitions `chunks` into job groups. Output order is the order in
    /// which each group was first seen.
    fn group(&self, chunks: &[ScoredChunk]) -> Vec<JobGroup>;
}

/// Metadata-driven grouping:
///
/// 1. If any chunk has a job identity hint, group strictly by it; chunks
///    without one share the `"unknown"` group.
/// 2. Otherwise chunks with the same `chunk_total > 1` form one group.
///    Chunks with `chunk_total <= 1` are complete postings on their own.
/// 3. If step 2 merged nothing, every chunk becomes its own group.
///
/// Every group is stable-sorted by `chunk_index`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicGrouper;

impl ChunkGrouper for HeuristicGrouper {
    fn group(&self, chunks: &[ScoredChunk]) -> Vec<JobGroup> {
        if chunks.is_empty() {
            return Vec::new();
        }

        let mut groups = if chunks.iter().any(|c| c.metadata.job_key().is_some()) {
            group_by_job_id(chunks)
        } else {
            let by_total = group_by_chunk_total(chunks);
            if by_total.len() == chunks.len() {
                singletons(chunks)
            } else {
                by_total
            }
        };

        for group in &mut groups {
            // sort_by_key is stable: equal indices keep input order
            group.chunks.sort_by_key(|c| c.metadata.index());
        }
        groups
    }
}

/// Buckets chunks by key, keeping first-seen key order.
fn bucket<F>(chunks: &[ScoredChunk], mut key_of: F) -> Vec<JobGroup>
where
    F: FnMut(usize, &ScoredChunk) -> String,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<JobGroup> = Vec::new();

    for (i, chunk) in chunks.iter().enumerate() {
        let key = key_of(i, chunk);
        match positions.get(&key) {
            Some(&pos) => groups[pos].chunks.push(chunk.clone()),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(JobGroup {
                    key,
                    chunks: vec![chunk.clone()],
                });
            }
        }
    }
    groups
}

fn group_by_job_id(chunks: &[ScoredChunk]) -> Vec<JobGroup> {
    bucket(chunks, |_, chunk| {
        chunk
            .metadata
            .job_key()
            .unwrap_or_else(|| UNKNOWN_JOB_KEY.to_string())
    })
}

fn group_by_chunk_total(chunks: &[ScoredChunk]) -> Vec<JobGroup> {
    let mut groups = bucket(chunks, |i, chunk| match chunk.metadata.total() {
        1 => format!("single:{i}"),
        total => format!("total:{total}"),
    });
    renumber(&mut groups);
    groups
}

fn singletons(chunks: &[ScoredChunk]) -> Vec<JobGroup> {
    let mut groups = bucket(chunks, |i, _| i.to_string());
    renumber(&mut groups);
    groups
}

/// Replaces internal bucket keys with `job-{n}` in emission order.
fn renumber(groups: &mut [JobGroup]) {
    for (n, group) in groups.iter_mut().enumerate() {
        group.key = format!("job-{n}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::matching::ChunkMetadata;
    use serde_json::json;

    fn chunk(content: &str, index: Option<i64>, total: Option<i64>) -> ScoredChunk {
        ScoredChunk {
            score: 0.5,
            content: content.to_string(),
            metadata: ChunkMetadata {
                chunk_index: index,
                chunk_total: total,
                ..Default::default()
            },
        }
    }

    fn chunk_with_job(content: &str, job_id: &str, index: i64) -> ScoredChunk {
        ScoredChunk {
            score: 0.5,
            content: content.to_string(),
            metadata: ChunkMetadata {
                job_id: Some(json!(job_id)),
                chunk_index: Some(index),
                chunk_total: Some(2),
                ..Default::default()
            },
        }
    }

    fn contents(group: &JobGroup) -> Vec<&str> {
        group.chunks.iter().map(|c| c.content.as_str()).collect()
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        assert!(HeuristicGrouper.group(&[]).is_empty());
    }

    #[test]
    fn test_distinct_job_ids_give_one_group_each() {
        let chunks = vec![
            chunk_with_job("a", "J1", 0),
            chunk_with_job("b", "J2", 0),
            chunk_with_job("c", "J3", 0),
        ];
        let groups = HeuristicGrouper.group(&chunks);
        assert_eq!(groups.len(), 3);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["J1", "J2", "J3"]);
    }

    #[test]
    fn test_same_job_id_sorted_by_chunk_index() {
        let chunks = vec![
            chunk_with_job("second", "J1", 1),
            chunk_with_job("first", "J1", 0),
        ];
        let groups = HeuristicGrouper.group(&chunks);
        assert_eq!(groups.len(), 1);
        assert_eq!(contents(&groups[0]), vec!["first", "second"]);
        assert_eq!(groups[0].text(), "first\n\nsecond");
    }

    #[test]
    fn test_chunks_without_hint_go_to_unknown_bucket() {
        let chunks = vec![
            chunk("orphan", Some(0), Some(1)),
            chunk_with_job("owned", "J1", 0),
            chunk("orphan2", Some(0), Some(1)),
        ];
        let groups = HeuristicGrouper.group(&chunks);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, UNKNOWN_JOB_KEY);
        assert_eq!(contents(&groups[0]), vec!["orphan", "orphan2"]);
        assert_eq!(groups[1].key, "J1");
    }

    #[test]
    fn test_uniform_chunk_total_one_never_merges() {
        let chunks = vec![
            chunk("a", Some(0), Some(1)),
            chunk("b", Some(0), Some(1)),
            chunk("c", None, None),
        ];
        let groups = HeuristicGrouper.group(&chunks);
        assert_eq!(groups.len(), 3);
        for (group, expected) in groups.iter().zip(["a", "b", "c"]) {
            assert_eq!(contents(group), vec![expected]);
        }
    }

    #[test]
    fn test_shared_chunk_total_merges_in_index_order() {
        let chunks = vec![
            chunk("part-2", Some(2), Some(3)),
            chunk("solo", Some(0), Some(1)),
            chunk("part-0", Some(0), Some(3)),
            chunk("part-1", Some(1), Some(3)),
        ];
        let groups = HeuristicGrouper.group(&chunks);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "job-0");
        assert_eq!(contents(&groups[0]), vec!["part-0", "part-1", "part-2"]);
        assert_eq!(contents(&groups[1]), vec!["solo"]);
    }

    #[test]
    fn test_discriminating_chunk_total_falls_back_to_singletons() {
        let chunks = vec![
            chunk("a", Some(1), Some(2)),
            chunk("b", Some(0), Some(3)),
            chunk("c", Some(0), Some(4)),
        ];
        let groups = HeuristicGrouper.group(&chunks);
        assert_eq!(groups.len(), 3);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["job-0", "job-1", "job-2"]);
        assert_eq!(contents(&groups[2]), vec!["c"]);
    }

    #[test]
    fn test_index_ties_keep_input_order() {
        let chunks = vec![
            chunk("x", None, Some(2)),
            chunk("y", Some(0), Some(2)),
            chunk("z", None, Some(2)),
        ];
        let groups = HeuristicGrouper.group(&chunks);
        assert_eq!(groups.len(), 1);
        assert_eq!(contents(&groups[0]), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_retrieval_score_is_mean() {
        let mut a = chunk("a", Some(0), Some(2));
        a.score = 0.9;
        let mut b = chunk("b", Some(1), Some(2));
        b.score = 0.5;
        let group = JobGroup {
            key: "job-0".to_string(),
            chunks: vec![a, b],
        };
        assert!((group.retrieval_score() - 0.7).abs() < 1e-9);
    }
}
