//! Skill Comparator — splits a job's skills into those the candidate has and those missing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillComparison {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

impl SkillComparison {
    /// Fraction of job skills the candidate has; 0 when the job lists none.
    pub fn match_ratio(&self) -> f64 {
        let total = self.matched.len() + self.missing.len();
        if total == 0 {
            0.0
        } else {
            self.matched.len() as f64 / total as f64
        }
    }
}

/// Lowercases and drops every non-alphanumeric character: "Node.js" → "nodejs".
pub fn normalize_skill(skill: &str) -> String {
    skill
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Both sides must already be normalized and non-empty.
fn skills_match(job: &str, candidate: &str) -> bool {
    job == candidate || job.contains(candidate) || candidate.contains(job)
}

/// Partitions `job_skills` into matched and missing, preserving job order.
///
/// A job skill matches when its normalized form equals, contains, or is
/// contained in any candidate skill's normalized form.
pub fn compare_skills(candidate_skills: &[String], job_skills: &[String]) -> SkillComparison {
    let candidates: Vec<String> = candidate_skills
        .iter()
        .map(|s| normalize_skill(s))
        .filter(|s| !s.is_empty())
        .collect();

    let mut comparison = SkillComparison::default();
    for skill in job_skills {
        let normalized = normalize_skill(skill);
        let is_match = if normalized.is_empty() {
            // Punctuation-only skills can only match literally.
            candidate_skills
                .iter()
                .any(|c| c.trim().eq_ignore_ascii_case(skill.trim()))
        } else {
            candidates.iter().any(|c| skills_match(&normalized, c))
        };

        if is_match {
            comparison.matched.push(skill.clone());
        } else {
            comparison.missing.push(skill.clone());
        }
    }
    comparison
}
