//! Skill Extractor — pulls a skill list out of free-form job text.
//!
//! Two passes, unioned in order: an explicit "Skills" / "Technologies"
//! section scan, then a scan for a curated technology vocabulary.

use once_cell::sync::Lazy;
use regex::Regex;

/// Known tool, language, framework and ML names used as a fallback detector.
pub const TECH_VOCABULARY: &[&str] = &[
    "Python",
    "Java",
    "JavaScript",
    "TypeScript",
    "Node.js",
    "Rust",
    "Golang",
    "Django",
    "Flask",
    "FastAPI",
    "DRF",
    "Spring",
    "React",
    "Vue",
    "Angular",
    "Next.js",
    "TensorFlow",
    "PyTorch",
    "scikit-learn",
    "Keras",
    "SQL",
    "PostgreSQL",
    "MySQL",
    "MongoDB",
    "Redis",
    "Kafka",
    "AWS",
    "GCP",
    "Azure",
    "SageMaker",
    "S3",
    "EC2",
    "Lambda",
    "Docker",
    "Kubernetes",
    "Terraform",
    "CI/CD",
    "LLMs",
    "LLM",
    "RAG",
    "LangChain",
    "Hugging Face",
    "Pandas",
    "NumPy",
    "Matplotlib",
    "Git",
    "REST",
    "GraphQL",
    "gRPC",
    "MLOps",
    "Data Pipeline",
    "Vector Database",
    "pgvector",
    "Chroma",
    "Supabase",
    "Groq",
    "Llama",
    "SentenceTransformers",
    "MCP",
];

/// Lines longer than this are prose, not skill lists.
const MAX_SKILL_LINE_CHARS: usize = 100;
/// Accepted skill token length, in characters (exclusive bounds 1 and 50).
const MIN_SKILL_CHARS: usize = 2;
const MAX_SKILL_CHARS: usize = 49;

/// "Skills", "Technical Skills", "Skills / Technologies", "Technologies:" ...
/// Matched against a line with leading `#` and `**` already removed.
static SKILLS_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:[a-z]+\s+){0,2}?(?:skills|technologies)(?:\s*(?:/|&|and)\s*(?:skills|technologies|tools))?\s*(?:\*\*)?\s*(?::|$)",
    )
    .expect("valid skills heading regex")
});

/// A bold label at the start of a line, e.g. `**Languages:**`.
static BOLD_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\*[^*]*\*\*\s*:?\s*").expect("valid bold label regex"));

/// A line made only of a bold label, or a plain label ending in a colon.
static SUBHEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\*\*[^*]+\*\*\s*:?|[A-Za-z][A-Za-z /&]{0,40}:)$")
        .expect("valid subheading regex")
});

static VOCABULARY_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    TECH_VOCABULARY
        .iter()
        .map(|&term| (term, word_pattern(term)))
        .collect()
});

/// Builds a case-insensitive whole-word pattern. Boundaries are only
/// asserted next to word characters so terms like `CI/CD` still match.
fn word_pattern(term: &str) -> Regex {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let lead = if term.starts_with(is_word) { r"\b" } else { "" };
    let tail = if term.ends_with(is_word) { r"\b" } else { "" };
    Regex::new(&format!("(?i){lead}{}{tail}", regex::escape(term)))
        .expect("escaped vocabulary term is a valid regex")
}

/// Extracts an ordered, case-insensitively de-duplicated skill list.
/// The first casing seen wins.
pub fn extract_skills(text: &str) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();

    for candidate in section_skills(text) {
        push_unique(&mut skills, candidate);
    }
    for term in vocabulary_skills(text) {
        push_unique(&mut skills, term.to_string());
    }

    skills
}

fn push_unique(skills: &mut Vec<String>, candidate: String) {
    let lower = candidate.to_lowercase();
    if !skills.iter().any(|s| s.to_lowercase() == lower) {
        skills.push(candidate);
    }
}

/// Vocabulary terms that occur in `text`, in vocabulary order.
pub fn vocabulary_skills(text: &str) -> Vec<&'static str> {
    VOCABULARY_PATTERNS
        .iter()
        .filter(|(_, pattern)| pattern.is_match(text))
        .map(|(term, _)| *term)
        .collect()
}

/// Candidate skills read from every skills section in `text`.
pub fn section_skills(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut skills = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(inline) = heading_remainder(lines[i]) else {
            i += 1;
            continue;
        };
        i += 1;

        // "Skills: Python, AWS" is a complete section on its own.
        if !inline.is_empty() {
            skills.extend(split_skill_line(inline));
            continue;
        }

        while i < lines.len() && lines[i].trim().is_empty() {
            i += 1;
        }
        while i < lines.len() {
            let line = lines[i].trim();
            if line.is_empty() || is_block_boundary(line) {
                break;
            }
            skills.extend(split_skill_line(line));
            i += 1;
        }
    }

    skills
}

/// If `line` is a skills heading, returns whatever follows it on the same line.
fn heading_remainder(line: &str) -> Option<&str> {
    let stripped = line.trim().trim_start_matches('#').trim_start();
    let stripped = stripped.strip_prefix("**").unwrap_or(stripped);
    let m = SKILLS_HEADING.find(stripped)?;
    let rest = stripped[m.end()..].trim();
    Some(rest.strip_prefix("**").unwrap_or(rest).trim())
}

fn is_block_boundary(line: &str) -> bool {
    line.starts_with('#') || SUBHEADING.is_match(line) || heading_remainder(line).is_some()
}

/// Splits one skill line into candidate tokens.
fn split_skill_line(line: &str) -> Vec<String> {
    let line = strip_bullet(line.trim());
    let line = BOLD_LABEL.replace(line, "");
    let line = line.replace("**", "");
    let line = line.trim();

    if line.chars().count() > MAX_SKILL_LINE_CHARS {
        return Vec::new();
    }

    line.split(',')
        .map(|token| token.trim().trim_end_matches('.').trim())
        .filter(|token| {
            let len = token.chars().count();
            (MIN_SKILL_CHARS..=MAX_SKILL_CHARS).contains(&len)
        })
        .map(str::to_string)
        .collect()
}

fn strip_bullet(line: &str) -> &str {
    for marker in ["- ", "• ", "* ", "-", "•"] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest.trim_start();
        }
    }
    line
}
