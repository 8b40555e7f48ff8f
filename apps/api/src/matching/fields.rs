//! Field Extractors — independent heuristics over a job group's text.
//!
//! Each extractor is a pure function from text to an optional value so it
//! can be tested on its own.

use once_cell::sync::Lazy;
use regex::Regex;

/// Title used when no heuristic finds one.
pub const PLACEHOLDER_TITLE: &str = "Job Opportunity";

const MAX_TITLE_CHARS: usize = 99;
const MIN_LINE_TITLE_CHARS: usize = 10;

/// Trailing qualifier clauses dropped from titles ("... Engineer with 5 years").
const TITLE_QUALIFIERS: &[&str] = &[" with ", " for ", " at ", " in "];

static EXPERIENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*\+?\s*years?\s*(?:of\s*)?experience")
        .expect("valid experience regex")
});

/// "Summary", "Role Overview", "Summary / Role Overview", "Position:", "Job Title: X".
static TITLE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:[a-z]+\s+)?(?:summary|role overview|position|title)(?:\s*/\s*[a-z ]+?)?\s*(?::\s*(.*))?$",
    )
    .expect("valid title heading regex")
});

/// Title shapes tried in order: discipline + role noun, then seniority + role noun.
static TITLE_SHAPES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:(?:senior|junior|lead|staff|principal)\s+)?(?:machine learning|ml|ai|data science|data|software|backend|back-end|frontend|front-end|full[ -]stack|devops|platform|cloud|mobile)\s+(?:engineer|developer|specialist|analyst|scientist|architect)\b",
        r"(?i)\b(?:senior|junior|lead|staff|principal)\s+(?:engineer|developer|manager|architect)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid title shape regex"))
    .collect()
});

static ROLE_NOUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:engineer|developer|manager|analyst|specialist|architect)")
        .expect("valid role noun regex")
});

static BOLD_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\*[^*]*\*\*\s*:?\s*").expect("valid bold label regex"));

/// A bold label ending in a colon, e.g. `**Role:**` or `**Role**:`.
static COLON_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\*\*[^*]*:\*\*|\*\*[^*]*\*\*\s*:)\s*").expect("valid colon label regex")
});

static SUMMARY_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:summary|overview)\b").expect("valid summary regex"));

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n").expect("valid paragraph regex"));

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

/// Largest "<n>+ years of experience" figure in `text`, or `None` if the
/// posting states no requirement.
pub fn extract_experience_years(text: &str) -> Option<u32> {
    EXPERIENCE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .max()
}

// ────────────────────────────────────────────────────────────────────────────
// Title
// ────────────────────────────────────────────────────────────────────────────

/// Best-effort job title; never empty.
pub fn extract_title(text: &str) -> String {
    title_from_heading(text)
        .or_else(|| title_from_shape(text))
        .or_else(|| title_from_lines(text))
        .map(|t| truncate_qualifiers(&t))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string())
}

/// The line after a Summary / Role Overview / Position / Title heading.
pub fn title_from_heading(text: &str) -> Option<String> {
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        let heading = strip_emphasis(line.trim().trim_start_matches('#').trim());
        let Some(caps) = TITLE_HEADING.captures(&heading) else {
            continue;
        };

        let inline = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        let candidate = if inline.is_empty() {
            lines.find(|l| !l.trim().is_empty())?.to_string()
        } else {
            inline.to_string()
        };
        return accept_title(&candidate);
    }
    None
}

fn accept_title(raw: &str) -> Option<String> {
    let cleaned = strip_emphasis(COLON_LABEL.replace(raw.trim(), "").trim());
    let cleaned = cleaned.trim_start_matches(['#', '-', '•']).trim();
    let title = first_sentence(cleaned).trim();
    let len = title.chars().count();
    (1..=MAX_TITLE_CHARS).contains(&len).then(|| title.to_string())
}

/// First match of a known job-title shape, e.g. "Senior Backend Engineer".
pub fn title_from_shape(text: &str) -> Option<String> {
    TITLE_SHAPES
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str().trim().to_string())
}

/// First reasonably short line that names a role.
pub fn title_from_lines(text: &str) -> Option<String> {
    text.lines()
        .map(|line| {
            let line = line.trim().trim_start_matches('#').trim();
            BOLD_LABEL.replace(line, "").trim().to_string()
        })
        .find(|line| {
            let len = line.chars().count();
            (MIN_LINE_TITLE_CHARS..=MAX_TITLE_CHARS).contains(&len) && ROLE_NOUN.is_match(line)
        })
}

/// Cuts `title` at the first " with ", " for ", " at " or " in ".
pub fn truncate_qualifiers(title: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `title`.
    let lower = title.to_ascii_lowercase();
    let cut = TITLE_QUALIFIERS
        .iter()
        .filter_map(|q| lower.find(q))
        .min()
        .unwrap_or(title.len());
    title[..cut].trim().to_string()
}

fn strip_emphasis(text: &str) -> String {
    text.replace("**", "")
        .replace("__", "")
        .trim_matches(|c: char| c == '*' || c == '_')
        .trim()
        .to_string()
}

/// Text up to the first `.`, `!` or `?` that ends a sentence. A dot inside a
/// word ("Node.js") is not a terminator.
fn first_sentence(text: &str) -> &str {
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            match chars.peek() {
                None => return &text[..i],
                Some((_, next)) if next.is_whitespace() => return &text[..i],
                _ => {}
            }
        }
    }
    text
}

// ────────────────────────────────────────────────────────────────────────────
// Summary
// ────────────────────────────────────────────────────────────────────────────

/// First paragraph that mentions a summary or overview.
pub fn extract_summary(text: &str) -> Option<String> {
    PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .find(|p| !p.is_empty() && SUMMARY_MARKER.is_match(p))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRUCTURED_JD: &str = r#"
**Summary / Role Overview**
**Backend Engineer** for our payments platform. You will own APIs.

**Skills**
- Rust, PostgreSQL

5+ years of experience required; 3 years experience with Kafka preferred.
"#;

    #[test]
    fn test_experience_takes_maximum() {
        assert_eq!(extract_experience_years(STRUCTURED_JD), Some(5));
        assert_eq!(
            extract_experience_years("2 years experience, ideally 7+ years of experience"),
            Some(7)
        );
    }

    #[test]
    fn test_experience_unknown_when_absent() {
        assert_eq!(extract_experience_years("Join a friendly team"), None);
    }

    #[test]
    fn test_experience_number_glued_to_preceding_text() {
        assert_eq!(extract_experience_years("x5 years experience"), Some(5));
        assert_eq!(extract_experience_years("Level:3+ years of experience"), Some(3));
    }

    #[test]
    fn test_experience_ignores_overflowing_numbers() {
        assert_eq!(
            extract_experience_years("99999999999 years experience or 4 years experience"),
            Some(4)
        );
    }

    #[test]
    fn test_title_from_heading_strips_markdown_and_qualifiers() {
        assert_eq!(extract_title(STRUCTURED_JD), "Backend Engineer");
    }

    #[test]
    fn test_title_heading_with_inline_value() {
        let text = "Job Title: Staff Data Engineer at Acme\nLocation: Remote";
        assert_eq!(extract_title(text), "Staff Data Engineer");
    }

    #[test]
    fn test_title_keeps_dotted_words() {
        assert_eq!(
            title_from_heading("Position\nNode.js Developer. Remote friendly").as_deref(),
            Some("Node.js Developer")
        );
    }

    #[test]
    fn test_title_heading_rejects_long_candidates() {
        let long = "a".repeat(120);
        let text = format!("Summary\n{long}");
        assert!(title_from_heading(&text).is_none());
    }

    #[test]
    fn test_title_from_shape() {
        let text = "We are hiring a senior machine learning engineer to scale inference.";
        assert_eq!(extract_title(text), "senior machine learning engineer");
    }

    #[test]
    fn test_title_from_seniority_and_role() {
        let text = "Our team needs a Lead Architect who loves distributed systems.";
        assert_eq!(extract_title(text), "Lead Architect");
    }

    #[test]
    fn test_title_from_role_line() {
        let text = "Acme Corp\nQuality Assurance Analyst in Berlin\nApply now";
        assert_eq!(extract_title(text), "Quality Assurance Analyst");
    }

    #[test]
    fn test_title_placeholder() {
        assert_eq!(extract_title("Great benefits and snacks."), PLACEHOLDER_TITLE);
        assert_eq!(extract_title(""), PLACEHOLDER_TITLE);
    }

    #[test]
    fn test_truncate_qualifiers_is_case_insensitive() {
        assert_eq!(truncate_qualifiers("Data Analyst WITH SQL"), "Data Analyst");
        assert_eq!(
            truncate_qualifiers("Engineer in Paris for Acme"),
            "Engineer"
        );
        assert_eq!(truncate_qualifiers("Platform Engineer"), "Platform Engineer");
    }

    #[test]
    fn test_summary_paragraph() {
        let text = "Intro line\n\nRole Overview: build pipelines.\nMore detail.\n\nSkills: Python";
        assert_eq!(
            extract_summary(text).as_deref(),
            Some("Role Overview: build pipelines.\nMore detail.")
        );
        assert!(extract_summary("Skills: Python").is_none());
    }
}
