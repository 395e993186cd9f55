//! Response Parser
//!
//! Turns raw generated text into typed artifacts. Reply and summary are plain
//! trimmed text. Recommended actions go through an ordered cascade, each
//! stage an `Option`-returning attempt, first success wins:
//!
//! 1. strict JSON array of the whole (fence-stripped) text
//! 2. JSON array found inside surrounding prose
//! 3. line splitting with list-marker cleanup
//! 4. fixed generic list

use regex::Regex;
use std::sync::LazyLock;

/// Maximum number of recommended actions kept
pub const MAX_ACTIONS: usize = 3;

/// Lines at or below this many characters are not actions
const MIN_ACTION_LINE_CHARS: usize = 10;

/// Returned when no stage yields anything
pub const GENERIC_ACTIONS: [&str; 3] = [
    "Review customer feedback regularly",
    "Address specific concerns raised",
    "Follow up with customer",
];

static OPENING_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_-]*[ \t]*\r?\n?").unwrap());

static CLOSING_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r?\n?```$").unwrap());

/// First `[` through last `]`
static BRACKETED_ARRAY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\[.*\]").unwrap());

static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-•*]\s*").unwrap());

static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s*").unwrap());

/// Which cascade stage produced the actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionsSource {
    StrictJson,
    EmbeddedJson,
    Lines,
    Generic,
}

/// Reply and summary: trimmed text, nothing else
pub fn parse_text(raw: &str) -> String {
    raw.trim().to_string()
}

/// Recommended actions, 0 to 3 entries
pub fn parse_actions(raw: &str) -> Vec<String> {
    parse_actions_with_source(raw).0
}

/// Recommended actions plus the stage that produced them
pub fn parse_actions_with_source(raw: &str) -> (Vec<String>, ActionsSource) {
    let text = strip_code_fences(raw);

    if let Some(actions) = parse_strict_json(text) {
        return (actions, ActionsSource::StrictJson);
    }
    if let Some(actions) = parse_embedded_json(text) {
        return (actions, ActionsSource::EmbeddedJson);
    }
    if let Some(actions) = parse_lines(text) {
        return (actions, ActionsSource::Lines);
    }
    (generic_actions(), ActionsSource::Generic)
}

/// Remove a leading ```` ```lang ```` marker and a trailing ```` ``` ````
pub fn strip_code_fences(raw: &str) -> &str {
    let text = raw.trim();
    let text = match OPENING_FENCE_RE.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    };
    let text = match CLOSING_FENCE_RE.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    };
    text.trim()
}

/// Stage 1: the whole text is a JSON array of strings
pub fn parse_strict_json(text: &str) -> Option<Vec<String>> {
    let items: Vec<String> = serde_json::from_str(text.trim()).ok()?;
    first_entries(items)
}

/// Stage 2: a JSON array of strings somewhere inside the text
pub fn parse_embedded_json(text: &str) -> Option<Vec<String>> {
    let candidate = BRACKETED_ARRAY_RE.find(text)?;
    let items: Vec<String> = serde_json::from_str(candidate.as_str()).ok()?;
    first_entries(items)
}

/// Stage 3: one action per meaningful line
pub fn parse_lines(text: &str) -> Option<Vec<String>> {
    let lines: Vec<String> = text
        .lines()
        .map(clean_line)
        .filter(|line| {
            line.chars().count() > MIN_ACTION_LINE_CHARS
                && !line.starts_with('[')
                && !line.starts_with('{')
        })
        .take(MAX_ACTIONS)
        .collect();

    (!lines.is_empty()).then_some(lines)
}

/// Stage 4
pub fn generic_actions() -> Vec<String> {
    GENERIC_ACTIONS.iter().map(|s| s.to_string()).collect()
}

fn clean_line(line: &str) -> String {
    let line = line.trim();
    let line = BULLET_RE.replace(line, "");
    let line = NUMBERED_RE.replace(&line, "");
    strip_wrapping_quotes(line.trim()).trim().to_string()
}

/// `"text"`, `"text",`, `'text'` and a dangling `"text` all become `text`.
/// Leading and trailing quotes are removed independently.
fn strip_wrapping_quotes(line: &str) -> &str {
    let line = line.strip_suffix(',').unwrap_or(line);
    let line = line.strip_prefix(['"', '\'']).unwrap_or(line);
    line.strip_suffix(['"', '\'']).unwrap_or(line)
}

/// First entries of a non-empty array, as they are
fn first_entries(items: Vec<String>) -> Option<Vec<String>> {
    if items.is_empty() {
        return None;
    }
    Some(items.into_iter().take(MAX_ACTIONS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_trims() {
        assert_eq!(parse_text("  Thanks!\n\n"), "Thanks!");
    }

    #[test]
    fn test_strict_json_truncates_to_three() {
        let raw = r#"["One action here", "Two action here", "Three action here", "Four", "Five"]"#;
        let (actions, source) = parse_actions_with_source(raw);
        assert_eq!(source, ActionsSource::StrictJson);
        assert_eq!(
            actions,
            vec!["One action here", "Two action here", "Three action here"]
        );
    }

    #[test]
    fn test_strict_json_never_pads() {
        let actions = parse_actions(r#"["Only one recommendation"]"#);
        assert_eq!(actions, vec!["Only one recommendation"]);
    }

    #[test]
    fn test_fenced_json() {
        let raw = "```json\n[\"Train staff on greetings\", \"Shorten queue times\"]\n```";
        let (actions, source) = parse_actions_with_source(raw);
        assert_eq!(source, ActionsSource::StrictJson);
        assert_eq!(
            actions,
            vec!["Train staff on greetings", "Shorten queue times"]
        );
    }

    #[test]
    fn test_fence_without_language() {
        assert_eq!(strip_code_fences("```\n[\"a\"]\n```"), "[\"a\"]");
        assert_eq!(strip_code_fences("[\"a\"]"), "[\"a\"]");
    }

    #[test]
    fn test_json_entries_taken_as_they_are() {
        let raw = r#"["First action item", "", "Third action item", "Fourth action item"]"#;
        let (actions, source) = parse_actions_with_source(raw);
        assert_eq!(source, ActionsSource::StrictJson);
        assert_eq!(actions, vec!["First action item", "", "Third action item"]);
    }

    #[test]
    fn test_embedded_json_truncates_to_three() {
        let raw = "Sure! [\"Add vegan desserts\", \"Print a kids menu\", \"Fix the AC\", \"Train hosts\", \"Add patio heaters\"] Let me know.";
        let (actions, source) = parse_actions_with_source(raw);
        assert_eq!(source, ActionsSource::EmbeddedJson);
        assert_eq!(
            actions,
            vec!["Add vegan desserts", "Print a kids menu", "Fix the AC"]
        );
    }

    #[test]
    fn test_dangling_quotes_removed() {
        let raw = "\"Offer a loyalty discount\nFix the broken door handle\"\n'Repaint the front entrance";
        assert_eq!(
            parse_lines(raw).unwrap(),
            vec![
                "Offer a loyalty discount",
                "Fix the broken door handle",
                "Repaint the front entrance",
            ]
        );
    }

    #[test]
    fn test_embedded_json() {
        let raw = "Here are my recommendations:\n[\"Restock popular items\", \"Extend opening hours\"]\nHope this helps.";
        assert!(parse_strict_json(raw).is_none());
        let (actions, source) = parse_actions_with_source(raw);
        assert_eq!(source, ActionsSource::EmbeddedJson);
        assert_eq!(actions, vec!["Restock popular items", "Extend opening hours"]);
    }

    #[test]
    fn test_empty_json_array_falls_through() {
        assert!(parse_strict_json("[]").is_none());
        assert!(parse_embedded_json("[]").is_none());
        let (actions, source) = parse_actions_with_source("[]");
        assert_eq!(source, ActionsSource::Generic);
        assert_eq!(actions, generic_actions());
    }

    #[test]
    fn test_bullet_lines() {
        let raw = "Recommendations for the team:\n- Improve the checkout flow\n• Add more vegan options\n* Hire extra weekend staff\n- Another one that is cut";
        let (actions, source) = parse_actions_with_source(raw);
        assert_eq!(source, ActionsSource::Lines);
        assert_eq!(
            actions,
            vec![
                "Recommendations for the team:",
                "Improve the checkout flow",
                "Add more vegan options",
            ]
        );
    }

    #[test]
    fn test_numbered_and_quoted_lines() {
        let raw = "1. \"Respond to complaints within a day\"\n2. 'Publish a seasonal menu'\n3. Short\n4. Audit cleaning schedule weekly";
        let actions = parse_lines(raw).unwrap();
        assert_eq!(
            actions,
            vec![
                "Respond to complaints within a day",
                "Publish a seasonal menu",
                "Audit cleaning schedule weekly",
            ]
        );
    }

    #[test]
    fn test_broken_json_uses_lines() {
        let raw = "[\n  \"Offer a loyalty discount\",\n  \"Fix the broken door handle\",\n";
        let (actions, source) = parse_actions_with_source(raw);
        assert_eq!(source, ActionsSource::Lines);
        assert_eq!(
            actions,
            vec!["Offer a loyalty discount", "Fix the broken door handle"]
        );
    }

    #[test]
    fn test_lines_skip_short_and_structural() {
        assert!(parse_lines("ok\n{\"a\": 1}\n[1, 2]\n- tiny").is_none());
    }

    #[test]
    fn test_generic_fallback() {
        let (actions, source) = parse_actions_with_source("n/a");
        assert_eq!(source, ActionsSource::Generic);
        assert_eq!(
            actions,
            vec![
                "Review customer feedback regularly",
                "Address specific concerns raised",
                "Follow up with customer",
            ]
        );
    }

    #[test]
    fn test_non_string_array_is_not_json_stage() {
        let raw = "[1, 2, 3]";
        assert!(parse_strict_json(raw).is_none());
        assert_eq!(parse_actions_with_source(raw).1, ActionsSource::Generic);
    }
}
