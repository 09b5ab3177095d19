//! Turns raw reply text into the structured shape each task expects.
//! Any mismatch is a `MalformedReply`, never a transport error.

use std::collections::HashSet;

use super::{TailoringError, TailoringTask};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredReply {
    /// AboutMe: the summary paragraph.
    Summary(String),
    /// ExperienceSelection: experience ids, most relevant first.
    RankedIds(Vec<u32>),
    /// DutyHighlighting: rewritten duty bullets.
    Bullets(Vec<String>),
    /// SkillsTailoring: skills in relevance order.
    Skills(Vec<String>),
}

impl StructuredReply {
    /// The variant a reply to `task` must have.
    pub fn matches(&self, task: TailoringTask) -> bool {
        matches!(
            (self, task),
            (StructuredReply::Summary(_), TailoringTask::AboutMe)
                | (StructuredReply::RankedIds(_), TailoringTask::ExperienceSelection)
                | (StructuredReply::Bullets(_), TailoringTask::DutyHighlighting { .. })
                | (StructuredReply::Skills(_), TailoringTask::SkillsTailoring)
        )
    }
}

const BULLET_MARKERS: &[char] = &['\u{2022}', '-', '*'];

pub fn parse_reply(task: TailoringTask, text: &str) -> Result<StructuredReply, TailoringError> {
    let parsed = match task {
        TailoringTask::AboutMe => parse_summary(text).map(StructuredReply::Summary),
        TailoringTask::ExperienceSelection => parse_ranked_ids(text).map(StructuredReply::RankedIds),
        TailoringTask::DutyHighlighting { .. } => parse_bullets(text).map(StructuredReply::Bullets),
        TailoringTask::SkillsTailoring => parse_skills(text).map(StructuredReply::Skills),
    };
    parsed.map_err(|reason| TailoringError::malformed(task, reason))
}

fn parse_summary(text: &str) -> Result<String, String> {
    let summary = text.trim();
    if summary.is_empty() {
        return Err("summary is empty".to_string());
    }
    Ok(summary.to_string())
}

fn parse_ranked_ids(text: &str) -> Result<Vec<u32>, String> {
    let json = strip_json_fences(text);
    serde_json::from_str::<Vec<u32>>(json)
        .map_err(|e| format!("expected a JSON array of experience ids ({e}): {}", excerpt(text)))
}

fn parse_bullets(text: &str) -> Result<Vec<String>, String> {
    let bullets: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(BULLET_MARKERS))
        .map(|line| line.trim_start_matches(BULLET_MARKERS).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    if bullets.is_empty() {
        return Err(format!("no bullet lines found: {}", excerpt(text)));
    }
    Ok(bullets)
}

fn parse_skills(text: &str) -> Result<Vec<String>, String> {
    let mut seen = HashSet::new();
    let skills: Vec<String> = text
        .split([',', '\n'])
        .map(|s| s.trim().trim_matches('"').trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .map(str::to_string)
        .collect();

    if skills.is_empty() {
        return Err("skills list is empty".to_string());
    }
    Ok(skills)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let inner = inner.trim_start();
    inner
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(inner)
}

fn excerpt(text: &str) -> String {
    const MAX: usize = 80;
    let trimmed = text.trim();
    match trimmed.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{:?}...", &trimmed[..idx]),
        None => format!("{trimmed:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::TailoringErrorKind;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        assert_eq!(strip_json_fences("```json\n[2, 1]\n```"), "[2, 1]");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        assert_eq!(strip_json_fences("```\n[3]\n```"), "[3]");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        assert_eq!(strip_json_fences("  [1, 2] "), "[1, 2]");
    }

    #[test]
    fn test_ranked_ids_parse() {
        let reply = parse_reply(TailoringTask::ExperienceSelection, "```json\n[2, 1, 3]\n```");
        assert_eq!(reply, Ok(StructuredReply::RankedIds(vec![2, 1, 3])));
    }

    #[test]
    fn test_ranked_ids_reject_prose() {
        let err = parse_reply(
            TailoringTask::ExperienceSelection,
            "The most relevant job is job 2.",
        )
        .unwrap_err();
        assert_eq!(err.kind, TailoringErrorKind::MalformedReply);
        assert_eq!(err.task, Some(TailoringTask::ExperienceSelection));
    }

    #[test]
    fn test_bullets_strip_markers_and_ignore_chatter() {
        let text = "Here are your duties:\n\u{2022} Built APIs in Python\n- Cut latency 30%\n* Led 3 engineers\n";
        let reply = parse_reply(TailoringTask::DutyHighlighting { experience_id: 1 }, text);
        assert_eq!(
            reply,
            Ok(StructuredReply::Bullets(vec![
                "Built APIs in Python".to_string(),
                "Cut latency 30%".to_string(),
                "Led 3 engineers".to_string(),
            ]))
        );
    }

    #[test]
    fn test_bullets_without_markers_are_malformed() {
        let err = parse_reply(
            TailoringTask::DutyHighlighting { experience_id: 1 },
            "Built APIs. Cut latency.",
        )
        .unwrap_err();
        assert_eq!(err.kind, TailoringErrorKind::MalformedReply);
    }

    #[test]
    fn test_skills_split_and_dedupe() {
        let reply = parse_reply(
            TailoringTask::SkillsTailoring,
            "Python, APIs,\nSQL, python, , Team Leadership",
        );
        assert_eq!(
            reply,
            Ok(StructuredReply::Skills(vec![
                "Python".to_string(),
                "APIs".to_string(),
                "SQL".to_string(),
                "Team Leadership".to_string(),
            ]))
        );
    }

    #[test]
    fn test_blank_summary_is_malformed() {
        let err = parse_reply(TailoringTask::AboutMe, "  \n ").unwrap_err();
        assert_eq!(err.kind, TailoringErrorKind::MalformedReply);
        assert_eq!(err.task, Some(TailoringTask::AboutMe));
    }

    #[test]
    fn test_reply_matches_task() {
        assert!(StructuredReply::Summary("x".into()).matches(TailoringTask::AboutMe));
        assert!(!StructuredReply::Summary("x".into()).matches(TailoringTask::SkillsTailoring));
        assert!(StructuredReply::Bullets(vec![])
            .matches(TailoringTask::DutyHighlighting { experience_id: 9 }));
    }

    #[test]
    fn test_excerpt_truncates_long_text() {
        let long = "x".repeat(200);
        assert!(excerpt(&long).ends_with("..."));
        assert_eq!(excerpt("short"), "\"short\"");
    }
}
