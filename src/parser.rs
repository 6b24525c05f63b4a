use crate::models::{Todo, TodoId};
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, PartialEq)]
pub struct ParsedTodo {
    pub text: String,
    pub done: bool,
}

fn checklist_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*[-*+]\s+\[([ xX])\](?:\s+(.*))?$").expect("valid regex")
    })
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Reads one Markdown task-list line such as `- [x] call mom`.
pub fn parse_checklist_line(input: &str) -> Option<ParsedTodo> {
    let caps = checklist_re().captures(input)?;

    let done = caps.get(1).is_some_and(|mark| mark.as_str() != " ");

    let raw = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
    let text = whitespace_re().replace_all(raw, " ").trim().to_string();
    if text.is_empty() {
        return None;
    }

    Some(ParsedTodo { text, done })
}

/// Turns every task-list line of a Markdown document into a [`Todo`], numbering
/// them from `first_id`. Other lines are skipped, and so are items that would
/// need an id past `TodoId::MAX`.
pub fn parse_checklist(input: &str, first_id: TodoId) -> Vec<Todo> {
    input
        .lines()
        .filter_map(parse_checklist_line)
        .zip(first_id..=TodoId::MAX)
        .map(|(parsed, id)| Todo {
            text: parsed.text,
            done: parsed.done,
            interact: None,
            id,
        })
        .collect()
}
