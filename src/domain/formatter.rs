//! Markdown formatting for a day's answers

use crate::domain::template::TemplateItem;
use chrono::{Datelike, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// Runs of two or more plain spaces act as an implicit list separator
fn double_space_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r" {2,}").unwrap())
}

fn bullet_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[*\-+]\s").unwrap())
}

fn ordered_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\d+\.\s").unwrap())
}

/// Format answers into a markdown document.
///
/// `answers` corresponds positionally to `template`; missing or blank answers
/// produce no section. The footer carries the time of `now`.
pub fn format_log(template: &[TemplateItem], answers: &[String], now: NaiveDateTime) -> String {
    let mut markdown = format!("# Task Cache: {}\n\n", long_date(now));

    for (item, answer) in template.iter().zip(answers.iter()) {
        let text = answer.trim();
        if text.is_empty() {
            continue;
        }

        markdown.push_str(&format!("## {}\n", item.section_title));
        for line in format_section_lines(text) {
            markdown.push_str(&line);
            markdown.push('\n');
        }
        markdown.push('\n');
    }

    markdown.push_str(&format!("---\n*Cached at {}*\n", now.format("%-I:%M %p")));
    markdown
}

/// Normalize one answer into markdown list lines
pub fn format_section_lines(text: &str) -> Vec<String> {
    let expanded = double_space_regex().replace_all(text, "\n- ");

    expanded
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if bullet_regex().is_match(line) {
                line.to_string()
            } else if ordered_regex().is_match(line) {
                format!("**{}**", line)
            } else {
                format!("- {}", line)
            }
        })
        .collect()
}

/// e.g. "Friday, January 17th, 2025"
fn long_date(now: NaiveDateTime) -> String {
    let day = now.day();
    format!(
        "{}, {} {}{}, {}",
        now.format("%A"),
        now.format("%B"),
        day,
        ordinal_suffix(day),
        now.year()
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
