//! Term matching inside a single document

/// A line shown in search output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchLine {
    pub text: String,
    /// False for context lines following a match
    pub is_match: bool,
}

/// A run of matching and context lines within one section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHit {
    /// Title of the enclosing `## ` section, empty before the first one
    pub section: String,
    pub lines: Vec<SearchLine>,
}

/// Case-insensitive containment check
pub fn contains_term(content: &str, term: &str) -> bool {
    content.to_lowercase().contains(&term.to_lowercase())
}

/// Find matching lines grouped by section.
///
/// After a match, following non-empty lines that are not headings are kept as
/// context until a blank line or heading ends the run.
pub fn find_section_hits(content: &str, term: &str) -> Vec<SectionHit> {
    let needle = term.to_lowercase();
    let mut hits: Vec<SectionHit> = Vec::new();
    let mut section = String::new();
    let mut in_hit = false;

    for line in content.lines() {
        if let Some(title) = line.strip_prefix("## ") {
            section = title.to_string();
            in_hit = false;
        }

        if line.to_lowercase().contains(&needle) {
            if !in_hit {
                hits.push(SectionHit {
                    section: section.clone(),
                    lines: Vec::new(),
                });
                in_hit = true;
            }
            push_line(&mut hits, line, true);
        } else if in_hit && !line.trim().is_empty() && !line.starts_with('#') {
            push_line(&mut hits, line, false);
        } else {
            in_hit = false;
        }
    }

    hits
}

fn push_line(hits: &mut [SectionHit], line: &str, is_match: bool) {
    if let Some(hit) = hits.last_mut() {
        hit.lines.push(SearchLine {
            text: line.to_string(),
            is_match,
        });
    }
}
