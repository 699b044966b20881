// src/filters/highlight.rs
use log::debug;
use regex::RegexBuilder;
use serde::Serialize;

const MAX_TEXT_CHARS: usize = 1000;
const PATTERN_SIZE_LIMIT: usize = 1 << 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

impl Segment {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: false,
        }
    }
}

/// Splits `text` around case-insensitive occurrences of `query`. Never fails:
/// if the pattern cannot be built the text comes back as one plain segment.
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    if query.is_empty() || text.is_empty() {
        return vec![Segment::plain(text)];
    }

    let pattern = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
    {
        Ok(pattern) => pattern,
        Err(e) => {
            debug!("Highlight pattern for {:?} rejected: {}", query, e);
            return vec![Segment::plain(text)];
        }
    };

    let limited = truncate(text);
    let mut segments = Vec::new();
    let mut cursor = 0;
    for found in pattern.find_iter(&limited) {
        if found.start() > cursor {
            segments.push(Segment::plain(&limited[cursor..found.start()]));
        }
        segments.push(Segment {
            text: found.as_str().to_string(),
            highlighted: true,
        });
        cursor = found.end();
    }
    if cursor < limited.len() {
        segments.push(Segment::plain(&limited[cursor..]));
    }
    segments
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
