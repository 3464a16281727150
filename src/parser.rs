use crate::ir::TagSet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;

static COUNT_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<label>.+?)\s*(?:[:=,]|\t)\s*(?P<count>[-+]?\d+(?:\.\d+)?)\s*$").unwrap()
});
static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}_'\-]*").unwrap());

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have", "he",
    "her", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "more", "most", "my",
    "no", "not", "of", "on", "one", "or", "other", "our", "out", "over", "she", "so", "some",
    "than", "that", "the", "their", "them", "then", "there", "these", "they", "this", "to", "up",
    "us", "was", "we", "were", "what", "when", "which", "who", "will", "with", "would", "you",
    "your",
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("tag '{label}' has negative count {count}")]
    NegativeCount { label: String, count: i64 },
    #[error("tag '{label}' has invalid count '{value}'; counts must be whole numbers")]
    InvalidCount { label: String, value: String },
    #[error("tag '{0}' is listed more than once")]
    DuplicateLabel(String),
    /// Carries the 1-based line (count lines) or entry (JSON) position.
    #[error("empty tag label at entry {0}")]
    EmptyLabel(usize),
    #[error("invalid JSON tag counts: {0}")]
    InvalidJson(String),
    #[error("line {0} is not of the form 'label: count'")]
    InvalidLine(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// JSON object when the input starts with `{`, count lines when every
    /// line looks like `label: count`, free text otherwise.
    #[default]
    Auto,
    /// JSON5 object or `label: count` lines.
    Counts,
    /// Free text, counted by word.
    Text,
}

#[derive(Debug, Clone)]
pub struct TextOptions {
    pub min_word_len: usize,
    pub max_tags: usize,
    pub skip_stop_words: bool,
    pub lowercase: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            min_word_len: 3,
            max_tags: 80,
            skip_stop_words: true,
            lowercase: true,
        }
    }
}

pub fn parse_tags(
    input: &str,
    format: InputFormat,
    options: &TextOptions,
) -> Result<TagSet, ParseError> {
    match format {
        InputFormat::Counts => parse_counts(input),
        InputFormat::Text => Ok(count_words(input, options)),
        InputFormat::Auto => {
            if input.trim_start().starts_with('{') {
                parse_json_counts(input)
            } else if looks_like_count_lines(input) {
                parse_count_lines(input)
            } else {
                Ok(count_words(input, options))
            }
        }
    }
}

/// JSON5 object or `label: count` lines, chosen by the first character.
pub fn parse_counts(input: &str) -> Result<TagSet, ParseError> {
    if input.trim_start().starts_with('{') {
        parse_json_counts(input)
    } else {
        parse_count_lines(input)
    }
}

pub fn parse_json_counts(input: &str) -> Result<TagSet, ParseError> {
    let value: serde_json::Value =
        json5::from_str(input).map_err(|err| ParseError::InvalidJson(err.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| ParseError::InvalidJson("expected an object of label: count".to_string()))?;

    let mut tags = TagSet::new();
    for (idx, (label, raw)) in object.iter().enumerate() {
        if label.trim().is_empty() {
            return Err(ParseError::EmptyLabel(idx + 1));
        }
        let count = json_count(label, raw)?;
        tags.insert(label.clone(), count);
    }
    Ok(tags)
}

fn json_count(label: &str, raw: &serde_json::Value) -> Result<u64, ParseError> {
    if let Some(count) = raw.as_u64() {
        return Ok(count);
    }
    if let Some(count) = raw.as_i64() {
        return Err(ParseError::NegativeCount {
            label: label.to_string(),
            count,
        });
    }
    if let Some(value) = raw.as_f64() {
        if value.is_finite() && value.fract() == 0.0 {
            if value < 0.0 {
                return Err(ParseError::NegativeCount {
                    label: label.to_string(),
                    count: value as i64,
                });
            }
            if value <= u64::MAX as f64 {
                return Ok(value as u64);
            }
        }
    }
    Err(ParseError::InvalidCount {
        label: label.to_string(),
        value: raw.to_string(),
    })
}

fn looks_like_count_lines(input: &str) -> bool {
    let mut any = false;
    for line in content_lines(input) {
        if !COUNT_LINE_RE.is_match(line.1) {
            return false;
        }
        any = true;
    }
    any
}

fn content_lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
}

/// Parse `label: count` lines. `=`, `,` and tab work as separators too, and
/// `#` starts a comment line.
pub fn parse_count_lines(input: &str) -> Result<TagSet, ParseError> {
    let mut tags = TagSet::new();
    for (line_no, line) in content_lines(input) {
        let Some(caps) = COUNT_LINE_RE.captures(line) else {
            return Err(ParseError::InvalidLine(line_no));
        };
        let label = caps["label"].trim().trim_matches('"').trim();
        if label.is_empty() {
            return Err(ParseError::EmptyLabel(line_no));
        }
        let raw = &caps["count"];
        let count = parse_line_count(label, raw)?;
        if tags.insert(label, count).is_some() {
            return Err(ParseError::DuplicateLabel(label.to_string()));
        }
    }
    Ok(tags)
}

fn parse_line_count(label: &str, raw: &str) -> Result<u64, ParseError> {
    if let Ok(count) = raw.trim_start_matches('+').parse::<u64>() {
        return Ok(count);
    }
    if let Ok(count) = raw.parse::<i64>() {
        if count == 0 {
            return Ok(0);
        }
        return Err(ParseError::NegativeCount {
            label: label.to_string(),
            count,
        });
    }
    Err(ParseError::InvalidCount {
        label: label.to_string(),
        value: raw.to_string(),
    })
}

/// Word frequency of free text, keeping the `max_tags` most frequent words.
pub fn count_words(input: &str, options: &TextOptions) -> TagSet {
    let stop: HashSet<&str> = if options.skip_stop_words {
        STOP_WORDS.iter().copied().collect()
    } else {
        HashSet::new()
    };
    let mut tags = TagSet::new();
    for word in WORD_RE.find_iter(input) {
        let raw = word.as_str().trim_end_matches(['\'', '-']);
        let word = if options.lowercase {
            raw.to_lowercase()
        } else {
            raw.to_string()
        };
        if word.chars().count() < options.min_word_len {
            continue;
        }
        if stop.contains(word.to_lowercase().as_str()) {
            continue;
        }
        tags.add(word, 1);
    }
    tags.truncate_to_top(options.max_tags);
    tags
}
