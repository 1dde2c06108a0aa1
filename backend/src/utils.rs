use chrono::NaiveDate;
use std::fmt::Write;
use thiserror::Error;

/// Parse the calendar date out of an ISO8601 timestamp ("2021-03-04T15:00:01Z").
pub fn parse_iso8601_date(timestamp: &str) -> Option<NaiveDate> {
    let date_part = timestamp.get(0..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Round to `decimals` places, ties to even.
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Percentage of `part` over `whole`, rounded to two places. `None` when
/// `whole` is zero.
pub fn percentage(part: i64, whole: i64) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some(round_half_even(part as f64 / whole as f64 * 100.0, 2))
}

#[derive(Debug, Error, PartialEq)]
pub enum TagLiteralError {
    #[error("expected '[' at start of tag list")]
    MissingOpenBracket,
    #[error("unterminated string in tag list")]
    UnterminatedString,
    #[error("unexpected character '{0}' in tag list")]
    UnexpectedChar(char),
    #[error("tag list is not closed with ']'")]
    MissingCloseBracket,
}

/// Parse a list literal such as `['money', "Kevin's picks"]`. Both quote
/// styles and backslash escapes are accepted.
pub fn parse_tag_literal(raw: &str) -> Result<Vec<String>, TagLiteralError> {
    let mut chars = raw.trim().chars().peekable();
    if chars.next() != Some('[') {
        return Err(TagLiteralError::MissingOpenBracket);
    }

    let mut tags = Vec::new();
    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace() || *c == ',') {
            chars.next();
        }

        match chars.next() {
            Some(']') => break,
            Some(quote @ ('\'' | '"')) => {
                let mut tag = String::new();
                loop {
                    match chars.next() {
                        Some('\\') => match chars.next() {
                            Some('n') => tag.push('\n'),
                            Some('t') => tag.push('\t'),
                            Some(other) => tag.push(other),
                            None => return Err(TagLiteralError::UnterminatedString),
                        },
                        Some(c) if c == quote => break,
                        Some(c) => tag.push(c),
                        None => return Err(TagLiteralError::UnterminatedString),
                    }
                }
                tags.push(tag);
            }
            Some(other) => return Err(TagLiteralError::UnexpectedChar(other)),
            None => return Err(TagLiteralError::MissingCloseBracket),
        }
    }

    match chars.find(|c| !c.is_whitespace()) {
        Some(trailing) => Err(TagLiteralError::UnexpectedChar(trailing)),
        None => Ok(tags),
    }
}

/// Inverse of [`parse_tag_literal`]. Single quotes unless the tag contains
/// one, in which case double quotes are used.
pub fn format_tag_literal(tags: &[String]) -> String {
    let mut out = String::from("[");
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let quote = if tag.contains('\'') && !tag.contains('"') {
            '"'
        } else {
            '\''
        };
        out.push(quote);
        for c in tag.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\t' => out.push_str("\\t"),
                c if c == quote => {
                    let _ = write!(out, "\\{c}");
                }
                c => out.push(c),
            }
        }
        out.push(quote);
    }
    out.push(']');
    out
}

/// Whether XML 1.0 allows `c` in character data.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

pub fn strip_non_xml_chars(text: &str) -> String {
    text.chars().filter(|c| is_xml_char(*c)).collect()
}

/// Escape markup characters and drop the ones XML cannot carry at all.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars().filter(|c| is_xml_char(*c)) {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
