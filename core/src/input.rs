use std::collections::HashMap;
use anyhow::{anyhow, Result};

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

/// Splits free text into `key:value` metadata and the remaining words.
pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            // Leave URLs and similar values alone.
            if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphabetic()) {
                metadata.insert(key.to_lowercase(), value.to_string());
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

/// Whitespace split that keeps double-quoted runs together, e.g. `room:"Private Room"`.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in input.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Resolves `key` to a candidate by exact name or unique prefix.
pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    if let Some(exact) = candidates.iter().find(|&&c| c == key) {
        return Ok(exact.to_string());
    }

    let matches: Vec<&str> = candidates.iter().copied().filter(|c| c.starts_with(key)).collect();
    match matches.as_slice() {
        [only] => Ok(only.to_string()),
        [] => Err(anyhow!("Unknown field '{}', expected one of: {}", key, candidates.join(", "))),
        several => Err(anyhow!("'{}' could mean {}; type more letters", key, several.join(" or "))),
    }
}
