//! Parsers for the wiki pages that hold the bot's configuration.
//!
//! All functions here are pure text transforms. The pages are edited by
//! hand, so parsing is deliberately lenient: lines missing their separator
//! and domain blocks with unknown categories are dropped without comment.
//! Only numeric fields fail loudly.

use std::collections::HashMap;

use crate::error::ParseError;
use crate::store::DomainLists;

/// Splits wiki text into trimmed, non-empty lines.
///
/// Reddit historically serves wiki text with `\r\n` terminators, but pages
/// that have been round-tripped through the markdown editor come back with
/// bare `\n`. Both are accepted.
pub fn line_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses `name,value` lines into a map.
///
/// Lines without a comma are skipped. A comma followed by a non-numeric
/// value is a [ParseError::BadInteger] carrying the 1-based line number.
pub fn key_value_lines(text: &str) -> Result<HashMap<String, i64>, ParseError> {
    let mut map = HashMap::new();
    for (index, line) in text.lines().enumerate() {
        if let Some((key, value)) = line.split_once(',') {
            map.insert(key.trim().to_string(), parse_int(value, index + 1)?);
        }
    }
    Ok(map)
}

/// Parses the `domains` page: `---`-separated blocks, each a category
/// keyword followed by a bracketed, comma-separated domain list.
///
/// Blocks with an unrecognized category (or no bracket at all) are dropped.
pub fn domain_blocks(text: &str) -> DomainLists {
    let mut lists = DomainLists::default();

    // The page may wrap long domain lists; the delimiters are what counts.
    let joined: String = text.lines().collect();

    for block in joined.split("---") {
        let bracket = match block.find('[') {
            Some(position) => position,
            None => continue,
        };

        let target = if block.starts_with("video") {
            &mut lists.video
        } else if block.starts_with("audio") {
            &mut lists.audio
        } else if block.starts_with("images") {
            &mut lists.image
        } else {
            continue;
        };

        let domains = block[bracket..]
            .trim_start_matches('[')
            .trim_end_matches(']');
        for domain in domains.split(',') {
            let domain = domain.trim();
            if !domain.is_empty() {
                target.insert(domain.to_string());
            }
        }
    }

    lists
}

/// Parses the `subreddits/archive-time` page: the first line is the default
/// archive time in seconds, the rest are `subreddit,seconds` overrides.
///
/// Override keys are lowercased so later lookups can use any casing.
pub fn archive_times(text: &str) -> Result<(i64, HashMap<String, i64>), ParseError> {
    let mut lines = text.lines();

    let default = match lines.next() {
        Some(first) => parse_int(first, 1)?,
        None => return Err(ParseError::MissingDefault),
    };

    let mut per_subreddit = HashMap::new();
    for (index, line) in lines.enumerate() {
        if let Some((subreddit, seconds)) = line.split_once(',') {
            per_subreddit.insert(
                subreddit.trim().to_lowercase(),
                parse_int(seconds, index + 2)?,
            );
        }
    }

    Ok((default, per_subreddit))
}

fn parse_int(value: &str, line: usize) -> Result<i64, ParseError> {
    let value = value.trim();
    value.parse().map_err(|_| ParseError::BadInteger {
        line,
        value: value.to_string(),
    })
}
