//! Page specification parsing.
//!
//! Converts the user-facing, 1-indexed page syntax (`"1,3,5-7"`, `"all"`)
//! into a normalized, ascending set of 0-indexed page numbers.

use crate::error::{MediaError, Result};
use std::collections::BTreeSet;

/// Parse a 1-indexed page specification into ascending 0-indexed pages.
///
/// The specification is a comma-separated list of single pages and inclusive
/// ranges (`"start-end"`); whitespace is ignored. An empty string or the
/// literal `"all"` (any case) selects every page.
///
/// Malformed tokens, reversed ranges and out-of-range pages are silently
/// dropped rather than rejected; only the caller decides whether an empty
/// result is an error (see [`select_pages`]).
///
/// # Example
///
/// ```
/// use media_toolkit::pages::parse_page_spec;
///
/// assert_eq!(parse_page_spec("1,3,5-7", 10), vec![0, 2, 4, 5, 6]);
/// assert_eq!(parse_page_spec("all", 3), vec![0, 1, 2]);
/// assert_eq!(parse_page_spec("5-3", 10), Vec::<usize>::new());
/// ```
pub fn parse_page_spec(spec: &str, total_pages: usize) -> Vec<usize> {
    let cleaned: String = spec.chars().filter(|c| !c.is_whitespace()).collect();

    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("all") {
        return (0..total_pages).collect();
    }

    let mut pages = BTreeSet::new();

    for token in cleaned.split(',') {
        if let Some((start, end)) = parse_range_token(token) {
            // Walk the inclusive 1-indexed range; an empty walk (start > end)
            // selects nothing. Capping at total_pages keeps a huge upper
            // bound from turning into a huge loop.
            for value in start..=end.min(total_pages) {
                if value >= 1 {
                    pages.insert(value - 1);
                }
            }
        } else if let Ok(value) = token.parse::<usize>() {
            if value >= 1 && value <= total_pages {
                pages.insert(value - 1);
            }
        }
    }

    pages.into_iter().collect()
}

/// Like [`parse_page_spec`], but an empty result is an error.
pub fn select_pages(spec: &str, total_pages: usize) -> Result<Vec<usize>> {
    let pages = parse_page_spec(spec, total_pages);
    if pages.is_empty() {
        return Err(MediaError::NoPagesSelected);
    }
    Ok(pages)
}

/// Match a `digits-digits` range token. Anything else (including extra
/// dashes or signs) is not a range.
fn parse_range_token(token: &str) -> Option<(usize, usize)> {
    let (start, end) = token.split_once('-')?;
    if start.is_empty() || end.is_empty() {
        return None;
    }
    if !start.bytes().all(|b| b.is_ascii_digit()) || !end.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((parse_saturating(start), parse_saturating(end)))
}

/// Parse an all-digit token, saturating on overflow. Oversized bounds are
/// capped against the page count by the caller anyway.
fn parse_saturating(digits: &str) -> usize {
    digits.parse().unwrap_or(usize::MAX)
}
