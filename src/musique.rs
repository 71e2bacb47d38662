//! Form-history ("musique") decoder.
//!
//! A musique is a compact string of recent results, newest first. Each
//! outcome is a rank-plus-letter token (`1p` first place, `4a` fourth, `Da`
//! disqualified) and a parenthesized two-digit marker `(24)` switches the
//! active year for the tokens that follow. Tokens before any marker belong
//! to the race year.

use regex::Regex;
use std::collections::BTreeMap;

/// Decode a musique into year -> outcome tokens, in source order.
///
/// An empty or absent musique yields an empty map; callers must treat that
/// as "no information", not as proven poor form. Malformed fragments are
/// skipped rather than raising.
///
/// # Examples
///
/// ```
/// use pmu_engine::musique::parse_musique;
///
/// let buckets = parse_musique("1p4p(25)2pDa", 2026);
/// assert_eq!(buckets[&2026], vec!["1p", "4p"]);
/// assert_eq!(buckets[&2025], vec!["2p", "Da"]);
/// ```
pub fn parse_musique(raw: &str, current_year: i32) -> BTreeMap<i32, Vec<String>> {
    let mut buckets: BTreeMap<i32, Vec<String>> = BTreeMap::new();
    if raw.trim().is_empty() {
        return buckets;
    }

    let token_re = Regex::new(r"\d+[a-zA-Z]|\([0-9]{2}\)|[DT]a[a-z]?").unwrap();
    let year_re = Regex::new(r"\((\d{2})\)").unwrap();

    let mut active_year = current_year;

    for token in token_re.find_iter(raw) {
        let token = token.as_str();

        if let Some(caps) = year_re.captures(token) {
            // Two-digit markers are always 2000-relative in PMU data.
            let yy: i32 = caps[1].parse().unwrap_or(0);
            active_year = 2000 + yy;
            continue;
        }

        buckets.entry(active_year).or_default().push(token.to_string());
    }

    buckets
}

/// Finishing rank encoded in a token, if any. `None` for non-finisher codes.
pub fn token_rank(token: &str) -> Option<u32> {
    if is_non_finisher(token) {
        return None;
    }
    let digits: String = token.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Whether a token marks a disqualification or a did-not-finish.
pub fn is_non_finisher(token: &str) -> bool {
    token.starts_with('D') || token.starts_with('T')
}
