//! Set-score parsing.
//!
//! Each side of a match carries its own score string. A side's games in
//! set `i` are the second number of its own token `i`, so `"6-4,6-3"`
//! against `"4-6,3-6"` is a 2-0 win for side B, 12 games to 7.
//!
//! Scores are free text typed by admins, so nothing here can fail: bad
//! tokens are skipped and counted, never raised.

use regex::Regex;
use std::sync::OnceLock;

static SET_TOKEN: OnceLock<Regex> = OnceLock::new();

fn set_token() -> &'static Regex {
    SET_TOKEN.get_or_init(|| Regex::new(r"^(\d{1,2})-(\d{1,2})$").expect("set token pattern"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParsedScore {
    pub sets_a: u32,
    pub sets_b: u32,
    pub games_a: u32,
    pub games_b: u32,
    /// Positions where at least one side's token was malformed.
    pub skipped_sets: u32,
    /// Tokens past the shorter side's list.
    pub ignored_trailing: u32,
    /// Either score string was missing or blank.
    pub missing: bool,
}

impl ParsedScore {
    /// The side with strictly more sets; `None` on a level count.
    pub fn winner(&self) -> Option<Side> {
        match self.sets_a.cmp(&self.sets_b) {
            std::cmp::Ordering::Greater => Some(Side::A),
            std::cmp::Ordering::Less => Some(Side::B),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn is_clean(&self) -> bool {
        !self.missing && self.skipped_sets == 0 && self.ignored_trailing == 0
    }
}

/// Parses a single `"<games>-<games>"` token. Surrounding whitespace is
/// tolerated; anything else that does not match yields `None`.
pub fn parse_set(token: &str) -> Option<(u32, u32)> {
    let caps = set_token().captures(token.trim())?;
    let first = caps[1].parse().ok()?;
    let second = caps[2].parse().ok()?;
    Some((first, second))
}

pub fn parse_score(score_a: Option<&str>, score_b: Option<&str>) -> ParsedScore {
    let (Some(score_a), Some(score_b)) = (non_blank(score_a), non_blank(score_b)) else {
        return ParsedScore {
            missing: true,
            ..ParsedScore::default()
        };
    };

    let tokens_a: Vec<&str> = score_a.split(',').collect();
    let tokens_b: Vec<&str> = score_b.split(',').collect();
    let paired = tokens_a.len().min(tokens_b.len());

    let mut parsed = ParsedScore {
        ignored_trailing: (tokens_a.len().max(tokens_b.len()) - paired) as u32,
        ..ParsedScore::default()
    };

    for (token_a, token_b) in tokens_a.iter().zip(tokens_b.iter()) {
        let (Some((_, games_a)), Some((_, games_b))) = (parse_set(token_a), parse_set(token_b))
        else {
            parsed.skipped_sets += 1;
            continue;
        };

        parsed.games_a += games_a;
        parsed.games_b += games_b;

        if games_a > games_b {
            parsed.sets_a += 1;
        } else if games_b > games_a {
            parsed.sets_b += 1;
        }
    }

    parsed
}

fn non_blank(score: Option<&str>) -> Option<&str> {
    score.filter(|s| !s.trim().is_empty())
}
