//! Career statistics aggregation.
//!
//! Totals are summed over every history entry. Values arrive as JSON numbers
//! or strings; anything that is not a count contributes zero.

use serde_json::Value;

use crate::generation::CareerEntry;

/// Competition names that count as top-tier experience.
pub const TOP_TIER_KEYWORDS: &[&str] = &[
    "premier league",
    "bundesliga",
    "laliga",
    "la liga",
    "serie a",
    "ligue 1",
    "eredivisie",
    "primeira liga",
    "champions league",
    "europa league",
    "conference league",
];

/// Team or competition names that indicate national or youth-national duty.
pub const NATIONAL_TEAM_KEYWORDS: &[&str] = &[
    "national",
    "nationalmannschaft",
    "selección",
    "seleção",
    "u15",
    "u16",
    "u17",
    "u18",
    "u19",
    "u20",
    "u21",
    "u23",
    "olympic",
];

/// Aggregated view of a career history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CareerTotals {
    pub entries: usize,
    pub appearances: u32,
    pub goals: u32,
    pub assists: u32,
    pub top_tier: bool,
    pub national_team: bool,
}

/// Sum counts and raise the experience flags over all entries.
pub fn aggregate(entries: &[CareerEntry]) -> CareerTotals {
    entries.iter().fold(
        CareerTotals {
            entries: entries.len(),
            ..CareerTotals::default()
        },
        |mut totals, entry| {
            totals.appearances = totals.appearances.saturating_add(coerce_count(&entry.games));
            totals.goals = totals.goals.saturating_add(coerce_count(&entry.goals));
            totals.assists = totals.assists.saturating_add(coerce_count(&entry.assists));

            let names = entry.names();
            totals.top_tier |= names.iter().any(|n| contains_any(n, TOP_TIER_KEYWORDS));
            totals.national_team |= names.iter().any(|n| contains_any(n, NATIONAL_TEAM_KEYWORDS));
            totals
        },
    )
}

/// Interpret a JSON value as a non-negative count.
///
/// Strings contribute their leading digits (`"12"` and `"12 apps"` are 12);
/// null, `"-"`, negatives and other shapes are 0.
pub fn coerce_count(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                u32::try_from(v).unwrap_or(u32::MAX)
            } else {
                match n.as_f64() {
                    Some(v) if v.is_finite() && v > 0.0 => v.min(u32::MAX as f64) as u32,
                    _ => 0,
                }
            }
        }
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                0
            } else {
                digits.parse::<u64>().map_or(u32::MAX, |v| u32::try_from(v).unwrap_or(u32::MAX))
            }
        }
        _ => 0,
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let text = text.to_lowercase();
    keywords.iter().any(|keyword| text.contains(keyword))
}
