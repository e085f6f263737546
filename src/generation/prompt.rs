//! Prompt construction.

use std::fmt::Display;

use chrono::{Datelike, NaiveDate};
use serde_json::Value;

use crate::generation::position::describe_position;
use crate::generation::stats::{aggregate, coerce_count, CareerTotals};
use crate::generation::{CareerEntry, DescriptionRequest, GenerationError, PlayerRecord};

const BIRTH_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];

/// Build the single user message sent to the generation backend.
///
/// `today` anchors the age derived from a birth date.
pub fn build_prompt(request: &DescriptionRequest, today: NaiveDate) -> Result<String, GenerationError> {
    let player = &request.player;
    let name = player.name.trim();
    if name.is_empty() {
        return Err(GenerationError::InvalidInput("player name is required".into()));
    }

    let totals = aggregate(&request.career_entries);
    let mut prompt = String::from(
        "Write a concise, professional scouting description of the football player below. \
         Use two short paragraphs, stay factual, and do not invent clubs, titles or numbers \
         that are not listed.\n\n",
    );

    line(&mut prompt, "Name", name);
    line(&mut prompt, "Position", describe_position(player.position.as_deref()));
    match derive_age(player, today) {
        Some(age) => line(&mut prompt, "Age", age),
        None => line(&mut prompt, "Age", "unknown"),
    }
    if let Some(height) = text_of(&player.height) {
        line(&mut prompt, "Height", height);
    }
    if let Some(foot) = non_empty(player.foot.as_deref()) {
        line(&mut prompt, "Preferred foot", foot);
    }
    if let Some(nationality) = non_empty(player.nationality.as_deref()) {
        line(&mut prompt, "Nationality", nationality);
    }
    if let Some(club) = non_empty(player.current_club.as_deref()) {
        line(&mut prompt, "Current club", club);
    }
    if let Some(strengths) = text_of(&player.strengths) {
        line(&mut prompt, "Strengths", strengths);
    }

    prompt.push('\n');
    push_totals(&mut prompt, &totals);
    push_history(&mut prompt, &request.career_entries);

    Ok(prompt)
}

fn line(prompt: &mut String, label: &str, value: impl Display) {
    prompt.push_str(&format!("{}: {}\n", label, value));
}

fn push_totals(prompt: &mut String, totals: &CareerTotals) {
    prompt.push_str(&format!(
        "Career totals: {} appearances, {} goals, {} assists across {} recorded entries.\n",
        totals.appearances, totals.goals, totals.assists, totals.entries
    ));
    line(prompt, "Top-tier competition experience", yes_no(totals.top_tier));
    line(
        prompt,
        "National or youth-national team experience",
        yes_no(totals.national_team),
    );
}

fn push_history(prompt: &mut String, entries: &[CareerEntry]) {
    if entries.is_empty() {
        prompt.push_str("Career history: none recorded\n");
        return;
    }

    prompt.push_str("Career history:\n");
    for entry in entries {
        let season = non_empty(entry.season.as_deref()).unwrap_or("n/a");
        let club = non_empty(entry.club.as_deref()).unwrap_or("unknown club");
        let league = non_empty(entry.league.as_deref())
            .map(|league| format!(" ({})", league))
            .unwrap_or_default();
        prompt.push_str(&format!(
            "- {}: {}{}, {} games, {} goals, {} assists\n",
            season,
            club,
            league,
            coerce_count(&entry.games),
            coerce_count(&entry.goals),
            coerce_count(&entry.assists)
        ));
    }
}

/// Explicit age if positive, otherwise computed from the birth date.
pub fn derive_age(player: &PlayerRecord, today: NaiveDate) -> Option<u32> {
    match coerce_count(&player.age) {
        0 => player
            .birth_date
            .as_deref()
            .and_then(parse_birth_date)
            .and_then(|born| age_on(born, today)),
        age => Some(age),
    }
}

fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    // ISO timestamps: keep the date part.
    let date_part = raw.get(..10).filter(|p| p.as_bytes().get(4) == Some(&b'-')).unwrap_or(raw);
    BIRTH_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

fn age_on(born: NaiveDate, today: NaiveDate) -> Option<u32> {
    if born > today {
        return None;
    }
    let mut years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(Some(s.as_str())).map(str::to_string),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(text_of).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
