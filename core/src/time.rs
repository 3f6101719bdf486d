use chrono::{Duration, NaiveDate};
use anyhow::{anyhow, Result};

/// Portal date format, e.g. `2024-Jan-05`.
pub const DATE_FORMAT: &str = "%Y-%b-%d";

pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Nights between two portal dates; 0 when either does not parse, never less than 1 otherwise.
pub fn nights(arrival: &str, departure: &str) -> u32 {
    match (parse_date(arrival), parse_date(departure)) {
        (Some(a), Some(d)) => nights_between(a, d),
        _ => 0,
    }
}

pub fn nights_between(arrival: NaiveDate, departure: NaiveDate) -> u32 {
    (departure - arrival).num_days().max(1) as u32
}

/// Parses a date typed by the user, relative to `today` where needed.
pub fn parse_input_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty date string"));
    }

    // 1. Reserved keywords
    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "tomorrow" | "tom" => return Ok(today + Duration::days(1)),
        "yesterday" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    // 2. Relative format (+Nd, +Nw)
    if let Some(rest) = input.strip_prefix('+') {
        let offset = parse_offset(rest)?;
        return Ok(today + offset);
    }

    // 3. Fallback to fixed formats
    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Some(d) = parse_date(input) {
        return Ok(d);
    }

    Err(anyhow!("Could not parse date: {}", input))
}

fn parse_offset(input: &str) -> Result<Duration> {
    if input.len() < 2 {
        return Err(anyhow!("Invalid relative format: +{}", input));
    }
    let (num_str, unit) = input.split_at(input.len() - 1);
    let count: i64 = num_str.parse().map_err(|_| anyhow!("Invalid relative format: +{}", input))?;

    match unit.to_lowercase().as_str() {
        "d" => Ok(Duration::days(count)),
        "w" => Ok(Duration::weeks(count)),
        _ => Err(anyhow!("Unknown unit in relative date: {}", unit)),
    }
}
