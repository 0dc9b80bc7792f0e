//! Coercion of raw admin-form input
//!
//! Form fields arrive as free text. Platform lists are filtered, numeric
//! fields fall back to defaults; nothing here rejects input.

use crate::types::Platform;

/// Parse a comma-separated platform list.
///
/// Entries are trimmed and matched case-sensitively; unknown names and
/// repeats are dropped.
pub fn parse_platforms(input: &str) -> Vec<Platform> {
    let mut platforms: Vec<Platform> = Vec::new();
    for platform in input.split(',').filter_map(|s| s.trim().parse::<Platform>().ok()) {
        if !platforms.contains(&platform) {
            platforms.push(platform);
        }
    }
    platforms
}

/// Render platforms back into the form's text representation
pub fn format_platforms(platforms: &[Platform]) -> String {
    platforms
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse an SLA in whole hours; empty, unparsable and zero fall back to `default`
pub fn parse_sla_hours(input: &str, default: u32) -> u32 {
    match input.trim().parse::<u32>() {
        Ok(0) | Err(_) => default,
        Ok(hours) => hours,
    }
}

/// Parse a monthly revenue amount; empty or unparsable input becomes 0.
///
/// Negative amounts pass through so validation can report them.
pub fn parse_mrr(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
