//! Formatting utilities used for CLI and export outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Distance with one decimal, e.g. "187.4 m".
pub fn format_meters(meters: f64) -> String {
    format!("{:.1} m", meters)
}

/// Human label and ANSI color for an event kind code.
pub fn describe_kind(code: &str) -> (String, &'static str) {
    match code.to_lowercase().as_str() {
        "in" => ("Check-in".into(), "\x1b[32m"),
        "out" => ("Check-out".into(), "\x1b[34m"),
        other => (other.to_string(), "\x1b[0m"),
    }
}
