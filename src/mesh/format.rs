//! Plain-text rendering of node data for the dashboard and the CLI.
use serde_json::{Map, Value};

const NOT_AVAILABLE: &str = "N/A";

/// Turn `snake_case` or `camelCase` keys into `Title Case` labels.
///
/// `battery_level` and `batteryLevel` both become `Battery Level`.
pub fn format_key(key: &str) -> String {
    if key.contains('_') {
        return key
            .split('_')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ");
    }

    let mut spaced = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(ch);
    }
    title_case(spaced.trim())
}

/// Display form of a single value.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => NOT_AVAILABLE.to_owned(),
        Value::Bool(true) => "Yes".to_owned(),
        Value::Bool(false) => "No".to_owned(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.is_empty() => NOT_AVAILABLE.to_owned(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.is_empty() => NOT_AVAILABLE.to_owned(),
        Value::Object(map) if map.is_empty() => NOT_AVAILABLE.to_owned(),
        other => other.to_string(),
    }
}

/// Render a titled key/value section, one `Key: value` line per populated
/// field. A section whose values are all empty, zero or false renders as
/// "No data available".
pub fn render_section(title: &str, data: &Map<String, Value>) -> Vec<String> {
    if data.values().all(is_falsy) {
        return vec![title.to_owned(), "No data available".to_owned()];
    }

    let mut lines = vec![title.to_owned()];
    lines.extend(
        data.iter()
            .filter(|(_, v)| !is_blank(v))
            .map(|(k, v)| format!("{}: {}", format_key(k), format_value(v))),
    );
    lines
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Upper-case every letter that follows a non-letter, lower-case the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for ch in text.chars() {
        if prev_is_letter {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        prev_is_letter = ch.is_alphabetic();
    }
    out
}
