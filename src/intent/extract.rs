//! Lightweight argument extraction used by rule binders

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use super::Utterance;

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*(seconds?|secs?|minutes?|mins?|hours?|hrs?)\b").expect("valid regex")
});

static DURATION_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:in|after|for)\s+\d+\s*(?:seconds?|secs?|minutes?|mins?|hours?|hrs?)\b")
        .expect("valid regex")
});

static NOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:note|remember)\b(?:\s+(?:that|this))?[:,]?\s*(.*)$").expect("valid regex")
});

static REMINDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bremind me\b(.*)$").expect("valid regex"));

/// Spoken operators mapped to symbols, longest phrases first
const OPERATORS: &[(&str, &str)] = &[
    (" multiplied by ", " * "),
    (" multiply by ", " * "),
    (" divided by ", " / "),
    (" divide by ", " / "),
    (" plus ", " + "),
    (" minus ", " - "),
    (" times ", " * "),
    (" multiply ", " * "),
    (" divide ", " / "),
    (" over ", " / "),
    (" x ", " * "),
];

/// Characters that survive in an arithmetic expression
const EXPRESSION_CHARS: &str = "0123456789+-*/(). ";

/// First non-negative integer in the utterance
#[must_use]
pub fn first_integer(utterance: &Utterance) -> Option<i64> {
    INTEGER
        .find(utterance.as_str())
        .and_then(|m| m.as_str().parse().ok())
}

/// First "N unit" duration, with a spoken label such as "2 minutes"
#[must_use]
pub fn duration(utterance: &Utterance) -> Option<(Duration, String)> {
    let caps = DURATION.captures(utterance.as_str())?;
    let amount: u64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2)?.as_str();

    let (unit_secs, name) = if unit.starts_with('s') {
        (1, "second")
    } else if unit.starts_with('m') {
        (60, "minute")
    } else {
        (3600, "hour")
    };

    let secs = amount.checked_mul(unit_secs)?;
    let label = if amount == 1 {
        format!("1 {name}")
    } else {
        format!("{amount} {name}s")
    };
    Some((Duration::from_secs(secs), label))
}

/// Text following the first of `phrases` found in the utterance
#[must_use]
pub fn text_after(utterance: &Utterance, phrases: &[&str]) -> Option<String> {
    let text = utterance.as_str();
    phrases.iter().find_map(|phrase| {
        text.find(phrase)
            .map(|pos| clean(&text[pos + phrase.len()..]))
    })
}

/// Utterance with the given whole words removed
#[must_use]
pub fn without_words(utterance: &Utterance, words: &[&str]) -> String {
    utterance
        .words()
        .filter(|w| !words.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trim whitespace and sentence punctuation from both ends
#[must_use]
pub fn clean(text: &str) -> String {
    text.trim()
        .trim_matches(|c: char| matches!(c, ',' | '.' | '?' | '!' | ':' | ';' | '"' | '\''))
        .trim()
        .to_string()
}

/// Arithmetic expression spoken in the utterance
///
/// Spoken operators become symbols and every other word is dropped, so
/// "what is 12 divided by 4" becomes `12 / 4`.
#[must_use]
pub fn math_expression(utterance: &Utterance) -> Option<String> {
    let mut text = format!(" {} ", utterance.as_str());
    for (spoken, symbol) in OPERATORS {
        while text.contains(spoken) {
            text = text.replace(spoken, symbol);
        }
    }

    let expression: String = text
        .chars()
        .filter(|c| EXPRESSION_CHARS.contains(*c))
        .collect();
    let expression = expression
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let expression = expression.trim_end_matches('.').trim().to_string();

    expression
        .chars()
        .any(|c| c.is_ascii_digit())
        .then_some(expression)
}

/// "convert V FROM to TO" as `(value, from, to)`
#[must_use]
pub fn conversion(utterance: &Utterance) -> Option<(f64, String, String)> {
    let words: Vec<&str> = utterance.words().collect();
    let start = words.iter().position(|w| *w == "convert")?;
    let rest = &words[start + 1..];

    let value: f64 = rest.first()?.parse().ok()?;
    let to_index = rest.iter().position(|w| *w == "to")?;

    let is_unit = |w: &&&str| !matches!(**w, "degrees" | "degree");
    let from = rest[1..to_index].iter().find(is_unit)?;
    let to = rest[to_index + 1..].iter().find(is_unit)?;

    Some((value, (*from).to_string(), (*to).to_string()))
}

/// City named after the last "in"
#[must_use]
pub fn city(utterance: &Utterance) -> Option<String> {
    let words: Vec<&str> = utterance.words().collect();
    let pos = words.iter().rposition(|w| *w == "in")?;
    let city = words[pos + 1..].join(" ");
    (!city.is_empty()).then_some(city)
}

/// Content of a "note ..." or "remember ..." utterance
#[must_use]
pub fn note_content(utterance: &Utterance) -> Option<String> {
    let caps = NOTE.captures(utterance.as_str())?;
    let content = clean(caps.get(1)?.as_str());
    (!content.is_empty()).then_some(content)
}

/// Message of a "remind me ..." utterance with the delay removed
#[must_use]
pub fn reminder_message(utterance: &Utterance) -> Option<String> {
    let caps = REMINDER.captures(utterance.as_str())?;
    let rest = DURATION_PHRASE.replace_all(caps.get(1)?.as_str(), " ");
    let rest = rest.split_whitespace().collect::<Vec<_>>().join(" ");

    let message = rest
        .strip_prefix("to ")
        .or_else(|| rest.strip_prefix("that "))
        .or_else(|| rest.strip_prefix("about "))
        .unwrap_or(&rest);
    let message = clean(message);
    (!message.is_empty()).then_some(message)
}
