//! Rule-based replies used when the reasoning backend cannot be reached

use super::Reply;

struct Rule {
    keywords: &'static [&'static str],
    response_text: &'static str,
    delta_valence: f64,
    delta_arousal: f64,
}

/// Checked in order; the first rule with a matching word wins
const RULES: &[Rule] = &[
    Rule {
        keywords: &["hello", "hi"],
        response_text: "Hello. I am IRIS.",
        delta_valence: 0.1,
        delta_arousal: 0.1,
    },
    Rule {
        keywords: &["sad", "hurt", "pain"],
        response_text: "I am sensing you are in distress.",
        delta_valence: -0.2,
        delta_arousal: 0.0,
    },
    Rule {
        keywords: &["happy", "good"],
        response_text: "I am pleased to hear that.",
        delta_valence: 0.2,
        delta_arousal: 0.1,
    },
];

const DEFAULT_RESPONSE: &str = "I am listening.";

/// Deterministic reply computed from whole-word keyword matches
pub(crate) fn fallback_reply(input_text: &str) -> Reply {
    let words: Vec<String> = input_text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    RULES
        .iter()
        .find(|rule| {
            rule.keywords
                .iter()
                .any(|keyword| words.iter().any(|w| w == keyword))
        })
        .map_or_else(
            || Reply::neutral(DEFAULT_RESPONSE),
            |rule| Reply::new(rule.response_text, rule.delta_valence, rule.delta_arousal),
        )
}
