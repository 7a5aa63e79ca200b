use std::sync::LazyLock;

use regex::Regex;

/// What kind of answer a message calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Farewell,
    Question,
    General,
}

const GREETING_WORDS: &[&str] = &["hello", "hi", "hey", "greetings", "howdy", "hola"];
const FAREWELL_WORDS: &[&str] = &["bye", "goodbye", "farewell", "see you", "cya"];
const QUESTION_PHRASES: &[&str] = &[
    "what is",
    "who is",
    "where is",
    "when is",
    "why is",
    "how to",
    "can you",
    "could you",
    "tell me about",
    "explain",
    "information on",
    "search for",
];

fn word_pattern(words: &[&str]) -> Regex {
    let alternatives = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternatives})\b")).expect("intent pattern is valid")
}

static GREETING: LazyLock<Regex> = LazyLock::new(|| word_pattern(GREETING_WORDS));
static FAREWELL: LazyLock<Regex> = LazyLock::new(|| word_pattern(FAREWELL_WORDS));
static QUESTION: LazyLock<Regex> = LazyLock::new(|| word_pattern(QUESTION_PHRASES));

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:https?)?://(?:(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+(?:[a-z]{2,6}\.?|[a-z0-9-]{2,}\.?)|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S+)$",
    )
    .expect("URL pattern is valid")
});

static DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+(?:[a-z]{2,6}\.?|[a-z0-9-]{2,}\.?)$")
        .expect("domain pattern is valid")
});

/// Classifies a message. Greetings win over farewells, which win over questions.
pub fn categorize(message: &str) -> Intent {
    if GREETING.is_match(message) {
        Intent::Greeting
    } else if FAREWELL.is_match(message) {
        Intent::Farewell
    } else if QUESTION.is_match(message) {
        Intent::Question
    } else {
        Intent::General
    }
}

/// Strips question phrasing to leave the topic to look up.
pub fn extract_search_query(message: &str) -> String {
    let lowered = message.to_lowercase();
    let stripped = QUESTION.replace_all(&lowered, " ");
    let cleaned = stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(['?', '.', '!'])
        .trim()
        .to_string();

    if cleaned.chars().count() < 3 && message.trim().len() > cleaned.len() {
        message.trim().to_string()
    } else {
        cleaned
    }
}

/// True for `http(s)://` URLs, IPs, localhost and bare domain names.
pub fn is_url(text: &str) -> bool {
    URL.is_match(text) || DOMAIN.is_match(text)
}
