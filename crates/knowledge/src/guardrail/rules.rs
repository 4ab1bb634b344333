//! Rule tables for question classification.

use regex::Regex;
use std::sync::LazyLock;

/// Whole-question greetings, compared after normalization.
pub(crate) const EXACT_GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "greetings",
    "good morning",
    "good afternoon",
    "good evening",
    "howdy",
    "hiya",
    "sup",
    "what's up",
    "whats up",
    "hello there",
];

/// Small-talk phrases that may appear anywhere in a question.
pub(crate) const CASUAL_PHRASES: &[&str] = &[
    "how are you",
    "how r u",
    "what can you do",
    "what do you do",
    "who are you",
    "help",
    "thanks",
    "thank you",
    "bye",
    "goodbye",
];

const ADVICE_KEYWORDS: &[&str] = &[
    "should i invest",
    "should i buy",
    "should i",
    "recommend",
    "suggest",
    "advice",
    "best fund",
    "better fund",
    "which fund",
    "how much to invest",
    "how much should i",
    "is it good",
    "is it worth",
    "is this good",
    "portfolio",
    "allocation",
    "diversify",
    "when to invest",
    "when should i",
    "good time to invest",
    "right time",
    "predict",
    "future returns",
    "will it grow",
    "will give",
    "guaranteed returns",
    "good investment",
    "good returns",
    "compare",
];

const ADVICE_PATTERNS: &[&str] = &[
    r"^should i\b",
    r"^can i\b.*invest",
    r"^will\b.*\b(give|provide|return)",
    r"\bvs\b",
    r"\bversus\b",
    r"\bcompare\b",
    r"\bbetter than\b",
    r"\bworth investing\b",
    r"\bgood investment\b",
    r"^which\b.*\b(fund|better|best)",
];

/// Which canned greeting to send back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreetingKind {
    Identity,
    WellBeing,
    Capability,
    SelfIdentity,
    Help,
    Thanks,
    Farewell,
    Fallback,
}

/// Greeting reply rules, first match wins.
const GREETING_PRIORITY: &[(GreetingKind, &[&str])] = &[
    (
        GreetingKind::Identity,
        &[
            "hi",
            "hiya",
            "hello",
            "hello there",
            "hey",
            "good morning",
            "good afternoon",
            "good evening",
        ],
    ),
    (GreetingKind::WellBeing, &["how are you", "how r u"]),
    (GreetingKind::Capability, &["what can you do", "what do you do"]),
    (GreetingKind::SelfIdentity, &["who are you"]),
    (GreetingKind::Help, &["help"]),
    (GreetingKind::Thanks, &["thanks", "thank you"]),
    (GreetingKind::Farewell, &["bye", "goodbye"]),
];

fn word_bounded(phrase: &str) -> Option<Regex> {
    Regex::new(&format!(r"\b{}\b", regex::escape(phrase))).ok()
}

fn compile_phrases(phrases: &[&str]) -> Vec<Regex> {
    phrases.iter().filter_map(|p| word_bounded(p)).collect()
}

static CASUAL_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_phrases(CASUAL_PHRASES));

static ADVICE_KEYWORD_RES: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile_phrases(ADVICE_KEYWORDS));

static ADVICE_PATTERN_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ADVICE_PATTERNS
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
});

static GREETING_PRIORITY_RES: LazyLock<Vec<(GreetingKind, Vec<Regex>)>> = LazyLock::new(|| {
    GREETING_PRIORITY
        .iter()
        .map(|(kind, phrases)| (*kind, compile_phrases(phrases)))
        .collect()
});

/// Lowercased and trimmed.
pub(crate) fn normalize(question: &str) -> String {
    question.trim().to_lowercase()
}

pub(crate) fn is_greeting(normalized: &str) -> bool {
    let bare = normalized.trim_end_matches(['!', '?', '.']).trim_end();
    if EXACT_GREETINGS.contains(&bare) {
        return true;
    }

    CASUAL_RES.iter().any(|re| re.is_match(normalized))
}

pub(crate) fn is_advice(normalized: &str) -> bool {
    ADVICE_KEYWORD_RES.iter().any(|re| re.is_match(normalized))
        || ADVICE_PATTERN_RES.iter().any(|re| re.is_match(normalized))
}

pub(crate) fn greeting_kind(normalized: &str) -> GreetingKind {
    GREETING_PRIORITY_RES
        .iter()
        .find(|(_, res)| res.iter().any(|re| re.is_match(normalized)))
        .map(|(kind, _)| *kind)
        .unwrap_or(GreetingKind::Fallback)
}
