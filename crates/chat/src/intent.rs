//! Intent detection: an ordered `(pattern, intent)` rule table.
//!
//! Rules are evaluated top to bottom against the normalized message and the
//! first match wins. Nothing here is learned; the same text always yields the
//! same intent.

/// What the user is asking about.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Intent {
    Greeting,
    Thanks,
    Capabilities,
    OffTopic,
    WhatIsEwaste,
    WhyDangerous,
    Dustbin,
    Examples,
    NearestCentre,
    Hazards,
    Tips,
    DisposalSteps,
    Identify,
    ItemMention,
    /// No rule matched.
    Unknown,
}

impl Intent {
    /// Intents that can only be answered about a previously detected item.
    pub fn needs_item_context(self) -> bool {
        matches!(
            self,
            Intent::Hazards | Intent::Tips | Intent::DisposalSteps | Intent::Identify
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Thanks => "thanks",
            Intent::Capabilities => "capabilities",
            Intent::OffTopic => "off_topic",
            Intent::WhatIsEwaste => "what_is_ewaste",
            Intent::WhyDangerous => "why_dangerous",
            Intent::Dustbin => "dustbin",
            Intent::Examples => "examples",
            Intent::NearestCentre => "nearest_centre",
            Intent::Hazards => "hazards",
            Intent::Tips => "tips",
            Intent::DisposalSteps => "disposal_steps",
            Intent::Identify => "identify",
            Intent::ItemMention => "item_mention",
            Intent::Unknown => "unknown",
        }
    }
}

/// A matcher over a normalized message.
#[derive(Debug, Copy, Clone)]
pub enum Pattern {
    /// Any of the words appears as a whole token.
    AnyWord(&'static [&'static str]),
    /// Any of the phrases appears as a substring of the normalized text.
    AnyPhrase(&'static [&'static str]),
    /// Any of the nested patterns matches.
    AnyOf(&'static [Pattern]),
    /// Every nested pattern matches.
    AllOf(&'static [Pattern]),
}

impl Pattern {
    pub fn matches(&self, msg: &Normalized) -> bool {
        match self {
            Pattern::AnyWord(words) => words.iter().any(|w| msg.has_word(w)),
            Pattern::AnyPhrase(phrases) => phrases.iter().any(|p| msg.text.contains(p)),
            Pattern::AnyOf(patterns) => patterns.iter().any(|p| p.matches(msg)),
            Pattern::AllOf(patterns) => patterns.iter().all(|p| p.matches(msg)),
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct Rule {
    pub pattern: Pattern,
    pub intent: Intent,
}

const fn rule(pattern: Pattern, intent: Intent) -> Rule {
    Rule { pattern, intent }
}

const EWASTE: Pattern = Pattern::AnyOf(&[
    Pattern::AnyWord(&["e-waste", "ewaste"]),
    Pattern::AnyPhrase(&["e waste", "electronic waste"]),
]);

/// The rule table, in evaluation order.
pub const RULES: &[Rule] = &[
    rule(
        Pattern::AnyOf(&[
            Pattern::AnyWord(&["hello", "hi", "hey", "hiya", "namaste"]),
            Pattern::AnyPhrase(&["good morning", "good afternoon", "good evening"]),
        ]),
        Intent::Greeting,
    ),
    rule(
        Pattern::AnyWord(&["thank", "thanks", "thx", "tnx", "bye", "goodbye"]),
        Intent::Thanks,
    ),
    rule(
        Pattern::AnyPhrase(&["who are you", "what can you do", "who r u", "what do you do"]),
        Intent::Capabilities,
    ),
    rule(
        Pattern::AnyWord(&[
            "cricket", "football", "movie", "movies", "actor", "actress", "politics", "song",
            "songs", "story", "math", "maths", "science", "chemistry", "physics", "coding",
            "python", "java", "food", "recipe", "love", "relationship", "weather", "news",
        ]),
        Intent::OffTopic,
    ),
    rule(
        Pattern::AnyPhrase(&[
            "what is e-waste",
            "what is e waste",
            "what is ewaste",
            "what's e-waste",
            "define e-waste",
            "meaning of e-waste",
        ]),
        Intent::WhatIsEwaste,
    ),
    rule(
        Pattern::AllOf(&[
            EWASTE,
            Pattern::AnyWord(&["why", "dangerous", "harmful", "bad", "toxic"]),
        ]),
        Intent::WhyDangerous,
    ),
    rule(
        Pattern::AnyWord(&["dustbin", "trash", "garbage", "bin", "landfill"]),
        Intent::Dustbin,
    ),
    rule(
        Pattern::AnyPhrase(&[
            "examples of e-waste",
            "types of e-waste",
            "kinds of e-waste",
            "e-waste items",
            "what counts as e-waste",
        ]),
        Intent::Examples,
    ),
    rule(
        Pattern::AnyOf(&[
            Pattern::AnyPhrase(&[
                "recycling centre",
                "recycling center",
                "recycle centre",
                "recycle center",
                "collection centre",
                "collection center",
                "where to give",
                "where can i give",
                "near me",
            ]),
            Pattern::AnyWord(&["nearest", "nearby"]),
        ]),
        Intent::NearestCentre,
    ),
    rule(
        Pattern::AnyWord(&[
            "safe", "unsafe", "harmful", "dangerous", "danger", "risk", "risks", "risky", "toxic",
            "hazard", "hazards", "hazardous",
        ]),
        Intent::Hazards,
    ),
    rule(
        Pattern::AnyWord(&["tip", "tips", "advice", "suggest", "suggestion", "suggestions"]),
        Intent::Tips,
    ),
    rule(
        Pattern::AnyOf(&[
            Pattern::AnyWord(&["how", "dispose", "disposal", "discard", "throw", "recycle"]),
            Pattern::AnyPhrase(&["get rid", "what should i do", "what do i do"]),
        ]),
        Intent::DisposalSteps,
    ),
    rule(
        Pattern::AnyPhrase(&[
            "what is this",
            "what is it",
            "what item",
            "what product",
            "which item",
            "what did you detect",
        ]),
        Intent::Identify,
    ),
    rule(
        Pattern::AnyOf(&[
            Pattern::AnyWord(&[
                "waste", "e-waste", "ewaste", "electronic", "electronics", "battery", "batteries",
                "mobile", "phone", "laptop", "tv", "television", "printer", "microwave", "pcb",
                "keyboard", "mouse", "charger",
            ]),
            Pattern::AnyPhrase(&["washing machine"]),
        ]),
        Intent::ItemMention,
    ),
];

/// A message lowercased, whitespace-collapsed and tokenized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    text: String,
    words: Vec<String>,
}

impl Normalized {
    pub fn new(raw: &str) -> Self {
        let text = raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let words = text
            .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '\''))
            .map(|w| w.trim_matches(|c| c == '-' || c == '\''))
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self { text, words }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn has_word(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Classify a message with the default rule table.
pub fn detect_intent(message: &str) -> Intent {
    detect_with(RULES, &Normalized::new(message))
}

pub fn detect_with(rules: &[Rule], msg: &Normalized) -> Intent {
    rules
        .iter()
        .find(|r| r.pattern.matches(msg))
        .map(|r| r.intent)
        .unwrap_or(Intent::Unknown)
}
