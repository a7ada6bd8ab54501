//! Intent classifier — maps raw input to exactly one topic category.
//!
//! The priority order is a first-class rule table evaluated by a single
//! dispatch loop: the first rule whose keyword set matches wins, which keeps
//! classification deterministic when several keyword sets could match the
//! same input. Checks are case-insensitive substring tests against the full
//! raw input; there is no tokenization or stemming, and the classifier never
//! sees the repeat flag.

/// Topic assigned to a user turn. Closed set; `Fallback` catches everything
/// the rule table misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Greeting,
    ContactRequest,
    Institution,
    Course,
    Accommodation,
    Application,
    Career,
    Pricing,
    Location,
    Help,
    Fallback,
}

struct Rule {
    category: Category,
    keywords: &'static [&'static str],
}

/// Ordered rule table. Order is the priority order.
const RULES: &[Rule] = &[
    Rule {
        category: Category::Greeting,
        keywords: &[
            "hello",
            "hi",
            "hey",
            "good morning",
            "good afternoon",
            "good evening",
            "greetings",
        ],
    },
    Rule {
        category: Category::ContactRequest,
        keywords: &[
            "contact support",
            "speak to someone",
            "human help",
            "customer service",
            "support team",
            "help me contact",
            "talk to agent",
            "live chat",
            "personal assistance",
        ],
    },
    Rule {
        category: Category::Institution,
        keywords: &["university", "institution", "college"],
    },
    Rule {
        category: Category::Course,
        keywords: &["course", "program", "study", "degree"],
    },
    Rule {
        category: Category::Accommodation,
        keywords: &["accommodation", "housing", "residence", "room"],
    },
    Rule {
        category: Category::Application,
        keywords: &["apply", "application", "admission"],
    },
    Rule {
        category: Category::Career,
        keywords: &["career", "assessment", "test", "guidance"],
    },
    Rule {
        category: Category::Pricing,
        keywords: &["price", "cost", "fee", "money"],
    },
    Rule {
        category: Category::Location,
        keywords: &["johannesburg", "cape town", "durban", "pretoria", "location"],
    },
    Rule {
        category: Category::Help,
        keywords: &["help", "how", "what"],
    },
];

/// Classify raw input into exactly one category.
pub fn classify(input: &str) -> Category {
    let lower = input.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .map(|rule| rule.category)
        .unwrap_or(Category::Fallback)
}
