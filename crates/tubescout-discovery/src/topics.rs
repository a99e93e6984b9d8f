//! Built-in topic patterns and the keyword set used for relevance scoring.

use crate::types::TopicAnalysis;

/// A keyword set never grows past this many terms.
pub const MAX_KEYWORDS: usize = 10;

/// A recognizable audience topic with the lowercase keywords that signal it.
#[derive(Debug)]
pub struct TopicPattern {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

/// Ordered fallback table: the first pattern with any keyword hit wins, so
/// seasonal/audience topics outrank broad format topics like Music.
pub(crate) const TOPIC_PATTERNS: &[TopicPattern] = &[
    TopicPattern {
        name: "Christmas",
        keywords: &["christmas", "xmas", "holiday", "santa", "noel", "festive", "carol"],
    },
    TopicPattern {
        name: "Kids Entertainment",
        keywords: &["kids", "children", "nursery", "toddler", "cartoon", "rhymes"],
    },
    TopicPattern {
        name: "Gaming",
        keywords: &["gaming", "gameplay", "playthrough", "minecraft", "fortnite", "roblox"],
    },
    TopicPattern {
        name: "Cooking",
        keywords: &["cooking", "recipe", "baking", "kitchen", "chef"],
    },
    TopicPattern {
        name: "Fitness",
        keywords: &["fitness", "workout", "gym", "yoga", "exercise"],
    },
    TopicPattern {
        name: "Music",
        keywords: &["music", "song", "cover", "remix", "instrumental"],
    },
    TopicPattern {
        name: "Tech",
        keywords: &["tech", "review", "unboxing", "gadget", "smartphone"],
    },
];

/// Finds the first pattern with any keyword present in `haystack`.
/// The haystack is lowercased here; callers pass raw text.
pub(crate) fn match_topic(haystack: &str) -> Option<&'static TopicPattern> {
    let lower = haystack.to_lowercase();
    TOPIC_PATTERNS
        .iter()
        .find(|pattern| pattern.keywords.iter().any(|k| lower.contains(k)))
}

/// Deduplicated, lower-cased scoring terms derived from the primary topic.
///
/// Built once per request from `primary_topic_keywords`, the primary topic
/// itself, and any matching built-in pattern. Style terms never enter the
/// set, which is what keeps style-only matches unrewarded.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    terms: Vec<String>,
}

impl KeywordSet {
    /// Builds the set from a classifier output.
    #[must_use]
    pub fn from_analysis(analysis: &TopicAnalysis) -> Self {
        let mut terms: Vec<String> = Vec::new();
        let mut push = |raw: &str| {
            let term = raw.trim().to_lowercase();
            if !term.is_empty() && !terms.contains(&term) && terms.len() < MAX_KEYWORDS {
                terms.push(term);
            }
        };

        for keyword in &analysis.primary_topic_keywords {
            push(keyword);
        }
        push(&analysis.primary_topic);

        let topic_lower = analysis.primary_topic.trim().to_lowercase();
        let pattern = TOPIC_PATTERNS.iter().find(|p| {
            p.name.to_lowercase() == topic_lower || p.keywords.contains(&topic_lower.as_str())
        });
        if let Some(pattern) = pattern {
            for keyword in pattern.keywords {
                push(keyword);
            }
        }

        Self { terms }
    }

    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Counts how many terms occur in `text` (case-insensitive substring).
    #[must_use]
    pub fn count_matches(&self, text: &str) -> usize {
        let lower = text.to_lowercase();
        self.terms.iter().filter(|t| lower.contains(t.as_str())).count()
    }
}
