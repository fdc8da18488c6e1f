use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::classifier::TfidfVectorizer;
use crate::normalize::NormalizedText;

pub const DEFAULT_TOP_N: usize = 5;

/// Words that rank high on social-media text without describing it:
/// platform furniture, function words and conversational verbs.
const PLATFORM_NOISE: &[&str] = &[
    "video", "watch", "channel", "subscribe", "like", "comment", "click", "http", "https", "com",
    "www", "youtube", "videos", "please", "thanks", "thank", "hey", "hi", "hello", "the", "a",
    "an", "and", "is", "are", "to", "for", "of", "on", "in", "with", "at", "this", "that", "it",
    "as", "by", "from", "about", "but", "or", "so", "if", "then", "than", "what", "which", "who",
    "said", "will", "were", "had", "his", "was", "he", "she", "they", "them", "their", "its",
    "my", "your", "our", "us", "her", "him", "me", "you", "we", "i", "not", "no", "yes", "do",
    "does", "doing", "done", "did", "has", "have", "be", "being", "been", "am", "shall", "should",
    "can", "could", "may", "might", "must", "ought", "need", "want", "love", "hate", "prefer",
    "enjoy", "dislike", "try", "wish", "hope", "believe", "think", "know", "understand", "see",
    "hear", "feel", "smell", "taste", "touch", "look", "listen", "read", "write", "speak", "say",
    "tell", "ask", "answer", "reply", "respond", "explain", "describe", "show", "demonstrate",
    "illustrate", "prove", "disprove", "argue", "debate", "discuss", "talk", "converse", "chat",
    "greet", "meet", "introduce", "present", "offer", "suggest", "recommend", "advise", "counsel",
    "inform", "notify", "alert",
];

static STOP_WORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    let mut words: HashSet<String> = stop_words::get(stop_words::LANGUAGE::English)
        .into_iter()
        .collect();
    words.extend(PLATFORM_NOISE.iter().map(|word| word.to_string()));
    words
});

/// Turns the strongest TF-IDF terms of `text` into at most `top_n` tags.
///
/// Candidates are ranked by weight (ties broken toward the lower feature
/// column), stop words and words shorter than three characters are dropped,
/// and a candidate is discarded when any of its words already appears in an
/// accepted tag. Degenerate input yields an empty list rather than an error.
pub fn extract_tags(
    vectorizer: &TfidfVectorizer,
    text: &NormalizedText,
    top_n: usize,
) -> Vec<String> {
    if top_n == 0 {
        return Vec::new();
    }

    let vector = vectorizer.transform(text.as_str());

    let mut ranked: Vec<(usize, f64)> = vector.entries().to_vec();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut tags: Vec<String> = Vec::new();
    let mut seen_words: HashSet<&str> = HashSet::new();

    for &(column, _) in ranked.iter().take(top_n * 2) {
        let Some(term) = vectorizer.term(column) else {
            continue;
        };

        let words: Vec<&str> = term
            .split_whitespace()
            .filter(|word| word.chars().count() > 2 && !STOP_WORDS.contains(*word))
            .collect();
        if words.is_empty() {
            continue;
        }
        if words.iter().any(|word| seen_words.contains(word)) {
            continue;
        }

        seen_words.extend(words.iter().copied());
        tags.push(words.join(" "));
        if tags.len() >= top_n {
            break;
        }
    }

    tags
}
