//! Text normalization applied to every adapter's raw output before
//! classification and tag extraction.
//!
//! The cleaning order matters: lowercase first, then pictographs, then
//! URL-shaped tokens, then remaining punctuation, then whitespace collapse.
//! Case folding can map characters into the stripped ranges (circled
//! letters, Cherokee), so it has to run before the strip passes. The result
//! is stable under re-normalization, which downstream code relies on (the
//! classifier and tag extractor both assume their input is already in this
//! form).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

// Emoji, pictograph and symbol blocks. The last range is broad on purpose
// and also covers enclosed alphanumerics and CJK ideographs; classification
// is English-only.
static EMOJI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        "[",
        r"\x{1F600}-\x{1F64F}", // emoticons
        r"\x{1F300}-\x{1F5FF}", // symbols & pictographs
        r"\x{1F680}-\x{1F6FF}", // transport & map symbols
        r"\x{1F1E0}-\x{1F1FF}", // regional indicator flags
        r"\x{2500}-\x{2BEF}",
        r"\x{2702}-\x{27B0}",
        r"\x{24C2}-\x{1F251}",
        r"\x{FE00}-\x{FE0F}\x{200D}", // variation selectors and ZWJ
        "]+",
    ))
    .unwrap()
});

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+|www\.\S+").unwrap());

static NON_WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Cleaned, lowercased text ready for vectorization.
///
/// Constructed only by [`normalize`]; the wrapper keeps raw and cleaned text
/// from being mixed up across pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for NormalizedText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Clean a raw text blob. Pure and total: empty input yields empty output,
/// and `normalize(normalize(x)) == normalize(x)` for every `x`.
pub fn normalize(text: &str) -> NormalizedText {
    let text = text.to_lowercase();
    let text = EMOJI_REGEX.replace_all(&text, "");
    let text = URL_REGEX.replace_all(&text, "");
    let text = NON_WORD_REGEX.replace_all(&text, " ");
    let text = WHITESPACE_REGEX.replace_all(&text, " ");
    NormalizedText(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_emoji() {
        assert_eq!(normalize("great trip 🌍✈️ home").as_str(), "great trip home");
        assert_eq!(normalize("🎉🎉🎉").as_str(), "");
    }

    #[test]
    fn strips_links() {
        assert_eq!(
            normalize("read this https://example.com/a?b=c now").as_str(),
            "read this now"
        );
        assert_eq!(normalize("visit www.example.com today").as_str(), "visit today");
        assert_eq!(normalize("SEE WWW.EXAMPLE.COM NOW").as_str(), "see now");
    }

    #[test]
    fn replaces_punctuation_with_spaces() {
        assert_eq!(normalize("Hello, World! (2024)").as_str(), "hello world 2024");
        assert_eq!(normalize("rock-n-roll").as_str(), "rock n roll");
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(normalize("  a \t b\n\nc  ").as_str(), "a b c");
    }

    #[test]
    fn lowercases() {
        assert_eq!(normalize("MiXeD CaSe").as_str(), "mixed case");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize("").as_str(), "");
        assert_eq!(normalize("   ").as_str(), "");
        assert_eq!(normalize("!!! ...").as_str(), "");
    }

    #[test]
    fn underscores_survive_as_word_characters() {
        assert_eq!(normalize("snake_case name").as_str(), "snake_case name");
    }

    #[test]
    fn idempotent_on_messy_input() {
        let messy = "Check 🚀 THIS out!! https://a.io/x www.b.com  foo—bar\tbaz";
        let once = normalize(messy);
        let twice = normalize(once.as_str());
        assert_eq!(once, twice);
    }

    #[test]
    fn strips_cased_variants_of_enclosed_symbols() {
        // Ⓐ lowercases to ⓐ and uppercase Cherokee to the U+AB70 block,
        // both inside the stripped ranges.
        assert_eq!(normalize("Ⓐ ⓐ").as_str(), "");
        assert_eq!(normalize("Check ᏡABC out").as_str(), "check abc out");
    }

    #[test]
    fn idempotent_when_case_folding_lands_in_stripped_ranges() {
        for input in ["Ꭱ", "Ⓐ", "Check ᏡABC out", "HTTPS://EXAMPLE.COM/A b"] {
            let once = normalize(input);
            let twice = normalize(once.as_str());
            assert_eq!(once, twice, "re-normalizing {input:?} changed the result");
        }
    }

    #[cfg(feature = "fuzz")]
    mod fuzz {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn normalize_is_idempotent(input in ".*") {
                let once = normalize(&input);
                let twice = normalize(once.as_str());
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn normalize_output_is_collapsed_and_lowercase(input in ".*") {
                let out = normalize(&input);
                let s = out.as_str();
                prop_assert!(!s.contains("  "));
                prop_assert_eq!(s.trim(), s);
                prop_assert!(!s.chars().any(|c| c.is_ascii_uppercase()));
            }

            // Letters whose lowercase forms fall inside the stripped ranges;
            // plain ".*" almost never generates them.
            #[test]
            fn normalize_is_idempotent_on_cased_symbols(
                input in r"[\x{13A0}-\x{13F5}\x{24B6}-\x{24CF}A-Za-z !.]{0,32}",
            ) {
                let once = normalize(&input);
                let twice = normalize(once.as_str());
                prop_assert_eq!(once, twice);
            }
        }
    }
}
