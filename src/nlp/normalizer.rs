//! Text normalization: lowercase, strip punctuation and digits, tokenize,
//! drop stopwords, lemmatize.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, warn};

use super::lemmatizer::{Lemmatizer, RuleLemmatizer};
use super::stopwords::is_stopword;
use super::tokenizer::{whitespace_tokens, Tokenizer, UnicodeWordTokenizer};

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digit pattern"));

/// Normalizes raw utterances into space-joined base-form tokens.
pub struct Normalizer {
    tokenizer: Box<dyn Tokenizer>,
    lemmatizer: Box<dyn Lemmatizer>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Box::new(UnicodeWordTokenizer), Box::new(RuleLemmatizer))
    }
}

impl Normalizer {
    pub fn new(tokenizer: Box<dyn Tokenizer>, lemmatizer: Box<dyn Lemmatizer>) -> Self {
        Self {
            tokenizer,
            lemmatizer,
        }
    }

    /// Normalize `text`.
    ///
    /// Never fails. When every token is filtered out the cleaned (lowercased,
    /// punctuation- and digit-free) text is returned instead, so the result is
    /// only empty when there was nothing to clean.
    pub fn normalize(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let cleaned = clean(text);

        let tokens = match self.tokenizer.tokenize(&cleaned) {
            Ok(tokens) => tokens,
            Err(e) => {
                error!(
                    "Tokenizer {} failed: {}. Using whitespace fallback.",
                    self.tokenizer.name(),
                    e
                );
                whitespace_tokens(&cleaned)
            }
        };

        let lemmas: Vec<String> = tokens
            .into_iter()
            .filter(|token| !token.is_empty() && !is_stopword(token))
            .map(|token| match self.lemmatizer.lemmatize(&token) {
                Ok(lemma) => lemma,
                Err(e) => {
                    warn!("Lemmatization failed for '{}': {}", token, e);
                    token
                }
            })
            .collect();

        if lemmas.is_empty() {
            return cleaned;
        }

        lemmas.join(" ")
    }

    /// Normalize optional text; `None` yields an empty string.
    pub fn normalize_opt(&self, text: Option<&str>) -> String {
        text.map(|t| self.normalize(t)).unwrap_or_default()
    }
}

/// Lowercase, drop ASCII punctuation, drop digit runs.
pub fn clean(text: &str) -> String {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();

    DIGITS.replace_all(&lowered, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BotError, Result};
    use pretty_assertions::assert_eq;

    struct BrokenTokenizer;

    impl Tokenizer for BrokenTokenizer {
        fn tokenize(&self, _text: &str) -> Result<Vec<String>> {
            Err(BotError::Text("tokenizer unavailable".to_string()))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    struct BrokenLemmatizer;

    impl Lemmatizer for BrokenLemmatizer {
        fn lemmatize(&self, word: &str) -> Result<String> {
            Err(BotError::Text(format!("no lemma for {}", word)))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    #[test]
    fn test_basic_normalization() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.normalize("What is Water?"), "water");
        assert_eq!(normalizer.normalize("Tell me 3 jokes!!"), "tell joke");
    }

    #[test]
    fn test_empty_input() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize_opt(None), "");
    }

    #[test]
    fn test_all_stopwords_falls_back_to_cleaned_text() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.normalize("How are YOU?"), "how are you");
    }

    #[test]
    fn test_only_punctuation_and_digits() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.normalize("!!! 42 ???"), "  ");
    }

    #[test]
    fn test_tokenizer_failure_uses_whitespace_split() {
        let normalizer = Normalizer::new(Box::new(BrokenTokenizer), Box::new(RuleLemmatizer));
        assert_eq!(normalizer.normalize("the cats and the dogs"), "cat dog");
    }

    #[test]
    fn test_lemmatizer_failure_keeps_token() {
        let normalizer =
            Normalizer::new(Box::new(UnicodeWordTokenizer), Box::new(BrokenLemmatizer));
        assert_eq!(normalizer.normalize("the cats and the dogs"), "cats dogs");
    }

    #[test]
    fn test_never_panics_on_odd_input() {
        let normalizer = Normalizer::default();
        let inputs = ["\u{0}", "ÉCOLE", "日本語のテキスト", "🙂🙂", "a\u{301}", "   \t\n", "٣٤٥"];
        for input in inputs {
            let _ = normalizer.normalize(input);
        }
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean("Hello, World! 2024"), "hello world ");
    }
}
