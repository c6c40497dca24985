//! Word tokenizers used by the normalizer.

use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;

/// Splits text into word tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;

    fn name(&self) -> &'static str;
}

/// Tokenizer based on Unicode word boundaries (UAX #29).
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeWordTokenizer;

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(text.unicode_words().map(str::to_string).collect())
    }

    fn name(&self) -> &'static str {
        "unicode_word"
    }
}

/// Naive whitespace splitting. Cannot fail.
pub fn whitespace_tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unicode_words() {
        let tokens = UnicodeWordTokenizer.tokenize("tell me  a joke\tplease").unwrap();
        assert_eq!(tokens, vec!["tell", "me", "a", "joke", "please"]);
    }

    #[test]
    fn test_unicode_words_empty() {
        assert!(UnicodeWordTokenizer.tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_tokens() {
        assert_eq!(whitespace_tokens(" see  you\nlater "), vec!["see", "you", "later"]);
    }
}
