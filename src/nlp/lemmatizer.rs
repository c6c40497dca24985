//! Rule-based English lemmatization.
//!
//! Words are treated as nouns: irregular plurals come from an exception table,
//! regular plurals are reduced by suffix rules.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::{BotError, Result};

/// Reduces a word to its base form.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, word: &str) -> Result<String>;

    fn name(&self) -> &'static str;
}

static IRREGULAR: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("children", "child"),
        ("people", "person"),
        ("men", "man"),
        ("women", "woman"),
        ("mice", "mouse"),
        ("geese", "goose"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("leaves", "leaf"),
        ("lives", "life"),
        ("knives", "knife"),
        ("wives", "wife"),
        ("wolves", "wolf"),
        ("halves", "half"),
        ("data", "datum"),
        ("criteria", "criterion"),
        ("phenomena", "phenomenon"),
    ]
    .into_iter()
    .collect()
});

/// Suffix rewrites, checked in order; the first matching suffix wins.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("sses", "ss"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("zes", "z"),
    ("ies", "y"),
    ("s", ""),
];

/// Endings that look plural but are usually singular.
const KEEP_ENDINGS: &[&str] = &["ss", "us", "is", "ous"];

/// Noun lemmatizer driven by static tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleLemmatizer;

impl Lemmatizer for RuleLemmatizer {
    fn lemmatize(&self, word: &str) -> Result<String> {
        if !word.chars().any(char::is_alphabetic) {
            return Err(BotError::Text(format!("cannot lemmatize '{}'", word)));
        }

        if let Some(base) = IRREGULAR.get(word) {
            return Ok((*base).to_string());
        }

        if word.chars().count() <= 3 || KEEP_ENDINGS.iter().any(|e| word.ends_with(e)) {
            return Ok(word.to_string());
        }

        for (suffix, replacement) in SUFFIX_RULES {
            if let Some(stem) = word.strip_suffix(suffix) {
                if stem.chars().count() >= 2 {
                    return Ok(format!("{}{}", stem, replacement));
                }
                break;
            }
        }

        Ok(word.to_string())
    }

    fn name(&self) -> &'static str {
        "rule"
    }
}
