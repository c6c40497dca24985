//! TF-IDF bag-of-words feature extraction

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{BotError, Result};

static TERM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid term pattern"));

/// Sparse row: (feature index, weight), sorted by index
pub type SparseRow = Vec<(usize, f64)>;

/// Lowercased terms of two or more word characters
pub fn terms(doc: &str) -> Vec<String> {
    let lower = doc.to_lowercase();
    TERM.find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and idf weights.
    ///
    /// Keeps the `max_features` most frequent terms across all documents,
    /// ties broken alphabetically; feature indices follow alphabetical order.
    pub fn fit(docs: &[&str], max_features: usize) -> Result<Self> {
        if docs.is_empty() {
            return Err(BotError::EmptyTrainingSet);
        }
        if max_features == 0 {
            return Err(BotError::Model("max_features must be positive".to_string()));
        }

        let mut term_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in docs {
            let doc_terms = terms(doc);
            let unique: HashSet<&String> = doc_terms.iter().collect();
            for term in unique {
                *doc_freq.entry(term.clone()).or_default() += 1;
            }
            for term in doc_terms {
                *term_freq.entry(term).or_default() += 1;
            }
        }

        if term_freq.is_empty() {
            return Err(BotError::Model(
                "empty vocabulary; documents contain no usable terms".to_string(),
            ));
        }

        let mut ranked: Vec<(String, usize)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(max_features);
        ranked.sort_by(|a, b| a.0.cmp(&b.0));

        let n_docs = docs.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(ranked.len());

        for (index, (term, _)) in ranked.into_iter().enumerate() {
            let df = doc_freq.get(&term).copied().unwrap_or(0) as f64;
            idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        Ok(Self { vocabulary, idf })
    }

    /// L2-normalised tf-idf row; empty when no term is in the vocabulary
    pub fn transform(&self, doc: &str) -> SparseRow {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in terms(doc) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_default() += 1.0;
            }
        }

        let mut row: SparseRow = counts
            .into_iter()
            .filter_map(|(index, count)| self.idf.get(index).map(|idf| (index, count * idf)))
            .collect();

        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, weight) in row.iter_mut() {
                *weight /= norm;
            }
        }

        row
    }

    /// Check that every vocabulary index has a finite idf weight
    pub fn validate(&self) -> Result<()> {
        if self.vocabulary.is_empty() {
            return Err(BotError::Model("empty vocabulary".to_string()));
        }
        if self.vocabulary.len() != self.idf.len() {
            return Err(BotError::Model(format!(
                "{} vocabulary terms but {} idf weights",
                self.vocabulary.len(),
                self.idf.len()
            )));
        }

        let mut seen = vec![false; self.idf.len()];
        for (term, &index) in &self.vocabulary {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(BotError::Model(format!(
                        "term '{}' has invalid feature index {}",
                        term, index
                    )))
                }
            }
        }
        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err(BotError::Model("non-finite idf weight".to_string()));
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_drop_single_characters() {
        assert_eq!(terms("What is a Star?"), vec!["what", "is", "star"]);
    }

    #[test]
    fn test_fit_vocabulary() {
        let vectorizer = TfidfVectorizer::fit(&["what is water", "what is ice"], 100).unwrap();

        assert_eq!(vectorizer.len(), 4);
        assert!(vectorizer.contains("water"));
        assert!(vectorizer.contains("ice"));
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let vectorizer =
            TfidfVectorizer::fit(&["what is water", "what is ice", "what time"], 2).unwrap();

        assert_eq!(vectorizer.len(), 2);
        assert!(vectorizer.contains("what"));
        assert!(vectorizer.contains("is"));
        assert!(!vectorizer.contains("water"));
    }

    #[test]
    fn test_max_features_ties_alphabetical() {
        let vectorizer = TfidfVectorizer::fit(&["zebra apple mango"], 2).unwrap();

        assert!(vectorizer.contains("apple"));
        assert!(vectorizer.contains("mango"));
        assert!(!vectorizer.contains("zebra"));
    }

    #[test]
    fn test_transform_is_unit_length() {
        let vectorizer = TfidfVectorizer::fit(&["what is water", "what is ice"], 100).unwrap();
        let row = vectorizer.transform("water water ice");

        let norm: f64 = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_rare_terms_weigh_more() {
        let vectorizer = TfidfVectorizer::fit(&["what is water", "what is ice"], 100).unwrap();
        let row = vectorizer.transform("what water");

        assert_eq!(row.len(), 2);
        let weight_of = |term_index: usize| row.iter().find(|(i, _)| *i == term_index).unwrap().1;
        // alphabetical indices: ice=0, is=1, water=2, what=3
        assert!(weight_of(2) > weight_of(3));
    }

    #[test]
    fn test_unknown_terms_give_empty_row() {
        let vectorizer = TfidfVectorizer::fit(&["what is water"], 100).unwrap();
        assert!(vectorizer.transform("quantum chromodynamics").is_empty());
    }

    #[test]
    fn test_validate() {
        let vectorizer = TfidfVectorizer::fit(&["what is water", "what is ice"], 100).unwrap();
        assert!(vectorizer.validate().is_ok());

        let truncated = TfidfVectorizer {
            idf: Vec::new(),
            ..vectorizer.clone()
        };
        assert!(matches!(truncated.validate(), Err(BotError::Model(_))));
        assert!(truncated.transform("water").is_empty());

        let mut clashing = vectorizer;
        clashing.vocabulary.insert("ice".to_string(), 3);
        assert!(matches!(clashing.validate(), Err(BotError::Model(_))));
    }

    #[test]
    fn test_fit_errors() {
        assert!(matches!(TfidfVectorizer::fit(&[], 10), Err(BotError::EmptyTrainingSet)));
        assert!(matches!(TfidfVectorizer::fit(&["a b c"], 10), Err(BotError::Model(_))));
        assert!(matches!(TfidfVectorizer::fit(&["hello"], 0), Err(BotError::Model(_))));
    }
}
