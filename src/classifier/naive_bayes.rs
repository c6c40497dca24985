//! Multinomial naive Bayes over sparse tf-idf rows

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::vectorizer::SparseRow;
use crate::error::{BotError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNb {
    /// Class labels in sorted order
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    /// `[class][feature]` smoothed log probabilities
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    pub fn fit(rows: &[SparseRow], labels: &[&str], n_features: usize, alpha: f64) -> Result<Self> {
        if rows.is_empty() {
            return Err(BotError::EmptyTrainingSet);
        }
        if rows.len() != labels.len() {
            return Err(BotError::Model(format!(
                "{} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(BotError::Model(format!("invalid smoothing alpha {}", alpha)));
        }

        let mut class_index: BTreeMap<&str, usize> = labels.iter().map(|l| (*l, 0)).collect();
        for (index, slot) in class_index.values_mut().enumerate() {
            *slot = index;
        }

        let n_classes = class_index.len();
        let mut class_count = vec![0usize; n_classes];
        let mut feature_count = vec![vec![0.0f64; n_features]; n_classes];

        for (row, label) in rows.iter().zip(labels) {
            let c = class_index[label];
            class_count[c] += 1;
            for &(feature, weight) in row {
                if feature >= n_features {
                    return Err(BotError::Model(format!(
                        "feature index {} out of range {}",
                        feature, n_features
                    )));
                }
                feature_count[c][feature] += weight;
            }
        }

        let total = rows.len() as f64;
        let class_log_prior = class_count
            .iter()
            .map(|&count| (count as f64 / total).ln())
            .collect();

        let feature_log_prob = feature_count
            .into_iter()
            .map(|counts| {
                let denominator = (counts.iter().sum::<f64>() + alpha * n_features as f64).ln();
                counts
                    .into_iter()
                    .map(|count| (count + alpha).ln() - denominator)
                    .collect()
            })
            .collect();

        Ok(Self {
            classes: class_index.into_keys().map(str::to_string).collect(),
            class_log_prior,
            feature_log_prob,
        })
    }

    /// Joint log-likelihood of `row` under each class
    pub fn scores(&self, row: &[(usize, f64)]) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_probs)| {
                prior
                    + row
                        .iter()
                        .filter_map(|&(feature, weight)| {
                            log_probs.get(feature).map(|lp| weight * lp)
                        })
                        .sum::<f64>()
            })
            .collect()
    }

    /// Most likely class; ties go to the earliest class in sorted order
    pub fn predict(&self, row: &[(usize, f64)]) -> Option<&str> {
        let mut best: Option<(usize, f64)> = None;
        for (index, score) in self.scores(row).into_iter().enumerate() {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((index, score)),
            }
        }
        best.and_then(|(index, _)| self.classes.get(index))
            .map(String::as_str)
    }

    /// Check that per-class tables agree with each other and with `n_features`
    pub fn validate(&self, n_features: usize) -> Result<()> {
        let n_classes = self.classes.len();
        if n_classes == 0 {
            return Err(BotError::Model("no classes".to_string()));
        }
        if self.class_log_prior.len() != n_classes || self.feature_log_prob.len() != n_classes {
            return Err(BotError::Model(format!(
                "{} classes but {} priors and {} feature rows",
                n_classes,
                self.class_log_prior.len(),
                self.feature_log_prob.len()
            )));
        }
        if let Some(row) = self.feature_log_prob.iter().find(|r| r.len() != n_features) {
            return Err(BotError::Model(format!(
                "feature row of length {} (expected {})",
                row.len(),
                n_features
            )));
        }

        Ok(())
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> MultinomialNb {
        // features: 0 = "sun", 1 = "moon", 2 = "water"
        let rows = vec![
            vec![(0, 1.0)],
            vec![(1, 1.0)],
            vec![(2, 0.8), (0, 0.6)],
        ];
        MultinomialNb::fit(&rows, &["sun answer", "moon answer", "water answer"], 3, 1.0).unwrap()
    }

    #[test]
    fn test_classes_sorted() {
        assert_eq!(toy().classes(), &["moon answer", "sun answer", "water answer"]);
    }

    #[test]
    fn test_predicts_matching_class() {
        let model = toy();
        assert_eq!(model.predict(&[(1, 1.0)]), Some("moon answer"));
        assert_eq!(model.predict(&[(2, 1.0)]), Some("water answer"));
        assert_eq!(model.predict(&[(0, 1.0)]), Some("sun answer"));
    }

    #[test]
    fn test_empty_row_ties_to_first_class() {
        assert_eq!(toy().predict(&[]), Some("moon answer"));
    }

    #[test]
    fn test_duplicate_labels_share_a_class() {
        let rows = vec![vec![(0, 1.0)], vec![(1, 1.0)], vec![(0, 1.0)]];
        let model = MultinomialNb::fit(&rows, &["a", "b", "a"], 2, 1.0).unwrap();

        assert_eq!(model.classes().len(), 2);
        // "a" has the larger prior
        assert_eq!(model.predict(&[]), Some("a"));
    }

    #[test]
    fn test_validate_sizes() {
        let model = toy();
        assert!(model.validate(3).is_ok());
        assert!(matches!(model.validate(4), Err(BotError::Model(_))));

        let mut short = model;
        short.classes.pop();
        assert!(matches!(short.validate(3), Err(BotError::Model(_))));
        // a class without a label is skipped instead of indexing past the end
        assert_eq!(short.predict(&[(2, 1.0)]), None);
    }

    #[test]
    fn test_fit_validation() {
        assert!(MultinomialNb::fit(&[], &[], 3, 1.0).is_err());
        assert!(MultinomialNb::fit(&[vec![(0, 1.0)]], &["a", "b"], 3, 1.0).is_err());
        assert!(MultinomialNb::fit(&[vec![(0, 1.0)]], &["a"], 3, 0.0).is_err());
        assert!(MultinomialNb::fit(&[vec![(5, 1.0)]], &["a"], 3, 1.0).is_err());
    }
}
