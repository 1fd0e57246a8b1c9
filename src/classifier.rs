use crate::statistics::Observation;
use serde::Serialize;
use std::path::PathBuf;

const SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("failed to read lexicon {path}: {source}")]
    ReadLexicon {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse lexicon {path}: {source}")]
    ParseLexicon {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("lexicon {0} has no sentiment words")]
    EmptyLexicon(PathBuf),

    #[error("invalid distribution: negative={negative}, neutral={neutral}, positive={positive}")]
    InvalidDistribution {
        negative: f64,
        neutral: f64,
        positive: f64,
    },

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Class probabilities over negative, neutral and positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probabilities {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
}

impl Probabilities {
    /// Validates that the three values form a probability distribution.
    pub fn new(negative: f64, neutral: f64, positive: f64) -> Result<Self, ClassifierError> {
        let values = [negative, neutral, positive];
        let valid = values.iter().all(|p| p.is_finite() && *p >= 0.0)
            && (values.iter().sum::<f64>() - 1.0).abs() <= SUM_TOLERANCE;
        if !valid {
            return Err(ClassifierError::InvalidDistribution {
                negative,
                neutral,
                positive,
            });
        }
        Ok(Self {
            negative,
            neutral,
            positive,
        })
    }

    /// Softmax over `[negative, neutral, positive]` logits.
    pub fn from_logits(logits: [f64; 3]) -> Result<Self, ClassifierError> {
        let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp = logits.map(|l| (l - max).exp());
        let total: f64 = exp.iter().sum();
        Self::new(exp[0] / total, exp[1] / total, exp[2] / total)
    }

    pub fn observation(&self) -> Observation {
        Observation {
            positive_pct: self.positive * 100.0,
            negative_pct: self.negative * 100.0,
        }
    }
}

/// Turns text into class probabilities.
///
/// Implementations are loaded once and shared across worker threads.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Probabilities, ClassifierError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    // Neutral does not take part in the decision.
    pub fn decide(probs: &Probabilities) -> Self {
        if probs.positive >= probs.negative {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Label::Positive => "😊",
            Label::Negative => "😞",
        }
    }
}

/// Headline score: the positive probability as a whole percentage.
pub fn score(probs: &Probabilities) -> i64 {
    percent(probs.positive)
}

pub fn percent(p: f64) -> i64 {
    (p * 100.0).round_ties_even() as i64
}
