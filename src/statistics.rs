use serde::Serialize;
use std::sync::{Mutex, PoisonError};

/// Rounds the exact binary value to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    // Decimal formatting is correctly rounded, scaling first is not.
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

// Append-only sequence of samples
#[derive(Debug, Default)]
pub struct Series {
    values: Vec<f64>,
}

impl Series {
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    pub fn variance(&self) -> f64 {
        let n = self.values.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let ss: f64 = self.values.iter().map(|v| (v - mean) * (v - mean)).sum();
        ss / (n as f64 - 1.0)
    }

    pub fn stddev(&self) -> f64 {
        self.variance().sqrt()
    }
}

/// One classification, as class percentages in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub positive_pct: f64,
    pub negative_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub mean_positive: f64,
    pub sd_positive: f64,
    pub mean_negative: f64,
    pub sd_negative: f64,
}

#[derive(Debug, Default)]
struct History {
    positive: Series,
    negative: Series,
}

/// Process-lifetime statistics over every recorded observation.
///
/// The history is never trimmed. Both series are appended under one lock so
/// their lengths always match.
#[derive(Debug, Default)]
pub struct Aggregator {
    history: Mutex<History>,
}

impl Aggregator {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn record_and_summarize(&self, observation: Observation) -> Summary {
        // History is append-only, a panicked holder cannot leave it half-written.
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history.positive.push(observation.positive_pct);
        history.negative.push(observation.negative_pct);

        Summary {
            mean_positive: round_to(history.positive.mean(), 1),
            sd_positive: round_to(history.positive.stddev(), 1),
            mean_negative: round_to(history.negative.mean(), 1),
            sd_negative: round_to(history.negative.stddev(), 1),
        }
    }

    /// Number of observations recorded so far.
    pub fn len(&self) -> usize {
        let history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        debug_assert_eq!(history.positive.len(), history.negative.len());
        history.positive.len()
    }
}
