//! Lexicon-based sentiment backend.
//!
//! Scores text from word valences, negations and intensifiers, then turns the
//! accumulated positive and negative mass into a three-class distribution with
//! a softmax. The word lists can be replaced by a JSON file of the form:
//!
//! ```json
//! {
//!   "words": { "love": 0.9, "awful": -0.9 },
//!   "negations": ["not", "never"],
//!   "intensifiers": { "very": 1.5 }
//! }
//! ```

use crate::classifier::{Classifier, ClassifierError, Probabilities};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Maximum tokens the underlying model reads, the rest is dropped.
pub const DEFAULT_MAX_TOKENS: usize = 512;

/// Number of tokens a negation reaches forward.
const NEGATION_SCOPE: usize = 3;
/// Logit slope per unit of sentiment mass.
const MASS_GAIN: f64 = 3.0;
/// Logit of the neutral class before any evidence.
const NEUTRAL_PRIOR: f64 = 1.0;

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("love", 0.9),
    ("loved", 0.9),
    ("loving", 0.8),
    ("adore", 0.9),
    ("amazing", 0.9),
    ("awesome", 0.9),
    ("excellent", 0.9),
    ("fantastic", 0.9),
    ("wonderful", 0.9),
    ("brilliant", 0.8),
    ("perfect", 0.8),
    ("best", 0.8),
    ("great", 0.7),
    ("happy", 0.7),
    ("glad", 0.6),
    ("enjoy", 0.6),
    ("enjoyed", 0.6),
    ("beautiful", 0.7),
    ("delightful", 0.8),
    ("pleased", 0.6),
    ("impressive", 0.6),
    ("good", 0.5),
    ("nice", 0.5),
    ("like", 0.4),
    ("liked", 0.4),
    ("fun", 0.5),
    ("cool", 0.4),
    ("thanks", 0.4),
    ("thank", 0.4),
    ("recommend", 0.5),
    ("win", 0.5),
    ("useful", 0.4),
    ("helpful", 0.5),
    ("fine", 0.2),
    ("ok", 0.1),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("hate", -0.9),
    ("hated", -0.9),
    ("terrible", -0.9),
    ("awful", -0.9),
    ("horrible", -0.9),
    ("worst", -0.9),
    ("disgusting", -0.9),
    ("disappointing", -0.7),
    ("disappointed", -0.7),
    ("angry", -0.7),
    ("sad", -0.6),
    ("bad", -0.6),
    ("poor", -0.5),
    ("boring", -0.5),
    ("annoying", -0.6),
    ("broken", -0.6),
    ("useless", -0.7),
    ("ugly", -0.6),
    ("fail", -0.6),
    ("failed", -0.6),
    ("waste", -0.7),
    ("problem", -0.4),
    ("wrong", -0.5),
    ("slow", -0.3),
    ("dislike", -0.6),
    ("unhappy", -0.7),
    ("sorry", -0.3),
    ("lose", -0.5),
    ("pain", -0.6),
    ("worse", -0.7),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "can't",
    "don't", "doesn't", "didn't", "isn't", "wasn't", "aren't", "won't", "wouldn't", "shouldn't",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("really", 1.4),
    ("so", 1.3),
    ("extremely", 1.8),
    ("absolutely", 1.7),
    ("totally", 1.5),
    ("incredibly", 1.7),
    ("quite", 1.2),
    ("slightly", 0.6),
    ("somewhat", 0.7),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Lexicon {
    words: HashMap<String, f64>,
    #[serde(default)]
    negations: HashSet<String>,
    #[serde(default)]
    intensifiers: HashMap<String, f64>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            words: POSITIVE_WORDS
                .iter()
                .chain(NEGATIVE_WORDS)
                .map(|(w, v)| (w.to_string(), *v))
                .collect(),
            negations: NEGATIONS.iter().map(|w| w.to_string()).collect(),
            intensifiers: INTENSIFIERS
                .iter()
                .map(|(w, m)| (w.to_string(), *m))
                .collect(),
        }
    }
}

impl Lexicon {
    pub fn from_file(path: &Path) -> Result<Self, ClassifierError> {
        let bytes = std::fs::read(path).map_err(|source| ClassifierError::ReadLexicon {
            path: path.to_path_buf(),
            source,
        })?;
        let mut lexicon: Lexicon =
            serde_json::from_slice(&bytes).map_err(|source| ClassifierError::ParseLexicon {
                path: path.to_path_buf(),
                source,
            })?;
        if lexicon.words.is_empty() {
            return Err(ClassifierError::EmptyLexicon(path.to_path_buf()));
        }
        lexicon.words = lexicon
            .words
            .into_iter()
            .map(|(w, v)| (w.to_lowercase(), v.clamp(-1.0, 1.0)))
            .collect();
        lexicon.negations = lexicon.negations.into_iter().map(|w| w.to_lowercase()).collect();
        lexicon.intensifiers = lexicon
            .intensifiers
            .into_iter()
            .map(|(w, m)| (w.to_lowercase(), m))
            .collect();
        Ok(lexicon)
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

pub struct LexiconClassifier {
    lexicon: Lexicon,
    max_tokens: usize,
}

impl LexiconClassifier {
    pub fn new(lexicon: Lexicon, max_tokens: usize) -> Self {
        Self {
            lexicon,
            max_tokens: max_tokens.max(1),
        }
    }

    /// Loads the lexicon at `path`, or the built-in one when `None`.
    pub fn load(path: Option<&Path>, max_tokens: usize) -> Result<Self, ClassifierError> {
        let lexicon = match path {
            Some(path) => Lexicon::from_file(path)?,
            None => Lexicon::default(),
        };
        Ok(Self::new(lexicon, max_tokens))
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn masses(&self, text: &str) -> (f64, f64) {
        let lowered = text.to_lowercase();
        let tokens = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
            .take(self.max_tokens);

        let mut positive = 0.0_f64;
        let mut negative = 0.0_f64;
        let mut negated_for = 0usize;
        let mut boost = 1.0_f64;

        for token in tokens {
            if self.lexicon.negations.contains(token) {
                negated_for = NEGATION_SCOPE;
                continue;
            }
            if let Some(m) = self.lexicon.intensifiers.get(token) {
                boost *= m;
                negated_for = negated_for.saturating_sub(1);
                continue;
            }
            if let Some(valence) = self.lexicon.words.get(token) {
                let mut v = valence * boost;
                if negated_for > 0 {
                    // "not good" is weaker than "bad"
                    v = -v * 0.75;
                }
                if v > 0.0 {
                    positive += v;
                } else {
                    negative -= v;
                }
                boost = 1.0;
            }
            negated_for = negated_for.saturating_sub(1);
        }
        (positive, negative)
    }
}

impl Classifier for LexiconClassifier {
    fn classify(&self, text: &str) -> Result<Probabilities, ClassifierError> {
        let (positive, negative) = self.masses(text);
        let evidence = positive + negative;
        Probabilities::from_logits([
            MASS_GAIN * negative,
            NEUTRAL_PRIOR - evidence.min(NEUTRAL_PRIOR),
            MASS_GAIN * positive,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Label;
    use std::io::Write;
    use std::path::PathBuf;

    fn classifier() -> LexiconClassifier {
        LexiconClassifier::new(Lexicon::default(), DEFAULT_MAX_TOKENS)
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_distribution_is_valid() {
        for text in ["", "I love this!", "worst day ever", "the meeting is at noon"] {
            let p = classifier().classify(text).unwrap();
            assert!((p.negative + p.neutral + p.positive - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_positive_text() {
        let p = classifier().classify("I love this! Really great work.").unwrap();
        assert_eq!(Label::decide(&p), Label::Positive);
        assert!(p.positive > 0.9);
    }

    #[test]
    fn test_negative_text() {
        let p = classifier().classify("This is terrible, I hate it.").unwrap();
        assert_eq!(Label::decide(&p), Label::Negative);
        assert!(p.negative > 0.9);
    }

    #[test]
    fn test_neutral_text() {
        let p = classifier().classify("The train leaves at noon.").unwrap();
        assert!(p.neutral > p.positive);
        assert!(p.neutral > p.negative);
        assert_eq!(p.positive, p.negative);
    }

    #[test]
    fn test_negation_flips() {
        let c = classifier();
        let plain = c.classify("this is good").unwrap();
        let negated = c.classify("this is not good").unwrap();
        assert_eq!(Label::decide(&plain), Label::Positive);
        assert_eq!(Label::decide(&negated), Label::Negative);
    }

    #[test]
    fn test_intensifier_strengthens() {
        let c = classifier();
        let plain = c.classify("good").unwrap();
        let boosted = c.classify("very good").unwrap();
        assert!(boosted.positive > plain.positive);
    }

    #[test]
    fn test_truncates_to_max_tokens() {
        let c = LexiconClassifier::new(Lexicon::default(), 3);
        let p = c.classify("the plan is terrible").unwrap();
        assert_eq!(p.positive, p.negative);
    }

    #[test]
    fn test_load_from_file() {
        let path = temp_file(
            "lexicon-ok.json",
            r#"{"words": {"Splendid": 0.9}, "negations": ["NOT"]}"#,
        );
        let c = LexiconClassifier::load(Some(&path), DEFAULT_MAX_TOKENS).unwrap();
        assert_eq!(c.lexicon().word_count(), 1);
        assert_eq!(Label::decide(&c.classify("splendid").unwrap()), Label::Positive);
        assert_eq!(Label::decide(&c.classify("not splendid").unwrap()), Label::Negative);
        // words outside the loaded lexicon carry no weight
        let p = c.classify("love").unwrap();
        assert_eq!(p.positive, p.negative);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_errors() {
        let missing = std::env::temp_dir().join("no-such-lexicon.json");
        assert!(matches!(
            LexiconClassifier::load(Some(&missing), DEFAULT_MAX_TOKENS),
            Err(ClassifierError::ReadLexicon { .. })
        ));

        let malformed = temp_file("lexicon-bad.json", "{ not json");
        assert!(matches!(
            LexiconClassifier::load(Some(&malformed), DEFAULT_MAX_TOKENS),
            Err(ClassifierError::ParseLexicon { .. })
        ));
        std::fs::remove_file(malformed).unwrap();

        let empty = temp_file("lexicon-empty.json", r#"{"words": {}}"#);
        assert!(matches!(
            LexiconClassifier::load(Some(&empty), DEFAULT_MAX_TOKENS),
            Err(ClassifierError::EmptyLexicon(_))
        ));
        std::fs::remove_file(empty).unwrap();
    }
}
