//! Lexicon-based polarity scoring.
//!
//! Each sentiment-bearing word carries a polarity in [-1, 1]. A preceding
//! intensifier scales the word, a preceding negation flips and halves it, and
//! the document score is the mean over the sentiment-bearing words only.

use std::collections::HashMap;

/// Produces a polarity in the closed range [-1, 1]; 0 means neutral.
pub trait PolarityScorer {
    fn polarity(&self, text: &str) -> f64;
}

const NEGATIONS: [&str; 15] = [
    "not", "no", "never", "dont", "don't", "isnt", "isn't", "wasnt", "wasn't", "cant", "can't",
    "didnt", "didn't", "nothing", "hardly",
];

const NEGATION_FACTOR: f64 = -0.5;
/// Negations reach this many tokens ahead ("not really good").
const NEGATION_WINDOW: usize = 2;

#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    negations: Vec<String>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            lexicon: default_lexicon(),
            intensifiers: default_intensifiers(),
            negations: NEGATIONS.iter().map(|w| w.to_string()).collect(),
        }
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .map(|token| token.trim_matches('\''))
            .filter(|token| !token.is_empty())
            .map(String::from)
            .collect()
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let tokens = Self::tokenize(text);
        let mut scores = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.lexicon.get(token) else {
                continue;
            };

            let mut score = base;
            if let Some(previous) = i.checked_sub(1).map(|j| &tokens[j]) {
                if let Some(&factor) = self.intensifiers.get(previous) {
                    score *= factor;
                }
            }

            let window_start = i.saturating_sub(NEGATION_WINDOW);
            if tokens[window_start..i]
                .iter()
                .any(|t| self.negations.contains(t))
            {
                score *= NEGATION_FACTOR;
            }

            scores.push(score.clamp(-1.0, 1.0));
        }

        if scores.is_empty() {
            return 0.0;
        }

        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

fn default_intensifiers() -> HashMap<String, f64> {
    [
        ("very", 1.3),
        ("really", 1.3),
        ("so", 1.3),
        ("super", 1.3),
        ("extremely", 1.5),
        ("absolutely", 1.5),
        ("totally", 1.3),
        ("incredibly", 1.5),
        ("pretty", 1.1),
        ("quite", 1.1),
    ]
    .into_iter()
    .map(|(word, factor)| (word.to_string(), factor))
    .collect()
}

fn default_lexicon() -> HashMap<String, f64> {
    let positive = [
        ("amazing", 0.6),
        ("awesome", 1.0),
        ("beautiful", 0.85),
        ("best", 1.0),
        ("brilliant", 0.9),
        ("clear", 0.1),
        ("cool", 0.35),
        ("enjoy", 0.4),
        ("enjoyed", 0.4),
        ("excellent", 1.0),
        ("fantastic", 0.4),
        ("fun", 0.3),
        ("funny", 0.25),
        ("glad", 0.5),
        ("good", 0.7),
        ("great", 0.8),
        ("happy", 0.8),
        ("helpful", 0.5),
        ("interesting", 0.5),
        ("like", 0.2),
        ("liked", 0.4),
        ("love", 0.5),
        ("lovely", 0.5),
        ("nice", 0.6),
        ("perfect", 1.0),
        ("useful", 0.3),
        ("wonderful", 1.0),
    ];
    let negative = [
        ("annoying", -0.8),
        ("boring", -1.0),
        ("confusing", -0.3),
        ("disappointing", -0.6),
        ("dull", -0.3),
        ("fake", -0.5),
        ("hate", -0.8),
        ("hated", -0.9),
        ("lame", -0.5),
        ("mediocre", -0.3),
        ("misleading", -0.5),
        ("pointless", -0.5),
        ("poor", -0.4),
        ("sad", -0.5),
        ("stupid", -0.8),
        ("ugly", -0.7),
        ("useless", -0.5),
        ("wrong", -0.5),
    ];

    positive
        .into_iter()
        .chain(negative)
        .map(|(word, score)| (word.to_string(), score))
        .collect()
}
