use serde::{Deserialize, Serialize};

use crate::{
    error::{CommentaryError, Result},
    sentiment::{LexiconScorer, PolarityScorer},
    types::Category,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub category: Category,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    pub fn new(category: Category, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// Keyword rules are checked in order and the first match wins. Text that
/// matches none of them is scored for polarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub rules: Vec<KeywordRule>,
    #[serde(default = "default_neutral_threshold")]
    pub neutral_threshold: f64,
}

fn default_neutral_threshold() -> f64 {
    0.1
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                KeywordRule::new(
                    Category::Appreciation,
                    &["amazing", "great", "awesome", "loved", "excellent", "thanks", "thank you"],
                ),
                KeywordRule::new(
                    Category::ConstructiveFeedback,
                    &["could be", "should", "suggest", "improve", "better if"],
                ),
                KeywordRule::new(
                    Category::NegativeCriticism,
                    &["terrible", "waste", "worst", "horrible", "bad", "awful"],
                ),
                KeywordRule::new(
                    Category::QuestionInquiry,
                    &["?", "how", "what", "when", "where", "why", "can you"],
                ),
                KeywordRule::new(
                    Category::SpamOrPromotional,
                    &["subscribe", "check out", "visit", "follow", "my channel"],
                ),
            ],
            neutral_threshold: default_neutral_threshold(),
        }
    }
}

impl ClassifierConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ClassifierConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.neutral_threshold) {
            return Err(CommentaryError::InvalidConfig {
                reason: format!(
                    "neutral_threshold must be within [0, 1], got {}",
                    self.neutral_threshold
                ),
            });
        }

        for rule in &self.rules {
            if rule.keywords.is_empty() {
                return Err(CommentaryError::InvalidConfig {
                    reason: format!("rule for {} has no keywords", rule.category),
                });
            }
            if rule.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(CommentaryError::InvalidConfig {
                    reason: format!("rule for {} has a blank keyword", rule.category),
                });
            }
        }

        Ok(())
    }
}

pub struct Classifier {
    rules: Vec<KeywordRule>,
    neutral_threshold: f64,
    scorer: Box<dyn PolarityScorer + Send + Sync>,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        Self::with_scorer(config, LexiconScorer::new())
    }

    pub fn with_scorer(
        config: ClassifierConfig,
        scorer: impl PolarityScorer + Send + Sync + 'static,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rules: lowercase_rules(config.rules),
            neutral_threshold: config.neutral_threshold,
            scorer: Box::new(scorer),
        })
    }

    /// Total: every input, including the empty string, maps to a category.
    pub fn classify(&self, text: &str) -> Category {
        let lowered = text.to_lowercase();

        if let Some(rule) = self.rules.iter().find(|rule| rule.matches(&lowered)) {
            return rule.category;
        }

        let polarity = self.scorer.polarity(text);
        // A broken scorer must not tag comments as opinions.
        let polarity = if polarity.is_finite() { polarity } else { 0.0 };

        if polarity.abs() < self.neutral_threshold {
            Category::NeutralStatement
        } else if polarity > 0.0 {
            Category::Appreciation
        } else {
            Category::NegativeCriticism
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        let config = ClassifierConfig::default();
        Self {
            rules: lowercase_rules(config.rules),
            neutral_threshold: config.neutral_threshold,
            scorer: Box::new(LexiconScorer::new()),
        }
    }
}

fn lowercase_rules(rules: Vec<KeywordRule>) -> Vec<KeywordRule> {
    rules
        .into_iter()
        .map(|rule| KeywordRule {
            category: rule.category,
            keywords: rule.keywords.iter().map(|k| k.to_lowercase()).collect(),
        })
        .collect()
}
