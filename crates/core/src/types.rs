use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::translate::Translation;

/// A comment exactly as the source returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawComment {
    pub author: String,
    pub text: String,
    pub likes: u64,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TranslationStatus {
    Translated,
    Fallback { reason: String },
}

/// A fetched comment with its working-language text attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub translated_text: String,
    pub translation: TranslationStatus,
    pub likes: u64,
    pub published_at: DateTime<Utc>,
}

impl Comment {
    pub fn from_translation(raw: RawComment, translation: Translation) -> Self {
        let (translated_text, status) = match translation {
            Translation::Translated(text) => (text, TranslationStatus::Translated),
            Translation::Original { text, reason } => {
                (text, TranslationStatus::Fallback { reason })
            }
        };

        Self {
            author: raw.author,
            text: raw.text,
            translated_text,
            translation: status,
            likes: raw.likes,
            published_at: raw.published_at,
        }
    }

    #[cfg(test)]
    pub(crate) fn untranslated(raw: RawComment) -> Self {
        let text = raw.text.clone();
        Self::from_translation(raw, Translation::Translated(text))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.translation, TranslationStatus::Fallback { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Appreciation")]
    Appreciation,
    #[serde(rename = "Constructive Feedback", alias = "ConstructiveFeedback")]
    ConstructiveFeedback,
    #[serde(rename = "Negative Criticism", alias = "NegativeCriticism")]
    NegativeCriticism,
    #[serde(rename = "Question/Inquiry", alias = "QuestionInquiry")]
    QuestionInquiry,
    #[serde(rename = "Spam or Promotional", alias = "SpamOrPromotional")]
    SpamOrPromotional,
    #[serde(rename = "Neutral Statements", alias = "NeutralStatement")]
    NeutralStatement,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Appreciation,
        Category::ConstructiveFeedback,
        Category::NegativeCriticism,
        Category::QuestionInquiry,
        Category::SpamOrPromotional,
        Category::NeutralStatement,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Appreciation => "Appreciation",
            Category::ConstructiveFeedback => "Constructive Feedback",
            Category::NegativeCriticism => "Negative Criticism",
            Category::QuestionInquiry => "Question/Inquiry",
            Category::SpamOrPromotional => "Spam or Promotional",
            Category::NeutralStatement => "Neutral Statements",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedComment {
    pub comment: Comment,
    pub category: Category,
}
