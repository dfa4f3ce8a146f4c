use tracing::debug;

use crate::error::{CommentaryError, Result};

/// Outcome of a best-effort translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Translated(String),
    /// Translation failed; carries the untouched input.
    Original { text: String, reason: String },
}

impl Translation {
    pub fn text(&self) -> &str {
        match self {
            Translation::Translated(text) => text,
            Translation::Original { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Translation::Original { .. })
    }
}

/// Maps text into a single working language. Implementations never fail:
/// anything that goes wrong is reported as [`Translation::Original`].
#[allow(async_fn_in_trait)]
pub trait Translator {
    async fn translate(&self, text: &str, target_lang: &str) -> Translation;
}

/// Passes text through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    async fn translate(&self, text: &str, _target_lang: &str) -> Translation {
        Translation::Translated(text.to_string())
    }
}

pub struct TranslatorConfig {
    pub api_url: String,
    pub max_chars: usize,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_url: "https://translate.googleapis.com/translate_a/single".to_string(),
            max_chars: 5000,
        }
    }
}

pub struct GoogleTranslator {
    client: reqwest::Client,
    config: TranslatorConfig,
}

impl GoogleTranslator {
    pub fn new() -> Self {
        Self::with_config(TranslatorConfig::default())
    }

    pub fn with_config(config: TranslatorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn request(&self, text: &str, target_lang: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        parse_translation_response(&response)
    }
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Translation {
        let fallback = |reason: String| {
            debug!(%reason, "translation fell back to original text");
            Translation::Original {
                text: text.to_string(),
                reason,
            }
        };

        if text.trim().is_empty() {
            return fallback("nothing to translate".to_string());
        }

        let chars = text.chars().count();
        if chars > self.config.max_chars {
            return fallback(format!(
                "text is {} characters, limit is {}",
                chars, self.config.max_chars
            ));
        }

        match self.request(text, target_lang).await {
            Ok(translated) => Translation::Translated(translated),
            Err(e) => fallback(e.to_string()),
        }
    }
}

/// The endpoint answers with nested arrays: `[[["segment", "source", ...], ...], ...]`.
fn parse_translation_response(response: &serde_json::Value) -> Result<String> {
    let segments = response[0]
        .as_array()
        .ok_or_else(|| CommentaryError::TranslationFailed {
            reason: format!("Invalid translation response: {}", response),
        })?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment[0].as_str())
        .collect();

    if translated.is_empty() {
        return Err(CommentaryError::TranslationFailed {
            reason: "Translation response contained no text".to_string(),
        });
    }

    Ok(translated)
}
