use tracing::{debug, info};

use crate::{
    aggregate::{AnalysisResult, aggregate},
    classifier::Classifier,
    error::Result,
    source::{CommentSource, fetch_comments},
    translate::Translator,
    types::{ClassifiedComment, Comment, RawComment},
};

pub const DEFAULT_TARGET_LANG: &str = "en";
pub const DEFAULT_MAX_COMMENTS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub video_id: String,
    pub max_comments: usize,
    pub target_lang: String,
}

impl AnalysisRequest {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            max_comments: DEFAULT_MAX_COMMENTS,
            target_lang: DEFAULT_TARGET_LANG.to_string(),
        }
    }
}

/// Zero comments is a result of its own, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    NoComments,
    Analyzed(AnalysisResult),
}

/// Translate every comment in order. `on_progress` receives the number done.
pub async fn translate_comments<T: Translator>(
    translator: &T,
    comments: Vec<RawComment>,
    target_lang: &str,
    mut on_progress: impl FnMut(usize),
) -> Vec<Comment> {
    let mut translated = Vec::with_capacity(comments.len());

    for raw in comments {
        let translation = translator.translate(&raw.text, target_lang).await;
        translated.push(Comment::from_translation(raw, translation));
        on_progress(translated.len());
    }

    let fallbacks = translated.iter().filter(|c| c.is_fallback()).count();
    if fallbacks > 0 {
        debug!(fallbacks, "some comments kept their original text");
    }

    translated
}

pub fn classify_comments(
    classifier: &Classifier,
    comments: Vec<Comment>,
) -> Vec<ClassifiedComment> {
    comments
        .into_iter()
        .map(|comment| {
            let category = classifier.classify(&comment.translated_text);
            ClassifiedComment { comment, category }
        })
        .collect()
}

/// Fetch, translate, classify and aggregate the comments of one video.
pub async fn analyze_video<C, T>(
    source: &C,
    translator: &T,
    classifier: &Classifier,
    request: &AnalysisRequest,
) -> Result<AnalysisOutcome>
where
    C: CommentSource,
    T: Translator,
{
    let raw = fetch_comments(source, &request.video_id, request.max_comments, |_| {}).await?;
    if raw.is_empty() {
        info!(video_id = %request.video_id, "video has no comments");
        return Ok(AnalysisOutcome::NoComments);
    }

    let comments = translate_comments(translator, raw, &request.target_lang, |_| {}).await;
    let result = aggregate(classify_comments(classifier, comments));

    info!(
        video_id = %request.video_id,
        comments = result.len(),
        "analysis complete"
    );

    Ok(AnalysisOutcome::Analyzed(result))
}
