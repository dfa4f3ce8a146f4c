//! Commentary Core Library
//!
//! Fetches YouTube comments, translates them into one working language,
//! classifies each into a sentiment/intent category and aggregates the
//! results into counts, like distributions, a daily timeline and a CSV report.

pub mod aggregate;
pub mod classifier;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod report;
pub mod sentiment;
pub mod source;
pub mod translate;
pub mod types;

// Re-export commonly used items at crate root
pub use aggregate::{AnalysisResult, LikeStats, Summary, TimelineRow, aggregate};
pub use classifier::{Classifier, ClassifierConfig, KeywordRule};
pub use error::{CommentaryError, Result};
pub use format::{format_analysis_readable, truncate_text};
pub use pipeline::{
    AnalysisOutcome, AnalysisRequest, analyze_video, classify_comments, translate_comments,
};
pub use report::{
    DEFAULT_REPORT_FILE, ReportRow, read_csv, report_rows, save_report, to_csv, write_csv,
};
pub use sentiment::{LexiconScorer, PolarityScorer};
pub use source::{
    CommentPage, CommentSource, PageRequest, YoutubeCommentSource, YoutubeConfig, fetch_comments,
    parse_video_id,
};
pub use translate::{
    GoogleTranslator, IdentityTranslator, Translation, Translator, TranslatorConfig,
};
pub use types::{Category, ClassifiedComment, Comment, RawComment, TranslationStatus};
