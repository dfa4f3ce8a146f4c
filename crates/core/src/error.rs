use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommentaryError {
    #[error("Could not extract a video id from {input:?}")]
    InvalidVideoUrl { input: String },

    #[error("Fetching comments failed for {video_id}: {reason}")]
    FetchFailed { video_id: String, reason: String },

    #[error("YouTube API rejected the request ({status}): {message}")]
    ApiRejected { status: u16, message: String },

    #[error("Translation failed: {reason}")]
    TranslationFailed { reason: String },

    #[error("Invalid classifier configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Missing API key: pass --api-key or set the YOUTUBE_API_KEY environment variable")]
    MissingApiKey,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, CommentaryError>;
