use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    error::{CommentaryError, Result},
    types::RawComment,
};

/// YouTube rejects page sizes above this.
pub const MAX_PAGE_SIZE: usize = 100;

const VIDEO_ID_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub video_id: String,
    pub page_size: usize,
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentPage {
    pub comments: Vec<RawComment>,
    pub next_page_token: Option<String>,
}

/// A paginated feed of top-level comments for one video.
#[allow(async_fn_in_trait)]
pub trait CommentSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<CommentPage>;
}

pub struct YoutubeConfig {
    pub api_url: String,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_url: "https://www.googleapis.com/youtube/v3/commentThreads".to_string(),
        }
    }
}

pub struct YoutubeCommentSource {
    client: reqwest::Client,
    api_key: String,
    config: YoutubeConfig,
}

impl YoutubeCommentSource {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, YoutubeConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, config: YoutubeConfig) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CommentaryError::MissingApiKey);
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            config,
        })
    }
}

impl CommentSource for YoutubeCommentSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<CommentPage> {
        let page_size = request.page_size.clamp(1, MAX_PAGE_SIZE).to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("videoId", request.video_id.as_str()),
            ("maxResults", page_size.as_str()),
            ("textFormat", "plainText"),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = &request.page_token {
            query.push(("pageToken", token.as_str()));
        }

        let response = self
            .client
            .get(&self.config.api_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| fetch_failed(&request.video_id, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| fetch_failed(&request.video_id, e))?;

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                video_id = %request.video_id,
                "comment request rejected"
            );
            return Err(api_error(status.as_u16(), &body));
        }

        parse_comment_page(&body).map_err(|e| fetch_failed(&request.video_id, e))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadListResponse {
    #[serde(default)]
    items: Vec<ThreadItem>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct ThreadItem {
    snippet: ThreadSnippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    author_display_name: String,
    text_display: String,
    #[serde(default)]
    like_count: u64,
    published_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn parse_comment_page(body: &str) -> Result<CommentPage> {
    let response: ThreadListResponse = serde_json::from_str(body)?;

    let comments = response
        .items
        .into_iter()
        .map(|item| {
            let snippet = item.snippet.top_level_comment.snippet;
            RawComment {
                author: snippet.author_display_name,
                text: snippet.text_display,
                likes: snippet.like_count,
                published_at: snippet.published_at,
            }
        })
        .collect();

    Ok(CommentPage {
        comments,
        next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
    })
}

fn fetch_failed(video_id: &str, reason: impl std::fmt::Display) -> CommentaryError {
    CommentaryError::FetchFailed {
        video_id: video_id.to_string(),
        reason: reason.to_string(),
    }
}

fn api_error(status: u16, body: &str) -> CommentaryError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    CommentaryError::ApiRejected { status, message }
}

/// Page through the source until it runs dry or `max_comments` is reached.
/// `on_progress` receives the running total after every page.
pub async fn fetch_comments<S: CommentSource>(
    source: &S,
    video_id: &str,
    max_comments: usize,
    mut on_progress: impl FnMut(usize),
) -> Result<Vec<RawComment>> {
    let mut comments = Vec::new();
    let mut request = PageRequest {
        video_id: video_id.to_string(),
        page_size: max_comments.clamp(1, MAX_PAGE_SIZE),
        page_token: None,
    };
    let mut seen_tokens = HashSet::new();

    while comments.len() < max_comments {
        let page = source.fetch_page(&request).await?;
        info!(
            video_id,
            fetched = page.comments.len(),
            has_more = page.next_page_token.is_some(),
            "fetched comment page"
        );

        comments.extend(page.comments);
        comments.truncate(max_comments);
        on_progress(comments.len());

        match page.next_page_token {
            Some(token) if seen_tokens.insert(token.clone()) => {
                request.page_token = Some(token);
            }
            Some(token) => {
                warn!(video_id, %token, "page token seen before, stopping");
                break;
            }
            None => break,
        }
    }

    Ok(comments)
}

/// Extract the 11-character video id from a watch, short, embed or
/// youtu.be URL, or accept a bare id.
pub fn parse_video_id(input: &str) -> Result<String> {
    let input = input.trim();

    let candidate = query_video_id(input)
        .or_else(|| {
            ["youtu.be/", "/shorts/", "/embed/", "/live/"]
                .iter()
                .find_map(|marker| input.split_once(marker).map(|(_, rest)| rest))
        })
        .unwrap_or(input);

    let id: String = candidate
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    if id.len() != VIDEO_ID_LEN {
        return Err(CommentaryError::InvalidVideoUrl {
            input: input.to_string(),
        });
    }

    Ok(id)
}

/// Value of the `v` query parameter, ignoring keys that merely end in `v`.
fn query_video_id(input: &str) -> Option<&str> {
    input
        .match_indices("v=")
        .find(|(i, _)| *i == 0 || matches!(input.as_bytes()[i - 1], b'?' | b'&'))
        .map(|(i, marker)| &input[i + marker.len()..])
}
