use std::{cell::RefCell, collections::HashMap};

use chrono::{DateTime, Utc};
use commentary_core::{
    AnalysisOutcome, AnalysisRequest, Category, Classifier, CommentPage, CommentSource,
    CommentaryError, IdentityTranslator, PageRequest, RawComment, Result, Translation, Translator,
    analyze_video, fetch_comments, read_csv, report_rows, to_csv,
};

fn raw(author: &str, text: &str, likes: u64, published_at: &str) -> RawComment {
    RawComment {
        author: author.to_string(),
        text: text.to_string(),
        likes,
        published_at: published_at.parse::<DateTime<Utc>>().unwrap(),
    }
}

/// Serves pre-built pages keyed by page token and records every request.
struct FakeSource {
    pages: HashMap<Option<String>, CommentPage>,
    requests: RefCell<Vec<PageRequest>>,
}

impl FakeSource {
    fn new(pages: Vec<(Option<String>, CommentPage)>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn single(comments: Vec<RawComment>) -> Self {
        Self::new(vec![(
            None,
            CommentPage {
                comments,
                next_page_token: None,
            },
        )])
    }

    fn numbered(pages: usize, per_page: usize) -> Self {
        Self::new(
            (0..pages)
                .map(|p| {
                    let token = (p > 0).then(|| format!("page-{p}"));
                    let next = (p + 1 < pages).then(|| format!("page-{}", p + 1));
                    let comments = (0..per_page)
                        .map(|i| {
                            raw(
                                &format!("user{p}-{i}"),
                                "The video was uploaded on Monday",
                                i as u64,
                                "2024-05-01T12:00:00Z",
                            )
                        })
                        .collect();
                    (token, CommentPage {
                        comments,
                        next_page_token: next,
                    })
                })
                .collect(),
        )
    }

    fn requests(&self) -> Vec<PageRequest> {
        self.requests.borrow().clone()
    }
}

impl CommentSource for FakeSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<CommentPage> {
        self.requests.borrow_mut().push(request.clone());
        self.pages
            .get(&request.page_token)
            .cloned()
            .ok_or_else(|| CommentaryError::FetchFailed {
                video_id: request.video_id.clone(),
                reason: format!("unknown page token {:?}", request.page_token),
            })
    }
}

struct FailingSource;

impl CommentSource for FailingSource {
    async fn fetch_page(&self, _request: &PageRequest) -> Result<CommentPage> {
        Err(CommentaryError::ApiRejected {
            status: 403,
            message: "The request cannot be completed because you have exceeded your quota."
                .to_string(),
        })
    }
}

/// Translates a fixed phrase book and fails on everything else.
struct PhraseBook(HashMap<&'static str, &'static str>);

impl Translator for PhraseBook {
    async fn translate(&self, text: &str, _target_lang: &str) -> Translation {
        match self.0.get(text) {
            Some(translated) => Translation::Translated(translated.to_string()),
            None => Translation::Original {
                text: text.to_string(),
                reason: "unsupported language".to_string(),
            },
        }
    }
}

#[tokio::test]
async fn test_three_comment_scenario() {
    let source = FakeSource::single(vec![
        raw("Alice", "This is amazing, thanks!", 10, "2024-05-01T09:00:00Z"),
        raw("Bob", "Could be better if captions were added", 2, "2024-05-01T18:00:00Z"),
        raw("Cara", "worst video ever", 0, "2024-05-02T07:00:00Z"),
    ]);

    let outcome = analyze_video(
        &source,
        &IdentityTranslator,
        &Classifier::default(),
        &AnalysisRequest::new("dQw4w9WgXcQ"),
    )
    .await
    .unwrap();

    let AnalysisOutcome::Analyzed(result) = outcome else {
        panic!("expected an analysis");
    };

    let categories: Vec<Category> = result.entries().iter().map(|e| e.category).collect();
    assert_eq!(
        categories,
        [
            Category::Appreciation,
            Category::ConstructiveFeedback,
            Category::NegativeCriticism
        ]
    );

    let counts = result.counts_by_category();
    assert_eq!(counts[&Category::Appreciation], 1);
    assert_eq!(counts[&Category::ConstructiveFeedback], 1);
    assert_eq!(counts[&Category::NegativeCriticism], 1);
    assert_eq!(counts[&Category::QuestionInquiry], 0);
    assert_eq!(counts[&Category::SpamOrPromotional], 0);
    assert_eq!(counts[&Category::NeutralStatement], 0);

    let authors: Vec<String> = report_rows(&result).into_iter().map(|r| r.author).collect();
    assert_eq!(authors, ["Alice", "Bob", "Cara"]);

    let parsed = read_csv(to_csv(&result).unwrap().as_slice()).unwrap();
    assert_eq!(parsed, report_rows(&result));
}

#[tokio::test]
async fn test_no_comments_is_not_an_error() {
    let source = FakeSource::single(Vec::new());

    let outcome = analyze_video(
        &source,
        &IdentityTranslator,
        &Classifier::default(),
        &AnalysisRequest::new("dQw4w9WgXcQ"),
    )
    .await
    .unwrap();

    assert_eq!(outcome, AnalysisOutcome::NoComments);
}

#[tokio::test]
async fn test_fetch_error_aborts_run() {
    let err = analyze_video(
        &FailingSource,
        &IdentityTranslator,
        &Classifier::default(),
        &AnalysisRequest::new("dQw4w9WgXcQ"),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CommentaryError::ApiRejected { status: 403, .. }));
}

#[tokio::test]
async fn test_classifier_sees_translated_text() {
    let source = FakeSource::single(vec![
        raw("Ana", "¡Increíble, gracias!", 4, "2024-05-01T09:00:00Z"),
        raw("Jun", "これはひどい", 1, "2024-05-01T10:00:00Z"),
    ]);
    let translator = PhraseBook(HashMap::from([("¡Increíble, gracias!", "Amazing, thanks!")]));

    let outcome = analyze_video(
        &source,
        &translator,
        &Classifier::default(),
        &AnalysisRequest::new("dQw4w9WgXcQ"),
    )
    .await
    .unwrap();
    let AnalysisOutcome::Analyzed(result) = outcome else {
        panic!("expected an analysis");
    };

    let ana = &result.entries()[0];
    assert_eq!(ana.category, Category::Appreciation);
    assert_eq!(ana.comment.text, "¡Increíble, gracias!");
    assert_eq!(ana.comment.translated_text, "Amazing, thanks!");
    assert!(!ana.comment.is_fallback());

    let jun = &result.entries()[1];
    assert!(jun.comment.is_fallback());
    assert_eq!(jun.comment.translated_text, "これはひどい");
    assert_eq!(jun.category, Category::NeutralStatement);
}

#[tokio::test]
async fn test_pagination_follows_tokens_until_exhausted() {
    let source = FakeSource::numbered(3, 4);
    let mut progress = Vec::new();

    let comments = fetch_comments(&source, "dQw4w9WgXcQ", 500, |n| progress.push(n))
        .await
        .unwrap();

    assert_eq!(comments.len(), 12);
    assert_eq!(progress, [4, 8, 12]);

    let tokens: Vec<Option<String>> =
        source.requests().into_iter().map(|r| r.page_token).collect();
    assert_eq!(
        tokens,
        [None, Some("page-1".to_string()), Some("page-2".to_string())]
    );
    assert!(source.requests().iter().all(|r| r.page_size == 100));
}

#[tokio::test]
async fn test_pagination_stops_at_cap() {
    let source = FakeSource::numbered(5, 4);

    let comments = fetch_comments(&source, "dQw4w9WgXcQ", 10, |_| {}).await.unwrap();

    assert_eq!(comments.len(), 10);
    assert_eq!(comments[9].author, "user2-1");
    assert_eq!(source.requests().len(), 3);
    assert!(source.requests().iter().all(|r| r.page_size == 10));
}

#[tokio::test]
async fn test_pagination_stops_on_repeated_token() {
    let source = FakeSource::new(vec![
        (
            None,
            CommentPage {
                comments: vec![raw("a", "hi", 0, "2024-05-01T12:00:00Z")],
                next_page_token: Some("again".to_string()),
            },
        ),
        (
            Some("again".to_string()),
            CommentPage {
                comments: vec![raw("b", "hi", 0, "2024-05-01T12:00:00Z")],
                next_page_token: Some("again".to_string()),
            },
        ),
    ]);

    let comments = fetch_comments(&source, "dQw4w9WgXcQ", 100, |_| {}).await.unwrap();

    assert_eq!(comments.len(), 2);
    assert_eq!(source.requests().len(), 2);
}

#[tokio::test]
async fn test_pagination_stops_on_cycling_tokens() {
    let page = |next: &str| CommentPage {
        comments: Vec::new(),
        next_page_token: Some(next.to_string()),
    };
    let source = FakeSource::new(vec![
        (None, page("a")),
        (Some("a".to_string()), page("b")),
        (Some("b".to_string()), page("a")),
    ]);

    let comments = fetch_comments(&source, "dQw4w9WgXcQ", 100, |_| {}).await.unwrap();

    assert!(comments.is_empty());
    let tokens: Vec<Option<String>> =
        source.requests().into_iter().map(|r| r.page_token).collect();
    assert_eq!(
        tokens,
        [None, Some("a".to_string()), Some("b".to_string())]
    );
}
