use std::{io, path::Path};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::{aggregate::AnalysisResult, error::Result, types::Category};

pub const DEFAULT_REPORT_FILE: &str = "youtube_comment_analysis.csv";

const REPORT_HEADER: [&str; 4] = ["author", "text", "category", "likes"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub author: String,
    pub text: String,
    pub category: Category,
    pub likes: u64,
}

/// Report rows, most liked first. Ties keep fetch order.
pub fn report_rows(result: &AnalysisResult) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = result
        .entries()
        .iter()
        .map(|entry| ReportRow {
            author: entry.comment.author.clone(),
            text: entry.comment.text.clone(),
            category: entry.category,
            likes: entry.comment.likes,
        })
        .collect();

    rows.sort_by(|a, b| b.likes.cmp(&a.likes));
    rows
}

/// Header row first; fields are quoted only when they need it.
pub fn write_csv<W: io::Write>(rows: &[ReportRow], writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    // Written by hand so an empty report still carries the header.
    writer.write_record(REPORT_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_csv<R: io::Read>(reader: R) -> Result<Vec<ReportRow>> {
    let mut reader = csv::Reader::from_reader(reader);
    let rows = reader
        .deserialize::<ReportRow>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn to_csv(result: &AnalysisResult) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(&report_rows(result), &mut buffer)?;
    Ok(buffer)
}

pub async fn save_report(result: &AnalysisResult, path: &Path) -> Result<()> {
    let csv = to_csv(result)?;
    fs::write(path, csv).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        aggregate::aggregate,
        error::CommentaryError,
        types::{ClassifiedComment, Comment, RawComment},
    };

    fn result() -> AnalysisResult {
        let comments = [
            ("Alice", "Great, \"really\" great", 3, Category::Appreciation),
            ("Bob", "line one\nline two", 12, Category::NeutralStatement),
            ("Cara", "¿Cómo lo hiciste?", 3, Category::QuestionInquiry),
            ("Dan, Jr.", "meh", 0, Category::NegativeCriticism),
        ];

        aggregate(
            comments
                .into_iter()
                .map(|(author, text, likes, category)| ClassifiedComment {
                    comment: Comment::untranslated(RawComment {
                        author: author.to_string(),
                        text: text.to_string(),
                        likes,
                        published_at: "2024-05-01T08:00:00Z".parse().unwrap(),
                    }),
                    category,
                })
                .collect(),
        )
    }

    #[test]
    fn test_rows_sorted_by_likes_with_stable_ties() {
        let authors: Vec<String> = report_rows(&result())
            .into_iter()
            .map(|row| row.author)
            .collect();
        assert_eq!(authors, ["Bob", "Alice", "Cara", "Dan, Jr."]);
    }

    #[test]
    fn test_csv_layout() {
        let csv = String::from_utf8(to_csv(&result()).unwrap()).unwrap();
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some("author,text,category,likes"));
        assert_eq!(lines.next(), Some("Bob,\"line one"));
        assert!(csv.contains("Alice,\"Great, \"\"really\"\" great\",Appreciation,3"));
        assert!(csv.contains("\"Dan, Jr.\",meh,Negative Criticism,0"));
        assert!(csv.contains("Cara,¿Cómo lo hiciste?,Question/Inquiry,3"));
    }

    #[test]
    fn test_csv_round_trip() {
        let result = result();
        let csv = to_csv(&result).unwrap();
        let parsed = read_csv(csv.as_slice()).unwrap();
        assert_eq!(parsed, report_rows(&result));
    }

    #[test]
    fn test_empty_result_writes_header_only() {
        let csv = to_csv(&aggregate(Vec::new())).unwrap();
        assert_eq!(csv, b"author,text,category,likes\n");
        assert!(read_csv(csv.as_slice()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_report_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_REPORT_FILE);

        save_report(&result(), &path).await.unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let rows = read_csv(file).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].category, Category::NeutralStatement);
    }

    #[tokio::test]
    async fn test_save_report_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(DEFAULT_REPORT_FILE);

        let err = save_report(&result(), &path).await.unwrap_err();

        assert!(matches!(err, CommentaryError::IoError(_)));
        assert!(!path.exists());
    }
}
