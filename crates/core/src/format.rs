use crate::{aggregate::AnalysisResult, report::report_rows, types::Category};

const BAR_WIDTH: usize = 30;
const TEXT_PREVIEW_CHARS: usize = 80;

/// Shorten text to `max_chars`, flattening newlines.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }

    let mut short: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    short.push('…');
    short
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

fn short_label(category: Category) -> &'static str {
    match category {
        Category::Appreciation => "Apprec.",
        Category::ConstructiveFeedback => "Feedback",
        Category::NegativeCriticism => "Negative",
        Category::QuestionInquiry => "Question",
        Category::SpamOrPromotional => "Spam",
        Category::NeutralStatement => "Neutral",
    }
}

/// Format an analysis as human-readable markdown
pub fn format_analysis_readable(result: &AnalysisResult, video_id: &str, top: usize) -> String {
    let mut output = String::new();
    let summary = result.summary();

    output.push_str(&format!("# Comment analysis for {}\n\n", video_id));
    output.push_str(&format!(
        "**Total comments:** {} | **Positive sentiment:** {} | **Negative sentiment:** {}\n\n",
        summary.total, summary.positive, summary.negative
    ));

    let fallbacks = result
        .entries()
        .iter()
        .filter(|e| e.comment.is_fallback())
        .count();
    if fallbacks > 0 {
        output.push_str(&format!(
            "_{} comment(s) could not be translated and were classified as written._\n\n",
            fallbacks
        ));
    }

    // Category distribution
    output.push_str("## Category distribution\n\n");
    let max_count = result.counts_by_category().values().copied().max().unwrap_or(0);
    for (category, &count) in result.counts_by_category() {
        let width = if max_count == 0 {
            0
        } else {
            (count * BAR_WIDTH).div_ceil(max_count)
        };
        output.push_str(&format!(
            "{:<22} {:<width$} {:>4} ({:>5.1}%)\n",
            category.label(),
            "█".repeat(width),
            count,
            percent(count, summary.total),
            width = BAR_WIDTH
        ));
    }
    output.push('\n');

    // Likes distribution
    output.push_str("## Likes by category\n\n");
    let mut any_likes = false;
    for category in Category::ALL {
        if let Some(stats) = result.like_stats(category) {
            any_likes = true;
            output.push_str(&format!(
                "{:<22} n={:<4} min {:<5} q1 {:<7.1} median {:<7.1} q3 {:<7.1} max {}\n",
                category.label(),
                stats.count,
                stats.min,
                stats.q1,
                stats.median,
                stats.q3,
                stats.max
            ));
        }
    }
    if !any_likes {
        output.push_str("No comments.\n");
    }
    output.push('\n');

    // Timeline
    output.push_str("## Timeline\n\n");
    output.push_str(&format!("{:<10}", "Date"));
    for category in Category::ALL {
        output.push_str(&format!(" {:>8}", short_label(category)));
    }
    output.push('\n');
    for row in result.timeline_rows() {
        output.push_str(&format!("{:<10}", row.day.format("%Y-%m-%d")));
        for category in Category::ALL {
            output.push_str(&format!(" {:>8}", row.counts.get(&category).unwrap_or(&0)));
        }
        output.push('\n');
    }
    output.push('\n');

    // Top comments
    if top > 0 {
        output.push_str("## Most liked comments\n\n");
        for (i, row) in report_rows(result).iter().take(top).enumerate() {
            output.push_str(&format!(
                "{}. [{}] {} ({} likes): {}\n",
                i + 1,
                row.category,
                row.author,
                row.likes,
                truncate_text(&row.text, TEXT_PREVIEW_CHARS)
            ));
        }
        output.push('\n');
    }

    output
}
