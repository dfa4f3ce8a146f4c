use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{Category, ClassifiedComment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    /// Appreciation plus Constructive Feedback.
    pub positive: usize,
    pub negative: usize,
}

/// Box-plot statistics of a like-count distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LikeStats {
    pub count: usize,
    pub min: u64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineRow {
    pub day: NaiveDate,
    pub counts: BTreeMap<Category, usize>,
}

/// Classified comments for one video and everything derived from them. Only
/// [`aggregate`] builds one, so the aggregates always match the entries.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    entries: Vec<ClassifiedComment>,
    counts_by_category: BTreeMap<Category, usize>,
    likes_by_category: BTreeMap<Category, Vec<u64>>,
    timeline: BTreeMap<(NaiveDate, Category), usize>,
}

pub fn aggregate(entries: Vec<ClassifiedComment>) -> AnalysisResult {
    let mut counts_by_category: BTreeMap<Category, usize> =
        Category::ALL.iter().map(|c| (*c, 0)).collect();
    let mut likes_by_category: BTreeMap<Category, Vec<u64>> =
        Category::ALL.iter().map(|c| (*c, Vec::new())).collect();
    let mut timeline: BTreeMap<(NaiveDate, Category), usize> = BTreeMap::new();

    for entry in &entries {
        *counts_by_category.entry(entry.category).or_default() += 1;
        likes_by_category
            .entry(entry.category)
            .or_default()
            .push(entry.comment.likes);

        let day = entry.comment.published_at.date_naive();
        *timeline.entry((day, entry.category)).or_default() += 1;
    }

    for likes in likes_by_category.values_mut() {
        likes.sort_unstable();
    }

    AnalysisResult {
        entries,
        counts_by_category,
        likes_by_category,
        timeline,
    }
}

impl AnalysisResult {
    pub fn entries(&self) -> &[ClassifiedComment] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every category is present, absent ones with 0.
    pub fn counts_by_category(&self) -> &BTreeMap<Category, usize> {
        &self.counts_by_category
    }

    pub fn count(&self, category: Category) -> usize {
        self.counts_by_category.get(&category).copied().unwrap_or(0)
    }

    /// Like counts per category, each sorted ascending.
    pub fn likes_by_category(&self) -> &BTreeMap<Category, Vec<u64>> {
        &self.likes_by_category
    }

    /// Comment counts keyed by UTC day and category.
    pub fn timeline(&self) -> &BTreeMap<(NaiveDate, Category), usize> {
        &self.timeline
    }

    /// One zero-filled row per day that has comments, oldest first.
    pub fn timeline_rows(&self) -> Vec<TimelineRow> {
        let mut rows: BTreeMap<NaiveDate, BTreeMap<Category, usize>> = BTreeMap::new();
        for (&(day, category), &count) in &self.timeline {
            rows.entry(day)
                .or_insert_with(|| Category::ALL.iter().map(|c| (*c, 0)).collect())
                .insert(category, count);
        }

        rows.into_iter()
            .map(|(day, counts)| TimelineRow { day, counts })
            .collect()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total: self.entries.len(),
            positive: self.count(Category::Appreciation)
                + self.count(Category::ConstructiveFeedback),
            negative: self.count(Category::NegativeCriticism),
        }
    }

    pub fn like_stats(&self, category: Category) -> Option<LikeStats> {
        let likes = self.likes_by_category.get(&category)?;
        let (&min, &max) = (likes.first()?, likes.last()?);

        Some(LikeStats {
            count: likes.len(),
            min,
            q1: quantile(likes, 0.25),
            median: quantile(likes, 0.5),
            q3: quantile(likes, 0.75),
            max,
        })
    }
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn quantile(sorted: &[u64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] as f64 + (sorted[upper] as f64 - sorted[lower] as f64) * fraction
}
