//! Aggregator service for computing dashboard statistics
//!
//! Everything here is recomputed from the full record list on every call.

use crate::types::{
    minutes_to_hours, CategoryHours, DashboardStats, ReportRecord, SuggestionRow, TrendPoint,
};
use std::collections::HashMap;

/// Aggregator for computing dashboard statistics
pub struct Aggregator;

impl Aggregator {
    /// Derive all dashboard statistics. Returns None when there are no records.
    pub fn summarize(records: &[ReportRecord]) -> Option<DashboardStats> {
        if records.is_empty() {
            return None;
        }

        let categories = Self::by_category(records);
        let top_category = Self::top_category(&categories).map(|c| c.name.clone());
        let total_minutes = Self::total_minutes(records);

        Some(DashboardStats {
            day_count: records.len(),
            task_count: records.iter().map(|r| r.tasks.len()).sum(),
            total_minutes,
            total_hours: minutes_to_hours(total_minutes),
            avg_efficiency: Self::avg_efficiency(records)?,
            top_category,
            categories,
            trend: Self::trend(records),
            suggestions: Self::suggestions(records),
        })
    }

    /// Sum of day minutes across all records
    pub fn total_minutes(records: &[ReportRecord]) -> u64 {
        records
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.day_minutes()))
    }

    /// Mean efficiency score rounded to the nearest integer (None if empty)
    pub fn avg_efficiency(records: &[ReportRecord]) -> Option<i64> {
        if records.is_empty() {
            return None;
        }
        let sum: i128 = records.iter().map(|r| r.efficiency_score as i128).sum();
        Some((sum as f64 / records.len() as f64).round() as i64)
    }

    /// Aggregate task minutes by category, in first-encountered order.
    /// Tasks without a category are skipped.
    pub fn by_category(records: &[ReportRecord]) -> Vec<CategoryHours> {
        let mut order: Vec<(String, u64)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for task in records.iter().flat_map(|r| r.tasks.iter()) {
            let name = task.category.trim();
            if name.is_empty() {
                continue;
            }
            let minutes = task.duration_minutes as u64;
            match index.get(name) {
                Some(&i) => order[i].1 = order[i].1.saturating_add(minutes),
                None => {
                    index.insert(name.to_string(), order.len());
                    order.push((name.to_string(), minutes));
                }
            }
        }

        let categorized: u64 = order.iter().map(|(_, m)| *m).sum();

        order
            .into_iter()
            .map(|(name, minutes)| CategoryHours {
                name,
                minutes,
                hours: minutes_to_hours(minutes),
                percent: if categorized > 0 {
                    minutes as f64 / categorized as f64 * 100.0
                } else {
                    0.0
                },
            })
            .collect()
    }

    /// Category with the most (rounded) hours; the earliest one wins a tie
    pub fn top_category(categories: &[CategoryHours]) -> Option<&CategoryHours> {
        let mut best: Option<&CategoryHours> = None;
        for category in categories {
            match best {
                Some(b) if category.hours <= b.hours => {}
                _ => best = Some(category),
            }
        }
        best
    }

    /// Per-day hours and efficiency in record order
    pub fn trend(records: &[ReportRecord]) -> Vec<TrendPoint> {
        records
            .iter()
            .map(|r| TrendPoint {
                date: r.date_label().to_string(),
                hours: r.day_hours(),
                efficiency: r.efficiency_score,
            })
            .collect()
    }

    /// All suggestions flattened, keeping record order and per-record order
    pub fn suggestions(records: &[ReportRecord]) -> Vec<SuggestionRow> {
        records
            .iter()
            .flat_map(|r| {
                r.suggestions.iter().map(move |s| SuggestionRow {
                    date: r.date_label().to_string(),
                    text: s.clone(),
                })
            })
            .collect()
    }
}
