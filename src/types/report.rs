//! Report record types extracted from free-text daily reports

use serde::{Deserialize, Serialize};

/// Label shown for a record whose date the model could not recognize
pub const UNKNOWN_DATE: &str = "Unknown date";

/// One unit of work within a day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    /// Free-text label, e.g. "Documentation" or "Lab work"
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::duration")]
    pub duration_minutes: u32,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    /// Start of the time range as written in the report (e.g. "08:30")
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<String>,
}

impl Task {
    /// "08:30~10:00" when both ends are known
    pub fn time_range(&self) -> Option<String> {
        match (&self.start_time, &self.end_time) {
            (Some(start), Some(end)) => Some(format!("{}~{}", start, end)),
            (Some(start), None) => Some(format!("{}~", start)),
            (None, Some(end)) => Some(format!("~{}", end)),
            (None, None) => None,
        }
    }
}

/// One day's analysis as produced by the extraction gateway
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    /// Free-text date label ("12/22", "Mon 12/22", ...)
    #[serde(default, deserialize_with = "lenient::string")]
    pub report_date: String,
    #[serde(
        default,
        deserialize_with = "lenient::opt_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_duration_minutes: Option<u32>,
    #[serde(default, deserialize_with = "lenient::tasks")]
    pub tasks: Vec<Task>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    /// Nominally 0-100, never clamped
    #[serde(default, deserialize_with = "lenient::int")]
    pub efficiency_score: i64,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub suggestions: Vec<String>,
}

impl ReportRecord {
    /// Sum of the task durations
    pub fn task_minutes(&self) -> u64 {
        self.tasks.iter().map(|t| t.duration_minutes as u64).sum()
    }

    /// Minutes counted for this day: the reported day total when present,
    /// otherwise the sum of task durations
    pub fn day_minutes(&self) -> u64 {
        self.total_duration_minutes
            .map(u64::from)
            .unwrap_or_else(|| self.task_minutes())
    }

    /// Day hours rounded to one decimal
    pub fn day_hours(&self) -> f64 {
        minutes_to_hours(self.day_minutes())
    }

    pub fn date_label(&self) -> &str {
        let trimmed = self.report_date.trim();
        if trimmed.is_empty() {
            UNKNOWN_DATE
        } else {
            trimmed
        }
    }
}

/// Round to one decimal place (half away from zero)
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Convert minutes to hours rounded to one decimal place
pub fn minutes_to_hours(minutes: u64) -> f64 {
    round_tenth(minutes as f64 / 60.0)
}

/// Hours spent in one category across all records
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryHours {
    pub name: String,
    pub minutes: u64,
    /// Rounded to one decimal
    pub hours: f64,
    /// Share of all categorized minutes (0-100)
    pub percent: f64,
}

/// One point of the per-day trend series
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendPoint {
    pub date: String,
    pub hours: f64,
    pub efficiency: i64,
}

/// A suggestion tagged with the day it came from
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SuggestionRow {
    pub date: String,
    pub text: String,
}

/// Dashboard statistics derived from a non-empty list of records
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub day_count: usize,
    pub task_count: usize,
    pub total_minutes: u64,
    pub total_hours: f64,
    pub avg_efficiency: i64,
    /// None when no task carries a category
    pub top_category: Option<String>,
    /// Categories in first-encountered order
    pub categories: Vec<CategoryHours>,
    pub trend: Vec<TrendPoint>,
    pub suggestions: Vec<SuggestionRow>,
}

/// Tolerant field decoders for model output.
///
/// Missing or null values fall back to defaults; numbers are accepted as
/// floats or numeric strings. Any other type mismatch is an error.
mod lenient {
    use super::Task;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn value_to_string<E: Error>(value: Value) -> Result<String, E> {
        match value {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(E::custom(format!("expected string, found {}", other))),
        }
    }

    fn value_to_int<E: Error>(value: Value) -> Result<i64, E> {
        match value {
            Value::Null => Ok(0),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.round() as i64))
                .ok_or_else(|| E::custom(format!("integer out of range: {}", n))),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(0);
                }
                trimmed
                    .parse::<f64>()
                    .map(|f| f.round() as i64)
                    .map_err(|_| E::custom(format!("expected integer, found \"{}\"", s)))
            }
            other => Err(E::custom(format!("expected integer, found {}", other))),
        }
    }

    fn clamp_minutes(value: i64) -> u32 {
        value.clamp(0, u32::MAX as i64) as u32
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        value_to_string(Value::deserialize(d)?)
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let s = value_to_string(Value::deserialize(d)?)?;
        Ok(if s.trim().is_empty() { None } else { Some(s) })
    }

    pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        value_to_int(Value::deserialize(d)?)
    }

    pub fn duration<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        value_to_int(Value::deserialize(d)?).map(clamp_minutes)
    }

    pub fn opt_duration<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(None),
            value => value_to_int(value).map(|v| Some(clamp_minutes(v))),
        }
    }

    pub fn strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items
                .into_iter()
                .map(value_to_string)
                .filter(|s| !matches!(s, Ok(s) if s.trim().is_empty()))
                .collect(),
            other => Err(D::Error::custom(format!("expected list, found {}", other))),
        }
    }

    pub fn tasks<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Task>, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(_) => Task::deserialize(item).map_err(D::Error::custom),
                    other => Err(D::Error::custom(format!(
                        "expected task object, found {}",
                        other
                    ))),
                })
                .collect(),
            other => Err(D::Error::custom(format!(
                "expected task list, found {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ReportRecord {
        serde_json::from_str(json).unwrap()
    }

    fn make_task(category: &str, minutes: u32) -> Task {
        Task {
            id: "1".into(),
            title: "t".into(),
            category: category.into(),
            duration_minutes: minutes,
            ..Task::default()
        }
    }

    #[test]
    fn test_parse_full_record() {
        let record = parse(
            r#"{
                "reportDate": "12/22",
                "totalDurationMinutes": 450,
                "tasks": [
                    {"id": "a1", "title": "Sample inspection", "category": "Inspection",
                     "durationMinutes": 90, "description": "cosmetics",
                     "startTime": "08:30", "endTime": "10:00"}
                ],
                "summary": "busy day",
                "efficiencyScore": 85,
                "suggestions": ["batch the paperwork"]
            }"#,
        );

        assert_eq!(record.report_date, "12/22");
        assert_eq!(record.total_duration_minutes, Some(450));
        assert_eq!(record.tasks.len(), 1);
        assert_eq!(record.tasks[0].duration_minutes, 90);
        assert_eq!(record.tasks[0].description.as_deref(), Some("cosmetics"));
        assert_eq!(record.tasks[0].time_range().as_deref(), Some("08:30~10:00"));
        assert_eq!(record.efficiency_score, 85);
        assert_eq!(record.suggestions, vec!["batch the paperwork".to_string()]);
    }

    #[test]
    fn test_missing_fields_default() {
        let record = parse(r#"{"reportDate": "12/23"}"#);

        assert_eq!(record.total_duration_minutes, None);
        assert!(record.tasks.is_empty());
        assert_eq!(record.summary, "");
        assert_eq!(record.efficiency_score, 0);
        assert!(record.suggestions.is_empty());
    }

    #[test]
    fn test_null_fields_default() {
        let record = parse(
            r#"{"reportDate": null, "tasks": null, "efficiencyScore": null,
                "suggestions": null, "totalDurationMinutes": null}"#,
        );

        assert_eq!(record.report_date, "");
        assert_eq!(record.date_label(), UNKNOWN_DATE);
        assert_eq!(record.total_duration_minutes, None);
        assert_eq!(record.efficiency_score, 0);
    }

    #[test]
    fn test_numeric_strings_and_floats_accepted() {
        let record = parse(
            r#"{"reportDate": "1/2", "efficiencyScore": "72",
                "totalDurationMinutes": 120.4,
                "tasks": [{"id": 7, "title": "x", "category": "c", "durationMinutes": "45"}]}"#,
        );

        assert_eq!(record.efficiency_score, 72);
        assert_eq!(record.total_duration_minutes, Some(120));
        assert_eq!(record.tasks[0].id, "7");
        assert_eq!(record.tasks[0].duration_minutes, 45);
    }

    #[test]
    fn test_negative_duration_clamps_to_zero() {
        let record = parse(
            r#"{"tasks": [{"id": "1", "title": "x", "category": "c", "durationMinutes": -30}]}"#,
        );
        assert_eq!(record.tasks[0].duration_minutes, 0);
    }

    #[test]
    fn test_score_not_clamped() {
        let record = parse(r#"{"efficiencyScore": 130}"#);
        assert_eq!(record.efficiency_score, 130);
    }

    #[test]
    fn test_wrong_types_rejected() {
        assert!(serde_json::from_str::<ReportRecord>(r#"{"tasks": "none"}"#).is_err());
        assert!(serde_json::from_str::<ReportRecord>(r#"{"tasks": [1, 2]}"#).is_err());
        assert!(serde_json::from_str::<ReportRecord>(r#"{"efficiencyScore": "high"}"#).is_err());
        assert!(serde_json::from_str::<ReportRecord>(r#"{"suggestions": {"a": 1}}"#).is_err());
    }

    #[test]
    fn test_blank_suggestions_dropped() {
        let record = parse(r#"{"suggestions": ["keep", "", "  ", "also keep"]}"#);
        assert_eq!(record.suggestions, vec!["keep", "also keep"]);
    }

    #[test]
    fn test_day_minutes_prefers_reported_total() {
        let record = ReportRecord {
            total_duration_minutes: Some(480),
            tasks: vec![make_task("a", 60), make_task("b", 30)],
            ..ReportRecord::default()
        };
        assert_eq!(record.task_minutes(), 90);
        assert_eq!(record.day_minutes(), 480);
        assert!((record.day_hours() - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_day_minutes_falls_back_to_task_sum() {
        let record = ReportRecord {
            total_duration_minutes: None,
            tasks: vec![make_task("a", 60), make_task("b", 30)],
            ..ReportRecord::default()
        };
        assert_eq!(record.day_minutes(), 90);
        assert!((record.day_hours() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_minutes_to_hours_rounding() {
        assert!((minutes_to_hours(0) - 0.0).abs() < f64::EPSILON);
        assert!((minutes_to_hours(100) - 1.7).abs() < f64::EPSILON); // 1.666..
        assert!((minutes_to_hours(45) - 0.8).abs() < f64::EPSILON); // 0.75
        assert!((minutes_to_hours(3) - 0.1).abs() < f64::EPSILON); // 0.05
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let record = ReportRecord {
            report_date: "12/22".into(),
            efficiency_score: 80,
            ..ReportRecord::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"reportDate\":\"12/22\""));
        assert!(json.contains("\"efficiencyScore\":80"));
        assert!(!json.contains("totalDurationMinutes"));
    }

    #[test]
    fn test_time_range_partial() {
        let mut task = make_task("a", 10);
        assert_eq!(task.time_range(), None);
        task.start_time = Some("09:00".into());
        assert_eq!(task.time_range().as_deref(), Some("09:00~"));
    }
}
