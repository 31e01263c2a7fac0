//! Extraction gateway: free-text report in, structured day records out
//!
//! Sends the report to Gemini `generateContent` with a fixed instruction and
//! a strict response schema. The reply is still treated as untrusted: code
//! fences are stripped, and the JSON is shape-checked before any record is
//! handed to the session.

use crate::config::Config;
use crate::types::{ExtractError, ReportRecord};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::OnceLock;
use std::time::Duration;

/// Header carrying the Gemini API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Prefix placed before the user's report text
const CONTENT_PREFIX: &str = "Daily report to analyze:\n";

/// Anything that can turn report text into day records
pub trait ReportExtractor: Send + Sync {
    fn extract(&self, raw_text: &str) -> Result<Vec<ReportRecord>, ExtractError>;
}

// ========== Reply parsing ==========

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("valid regex"))
}

/// Remove a markdown code fence around the payload, if any.
/// An opening fence with no closing one (cut-off reply) is dropped as well.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    if !text.contains("```") {
        return text;
    }
    if let Some(inner) = fence_regex().captures(text).and_then(|c| c.get(1)) {
        return inner.as_str().trim();
    }
    match text.strip_prefix("```") {
        Some(rest) => rest.strip_prefix("json").unwrap_or(rest).trim(),
        None => text,
    }
}

/// Parse a model reply into records.
///
/// A single object is wrapped into a one-element list. An empty list is
/// returned as-is; deciding that "nothing was recognized" is the caller's job.
pub fn parse_reply(text: &str) -> Result<Vec<ReportRecord>, ExtractError> {
    let payload = strip_code_fence(text);
    if payload.is_empty() {
        return Err(ExtractError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(payload).map_err(|e| {
        if e.classify() == serde_json::error::Category::Eof {
            ExtractError::TruncatedResponse
        } else {
            ExtractError::MalformedResponse(e.to_string())
        }
    })?;

    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| parse_record(i, item))
            .collect(),
        obj @ Value::Object(_) => Ok(vec![parse_record(0, obj)?]),
        other => Err(ExtractError::MalformedResponse(format!(
            "expected an array of day objects, found {}",
            json_kind(&other)
        ))),
    }
}

fn parse_record(index: usize, item: Value) -> Result<ReportRecord, ExtractError> {
    if !item.is_object() {
        return Err(ExtractError::MalformedResponse(format!(
            "day {} is {}, not an object",
            index + 1,
            json_kind(&item)
        )));
    }
    ReportRecord::deserialize(item)
        .map_err(|e| ExtractError::MalformedResponse(format!("day {}: {}", index + 1, e)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ========== Request building ==========

/// Fixed instruction sent as the system prompt
pub fn system_instruction(language: &str, categories: &[String]) -> String {
    let labels = categories
        .iter()
        .map(|c| format!("'{}'", c))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are a professional HR data analyst. Analyze the daily work report and return a JSON array.
Each object in the array is the analysis of one day.

Key rules:
1. Language: every text value must be written in {language}.
2. Format: return JSON only. Never wrap it in markdown code fences and never add commentary.
3. Brevity: keep all descriptions short so the reply is not cut off.
4. Dates: find date labels such as "12/22" and use them as reportDate.
5. Categories: label tasks with short categories such as {labels}.
6. Escaping: make sure every double quote and line break inside strings is escaped.
7. Durations: derive durationMinutes from time ranges such as (08:30~10:00) and set totalDurationMinutes to the day's total.

Structure example:
[
  {{
    "reportDate": "date label",
    "totalDurationMinutes": 0,
    "tasks": [
      {{
        "id": "unique id",
        "title": "task title",
        "category": "category label",
        "durationMinutes": 0,
        "startTime": "08:30",
        "endTime": "10:00",
        "description": "short description"
      }}
    ],
    "summary": "one-line summary of the day (under 50 words)",
    "efficiencyScore": 0,
    "suggestions": ["suggestion one", "suggestion two"]
  }}
]"#
    )
}

/// Strict output schema (Gemini OpenAPI subset)
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "reportDate": { "type": "STRING" },
                "totalDurationMinutes": { "type": "INTEGER" },
                "tasks": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "id": { "type": "STRING" },
                            "title": { "type": "STRING" },
                            "category": { "type": "STRING" },
                            "durationMinutes": { "type": "INTEGER" },
                            "startTime": { "type": "STRING" },
                            "endTime": { "type": "STRING" },
                            "description": { "type": "STRING" }
                        },
                        "required": ["id", "title", "category", "durationMinutes"]
                    }
                },
                "summary": { "type": "STRING" },
                "efficiencyScore": { "type": "INTEGER" },
                "suggestions": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" }
                }
            },
            "required": ["reportDate", "tasks", "summary", "efficiencyScore", "suggestions"]
        }
    })
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

fn build_request(config: &Config, raw_text: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: system_instruction(&config.language, &config.categories),
            }],
        },
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part {
                text: format!("{}{}", CONTENT_PREFIX, raw_text),
            }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: response_schema(),
        },
    }
}

// ========== Response envelope ==========

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Concatenated text of the first candidate
fn reply_text(response: &GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.first()?;
    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason != "STOP" {
            tracing::warn!(finish_reason = reason, "generation did not finish normally");
        }
    }
    let text: String = candidate
        .content
        .as_ref()?
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Error message from a non-success response body, falling back to the raw body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => body.trim().chars().take(200).collect(),
    }
}

// ========== Gemini client ==========

/// Extractor backed by the Gemini REST API
pub struct GeminiExtractor {
    config: Config,
}

impl GeminiExtractor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    fn try_extract(&self, raw_text: &str) -> Result<Vec<ReportRecord>, ExtractError> {
        let api_key = self.config.api_key().ok_or(ExtractError::Configuration)?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()
            .map_err(|e| ExtractError::Request(format!("HTTP client error: {}", e)))?;

        tracing::info!(
            model = %self.config.model,
            chars = raw_text.chars().count(),
            "sending report for extraction"
        );

        let response = client
            .post(self.endpoint_url())
            .header(API_KEY_HEADER, api_key)
            .json(&build_request(&self.config, raw_text))
            .send()
            .map_err(|e| ExtractError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ExtractError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(ExtractError::Request(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_message(&body)
            )));
        }

        let envelope: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ExtractError::MalformedResponse(format!("unexpected envelope: {}", e)))?;

        let text = reply_text(&envelope).ok_or(ExtractError::EmptyResponse)?;
        tracing::debug!(bytes = text.len(), "received extraction reply");

        parse_reply(&text)
    }
}

impl ReportExtractor for GeminiExtractor {
    fn extract(&self, raw_text: &str) -> Result<Vec<ReportRecord>, ExtractError> {
        self.try_extract(raw_text).inspect_err(|e| {
            tracing::error!(error = ?e, "report extraction failed");
        })
    }
}
