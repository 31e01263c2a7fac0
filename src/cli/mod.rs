use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::Config;
use crate::logging::{self, LogTarget};
use crate::services::{GeminiExtractor, ReportExtractor};
use crate::session::Session;
use crate::tui;
use crate::tui::widgets::overview::{format_bar, format_hours};
use crate::types::{DashboardStats, ReportRecord, WorklensError};

/// Width of the bars in text output
const TEXT_BAR_WIDTH: usize = 20;

/// Turn free-text daily work reports into a work-hours dashboard
#[derive(Parser)]
#[command(name = "worklens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Gemini model to use (overrides config file and WORKLENS_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive TUI (default)
    Tui {
        /// Pre-fill the input with the contents of a report file
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Analyze report files (stdin when none given) and print the dashboard
    Analyze {
        /// Report files; each file is one submission
        files: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// JSON document printed by `analyze --json`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOutput<'a> {
    generated_at: String,
    records: &'a [ReportRecord],
    stats: &'a DashboardStats,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        if let Some(model) = self.model {
            config.model = model;
        }

        match self.command {
            None => run_tui(config, None),
            Some(Commands::Tui { file }) => run_tui(config, file),
            Some(Commands::Analyze { files, json }) => run_analyze(config, &files, json),
        }
    }
}

fn run_tui(config: Config, file: Option<PathBuf>) -> anyhow::Result<()> {
    if let Some(target) = LogTarget::default_file() {
        logging::init(target);
    }
    tracing::debug!(?config, "starting tui");

    let initial_input = file
        .map(|path| {
            fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))
        })
        .transpose()?;

    let extractor: Arc<dyn ReportExtractor> = Arc::new(GeminiExtractor::new(config));
    tui::run(extractor, initial_input)
}

/// Read each file, or stdin when no file is given, as (label, text)
fn read_inputs(files: &[PathBuf]) -> anyhow::Result<Vec<(String, String)>> {
    if files.is_empty() {
        let text = io::read_to_string(io::stdin()).context("failed to read stdin")?;
        return Ok(vec![("<stdin>".to_string(), text)]);
    }

    files
        .iter()
        .map(|path| {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok((path.display().to_string(), text))
        })
        .collect()
}

fn run_analyze(config: Config, files: &[PathBuf], json: bool) -> anyhow::Result<()> {
    logging::init(LogTarget::Stderr);
    tracing::debug!(?config, files = files.len(), "starting analyze");

    let inputs = read_inputs(files)?;
    let extractor = GeminiExtractor::new(config);
    let mut session = Session::new();

    for (label, text) in &inputs {
        match session.submit(text, &extractor) {
            None => eprintln!("[worklens] Warning: {} is empty, skipped", label),
            Some(Ok(added)) => tracing::info!(input = %label, added, "input analyzed"),
            Some(Err(e)) if !e.is_recoverable() => return Err(WorklensError::from(e).into()),
            Some(Err(e)) => eprintln!("[worklens] Warning: {}: {}", label, e),
        }
    }

    let Some(stats) = session.stats() else {
        anyhow::bail!("no daily report could be analyzed");
    };

    if json {
        let output = AnalyzeOutput {
            generated_at: chrono::Local::now().to_rfc3339(),
            records: session.records(),
            stats: &stats,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_text(&stats));
    }
    Ok(())
}

/// Plain-text dashboard
fn render_text(stats: &DashboardStats) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "worklens report ({} days, {} tasks)\n\n",
        stats.day_count, stats.task_count
    ));
    out.push_str(&format!("Total hours      {}\n", format_hours(stats.total_hours)));
    out.push_str(&format!("Avg efficiency   {}%\n", stats.avg_efficiency));
    out.push_str(&format!(
        "Top category     {}\n",
        stats.top_category.as_deref().unwrap_or("N/A")
    ));

    out.push_str("\nHours per day\n");
    let max_hours = stats.trend.iter().map(|p| p.hours).fold(0.0_f64, f64::max);
    for point in &stats.trend {
        out.push_str(&format!(
            "  {:<14} {} {:>6} {:>4}%\n",
            point.date,
            format_bar(point.hours, max_hours, TEXT_BAR_WIDTH),
            format_hours(point.hours),
            point.efficiency
        ));
    }

    if !stats.categories.is_empty() {
        out.push_str("\nTime by category\n");
        for category in &stats.categories {
            out.push_str(&format!(
                "  {:<14} {} {:>6} {:>5.1}%\n",
                category.name,
                format_bar(category.percent, 100.0, TEXT_BAR_WIDTH),
                format_hours(category.hours),
                category.percent
            ));
        }
    }

    if !stats.suggestions.is_empty() {
        out.push_str("\nSuggestions\n");
        for row in &stats.suggestions {
            out.push_str(&format!("  [{}] {}\n", row.date, row.text));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Aggregator;
    use crate::types::Task;

    fn make_records() -> Vec<ReportRecord> {
        vec![
            ReportRecord {
                report_date: "12/22".into(),
                total_duration_minutes: Some(450),
                tasks: vec![Task {
                    title: "Inspection".into(),
                    category: "Lab".into(),
                    duration_minutes: 300,
                    ..Task::default()
                }],
                efficiency_score: 80,
                suggestions: vec!["Start earlier".into()],
                ..ReportRecord::default()
            },
            ReportRecord {
                report_date: "12/23".into(),
                total_duration_minutes: Some(480),
                efficiency_score: 60,
                ..ReportRecord::default()
            },
        ]
    }

    // ========== argument parsing tests ==========

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["worklens"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.model.is_none());
    }

    #[test]
    fn test_cli_parse_tui_with_file() {
        let cli = Cli::try_parse_from(["worklens", "tui", "--file", "week.txt"]).unwrap();
        match cli.command {
            Some(Commands::Tui { file }) => assert_eq!(file, Some(PathBuf::from("week.txt"))),
            _ => panic!("expected tui command"),
        }
    }

    #[test]
    fn test_cli_parse_analyze_files_json() {
        let cli =
            Cli::try_parse_from(["worklens", "analyze", "a.txt", "b.txt", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Analyze { files, json }) => {
                assert_eq!(files.len(), 2);
                assert!(json);
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_cli_parse_analyze_stdin() {
        let cli = Cli::try_parse_from(["worklens", "analyze"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Analyze { ref files, json: false }) if files.is_empty()
        ));
    }

    #[test]
    fn test_cli_parse_global_model() {
        let cli =
            Cli::try_parse_from(["worklens", "analyze", "--model", "gemini-2.5-pro"]).unwrap();
        assert_eq!(cli.model.as_deref(), Some("gemini-2.5-pro"));
    }

    // ========== output tests ==========

    #[test]
    fn test_render_text_sections() {
        let stats = Aggregator::summarize(&make_records()).unwrap();
        let text = render_text(&stats);

        assert!(text.contains("2 days, 1 tasks"));
        assert!(text.contains("Total hours      15.5h"));
        assert!(text.contains("Avg efficiency   70%"));
        assert!(text.contains("Top category     Lab"));
        assert!(text.contains("12/23"));
        assert!(text.contains("[12/22] Start earlier"));
    }

    #[test]
    fn test_render_text_without_categories() {
        let records = vec![ReportRecord {
            report_date: "12/22".into(),
            ..ReportRecord::default()
        }];
        let stats = Aggregator::summarize(&records).unwrap();
        let text = render_text(&stats);

        assert!(text.contains("Top category     N/A"));
        assert!(!text.contains("Time by category"));
        assert!(!text.contains("Suggestions"));
    }

    #[test]
    fn test_json_output_shape() {
        let records = make_records();
        let stats = Aggregator::summarize(&records).unwrap();
        let output = AnalyzeOutput {
            generated_at: "2025-12-24T09:00:00+08:00".into(),
            records: &records,
            stats: &stats,
        };

        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["generatedAt"], "2025-12-24T09:00:00+08:00");
        assert_eq!(value["records"][0]["reportDate"], "12/22");
        assert_eq!(value["stats"]["avgEfficiency"], 70);
        assert_eq!(value["stats"]["topCategory"], "Lab");
    }

    #[test]
    fn test_read_inputs_labels_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("day.txt");
        fs::write(&path, "12/22 lab work").unwrap();

        let inputs = read_inputs(&[path.clone()]).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].0, path.display().to_string());
        assert_eq!(inputs[0].1, "12/22 lab work");
    }

    #[test]
    fn test_read_inputs_missing_file() {
        let err = read_inputs(&[PathBuf::from("/nonexistent/worklens/day.txt")]).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
