use anyhow::Result;
use dasmine_engine::build_session_map;
use dasmine_types::{Anomaly, SessionWindow};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;

use super::open_source;
use crate::config::Config;
use crate::types::OutputFormat;

#[derive(Debug, Serialize)]
struct SessionView<'a> {
    session_id: &'a str,
    start: Option<&'a str>,
    end: Option<&'a str>,
    known: bool,
    duration_secs: Option<i64>,
}

impl<'a> SessionView<'a> {
    fn new(session_id: &'a str, window: &'a SessionWindow) -> Self {
        Self {
            session_id,
            start: window.start.as_ref().map(|t| t.as_str()),
            end: window.end.as_ref().map(|t| t.as_str()),
            known: window.is_known(),
            duration_secs: window.duration_secs(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SessionsReport<'a> {
    sessions: Vec<SessionView<'a>>,
    anomalies: &'a [Anomaly],
}

pub fn handle(input: &str, format: OutputFormat, config: &Config) -> Result<()> {
    let source = open_source(input, config)?;
    let tracked = build_session_map(source.as_ref(), config.duplicate_policy)?;

    let sessions: Vec<_> = tracked
        .sessions
        .sorted()
        .into_iter()
        .map(|(id, window)| SessionView::new(id, window))
        .collect();

    let report = SessionsReport {
        sessions,
        anomalies: &tracked.anomalies,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => print_plain(&report),
    }
    Ok(())
}

fn print_plain(report: &SessionsReport<'_>) {
    let color = std::io::stdout().is_terminal();
    let id_width = report
        .sessions
        .iter()
        .map(|s| s.session_id.len())
        .max()
        .unwrap_or(0)
        .max("SESSION".len());

    println!(
        "{:<id_width$}  {:<14}  {:<14}  DURATION",
        "SESSION", "START", "END"
    );
    for view in &report.sessions {
        let duration = match view.duration_secs {
            Some(secs) => format!("{}s", secs),
            None => "-".to_string(),
        };
        let start = view.start.unwrap_or("-");
        let end = view.end.unwrap_or("-");
        let line = format!(
            "{:<id_width$}  {:<14}  {:<14}  {}",
            view.session_id, start, end, duration
        );

        if !view.known && color {
            println!("{}  {}", line, "(unknown)".yellow());
        } else if !view.known {
            println!("{}  (unknown)", line);
        } else {
            println!("{}", line);
        }
    }

    if report.anomalies.is_empty() {
        return;
    }
    println!();
    println!("Anomalies:");
    for anomaly in report.anomalies {
        if color {
            println!("  {}", anomaly.to_string().red());
        } else {
            println!("  {}", anomaly);
        }
    }
}
