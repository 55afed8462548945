//! `certprep history`: print stored exam results.

use anyhow::Result;
use chrono::{Local, TimeZone};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let mut results = app.history_store().load();
    results.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        OutputFormat::Plain => {
            if results.is_empty() {
                println!("No exam results yet.");
                return Ok(());
            }

            for result in &results {
                let when = Local
                    .timestamp_millis_opt(result.timestamp)
                    .single()
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| result.timestamp.to_string());
                let percent = if result.total_questions > 0 {
                    result.score * 100 / result.total_questions
                } else {
                    0
                };

                println!(
                    "{}  {}  {}/{} ({}%)",
                    when,
                    result.exam_type.short_name(),
                    result.score,
                    result.total_questions,
                    percent
                );
                if result.study_guide.is_some() {
                    println!("           study guide available");
                }
            }
        }
    }

    Ok(())
}
