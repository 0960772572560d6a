//! Output rendering for progress events and the final report.
//!
//! Supports `human` (default) and `json` outputs. In `json` mode progress
//! lines are suppressed and only the report object is printed.

use crate::models::Report;
use crate::pipeline::Event;
use owo_colors::OwoColorize;
use serde_json::Value as JsonVal;
use std::io::IsTerminal;
use std::path::Path;

fn use_colors(output: &str) -> bool {
    output != "json" && std::io::stdout().is_terminal()
}

fn bracket(p: &Path) -> String {
    format!("[{}]", p.display())
}

/// Render one progress event as human text (without trailing newline).
pub fn describe_event(ev: &Event) -> String {
    match ev {
        Event::Start { src_dir } => {
            format!("Start generating VS Code workspace for:\n{}", bracket(src_dir))
        }
        Event::Rules { count, file } => {
            format!("Found [{}] ninja build rules in:\n{}", count, bracket(file))
        }
        Event::UsedFiles { count, file } => {
            format!("Found [{}] relevant C source files in:\n{}", count, bracket(file))
        }
        Event::AllFiles { count, src_dir } => {
            format!("Found [{}] C source files in source dir:\n{}", count, bracket(src_dir))
        }
        Event::Excluded { count } => format!("Exclude [{}] unused C source files.", count),
        Event::CompileDb { path } => {
            format!("Zephyr compilation DB is saved as:\n{}", bracket(path))
        }
        Event::VscodeDir { path, created } => {
            if *created {
                format!(".vscode folder generated:\n{}", bracket(path))
            } else {
                format!(".vscode folder already exists:\n{}", bracket(path))
            }
        }
        Event::Generated {
            settings,
            properties,
        } => format!(
            "VS Code configuration JSON files generated:\n{}\n{}",
            bracket(settings),
            bracket(properties)
        ),
    }
}

/// Print a progress event unless the output mode is `json`.
pub fn print_event(ev: &Event, output: &str) {
    if output == "json" {
        return;
    }
    let text = describe_event(ev);
    if use_colors(output) {
        let (head, rest) = text.split_once('\n').unwrap_or((text.as_str(), ""));
        if rest.is_empty() {
            println!("{}\n", head.bold());
        } else {
            println!("{}\n{}\n", head.bold(), rest.cyan());
        }
    } else {
        println!("{}\n", text);
    }
}

/// Print the final report in the requested format.
pub fn print_report(report: &Report, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_report_json(report)).unwrap_or_default()
        ),
        _ => {
            let s = &report.summary;
            let summary = format!(
                "— Summary — rules={} used={} total={} excluded={} browse={}",
                s.rules, s.used_files, s.all_files, s.unused_files, s.browse_paths
            );
            if use_colors(output) {
                println!("{}", summary.green().bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Compose the report JSON object (pure) for testing purposes.
pub fn compose_report_json(report: &Report) -> JsonVal {
    serde_json::to_value(report).unwrap_or(JsonVal::Null)
}
