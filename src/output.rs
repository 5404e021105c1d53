//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! 001 Garden Planner → projects/garden-planner/index.html
//! 002 Lidar Mapper → projects/lidar-mapper/index.html
//! Not found → 404.html
//!
//! Generated 2 project pages
//! ```
//!
//! ## Check
//!
//! ```text
//! 3 projects
//! Slug issues
//!     "bad slug": slug contains ' '
//! ```
//!
//! ## Preview
//!
//! ```text
//!   2000ms  long hover: play
//!   2100ms  progress 0.1s
//! State: hovered=false long_hovered=false playing=false muted=false progress=9.2s
//! Resume link: /projects/lidar-mapper?v=9
//! ```
//!
//! With `--json`, one object per signal and a closing summary object:
//!
//! ```text
//! {"at_ms":2000,"signal":"long_hover"}
//! {"at_ms":2100,"signal":"progress","seconds":0.1}
//! {"state":{"hovered":false,...,"watch_progress":9.2},"resume_link":"/projects/lidar-mapper?v=9"}
//! ```

use crate::generate::{BuildReport, CheckReport};
use crate::hover::{HoverState, TimedSignal};
use serde::Serialize;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![format!("Home → {}", report.index.display())];
    for (i, page) in report.pages.iter().enumerate() {
        lines.push(format!(
            "{} {} → {}",
            format_index(i + 1),
            page.title,
            page.path.display()
        ));
    }
    lines.push(format!("Not found → {}", report.not_found.display()));
    lines.push(String::new());
    lines.push(format!(
        "Generated {}",
        plural(report.pages.len(), "project page", "project pages")
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = vec![plural(report.projects, "project", "projects")];
    if !report.issues.is_empty() {
        lines.push("Slug issues".to_string());
        for issue in &report.issues {
            lines.push(format!("{}{}", indent(1), issue));
        }
    }
    lines
}

pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

pub fn format_preview_trace(
    signals: &[TimedSignal],
    state: &HoverState,
    resume_link: &str,
) -> Vec<String> {
    let mut lines: Vec<String> = signals
        .iter()
        .map(|s| format!("{:>6}ms  {}", s.at_ms, s.signal))
        .collect();
    if lines.is_empty() {
        lines.push("(no signals)".to_string());
    }
    lines.push(format!(
        "State: hovered={} long_hovered={} playing={} muted={} progress={:.1}s",
        state.hovered, state.long_hovered, state.playing, state.muted, state.watch_progress
    ));
    lines.push(format!("Resume link: {resume_link}"));
    lines
}

pub fn print_preview_trace(signals: &[TimedSignal], state: &HoverState, resume_link: &str) {
    for line in format_preview_trace(signals, state, resume_link) {
        println!("{}", line);
    }
}

#[derive(Serialize)]
struct PreviewOutcome<'a> {
    state: &'a HoverState,
    resume_link: &'a str,
}

pub fn format_preview_json(
    signals: &[TimedSignal],
    state: &HoverState,
    resume_link: &str,
) -> Result<Vec<String>, serde_json::Error> {
    let mut lines = signals
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    lines.push(serde_json::to_string(&PreviewOutcome { state, resume_link })?);
    Ok(lines)
}

pub fn print_preview_json(
    signals: &[TimedSignal],
    state: &HoverState,
    resume_link: &str,
) -> Result<(), serde_json::Error> {
    for line in format_preview_json(signals, state, resume_link)? {
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::PageEntry;
    use crate::hover::Signal;
    use crate::slug::{SlugIssue, SlugProblem};
    use serde_json::{Value, json};
    use std::path::PathBuf;

    #[test]
    fn build_output_lists_every_page() {
        let report = BuildReport {
            index: PathBuf::from("index.html"),
            pages: vec![
                PageEntry {
                    title: "Garden".into(),
                    slug: "garden".into(),
                    path: PathBuf::from("projects/garden/index.html"),
                },
                PageEntry {
                    title: "Lidar".into(),
                    slug: "lidar".into(),
                    path: PathBuf::from("projects/lidar/index.html"),
                },
            ],
            not_found: PathBuf::from("404.html"),
        };
        assert_eq!(
            format_build_output(&report),
            vec![
                "Home → index.html",
                "001 Garden → projects/garden/index.html",
                "002 Lidar → projects/lidar/index.html",
                "Not found → 404.html",
                "",
                "Generated 2 project pages",
            ]
        );
    }

    #[test]
    fn check_output_indents_issues() {
        let report = CheckReport {
            projects: 1,
            issues: vec![SlugIssue::Invalid {
                slug: "a b".into(),
                problem: SlugProblem::InvalidChar(' '),
            }],
        };
        assert_eq!(
            format_check_output(&report),
            vec!["1 project", "Slug issues", "    \"a b\": slug contains ' '"]
        );
    }

    #[test]
    fn clean_check_is_one_line() {
        let report = CheckReport {
            projects: 3,
            issues: vec![],
        };
        assert_eq!(format_check_output(&report), vec!["3 projects"]);
    }

    #[test]
    fn preview_trace_aligns_offsets() {
        let signals = [
            TimedSignal {
                at_ms: 2000,
                signal: Signal::LongHover,
            },
            TimedSignal {
                at_ms: 11600,
                signal: Signal::Progress { seconds: 9.2 },
            },
        ];
        let state = HoverState {
            watch_progress: 9.2,
            ..HoverState::default()
        };
        let lines = format_preview_trace(&signals, &state, "/projects/x?v=9");
        assert_eq!(lines[0], "  2000ms  long hover: play");
        assert_eq!(lines[1], " 11600ms  progress 9.2s");
        assert_eq!(
            lines[2],
            "State: hovered=false long_hovered=false playing=false muted=true progress=9.2s"
        );
        assert_eq!(lines[3], "Resume link: /projects/x?v=9");
    }

    #[test]
    fn preview_json_is_one_object_per_line() {
        let signals = [
            TimedSignal {
                at_ms: 2000,
                signal: Signal::LongHover,
            },
            TimedSignal {
                at_ms: 2500,
                signal: Signal::Muted { muted: false },
            },
            TimedSignal {
                at_ms: 11600,
                signal: Signal::Progress { seconds: 9.2 },
            },
        ];
        let state = HoverState {
            watch_progress: 9.2,
            ..HoverState::default()
        };
        let lines = format_preview_json(&signals, &state, "/projects/x?v=9").unwrap();
        let parsed: Vec<Value> = lines
            .iter()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(
            parsed,
            vec![
                json!({"at_ms": 2000, "signal": "long_hover"}),
                json!({"at_ms": 2500, "signal": "muted", "muted": false}),
                json!({"at_ms": 11600, "signal": "progress", "seconds": 9.2}),
                json!({
                    "state": {
                        "hovered": false,
                        "long_hovered": false,
                        "playing": false,
                        "muted": true,
                        "watch_progress": 9.2
                    },
                    "resume_link": "/projects/x?v=9"
                }),
            ]
        );
    }

    #[test]
    fn empty_trace_says_so() {
        let lines = format_preview_trace(&[], &HoverState::default(), "/projects/x");
        assert_eq!(lines[0], "(no signals)");
    }
}
