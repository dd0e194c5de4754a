//! Colorful console output for the command line operations.

use chrono::Local;
use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::fmt::Write;

use crate::presenter::{Block, Item, Metric, PanelContent, Tone};
use crate::render::{CameraOutcome, RedrawReport};
use crate::snapshot::SnapshotCounts;
use crate::view::ViewKind;

/// ASCII art banner for startup.
pub fn print_banner() {
    let banner = r#"
   ____ _ _            ____  _
  / ___(_) |_ _   _   |  _ \| | __ _ _ __  _ __   ___ _ __
 | |   | | __| | | |  | |_) | |/ _` | '_ \| '_ \ / _ \ '__|
 | |___| | |_| |_| |  |  __/| | (_| | | | | | | |  __/ |
  \____|_|\__|\__, |  |_|   |_|\__,_|_| |_|_| |_|\___|_|
              |___/
"#;
    println!("{}", banner.cyan().bold());
    println!(
        "  {} {}\n",
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black(),
        "Urban Infrastructure Planner".bright_cyan()
    );
}

/// Prints the snapshot sizes after a successful load.
pub fn print_snapshot_loaded(counts: &SnapshotCounts) {
    println!(
        "{} {} {} neighborhoods ({}), facilities ({}), existing roads ({}), potential roads ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Snapshot]".bright_cyan(),
        counts.neighborhoods.to_formatted_string(&Locale::en).bright_yellow(),
        counts.facilities.to_formatted_string(&Locale::en).bright_yellow(),
        counts.existing_roads.to_formatted_string(&Locale::en).bright_yellow(),
        counts.potential_roads.to_formatted_string(&Locale::en).bright_yellow()
    );
}

/// Prints a view's panel.
pub fn print_panel(view: ViewKind, content: &PanelContent) {
    print!("{}", format_panel(view, content));
}

/// Prints the one-line redraw summary.
pub fn print_report(report: &RedrawReport) {
    println!("{}", format_report(report));
}

pub fn format_panel(view: ViewKind, content: &PanelContent) -> String {
    let mut out = String::new();
    let header = format!("[{}]", view);
    match content {
        PanelContent::Empty => {
            let _ = writeln!(out, "{} {}", header.bright_cyan(), "No results yet".bright_black());
        }
        PanelContent::Error(notice) => {
            let _ = writeln!(out, "{} {}", header.bright_cyan(), notice.message.bright_red().bold());
            for step in &notice.remediation {
                let _ = writeln!(out, "    {} {}", "→".bright_blue(), step);
            }
        }
        PanelContent::Summary(summary) => {
            let _ = writeln!(out, "{} {}", header.bright_cyan(), summary.title.white().bold());
            write_metrics(&mut out, &summary.metrics, 2);
            for section in &summary.sections {
                let _ = writeln!(out, "\n  {}", section.heading.bright_magenta().bold());
                write_metrics(&mut out, &section.metrics, 4);
                write_block(&mut out, &section.block);
            }
        }
    }
    out
}

fn write_metrics(out: &mut String, metrics: &[Metric], indent: usize) {
    for m in metrics {
        let _ = writeln!(
            out,
            "{}{:<32}{}",
            " ".repeat(indent),
            format!("{}:", m.label),
            m.value.bright_yellow()
        );
    }
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Items { items } if items.is_empty() => {
            let _ = writeln!(out, "    {}", "(none)".bright_black());
        }
        Block::Items { items } => {
            for item in items {
                write_item(out, item);
            }
        }
        Block::Table { columns, rows } => {
            let widths: Vec<usize> = (0..columns.len())
                .map(|i| {
                    rows.iter()
                        .filter_map(|r| r.get(i))
                        .chain(std::iter::once(&columns[i]))
                        .map(|c| c.chars().count())
                        .max()
                        .unwrap_or(0)
                })
                .collect();
            let line = |cells: &[String]| {
                cells
                    .iter()
                    .zip(&widths)
                    .map(|(c, w)| format!("{:<w$}", c, w = *w))
                    .collect::<Vec<_>>()
                    .join(" │ ")
            };
            let _ = writeln!(out, "    {}", line(columns.as_slice()).white().bold());
            for row in rows {
                let _ = writeln!(out, "    {}", line(row.as_slice()));
            }
        }
    }
}

fn write_item(out: &mut String, item: &Item) {
    let bullet = if item.highlight { "!".bright_red().to_string() } else { "•".bright_blue().to_string() };
    let badges: Vec<String> = item.badges.iter().map(|b| paint(&b.text, b.tone)).collect();
    let _ = writeln!(out, "    {} {} {}", bullet, item.title, badges.join(" "));
    for detail in &item.details {
        let _ = writeln!(out, "      {}", detail.bright_black());
    }
}

fn paint(text: &str, tone: Tone) -> String {
    let text = format!("[{}]", text);
    match tone {
        Tone::Primary => text.bright_blue().to_string(),
        Tone::Secondary => text.bright_black().to_string(),
        Tone::Success => text.bright_green().to_string(),
        Tone::Danger => text.bright_red().to_string(),
    }
}

pub fn format_report(report: &RedrawReport) -> String {
    let camera = match report.camera {
        CameraOutcome::Kept => "kept",
        CameraOutcome::Fitted => "fitted",
        CameraOutcome::DefaultView => "default view",
    };
    format!(
        "{} {} {} removed ({}), drawn ({}), skipped ({}), camera ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        format!("[{}]", report.view).bright_cyan(),
        report.removed.to_formatted_string(&Locale::en).white(),
        report.drawn.to_formatted_string(&Locale::en).bright_yellow(),
        if report.skipped > 0 {
            report.skipped.to_string().bright_red().to_string()
        } else {
            report.skipped.to_string().white().to_string()
        },
        camera.bright_magenta()
    )
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S%.3f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::{Badge, ErrorNotice, Section, Summary};

    #[test]
    fn test_error_panel_lists_remediation() {
        let content = PanelContent::Error(ErrorNotice {
            message: "No path found".into(),
            remediation: vec!["Try a different hospital".into()],
        });
        let text = format_panel(ViewKind::Emergency, &content);
        assert!(text.contains("No path found"));
        assert!(text.contains("Try a different hospital"));
    }

    #[test]
    fn test_summary_panel_renders_sections() {
        let content = PanelContent::Summary(Summary {
            title: "Optimized Road Network".into(),
            metrics: vec![Metric {
                label: "Total Distance".into(),
                value: "14.4 km".into(),
            }],
            sections: vec![
                Section {
                    heading: "New Roads Recommended".into(),
                    metrics: Vec::new(),
                    block: Block::Items {
                        items: vec![Item {
                            title: "Zamalek to Giza".into(),
                            details: Vec::new(),
                            badges: vec![Badge {
                                text: "7.5 km".into(),
                                tone: Tone::Primary,
                            }],
                            highlight: false,
                        }],
                    },
                },
                Section {
                    heading: "Bus Routes".into(),
                    metrics: Vec::new(),
                    block: Block::Table {
                        columns: vec!["Route".into(), "Buses".into()],
                        rows: vec![vec!["B1".into(), "12".into()]],
                    },
                },
            ],
        });
        let text = format_panel(ViewKind::Network, &content);
        assert!(text.contains("Total Distance:"));
        assert!(text.contains("Zamalek to Giza"));
        assert!(text.contains("7.5 km"));
        assert!(text.contains("B1"));
    }

    #[test]
    fn test_report_names_camera_outcome() {
        let text = format_report(&RedrawReport {
            view: ViewKind::Route,
            removed: 3,
            drawn: 1200,
            skipped: 0,
            camera: CameraOutcome::DefaultView,
        });
        assert!(text.contains("1,200"));
        assert!(text.contains("default view"));
    }
}
