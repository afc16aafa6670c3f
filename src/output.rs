use crate::engine::ProgressSnapshot;
use crate::types::RunReport;
use colored::*;
use std::io;

pub struct TerminalRenderer {
    use_color: bool,
}

impl TerminalRenderer {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Printed once before the first progress sweep.
    pub fn render_partial_header(&self, n: usize) {
        println!(
            "{}",
            self.colorize(&format!("Partial Results for Top-{} ->", n), "cyan", false)
        );
    }

    /// One line per merge sweep, labeled approximate by the "about".
    pub fn render_progress(&self, snapshot: &ProgressSnapshot) {
        println!(
            "Top {} results after about {} lines {}",
            snapshot.n,
            snapshot.lines_read,
            format_values(&snapshot.values)
        );
    }

    pub fn render(&self, report: &RunReport) {
        println!(
            "{} {}",
            self.colorize(&format!("Top-{} ->", report.n), "green", true),
            format_values(&report.values)
        );
        println!(
            "Processed {} lines ({} skipped) from {} source(s)",
            report.totals.lines_read,
            report.totals.skipped_lines,
            report.sources.len()
        );

        if !report.warnings.is_empty() {
            println!();
            println!(
                "{}",
                self.colorize(
                    &format!("Warnings ({}):", report.warnings.len()),
                    "yellow",
                    true
                )
            );
            for warning in &report.warnings {
                println!(
                    "  {} {}: {}",
                    self.colorize("!", "yellow", false),
                    warning.source,
                    warning.error
                );
            }
        }
    }

    fn colorize(&self, text: &str, color: &str, bold: bool) -> String {
        if !self.use_color {
            return text.to_string();
        }

        let colored = match color {
            "red" => text.red(),
            "green" => text.green(),
            "yellow" => text.yellow(),
            "cyan" => text.cyan(),
            _ => text.normal(),
        };

        if bold {
            colored.bold().to_string()
        } else {
            colored.to_string()
        }
    }
}

pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        report: &RunReport,
        output_file: Option<&std::path::Path>,
    ) -> io::Result<()> {
        let json = serde_json::to_string_pretty(report)?;

        if let Some(path) = output_file {
            std::fs::write(path, json)?;
        } else {
            println!("{}", json);
        }

        Ok(())
    }
}

fn format_values(values: &[i64]) -> String {
    let joined = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_values() {
        assert_eq!(format_values(&[]), "[]");
        assert_eq!(format_values(&[42]), "[42]");
        assert_eq!(format_values(&[5, 8, 9]), "[5, 8, 9]");
        assert_eq!(format_values(&[-1, 0, 1]), "[-1, 0, 1]");
    }

    #[test]
    fn test_colorize_disabled_passes_through() {
        let renderer = TerminalRenderer::new(false);
        assert_eq!(renderer.colorize("Top-3 ->", "green", true), "Top-3 ->");
    }
}
