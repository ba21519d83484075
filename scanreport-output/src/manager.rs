use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::config::{ReportConfig, ReportFormat};
use crate::html::HtmlFormatter;
use crate::json::JsonFormatter;
use crate::latex::LatexFormatter;
use crate::markdown::MarkdownFormatter;
use crate::report::Report;
use crate::traits::{OutputError, ReportFormatter};

fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    for component in path.components() {
        if matches!(component, std::path::Component::ParentDir) {
            return Err(OutputError::FormatError(format!(
                "output path '{}' must not contain '..' components",
                path.display()
            )));
        }
    }
    Ok(())
}

/// Renders a report and writes it to the configured destination.
pub struct ReportManager {
    config: ReportConfig,
}

impl ReportManager {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Render the report in the configured format.
    pub fn render(&self, report: &Report<'_>) -> Result<String, OutputError> {
        formatter_for(self.config.format).format(report)
    }

    /// Render and write to the output file, or stdout when none is configured.
    pub fn run(&self, report: &Report<'_>) -> Result<(), OutputError> {
        let output = self.render(report)?;

        match &self.config.output {
            Some(path) => {
                validate_output_path(path)?;
                fs::write(path, &output).map_err(|e| {
                    OutputError::Io(std::io::Error::new(
                        e.kind(),
                        format!("failed to write {}: {}", path.display(), e),
                    ))
                })?;
                info!(
                    path = %path.display(),
                    format = %self.config.format,
                    bytes = output.len(),
                    "wrote report"
                );
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(output.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

/// Get the formatter for a report format.
pub fn formatter_for(format: ReportFormat) -> Box<dyn ReportFormatter> {
    match format {
        ReportFormat::Latex => Box::new(LatexFormatter),
        ReportFormat::Html => Box::new(HtmlFormatter),
        ReportFormat::Markdown => Box::new(MarkdownFormatter),
        ReportFormat::Json => Box::new(JsonFormatter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures;
    use std::path::PathBuf;

    #[test]
    fn manager_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.tex");
        let parser = fixtures::parser();
        let report = Report::from_parser(&parser, vec![]);

        let manager = ReportManager::new(ReportConfig {
            format: ReportFormat::Latex,
            output: Some(path.clone()),
        });
        manager.run(&report).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(r"\documentclass{article}"));
    }

    #[test]
    fn manager_renders_each_format() {
        let parser = fixtures::parser();
        let report = Report::from_parser(&parser, vec![]);
        for (format, marker) in [
            (ReportFormat::Latex, r"\begin{document}"),
            (ReportFormat::Html, "<!DOCTYPE html>"),
            (ReportFormat::Markdown, "# Vulnerability Scan Report"),
            (ReportFormat::Json, "\"vulnerable\""),
        ] {
            let manager = ReportManager::new(ReportConfig {
                format,
                output: None,
            });
            let out = manager.render(&report).unwrap();
            assert!(out.contains(marker), "{format}: missing {marker}");
        }
    }

    #[test]
    fn manager_rejects_parent_dir() {
        let parser = fixtures::parser();
        let report = Report::from_parser(&parser, vec![]);
        let manager = ReportManager::new(ReportConfig {
            format: ReportFormat::Json,
            output: Some(PathBuf::from("../escape.json")),
        });
        let err = manager.run(&report).unwrap_err();
        assert!(err.to_string().contains(".."));
    }

    #[test]
    fn manager_write_error_names_path() {
        let parser = fixtures::parser();
        let report = Report::from_parser(&parser, vec![]);
        let manager = ReportManager::new(ReportConfig {
            format: ReportFormat::Markdown,
            output: Some(PathBuf::from("/nonexistent/dir/report.md")),
        });
        let err = manager.run(&report).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dir/report.md"));
    }
}
