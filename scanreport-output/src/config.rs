use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// LaTeX source, ready for pdflatex.
    #[default]
    Latex,
    /// Self-contained HTML page with inline CSS.
    Html,
    Markdown,
    Json,
}

impl ReportFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Latex => "tex",
            Self::Html => "html",
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tex" | "tex-plus" | "latex" => Ok(Self::Latex),
            "html" => Ok(Self::Html),
            "md" | "markdown" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown report format '{other}' (expected tex, html, md or json)"
            )),
        }
    }
}

/// Where and how to write the report.
#[derive(Debug, Clone, Default)]
pub struct ReportConfig {
    pub format: ReportFormat,
    /// Destination file; stdout when `None`.
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_format_aliases() {
        assert_eq!("tex".parse::<ReportFormat>(), Ok(ReportFormat::Latex));
        assert_eq!("tex-plus".parse::<ReportFormat>(), Ok(ReportFormat::Latex));
        assert_eq!("HTML".parse::<ReportFormat>(), Ok(ReportFormat::Html));
        assert_eq!("markdown".parse::<ReportFormat>(), Ok(ReportFormat::Markdown));
        assert_eq!("json".parse::<ReportFormat>(), Ok(ReportFormat::Json));
    }

    #[test]
    fn parse_unknown_format() {
        let err = "pdf".parse::<ReportFormat>().unwrap_err();
        assert!(err.contains("pdf"));
    }

    #[test]
    fn extension_round_trips() {
        for format in [
            ReportFormat::Latex,
            ReportFormat::Html,
            ReportFormat::Markdown,
            ReportFormat::Json,
        ] {
            assert_eq!(format.extension().parse::<ReportFormat>(), Ok(format));
        }
    }

    #[test]
    fn default_is_latex_to_stdout() {
        let config = ReportConfig::default();
        assert_eq!(config.format, ReportFormat::Latex);
        assert!(config.output.is_none());
    }
}
