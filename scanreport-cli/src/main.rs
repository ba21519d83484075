mod args;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use args::Args;
use scanreport_output::{Report, ReportConfig, ReportManager, read_ip_list};
use scanreport_parse::ScanParser;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing based on verbosity
    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut parser = ScanParser::new();
    if args.input.is_dir() {
        let files = parser
            .parse_dir(&args.input)
            .context("failed to parse scan results")?;
        if files.is_empty() {
            bail!("no .xml scan files found in {}", args.input.display());
        }
        info!(files = files.len(), dir = %args.input.display(), "parsed scan directory");
    } else {
        parser
            .parse_file(&args.input)
            .context("failed to parse scan results")?;
    }

    let warnings = parser.warnings();
    if !warnings.is_empty() {
        if args.strict {
            bail!(
                "{} malformed script result(s), first: {}",
                warnings.len(),
                warnings[0]
            );
        }
        warn!(count = warnings.len(), "some script results were skipped");
    }

    let scanned_ips = match &args.ips {
        Some(path) => read_ip_list(path)?,
        None => Vec::new(),
    };

    let report = Report::from_parser(&parser, scanned_ips);
    info!(
        vulnerable = report.vulnerable.len(),
        non_vulnerable = report.non_vulnerable.len(),
        tls_versions = report.tls.len(),
        "building report"
    );

    ReportManager::new(ReportConfig {
        format: args.format,
        output: args.output.clone(),
    })
    .run(&report)
    .context("failed to write report")?;

    Ok(())
}
