use std::path::PathBuf;

use clap::Parser;
use scanreport_output::ReportFormat;

/// scanreport: consolidate nmap vulners / ssl-enum-ciphers XML into a report
#[derive(Parser, Debug)]
#[command(
    name = "scanreport",
    version,
    about = "Build vulnerability reports from nmap XML output"
)]
pub struct Args {
    /// Directory of nmap `-oX` files (every *.xml is read), or a single XML file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Write the report here instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report format: tex, html, md or json
    #[arg(
        short = 'f',
        long = "format",
        value_name = "FORMAT",
        env = "SCANREPORT_FORMAT",
        default_value = "tex"
    )]
    pub format: ReportFormat,

    /// File listing the scanned IPs, one per line
    #[arg(long = "ips", value_name = "FILE")]
    pub ips: Option<PathBuf>,

    /// Fail instead of reporting malformed script results as warnings
    #[arg(long = "strict")]
    pub strict: bool,

    /// Increase verbosity level (use -v or -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["scanreport", "scans/"]).unwrap();
        assert_eq!(args.input, PathBuf::from("scans/"));
        assert!(args.output.is_none());
        assert!(args.ips.is_none());
        assert!(!args.strict);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn all_flags() {
        let args = Args::try_parse_from([
            "scanreport",
            "scans/",
            "-o",
            "report.html",
            "-f",
            "html",
            "--ips",
            "ips.txt",
            "--strict",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.format, ReportFormat::Html);
        assert_eq!(args.output, Some(PathBuf::from("report.html")));
        assert_eq!(args.ips, Some(PathBuf::from("ips.txt")));
        assert!(args.strict);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Args::try_parse_from(["scanreport", "scans/", "-f", "pdf"]).is_err());
    }

    #[test]
    fn input_is_required() {
        assert!(Args::try_parse_from(["scanreport"]).is_err());
    }
}
