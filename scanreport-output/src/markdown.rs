use std::fmt::Write;

use crate::report::{Report, advisory_url, join_ports};
use crate::traits::{OutputError, ReportFormatter};

/// GitHub-flavored Markdown report.
pub struct MarkdownFormatter;

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, report: &Report<'_>) -> Result<String, OutputError> {
        let mut out = String::with_capacity(8_192);
        write_markdown_report(&mut out, report)?;
        Ok(out)
    }
}

/// Escape characters that would break a table cell or inline formatting.
fn md_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '|' | '*' | '_' | '`' | '[' | ']' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn write_markdown_report(out: &mut String, report: &Report<'_>) -> std::fmt::Result {
    writeln!(out, "# Vulnerability Scan Report\n")?;
    writeln!(out, "## Summary\n")?;
    writeln!(
        out,
        "A network vulnerability scan ran with the following Nmap command on {} UTC.\n",
        md_escape(report.start_time())
    )?;
    writeln!(out, "```\n{}\n```\n", report.command())?;

    if !report.vulnerable.is_empty() {
        writeln!(out, "## Services with Vulnerabilities\n")?;
        for (i, (service, scan)) in report.vulnerable.iter().enumerate() {
            writeln!(out, "### {}. {}\n", i + 1, md_escape(service.trim_end()))?;
            writeln!(out, "| ID | Type | Severity | CVSS |")?;
            writeln!(out, "|----|------|----------|------|")?;
            for vuln in &scan.findings {
                writeln!(
                    out,
                    "| [{}]({}) | {} | {} | {:.1} |",
                    md_escape(&vuln.id),
                    advisory_url(vuln),
                    md_escape(&vuln.kind),
                    vuln.severity_class(),
                    vuln.severity
                )?;
            }
            writeln!(
                out,
                "\nThe above {} vulnerabilities apply to these network locations:\n",
                scan.findings.len()
            )?;
            for (ip, ports) in scan.locations.iter() {
                writeln!(out, "- {} Ports: {}", md_escape(ip), join_ports(ports))?;
            }
            writeln!(out)?;
        }
    }

    if !report.non_vulnerable.is_empty() {
        writeln!(out, "## Services With No Known Vulnerabilities\n")?;
        for (i, (service, scan)) in report.non_vulnerable.iter().enumerate() {
            writeln!(out, "### {}. {}\n", i + 1, md_escape(service.trim_end()))?;
            for (ip, ports) in scan.locations.iter() {
                writeln!(out, "- {} Ports: {}", md_escape(ip), join_ports(ports))?;
            }
            writeln!(out)?;
        }
    }

    if !report.tls.is_empty() {
        writeln!(out, "## TLS Versions\n")?;
        for (version, tls) in report.tls.iter() {
            writeln!(out, "### {}\n", md_escape(version))?;
            writeln!(out, "| Cipher | Key Exchange | Strength |")?;
            writeln!(out, "|--------|--------------|----------|")?;
            for cipher in &tls.ciphers {
                writeln!(
                    out,
                    "| {} | {} | {} ({}) |",
                    md_escape(&cipher.name),
                    md_escape(&cipher.key_exchange),
                    cipher.strength_class(),
                    md_escape(&cipher.strength)
                )?;
            }
            writeln!(out)?;
        }
    }

    if !report.warnings.is_empty() {
        writeln!(out, "## Warnings\n")?;
        for warning in report.warnings {
            writeln!(out, "- {}", md_escape(&warning.to_string()))?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## List of IPs Scanned\n")?;
    if report.scanned_ips.is_empty() {
        writeln!(out, "No list of scanned IPs was provided.")?;
    }
    for ip in &report.scanned_ips {
        writeln!(out, "- {}", md_escape(ip))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures;

    #[test]
    fn escape_table_breakers() {
        assert_eq!(md_escape("a|b"), r"a\|b");
        assert_eq!(md_escape("TLS_AES"), r"TLS\_AES");
        assert_eq!(md_escape("plain text"), "plain text");
    }

    #[test]
    fn markdown_report_sections() {
        let parser = fixtures::parser();
        let report = Report::from_parser(&parser, vec!["10.0.0.5".into()]);
        let out = MarkdownFormatter.format(&report).unwrap();

        assert!(out.starts_with("# Vulnerability Scan Report"));
        assert!(out.contains("### 1. nginx 1.18\n"));
        assert!(out.contains(
            "| [CVE-2021-1234](https://vulners.com/exploit/CVE-2021-1234) | exploit | High | 7.5 |"
        ));
        assert!(out.contains("- 10.0.0.5 Ports: 443"));
        assert!(out.contains("## Services With No Known Vulnerabilities"));
        assert!(out.contains("| TLS\\_RSA\\_WITH\\_AES\\_128\\_CBC\\_SHA | rsa 2048 | Good (A) |"));
        assert!(out.contains("## Warnings"));
        assert!(out.trim_end().ends_with("- 10.0.0.5"));
    }
}
