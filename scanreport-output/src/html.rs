use std::fmt::Write;

use scanreport_parse::{ServiceScan, View};

use crate::report::{Report, advisory_url, join_ports};
use crate::traits::{OutputError, ReportFormatter};

/// Self-contained HTML report with inline CSS and severity-colored findings.
pub struct HtmlFormatter;

impl ReportFormatter for HtmlFormatter {
    fn format(&self, report: &Report<'_>) -> Result<String, OutputError> {
        let mut out = String::with_capacity(32_768);
        write_html_report(&mut out, report)?;
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const STYLE: &str = "
body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; margin: 2rem auto; max-width: 960px; color: #222; }
h1 { border-bottom: 2px solid #444; padding-bottom: .3rem; }
h2 { margin-top: 2.5rem; }
pre { background: #f4f4f4; padding: .8rem; overflow-x: auto; }
table { border-collapse: collapse; width: 100%; margin: .5rem 0 1rem; }
th, td { border: 1px solid #ccc; padding: .35rem .6rem; text-align: left; }
th { background: #eee; }
.service { margin-bottom: 1.5rem; }
.locations { margin: .3rem 0; }
.warning { color: #8a4b00; }
";

// ---------------------------------------------------------------------------
// report builder
// ---------------------------------------------------------------------------

fn write_html_report(out: &mut String, report: &Report<'_>) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">")?;
    writeln!(out, "<title>Vulnerability Scan Report</title>")?;
    writeln!(out, "<style>{}</style>\n</head>\n<body>", STYLE)?;
    writeln!(out, "<h1>Vulnerability Scan Report</h1>")?;

    writeln!(out, "<h2>Summary</h2>")?;
    writeln!(
        out,
        "<p>A network vulnerability scan ran with the following Nmap command on {} UTC.</p>",
        html_escape(report.start_time())
    )?;
    writeln!(out, "<pre>{}</pre>", html_escape(report.command()))?;
    writeln!(
        out,
        "<p>{} vulnerable services, {} services without known vulnerabilities, {} TLS versions.</p>",
        report.vulnerable.len(),
        report.non_vulnerable.len(),
        report.tls.len()
    )?;

    if !report.vulnerable.is_empty() {
        writeln!(out, "<h2>Services with Vulnerabilities</h2>")?;
        write_vulnerable(out, &report.vulnerable)?;
    }

    if !report.non_vulnerable.is_empty() {
        writeln!(out, "<h2>Services With No Known Vulnerabilities</h2>")?;
        for (service, scan) in report.non_vulnerable.iter() {
            writeln!(out, "<div class=\"service\">\n<h3>{}</h3>", html_escape(service))?;
            write_locations(out, scan)?;
            writeln!(out, "</div>")?;
        }
    }

    if !report.tls.is_empty() {
        writeln!(out, "<h2>TLS Versions</h2>")?;
        for (version, tls) in report.tls.iter() {
            writeln!(out, "<h3>{}</h3>", html_escape(version))?;
            writeln!(
                out,
                "<table>\n<tr><th>Cipher</th><th>Key Exchange</th><th>Strength</th></tr>"
            )?;
            for cipher in &tls.ciphers {
                let class = cipher.strength_class();
                writeln!(
                    out,
                    "<tr style=\"background:#{}\"><td>{}</td><td>{}</td><td>{} ({})</td></tr>",
                    class.color(),
                    html_escape(&cipher.name),
                    html_escape(&cipher.key_exchange),
                    class,
                    html_escape(&cipher.strength)
                )?;
            }
            writeln!(out, "</table>")?;
        }
    }

    if !report.warnings.is_empty() {
        writeln!(out, "<h2>Warnings</h2>\n<ul>")?;
        for warning in report.warnings {
            writeln!(
                out,
                "<li class=\"warning\">{}</li>",
                html_escape(&warning.to_string())
            )?;
        }
        writeln!(out, "</ul>")?;
    }

    writeln!(out, "<h2>List of IPs Scanned</h2>")?;
    if report.scanned_ips.is_empty() {
        writeln!(out, "<p>No list of scanned IPs was provided.</p>")?;
    } else {
        writeln!(out, "<ul>")?;
        for ip in &report.scanned_ips {
            writeln!(out, "<li>{}</li>", html_escape(ip))?;
        }
        writeln!(out, "</ul>")?;
    }
    writeln!(out, "</body>\n</html>")
}

fn write_vulnerable(out: &mut String, services: &View<'_, ServiceScan>) -> std::fmt::Result {
    for (service, scan) in services.iter() {
        writeln!(out, "<div class=\"service\">\n<h3>{}</h3>", html_escape(service))?;
        writeln!(
            out,
            "<table>\n<tr><th>ID</th><th>Type</th><th>Severity</th><th>CVSS</th></tr>"
        )?;
        for vuln in &scan.findings {
            let class = vuln.severity_class();
            writeln!(
                out,
                "<tr style=\"background:#{}\"><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{:.1}</td></tr>",
                class.color(),
                html_escape(&advisory_url(vuln)),
                html_escape(&vuln.id),
                html_escape(&vuln.kind),
                class,
                vuln.severity
            )?;
        }
        writeln!(out, "</table>")?;
        writeln!(
            out,
            "<p>The above {} vulnerabilities apply to these network locations:</p>",
            scan.findings.len()
        )?;
        write_locations(out, scan)?;
        writeln!(out, "</div>")?;
    }
    Ok(())
}

fn write_locations(out: &mut String, scan: &ServiceScan) -> std::fmt::Result {
    writeln!(out, "<ul class=\"locations\">")?;
    for (ip, ports) in scan.locations.iter() {
        writeln!(
            out,
            "<li>{} Ports: {}</li>",
            html_escape(ip),
            html_escape(&join_ports(ports))
        )?;
    }
    writeln!(out, "</ul>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures;

    #[test]
    fn html_escape_special_chars() {
        assert_eq!(html_escape("a&b"), "a&amp;b");
        assert_eq!(html_escape("<tag>"), "&lt;tag&gt;");
        assert_eq!(html_escape("\"it's\""), "&quot;it&#39;s&quot;");
    }

    #[test]
    fn html_report_sections() {
        let parser = fixtures::parser();
        let report = Report::from_parser(&parser, vec!["10.0.0.5".into()]);
        let out = HtmlFormatter.format(&report).unwrap();

        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.trim_end().ends_with("</html>"));
        assert!(out.contains("<h3>nginx 1.18 </h3>"));
        assert!(out.contains("<a href=\"https://vulners.com/exploit/CVE-2021-1234\">CVE-2021-1234</a>"));
        assert!(out.contains("<td>High</td><td>7.5</td>"));
        assert!(out.contains("background:#FD6864"));
        assert!(out.contains("<li>10.0.0.5 Ports: 443</li>"));
        assert!(out.contains("TLS_RSA_WITH_AES_128_CBC_SHA"));
        assert!(out.contains("Good (A)"));
        assert!(out.contains("&lt;output-file&gt;"));
        assert!(out.contains("class=\"warning\""));
    }
}
