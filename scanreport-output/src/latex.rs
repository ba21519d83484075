use std::fmt::Write;

use scanreport_parse::{ServiceScan, View};

use crate::report::{Report, advisory_url, join_ports};
use crate::traits::{OutputError, ReportFormatter};

/// LaTeX source for a PDF report. Compile with `pdflatex`; the header pulls in
/// `enumitem`, `xcolor`, `hyperref`, `fontawesome` and `listings`.
pub struct LatexFormatter;

/// Float barrier interval; too many pending figures overflow LaTeX's queue.
const FIGURES_PER_PAGE: usize = 10;

const HEADER: &str = r"\documentclass{article}
\usepackage{enumitem}
\usepackage[margin=1in]{geometry}
\usepackage[utf8]{inputenc}
\usepackage[table,xcdraw]{xcolor}
\usepackage{placeins}
\usepackage{hyperref}
\usepackage{fontawesome}
\usepackage{listings}
\lstset{
basicstyle=\small\ttfamily,
columns=flexible,
breaklines=true
}
\title{Vulnerability Scan Report\\}
\date{\today}

\begin{document}

\maketitle

\section*{Summary}

";

const SECTION_START: &str = r"\begin{enumerate}[wide, labelwidth=!, labelindent=0pt, label=\textbf{\large \arabic{enumi} \large}]";

impl ReportFormatter for LatexFormatter {
    fn format(&self, report: &Report<'_>) -> Result<String, OutputError> {
        let mut out = String::with_capacity(16_384);
        write_latex_report(&mut out, report)?;
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// escaping
// ---------------------------------------------------------------------------

/// Escape text for use in a LaTeX paragraph.
pub fn latex_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a URL for `\href`, which only chokes on `#` and `%`.
fn url_escape(s: &str) -> String {
    s.replace('%', r"\%").replace('#', r"\#")
}

// ---------------------------------------------------------------------------
// report builder
// ---------------------------------------------------------------------------

fn write_latex_report(out: &mut String, report: &Report<'_>) -> std::fmt::Result {
    out.push_str(HEADER);
    writeln!(
        out,
        "A network vulnerability scan ran with the following Nmap command on {} UTC.",
        latex_escape(report.start_time())
    )?;
    writeln!(out, r"\begin{{lstlisting}}")?;
    writeln!(out, "{}", report.command())?;
    writeln!(out, r"\end{{lstlisting}}")?;
    writeln!(out, "To find out what IPs were scanned see the end of this report.")?;

    if !report.vulnerable.is_empty() {
        writeln!(out, r"\section*{{Services with Vulnerabilities}}")?;
        writeln!(out, "{}", SECTION_START)?;
        write_vulnerable(out, &report.vulnerable)?;
        writeln!(out, r"\end{{enumerate}}")?;
    }

    if !report.non_vulnerable.is_empty() {
        writeln!(out, r"\section*{{Services With No Known Vulnerabilities}}")?;
        writeln!(out, "{}", SECTION_START)?;
        for (service, scan) in report.non_vulnerable.iter() {
            writeln!(out, r"\item \textbf{{\large {} \large}}", latex_escape(service))?;
            write_locations(out, scan)?;
        }
        writeln!(out, r"\end{{enumerate}}")?;
    }

    if !report.tls.is_empty() {
        writeln!(out, r"\section*{{TLS Versions}}")?;
        writeln!(out, "{}", SECTION_START)?;
        for (version, tls) in report.tls.iter() {
            writeln!(out, r"\item \textbf{{\large {} \large}}", latex_escape(version))?;
            for cipher in &tls.ciphers {
                let class = cipher.strength_class();
                writeln!(out, r"\begin{{figure}}[h!]")?;
                writeln!(
                    out,
                    r"\begin{{tabular}}{{|p{{16cm}}|}}\rowcolor[HTML]{{{}}} \begin{{tabular}}{{@{{}}p{{13cm}}>{{\raggedleft\arraybackslash}} p{{2.5cm}}@{{}}}}\textbf{{{}}} & {} ({})\end{{tabular}}\\",
                    class.color(),
                    latex_escape(&cipher.name),
                    class,
                    latex_escape(&cipher.strength),
                )?;
                writeln!(
                    out,
                    r" Key Exchange: {}\\ \hline \end{{tabular}}",
                    latex_escape(&cipher.key_exchange)
                )?;
                writeln!(out, r"\end{{figure}}")?;
                writeln!(out, r"\FloatBarrier")?;
            }
        }
        writeln!(out, r"\end{{enumerate}}")?;
    }

    if !report.warnings.is_empty() {
        writeln!(out, r"\section*{{Warnings}}")?;
        writeln!(out, "The following script results were malformed and left out of this report:")?;
        writeln!(out, r"\begin{{itemize}}")?;
        for warning in report.warnings {
            writeln!(out, r"\item {}", latex_escape(&warning.to_string()))?;
        }
        writeln!(out, r"\end{{itemize}}")?;
    }

    writeln!(out, r"\section*{{List of IPs Scanned}}")?;
    if report.scanned_ips.is_empty() {
        writeln!(out, "No list of scanned IPs was provided.")?;
    } else {
        writeln!(out, r"\begin{{itemize}}")?;
        for ip in &report.scanned_ips {
            writeln!(out, r"\item {}", latex_escape(ip))?;
        }
        writeln!(out, r"\end{{itemize}}")?;
    }
    write!(out, r"\end{{document}}")
}

fn write_vulnerable(out: &mut String, services: &View<'_, ServiceScan>) -> std::fmt::Result {
    for (service, scan) in services.iter() {
        writeln!(out, r"\item \textbf{{\large {} \large}}", latex_escape(service))?;

        for (i, vuln) in scan.findings.iter().enumerate() {
            let class = vuln.severity_class();
            writeln!(out, r"\begin{{figure}}[!htb]")?;
            writeln!(
                out,
                r"\begin{{tabular}}{{|p{{16cm}}|}}\rowcolor[HTML]{{{}}} \begin{{tabular}}{{@{{}}p{{15cm}}>{{\raggedleft\arraybackslash}} p{{0.5cm}}@{{}}}}\textbf{{{} {} ({:.1})}} & \href{{{}}}{{\large \faicon{{link}}}}\end{{tabular}}\\",
                class.color(),
                latex_escape(&vuln.id),
                class,
                vuln.severity,
                url_escape(&advisory_url(vuln)),
            )?;
            writeln!(out, r" Type: {}\\ \hline \end{{tabular}}", latex_escape(&vuln.kind))?;
            writeln!(out, r"\end{{figure}}")?;
            if (i + 1) % FIGURES_PER_PAGE == 0 {
                writeln!(out, r"\clearpage")?;
            }
        }

        writeln!(out, r"\FloatBarrier")?;
        writeln!(
            out,
            r"\textbf{{The above {} vulnerabilities apply to these network locations:}}",
            scan.findings.len()
        )?;
        write_locations(out, scan)?;
    }
    Ok(())
}

fn write_locations(out: &mut String, scan: &ServiceScan) -> std::fmt::Result {
    writeln!(out, r"\begin{{itemize}}")?;
    for (ip, ports) in scan.locations.iter() {
        writeln!(
            out,
            r"\item {} Ports: {}",
            latex_escape(ip),
            latex_escape(&join_ports(ports))
        )?;
    }
    writeln!(out, r"\end{{itemize}}")
}
