use std::fs;
use std::path::Path;

use scanreport_parse::{ScanMetadata, ScanParser, ScanWarning, ServiceScan, TlsScan, View, Vulnerability};
use serde::Serialize;

use crate::traits::OutputError;

/// Everything a formatter needs, borrowed from a finished parse session.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub metadata: &'a ScanMetadata,
    pub vulnerable: View<'a, ServiceScan>,
    pub non_vulnerable: View<'a, ServiceScan>,
    pub tls: View<'a, TlsScan>,
    pub warnings: &'a [ScanWarning],
    /// Addresses that were targeted, one per line of the operator's IP list.
    pub scanned_ips: Vec<String>,
}

impl<'a> Report<'a> {
    pub fn from_parser(parser: &'a ScanParser, scanned_ips: Vec<String>) -> Self {
        Self {
            metadata: parser.metadata(),
            vulnerable: parser.vulnerable_view(),
            non_vulnerable: parser.non_vulnerable_view(),
            tls: parser.tls_view(),
            warnings: parser.warnings(),
            scanned_ips,
        }
    }

    pub fn command(&self) -> &str {
        self.metadata.command.as_deref().unwrap_or("unknown")
    }

    pub fn start_time(&self) -> &str {
        self.metadata.start_time.as_deref().unwrap_or("an unknown date")
    }
}

/// Read a list of scanned addresses, one per line. Blank lines are dropped.
pub fn read_ip_list(path: &Path) -> Result<Vec<String>, OutputError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        OutputError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read {}: {}", path.display(), e),
        ))
    })?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Public advisory page for a finding.
pub fn advisory_url(vuln: &Vulnerability) -> String {
    if vuln.kind.is_empty() {
        format!("https://vulners.com/search?query={}", vuln.id)
    } else {
        format!("https://vulners.com/{}/{}", vuln.kind, vuln.id)
    }
}

pub(crate) fn join_ports(ports: &[String]) -> String {
    ports.join(", ")
}

#[cfg(test)]
pub(crate) mod fixtures {
    use scanreport_parse::ScanParser;

    pub const SCAN: &str = r#"<nmaprun args="nmap -sV -oX out.xml --script vulners 10.0.0.0/24" startstr="Tue Nov 14 22:13:20 2023">
      <host><status state="up"/><address addr="10.0.0.5" addrtype="ipv4"/><ports>
        <port portid="443"><state state="open"/><service name="https" product="nginx" version="1.18"/>
          <script id="vulners" output="">
            <table key="cpe:/a:nginx:nginx:1.18">
              <table><elem key="cvss">7.5</elem><elem key="id">CVE-2021-1234</elem><elem key="type">exploit</elem></table>
              <table><elem key="cvss">4.3</elem><elem key="id">CVE_2020#99</elem><elem key="type">cve</elem></table>
            </table>
          </script>
          <script id="ssl-enum-ciphers" output="">
            <table key="TLSv1.0"><table key="ciphers">
              <table><elem key="name">TLS_RSA_WITH_AES_128_CBC_SHA</elem><elem key="kex_info">rsa 2048</elem><elem key="strength">A</elem></table>
            </table></table>
          </script>
        </port>
        <port portid="22"><state state="open"/><service name="ssh" product="OpenSSH" version="8.9p1"/></port>
        <port portid="80"><state state="open"/><service name="http"/>
          <script id="vulners" output="ERROR: Script execution failed"/></port>
      </ports></host>
    </nmaprun>"#;

    pub fn parser() -> ScanParser {
        let mut parser = ScanParser::new();
        parser.parse_str(SCAN).unwrap();
        parser
    }
}
