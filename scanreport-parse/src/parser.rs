// ---------------------------------------------------------------------------
// Scan-document parser
// ---------------------------------------------------------------------------
//
// Walks nmap XML (host -> ports -> port -> service/script) and accumulates
// per-service locations and findings plus per-TLS-version cipher suites. One
// `ScanParser` is a session: every document of a batch is fed into the same
// instance so that services merge across files.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use scanreport_types::{Cipher, ServiceScan, TlsScan, Vulnerability};
use tracing::{debug, info, warn};

use crate::error::ParseError;
use crate::identity::service_identity;
use crate::metadata::ScanMetadata;
use crate::view::View;
use crate::warning::{ScanWarning, WarningKind};
use crate::xml::{XmlElement, parse_document};

const VULNERS_SCRIPT: &str = "vulners";
const TLS_SCRIPT: &str = "ssl-enum-ciphers";

/// Accumulates services and TLS versions across all parsed documents.
#[derive(Debug, Clone, Default)]
pub struct ScanParser {
    services: HashMap<String, ServiceScan>,
    /// Service identities in first-seen order.
    service_order: Vec<String>,
    tls_versions: HashMap<String, TlsScan>,
    /// TLS versions in first-seen order; may repeat.
    observed_tls_versions: Vec<String>,
    /// Identities that carried a `vulners` result, in first-seen order.
    vulnerable_services: Vec<String>,
    metadata: ScanMetadata,
    warnings: Vec<ScanWarning>,
    documents: usize,
}

/// Where a script result came from, for warnings.
struct PortContext<'a> {
    ip: &'a str,
    port: &'a str,
    service: &'a str,
}

impl PortContext<'_> {
    fn warning(&self, kind: WarningKind, script: &str, detail: Option<&str>) -> ScanWarning {
        let detail = detail.unwrap_or_default();
        warn!(
            ip = self.ip,
            port = self.port,
            service = self.service,
            script,
            output = detail,
            "{kind}, skipping"
        );
        ScanWarning {
            kind,
            script: script.to_string(),
            detail: detail.to_string(),
            ip: self.ip.to_string(),
            port: self.port.to_string(),
            service: self.service.to_string(),
        }
    }
}

impl ScanParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one ingested document into this session.
    ///
    /// Returns the structural warnings raised by this document; they are also
    /// kept in [`ScanParser::warnings`]. A document without hosts is a no-op.
    ///
    /// A document either applies completely or not at all: on `Err` the
    /// session is left exactly as it was before the call.
    pub fn parse(&mut self, root: &XmlElement) -> Result<Vec<ScanWarning>, ParseError> {
        if root.name != "nmaprun" {
            return Err(ParseError::MissingRoot);
        }

        let checkpoint = self.clone();
        match self.apply_document(root) {
            Ok(warnings) => Ok(warnings),
            Err(err) => {
                *self = checkpoint;
                Err(err)
            }
        }
    }

    fn apply_document(&mut self, root: &XmlElement) -> Result<Vec<ScanWarning>, ParseError> {
        self.metadata.update_from(root);

        let mut warnings = Vec::new();
        let mut hosts = 0usize;
        for host in root.children("host") {
            self.parse_host(host, &mut warnings)?;
            hosts += 1;
        }

        self.documents += 1;
        self.warnings.extend(warnings.iter().cloned());
        info!(
            hosts,
            services = self.services.len(),
            tls_versions = self.tls_versions.len(),
            warnings = warnings.len(),
            "parsed scan document"
        );
        Ok(warnings)
    }

    /// Ingest raw nmap XML text and parse it.
    pub fn parse_str(&mut self, xml: &str) -> Result<Vec<ScanWarning>, ParseError> {
        let root = parse_document(xml)?;
        self.parse(&root)
    }

    pub fn parse_file(&mut self, path: &Path) -> Result<Vec<ScanWarning>, ParseError> {
        let contents = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "reading scan file");
        self.parse_str(&contents).map_err(|e| e.in_file(path))
    }

    /// Parse every `*.xml` file in `dir`, in file-name order.
    ///
    /// Returns the files parsed. Stops at the first fatal error.
    pub fn parse_dir(&mut self, dir: &Path) -> Result<Vec<PathBuf>, ParseError> {
        let io_err = |source: std::io::Error| ParseError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "xml") {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            warn!(dir = %dir.display(), "no .xml scan files found");
        }
        for file in &files {
            self.parse_file(file)?;
        }
        Ok(files)
    }

    fn parse_host(
        &mut self,
        host: &XmlElement,
        warnings: &mut Vec<ScanWarning>,
    ) -> Result<(), ParseError> {
        let Some(ip) = host_ip(host) else {
            debug!("host has no ip address, skipping");
            return Ok(());
        };

        let state = host.child("status").and_then(|s| s.attr("state"));
        if state != Some("up") {
            debug!(ip, state = state.unwrap_or("unknown"), "host not up, skipping");
            return Ok(());
        }

        let Some(ports) = host.child("ports").filter(|p| p.has_child("port")) else {
            debug!(ip, "host has no ports");
            return Ok(());
        };

        for port in ports.children("port") {
            self.parse_port(ip, port, warnings)?;
        }
        Ok(())
    }

    fn parse_port(
        &mut self,
        ip: &str,
        port: &XmlElement,
        warnings: &mut Vec<ScanWarning>,
    ) -> Result<(), ParseError> {
        if port.child("state").and_then(|s| s.attr("state")) == Some("closed") {
            return Ok(());
        }

        let identity = service_identity(port.child("service"));
        let port_id = port.attr("portid").unwrap_or_default();

        let first_seen = !self.services.contains_key(&identity);
        if first_seen {
            self.service_order.push(identity.clone());
        }
        self.services
            .entry(identity.clone())
            .or_default()
            .locations
            .push(ip, port_id);

        // Findings belong to the service version, so only its first port is read.
        if !first_seen {
            debug!(ip, port = port_id, service = %identity, "service already seen");
            return Ok(());
        }

        let ctx = PortContext {
            ip,
            port: port_id,
            service: &identity,
        };
        for script in port.children("script") {
            match script.attr("id") {
                Some(VULNERS_SCRIPT) => self.parse_vulners(&ctx, script, warnings)?,
                Some(TLS_SCRIPT) => self.parse_tls_script(&ctx, script, warnings),
                _ => {}
            }
        }
        Ok(())
    }

    fn parse_vulners(
        &mut self,
        ctx: &PortContext<'_>,
        script: &XmlElement,
        warnings: &mut Vec<ScanWarning>,
    ) -> Result<(), ParseError> {
        if !script.has_child("table") {
            warnings.push(ctx.warning(
                WarningKind::ScriptWithoutTable,
                VULNERS_SCRIPT,
                script.attr("output"),
            ));
            return Ok(());
        }

        let mut findings = Vec::new();
        for cpe in script.children("table") {
            if !cpe.has_child("table") {
                warnings.push(ctx.warning(
                    WarningKind::CpeWithoutFindings,
                    VULNERS_SCRIPT,
                    cpe.attr("key"),
                ));
                continue;
            }
            for finding in cpe.children("table") {
                findings.push(parse_finding(finding)?);
            }
        }

        debug!(service = ctx.service, count = findings.len(), "vulners findings");
        if !self.vulnerable_services.iter().any(|s| s == ctx.service) {
            self.vulnerable_services.push(ctx.service.to_string());
        }
        self.services
            .entry(ctx.service.to_string())
            .or_default()
            .findings
            .extend(findings);
        Ok(())
    }

    fn parse_tls_script(
        &mut self,
        ctx: &PortContext<'_>,
        script: &XmlElement,
        warnings: &mut Vec<ScanWarning>,
    ) {
        if !script.has_child("table") {
            warnings.push(ctx.warning(
                WarningKind::ScriptWithoutTable,
                TLS_SCRIPT,
                script.attr("output"),
            ));
            return;
        }
        for version in script.children("table") {
            self.parse_tls_version(ctx, version, warnings);
        }
    }

    fn parse_tls_version(
        &mut self,
        ctx: &PortContext<'_>,
        table: &XmlElement,
        warnings: &mut Vec<ScanWarning>,
    ) {
        if !table.has_child("table") {
            warnings.push(ctx.warning(
                WarningKind::TlsVersionWithoutTables,
                TLS_SCRIPT,
                table.attr("key"),
            ));
            return;
        }

        let version = table.attr("key").unwrap_or_default().to_string();
        self.observed_tls_versions.push(version.clone());
        let scan = self.tls_versions.entry(version).or_default();

        for ciphers in table
            .children("table")
            .filter(|t| t.attr("key") == Some("ciphers"))
        {
            if !ciphers.has_child("table") {
                warnings.push(ctx.warning(
                    WarningKind::CiphersWithoutTables,
                    TLS_SCRIPT,
                    ciphers.attr("key"),
                ));
                continue;
            }
            for entry in ciphers.children("table") {
                scan.ciphers.push(Cipher::new(
                    entry.elem_text("name").unwrap_or_default(),
                    entry.elem_text("kex_info").unwrap_or_default(),
                    entry.elem_text("strength").unwrap_or_default(),
                ));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Aggregation views
    // -----------------------------------------------------------------------

    /// Every service, in first-seen order.
    pub fn services(&self) -> View<'_, ServiceScan> {
        View::new(
            self.service_order
                .iter()
                .filter_map(|k| self.services.get(k).map(|s| (k.as_str(), s)))
                .collect(),
        )
    }

    /// Services that carried a `vulners` result, in first-seen service order.
    pub fn vulnerable_view(&self) -> View<'_, ServiceScan> {
        let vulnerable: HashSet<&str> =
            self.vulnerable_services.iter().map(String::as_str).collect();
        self.services_where(|k| vulnerable.contains(k))
    }

    /// Every service not in [`ScanParser::vulnerable_view`].
    pub fn non_vulnerable_view(&self) -> View<'_, ServiceScan> {
        let vulnerable: HashSet<&str> =
            self.vulnerable_services.iter().map(String::as_str).collect();
        self.services_where(|k| !vulnerable.contains(k))
    }

    /// TLS versions in first-observed order, each listed once.
    pub fn tls_view(&self) -> View<'_, TlsScan> {
        let mut seen = HashSet::new();
        View::new(
            self.observed_tls_versions
                .iter()
                .filter(|v| seen.insert(v.as_str()))
                .filter_map(|v| self.tls_versions.get(v).map(|t| (v.as_str(), t)))
                .collect(),
        )
    }

    fn services_where(&self, keep: impl Fn(&str) -> bool) -> View<'_, ServiceScan> {
        View::new(
            self.service_order
                .iter()
                .filter(|k| keep(k.as_str()))
                .filter_map(|k| self.services.get(k).map(|s| (k.as_str(), s)))
                .collect(),
        )
    }

    pub fn service(&self, identity: &str) -> Option<&ServiceScan> {
        self.services.get(identity)
    }

    pub fn vulnerable_services(&self) -> &[String] {
        &self.vulnerable_services
    }

    pub fn observed_tls_versions(&self) -> &[String] {
        &self.observed_tls_versions
    }

    pub fn metadata(&self) -> &ScanMetadata {
        &self.metadata
    }

    /// Structural warnings from every document parsed so far.
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    pub fn documents_parsed(&self) -> usize {
        self.documents
    }
}

/// The last IP-type address of a host. Hosts with only MAC addresses have none.
fn host_ip(host: &XmlElement) -> Option<&str> {
    host.children("address")
        .filter(|a| a.attr("addrtype").is_some_and(|t| t.contains("ip")))
        .filter_map(|a| a.attr("addr"))
        .filter(|addr| !addr.is_empty())
        .last()
}

fn parse_finding(table: &XmlElement) -> Result<Vulnerability, ParseError> {
    let id = table.elem_text("id").unwrap_or_default();
    let kind = table.elem_text("type").unwrap_or_default();
    let raw = table.elem_text("cvss");

    let severity = raw
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|s| s.is_finite())
        .ok_or_else(|| ParseError::InvalidSeverity {
            id: id.to_string(),
            value: raw.map(str::to_string),
        })?;

    Ok(Vulnerability::new(id, kind, severity))
}
