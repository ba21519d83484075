use std::fmt;

use serde::Serialize;

/// Which part of a script's table structure was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The `<script>` element has no `<table>` at all.
    ScriptWithoutTable,
    /// A `vulners` CPE table has no per-finding tables.
    CpeWithoutFindings,
    /// An `ssl-enum-ciphers` version table has no nested tables.
    TlsVersionWithoutTables,
    /// A `ciphers` table has no per-cipher tables.
    CiphersWithoutTables,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScriptWithoutTable => write!(f, "script has no result table"),
            Self::CpeWithoutFindings => write!(f, "cpe table has no findings"),
            Self::TlsVersionWithoutTables => write!(f, "tls version table has no nested tables"),
            Self::CiphersWithoutTables => write!(f, "cipher table has no entries"),
        }
    }
}

/// A script result that did not have the expected shape and was skipped.
///
/// Carries enough context for an operator to find the spot in the original
/// XML by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanWarning {
    pub kind: WarningKind,
    /// Script id (`vulners`, `ssl-enum-ciphers`).
    pub script: String,
    /// The script's `output` attribute, or the offending table's `key`.
    pub detail: String,
    pub ip: String,
    pub port: String,
    pub service: String,
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in script {} ({}) at location: {} port: {} app: {}",
            self.kind,
            self.script,
            self.detail.trim(),
            self.ip,
            self.port,
            self.service.trim_end()
        )
    }
}
