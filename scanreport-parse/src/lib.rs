//! nmap XML ingestion and aggregation of `vulners` and `ssl-enum-ciphers`
//! script results into per-service and per-TLS-version views.

pub mod error;
pub mod identity;
pub mod metadata;
pub mod parser;
pub mod view;
pub mod warning;
pub mod xml;

pub use error::ParseError;
pub use identity::service_identity;
pub use metadata::{ScanMetadata, sanitize_command};
pub use parser::ScanParser;
pub use view::View;
pub use warning::{ScanWarning, WarningKind};
pub use xml::{XmlElement, parse_document};

pub use scanreport_types::{
    Cipher, Locations, ServiceScan, SeverityClass, StrengthClass, TlsScan, Vulnerability,
};
