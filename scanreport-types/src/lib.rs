pub mod aggregate;
pub mod cipher;
pub mod vuln;

pub use aggregate::{Locations, ServiceScan, TlsScan};
pub use cipher::{Cipher, StrengthClass};
pub use vuln::{SeverityClass, Vulnerability};
