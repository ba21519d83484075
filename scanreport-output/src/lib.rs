//! Report formatters for aggregated nmap scan results.

pub mod config;
pub mod html;
pub mod json;
pub mod latex;
pub mod manager;
pub mod markdown;
pub mod report;
pub mod traits;

pub use config::{ReportConfig, ReportFormat};
pub use manager::{ReportManager, formatter_for};
pub use report::{Report, advisory_url, read_ip_list};
pub use traits::{OutputError, ReportFormatter};
