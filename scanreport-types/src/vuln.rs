// ---------------------------------------------------------------------------
// Vulnerability findings
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single finding reported by the `vulners` script for a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    /// Advisory identifier (e.g., "CVE-2021-23017", "SSV:92579").
    pub id: String,
    /// Classification supplied by the scanner (e.g., "cve", "exploitdb").
    pub kind: String,
    /// CVSS score as reported, 0.0-10.0.
    pub severity: f64,
}

impl Vulnerability {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, severity: f64) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            severity,
        }
    }

    pub fn severity_class(&self) -> SeverityClass {
        SeverityClass::from_score(self.severity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeverityClass {
    Low,
    Medium,
    High,
}

impl SeverityClass {
    pub fn from_score(score: f64) -> Self {
        if score < 4.0 {
            Self::Low
        } else if score < 7.0 {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Background color used by the LaTeX and HTML reports (RGB hex, no `#`).
    pub fn color(self) -> &'static str {
        match self {
            Self::High => "FD6864",
            Self::Medium => "F8A102",
            Self::Low => "34CDF9",
        }
    }
}

impl fmt::Display for SeverityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_thresholds() {
        assert_eq!(SeverityClass::from_score(0.0), SeverityClass::Low);
        assert_eq!(SeverityClass::from_score(3.9), SeverityClass::Low);
        assert_eq!(SeverityClass::from_score(4.0), SeverityClass::Medium);
        assert_eq!(SeverityClass::from_score(6.9), SeverityClass::Medium);
        assert_eq!(SeverityClass::from_score(7.0), SeverityClass::High);
        assert_eq!(SeverityClass::from_score(10.0), SeverityClass::High);
    }

    #[test]
    fn severity_is_monotonic() {
        let mut scores = vec![f64::MIN, -100.0, -0.1];
        scores.extend((0..=100).map(|i| i as f64 / 10.0));
        scores.extend([10.1, 42.0, 1e9, f64::MAX, f64::INFINITY]);
        for pair in scores.windows(2) {
            assert!(
                SeverityClass::from_score(pair[1]) >= SeverityClass::from_score(pair[0]),
                "{} -> {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn out_of_range_scores() {
        assert_eq!(SeverityClass::from_score(-1.0), SeverityClass::Low);
        assert_eq!(SeverityClass::from_score(f64::NEG_INFINITY), SeverityClass::Low);
        assert_eq!(SeverityClass::from_score(11.0), SeverityClass::High);
        assert_eq!(SeverityClass::from_score(f64::INFINITY), SeverityClass::High);
    }

    #[test]
    fn vulnerability_class() {
        let vuln = Vulnerability::new("CVE-2021-1234", "exploit", 7.5);
        assert_eq!(vuln.severity_class(), SeverityClass::High);
        assert_eq!(vuln.severity_class().to_string(), "High");
    }

    #[test]
    fn severity_colors_distinct() {
        assert_ne!(SeverityClass::High.color(), SeverityClass::Medium.color());
        assert_ne!(SeverityClass::Medium.color(), SeverityClass::Low.color());
    }
}
