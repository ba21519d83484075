use crate::report::Report;
use crate::traits::{OutputError, ReportFormatter};

/// Formats the report as pretty-printed JSON.
///
/// Views serialize as objects whose key order follows the report order.
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &Report<'_>) -> Result<String, OutputError> {
        serde_json::to_string_pretty(report)
            .map_err(|e| OutputError::FormatError(format!("JSON serialization error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures;

    #[test]
    fn json_structure() {
        let parser = fixtures::parser();
        let report = Report::from_parser(&parser, vec!["10.0.0.5".into()]);
        let output = JsonFormatter.format(&report).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        let nginx = &parsed["vulnerable"]["nginx 1.18 "];
        assert_eq!(nginx["locations"]["10.0.0.5"][0], "443");
        assert_eq!(nginx["findings"][0]["id"], "CVE-2021-1234");
        assert_eq!(nginx["findings"][0]["kind"], "exploit");
        assert_eq!(nginx["findings"][0]["severity"], 7.5);

        assert!(parsed["non_vulnerable"]["OpenSSH 8.9p1 "].is_object());
        assert_eq!(
            parsed["tls"]["TLSv1.0"]["ciphers"][0]["key_exchange"],
            "rsa 2048"
        );
        assert_eq!(parsed["warnings"][0]["kind"], "script_without_table");
        assert_eq!(parsed["scanned_ips"][0], "10.0.0.5");
        assert_eq!(
            parsed["metadata"]["command"],
            "nmap -sV -oX <output-file> --script vulners"
        );
    }

    #[test]
    fn json_empty_report() {
        let parser = scanreport_parse::ScanParser::new();
        let report = Report::from_parser(&parser, vec![]);
        let output = JsonFormatter.format(&report).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed["vulnerable"].as_object().unwrap().is_empty());
        assert!(parsed["metadata"]["command"].is_null());
    }
}
