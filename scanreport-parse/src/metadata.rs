use serde::Serialize;

use crate::xml::XmlElement;

/// Run information taken from the `<nmaprun>` root of the most recent document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanMetadata {
    /// The nmap command line, with the target and output path masked.
    pub command: Option<String>,
    /// Human-readable start time (`startstr`).
    pub start_time: Option<String>,
}

impl ScanMetadata {
    pub(crate) fn update_from(&mut self, root: &XmlElement) {
        if let Some(args) = root.attr("args") {
            self.command = Some(sanitize_command(args));
        }
        if let Some(start) = root.attr("startstr") {
            self.start_time = Some(start.to_string());
        }
    }
}

/// Drop the trailing target and mask the `-oX` output path.
pub fn sanitize_command(args: &str) -> String {
    let mut tokens: Vec<&str> = args.split_whitespace().collect();
    tokens.pop();
    if let Some(pos) = tokens.iter().position(|t| *t == "-oX")
        && pos + 1 < tokens.len()
    {
        tokens[pos + 1] = "<output-file>";
    }
    tokens.join(" ")
}
