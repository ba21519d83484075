use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::cipher::Cipher;
use crate::vuln::Vulnerability;

/// IP address → port ids, in discovery order.
///
/// Repeated appearances of the same IP append to its port list; nothing is
/// deduplicated. Serializes as a JSON object whose key order follows discovery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Locations {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl Locations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `port` to the list for `ip`, creating the entry on first sight.
    pub fn push(&mut self, ip: &str, port: &str) {
        match self.index.get(ip) {
            Some(&i) => self.entries[i].1.push(port.to_string()),
            None => {
                self.index.insert(ip.to_string(), self.entries.len());
                self.entries.push((ip.to_string(), vec![port.to_string()]));
            }
        }
    }

    pub fn get(&self, ip: &str) -> Option<&[String]> {
        self.index.get(ip).map(|&i| self.entries[i].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(ip, ports)| (ip.as_str(), ports.as_slice()))
    }

    /// Addresses in discovery order.
    pub fn ips(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(ip, _)| ip.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Locations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (ip, ports) in &self.entries {
            map.serialize_entry(ip, ports)?;
        }
        map.end()
    }
}

/// Everything known about one service identity across a scan batch.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ServiceScan {
    pub locations: Locations,
    /// Findings from the first port this service was seen on.
    pub findings: Vec<Vulnerability>,
}

/// Cipher suites seen for one TLS version, in encounter order.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct TlsScan {
    pub ciphers: Vec<Cipher>,
}
