use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cipher suite advertised for a TLS version by `ssl-enum-ciphers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cipher {
    /// IANA suite name (e.g., "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256").
    pub name: String,
    /// Key exchange description from `kex_info` (e.g., "secp256r1", "rsa 2048").
    pub key_exchange: String,
    /// Letter grade assigned by the script.
    pub strength: String,
}

impl Cipher {
    pub fn new(
        name: impl Into<String>,
        key_exchange: impl Into<String>,
        strength: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            key_exchange: key_exchange.into(),
            strength: strength.into(),
        }
    }

    pub fn strength_class(&self) -> StrengthClass {
        StrengthClass::from_grade(&self.strength)
    }
}

/// Coarse grade bucket for a cipher's letter strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrengthClass {
    Fail,
    Poor,
    Fair,
    Good,
}

impl StrengthClass {
    /// Map an `ssl-enum-ciphers` grade. Anything that is not A, B or C is a failure.
    pub fn from_grade(grade: &str) -> Self {
        match grade {
            "A" => Self::Good,
            "B" => Self::Fair,
            "C" => Self::Poor,
            _ => Self::Fail,
        }
    }

    /// Background color used by the LaTeX and HTML reports (RGB hex, no `#`).
    pub fn color(self) -> &'static str {
        match self {
            Self::Good => "4AEF0E",
            Self::Fair => "F7F302",
            Self::Poor => "F8A102",
            Self::Fail => "FD6864",
        }
    }
}

impl fmt::Display for StrengthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "Good"),
            Self::Fair => write!(f, "Fair"),
            Self::Poor => write!(f, "Poor"),
            Self::Fail => write!(f, "Fail"),
        }
    }
}
