// ── MacAddress ──────────────────────────────────────────────────────
//
// The switch reports MACs colon-separated, users type them every which way,
// and the activity log must compare them byte-for-byte. Everything goes
// through `MacAddress::new` before it is compared or stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
///
/// Input with exactly 12 hex digits (any separators) is regrouped into
/// pairs. Anything else is kept lowercased as-is, so unparseable input
/// still compares consistently with itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-separated, dash-separated, or bare hex.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let lowered = raw.as_ref().to_lowercase();
        let hex: Vec<char> = lowered.chars().filter(char::is_ascii_hexdigit).collect();
        if hex.len() != 12 {
            return Self(lowered);
        }
        let grouped = hex
            .chunks(2)
            .map(|pair| pair.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(":");
        Self(grouped)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl AsRef<str> for MacAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strict check for six hex pairs separated by `:` or `-`.
///
/// This is the accepted input format for commands that act on a MAC
/// (bare hex is normalized by [`MacAddress::new`] but not accepted here).
pub fn is_mac_address(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 17
        && bytes.iter().enumerate().all(|(i, b)| {
            if i % 3 == 2 {
                matches!(b, b':' | b'-')
            } else {
                b.is_ascii_hexdigit()
            }
        })
}
