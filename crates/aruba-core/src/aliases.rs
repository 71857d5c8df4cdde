// ── MAC aliases ──
//
// A plain-text file of `<MAC> <alias>` lines lets commands take a
// friendly name wherever a MAC is expected.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use aruba_api::MacAddress;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
#[error("Failed to read MAC alias file {}: {source}", path.display())]
pub struct AliasError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Lowercase alias -> canonical MAC. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacAliases {
    by_alias: HashMap<String, MacAddress>,
}

impl MacAliases {
    /// The empty table: nothing resolves.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, AliasError> {
        let contents = fs::read_to_string(path).map_err(|source| AliasError {
            path: path.to_path_buf(),
            source,
        })?;
        let aliases = Self::parse(&contents);
        debug!(path = %path.display(), count = aliases.len(), "MAC aliases loaded");
        Ok(aliases)
    }

    /// Parse alias file contents.
    ///
    /// `#` comments and blank lines are skipped, as are lines whose MAC
    /// isn't six hex pairs or that have no alias. Later lines win.
    pub fn parse(contents: &str) -> Self {
        let by_alias = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let parsed = parse_line(line);
                if parsed.is_none() {
                    trace!(line, "skipping malformed alias line");
                }
                parsed
            })
            .collect();
        Self { by_alias }
    }

    /// Canonical MAC for an alias, matched case-insensitively.
    pub fn resolve(&self, alias: &str) -> Option<&MacAddress> {
        self.by_alias.get(&alias.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}

fn parse_line(line: &str) -> Option<(String, MacAddress)> {
    let (mac, alias) = line.split_once(char::is_whitespace)?;
    let alias = alias.trim();
    if alias.is_empty() {
        return None;
    }
    let mac = MacAddress::new(mac);
    is_canonical(mac.as_str()).then(|| (alias.to_lowercase(), mac))
}

/// `xx:xx:xx:xx:xx:xx`, lowercase hex.
fn is_canonical(mac: &str) -> bool {
    let bytes = mac.as_bytes();
    bytes.len() == 17
        && bytes.iter().enumerate().all(|(i, b)| {
            if i % 3 == 2 {
                *b == b':'
            } else {
                matches!(b, b'0'..=b'9' | b'a'..=b'f')
            }
        })
}
