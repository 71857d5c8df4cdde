// ── Port activity log ──
//
// Remembers which MACs were on a port when it was disabled. Once a port is
// down the switch forgets those addresses, so this file is the only way a
// later enable/ban can find the port again by MAC.
//
// On disk: one JSON object, port -> sorted array of canonical MACs.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use aruba_api::MacAddress;
use thiserror::Error;
use tracing::{debug, trace};

/// Failure reading or writing the log file.
#[derive(Debug, Error)]
pub enum PortLogError {
    #[error("Failed to read port log {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write port log {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Persistent port -> MAC-set mapping.
///
/// Loaded lazily on first use, written back after every mutation. A port
/// with no MACs is never stored, and an empty log removes the file.
#[derive(Debug)]
pub struct PortActivityLog {
    path: PathBuf,
    entries: BTreeMap<String, BTreeSet<MacAddress>>,
    loaded: bool,
}

impl PortActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
            loaded: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file if it hasn't been read yet.
    ///
    /// A missing or empty file is an empty log. The log counts as loaded
    /// even when reading fails, so callers can warn and keep going.
    pub fn load(&mut self) -> Result<(), PortLogError> {
        if self.loaded {
            return Ok(());
        }
        self.loaded = true;

        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => return Err(self.read_error(source)),
        };
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }

        let decoded: BTreeMap<String, Vec<String>> =
            serde_json::from_slice(&data).map_err(|e| self.read_error(e.into()))?;
        self.entries = decoded
            .into_iter()
            .map(|(port, macs)| (port, macs.iter().map(MacAddress::new).collect()))
            .filter(|(_, macs): &(String, BTreeSet<MacAddress>)| !macs.is_empty())
            .collect();

        debug!(path = %self.path.display(), ports = self.entries.len(), "port log loaded");
        Ok(())
    }

    /// Replace the MACs recorded for `port`. An empty list forgets the port.
    pub fn record<I, S>(&mut self, port: &str, macs: I) -> Result<(), PortLogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.load()?;
        let macs: BTreeSet<MacAddress> = macs.into_iter().map(MacAddress::new).collect();
        trace!(port, count = macs.len(), "recording port");
        if macs.is_empty() {
            self.entries.remove(port);
        } else {
            self.entries.insert(port.to_owned(), macs);
        }
        self.persist()
    }

    /// Forget everything recorded for `port`.
    pub fn remove_port(&mut self, port: &str) -> Result<(), PortLogError> {
        self.load()?;
        self.entries.remove(port);
        self.persist()
    }

    /// Forget one MAC on `port`; the port goes too if that was its last MAC.
    pub fn remove_mac(&mut self, mac: &str, port: &str) -> Result<(), PortLogError> {
        self.load()?;
        let mac = MacAddress::new(mac);
        if let Some(macs) = self.entries.get_mut(port) {
            macs.remove(&mac);
            if macs.is_empty() {
                self.entries.remove(port);
            }
        }
        self.persist()
    }

    /// The port a MAC was last recorded on. If several ports list it, the
    /// first in sorted port order wins.
    pub fn port_for_mac(&mut self, mac: &str) -> Result<Option<String>, PortLogError> {
        self.load()?;
        let mac = MacAddress::new(mac);
        Ok(self
            .entries
            .iter()
            .find(|(_, macs)| macs.contains(&mac))
            .map(|(port, _)| port.clone()))
    }

    /// Sorted copy of the whole log.
    pub fn snapshot(&mut self) -> Result<BTreeMap<String, Vec<String>>, PortLogError> {
        self.load()?;
        Ok(self.to_map())
    }

    fn to_map(&self) -> BTreeMap<String, Vec<String>> {
        self.entries
            .iter()
            .map(|(port, macs)| {
                (
                    port.clone(),
                    macs.iter().map(|m| m.as_str().to_owned()).collect(),
                )
            })
            .collect()
    }

    fn persist(&self) -> Result<(), PortLogError> {
        if self.entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => {
                    debug!(path = %self.path.display(), "port log emptied, file removed");
                    Ok(())
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(source) => Err(self.write_error(source)),
            };
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PortLogError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut data =
            serde_json::to_vec_pretty(&self.to_map()).map_err(|e| self.write_error(e.into()))?;
        data.push(b'\n');

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, &data).map_err(|source| PortLogError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| self.write_error(source))?;

        trace!(path = %self.path.display(), ports = self.entries.len(), "port log written");
        Ok(())
    }

    /// Sibling of the log file, so the final rename stays on one filesystem.
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read_error(&self, source: io::Error) -> PortLogError {
        PortLogError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: io::Error) -> PortLogError {
        PortLogError::Write {
            path: self.path.clone(),
            source,
        }
    }
}
