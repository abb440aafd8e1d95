//! Persisted KP303 record: a flat INI file with one `[KP303]` section.

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use ini::{Ini, WriteOption};
use tracing::{debug, info};

use crate::powerstrip::types::{DeviceRecord, StoreError, MAX_OUTLETS};

pub const SECTION: &str = "KP303";
pub const KEY_ADDRESS: &str = "power_ip";
pub const KEY_OUTLETS: [&str; MAX_OUTLETS] = ["plug_1", "plug_2", "plug_3"];

/// Reads and writes the last-known power strip identity at a single path.
/// No locking; one process, one run.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored record. Anything short of a complete, valid record is `NotFound`.
    pub fn load(&self) -> Result<DeviceRecord, StoreError> {
        info!("Reading powerstrip record from {:?}", self.path);

        let ini = Ini::load_from_file(&self.path).map_err(|e| {
            debug!("Cannot read {:?}: {}", self.path, e);
            StoreError::NotFound
        })?;

        let section = ini.section(Some(SECTION)).ok_or_else(|| {
            debug!("No [{}] section in {:?}", SECTION, self.path);
            StoreError::NotFound
        })?;

        let field = |key: &str| {
            section
                .get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    debug!("Missing '{}' in {:?}", key, self.path);
                    StoreError::NotFound
                })
        };

        let address: Ipv4Addr = field(KEY_ADDRESS)?.parse().map_err(|_| {
            debug!("'{}' in {:?} is not an IPv4 address", KEY_ADDRESS, self.path);
            StoreError::NotFound
        })?;
        info!("Setting powerstrip IP {}", address);

        let mut record = DeviceRecord::new(address);
        for (number, key) in KEY_OUTLETS.into_iter().enumerate() {
            let id = field(key)?;
            info!("Setting plug {} id - {}", number + 1, id);
            record.assign_outlet(id);
        }

        Ok(record)
    }

    /// Truncate the file so the next `load` yields `NotFound`.
    pub fn clear(&self) -> Result<(), StoreError> {
        info!("Clearing {:?}", self.path);
        std::fs::File::create(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Replace the file content with `record`. All three outlet ids must be known.
    pub fn save(&self, record: &DeviceRecord) -> Result<(), StoreError> {
        if !record.is_complete() {
            return Err(StoreError::IncompleteRecord {
                found: record.outlets().len(),
            });
        }

        let mut ini = Ini::new();
        {
            let mut section = ini.with_section(Some(SECTION));
            section.set(KEY_ADDRESS, record.address.to_string());
            for (key, id) in KEY_OUTLETS.into_iter().zip(record.outlets()) {
                section.set(key, id.as_str());
            }
        }

        let opt = WriteOption {
            kv_separator: " = ",
            ..Default::default()
        };
        ini.write_to_file_opt(&self.path, opt)
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;

        info!("Powerstrip record saved to {:?}", self.path);
        Ok(())
    }
}
