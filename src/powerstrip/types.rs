//! Power strip identity record and resolution error kinds.

use std::fmt;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Number of switchable outlets on a KP303.
pub const MAX_OUTLETS: usize = 3;

/// Last-known identity of one power strip: its address and the firmware ids
/// of its outlets in discovery order (outlet 1, 2, 3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceRecord {
    pub address: Ipv4Addr,
    outlets: Vec<String>,
}

impl DeviceRecord {
    pub fn new(address: Ipv4Addr) -> Self {
        Self {
            address,
            outlets: Vec::with_capacity(MAX_OUTLETS),
        }
    }

    /// Build a record from an id list. Empty ids and anything past the third are dropped.
    pub fn with_outlets<I, S>(address: Ipv4Addr, outlets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut record = Self::new(address);
        for id in outlets {
            record.assign_outlet(id);
        }
        record
    }

    /// Put `id` into the first unfilled slot.
    /// Returns the 1-based slot number, or `None` when the id is empty or all slots are taken.
    pub fn assign_outlet(&mut self, id: impl Into<String>) -> Option<usize> {
        let id = id.into();
        if id.is_empty() || self.is_complete() {
            return None;
        }
        self.outlets.push(id);
        Some(self.outlets.len())
    }

    pub fn outlets(&self) -> &[String] {
        &self.outlets
    }

    /// Outlet id by its 1-based position on the strip.
    pub fn outlet(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|idx| self.outlets.get(idx))
            .map(String::as_str)
    }

    pub fn is_complete(&self) -> bool {
        self.outlets.len() >= MAX_OUTLETS
    }
}

impl fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IP {}", self.address)?;
        for number in 1..=MAX_OUTLETS {
            write!(f, " Plug{}: {}", number, self.outlet(number).unwrap_or("-"))?;
        }
        Ok(())
    }
}

/// Recoverable conditions that move the resolver from the stored record to a network scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    ConfigNotFound,
    ProbeFailed,
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::ConfigNotFound => write!(f, "no usable stored record"),
            Fallback::ProbeFailed => write!(f, "stored power strip did not answer"),
        }
    }
}

/// Terminal failures of a reconcile run. No device identity is available afterwards.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no powerstrip found on the network: {reason}")]
    DeviceNotFoundOnNetwork { reason: String },

    #[error("powerstrip discovered at {address} did not respond: {reason}")]
    NoResponseFromDiscoveredDevice { address: Ipv4Addr, reason: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Missing file, section, key or value. Deliberately a single kind.
    #[error("no stored powerstrip record")]
    NotFound,

    #[error("refusing to save a record with {found} of {} outlet ids", MAX_OUTLETS)]
    IncompleteRecord { found: usize },

    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
