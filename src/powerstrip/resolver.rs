//! Reconciles the stored power strip record with what is on the network.
//!
//! ```text
//! TrustConfig --load ok + probe ok------------------------> Resolved
//!      |  NotFound / probe failed (store cleared)
//!      v
//!   Scanning --search + marker + IP + getInfo + save ----> Resolved
//!      |  search failed / no marker / no IP / no answer
//!      v
//!    Failed
//! ```
//!
//! One pass per call; a failed scan is not retried until the next run.

use tracing::{debug, error, info, warn};

use crate::config::store::ConfigStore;
use crate::powerstrip::types::{DeviceRecord, Fallback, ResolveError};
use crate::powerstrip::SmartHomeTool;
use crate::system::parser;

#[derive(Debug)]
enum ResolverState {
    TrustConfig,
    Scanning(Fallback),
    Resolved(DeviceRecord),
    Failed(ResolveError),
}

pub struct DeviceResolver<'a> {
    store: &'a ConfigStore,
    tool: &'a dyn SmartHomeTool,
    model_marker: String,
}

impl<'a> DeviceResolver<'a> {
    pub fn new(store: &'a ConfigStore, tool: &'a dyn SmartHomeTool) -> Self {
        Self {
            store,
            tool,
            model_marker: parser::KP303_MARKER.to_string(),
        }
    }

    pub fn with_model_marker(mut self, marker: impl Into<String>) -> Self {
        self.model_marker = marker.into();
        self
    }

    /// Drive the state machine to a terminal state.
    pub async fn reconcile(&self) -> Result<DeviceRecord, ResolveError> {
        let mut state = ResolverState::TrustConfig;
        loop {
            state = match state {
                ResolverState::TrustConfig => self.trust_config().await,
                ResolverState::Scanning(trigger) => {
                    info!("Searching network for powerstrip ({})", trigger);
                    self.scan().await
                }
                ResolverState::Resolved(record) => return Ok(record),
                ResolverState::Failed(e) => {
                    error!("Powerstrip resolution failed: {}", e);
                    return Err(e);
                }
            };
        }
    }

    /// Load the stored record and probe it.
    async fn trust_config(&self) -> ResolverState {
        let record = match self.store.load() {
            Ok(record) => record,
            Err(e) => {
                info!("Unable to use stored powerstrip record: {}", e);
                return ResolverState::Scanning(Fallback::ConfigNotFound);
            }
        };

        info!("Attempting to connect to powerstrip located at {}", record.address);
        match self.tool.get_info(record.address).await {
            Ok(_) => {
                info!("Successfully connected to TP-Link KP303 powerstrip at {}", record.address);
                ResolverState::Resolved(record)
            }
            Err(e) => {
                warn!("Unable to connect to powerstrip using stored record - {}: {:#}", record, e);
                if let Err(e) = self.store.clear() {
                    warn!("Could not clear stale powerstrip record: {}", e);
                }
                ResolverState::Scanning(Fallback::ProbeFailed)
            }
        }
    }

    /// Search the network, read outlet ids from the discovered strip and persist them.
    async fn scan(&self) -> ResolverState {
        let search_output = match self.tool.search().await {
            Ok(output) => output,
            Err(e) => {
                return ResolverState::Failed(ResolveError::DeviceNotFoundOnNetwork {
                    reason: format!("search failed: {:#}", e),
                })
            }
        };

        let address = match parser::parse_search_output(&search_output, &self.model_marker) {
            Ok(address) => address,
            Err(e) => return ResolverState::Failed(e),
        };
        info!("Found powerstrip - IP {}", address);

        let info_output = match self.tool.get_info(address).await {
            Ok(output) => output,
            Err(e) => {
                return ResolverState::Failed(ResolveError::NoResponseFromDiscoveredDevice {
                    address,
                    reason: format!("{:#}", e),
                })
            }
        };

        let mut record = DeviceRecord::new(address);
        for id in parser::parse_device_info(&info_output) {
            match record.assign_outlet(id.as_str()) {
                Some(number) => info!("Setting plug {} id - {}", number, id),
                None => debug!("Ignoring extra outlet id {}", id),
            }
        }

        // A short outlet list still resolves; `save` refuses it, so the next run scans again.
        if !record.is_complete() {
            warn!(
                "Powerstrip at {} reported {} outlet ids, expected 3",
                address,
                record.outlets().len()
            );
        }

        if let Err(e) = self.store.save(&record) {
            warn!("Powerstrip record not persisted: {}", e);
        }

        ResolverState::Resolved(record)
    }
}
