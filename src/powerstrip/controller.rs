//! Outlet on/off commands.

use std::net::Ipv4Addr;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use crate::powerstrip::types::{DeviceRecord, MAX_OUTLETS};
use crate::powerstrip::SmartHomeTool;

pub struct OutletController<'a> {
    tool: &'a dyn SmartHomeTool,
}

impl<'a> OutletController<'a> {
    pub fn new(tool: &'a dyn SmartHomeTool) -> Self {
        Self { tool }
    }

    /// Switch one outlet. The tool's exit status is the result; no retries.
    pub async fn set_outlet_state(&self, address: Ipv4Addr, outlet_id: &str, on: bool) -> Result<()> {
        info!(
            "Turning {} plug {} on power strip located at {}",
            if on { "on" } else { "off" },
            outlet_id,
            address
        );
        self.tool
            .set_power_state(address, outlet_id, on)
            .await
            .with_context(|| format!("Failed to switch plug {} at {}", outlet_id, address))
    }

    pub async fn turn_on(&self, address: Ipv4Addr, outlet_id: &str) -> Result<()> {
        self.set_outlet_state(address, outlet_id, true).await
    }

    pub async fn turn_off(&self, address: Ipv4Addr, outlet_id: &str) -> Result<()> {
        self.set_outlet_state(address, outlet_id, false).await
    }

    /// Switch an outlet by its position (1-3) on a resolved strip.
    pub async fn set_outlet(&self, record: &DeviceRecord, number: usize, on: bool) -> Result<()> {
        let outlet_id = record.outlet(number).ok_or_else(|| {
            anyhow!(
                "Powerstrip at {} has no id for plug {} (known: {} of {})",
                record.address,
                number,
                record.outlets().len(),
                MAX_OUTLETS
            )
        })?;
        self.set_outlet_state(record.address, outlet_id, on).await
    }
}
