//! SmartHomeTool backed by the `tplink-smarthome-api` command line.

use std::net::Ipv4Addr;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::config::types::PowerstripSettings;
use crate::powerstrip::SmartHomeTool;
use crate::system::executor;

pub struct TplinkCli {
    program: String,
    timeout: Option<Duration>,
}

impl TplinkCli {
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_settings(settings: &PowerstripSettings) -> Self {
        Self::new(settings.tool.clone(), settings.command_timeout())
    }
}

#[async_trait]
impl SmartHomeTool for TplinkCli {
    async fn search(&self) -> Result<String> {
        debug!("Executing: {} search", self.program);
        executor::run_tool(&self.program, &["search"], self.timeout).await
    }

    async fn get_info(&self, address: Ipv4Addr) -> Result<String> {
        let address = address.to_string();
        debug!("Executing: {} getInfo {}", self.program, address);
        executor::run_tool(&self.program, &["getInfo", address.as_str()], self.timeout).await
    }

    async fn set_power_state(&self, address: Ipv4Addr, child_id: &str, on: bool) -> Result<()> {
        let address = address.to_string();
        let state = if on { "1" } else { "0" };
        let args = ["setPowerState", "--childId", child_id, address.as_str(), state];
        debug!("Executing: {} {}", self.program, args.join(" "));
        executor::run_tool(&self.program, &args, self.timeout).await?;
        Ok(())
    }
}
