//! SmartHomeTool trait definition and the KP303 resolver/controller built on it.

use std::net::Ipv4Addr;

use anyhow::Result;
use async_trait::async_trait;

pub mod controller;
pub mod resolver;
pub mod tplink;
pub mod types;

pub use controller::OutletController;
pub use resolver::DeviceResolver;
pub use tplink::TplinkCli;

/// The external control tool. Implementations return its raw text output;
/// interpreting that text is the job of `system::parser`.
#[async_trait]
pub trait SmartHomeTool: Send + Sync {
    /// Network-wide discovery (`search`)
    async fn search(&self) -> Result<String>;

    /// Info query against one device (`getInfo <address>`), also used as a liveness probe
    async fn get_info(&self, address: Ipv4Addr) -> Result<String>;

    /// Switch one child outlet (`setPowerState --childId <id> <address> <0|1>`)
    async fn set_power_state(&self, address: Ipv4Addr, child_id: &str, on: bool) -> Result<()>;
}
