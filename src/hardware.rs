//! EnvironmentSensor trait definition and BME280 implementation.

use anyhow::Result;
use async_trait::async_trait;

pub mod bme280;
pub mod types;

pub use bme280::Bme280Sensor;

use types::EnvironmentSample;

#[async_trait]
pub trait EnvironmentSensor: Send + Sync {
    /// Take one reading. No caching, no retries.
    async fn read_sample(&self) -> Result<EnvironmentSample>;
}
