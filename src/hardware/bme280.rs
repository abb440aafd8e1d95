//! BME280 reader over the kernel `bmp280` IIO driver.
//! The driver applies the chip's calibration and exposes compensated values in sysfs:
//!   <root>/<bus>-<addr>/iio:deviceN/in_temp_input              milli °C
//!   <root>/<bus>-<addr>/iio:deviceN/in_humidityrelative_input  milli %RH
//!   <root>/<bus>-<addr>/iio:deviceN/in_pressure_input          kPa
//! The driver has to be bound to the chip (device tree overlay or `new_device`);
//! without it there is no IIO directory and reading fails.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::Local;
use tracing::{debug, info, warn};

use crate::config::types::SensorSettings;
use crate::hardware::types::EnvironmentSample;
use crate::hardware::EnvironmentSensor;

pub struct Bme280Sensor {
    bus: u8,
    address: u16,
    sysfs_root: PathBuf,
}

impl Bme280Sensor {
    pub fn new(bus: u8, address: u16, sysfs_root: impl Into<PathBuf>) -> Self {
        Self {
            bus,
            address,
            sysfs_root: sysfs_root.into(),
        }
    }

    pub fn from_settings(settings: &SensorSettings) -> Self {
        Self::new(settings.i2c_bus, settings.i2c_address, &settings.sysfs_root)
    }

    /// I2C client directory name, e.g. `1-0076`.
    fn client_name(&self) -> String {
        format!("{}-{:04x}", self.bus, self.address)
    }

    fn find_iio_device(&self) -> Result<PathBuf> {
        let pattern = self.sysfs_root.join(self.client_name()).join("iio:device*");
        let pattern_str = pattern.to_string_lossy();

        glob::glob(&pattern_str)?
            .filter_map(Result::ok)
            .find(|p| p.is_dir())
            .ok_or_else(|| {
                anyhow!(
                    "No IIO device for I2C bus {} address {:#04x} under {:?} (is the bmp280 driver bound?)",
                    self.bus,
                    self.address,
                    self.sysfs_root
                )
            })
    }

    async fn read_value(&self, dir: &Path, file: &str) -> Result<f64> {
        let path = dir.join(file);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {:?}", path))?;
        raw.trim()
            .parse::<f64>()
            .with_context(|| format!("Unparsable value {:?} in {:?}", raw.trim(), path))
    }
}

#[async_trait]
impl EnvironmentSensor for Bme280Sensor {
    async fn read_sample(&self) -> Result<EnvironmentSample> {
        let device = self.find_iio_device()?;
        info!(
            "Reading sensor data from bme280 at bus {} and address {:#04x}",
            self.bus, self.address
        );

        if let Ok(name) = tokio::fs::read_to_string(device.join("name")).await {
            if !name.trim().starts_with("bme280") {
                warn!("IIO device {:?} reports chip {:?}, expected bme280", device, name.trim());
            }
        }

        let temp_milli_c = self.read_value(&device, "in_temp_input").await?;
        let humidity_milli_pct = self.read_value(&device, "in_humidityrelative_input").await?;
        let pressure_kpa = self.read_value(&device, "in_pressure_input").await?;
        debug!(
            "Raw IIO values: temp={} humidity={} pressure={}",
            temp_milli_c, humidity_milli_pct, pressure_kpa
        );

        Ok(EnvironmentSample {
            timestamp: Local::now(),
            temperature_c: temp_milli_c / 1000.0,
            humidity_pct: humidity_milli_pct / 1000.0,
            pressure_hpa: pressure_kpa * 10.0,
        })
    }
}
