//! Agent settings structs and defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::system::parser::KP303_MARKER;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub powerstrip: PowerstripSettings,
    pub sensor: SensorSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerstripSettings {
    /// INI file holding the last-known strip identity
    pub config_file: String,
    /// tplink-smarthome-api binary (POWERSTRIP_TOOL overrides)
    pub tool: String,
    pub model_marker: String,
    pub command_timeout_secs: f64, // 0 = wait forever
}

impl PowerstripSettings {
    pub fn command_timeout(&self) -> Option<Duration> {
        (self.command_timeout_secs > 0.0).then(|| Duration::from_secs_f64(self.command_timeout_secs))
    }
}

impl Default for PowerstripSettings {
    fn default() -> Self {
        Self {
            config_file: "config.ini".to_string(),
            tool: "tplink-smarthome-api".to_string(),
            model_marker: KP303_MARKER.to_string(),
            command_timeout_secs: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSettings {
    pub i2c_bus: u8,
    pub i2c_address: u16, // BME280 default 0x76
    pub sysfs_root: String,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            i2c_bus: 1,
            i2c_address: 0x76,
            sysfs_root: "/sys/bus/i2c/devices".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub log_level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_level: "INFO".to_string(),
        }
    }
}
