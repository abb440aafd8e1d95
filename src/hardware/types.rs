//! Environment sample data and unit conversions.

use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;

/// One BME280 reading
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentSample {
    pub timestamp: DateTime<Local>,
    #[serde(rename = "temperatureC")]
    pub temperature_c: f64,
    #[serde(rename = "humidityPct")]
    pub humidity_pct: f64,
    #[serde(rename = "pressureHPa")]
    pub pressure_hpa: f64,
}

impl EnvironmentSample {
    pub fn temperature_f(&self) -> f64 {
        celsius_to_fahrenheit(self.temperature_c)
    }

    pub fn pressure_inhg(&self) -> f64 {
        hpa_to_inhg(self.pressure_hpa)
    }
}

impl fmt::Display for EnvironmentSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Temperature: {:.2}(ºC) {:.2}(ºF) Humidity: {:.2}(%) Pressure {:.2}(hPa) {:.2}(inHg)",
            self.temperature_c,
            self.temperature_f(),
            self.humidity_pct,
            self.pressure_hpa,
            self.pressure_inhg()
        )
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn hpa_to_inhg(pressure_hpa: f64) -> f64 {
    pressure_hpa * 0.02953
}
