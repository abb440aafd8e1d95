//! Subcommand handlers. Each run builds its collaborators explicitly from settings.

use anyhow::Result;
use serde_json::json;
use tracing::{error, info};

use crate::config::store::ConfigStore;
use crate::config::types::AgentSettings;
use crate::hardware::{Bme280Sensor, EnvironmentSensor};
use crate::powerstrip::types::{DeviceRecord, ResolveError};
use crate::powerstrip::{DeviceResolver, OutletController, SmartHomeTool, TplinkCli};

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn resolve_with(
    settings: &AgentSettings,
    tool: &dyn SmartHomeTool,
) -> Result<DeviceRecord, ResolveError> {
    let store = ConfigStore::new(&settings.powerstrip.config_file);
    DeviceResolver::new(&store, tool)
        .with_model_marker(settings.powerstrip.model_marker.clone())
        .reconcile()
        .await
}

pub async fn run_resolve(settings: &AgentSettings, as_json: bool) -> Result<()> {
    let tool = TplinkCli::from_settings(&settings.powerstrip);
    let record = resolve_with(settings, &tool).await?;

    if as_json {
        print_json(&record)
    } else {
        println!("{}", record);
        Ok(())
    }
}

pub async fn run_outlet(settings: &AgentSettings, outlet: u8, on: bool) -> Result<()> {
    let tool = TplinkCli::from_settings(&settings.powerstrip);
    let record = resolve_with(settings, &tool).await?;

    OutletController::new(&tool)
        .set_outlet(&record, usize::from(outlet), on)
        .await
}

pub async fn run_sensor(settings: &AgentSettings, as_json: bool) -> Result<()> {
    let sample = Bme280Sensor::from_settings(&settings.sensor).read_sample().await?;
    info!("{}", sample);

    if as_json {
        print_json(&sample)
    } else {
        println!("{}", sample);
        Ok(())
    }
}

/// Resolve the strip and take a reading. A missing strip does not stop the reading.
pub async fn run_monitor(settings: &AgentSettings, as_json: bool) -> Result<()> {
    let tool = TplinkCli::from_settings(&settings.powerstrip);
    let record = match resolve_with(settings, &tool).await {
        Ok(record) => {
            info!("Using powerstrip {}", record);
            Some(record)
        }
        Err(e) => {
            error!("Continuing without a powerstrip: {}", e);
            None
        }
    };

    let sample = Bme280Sensor::from_settings(&settings.sensor).read_sample().await?;
    info!("{}", sample);

    if as_json {
        print_json(&json!({ "powerstrip": record, "sample": sample }))
    } else {
        if let Some(record) = &record {
            println!("{}", record);
        }
        println!("{}", sample);
        Ok(())
    }
}

pub fn run_forget(settings: &AgentSettings) -> Result<()> {
    ConfigStore::new(&settings.powerstrip.config_file).clear()?;
    Ok(())
}

pub fn show_settings(settings: &AgentSettings) -> Result<()> {
    print_json(settings)
}
