//! Command-line argument definitions (clap).

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "powerstrip-agent")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "KP303 power strip discovery/control and BME280 sampling", long_about = None)]
pub struct Args {
    /// Settings file (default: settings.json next to the binary)
    #[arg(long, global = true)]
    pub settings: Option<String>,

    /// Set log level (TRACE, DEBUG, INFO, WARN, ERROR, CRITICAL)
    #[arg(long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve the power strip, then take one sensor reading (default)
    Monitor,
    /// Resolve the power strip from the stored record or a network scan
    Resolve,
    /// Turn an outlet on
    On {
        /// Outlet position on the strip
        #[arg(value_parser = clap::value_parser!(u8).range(1..=3))]
        outlet: u8,
    },
    /// Turn an outlet off
    Off {
        /// Outlet position on the strip
        #[arg(value_parser = clap::value_parser!(u8).range(1..=3))]
        outlet: u8,
    },
    /// Take one sensor reading
    #[command(long_about = "Take one BME280 reading through the kernel bmp280 IIO driver.\n\
The driver must be bound to the sensor first, e.g. with\n\
`echo bme280 0x76 | sudo tee /sys/bus/i2c/devices/i2c-1/new_device`\n\
or `dtoverlay=i2c-sensor,bme280,addr=0x76` in /boot/config.txt.")]
    Sensor,
    /// Forget the stored power strip record
    Forget,
    /// Show effective settings
    Settings,
}

impl Args {
    pub fn selected_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Monitor)
    }
}
