//! KP303 power strip discovery and control, plus BME280 environment sampling.

pub mod app;
pub mod config;
pub mod hardware;
pub mod powerstrip;
pub mod system;
