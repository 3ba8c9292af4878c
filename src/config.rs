use std::time::Duration;

use serde::Deserialize;
use serde_with::{serde_as, DurationSecondsWithFrac};

use crate::{
  error::{GarageError, GarageResult},
  request::RequestSpec,
};

/// The accessory configuration, provided by the host.
///
/// Usually parsed from toml, but any serde source works; a host may just as
/// well build it in memory.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct AccessoryConfig {
  /// The accessory's display name
  pub name: String,

  /// Log the outgoing trigger request and its response
  #[serde(default)]
  pub debug: bool,

  /// The request sent to trigger the door
  pub request: RequestSpec,

  #[serde_as(as = "DurationSecondsWithFrac<f64>")]
  /// How long the door dwells open before the simulated closing starts
  pub simulate_time_open: Duration,

  #[serde_as(as = "DurationSecondsWithFrac<f64>")]
  /// How long the simulated closing takes
  pub simulate_time_closing: Duration,

  /// Display metadata reported to the host
  #[serde(default)]
  pub device: DeviceInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceInfo {
  #[serde(default = "default_manufacturer")]
  pub manufacturer: String,
  #[serde(default = "default_model")]
  pub model: String,
  #[serde(default = "default_serial_number")]
  pub serial_number: String,
}

impl Default for DeviceInfo {
  fn default() -> Self {
    DeviceInfo {
      manufacturer: default_manufacturer(),
      model: default_model(),
      serial_number: default_serial_number(),
    }
  }
}

fn default_manufacturer() -> String {
  "METATAG".to_string()
}

fn default_model() -> String {
  "HTTP_GARAGE_GATES".to_string()
}

fn default_serial_number() -> String {
  "00000001".to_string()
}

impl AccessoryConfig {
  /// Reject configurations the accessory cannot run with.
  ///
  /// Fatal to accessory setup; trigger failures at runtime are handled via
  /// the obstruction flag instead.
  pub fn validate(&self) -> GarageResult<()> {
    self.request.validate()?;
    if self.simulate_time_open.is_zero() {
      return Err(GarageError::NonPositiveDuration("simulate_time_open"));
    }
    if self.simulate_time_closing.is_zero() {
      return Err(GarageError::NonPositiveDuration("simulate_time_closing"));
    }
    Ok(())
  }
}
