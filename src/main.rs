#![warn(rust_2018_idioms)]

use std::{fs, str::FromStr};

use http_garage::{accessory::GarageDoorAccessory, config::AccessoryConfig, door::state::TargetState};
use simple_logger::SimpleLogger;
use tokio::{
  io::{AsyncBufReadExt, BufReader},
  sync::mpsc,
};

/// A stand-in for the home-automation host: reads the accessory config from
/// a file, logs push updates and maps stdin lines to target state commands.
#[tokio::main]
async fn main() {
  let config = fs::read_to_string("garage-config.toml").expect("unable to read garage-config.toml");
  let config: AccessoryConfig = toml::from_str(&config).expect("unable to parse garage-config.toml");

  let level = if config.debug {
    log::LevelFilter::Debug
  }
  else {
    log::LevelFilter::Info
  };
  SimpleLogger::new().with_level(level).init().unwrap();

  let (update_tx, mut update_rx) = mpsc::unbounded_channel();
  let accessory = GarageDoorAccessory::with_config(config, update_tx).expect("failed to initialise accessory");

  log::info!(
    "{} ({} {}) ready, type OPEN to trigger the door",
    accessory.name(),
    accessory.device().manufacturer,
    accessory.device().model
  );

  tokio::spawn(async move {
    while let Some(update) = update_rx.recv().await {
      log::info!("update: {:?}", update);
    }
  });

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  while let Ok(Some(line)) = lines.next_line().await {
    if let Ok(target_state) = TargetState::from_str(line.trim()) {
      accessory.set_target_state(target_state).await;
    }
  }
}
