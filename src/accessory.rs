use crate::{
  config::{AccessoryConfig, DeviceInfo},
  door::{
    remote::HttpRemote,
    state::{DoorState, TargetState},
    update::UpdateSender,
    DoorController,
  },
  error::GarageResult,
  request::RequestExecutor,
};

/// The host-facing garage door accessory.
///
/// Bundles the door controller with its display metadata and hides the
/// wiring between configuration, request executor and controller.
#[derive(Debug)]
pub struct GarageDoorAccessory {
  device: DeviceInfo,
  controller: DoorController<HttpRemote>,
}

impl GarageDoorAccessory {
  /// Build the accessory, failing on configuration problems.
  ///
  /// State changes are pushed to `update_tx`; the host reads current values
  /// back through the getters.
  pub fn with_config(config: AccessoryConfig, update_tx: UpdateSender) -> GarageResult<GarageDoorAccessory> {
    config.validate()?;

    let executor = RequestExecutor::new(config.debug)?;
    let remote = HttpRemote::new(executor, config.request);
    let controller = DoorController::new(
      config.name,
      remote,
      config.simulate_time_open,
      config.simulate_time_closing,
      update_tx,
    );

    Ok(GarageDoorAccessory {
      device: config.device,
      controller,
    })
  }

  pub fn name(&self) -> &str {
    self.controller.name()
  }

  pub fn device(&self) -> &DeviceInfo {
    &self.device
  }

  pub fn current_state(&self) -> DoorState {
    self.controller.current_state()
  }

  pub fn target_state(&self) -> TargetState {
    self.controller.target_state()
  }

  pub fn obstruction(&self) -> bool {
    self.controller.obstruction()
  }

  /// Set the desired door state; only an open command triggers the door
  pub async fn set_target_state(&self, target_state: TargetState) {
    self.controller.set_target_state(target_state).await
  }
}
