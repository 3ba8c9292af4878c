use tokio::sync::mpsc;

use super::state::{DoorState, TargetState};

/// A state change pushed to the host out-of-band.
///
/// Hosts poll the getters as well; the channel covers the timer-driven
/// transitions a poll would miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessoryUpdate {
  CurrentState(DoorState),
  TargetState(TargetState),
  Obstruction(bool),
}

pub type UpdateSender = mpsc::UnboundedSender<AccessoryUpdate>;
pub type UpdateReceiver = mpsc::UnboundedReceiver<AccessoryUpdate>;
