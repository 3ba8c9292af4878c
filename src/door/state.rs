use std::{fmt, str::FromStr};

/// The state the door is trying to get to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
  Open,
  Closed,
}

impl FromStr for TargetState {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "OPEN" => Ok(TargetState::Open),
      "CLOSED" => Ok(TargetState::Closed),
      _ => Err(()),
    }
  }
}

impl fmt::Display for TargetState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TargetState::Open => write!(f, "OPEN"),
      TargetState::Closed => write!(f, "CLOSED"),
    }
  }
}

/// The reported state of the door.
///
/// There is no sensor behind this value: once triggered it is derived purely
/// from the time elapsed since the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
  Open,
  Opening,
  Closing,
  Closed,
}

impl fmt::Display for DoorState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DoorState::Open => write!(f, "open"),
      DoorState::Opening => write!(f, "opening"),
      DoorState::Closing => write!(f, "closing"),
      DoorState::Closed => write!(f, "closed"),
    }
  }
}
