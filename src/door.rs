use std::{
  fmt,
  sync::{Arc, Mutex, MutexGuard},
  time::Duration,
};

use self::{
  remote::DoorRemote,
  state::{DoorState, TargetState},
  timer::TransitionTimer,
  update::{AccessoryUpdate, UpdateSender},
};

pub mod remote;
pub mod state;
mod timer;
pub mod update;

/// Drives the open sequence and simulates the door's travel.
///
/// The controller never observes the physical door: the trigger request is
/// presumed to actuate it, and the reported state is purely a function of
/// the time elapsed since.
#[derive(Debug)]
pub struct DoorController<R: DoorRemote> {
  remote: R,
  time_open: Duration,
  time_closing: Duration,
  shared: Arc<Shared>,
}

/// The part of the controller the transition timers mutate
#[derive(Debug)]
struct Shared {
  name: String,
  update_tx: UpdateSender,
  door: Mutex<DoorShared>,
}

#[derive(Debug)]
struct DoorShared {
  current_state: DoorState,
  target_state: TargetState,
  obstruction: bool,
  /// Incremented whenever pending timers are cancelled; a timer firing with
  /// a stale cycle applies nothing
  cycle: u64,
  closing_timer: Option<TransitionTimer>,
  closed_timer: Option<TransitionTimer>,
}

impl<R: DoorRemote> fmt::Display for DoorController<R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "DoorController ({})", self.shared.name)
  }
}

impl<R: DoorRemote> DoorController<R> {
  pub fn new(
    name: String,
    remote: R,
    time_open: Duration,
    time_closing: Duration,
    update_tx: UpdateSender,
  ) -> DoorController<R> {
    DoorController {
      remote,
      time_open,
      time_closing,
      shared: Arc::new(Shared {
        name,
        update_tx,
        door: Mutex::new(DoorShared {
          // the door is assumed closed on every start
          current_state: DoorState::Closed,
          target_state: TargetState::Closed,
          obstruction: false,
          cycle: 0,
          closing_timer: None,
          closed_timer: None,
        }),
      }),
    }
  }

  pub fn name(&self) -> &str {
    &self.shared.name
  }

  /// The last known door state
  pub fn current_state(&self) -> DoorState {
    self.shared.lock().current_state
  }

  pub fn target_state(&self) -> TargetState {
    self.shared.lock().target_state
  }

  /// True if the last trigger attempt failed
  pub fn obstruction(&self) -> bool {
    self.shared.lock().obstruction
  }

  /// Move towards `target_state`.
  ///
  /// Only an open command drives the door. Closing is always simulated, so
  /// a close command is accepted without side effect.
  pub async fn set_target_state(&self, target_state: TargetState) {
    match target_state {
      TargetState::Open => self.request_open().await,
      TargetState::Closed => {
        log::debug!("{} ignoring close command, closing is only ever simulated", &self);
      }
    }
  }

  /// Trigger the door and run a full simulated cycle.
  ///
  /// The trigger's outcome only drives the obstruction flag: with no sensor
  /// there is no way to tell whether the door actually moved, so the cycle
  /// runs to completion either way.
  pub async fn request_open(&self) {
    {
      let mut door = self.shared.lock();
      self.shared.set_target_state(&mut door, TargetState::Open);
      self.shared.set_current_state(&mut door, DoorState::Opening);
    }

    let obstruction = match self.remote.trigger().await {
      Ok(()) => false,
      Err(err) => {
        log::warn!("{} trigger failed: {}", &self, err);
        true
      }
    };

    let mut door = self.shared.lock();
    self.shared.set_obstruction(&mut door, obstruction);
    self.shared.set_current_state(&mut door, DoorState::Open);

    // a re-open restarts the clock: pending transitions from the previous
    // cycle must never fire
    door.cancel_timers();

    let cycle = door.cycle;
    let shared = Arc::clone(&self.shared);
    door.closing_timer = Some(TransitionTimer::spawn(self.time_open, move || {
      shared.begin_closing(cycle)
    }));
    let shared = Arc::clone(&self.shared);
    door.closed_timer = Some(TransitionTimer::spawn(self.time_open + self.time_closing, move || {
      shared.finish_closing(cycle)
    }));
  }
}

impl Shared {
  fn lock(&self) -> MutexGuard<'_, DoorShared> {
    self.door.lock().unwrap()
  }

  fn set_current_state(&self, door: &mut DoorShared, current_state: DoorState) {
    log::debug!("{} is now {}", self.name, current_state);
    door.current_state = current_state;
    // the host may have dropped its subscription; the getters still serve
    // polled reads
    let _ = self.update_tx.send(AccessoryUpdate::CurrentState(current_state));
  }

  fn set_target_state(&self, door: &mut DoorShared, target_state: TargetState) {
    door.target_state = target_state;
    let _ = self.update_tx.send(AccessoryUpdate::TargetState(target_state));
  }

  fn set_obstruction(&self, door: &mut DoorShared, obstruction: bool) {
    if door.obstruction != obstruction {
      door.obstruction = obstruction;
      let _ = self.update_tx.send(AccessoryUpdate::Obstruction(obstruction));
    }
  }

  /// The simulated dwell in the open state is over, the door starts closing
  fn begin_closing(&self, cycle: u64) {
    let mut door = self.lock();
    if door.cycle != cycle {
      // superseded by a newer open cycle
      return;
    }
    self.set_target_state(&mut door, TargetState::Closed);
    self.set_current_state(&mut door, DoorState::Closing);
  }

  /// The simulated travel is over, the door has closed
  fn finish_closing(&self, cycle: u64) {
    let mut door = self.lock();
    if door.cycle != cycle {
      return;
    }
    self.set_current_state(&mut door, DoorState::Closed);
  }
}

impl DoorShared {
  fn cancel_timers(&mut self) {
    self.cycle += 1;
    if let Some(timer) = self.closing_timer.take() {
      timer.cancel();
    }
    if let Some(timer) = self.closed_timer.take() {
      timer.cancel();
    }
  }
}
