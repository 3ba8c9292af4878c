// State machine and timer choreography tests, run against a scripted remote
// on tokio's paused test clock.

use std::{
  sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
  },
  time::Duration,
};

use http_garage::{
  door::{
    remote::DoorRemote,
    state::{DoorState, TargetState},
    update::{AccessoryUpdate, UpdateReceiver},
    DoorController,
  },
  error::{GarageError, GarageResult},
};
use tokio::{task, time};

/// A remote that records trigger attempts and fails on demand
#[derive(Debug, Clone, Default)]
struct ScriptedRemote {
  fail: Arc<AtomicBool>,
  triggers: Arc<AtomicUsize>,
}

impl DoorRemote for ScriptedRemote {
  async fn trigger(&self) -> GarageResult<()> {
    self.triggers.fetch_add(1, Ordering::SeqCst);
    if self.fail.load(Ordering::SeqCst) {
      Err(GarageError::Application {
        errors: serde_json::json!(["jammed"]),
      })
    }
    else {
      Ok(())
    }
  }
}

fn controller(time_open: u64, time_closing: u64) -> (DoorController<ScriptedRemote>, ScriptedRemote, UpdateReceiver) {
  let (update_tx, update_rx) = tokio::sync::mpsc::unbounded_channel();
  let remote = ScriptedRemote::default();
  let controller = DoorController::new(
    "garage".to_string(),
    remote.clone(),
    Duration::from_secs(time_open),
    Duration::from_secs(time_closing),
    update_tx,
  );
  (controller, remote, update_rx)
}

/// Advance the paused clock and let any due timers run
async fn advance(duration: Duration) {
  // freshly armed timers register their sleeps on first poll
  task::yield_now().await;
  time::advance(duration).await;
  task::yield_now().await;
}

fn drain(update_rx: &mut UpdateReceiver) -> Vec<AccessoryUpdate> {
  let mut updates = Vec::new();
  while let Ok(update) = update_rx.try_recv() {
    updates.push(update);
  }
  updates
}

#[tokio::test(start_paused = true)]
async fn open_is_reported_before_any_timer_fires() {
  let (door, remote, mut update_rx) = controller(5, 3);

  door.set_target_state(TargetState::Open).await;

  assert_eq!(door.current_state(), DoorState::Open);
  assert_eq!(door.target_state(), TargetState::Open);
  assert!(!door.obstruction());
  assert_eq!(remote.triggers.load(Ordering::SeqCst), 1);
  assert_eq!(drain(&mut update_rx), vec![
    AccessoryUpdate::TargetState(TargetState::Open),
    AccessoryUpdate::CurrentState(DoorState::Opening),
    AccessoryUpdate::CurrentState(DoorState::Open),
  ]);
}

#[tokio::test(start_paused = true)]
async fn simulated_cycle_follows_the_configured_times() {
  let (door, _remote, mut update_rx) = controller(5, 3);

  door.request_open().await;
  drain(&mut update_rx);

  advance(Duration::from_millis(4_900)).await;
  assert_eq!(door.current_state(), DoorState::Open);
  assert_eq!(drain(&mut update_rx), vec![]);

  advance(Duration::from_millis(200)).await;
  assert_eq!(door.current_state(), DoorState::Closing);
  assert_eq!(door.target_state(), TargetState::Closed);
  assert_eq!(drain(&mut update_rx), vec![
    AccessoryUpdate::TargetState(TargetState::Closed),
    AccessoryUpdate::CurrentState(DoorState::Closing),
  ]);

  advance(Duration::from_secs(3)).await;
  assert_eq!(door.current_state(), DoorState::Closed);
  assert_eq!(drain(&mut update_rx), vec![AccessoryUpdate::CurrentState(DoorState::Closed)]);
}

#[tokio::test(start_paused = true)]
async fn reopening_restarts_the_clock() {
  let (door, remote, mut update_rx) = controller(5, 3);

  door.request_open().await;
  advance(Duration::from_secs(3)).await;
  door.request_open().await;
  drain(&mut update_rx);

  // the first cycle's closing timer would have fired now (t = 5)
  advance(Duration::from_millis(2_100)).await;
  assert_eq!(door.current_state(), DoorState::Open);
  assert_eq!(drain(&mut update_rx), vec![]);

  // only the second cycle's timers fire, 5 and 8 seconds after the re-open
  advance(Duration::from_secs(3)).await;
  assert_eq!(door.current_state(), DoorState::Closing);
  advance(Duration::from_secs(3)).await;
  assert_eq!(door.current_state(), DoorState::Closed);

  // and nothing else is pending
  advance(Duration::from_secs(10)).await;
  assert_eq!(drain(&mut update_rx), vec![
    AccessoryUpdate::TargetState(TargetState::Closed),
    AccessoryUpdate::CurrentState(DoorState::Closing),
    AccessoryUpdate::CurrentState(DoorState::Closed),
  ]);
  assert_eq!(remote.triggers.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn failed_trigger_sets_obstruction_but_completes_the_cycle() {
  let (door, remote, mut update_rx) = controller(5, 3);
  remote.fail.store(true, Ordering::SeqCst);

  door.request_open().await;

  assert!(door.obstruction());
  assert_eq!(door.current_state(), DoorState::Open);
  assert_eq!(drain(&mut update_rx), vec![
    AccessoryUpdate::TargetState(TargetState::Open),
    AccessoryUpdate::CurrentState(DoorState::Opening),
    AccessoryUpdate::Obstruction(true),
    AccessoryUpdate::CurrentState(DoorState::Open),
  ]);

  // the failure is only surfaced via the flag, the cycle still runs
  advance(Duration::from_millis(5_100)).await;
  assert_eq!(door.current_state(), DoorState::Closing);
  advance(Duration::from_secs(3)).await;
  assert_eq!(door.current_state(), DoorState::Closed);

  // the next successful attempt clears the flag
  remote.fail.store(false, Ordering::SeqCst);
  door.request_open().await;
  assert!(!door.obstruction());
  assert!(drain(&mut update_rx).contains(&AccessoryUpdate::Obstruction(false)));
}

#[tokio::test(start_paused = true)]
async fn obstruction_is_only_pushed_on_change() {
  let (door, remote, mut update_rx) = controller(5, 3);
  remote.fail.store(true, Ordering::SeqCst);

  door.request_open().await;
  door.request_open().await;

  let obstructions: Vec<_> = drain(&mut update_rx)
    .into_iter()
    .filter(|update| matches!(update, AccessoryUpdate::Obstruction(_)))
    .collect();
  assert_eq!(obstructions, vec![AccessoryUpdate::Obstruction(true)]);
}

#[tokio::test(start_paused = true)]
async fn close_commands_are_accepted_without_side_effect() {
  let (door, remote, mut update_rx) = controller(5, 3);

  door.set_target_state(TargetState::Closed).await;

  assert_eq!(door.current_state(), DoorState::Closed);
  assert_eq!(door.target_state(), TargetState::Closed);
  assert_eq!(remote.triggers.load(Ordering::SeqCst), 0);
  assert_eq!(drain(&mut update_rx), vec![]);
}
