use std::{fmt::Debug, future::Future};

use crate::{
  error::{GarageError, GarageResult},
  request::{RequestExecutor, RequestSpec},
};

/// Triggers the physical door.
///
/// The controller only needs to know whether the trigger attempt succeeded;
/// how the attempt is delivered lives behind this trait.
pub trait DoorRemote: Debug {
  /// Trigger the remote to send the open signal
  fn trigger(&self) -> impl Future<Output = GarageResult<()>> + Send;
}

/// A remote that triggers the door with a single HTTP request
#[derive(Debug, Clone)]
pub struct HttpRemote {
  executor: RequestExecutor,
  request: RequestSpec,
}

impl HttpRemote {
  pub fn new(executor: RequestExecutor, request: RequestSpec) -> HttpRemote {
    HttpRemote { executor, request }
  }
}

impl DoorRemote for HttpRemote {
  async fn trigger(&self) -> GarageResult<()> {
    let payload = self.executor.execute(&self.request).await?;

    // the endpoint answered, but a payload-level `errors` field still
    // counts as a failed attempt
    match payload.get("errors") {
      Some(errors) if !errors.is_null() => Err(GarageError::Application {
        errors: errors.clone(),
      }),
      _ => Ok(()),
    }
  }
}
