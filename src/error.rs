use thiserror::Error;

pub type GarageResult<T> = Result<T, GarageError>;

#[derive(Debug, Error)]
pub enum GarageError {
  /// The trigger endpoint could not be reached (DNS, connection, timeout)
  #[error(transparent)]
  Network(#[from] reqwest::Error),
  /// The trigger endpoint answered with something other than JSON
  #[error("unparseable trigger response: {message}")]
  ResponseFormat { message: String, body: String },
  /// The trigger endpoint answered, but its payload reports a failure
  #[error("trigger endpoint reported errors: {errors}")]
  Application { errors: serde_json::Value },
  #[error(transparent)]
  InvalidUrl(#[from] url::ParseError),
  #[error("unknown request method {0:?}")]
  InvalidMethod(String),
  #[error("invalid request header {0:?}")]
  InvalidHeader(String),
  #[error("{0} must be greater than zero")]
  NonPositiveDuration(&'static str),
}
