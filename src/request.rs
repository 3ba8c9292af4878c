use std::{collections::HashMap, time::Duration};

use reqwest::{
  header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
  Method, Url,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{GarageError, GarageResult};

/// How long we wait for the trigger endpoint before giving up
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The trigger request, as configured by the host.
///
/// Read-only at runtime: per-call normalisation happens on a fresh
/// [`PreparedRequest`] so repeated calls never see a previous call's
/// serialised body or injected headers.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestSpec {
  /// The URL the trigger request is sent to
  pub url: String,
  #[serde(default)]
  pub options: RequestOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestOptions {
  /// The request method, e.g. "GET" or "POST"
  #[serde(default = "default_method")]
  pub method: String,
  /// Headers sent with the request, passed through verbatim
  #[serde(default)]
  pub headers: HashMap<String, String>,
  /// The request body; a string is sent as-is, any other JSON value is
  /// serialised and sent as `application/json`
  #[serde(default)]
  pub body: Option<Value>,
}

impl Default for RequestOptions {
  fn default() -> Self {
    RequestOptions {
      method: default_method(),
      headers: HashMap::new(),
      body: None,
    }
  }
}

fn default_method() -> String {
  "GET".to_string()
}

/// A request computed from a [`RequestSpec`] for a single call
#[derive(Debug)]
pub(crate) struct PreparedRequest {
  pub url: Url,
  pub method: Method,
  pub headers: HeaderMap,
  pub body: Option<String>,
}

impl RequestSpec {
  /// Check the spec can be turned into a request, without sending one
  pub fn validate(&self) -> GarageResult<()> {
    self.prepare().map(|_| ())
  }

  pub(crate) fn prepare(&self) -> GarageResult<PreparedRequest> {
    let url = Url::parse(&self.url)?;
    let method = Method::from_bytes(self.options.method.as_bytes())
      .map_err(|_| GarageError::InvalidMethod(self.options.method.clone()))?;

    let mut headers = HeaderMap::new();
    for (name, value) in &self.options.headers {
      let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| GarageError::InvalidHeader(name.clone()))?;
      let value = HeaderValue::from_str(value).map_err(|_| GarageError::InvalidHeader(value.clone()))?;
      headers.insert(name, value);
    }

    let body = match &self.options.body {
      None => None,
      // a string body passes through untouched, with no injected header
      Some(Value::String(text)) => Some(text.clone()),
      Some(value) => {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Some(value.to_string())
      }
    };

    Ok(PreparedRequest {
      url,
      method,
      headers,
      body,
    })
  }
}

/// Sends the trigger request described by a [`RequestSpec`]
#[derive(Debug, Clone)]
pub struct RequestExecutor {
  client: reqwest::Client,
  debug: bool,
}

impl RequestExecutor {
  pub fn new(debug: bool) -> GarageResult<RequestExecutor> {
    let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    Ok(RequestExecutor { client, debug })
  }

  /// Perform the request and parse its JSON response.
  ///
  /// Transport failures and unparseable bodies are errors. A payload that
  /// reports an application-level failure is not: interpreting the payload
  /// is left to the caller, keeping transport and application errors
  /// distinguishable.
  pub async fn execute(&self, spec: &RequestSpec) -> GarageResult<Value> {
    let request = spec.prepare()?;
    if self.debug {
      log::debug!(
        "requesting {} {} (headers: {:?}, body: {:?})",
        request.method,
        request.url,
        request.headers,
        request.body
      );
    }

    let mut builder = self.client.request(request.method, request.url).headers(request.headers);
    if let Some(body) = request.body {
      builder = builder.body(body);
    }

    let response = builder.send().await?;
    let body = response.text().await?;
    let payload: Value = serde_json::from_str(&body).map_err(|err| GarageError::ResponseFormat {
      message: err.to_string(),
      body,
    })?;

    if self.debug {
      log::debug!("trigger response: {}", payload);
    }
    Ok(payload)
  }
}
