use thiserror::Error;

/// Failure of a [`from_fetch`](crate::observable::from_fetch) request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
  /// The request could not be issued or was rejected before a response.
  #[error("request failed: {0}")]
  Request(String),
  /// The server answered with a non-success status.
  #[error("unexpected status {0}")]
  Status(u16),
  /// Reading the response body failed part way.
  #[error("body read failed: {0}")]
  Body(String),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display() {
    assert_eq!(FetchError::Request("dns".into()).to_string(), "request failed: dns");
    assert_eq!(FetchError::Status(404).to_string(), "unexpected status 404");
    assert_eq!(FetchError::Body("reset".into()).to_string(), "body read failed: reset");
  }
}
