//! Uniform result envelope returned by every data façade operation.
//!
//! Presentation code only ever sees `{success, data, error}`; network and
//! storage failures have already been folded into `error`.

use serde::{Deserialize, Serialize};

use crate::error::{PortalError, PortalResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.success
    }

    /// Borrow the payload of a successful envelope.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Convert back into a `Result`, e.g. for `?` chains in tests or tools.
    ///
    /// A successful envelope without data is reported as a validation error;
    /// the façade never builds one.
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data, self.error) {
            (true, Some(data), _) => Ok(data),
            (true, None, _) => Err("envelope marked successful but carries no data".to_string()),
            (false, _, Some(err)) => Err(err),
            (false, _, None) => Err("unknown error".to_string()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
        }
    }
}

impl<T> From<PortalResult<T>> for Envelope<T> {
    fn from(value: PortalResult<T>) -> Self {
        match value {
            Ok(data) => Envelope::ok(data),
            Err(err) => Envelope::from(err),
        }
    }
}

impl<T> From<PortalError> for Envelope<T> {
    fn from(err: PortalError) -> Self {
        Envelope::fail(err.to_string())
    }
}
