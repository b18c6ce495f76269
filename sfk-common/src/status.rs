//! Stream status codes
//!
//! The terminal status of an audio stream, carried in the trailer frame of the
//! streaming wire format (see [`crate::wire`]).

use std::fmt;
use std::str::FromStr;

/// Protocol-level status code of a finished stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// Stream delivered completely
    Ok,
    /// Requested audio resource does not exist
    NotFound,
    /// Server failed while reading the resource
    Internal,
    /// Transport broke for a reason other than cancellation
    Unavailable,
}

impl StatusCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "NOT_FOUND",
            StatusCode::Internal => "INTERNAL",
            StatusCode::Unavailable => "UNAVAILABLE",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(StatusCode::Ok),
            "NOT_FOUND" => Ok(StatusCode::NotFound),
            "INTERNAL" => Ok(StatusCode::Internal),
            "UNAVAILABLE" => Ok(StatusCode::Unavailable),
            other => Err(format!("unknown status code: {}", other)),
        }
    }
}

/// Status code plus human-readable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamStatus {
    pub code: StatusCode,
    pub message: String,
}

impl StreamStatus {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::Ok, "")
    }

    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} {}", self.code, self.message)
        }
    }
}

impl FromStr for StreamStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (code, message) = match s.split_once(' ') {
            Some((code, message)) => (code, message),
            None => (s, ""),
        };
        Ok(Self::new(code.parse()?, message))
    }
}
