//! Errors that can occur while composing or delivering event notifications.

use std::error::Error as StdError;
use std::fmt;
use std::io::Error as IoError;
use std::result;

/// A convenience wrapper around `Result` for `imap_notify::Error`.
pub type Result<T> = result::Result<T, Error>;

/// A set of errors that can occur in the notification engine.
///
/// None of these are raised for an event that is merely suppressed: a disabled event group yields
/// no event at all, and a suppressed mailbox cancels the event.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// An `io::Error` that occurred while mapping message content or writing a payload.
    Io(IoError),
    /// A notification payload could not be serialized.
    Json(serde_json::Error),
    /// The configuration could not be parsed or contains an unknown name.
    Config(ConfigError),
    /// The mail store failed to answer a lookup (unseen count, message id, ...).
    Store(String),
    /// The annotation store failed to resolve a mailbox annotation.
    Annotation(String),
    /// The sink refused a notification payload.
    Sink(String),
}

impl From<IoError> for Error {
    fn from(err: IoError) -> Error {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Error {
        Error::Config(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Error {
        Error::Config(ConfigError::Syntax(err.to_string()))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Io(ref e) => fmt::Display::fmt(e, f),
            Error::Json(ref e) => fmt::Display::fmt(e, f),
            Error::Config(ref e) => fmt::Display::fmt(e, f),
            Error::Store(ref msg) => write!(f, "Mail store lookup failed: {}", msg),
            Error::Annotation(ref msg) => write!(f, "Annotation lookup failed: {}", msg),
            Error::Sink(ref msg) => write!(f, "Notification sink failed: {}", msg),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match *self {
            Error::Io(ref e) => Some(e),
            Error::Json(ref e) => Some(e),
            Error::Config(ref e) => Some(e),
            _ => None,
        }
    }
}

/// An error found while reading the notification configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration text is not valid TOML, or has a value of the wrong type.
    Syntax(String),
    /// An `event_groups` entry names no known group.
    UnknownGroup(String),
    /// An `event_extra_params` entry names no known parameter.
    UnknownParam(String),
    /// `event_content_inclusion_mode` names no known mode.
    UnknownContentMode(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ConfigError::Syntax(ref msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::UnknownGroup(ref s) => write!(f, "Unknown event group: {:?}", s),
            ConfigError::UnknownParam(ref s) => write!(f, "Unknown extra parameter: {:?}", s),
            ConfigError::UnknownContentMode(ref s) => {
                write!(f, "Unknown content inclusion mode: {:?}", s)
            }
        }
    }
}

impl StdError for ConfigError {}

/// The parameters missing from a notification at the time it was about to be sent.
///
/// Returned by [`check_complete`](crate::dispatch::check_complete). Dispatch logs it, and panics
/// with it when verification is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingParameters {
    /// Wire name of the (possibly derived) event type.
    pub event: &'static str,
    /// Wire names of the expected parameters that were not filled.
    pub params: Vec<&'static str>,
}

impl fmt::Display for MissingParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot notify event {}: missing parameters:", self.event)?;
        for param in &self.params {
            write!(f, " {}", param)?;
        }
        Ok(())
    }
}

impl StdError for MissingParameters {}
