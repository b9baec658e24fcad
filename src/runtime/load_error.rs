use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How the volume loader classified a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadErrorKind {
    NotFound,
    TooLarge,
    InvalidMetadata,
    InvalidMultiSource,
    LoadFailed,
    Unknown,
}

impl LoadErrorKind {
    pub fn description(self) -> &'static str {
        match self {
            LoadErrorKind::NotFound => "The requested volume could not be found.",
            LoadErrorKind::TooLarge => "The volume is too large to load in this browser.",
            LoadErrorKind::InvalidMetadata => "The volume's metadata is missing or malformed.",
            LoadErrorKind::InvalidMultiSource => {
                "The requested data sources cannot be combined into one volume."
            }
            LoadErrorKind::LoadFailed => "The volume failed to load.",
            LoadErrorKind::Unknown => "An unknown error occurred while loading the volume.",
        }
    }

    /// Best guess from an HTTP status of the failing request.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            404 | 410 => LoadErrorKind::NotFound,
            413 => LoadErrorKind::TooLarge,
            400..=599 => LoadErrorKind::LoadFailed,
            _ => LoadErrorKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadError {
    pub kind: LoadErrorKind,
    pub message: String,
}

impl LoadError {
    pub fn new(kind: LoadErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind.description(), self.message)
    }
}

/// Errors waiting to be shown, one banner at a time.
#[derive(Debug, Clone, Default)]
pub struct LoadErrorQueue {
    errors: VecDeque<LoadError>,
}

impl LoadErrorQueue {
    pub fn push(&mut self, error: LoadError) {
        self.errors.push_back(error);
    }

    /// The error on screen.
    pub fn current(&self) -> Option<&LoadError> {
        self.errors.front()
    }

    /// Dismisses the current error and returns the one shown next.
    pub fn dismiss(&mut self) -> Option<&LoadError> {
        self.errors.pop_front();
        self.errors.front()
    }

    pub fn dismiss_all(&mut self) {
        self.errors.clear();
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Errors queued behind the current one.
    pub fn remaining(&self) -> usize {
        self.errors.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
