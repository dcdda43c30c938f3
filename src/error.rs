//! Error taxonomy for the presentation core.
//!
//! Use-case failures surface as a single [`WeatherError`] value attached to
//! a screen's view state; they are never propagated past the view-model
//! boundary.

use std::fmt;

use thiserror::Error;

/// Dialog content for a recoverable, user-facing error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertDialog {
    pub title: String,
    pub message: String,
    pub positive_label: String,
    pub negative_label: String,
    /// What the positive button should do.
    pub positive_action: AlertAction,
}

impl fmt::Display for AlertDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// Action kind attached to an alert dialog's positive button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    Dismiss,
    OpenPermissionSettings,
    Retry,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    /// Recoverable: the view renders the dialog and waits for dismissal.
    #[error("{dialog}")]
    Alert { code: i32, dialog: AlertDialog },

    #[error("network request failed: {message}")]
    Network { message: String },

    #[error("no location found for '{query}'")]
    AddressNotFound { query: String },

    #[error("{message}")]
    Other { message: String },
}

impl WeatherError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Location permission was denied; the positive action sends the user
    /// to the system settings.
    pub fn permission_not_granted() -> Self {
        Self::Alert {
            code: -1,
            dialog: AlertDialog {
                title: "Location permission required".to_string(),
                message: "Weather for your position needs access to the device location."
                    .to_string(),
                positive_label: "Open settings".to_string(),
                negative_label: "Cancel".to_string(),
                positive_action: AlertAction::OpenPermissionSettings,
            },
        }
    }

    pub fn is_alert(&self) -> bool {
        matches!(self, Self::Alert { .. })
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}
