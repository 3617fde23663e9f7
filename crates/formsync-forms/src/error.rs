//! Error types for the form controller.
//!
//! Nothing here is fatal to a form: validation, rejection and transport
//! failures all leave the form ready for another attempt. These types exist
//! so callers can report or log what happened.

use std::time::Duration;

use thiserror::Error;

use crate::field::FieldErrors;

/// Result type for fallible form operations
pub type FormResult<T> = Result<T, FormError>;

/// Failure talking to the server that is not a per-field rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
	/// Connection failed before a response arrived
	#[error("Network error: {0}")]
	Network(String),

	/// No response within the configured limit
	#[error("Request timed out after {0:?}")]
	Timeout(Duration),

	/// HTTP 4xx/5xx without a field error payload
	#[error("Server error ({status}): {message}")]
	Server {
		/// HTTP status code
		status: u16,
		/// Error message
		message: String,
	},

	/// Response body could not be understood
	#[error("Decode error: {0}")]
	Decode(String),
}

impl TransportError {
	/// Create a network error
	pub fn network(msg: impl Into<String>) -> Self {
		Self::Network(msg.into())
	}

	/// Create a server error
	pub fn server(status: u16, message: impl Into<String>) -> Self {
		Self::Server {
			status,
			message: message.into(),
		}
	}

	/// Create a decode error
	pub fn decode(msg: impl Into<String>) -> Self {
		Self::Decode(msg.into())
	}
}

/// What a transport reports when a submission does not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
	/// The server rejected the submission with per-field messages
	#[error("Submission rejected ({} field error(s))", .0.len())]
	Rejected(FieldErrors),

	/// The submission never got a usable answer
	#[error(transparent)]
	Transport(#[from] TransportError),
}

impl SubmitError {
	/// Field errors to surface on the form.
	///
	/// Transport failures carry none; the form falls back to a generic message.
	pub fn field_errors(&self) -> FieldErrors {
		match self {
			Self::Rejected(errors) => errors.clone(),
			Self::Transport(_) => FieldErrors::new(),
		}
	}
}

/// Errors raised while loading or resolving [`FormSettings`](crate::settings::FormSettings).
#[derive(Debug, Error)]
pub enum SettingsError {
	/// The settings file could not be read
	#[error("Failed to read {path}: {source}")]
	Io {
		/// File that was being read
		path: String,
		/// Underlying I/O error
		source: std::io::Error,
	},

	/// The TOML document is malformed or has the wrong shape
	#[error("Invalid form settings: {0}")]
	Parse(#[from] toml::de::Error),

	/// The JSON document is malformed or has the wrong shape
	#[error("Invalid form settings: {0}")]
	Json(#[from] serde_json::Error),

	/// File extension is neither `.toml` nor `.json`
	#[error("Unsupported settings format `{0}`, expected .toml or .json")]
	UnsupportedFormat(String),

	/// A field name does not belong to the form's field set
	#[error("Settings refer to unknown field `{0}`")]
	UnknownField(String),

	/// The identifier and sensitive field are the same field
	#[error("Identifier and sensitive field must differ, both are `{0}`")]
	SameField(String),
}

/// Umbrella error for form operations.
#[derive(Debug, Error)]
pub enum FormError {
	/// Local schema rejected the values; nothing was sent
	#[error("Form has {} invalid field(s)", .0.len())]
	Validation(FieldErrors),

	/// Server rejected the submission
	#[error("Submission rejected ({} field error(s))", .0.len())]
	Rejected(FieldErrors),

	/// Transport failure
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// A field name outside the form's field set
	#[error("Unknown field `{0}`")]
	UnknownField(String),

	/// Settings could not be loaded
	#[error(transparent)]
	Settings(#[from] SettingsError),
}

impl From<SubmitError> for FormError {
	fn from(err: SubmitError) -> Self {
		match err {
			SubmitError::Rejected(errors) => Self::Rejected(errors),
			SubmitError::Transport(err) => Self::Transport(err),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_transport_error_display() {
		assert_eq!(
			TransportError::network("connection refused").to_string(),
			"Network error: connection refused"
		);
		assert_eq!(
			TransportError::server(503, "Service unavailable").to_string(),
			"Server error (503): Service unavailable"
		);
		assert_eq!(
			TransportError::Timeout(Duration::from_secs(5)).to_string(),
			"Request timed out after 5s"
		);
	}

	#[rstest]
	fn test_submit_error_field_errors() {
		let rejected = SubmitError::Rejected(FieldErrors::new().with("password", "Invalid credentials"));
		let network: SubmitError = TransportError::network("offline").into();

		assert_eq!(rejected.field_errors().get("password"), Some("Invalid credentials"));
		assert!(network.field_errors().is_empty());
	}

	#[rstest]
	fn test_form_error_from_submit_error() {
		let err: FormError = SubmitError::Transport(TransportError::decode("bad json")).into();
		assert!(matches!(err, FormError::Transport(TransportError::Decode(_))));

		let err: FormError = SubmitError::Rejected(FieldErrors::new().with("email", "Taken")).into();
		assert_eq!(err.to_string(), "Submission rejected (1 field error(s))");
	}
}
