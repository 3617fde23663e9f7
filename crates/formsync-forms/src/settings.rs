//! Form settings loaded from TOML or JSON
//!
//! Field names are plain strings here and turned into typed fields by
//! [`FormSettings::resolve`].
//!
//! ## Example
//!
//! ```toml
//! endpoint = "/accounts/login/"
//! method = "POST"
//! identifier_field = "email"
//! sensitive_field = "password"
//! timeout_ms = 10000
//!
//! [headers]
//! X-Requested-With = "XMLHttpRequest"
//!
//! [messages]
//! failure_title = "Could not sign you in"
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::field::FieldSet;
use crate::orchestrator::{Messages, OrchestratorConfig};
use crate::transport::{Method, SubmitOptions};

/// Serializable form configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormSettings {
	/// Where submissions go
	pub endpoint: String,
	/// HTTP method
	pub method: Method,
	/// Name of the field whose error leads the failure notification
	pub identifier_field: String,
	/// Name of the field cleared after a failure
	pub sensitive_field: String,
	/// Reset every field after a success
	pub reset_on_success: bool,
	/// Give up on a submission after this many milliseconds
	pub timeout_ms: Option<u64>,
	/// Extra request headers
	pub headers: BTreeMap<String, String>,
	/// Notification texts
	pub messages: Messages,
}

impl Default for FormSettings {
	fn default() -> Self {
		Self {
			endpoint: "/login".to_string(),
			method: Method::Post,
			identifier_field: "email".to_string(),
			sensitive_field: "password".to_string(),
			reset_on_success: false,
			timeout_ms: None,
			headers: BTreeMap::new(),
			messages: Messages::default(),
		}
	}
}

impl FormSettings {
	/// Parse a TOML document
	pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
		Ok(toml::from_str(contents)?)
	}

	/// Load a `.toml` or `.json` file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
			path: path.display().to_string(),
			source,
		})?;

		match path.extension().and_then(|ext| ext.to_str()) {
			Some("toml") => Self::from_toml_str(&contents),
			Some("json") => Ok(serde_json::from_str(&contents)?),
			other => Err(SettingsError::UnsupportedFormat(
				other.unwrap_or_default().to_string(),
			)),
		}
	}

	/// Submit options described by these settings
	pub fn submit_options(&self) -> SubmitOptions {
		SubmitOptions {
			method: self.method,
			headers: self.headers.clone(),
			timeout: self.timeout_ms.map(Duration::from_millis),
		}
	}

	/// Resolve field names against `F`.
	///
	/// # Errors
	///
	/// [`SettingsError::UnknownField`] for a name outside `F`,
	/// [`SettingsError::SameField`] when both roles name the same field.
	pub fn resolve<F: FieldSet>(&self) -> Result<OrchestratorConfig<F>, SettingsError> {
		let lookup = |name: &str| F::from_name(name).ok_or_else(|| SettingsError::UnknownField(name.to_string()));
		let identifier_field = lookup(&self.identifier_field)?;
		let sensitive_field = lookup(&self.sensitive_field)?;
		if identifier_field == sensitive_field {
			return Err(SettingsError::SameField(self.identifier_field.clone()));
		}

		tracing::debug!(
			endpoint = %self.endpoint,
			method = %self.method,
			identifier = identifier_field.name(),
			sensitive = sensitive_field.name(),
			"resolved form settings"
		);

		Ok(OrchestratorConfig {
			endpoint: self.endpoint.clone(),
			options: self.submit_options(),
			identifier_field,
			sensitive_field,
			reset_on_success: self.reset_on_success,
			messages: self.messages.clone(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::login::LoginField;
	use rstest::rstest;

	#[rstest]
	fn test_empty_document_uses_defaults() {
		let settings = FormSettings::from_toml_str("").unwrap();
		assert_eq!(settings, FormSettings::default());
	}

	#[rstest]
	fn test_full_document() {
		let settings = FormSettings::from_toml_str(
			r#"
			endpoint = "/accounts/login/"
			method = "PUT"
			reset_on_success = true
			timeout_ms = 2500

			[headers]
			X-Requested-With = "XMLHttpRequest"

			[messages]
			failure_title = "Could not sign you in"
			"#,
		)
		.unwrap();

		let config = settings.resolve::<LoginField>().unwrap();

		assert_eq!(config.endpoint, "/accounts/login/");
		assert_eq!(config.options.method, Method::Put);
		assert_eq!(config.options.timeout, Some(Duration::from_millis(2500)));
		assert_eq!(
			config.options.headers.get("X-Requested-With").map(String::as_str),
			Some("XMLHttpRequest")
		);
		assert!(config.reset_on_success);
		assert_eq!(config.messages.failure_title, "Could not sign you in");
		assert_eq!(config.messages.success_title, Messages::default().success_title);
	}

	#[rstest]
	#[case("identifier_field = \"username\"", "username")]
	#[case("sensitive_field = \"otp\"", "otp")]
	fn test_unknown_field(#[case] document: &str, #[case] name: &str) {
		let err = FormSettings::from_toml_str(document)
			.unwrap()
			.resolve::<LoginField>()
			.unwrap_err();

		assert!(matches!(err, SettingsError::UnknownField(ref n) if n == name));
	}

	#[rstest]
	fn test_same_field_rejected() {
		let settings = FormSettings {
			sensitive_field: "email".to_string(),
			..FormSettings::default()
		};

		assert!(matches!(
			settings.resolve::<LoginField>(),
			Err(SettingsError::SameField(_))
		));
	}

	#[rstest]
	fn test_unknown_key_rejected() {
		let err = FormSettings::from_toml_str("endpiont = \"/login\"").unwrap_err();
		assert!(matches!(err, SettingsError::Parse(_)));
	}

	#[rstest]
	fn test_from_file_dispatches_on_extension() {
		let dir = tempfile::tempdir().unwrap();

		let json = dir.path().join("login.json");
		std::fs::write(&json, r#"{"endpoint": "/api/login", "timeout_ms": 500}"#).unwrap();
		let yaml = dir.path().join("login.yaml");
		std::fs::write(&yaml, "endpoint: /api/login").unwrap();

		let settings = FormSettings::from_file(&json).unwrap();
		assert_eq!(settings.endpoint, "/api/login");
		assert_eq!(settings.timeout_ms, Some(500));

		assert!(matches!(
			FormSettings::from_file(&yaml),
			Err(SettingsError::UnsupportedFormat(ext)) if ext == "yaml"
		));
		assert!(matches!(
			FormSettings::from_file(dir.path().join("missing.toml")),
			Err(SettingsError::Io { .. })
		));
	}
}
