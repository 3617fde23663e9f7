//! Ready-made sign-in form: `email`, `password` and `remember`.

use crate::field::{FieldSet, FieldValue};
use crate::orchestrator::{Messages, OrchestratorConfig};
use crate::schema::{Rule, RuleSchema};
use crate::transport::SubmitOptions;

/// Fields of the sign-in form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoginField {
	/// Account email, the identifier field
	Email,
	/// Password, the sensitive field
	Password,
	/// "Remember me" checkbox
	Remember,
}

impl FieldSet for LoginField {
	fn all() -> &'static [Self] {
		&[Self::Email, Self::Password, Self::Remember]
	}

	fn name(self) -> &'static str {
		match self {
			Self::Email => "email",
			Self::Password => "password",
			Self::Remember => "remember",
		}
	}

	fn default_value(self) -> FieldValue {
		match self {
			Self::Email | Self::Password => FieldValue::empty_text(),
			Self::Remember => FieldValue::Bool(false),
		}
	}
}

/// Local rules for the sign-in form
pub fn login_schema() -> RuleSchema<LoginField> {
	RuleSchema::new()
		.field(
			LoginField::Email,
			[
				Rule::required("Email is required"),
				Rule::email("Enter a valid email address"),
			],
		)
		.field(LoginField::Password, [Rule::required("Password is required")])
}

/// Orchestrator configuration for the sign-in form posting to `endpoint`
pub fn login_config(endpoint: impl Into<String>) -> OrchestratorConfig<LoginField> {
	OrchestratorConfig {
		endpoint: endpoint.into(),
		options: SubmitOptions::new(),
		identifier_field: LoginField::Email,
		sensitive_field: LoginField::Password,
		reset_on_success: false,
		messages: Messages::default(),
	}
}
