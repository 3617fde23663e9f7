//! Validation schemas
//!
//! A [`Schema`] is a pure function from a value snapshot to an error mapping.
//! Any `Fn(&FormValues<F>) -> FieldErrors` is a schema; [`RuleSchema`] builds
//! one declaratively from per-field [`Rule`]s.
//!
//! ## Example
//!
//! ```ignore
//! use formsync_forms::schema::{Rule, RuleSchema};
//!
//! let schema = RuleSchema::new()
//!     .field(SignupField::Email, [Rule::required("Email is required"), Rule::email("Enter a valid email address")])
//!     .field(SignupField::Password, [Rule::min_length(8)])
//!     .field(SignupField::Terms, [Rule::accepted("You must accept the terms")])
//!     .check(|values| {
//!         let mut errors = FieldErrors::new();
//!         if values.text(SignupField::Password) != values.text(SignupField::Confirm) {
//!             errors.insert("confirm", "Passwords do not match");
//!         }
//!         errors
//!     });
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;

use crate::field::{FieldErrors, FieldSet, FieldValue, FormValues};

// Simple shape check; full address validation happens server-side.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL_REGEX: invalid regex pattern")
});

/// Validates a whole value snapshot at once.
pub trait Schema<F: FieldSet> {
	/// Errors for `values`; empty when everything is valid
	fn validate(&self, values: &FormValues<F>) -> FieldErrors;
}

impl<F, S> Schema<F> for S
where
	F: FieldSet,
	S: Fn(&FormValues<F>) -> FieldErrors,
{
	fn validate(&self, values: &FormValues<F>) -> FieldErrors {
		self(values)
	}
}

type CustomCheck = Rc<dyn Fn(&FieldValue) -> Result<(), String>>;
type CrossFieldCheck<F> = Rc<dyn Fn(&FormValues<F>) -> FieldErrors>;

/// A single-field validation rule.
///
/// Only [`Rule::Required`] and [`Rule::Accepted`] look at blank values; every
/// other rule passes a blank field so optional fields stay optional.
#[derive(Clone)]
pub enum Rule {
	/// Value must not be blank
	Required {
		/// Error message
		message: String,
	},
	/// Text must look like an email address
	Email {
		/// Error message
		message: String,
	},
	/// Text must have at least `min` characters
	MinLength {
		/// Minimum character count
		min: usize,
		/// Error message
		message: String,
	},
	/// Text must have at most `max` characters
	MaxLength {
		/// Maximum character count
		max: usize,
		/// Error message
		message: String,
	},
	/// Checkbox must be ticked
	Accepted {
		/// Error message
		message: String,
	},
	/// Arbitrary check returning its own message
	Custom(CustomCheck),
}

impl Rule {
	/// Value must not be blank
	pub fn required(message: impl Into<String>) -> Self {
		Self::Required {
			message: message.into(),
		}
	}

	/// Text must look like an email address
	pub fn email(message: impl Into<String>) -> Self {
		Self::Email {
			message: message.into(),
		}
	}

	/// At least `min` characters
	pub fn min_length(min: usize) -> Self {
		Self::MinLength {
			min,
			message: format!("This field must be at least {min} characters long"),
		}
	}

	/// At most `max` characters
	pub fn max_length(max: usize) -> Self {
		Self::MaxLength {
			max,
			message: format!("This field must be at most {max} characters long"),
		}
	}

	/// Checkbox must be ticked
	pub fn accepted(message: impl Into<String>) -> Self {
		Self::Accepted {
			message: message.into(),
		}
	}

	/// Arbitrary check
	pub fn custom<C>(check: C) -> Self
	where
		C: Fn(&FieldValue) -> Result<(), String> + 'static,
	{
		Self::Custom(Rc::new(check))
	}

	/// Replace the error message. Custom rules keep their own.
	pub fn with_message(mut self, new_message: impl Into<String>) -> Self {
		match &mut self {
			Self::Required { message }
			| Self::Email { message }
			| Self::MinLength { message, .. }
			| Self::MaxLength { message, .. }
			| Self::Accepted { message } => *message = new_message.into(),
			Self::Custom(_) => {}
		}
		self
	}

	/// Check one value
	pub fn check(&self, value: &FieldValue) -> Result<(), String> {
		match self {
			Self::Required { message } => {
				if value.is_blank() {
					return Err(message.clone());
				}
			}
			Self::Accepted { message } => {
				if value.as_bool() != Some(true) {
					return Err(message.clone());
				}
			}
			Self::Custom(check) => return check(value),
			_ => {
				let Some(text) = value.as_text().filter(|_| !value.is_blank()) else {
					return Ok(());
				};
				match self {
					Self::Email { message } if !EMAIL_REGEX.is_match(text) => {
						return Err(message.clone());
					}
					Self::MinLength { min, message } if text.chars().count() < *min => {
						return Err(message.clone());
					}
					Self::MaxLength { max, message } if text.chars().count() > *max => {
						return Err(message.clone());
					}
					_ => {}
				}
			}
		}
		Ok(())
	}
}

impl fmt::Debug for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Required { message } => f.debug_struct("Required").field("message", message).finish(),
			Self::Email { message } => f.debug_struct("Email").field("message", message).finish(),
			Self::MinLength { min, message } => f
				.debug_struct("MinLength")
				.field("min", min)
				.field("message", message)
				.finish(),
			Self::MaxLength { max, message } => f
				.debug_struct("MaxLength")
				.field("max", max)
				.field("message", message)
				.finish(),
			Self::Accepted { message } => f.debug_struct("Accepted").field("message", message).finish(),
			Self::Custom(_) => f.write_str("Custom(..)"),
		}
	}
}

/// Declarative schema: rules per field plus whole-form checks.
///
/// Each field reports at most one message, from its first failing rule.
/// Whole-form checks run afterwards and only fill in fields that have no
/// error yet.
pub struct RuleSchema<F: FieldSet> {
	rules: BTreeMap<F, Vec<Rule>>,
	checks: Vec<CrossFieldCheck<F>>,
}

impl<F: FieldSet> RuleSchema<F> {
	/// Schema that accepts everything
	pub fn new() -> Self {
		Self {
			rules: BTreeMap::new(),
			checks: Vec::new(),
		}
	}

	/// Append rules for `field`
	pub fn field(mut self, field: F, rules: impl IntoIterator<Item = Rule>) -> Self {
		self.rules.entry(field).or_default().extend(rules);
		self
	}

	/// Add a whole-form check
	pub fn check<C>(mut self, check: C) -> Self
	where
		C: Fn(&FormValues<F>) -> FieldErrors + 'static,
	{
		self.checks.push(Rc::new(check));
		self
	}

	/// Rules registered for `field`
	pub fn rules_for(&self, field: F) -> &[Rule] {
		self.rules.get(&field).map(Vec::as_slice).unwrap_or_default()
	}
}

impl<F: FieldSet> Default for RuleSchema<F> {
	fn default() -> Self {
		Self::new()
	}
}

impl<F: FieldSet> Clone for RuleSchema<F> {
	fn clone(&self) -> Self {
		Self {
			rules: self.rules.clone(),
			checks: self.checks.clone(),
		}
	}
}

impl<F: FieldSet> fmt::Debug for RuleSchema<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RuleSchema")
			.field("rules", &self.rules)
			.field("checks", &self.checks.len())
			.finish()
	}
}

impl<F: FieldSet> Schema<F> for RuleSchema<F> {
	fn validate(&self, values: &FormValues<F>) -> FieldErrors {
		let mut errors = FieldErrors::new();

		for (&field, rules) in &self.rules {
			let default = field.default_value();
			let value = values.get(field).unwrap_or(&default);
			if let Some(message) = rules.iter().find_map(|rule| rule.check(value).err()) {
				errors.insert(field.name(), message);
			}
		}

		for check in &self.checks {
			for (name, message) in check(values) {
				if !errors.contains(&name) {
					errors.insert(name, message);
				}
			}
		}

		errors
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::login::LoginField;
	use rstest::rstest;

	#[rstest]
	#[case("a@b.com", true)]
	#[case("first.last@example.co.uk", true)]
	#[case("a@b", false)]
	#[case("a b@c.com", false)]
	#[case("@b.com", false)]
	fn test_email_rule(#[case] input: &str, #[case] valid: bool) {
		let rule = Rule::email("Enter a valid email address");
		assert_eq!(rule.check(&FieldValue::from(input)).is_ok(), valid);
	}

	#[rstest]
	#[case(Rule::email("bad"))]
	#[case(Rule::min_length(3))]
	#[case(Rule::max_length(0).with_message("too long"))]
	fn test_blank_values_skip_format_rules(#[case] rule: Rule) {
		assert!(rule.check(&FieldValue::from("")).is_ok());
	}

	#[rstest]
	fn test_length_rules_count_characters() {
		let value = FieldValue::from("ééé");

		assert!(Rule::min_length(3).check(&value).is_ok());
		assert!(Rule::max_length(3).check(&value).is_ok());
		assert_eq!(
			Rule::min_length(4).check(&value),
			Err("This field must be at least 4 characters long".to_string())
		);
	}

	#[rstest]
	fn test_accepted_rule() {
		let rule = Rule::accepted("Required");

		assert!(rule.check(&FieldValue::from(true)).is_ok());
		assert!(rule.check(&FieldValue::from(false)).is_err());
		assert!(rule.check(&FieldValue::from("yes")).is_err());
	}

	#[rstest]
	fn test_first_failing_rule_wins() {
		let schema = RuleSchema::new().field(
			LoginField::Email,
			[Rule::required("Email is required"), Rule::email("Enter a valid email address")],
		);

		let errors = schema.validate(&FormValues::defaults());

		assert_eq!(errors.field(LoginField::Email), Some("Email is required"));
		assert_eq!(errors.len(), 1);
	}

	#[rstest]
	fn test_cross_field_check_does_not_overwrite() {
		let schema = RuleSchema::new()
			.field(LoginField::Password, [Rule::required("Password is required")])
			.check(|_: &FormValues<LoginField>| {
				FieldErrors::new()
					.with("password", "Passwords do not match")
					.with("remember", "Nope")
			});

		let errors = schema.validate(&FormValues::defaults());

		assert_eq!(errors.get("password"), Some("Password is required"));
		assert_eq!(errors.get("remember"), Some("Nope"));
	}

	#[rstest]
	fn test_closure_is_schema() {
		let schema = |values: &FormValues<LoginField>| {
			let mut errors = FieldErrors::new();
			if !values.flag(LoginField::Remember) {
				errors.insert("remember", "Tick the box");
			}
			errors
		};

		let errors = Schema::validate(&schema, &FormValues::defaults());

		assert_eq!(errors.field(LoginField::Remember), Some("Tick the box"));
	}

	#[rstest]
	fn test_custom_rule() {
		let schema = RuleSchema::new().field(
			LoginField::Password,
			[Rule::custom(|value| match value.as_text() {
				Some(text) if text.chars().any(|c| c.is_ascii_digit()) => Ok(()),
				_ => Err("Include a digit".to_string()),
			})],
		);

		let values = FormValues::defaults().with(LoginField::Password, "hunter");
		assert_eq!(schema.validate(&values).get("password"), Some("Include a digit"));
		assert_eq!(schema.rules_for(LoginField::Email).len(), 0);
	}
}
