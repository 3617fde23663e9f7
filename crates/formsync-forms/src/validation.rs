//! ValidationStore - local projection of the form
//!
//! Holds a copy of the field values, the schema, and the errors currently
//! shown next to each field. It never talks to the server; the
//! [`Synchronizer`](crate::sync::Synchronizer) keeps it in step with
//! [`RemoteFormState`](crate::remote::RemoteFormState), and [`gate`](ValidationStore::gate)
//! decides whether a submission may go out.

use std::fmt;
use std::rc::Rc;

use formsync_reactive::Signal;

use crate::field::{FieldErrors, FieldSet, FieldValue, FormValues};
use crate::schema::Schema;

/// Local validation state.
///
/// Cloning yields another handle to the same state.
pub struct ValidationStore<F: FieldSet> {
	values: Signal<FormValues<F>>,
	errors: Signal<FieldErrors>,
	schema: Rc<dyn Schema<F>>,
}

impl<F: FieldSet> ValidationStore<F> {
	/// Create a store seeded with `initial` and no errors
	pub fn new(schema: impl Schema<F> + 'static, initial: FormValues<F>) -> Self {
		Self::with_shared_schema(Rc::new(schema), initial)
	}

	/// Create a store around an already shared schema
	pub fn with_shared_schema(schema: Rc<dyn Schema<F>>, initial: FormValues<F>) -> Self {
		Self {
			values: Signal::new(initial),
			errors: Signal::new(FieldErrors::new()),
			schema,
		}
	}

	/// Overwrite the projected value of one field
	pub fn set_field_value(&self, field: F, value: FieldValue) {
		self.values.update(|values| values.set(field, value));
	}

	/// Replace the displayed errors wholesale
	pub fn set_errors(&self, errors: FieldErrors) {
		self.errors.set(errors);
	}

	/// Validate every field at once.
	///
	/// On failure the errors replace what is displayed and are returned; on
	/// success the displayed errors are cleared.
	///
	/// # Errors
	///
	/// The schema's non-empty error mapping.
	pub fn gate(&self) -> Result<(), FieldErrors> {
		let errors = self.values.with_untracked(|values| self.schema.validate(values));

		if errors.is_empty() {
			tracing::debug!("validation gate passed");
			self.errors.set(FieldErrors::new());
			Ok(())
		} else {
			tracing::debug!(invalid = errors.len(), "validation gate blocked submission");
			self.errors.set(errors.clone());
			Err(errors)
		}
	}

	/// Projected value of one field
	pub fn value(&self, field: F) -> FieldValue {
		self.values
			.with(|values| values.get(field).cloned())
			.unwrap_or_else(|| field.default_value())
	}

	/// Snapshot of every projected value
	pub fn values(&self) -> FormValues<F> {
		self.values.get()
	}

	/// Displayed errors
	pub fn errors(&self) -> FieldErrors {
		self.errors.get()
	}

	/// Displayed error for one field
	pub fn error(&self, field: F) -> Option<String> {
		self.errors.with(|errors| errors.field(field).map(str::to_owned))
	}

	/// Whether any error is displayed
	pub fn has_errors(&self) -> bool {
		self.errors.with(|errors| !errors.is_empty())
	}

	/// Reactive handle to the projected values
	pub fn values_signal(&self) -> &Signal<FormValues<F>> {
		&self.values
	}

	/// Reactive handle to the displayed errors
	pub fn errors_signal(&self) -> &Signal<FieldErrors> {
		&self.errors
	}
}

impl<F: FieldSet> Clone for ValidationStore<F> {
	fn clone(&self) -> Self {
		Self {
			values: self.values.clone(),
			errors: self.errors.clone(),
			schema: Rc::clone(&self.schema),
		}
	}
}

impl<F: FieldSet> fmt::Debug for ValidationStore<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ValidationStore")
			.field("values", &self.values)
			.field("errors", &self.errors)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::login::{LoginField, login_schema};
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	#[serial]
	fn test_gate_blocks_and_displays_errors() {
		let store = ValidationStore::new(login_schema(), FormValues::defaults());

		let result = store.gate();

		let errors = result.unwrap_err();
		assert_eq!(errors.field(LoginField::Email), Some("Email is required"));
		assert_eq!(store.errors(), errors);
		assert_eq!(store.error(LoginField::Password).as_deref(), Some("Password is required"));
	}

	#[rstest]
	#[serial]
	fn test_gate_pass_clears_errors() {
		let store = ValidationStore::new(login_schema(), FormValues::defaults());
		store.set_errors(FieldErrors::new().with("password", "Invalid credentials"));

		store.set_field_value(LoginField::Email, "a@b.com".into());
		store.set_field_value(LoginField::Password, "x".into());

		assert!(store.gate().is_ok());
		assert!(!store.has_errors());
	}

	#[rstest]
	#[serial]
	fn test_set_errors_replaces() {
		let store = ValidationStore::new(login_schema(), FormValues::defaults());

		store.set_errors(FieldErrors::new().with("email", "Taken").with("password", "Weak"));
		store.set_errors(FieldErrors::new().with("password", "Invalid credentials"));

		assert_eq!(store.errors(), FieldErrors::new().with("password", "Invalid credentials"));
	}

	#[rstest]
	#[serial]
	fn test_clones_share_state() {
		let store = ValidationStore::new(|_: &FormValues<LoginField>| FieldErrors::new(), FormValues::defaults());
		let other = store.clone();

		store.set_field_value(LoginField::Remember, true.into());

		assert_eq!(other.value(LoginField::Remember), FieldValue::Bool(true));
		assert!(other.gate().is_ok());
	}
}
