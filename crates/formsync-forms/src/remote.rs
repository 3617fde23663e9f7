//! RemoteFormState - authoritative form state
//!
//! Owns what goes over the wire: one [`Signal`] per field, the errors the
//! server reported, and the in-flight flag. A submission runs through
//! [`RemoteFormState::submit`], which reports its outcome through a callback:
//! first `Success` or `Failure`, then always `Finished`.
//!
//! ## Example
//!
//! ```ignore
//! use formsync_forms::{LoginField, RemoteFormState, SubmissionOutcome, SubmitOptions};
//!
//! let form = RemoteFormState::<LoginField>::new();
//! form.set_field(LoginField::Email, "a@b.com");
//!
//! let status = form
//!     .submit(&transport, "/login", &SubmitOptions::new(), |outcome| match outcome {
//!         SubmissionOutcome::Success => close_modal(),
//!         SubmissionOutcome::Failure(errors) => show(errors),
//!         SubmissionOutcome::Finished => stop_spinner(),
//!     })
//!     .await;
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;

use formsync_reactive::Signal;

use crate::error::{FormError, FormResult, SubmitError, TransportError};
use crate::field::{FieldErrors, FieldSet, FieldValue, FormValues};
use crate::transport::{SubmitOptions, SubmitRequest, Transport};

/// Lifecycle event of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
	/// Server accepted the submission
	Success,
	/// Server rejected it or it never got through; carries the errors now on the form
	Failure(FieldErrors),
	/// Always the last event, after `Success` or `Failure`
	Finished,
}

/// Result of calling [`RemoteFormState::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
	/// The transport reported success
	Succeeded,
	/// The transport reported a failure
	Failed(SubmitError),
	/// Another submission was in flight; nothing happened
	AlreadyProcessing,
}

impl SubmitStatus {
	/// Whether the submission went through
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Succeeded)
	}
}

/// Authoritative form state.
///
/// Cloning yields another handle to the same state.
pub struct RemoteFormState<F: FieldSet> {
	fields: BTreeMap<F, Signal<FieldValue>>,
	defaults: FormValues<F>,
	errors: Signal<FieldErrors>,
	processing: Signal<bool>,
	was_successful: Signal<bool>,
}

impl<F: FieldSet> RemoteFormState<F> {
	/// Every field at its [`FieldSet::default_value`]
	pub fn new() -> Self {
		Self::with_defaults(FormValues::defaults())
	}

	/// Start from `defaults`, which also become the reset target
	pub fn with_defaults(defaults: FormValues<F>) -> Self {
		let fields = F::all()
			.iter()
			.map(|&field| {
				let value = defaults.get(field).cloned().unwrap_or_else(|| field.default_value());
				(field, Signal::new(value))
			})
			.collect();

		Self {
			fields,
			defaults,
			errors: Signal::new(FieldErrors::new()),
			processing: Signal::new(false),
			was_successful: Signal::new(false),
		}
	}

	/// Update one field. Writing the value it already holds notifies nobody.
	pub fn set_field(&self, field: F, value: impl Into<FieldValue>) {
		if let Some(signal) = self.fields.get(&field) {
			signal.set_if_changed(value.into());
		}
	}

	/// Update one field by wire name.
	///
	/// # Errors
	///
	/// [`FormError::UnknownField`] when `name` is not a field of `F`.
	pub fn set_field_by_name(&self, name: &str, value: impl Into<FieldValue>) -> FormResult<()> {
		let field = F::from_name(name).ok_or_else(|| FormError::UnknownField(name.to_string()))?;
		self.set_field(field, value);
		Ok(())
	}

	/// Current value of one field
	pub fn value(&self, field: F) -> FieldValue {
		self.fields
			.get(&field)
			.map(Signal::get)
			.unwrap_or_else(|| field.default_value())
	}

	/// Snapshot of every value
	pub fn values(&self) -> FormValues<F> {
		self.fields
			.iter()
			.fold(self.defaults.clone(), |values, (&field, signal)| {
				values.with(field, signal.get())
			})
	}

	/// Value `field` returns to on reset
	pub fn default_of(&self, field: F) -> FieldValue {
		self.defaults.get(field).cloned().unwrap_or_else(|| field.default_value())
	}

	/// Whether any field differs from its default
	pub fn is_dirty(&self) -> bool {
		self.fields
			.iter()
			.any(|(&field, signal)| signal.with(|value| *value != self.default_of(field)))
	}

	/// Server-reported errors
	pub fn errors(&self) -> FieldErrors {
		self.errors.get()
	}

	/// Whether any error is present
	pub fn has_errors(&self) -> bool {
		self.errors.with(|errors| !errors.is_empty())
	}

	/// Attach an error to `name` without a round trip
	pub fn set_error(&self, name: impl Into<String>, message: impl Into<String>) {
		let (name, message) = (name.into(), message.into());
		self.errors.update(|errors| errors.insert(name, message));
	}

	/// Remove every error; values and the in-flight flag are untouched
	pub fn clear_errors(&self) {
		self.errors.set(FieldErrors::new());
	}

	/// Whether a submission is in flight
	pub fn processing(&self) -> bool {
		self.processing.get()
	}

	/// Whether the last completed submission succeeded
	pub fn was_successful(&self) -> bool {
		self.was_successful.get()
	}

	/// Reset one field, or with `None` every field plus the errors
	pub fn reset(&self, field: Option<F>) {
		match field {
			Some(field) => {
				tracing::debug!(field = field.name(), "resetting field");
				self.set_field(field, self.default_of(field));
			}
			None => {
				tracing::debug!("resetting form");
				for (&field, signal) in &self.fields {
					signal.set(self.default_of(field));
				}
				self.clear_errors();
			}
		}
	}

	/// Send the current values through `transport`.
	///
	/// Does nothing and returns [`SubmitStatus::AlreadyProcessing`] while
	/// another submission is in flight. Otherwise `on_outcome` receives
	/// `Success` or `Failure`, then `Finished`, after which the in-flight flag
	/// drops. `Finished` is delivered and the flag cleared even when the
	/// returned future is dropped before completion.
	///
	/// A [`SubmitOptions::timeout`] needs a Tokio runtime with the time driver.
	pub async fn submit<T, O>(
		&self,
		transport: &T,
		endpoint: &str,
		options: &SubmitOptions,
		on_outcome: O,
	) -> SubmitStatus
	where
		T: Transport + ?Sized,
		O: FnMut(SubmissionOutcome),
	{
		if self.processing.get_untracked() {
			tracing::warn!(endpoint, "submission already in flight, ignoring");
			return SubmitStatus::AlreadyProcessing;
		}
		self.processing.set(true);

		let on_outcome = RefCell::new(on_outcome);
		let processing = self.processing.clone();
		let _finished = scopeguard::guard((), |()| {
			if let Ok(mut emit) = on_outcome.try_borrow_mut() {
				emit(SubmissionOutcome::Finished);
			}
			processing.set(false);
		});

		let request = SubmitRequest {
			endpoint: endpoint.to_string(),
			method: options.method,
			headers: options.headers.clone(),
			body: self.values().to_json(),
		};
		tracing::debug!(endpoint, method = %options.method, "submitting form");

		let sent = transport.send(request);
		let result = match options.timeout {
			Some(limit) => tokio::time::timeout(limit, sent)
				.await
				.unwrap_or_else(|_| Err(TransportError::Timeout(limit).into())),
			None => sent.await,
		};

		match result {
			Ok(()) => {
				tracing::info!(endpoint, "submission succeeded");
				self.clear_errors();
				self.was_successful.set(true);
				(on_outcome.borrow_mut())(SubmissionOutcome::Success);
				SubmitStatus::Succeeded
			}
			Err(err) => {
				let errors = err.field_errors();
				tracing::warn!(endpoint, error = %err, invalid = errors.len(), "submission failed");
				self.was_successful.set(false);
				self.errors.set(errors.clone());
				(on_outcome.borrow_mut())(SubmissionOutcome::Failure(errors));
				SubmitStatus::Failed(err)
			}
		}
	}

	/// Reactive handle to one field
	pub fn value_signal(&self, field: F) -> Option<&Signal<FieldValue>> {
		self.fields.get(&field)
	}

	/// Reactive handles to every field, in field order
	pub fn field_signals(&self) -> impl Iterator<Item = (F, &Signal<FieldValue>)> {
		self.fields.iter().map(|(&field, signal)| (field, signal))
	}

	/// Reactive handle to the errors
	pub fn errors_signal(&self) -> &Signal<FieldErrors> {
		&self.errors
	}

	/// Reactive handle to the in-flight flag
	pub fn processing_signal(&self) -> &Signal<bool> {
		&self.processing
	}
}

impl<F: FieldSet> Default for RemoteFormState<F> {
	fn default() -> Self {
		Self::new()
	}
}

/// Clones share the same state. A form hands its state to exactly one
/// [`SubmissionOrchestrator`](crate::SubmissionOrchestrator); other clones are
/// for reading and editing fields, not for building a second orchestrator.
impl<F: FieldSet> Clone for RemoteFormState<F> {
	fn clone(&self) -> Self {
		Self {
			fields: self.fields.clone(),
			defaults: self.defaults.clone(),
			errors: self.errors.clone(),
			processing: self.processing.clone(),
			was_successful: self.was_successful.clone(),
		}
	}
}

impl<F: FieldSet> fmt::Debug for RemoteFormState<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RemoteFormState")
			.field("values", &self.values())
			.field("errors", &self.errors)
			.field("processing", &self.processing)
			.finish_non_exhaustive()
	}
}
