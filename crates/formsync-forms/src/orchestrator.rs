//! SubmissionOrchestrator - one submit button, start to finish
//!
//! Wires the pieces of a form together and runs one attempt per call to
//! [`SubmissionOrchestrator::submit`]:
//!
//! ```text
//! Idle ──submit──► Gating ──blocked──► Idle
//!                    │
//!                    ▼
//!               Submitting ──Success──► SideEffectsSuccess ──┐
//!                    │                                        ├──► Finished ──► Idle
//!                    └──────Failure──► SideEffectsError ──────┘
//! ```
//!
//! On success the shared [`Visibility`] is closed and a success notification
//! goes out. On failure only the sensitive field is cleared, and the error
//! notification shows the identifier field's error, else the sensitive
//! field's, else a generic message. Whenever the visibility flag closes, from
//! any writer, the remote errors are cleared.
//!
//! ## Example
//!
//! ```ignore
//! use formsync_forms::login::{login_config, login_schema};
//! use formsync_forms::prelude::*;
//!
//! let modal = Visibility::opened();
//! let form = SubmissionOrchestrator::new(
//!     RemoteFormState::new(),
//!     login_schema(),
//!     modal.clone(),
//!     http_transport,
//!     TracingNotifier,
//!     login_config("/accounts/login/"),
//! )
//! .with_on_finish(|| tracing::info!("sign-in attempt done"));
//!
//! form.remote().set_field(LoginField::Email, "a@b.com");
//! form.remote().set_field(LoginField::Password, "hunter2");
//!
//! match form.submit().await {
//!     Attempt::Blocked(errors) => render_inline(errors),
//!     _ => {}
//! }
//! ```

use std::fmt;
use std::rc::Rc;

use formsync_reactive::{EffectScope, Signal};
use serde::{Deserialize, Serialize};

use crate::error::{FormError, FormResult, SubmitError};
use crate::field::{FieldErrors, FieldSet};
use crate::notify::{Notification, Notifier};
use crate::remote::{RemoteFormState, SubmissionOutcome, SubmitStatus};
use crate::schema::Schema;
use crate::sync::Synchronizer;
use crate::transport::{SubmitOptions, Transport};
use crate::validation::ValidationStore;
use crate::visibility::Visibility;

/// Where the current attempt is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
	/// Waiting for a submit
	#[default]
	Idle,
	/// Running the local schema
	Gating,
	/// Waiting on the transport
	Submitting,
	/// Applying success side effects
	SideEffectsSuccess,
	/// Applying failure side effects
	SideEffectsError,
	/// Running the finish callback
	Finished,
}

/// How one call to [`SubmissionOrchestrator::submit`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
	/// Local validation failed; nothing was sent
	Blocked(FieldErrors),
	/// A submission was already in flight; nothing happened
	AlreadyProcessing,
	/// The server accepted the submission
	Succeeded,
	/// The server rejected it or the transport failed
	Failed(SubmitError),
}

impl Attempt {
	/// Whether the submission went through
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Succeeded)
	}

	/// `Ok` for success and ignored duplicates, the matching [`FormError`] otherwise
	pub fn into_result(self) -> FormResult<()> {
		match self {
			Self::Succeeded | Self::AlreadyProcessing => Ok(()),
			Self::Blocked(errors) => Err(FormError::Validation(errors)),
			Self::Failed(err) => Err(err.into()),
		}
	}
}

/// Notification texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
	/// Title of the success notification
	pub success_title: String,
	/// Body of the success notification
	pub success_description: String,
	/// Title of the failure notification
	pub failure_title: String,
	/// Body of the failure notification when no field error applies
	pub generic_failure: String,
}

impl Default for Messages {
	fn default() -> Self {
		Self {
			success_title: "Signed in".to_string(),
			success_description: "Welcome back.".to_string(),
			failure_title: "Sign-in failed".to_string(),
			generic_failure: "Something went wrong. Please try again.".to_string(),
		}
	}
}

/// Static behavior of an orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig<F: FieldSet> {
	/// Where submissions go
	pub endpoint: String,
	/// Method, headers and timeout
	pub options: SubmitOptions,
	/// Field whose error leads the failure notification (the account identifier)
	pub identifier_field: F,
	/// Field cleared after a failure (the secret)
	pub sensitive_field: F,
	/// Reset every field after a success
	pub reset_on_success: bool,
	/// Notification texts
	pub messages: Messages,
}

/// Runs submissions for one form.
///
/// Owns the form's [`RemoteFormState`], its [`ValidationStore`] and the
/// [`Synchronizer`] between them. Dropping the orchestrator detaches every
/// observer it created.
pub struct SubmissionOrchestrator<F: FieldSet> {
	remote: RemoteFormState<F>,
	store: ValidationStore<F>,
	synchronizer: Synchronizer,
	visibility: Visibility,
	transport: Rc<dyn Transport>,
	notifier: Rc<dyn Notifier>,
	config: OrchestratorConfig<F>,
	phase: Signal<Phase>,
	on_finish: Option<Box<dyn Fn()>>,
	watchers: EffectScope,
}

impl<F: FieldSet> SubmissionOrchestrator<F> {
	/// Assemble a form.
	///
	/// The validation store starts from `remote`'s current values and is kept
	/// in step from then on.
	///
	/// `remote` must not already belong to another orchestrator. Two
	/// orchestrators over clones of one state would run two synchronizers and
	/// two visibility watchers against it and share one `processing` flag.
	/// Use [`remote`](Self::remote) for shared access instead.
	pub fn new(
		remote: RemoteFormState<F>,
		schema: impl Schema<F> + 'static,
		visibility: Visibility,
		transport: impl Transport + 'static,
		notifier: impl Notifier + 'static,
		config: OrchestratorConfig<F>,
	) -> Self {
		let store = ValidationStore::new(schema, remote.values());
		let synchronizer = Synchronizer::attach(&remote, &store);

		let mut watchers = EffectScope::new();
		let (open, form) = (visibility.signal().clone(), remote.clone());
		watchers.layout_effect(move || {
			if !open.get() {
				tracing::debug!("form hidden, clearing errors");
				form.clear_errors();
			}
		});

		Self {
			remote,
			store,
			synchronizer,
			visibility,
			transport: Rc::new(transport),
			notifier: Rc::new(notifier),
			config,
			phase: Signal::new(Phase::Idle),
			on_finish: None,
			watchers,
		}
	}

	/// Run `callback` after every completed submission, success or not
	pub fn with_on_finish(mut self, callback: impl Fn() + 'static) -> Self {
		self.on_finish = Some(Box::new(callback));
		self
	}

	/// Validate, then submit.
	///
	/// A duplicate submit while one is in flight is ignored before the gate
	/// runs. A blocked attempt never reaches the transport and does not
	/// trigger the finish callback.
	pub async fn submit(&self) -> Attempt {
		if self.remote.processing() {
			tracing::warn!(endpoint = %self.config.endpoint, "submit ignored, already processing");
			return Attempt::AlreadyProcessing;
		}

		self.phase.set(Phase::Gating);
		if let Err(errors) = self.store.gate() {
			self.phase.set(Phase::Idle);
			return Attempt::Blocked(errors);
		}

		self.phase.set(Phase::Submitting);
		let status = self
			.remote
			.submit(
				&*self.transport,
				&self.config.endpoint,
				&self.config.options,
				|outcome| self.apply_outcome(outcome),
			)
			.await;

		match status {
			SubmitStatus::Succeeded => Attempt::Succeeded,
			SubmitStatus::Failed(err) => Attempt::Failed(err),
			SubmitStatus::AlreadyProcessing => {
				self.phase.set(Phase::Idle);
				Attempt::AlreadyProcessing
			}
		}
	}

	fn apply_outcome(&self, outcome: SubmissionOutcome) {
		match outcome {
			SubmissionOutcome::Success => {
				self.phase.set(Phase::SideEffectsSuccess);
				self.visibility.close();
				let messages = &self.config.messages;
				self.notifier.notify(Notification::success(
					&messages.success_title,
					&messages.success_description,
				));
				if self.config.reset_on_success {
					self.remote.reset(None);
				}
			}
			SubmissionOutcome::Failure(errors) => {
				self.phase.set(Phase::SideEffectsError);
				self.remote.reset(Some(self.config.sensitive_field));
				let messages = &self.config.messages;
				let description = errors
					.field(self.config.identifier_field)
					.or_else(|| errors.field(self.config.sensitive_field))
					.unwrap_or(messages.generic_failure.as_str());
				self.notifier
					.notify(Notification::error(&messages.failure_title, description));
			}
			SubmissionOutcome::Finished => {
				self.phase.set(Phase::Finished);
				if let Some(callback) = &self.on_finish {
					callback();
				}
				self.phase.set(Phase::Idle);
			}
		}
	}

	/// Open the shared visibility flag
	pub fn open(&self) {
		self.visibility.open();
	}

	/// Close the shared visibility flag, which clears the remote errors
	pub fn close(&self) {
		self.visibility.close();
	}

	/// Detach the synchronizer and the visibility observer. Idempotent.
	pub fn detach(&mut self) {
		self.synchronizer.detach();
		self.watchers.dispose();
	}

	/// Whether the observers are still attached
	pub fn is_attached(&self) -> bool {
		self.synchronizer.is_attached()
	}

	/// Current phase
	pub fn phase(&self) -> Phase {
		self.phase.get()
	}

	/// Reactive handle to the phase
	pub fn phase_signal(&self) -> &Signal<Phase> {
		&self.phase
	}

	/// The authoritative form state
	pub fn remote(&self) -> &RemoteFormState<F> {
		&self.remote
	}

	/// The local validation projection
	pub fn store(&self) -> &ValidationStore<F> {
		&self.store
	}

	/// The shared visibility flag
	pub fn visibility(&self) -> &Visibility {
		&self.visibility
	}

	/// Configuration
	pub fn config(&self) -> &OrchestratorConfig<F> {
		&self.config
	}
}

impl<F: FieldSet> fmt::Debug for SubmissionOrchestrator<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SubmissionOrchestrator")
			.field("remote", &self.remote)
			.field("store", &self.store)
			.field("visibility", &self.visibility)
			.field("config", &self.config)
			.field("phase", &self.phase)
			.field("attached", &self.is_attached())
			.finish_non_exhaustive()
	}
}
