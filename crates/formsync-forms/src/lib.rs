//! Client-side form controller for formsync
//!
//! A form is split into two pieces of state that are kept consistent:
//!
//! - [`RemoteFormState`] holds the values that go over the wire, the errors
//!   the server reported, and the in-flight flag.
//! - [`ValidationStore`] holds a projection of those values, the schema, and
//!   the errors shown next to each field.
//!
//! A [`Synchronizer`] copies values and errors from the first to the second,
//! never the other way. A [`SubmissionOrchestrator`] owns all three and runs
//! a submission: validate locally, send, then close the form or clear the
//! sensitive field and notify.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐   Synchronizer   ┌─────────────────┐
//! │ RemoteFormState │ ───────────────► │ ValidationStore │
//! └────────┬────────┘                  └────────┬────────┘
//!          │ submit                             │ gate
//!          ▼                                    │
//!     Transport ◄──── SubmissionOrchestrator ◄──┘
//!                          │        │
//!                  Visibility    Notifier
//! ```
//!
//! Everything is single-threaded: state lives in `Rc`-based signals and the
//! [`Transport`] trait is `?Send`.
//!
//! ## Example
//!
//! ```ignore
//! use formsync_forms::prelude::*;
//! use formsync_forms::login::{LoginField, login_config, login_schema};
//!
//! let modal = Visibility::opened();
//! let form = SubmissionOrchestrator::new(
//!     RemoteFormState::new(),
//!     login_schema(),
//!     modal.clone(),
//!     transport,
//!     TracingNotifier,
//!     login_config("/accounts/login/"),
//! );
//!
//! form.remote().set_field(LoginField::Email, "a@b.com");
//! form.remote().set_field(LoginField::Password, "hunter2");
//! form.submit().await.into_result()?;
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod field;
pub mod login;
pub mod notify;
pub mod orchestrator;
pub mod remote;
pub mod schema;
pub mod settings;
pub mod sync;
pub mod transport;
pub mod validation;
pub mod visibility;

pub use error::{FormError, FormResult, SettingsError, SubmitError, TransportError};
pub use field::{FieldErrors, FieldSet, FieldValue, FormValues};
pub use notify::{MemoryNotifier, Notification, NotificationLevel, Notifier, TracingNotifier};
pub use orchestrator::{Attempt, Messages, OrchestratorConfig, Phase, SubmissionOrchestrator};
pub use remote::{RemoteFormState, SubmissionOutcome, SubmitStatus};
pub use schema::{Rule, RuleSchema, Schema};
pub use settings::FormSettings;
pub use sync::Synchronizer;
pub use transport::{Method, ScriptedTransport, SubmitOptions, SubmitRequest, Transport};
pub use validation::ValidationStore;
pub use visibility::Visibility;

/// Commonly used types
pub mod prelude {
	pub use crate::{
		Attempt, FieldErrors, FieldSet, FieldValue, FormError, FormSettings, FormValues,
		Notification, Notifier, OrchestratorConfig, RemoteFormState, Rule, RuleSchema, Schema,
		SubmissionOrchestrator, SubmissionOutcome, SubmitOptions, Synchronizer, TracingNotifier,
		Transport, ValidationStore, Visibility,
	};
}
