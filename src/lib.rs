//! # formsync
//!
//! A client-side form controller that keeps a form's remote submission state
//! and its local validation state consistent, and runs each submission
//! through one well-defined lifecycle.
//!
//! ## Feature Flags
//!
//! - `reactive` - Reactive runtime only (`Signal`, `Effect`, `EffectScope`)
//! - `forms` (default) - The form controller, implies `reactive`
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use formsync::prelude::*;
//! use formsync::forms::login::{LoginField, login_config, login_schema};
//!
//! let modal = Visibility::opened();
//! let form = SubmissionOrchestrator::new(
//!     RemoteFormState::new(),
//!     login_schema(),
//!     modal.clone(),
//!     transport,
//!     TracingNotifier,
//!     login_config("/accounts/login/"),
//! )
//! .with_on_finish(|| tracing::info!("sign-in attempt finished"));
//!
//! form.remote().set_field(LoginField::Email, "a@b.com");
//! form.remote().set_field(LoginField::Password, "hunter2");
//!
//! match form.submit().await {
//!     Attempt::Succeeded => {}
//!     Attempt::Blocked(errors) | Attempt::Failed(SubmitError::Rejected(errors)) => show(errors),
//!     Attempt::Failed(_) | Attempt::AlreadyProcessing => {}
//! }
//! ```

#![warn(missing_docs)]

#[cfg(feature = "forms")]
pub mod forms;
#[cfg(feature = "reactive")]
pub mod reactive;

#[cfg(feature = "reactive")]
pub use formsync_reactive::{Effect, EffectScope, Signal};

#[cfg(feature = "forms")]
pub use formsync_forms::{
	Attempt, FieldErrors, FieldSet, FieldValue, FormError, FormSettings, FormValues,
	RemoteFormState, SubmissionOrchestrator, SubmitError, Synchronizer, ValidationStore,
	Visibility,
};

/// Commonly used types
pub mod prelude {
	#[cfg(feature = "reactive")]
	pub use crate::reactive::{Effect, EffectScope, Signal};

	#[cfg(feature = "forms")]
	pub use crate::forms::prelude::*;
	#[cfg(feature = "forms")]
	pub use crate::forms::{MemoryNotifier, SubmitError, TransportError};
}
