//! Synchronizer - one-way bridge from remote state to the validation store
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐  values (per field)  ┌─────────────────┐
//! │ RemoteFormState │ ───────────────────► │ ValidationStore │
//! │                 │  errors (whole map)  │                 │
//! │                 │ ───────────────────► │                 │
//! └─────────────────┘                      └─────────────────┘
//! ```
//!
//! Nothing flows back: edits reach the store only by going through
//! [`RemoteFormState::set_field`]. Propagation uses layout effects, so the
//! store is settled by the time `set_field` returns.

use formsync_reactive::EffectScope;

use crate::field::FieldSet;
use crate::remote::RemoteFormState;
use crate::validation::ValidationStore;

/// Keeps a [`ValidationStore`] mirroring a [`RemoteFormState`].
///
/// The bridge stays up until [`detach`](Self::detach) is called or the
/// synchronizer is dropped.
#[derive(Debug)]
pub struct Synchronizer {
	scope: EffectScope,
}

impl Synchronizer {
	/// Start mirroring `remote` into `store`.
	///
	/// The store is brought up to date immediately.
	pub fn attach<F: FieldSet>(remote: &RemoteFormState<F>, store: &ValidationStore<F>) -> Self {
		let mut scope = EffectScope::new();

		for (field, signal) in remote.field_signals() {
			let (signal, store) = (signal.clone(), store.clone());
			scope.layout_effect(move || {
				let value = signal.get();
				tracing::trace!(field = field.name(), %value, "mirroring field");
				store.set_field_value(field, value);
			});
		}

		let (errors, store) = (remote.errors_signal().clone(), store.clone());
		scope.layout_effect(move || {
			let errors = errors.get();
			tracing::trace!(count = errors.len(), "mirroring errors");
			store.set_errors(errors);
		});

		tracing::debug!(observers = scope.len(), "synchronizer attached");
		Self { scope }
	}

	/// Whether the bridge is up
	pub fn is_attached(&self) -> bool {
		!self.scope.is_disposed()
	}

	/// Stop mirroring. Idempotent.
	pub fn detach(&mut self) {
		if self.is_attached() {
			tracing::debug!("synchronizer detached");
		}
		self.scope.dispose();
	}
}
