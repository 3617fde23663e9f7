//! EffectScope - owned group of effects
//!
//! Component-like objects (a form's synchronizer, an orchestrator's visibility
//! watcher) create several effects that must live exactly as long as the
//! object. `EffectScope` owns them and disposes all of them together, either
//! explicitly through [`EffectScope::dispose`] or when the scope is dropped.

use super::effect::Effect;
use super::runtime::EffectTiming;

/// A set of effects disposed together.
#[derive(Debug, Default)]
pub struct EffectScope {
	effects: Vec<Effect>,
	disposed: bool,
}

impl EffectScope {
	/// Create an empty scope
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a passive effect owned by this scope
	pub fn effect<F>(&mut self, f: F) -> &Effect
	where
		F: FnMut() + 'static,
	{
		self.push(Effect::new_with_timing(f, EffectTiming::Passive))
	}

	/// Create a layout effect owned by this scope
	pub fn layout_effect<F>(&mut self, f: F) -> &Effect
	where
		F: FnMut() + 'static,
	{
		self.push(Effect::new_with_timing(f, EffectTiming::Layout))
	}

	/// Take ownership of an existing effect.
	///
	/// An effect pushed into an already disposed scope is disposed immediately.
	pub fn push(&mut self, effect: Effect) -> &Effect {
		if self.disposed {
			effect.dispose();
		}
		self.effects.push(effect);
		&self.effects[self.effects.len() - 1]
	}

	/// Number of effects owned
	pub fn len(&self) -> usize {
		self.effects.len()
	}

	/// Whether the scope owns no effects
	pub fn is_empty(&self) -> bool {
		self.effects.is_empty()
	}

	/// Whether [`dispose`](Self::dispose) has run
	pub fn is_disposed(&self) -> bool {
		self.disposed
	}

	/// Dispose every owned effect. Idempotent.
	pub fn dispose(&mut self) {
		if self.disposed {
			return;
		}
		self.disposed = true;
		for effect in self.effects.drain(..) {
			effect.dispose();
		}
	}
}

impl Drop for EffectScope {
	fn drop(&mut self) {
		self.dispose();
	}
}
