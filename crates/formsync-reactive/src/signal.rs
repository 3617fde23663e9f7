//! Signal - Fine-grained Reactive Primitive
//!
//! `Signal<T>` holds a value shared by all of its clones. Reading it with
//! [`get`](Signal::get) inside an effect subscribes that effect; writing it with
//! [`set`](Signal::set) or [`update`](Signal::update) notifies subscribers.
//!
//! ## Example
//!
//! ```ignore
//! use formsync_reactive::Signal;
//!
//! let processing = Signal::new(false);
//! processing.set(true);
//! assert!(processing.get_untracked());
//!
//! let attempts = Signal::new(0);
//! attempts.update(|n| *n += 1);
//! assert_eq!(attempts.get_untracked(), 1);
//! ```

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use super::runtime::{NodeId, try_with_runtime, with_runtime};

/// A reactive value shared between clones.
///
/// Cloning is cheap (`Rc`); all clones observe the same value and the same
/// subscribers. The node is removed from the runtime when the last clone drops.
pub struct Signal<T: 'static> {
	id: NodeId,
	value: Rc<RefCell<T>>,
}

impl<T: 'static> Signal<T> {
	/// Create a signal holding `value`
	pub fn new(value: T) -> Self {
		Self {
			id: NodeId::new(),
			value: Rc::new(RefCell::new(value)),
		}
	}

	/// Read the value, subscribing the running effect (if any)
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		with_runtime(|rt| rt.track_dependency(self.id));
		self.get_untracked()
	}

	/// Read the value without subscribing
	pub fn get_untracked(&self) -> T
	where
		T: Clone,
	{
		self.value.borrow().clone()
	}

	/// Borrow the value, subscribing the running effect (if any)
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		with_runtime(|rt| rt.track_dependency(self.id));
		self.with_untracked(f)
	}

	/// Borrow the value without subscribing
	pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		let value = self.value.borrow();
		f(&*value)
	}

	/// Replace the value and notify subscribers
	pub fn set(&self, value: T) {
		let previous = self.value.replace(value);
		drop(previous);
		with_runtime(|rt| rt.notify_signal_change(self.id));
	}

	/// Mutate the value in place and notify subscribers once
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&mut T),
	{
		f(&mut *self.value.borrow_mut());
		with_runtime(|rt| rt.notify_signal_change(self.id));
	}

	/// NodeId of this signal
	pub fn id(&self) -> NodeId {
		self.id
	}
}

impl<T: PartialEq + 'static> Signal<T> {
	/// Replace the value only if it differs, returning whether it changed.
	///
	/// Subscribers are not notified when the value is unchanged.
	pub fn set_if_changed(&self, value: T) -> bool {
		if *self.value.borrow() == value {
			return false;
		}
		self.set(value);
		true
	}
}

impl<T: 'static> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			value: Rc::clone(&self.value),
		}
	}
}

impl<T: 'static> Drop for Signal<T> {
	fn drop(&mut self) {
		if Rc::strong_count(&self.value) == 1 {
			let _ = try_with_runtime(|rt| rt.remove_node(self.id));
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("id", &self.id)
			.field("value", &*self.value.borrow())
			.finish()
	}
}
