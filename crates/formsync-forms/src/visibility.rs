//! Shared open/closed flag for the surface hosting a form (modal, drawer).
//!
//! Both the page and the form's orchestrator hold a [`Visibility`]; either may
//! open or close it.

use formsync_reactive::Signal;

/// Cloneable handle to one open/closed flag.
#[derive(Debug, Clone)]
pub struct Visibility {
	open: Signal<bool>,
}

impl Visibility {
	/// Create a flag with the given state
	pub fn new(open: bool) -> Self {
		Self {
			open: Signal::new(open),
		}
	}

	/// Create an open flag
	pub fn opened() -> Self {
		Self::new(true)
	}

	/// Create a closed flag
	pub fn closed() -> Self {
		Self::new(false)
	}

	/// Current state, without subscribing
	pub fn is_open(&self) -> bool {
		self.open.get_untracked()
	}

	/// Open
	pub fn open(&self) {
		self.open.set(true);
	}

	/// Close. Observers run even when already closed.
	pub fn close(&self) {
		self.open.set(false);
	}

	/// Set the state
	pub fn set(&self, open: bool) {
		self.open.set(open);
	}

	/// Flip the state
	pub fn toggle(&self) {
		self.open.update(|open| *open = !*open);
	}

	/// Reactive handle to the flag
	pub fn signal(&self) -> &Signal<bool> {
		&self.open
	}
}

impl Default for Visibility {
	fn default() -> Self {
		Self::closed()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use formsync_reactive::Effect;
	use serial_test::serial;
	use std::cell::Cell;
	use std::rc::Rc;

	#[test]
	#[serial]
	fn test_clones_share_flag() {
		let page = Visibility::opened();
		let form = page.clone();

		form.close();
		assert!(!page.is_open());

		page.toggle();
		assert!(form.is_open());
	}

	#[test]
	#[serial]
	fn test_close_notifies_even_when_closed() {
		let visibility = Visibility::closed();
		let closes = Rc::new(Cell::new(0));

		let _watcher = Effect::layout({
			let (signal, closes) = (visibility.signal().clone(), closes.clone());
			move || {
				if !signal.get() {
					closes.set(closes.get() + 1);
				}
			}
		});

		visibility.close();
		visibility.close();

		assert_eq!(closes.get(), 3);
	}
}
