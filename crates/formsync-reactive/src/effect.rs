//! Effect - Reactive Side Effects
//!
//! An `Effect` runs a closure immediately and re-runs it whenever a `Signal` it
//! read during its previous run changes. Dependencies are re-collected on every
//! run, so branches that stop reading a signal also stop reacting to it.
//!
//! ## Timing
//!
//! - [`EffectTiming::Layout`] effects run synchronously inside the `set()` that
//!   changed their source. Projections that must be settled before the next
//!   read (form value mirroring, error import) use this timing.
//! - [`EffectTiming::Passive`] effects are queued and run on the next flush.
//!
//! ## Example
//!
//! ```ignore
//! use formsync_reactive::{Effect, Signal};
//!
//! let remote = Signal::new(String::new());
//! let local = Signal::new(String::new());
//!
//! let _mirror = Effect::layout({
//!     let (remote, local) = (remote.clone(), local.clone());
//!     move || local.set(remote.get())
//! });
//!
//! remote.set("a@b.com".to_string());
//! assert_eq!(local.get_untracked(), "a@b.com");
//! ```

use core::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use super::runtime::{EffectTiming, MAX_FLUSH_ROUNDS, NodeId, Observer, try_with_runtime, with_runtime};

type EffectFn = Box<dyn FnMut() + 'static>;

/// Registered effect body. `func` is `None` while the body is running.
struct EffectSlot {
	timing: EffectTiming,
	func: Option<EffectFn>,
	/// Notified while running; run again once the current pass returns
	dirty: bool,
}

thread_local! {
	static EFFECTS: RefCell<BTreeMap<NodeId, EffectSlot>> = const { RefCell::new(BTreeMap::new()) };
}

/// What to do after one pass of an effect body
enum AfterRun {
	Rerun(EffectFn),
	Done(Option<EffectFn>),
}

/// Timing of a live effect, `None` once disposed.
pub(crate) fn effect_timing(effect_id: NodeId) -> Option<EffectTiming> {
	EFFECTS
		.try_with(|effects| effects.borrow().get(&effect_id).map(|slot| slot.timing))
		.ok()
		.flatten()
}

/// Run an effect body with dependency tracking.
///
/// The body is taken out of the registry for the duration of the call, so an
/// effect may set signals that trigger other layout effects. An effect
/// notified while its own body is running is marked dirty and runs again as
/// soon as the current pass returns, up to `MAX_FLUSH_ROUNDS` passes.
pub(crate) fn run_effect(effect_id: NodeId) {
	let taken = EFFECTS
		.try_with(|effects| {
			let mut effects = effects.borrow_mut();
			let slot = effects.get_mut(&effect_id)?;
			match slot.func.take() {
				Some(func) => Some((slot.timing, func)),
				None => {
					slot.dirty = true;
					None
				}
			}
		})
		.ok()
		.flatten();

	let Some((timing, mut func)) = taken else {
		return;
	};

	let mut passes = 0;
	loop {
		with_runtime(|rt| {
			rt.clear_dependencies(effect_id);
			rt.push_observer(Observer { id: effect_id, timing });
		});

		func();
		passes += 1;

		with_runtime(|rt| {
			rt.pop_observer();
		});

		let next = EFFECTS
			.try_with(move |effects| match effects.borrow_mut().get_mut(&effect_id) {
				Some(slot) if slot.dirty && passes < MAX_FLUSH_ROUNDS => {
					slot.dirty = false;
					AfterRun::Rerun(func)
				}
				Some(slot) => {
					if slot.dirty {
						tracing::warn!(?effect_id, passes, "effect keeps re-triggering itself; giving up");
					}
					slot.dirty = false;
					slot.func = Some(func);
					AfterRun::Done(None)
				}
				// Disposed while running: the body is dropped below, outside the borrow.
				None => AfterRun::Done(Some(func)),
			})
			.unwrap_or(AfterRun::Done(None));

		match next {
			AfterRun::Rerun(again) => func = again,
			AfterRun::Done(orphaned) => {
				drop(orphaned);
				return;
			}
		}
	}
}

/// A reactive side effect.
///
/// Dropping the handle disposes the effect; keep it alive for as long as the
/// effect should react (see [`EffectScope`](crate::EffectScope) for owning
/// several at once).
pub struct Effect {
	id: NodeId,
	disposed: Rc<Cell<bool>>,
}

impl Effect {
	/// Create a passive effect and run it once
	pub fn new<F>(f: F) -> Self
	where
		F: FnMut() + 'static,
	{
		Self::new_with_timing(f, EffectTiming::Passive)
	}

	/// Create a layout (synchronous) effect and run it once
	pub fn layout<F>(f: F) -> Self
	where
		F: FnMut() + 'static,
	{
		Self::new_with_timing(f, EffectTiming::Layout)
	}

	/// Create an effect with explicit timing and run it once
	pub fn new_with_timing<F>(f: F, timing: EffectTiming) -> Self
	where
		F: FnMut() + 'static,
	{
		let id = NodeId::new();

		EFFECTS.with(|effects| {
			effects.borrow_mut().insert(
				id,
				EffectSlot {
					timing,
					func: Some(Box::new(f)),
					dirty: false,
				},
			);
		});

		run_effect(id);

		Self {
			id,
			disposed: Rc::new(Cell::new(false)),
		}
	}

	/// NodeId of this effect
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// Timing this effect was created with
	pub fn timing(&self) -> Option<EffectTiming> {
		effect_timing(self.id)
	}

	/// Whether [`dispose`](Self::dispose) has run
	pub fn is_disposed(&self) -> bool {
		self.disposed.get()
	}

	/// Stop reacting and release the effect body.
	///
	/// Idempotent.
	pub fn dispose(&self) {
		if self.disposed.replace(true) {
			return;
		}

		let _ = try_with_runtime(|rt| rt.remove_node(self.id));

		let removed = EFFECTS
			.try_with(|effects| effects.borrow_mut().remove(&self.id))
			.ok()
			.flatten();
		drop(removed);
	}
}

impl Drop for Effect {
	fn drop(&mut self) {
		self.dispose();
	}
}

impl core::fmt::Debug for Effect {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Effect")
			.field("id", &self.id)
			.field("disposed", &self.disposed.get())
			.finish()
	}
}
