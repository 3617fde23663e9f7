//! Reactive Runtime
//!
//! The runtime owns the dependency graph between signals and the effects that
//! read them, the observer stack used for automatic dependency tracking, and
//! the queue of passive effects waiting for the next flush.
//!
//! ## Architecture
//!
//! 1. **Observer Stack**: the effect currently executing sits on top of the stack
//! 2. **Dependency Tracking**: `Signal::get()` records an edge to the top observer
//! 3. **Notification**: `Signal::set()` runs layout subscribers immediately and
//!    queues passive subscribers
//! 4. **Flush**: queued passive effects run when the embedder calls
//!    `flush_updates()` from its event loop
//!
//! Form state is single-threaded, so there is one runtime per thread and every
//! `Signal`/`Effect` created on that thread registers with it.
//!
//! ## Example
//!
//! ```ignore
//! use formsync_reactive::{Effect, Signal, with_runtime};
//!
//! let email = Signal::new(String::new());
//! let _echo = Effect::new({
//!     let email = email.clone();
//!     move || tracing::debug!(email = %email.get(), "email changed")
//! });
//!
//! email.set("a@b.com".to_string());
//! with_runtime(|rt| rt.flush_updates());
//! ```

use core::cell::RefCell;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::collections::BTreeMap;

/// Upper bound on flush rounds (and on re-runs of one effect) before the
/// runtime gives up on a feedback loop
pub(crate) const MAX_FLUSH_ROUNDS: usize = 64;

/// Unique identifier for reactive nodes (Signals and Effects)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
	/// Create a new unique NodeId
	pub fn new() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl Default for NodeId {
	fn default() -> Self {
		Self::new()
	}
}

/// When an effect re-runs after one of its sources changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectTiming {
	/// Runs synchronously inside the `set()` call that changed the source
	Layout,
	/// Queued until the next flush
	#[default]
	Passive,
}

/// A currently executing effect
#[derive(Debug, Clone, Copy)]
pub struct Observer {
	/// Effect being executed
	pub id: NodeId,
	/// Timing the effect was registered with
	pub timing: EffectTiming,
}

/// Edges of one node in the dependency graph
#[derive(Debug, Default)]
pub(crate) struct DependencyNode {
	/// Effects that read this node
	pub(crate) subscribers: Vec<NodeId>,
	/// Signals this node read during its last run
	pub(crate) dependencies: Vec<NodeId>,
}

/// Per-thread reactive runtime
pub struct Runtime {
	observer_stack: RefCell<Vec<Observer>>,
	pub(crate) dependency_graph: RefCell<BTreeMap<NodeId, DependencyNode>>,
	pub(crate) pending_updates: RefCell<Vec<NodeId>>,
}

impl Runtime {
	/// Create an empty runtime
	pub fn new() -> Self {
		Self {
			observer_stack: RefCell::new(Vec::new()),
			dependency_graph: RefCell::new(BTreeMap::new()),
			pending_updates: RefCell::new(Vec::new()),
		}
	}

	/// The effect currently executing, if any
	pub fn current_observer(&self) -> Option<NodeId> {
		self.observer_stack.borrow().last().map(|observer| observer.id)
	}

	/// Push an observer before running an effect body
	pub fn push_observer(&self, observer: Observer) {
		self.observer_stack.borrow_mut().push(observer);
	}

	/// Pop the observer pushed by the matching [`push_observer`](Self::push_observer)
	pub fn pop_observer(&self) -> Option<Observer> {
		self.observer_stack.borrow_mut().pop()
	}

	/// Record that the current observer read `signal_id`.
	///
	/// Does nothing outside an effect.
	pub fn track_dependency(&self, signal_id: NodeId) {
		let Some(observer_id) = self.current_observer() else {
			return;
		};

		let mut graph = self.dependency_graph.borrow_mut();

		let signal_node = graph.entry(signal_id).or_default();
		if !signal_node.subscribers.contains(&observer_id) {
			signal_node.subscribers.push(observer_id);
		}

		let observer_node = graph.entry(observer_id).or_default();
		if !observer_node.dependencies.contains(&signal_id) {
			observer_node.dependencies.push(signal_id);
		}
	}

	/// Notify subscribers that `signal_id` changed.
	///
	/// Layout subscribers run before this returns; passive subscribers are queued.
	pub fn notify_signal_change(&self, signal_id: NodeId) {
		let subscribers = match self.dependency_graph.borrow().get(&signal_id) {
			Some(node) => node.subscribers.clone(),
			None => return,
		};

		let mut layout = Vec::new();
		for subscriber in subscribers {
			match crate::effect::effect_timing(subscriber) {
				Some(EffectTiming::Layout) => layout.push(subscriber),
				Some(EffectTiming::Passive) => self.schedule_update(subscriber),
				// Disposed between tracking and notification
				None => {}
			}
		}

		for effect_id in layout {
			crate::effect::run_effect(effect_id);
		}
	}

	/// Queue a passive effect for the next flush
	pub fn schedule_update(&self, node_id: NodeId) {
		let mut pending = self.pending_updates.borrow_mut();
		if !pending.contains(&node_id) {
			pending.push(node_id);
		}
	}

	/// Run every queued passive effect, including ones queued while flushing.
	pub fn flush_updates(&self) {
		for _ in 0..MAX_FLUSH_ROUNDS {
			let pending = core::mem::take(&mut *self.pending_updates.borrow_mut());
			if pending.is_empty() {
				return;
			}
			for effect_id in pending {
				crate::effect::run_effect(effect_id);
			}
		}

		let dropped = core::mem::take(&mut *self.pending_updates.borrow_mut());
		tracing::warn!(
			dropped = dropped.len(),
			"reactive flush did not settle; effects keep re-triggering each other"
		);
	}

	/// Number of passive effects waiting for a flush
	pub fn pending_count(&self) -> usize {
		self.pending_updates.borrow().len()
	}

	/// Forget what `node_id` read during its previous run
	pub fn clear_dependencies(&self, node_id: NodeId) {
		let mut graph = self.dependency_graph.borrow_mut();

		let dependencies = match graph.get_mut(&node_id) {
			Some(node) => core::mem::take(&mut node.dependencies),
			None => return,
		};

		for dep_id in dependencies {
			if let Some(dep_node) = graph.get_mut(&dep_id) {
				dep_node.subscribers.retain(|&id| id != node_id);
			}
		}
	}

	/// Remove a node and all edges pointing at it
	pub fn remove_node(&self, node_id: NodeId) {
		self.clear_dependencies(node_id);
		let removed = self.dependency_graph.borrow_mut().remove(&node_id);
		if let Some(node) = removed {
			let mut graph = self.dependency_graph.borrow_mut();
			for subscriber in node.subscribers {
				if let Some(sub_node) = graph.get_mut(&subscriber) {
					sub_node.dependencies.retain(|&id| id != node_id);
				}
			}
		}
		self.pending_updates.borrow_mut().retain(|&id| id != node_id);
	}

	/// Whether the graph still knows about `node_id`
	pub fn has_node(&self, node_id: NodeId) -> bool {
		self.dependency_graph.borrow().contains_key(&node_id)
	}

	/// Number of effects currently subscribed to `node_id`
	pub fn subscriber_count(&self, node_id: NodeId) -> usize {
		self.dependency_graph
			.borrow()
			.get(&node_id)
			.map(|node| node.subscribers.len())
			.unwrap_or(0)
	}
}

impl Default for Runtime {
	fn default() -> Self {
		Self::new()
	}
}

thread_local! {
	static RUNTIME: Runtime = Runtime::new();
}

/// Run `f` against this thread's runtime
pub fn with_runtime<F, R>(f: F) -> R
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.with(f)
}

/// Like [`with_runtime`], but returns `None` once thread-local storage is gone.
///
/// Used from `Drop` implementations.
pub(crate) fn try_with_runtime<F, R>(f: F) -> Option<R>
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.try_with(f).ok()
}
