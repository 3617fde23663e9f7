//! Fine-grained reactivity for formsync
//!
//! A small Leptos/Solid-style reactive core: [`Signal`] holds state,
//! [`Effect`] reacts to it, and [`EffectScope`] ties a group of effects to the
//! lifetime of the object that created them.
//!
//! The runtime is thread-local and single-threaded by construction; signals are
//! `Rc`-based and intentionally `!Send`.
//!
//! ## Example
//!
//! ```ignore
//! use formsync_reactive::{EffectScope, Signal};
//!
//! let remote = Signal::new(String::new());
//! let local = Signal::new(String::new());
//!
//! let mut scope = EffectScope::new();
//! scope.layout_effect({
//!     let (remote, local) = (remote.clone(), local.clone());
//!     move || local.set(remote.get())
//! });
//!
//! remote.set("x".into());
//! assert_eq!(local.get_untracked(), "x");
//!
//! scope.dispose();
//! remote.set("y".into());
//! assert_eq!(local.get_untracked(), "x");
//! ```

#![warn(missing_docs)]

pub mod effect;
pub mod runtime;
pub mod scope;
pub mod signal;

pub use effect::Effect;
pub use runtime::{EffectTiming, NodeId, Observer, Runtime, with_runtime};
pub use scope::EffectScope;
pub use signal::Signal;
