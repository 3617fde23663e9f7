//! Fine-grained reactive runtime
//!
//! This module provides access to formsync-reactive: [`Signal`] for state,
//! [`Effect`] for reactions, and [`EffectScope`] for tying a group of effects
//! to the lifetime of their owner.
//!
//! ## Example
//!
//! ```rust,ignore
//! use formsync::reactive::{Effect, Signal};
//!
//! let processing = Signal::new(false);
//! let _spinner = Effect::layout({
//!     let processing = processing.clone();
//!     move || render_spinner(processing.get())
//! });
//!
//! processing.set(true);
//! ```

// Re-export all formsync-reactive functionality
pub use formsync_reactive::*;
