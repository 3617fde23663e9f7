//! Client-side form controller
//!
//! This module provides access to formsync-forms.
//!
//! ## Architecture
//!
//! - **RemoteFormState**: values sent to the server, server-reported errors, in-flight flag
//! - **ValidationStore**: local projection of the values, schema, displayed errors
//! - **Synchronizer**: one-way bridge from the remote state into the store
//! - **SubmissionOrchestrator**: gate, submit, then close or clear and notify
//!
//! ## Example
//!
//! ```rust,ignore
//! use formsync::forms::login::{LoginField, login_config, login_schema};
//! use formsync::prelude::*;
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
//! let attempt = form.submit().await;
//! ```

// Re-export all formsync-forms functionality
pub use formsync_forms::*;
