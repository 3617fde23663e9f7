//! Transport seam between a form and the server.
//!
//! The form never talks HTTP itself. It hands a [`SubmitRequest`] to a
//! [`Transport`] and interprets the answer: `Ok(())` is Success,
//! [`SubmitError::Rejected`] carries per-field messages, and
//! [`SubmitError::Transport`] is any other failure.
//!
//! ## Example
//!
//! ```ignore
//! use formsync_forms::transport::{ScriptedTransport, SubmitOptions};
//! use formsync_forms::FieldErrors;
//!
//! let transport = ScriptedTransport::new()
//!     .reject(FieldErrors::new().with("password", "Invalid credentials"))
//!     .succeed();
//!
//! let options = SubmitOptions::new().header("X-CSRFToken", token);
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

use crate::error::{SubmitError, TransportError};
use crate::field::FieldErrors;

/// HTTP method used for a submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
	/// GET
	Get,
	/// POST
	#[default]
	Post,
	/// PUT
	Put,
	/// PATCH
	Patch,
	/// DELETE
	Delete,
}

impl Method {
	/// Method name as sent on the wire
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Patch => "PATCH",
			Self::Delete => "DELETE",
		}
	}
}

impl fmt::Display for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Per-submission options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOptions {
	/// HTTP method
	pub method: Method,
	/// Extra request headers
	pub headers: BTreeMap<String, String>,
	/// Give up after this long; `None` leaves timing to the transport
	pub timeout: Option<Duration>,
}

impl SubmitOptions {
	/// POST, no headers, no timeout
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the method
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	/// Add a header
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());
		self
	}

	/// Set the timeout
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);
		self
	}
}

/// What a transport is asked to send.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitRequest {
	/// Target URL or route
	pub endpoint: String,
	/// HTTP method
	pub method: Method,
	/// Request headers
	pub headers: BTreeMap<String, String>,
	/// Field values, as a JSON object keyed by field name
	pub body: serde_json::Value,
}

/// Sends a submission and reports how it went.
///
/// Forms are single-threaded, so implementations need not be `Send`.
#[async_trait(?Send)]
pub trait Transport {
	/// Send `request`.
	///
	/// # Errors
	///
	/// [`SubmitError::Rejected`] when the server returns field errors,
	/// [`SubmitError::Transport`] for anything else that is not a success.
	async fn send(&self, request: SubmitRequest) -> Result<(), SubmitError>;
}

#[async_trait(?Send)]
impl<T: Transport + ?Sized> Transport for Rc<T> {
	async fn send(&self, request: SubmitRequest) -> Result<(), SubmitError> {
		(**self).send(request).await
	}
}

/// A transport that plays back queued responses.
///
/// Responses are consumed in order; once the queue is empty every request
/// succeeds. Each request is recorded before anything else happens, so a
/// caller can inspect it while the transport is held.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
	responses: RefCell<VecDeque<Result<(), SubmitError>>>,
	requests: RefCell<Vec<SubmitRequest>>,
	hold: Option<Rc<Notify>>,
}

impl ScriptedTransport {
	/// Empty script: every request succeeds
	pub fn new() -> Self {
		Self::default()
	}

	/// Queue an arbitrary response
	pub fn respond(self, response: Result<(), SubmitError>) -> Self {
		self.responses.borrow_mut().push_back(response);
		self
	}

	/// Queue a success
	pub fn succeed(self) -> Self {
		self.respond(Ok(()))
	}

	/// Queue a rejection carrying `errors`
	pub fn reject(self, errors: FieldErrors) -> Self {
		self.respond(Err(SubmitError::Rejected(errors)))
	}

	/// Queue a transport failure
	pub fn fail(self, error: TransportError) -> Self {
		self.respond(Err(SubmitError::Transport(error)))
	}

	/// Block every request until `gate` is notified (one permit per request)
	pub fn held(mut self, gate: Rc<Notify>) -> Self {
		self.hold = Some(gate);
		self
	}

	/// Requests received so far
	pub fn requests(&self) -> Vec<SubmitRequest> {
		self.requests.borrow().clone()
	}

	/// Number of requests received so far
	pub fn call_count(&self) -> usize {
		self.requests.borrow().len()
	}

	/// Number of queued responses not yet played
	pub fn remaining(&self) -> usize {
		self.responses.borrow().len()
	}
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
	async fn send(&self, request: SubmitRequest) -> Result<(), SubmitError> {
		tracing::trace!(endpoint = %request.endpoint, method = %request.method, "scripted request");
		self.requests.borrow_mut().push(request);

		if let Some(gate) = &self.hold {
			gate.notified().await;
		}

		self.responses.borrow_mut().pop_front().unwrap_or(Ok(()))
	}
}
