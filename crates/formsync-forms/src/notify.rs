//! User-facing notifications (toasts) raised by a submission.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
	/// Submission succeeded
	Success,
	/// Submission failed
	Error,
}

impl fmt::Display for NotificationLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Success => f.write_str("success"),
			Self::Error => f.write_str("error"),
		}
	}
}

/// One notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
	/// Severity
	pub level: NotificationLevel,
	/// Short headline
	pub title: String,
	/// Body text
	pub description: String,
}

impl Notification {
	/// Success notification
	pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			level: NotificationLevel::Success,
			title: title.into(),
			description: description.into(),
		}
	}

	/// Error notification
	pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			level: NotificationLevel::Error,
			title: title.into(),
			description: description.into(),
		}
	}
}

/// Displays notifications. Fire-and-forget.
pub trait Notifier {
	/// Show `notification`
	fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for Rc<N> {
	fn notify(&self, notification: Notification) {
		(**self).notify(notification);
	}
}

/// Keeps notifications in memory.
///
/// Clones share the same list, so one handle can be given to a form and
/// another kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
	notifications: Rc<RefCell<Vec<Notification>>>,
}

impl MemoryNotifier {
	/// Create an empty notifier
	pub fn new() -> Self {
		Self::default()
	}

	/// Everything received, oldest first
	pub fn peek(&self) -> Vec<Notification> {
		self.notifications.borrow().clone()
	}

	/// Most recent notification
	pub fn last(&self) -> Option<Notification> {
		self.notifications.borrow().last().cloned()
	}

	/// Number received
	pub fn len(&self) -> usize {
		self.notifications.borrow().len()
	}

	/// Whether nothing has been received
	pub fn is_empty(&self) -> bool {
		self.notifications.borrow().is_empty()
	}

	/// Drain everything received
	pub fn take(&self) -> Vec<Notification> {
		self.notifications.borrow_mut().drain(..).collect()
	}
}

impl Notifier for MemoryNotifier {
	fn notify(&self, notification: Notification) {
		self.notifications.borrow_mut().push(notification);
	}
}

/// Writes notifications to the log instead of showing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
	fn notify(&self, notification: Notification) {
		match notification.level {
			NotificationLevel::Success => tracing::info!(
				title = %notification.title,
				description = %notification.description,
				"notification"
			),
			NotificationLevel::Error => tracing::warn!(
				title = %notification.title,
				description = %notification.description,
				"notification"
			),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_memory_notifier_shares_between_clones() {
		let notifier = MemoryNotifier::new();
		let handle = notifier.clone();

		notifier.notify(Notification::success("Signed in", "Welcome back."));
		notifier.notify(Notification::error("Sign-in failed", "Invalid credentials"));

		assert_eq!(handle.len(), 2);
		assert_eq!(handle.last().map(|n| n.level), Some(NotificationLevel::Error));

		let drained = handle.take();
		assert_eq!(drained[0].title, "Signed in");
		assert!(notifier.is_empty());
	}

	#[rstest]
	fn test_rc_dyn_notifier() {
		let memory = MemoryNotifier::new();
		let notifier: Rc<dyn Notifier> = Rc::new(memory.clone());

		notifier.notify(Notification::error("Oops", "Try again"));

		assert_eq!(memory.peek(), vec![Notification::error("Oops", "Try again")]);
	}

	#[rstest]
	fn test_notification_serializes_level_lowercase() {
		let json = serde_json::to_value(Notification::success("a", "b")).unwrap();
		assert_eq!(json["level"], "success");
	}
}
